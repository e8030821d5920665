use serde::{Deserialize, Serialize};

/// Gompertz growth function: `W(t) = Wmax * exp(-exp(-(t - c) / b))`.
///
/// `t` is age in days, `Wmax` the adult weight, `b` the growth duration and
/// `c` the inflection age. At `t = c` the curve sits at `1/e` (~36.8%) of
/// the adult weight.
pub fn gompertz(age: f64, adult_weight: f64, growth_duration: f64, inflection_age: f64) -> f64 {
    adult_weight * (-(-(age - inflection_age) / growth_duration).exp()).exp()
}

/// Fitted (or seeded) Gompertz parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthCurveParameters {
    /// Asymptotic adult weight in kilograms
    pub adult_weight: f64,
    /// Scale of the juvenile-to-adult transition in days
    pub growth_duration: f64,
    /// Age of maximum growth rate in days
    pub inflection_age: f64,
    /// Coefficient of determination of the fit (R²)
    pub fit_quality: f64,
    /// Confidence in the fit (0.0 - 1.0)
    pub confidence: f64,
}

impl GrowthCurveParameters {
    /// Predicted weight in kilograms at the given age in days.
    pub fn weight_at(&self, age: f64) -> f64 {
        gompertz(age, self.adult_weight, self.growth_duration, self.inflection_age)
    }

    /// Age in days at which the curve reaches `fraction` of the adult weight.
    /// Solves `exp(-exp(-(t - c) / b)) = fraction` for `t`.
    pub fn age_at_fraction(&self, fraction: f64) -> f64 {
        self.inflection_age - self.growth_duration * (-fraction.ln()).ln()
    }

    pub(crate) fn as_array(&self) -> [f64; 3] {
        [self.adult_weight, self.growth_duration, self.inflection_age]
    }

    pub(crate) fn with_array(&self, values: [f64; 3]) -> Self {
        Self {
            adult_weight: values[0],
            growth_duration: values[1],
            inflection_age: values[2],
            ..*self
        }
    }
}

/// Goodness-of-fit metrics for a growth model against observed weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub r_squared: f64,
    /// Root mean squared error in kilograms
    pub rmse: f64,
    /// Mean absolute error in kilograms
    pub mae: f64,
}
