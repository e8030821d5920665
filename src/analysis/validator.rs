use serde::{Deserialize, Serialize};

use crate::models::{BreedProfile, GrowthCurveParameters, Sex};

/// Multiple of the growth duration past the inflection at which the curve
/// must be close to saturation.
const SATURATION_OFFSET: f64 = 3.0;

/// Smallest `inflection_age / growth_duration` ratio that keeps the birth
/// weight at or below 10% of adult weight: `W(0)/W = exp(-exp(c/b))`, so the
/// bound is `ln(ln 10) ≈ 0.834032`, rounded up.
pub const MIN_INFLECTION_RATIO: f64 = 0.834_033;

/// Biological ranges for the Gompertz parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterBounds {
    /// Adult weight range in kilograms
    pub adult_weight: (f64, f64),
    /// Growth duration range in days
    pub growth_duration: (f64, f64),
    /// Inflection age range in days
    pub inflection_age: (f64, f64),
}

impl Default for ParameterBounds {
    fn default() -> Self {
        Self {
            adult_weight: (0.5, 100.0),
            growth_duration: (10.0, 1000.0),
            inflection_age: (10.0, 800.0),
        }
    }
}

impl ParameterBounds {
    /// Default bounds with the adult weight narrowed to the breed's adult
    /// range for the given sex.
    pub fn for_profile(profile: &BreedProfile, sex: Sex) -> Self {
        let defaults = Self::default();
        let range = profile.adult_range(sex);
        let lo = range.min.max(defaults.adult_weight.0);
        let hi = range.max.min(defaults.adult_weight.1);
        let adult_weight = if lo <= hi { (lo, hi) } else { defaults.adult_weight };
        Self {
            adult_weight,
            ..defaults
        }
    }

    /// Pull parameters back into range. The inflection age is also held
    /// within `[MIN_INFLECTION_RATIO * b, 2 * b]`, so every clamped curve
    /// starts at no more than 10% of its adult weight.
    pub fn clamp(&self, params: GrowthCurveParameters) -> GrowthCurveParameters {
        let [w, b, c] = params.as_array();
        let w = clamp_finite(w, self.adult_weight);
        let max_duration = self
            .growth_duration
            .1
            .min(self.inflection_age.1 / MIN_INFLECTION_RATIO)
            .max(self.growth_duration.0);
        let b = clamp_finite(b, (self.growth_duration.0, max_duration));
        let lo = self
            .inflection_age
            .0
            .max(MIN_INFLECTION_RATIO * b)
            .min(self.inflection_age.1);
        let hi = self.inflection_age.1.min(2.0 * b).max(lo);
        let c = clamp_finite(c, (lo, hi));
        params.with_array([w, b, c])
    }

    pub fn contains(&self, params: &GrowthCurveParameters) -> bool {
        in_range(params.adult_weight, self.adult_weight)
            && in_range(params.growth_duration, self.growth_duration)
            && in_range(params.inflection_age, self.inflection_age)
            && params.inflection_age <= 2.0 * params.growth_duration
    }
}

fn clamp_finite(value: f64, (lo, hi): (f64, f64)) -> f64 {
    if value.is_nan() {
        lo
    } else {
        value.clamp(lo, hi)
    }
}

fn in_range(value: f64, (lo, hi): (f64, f64)) -> bool {
    (lo..=hi).contains(&value)
}

/// Reject fitted parameters that describe an implausible animal.
///
/// Checks the parameter ranges and three points on the curve: birth weight at
/// most 10% of adult weight, 30-50% of adult weight at the inflection, and at
/// least 90% well past the inflection. Never panics; non-finite input is
/// simply rejected.
pub fn is_biologically_plausible(params: &GrowthCurveParameters) -> bool {
    let [w, b, c] = params.as_array();
    if !(w.is_finite() && b.is_finite() && c.is_finite()) {
        return false;
    }
    if !ParameterBounds::default().contains(params) {
        return false;
    }

    let at_birth = params.weight_at(0.0);
    if at_birth > 0.1 * w {
        return false;
    }

    let at_inflection = params.weight_at(c);
    if !(0.3 * w..=0.5 * w).contains(&at_inflection) {
        return false;
    }

    params.weight_at(c + SATURATION_OFFSET * b) >= 0.9 * w
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BreedCategory, BreedTable};

    fn params(w: f64, b: f64, c: f64) -> GrowthCurveParameters {
        GrowthCurveParameters {
            adult_weight: w,
            growth_duration: b,
            inflection_age: c,
            fit_quality: 0.9,
            confidence: 0.9,
        }
    }

    #[test]
    fn test_typical_labrador_curve_is_plausible() {
        assert!(is_biologically_plausible(&params(30.0, 60.0, 90.0)));
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(!is_biologically_plausible(&params(0.4, 60.0, 90.0)));
        assert!(!is_biologically_plausible(&params(120.0, 60.0, 90.0)));
        assert!(!is_biologically_plausible(&params(30.0, 5.0, 9.0)));
        assert!(!is_biologically_plausible(&params(30.0, 1200.0, 90.0)));
        assert!(!is_biologically_plausible(&params(30.0, 500.0, 900.0)));
    }

    #[test]
    fn test_rejects_inflection_beyond_twice_duration() {
        assert!(!is_biologically_plausible(&params(30.0, 20.0, 45.0)));
    }

    #[test]
    fn test_rejects_heavy_birth_weight() {
        // c/b = 0.5 puts W(0) near 19% of adult weight
        assert!(!is_biologically_plausible(&params(20.0, 200.0, 100.0)));
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(!is_biologically_plausible(&params(f64::NAN, 60.0, 90.0)));
        assert!(!is_biologically_plausible(&params(30.0, f64::INFINITY, 90.0)));
    }

    #[test]
    fn test_clamp_enforces_ranges_and_ratio() {
        let bounds = ParameterBounds::default();
        let clamped = bounds.clamp(params(500.0, 20.0, 700.0));
        assert_eq!(clamped.adult_weight, 100.0);
        assert_eq!(clamped.growth_duration, 20.0);
        assert_eq!(clamped.inflection_age, 40.0);
        assert!(bounds.contains(&clamped));

        let low = bounds.clamp(params(f64::NAN, 1.0, -5.0));
        assert_eq!(low.adult_weight, 0.5);
        assert_eq!(low.growth_duration, 10.0);
        assert_eq!(low.inflection_age, 10.0);
    }

    #[test]
    fn test_clamp_lifts_heavy_birth_weight() {
        let bounds = ParameterBounds::default();
        let heavy = params(20.0, 200.0, 100.0);
        assert!(!is_biologically_plausible(&heavy));

        let clamped = bounds.clamp(heavy);
        assert_eq!(clamped.growth_duration, 200.0);
        assert!((clamped.inflection_age - 200.0 * MIN_INFLECTION_RATIO).abs() < 1e-9);
        assert!(clamped.weight_at(0.0) <= 0.1 * clamped.adult_weight);
        assert!(is_biologically_plausible(&clamped));
    }

    #[test]
    fn test_clamp_keeps_long_durations_inside_inflection_range() {
        let bounds = ParameterBounds::default();
        let clamped = bounds.clamp(params(30.0, 1000.0, 10.0));
        assert!(clamped.growth_duration < 960.0);
        assert!(bounds.contains(&clamped));
        assert!(is_biologically_plausible(&clamped));
    }

    #[test]
    fn test_every_clamped_curve_is_plausible() {
        let bounds = ParameterBounds::default();
        for w in [0.5, 3.0, 30.0, 100.0] {
            for b in [1.0, 10.0, 55.0, 400.0, 2000.0] {
                for c in [-5.0, 10.0, 60.0, 300.0, 900.0] {
                    let clamped = bounds.clamp(params(w, b, c));
                    assert!(is_biologically_plausible(&clamped), "{w} {b} {c}: {clamped:?}");
                }
            }
        }
    }

    #[test]
    fn test_bounds_for_profile_narrow_adult_weight() {
        let profile = BreedTable::default().profile(BreedCategory::Large);
        let bounds = ParameterBounds::for_profile(&profile, Sex::Female);
        assert_eq!(bounds.adult_weight, (22.0, 40.0));
        assert_eq!(bounds.growth_duration, (10.0, 1000.0));
    }

    #[test]
    fn test_bounds_for_profile_respect_global_limits() {
        let mut profile = BreedTable::default().profile(BreedCategory::Giant);
        profile.male.max = 140.0;
        let bounds = ParameterBounds::for_profile(&profile, Sex::Male);
        assert_eq!(bounds.adult_weight, (45.0, 100.0));
    }
}
