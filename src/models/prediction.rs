use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::breed::BreedProfile;
use super::parameters::{FitQuality, GrowthCurveParameters};

/// Whether a point was measured or forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    Observed,
    Predicted,
}

impl std::fmt::Display for PointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointKind::Observed => write!(f, "observed"),
            PointKind::Predicted => write!(f, "predicted"),
        }
    }
}

/// A weight on the growth timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    pub date: NaiveDate,
    pub age_in_days: i64,
    /// Weight in kilograms
    pub weight: f64,
    pub kind: PointKind,
}

impl PredictionPoint {
    pub fn is_observed(&self) -> bool {
        self.kind == PointKind::Observed
    }

    pub fn is_predicted(&self) -> bool {
        self.kind == PointKind::Predicted
    }
}

/// Upper and lower bounds, parallel to the predicted points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBand {
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

impl ConfidenceBand {
    pub fn len(&self) -> usize {
        self.upper.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upper.is_empty()
    }

    pub fn push(&mut self, lower: f64, upper: f64) {
        self.lower.push(lower);
        self.upper.push(upper);
    }

    /// Width of the band at index `i`.
    pub fn width(&self, i: usize) -> Option<f64> {
        Some(self.upper.get(i)? - self.lower.get(i)?)
    }
}

/// Where the animal currently sits on its growth curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrowthPhase {
    RapidGrowth,
    SteadyGrowth,
    SlowingGrowth,
    ApproachingAdult,
    Adult,
}

impl std::fmt::Display for GrowthPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrowthPhase::RapidGrowth => write!(f, "rapid-growth"),
            GrowthPhase::SteadyGrowth => write!(f, "steady-growth"),
            GrowthPhase::SlowingGrowth => write!(f, "slowing-growth"),
            GrowthPhase::ApproachingAdult => write!(f, "approaching-adult"),
            GrowthPhase::Adult => write!(f, "adult"),
        }
    }
}

/// Which model produced the forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PredictionSource {
    /// Nonlinear Gompertz fit that passed biological validation
    GompertzFit,
    /// Slope-based projection used when the fit was rejected
    LinearFallback,
}

impl std::fmt::Display for PredictionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictionSource::GompertzFit => write!(f, "Gompertz fit"),
            PredictionSource::LinearFallback => write!(f, "linear fallback"),
        }
    }
}

/// Complete output of a growth prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthPredictionResult {
    /// Observed points first (sorted by date), then predicted points
    pub predictions: Vec<PredictionPoint>,
    pub fit_quality: FitQuality,
    /// Predicted adult weight in kilograms
    pub predicted_adult_weight: f64,
    /// Estimated age in days at which adult weight is reached
    pub estimated_maturity_age_days: i64,
    pub confidence_band: ConfidenceBand,
    pub current_growth_phase: GrowthPhase,
    /// Expected gain over the next week in kilograms
    pub current_weekly_growth_rate: f64,
    pub breed: BreedProfile,
    pub source: PredictionSource,
    /// Fitted curve, present only when `source` is `GompertzFit`
    pub parameters: Option<GrowthCurveParameters>,
}

impl GrowthPredictionResult {
    pub fn observed_points(&self) -> impl Iterator<Item = &PredictionPoint> {
        self.predictions.iter().filter(|p| p.is_observed())
    }

    pub fn predicted_points(&self) -> impl Iterator<Item = &PredictionPoint> {
        self.predictions.iter().filter(|p| p.is_predicted())
    }

    /// Latest observed point.
    pub fn current(&self) -> Option<&PredictionPoint> {
        self.observed_points().last()
    }

    /// Weight at an age, interpolated linearly between the neighbouring
    /// points. `None` outside the covered age range.
    pub fn weight_at_age(&self, age_in_days: i64) -> Option<f64> {
        let mut previous: Option<&PredictionPoint> = None;
        for point in &self.predictions {
            if point.age_in_days == age_in_days {
                return Some(point.weight);
            }
            if point.age_in_days > age_in_days {
                let prev = previous?;
                let span = (point.age_in_days - prev.age_in_days) as f64;
                if span <= 0.0 {
                    return Some(point.weight);
                }
                let t = (age_in_days - prev.age_in_days) as f64 / span;
                return Some(prev.weight + t * (point.weight - prev.weight));
            }
            previous = Some(point);
        }
        None
    }
}
