mod observation;
mod breed;
mod parameters;
mod prediction;

pub use observation::{Sex, WeightObservation};
pub use breed::{
    BreedCategory, BreedProfile, BreedTable, CategoryProfile, PhaseThresholds, WeightRange,
    DAYS_PER_MONTH, WEEKS_PER_MONTH,
};
pub use parameters::{gompertz, FitQuality, GrowthCurveParameters};
pub use prediction::{
    ConfidenceBand, GrowthPhase, GrowthPredictionResult, PointKind, PredictionPoint,
    PredictionSource,
};
