pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod visualization;

pub use analysis::{predict_growth, GrowthEngine};
pub use config::GrowthConfig;
pub use error::GrowthError;
pub use io::{ObservationReader, PredictionWriter};
pub use models::{
    BreedCategory, BreedProfile, BreedTable, GrowthPhase, GrowthPredictionResult, Sex,
    WeightObservation,
};
