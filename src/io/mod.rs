mod csv_io;
mod json_io;

use std::path::Path;

use crate::error::GrowthError;
use crate::models::{GrowthPredictionResult, WeightObservation};

pub use csv_io::{read_csv, write_csv};
pub use json_io::{read_json, write_json};

/// Trait for reading weight observations from a file.
pub trait ObservationReader {
    fn read(&self, path: &Path) -> Result<Vec<WeightObservation>, GrowthError>;
}

/// Trait for writing a prediction result to a file.
pub trait PredictionWriter {
    fn write(&self, result: &GrowthPredictionResult, path: &Path) -> Result<(), GrowthError>;
}

/// CSV format reader/writer.
pub struct CsvFormat;

impl ObservationReader for CsvFormat {
    fn read(&self, path: &Path) -> Result<Vec<WeightObservation>, GrowthError> {
        read_csv(path)
    }
}

impl PredictionWriter for CsvFormat {
    fn write(&self, result: &GrowthPredictionResult, path: &Path) -> Result<(), GrowthError> {
        write_csv(result, path)
    }
}

/// JSON format reader/writer.
#[derive(Default)]
pub struct JsonFormat {
    pub pretty: bool,
}

impl ObservationReader for JsonFormat {
    fn read(&self, path: &Path) -> Result<Vec<WeightObservation>, GrowthError> {
        read_json(path)
    }
}

impl PredictionWriter for JsonFormat {
    fn write(&self, result: &GrowthPredictionResult, path: &Path) -> Result<(), GrowthError> {
        write_json(result, path, self.pretty)
    }
}
