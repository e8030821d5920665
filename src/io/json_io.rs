use std::path::Path;

use crate::error::GrowthError;
use crate::models::{GrowthPredictionResult, WeightObservation};

fn parse_observations(content: &str) -> Result<Vec<WeightObservation>, GrowthError> {
    let mut observations: Vec<WeightObservation> = serde_json::from_str(content)?;
    for observation in &observations {
        observation.validate()?;
    }
    observations.sort_by_key(|o| o.date);
    Ok(observations)
}

/// Read weight observations from a JSON file holding an array of
/// `{"date": "YYYY-MM-DD", "weight": kg}` objects.
pub fn read_json(path: impl AsRef<Path>) -> Result<Vec<WeightObservation>, GrowthError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse_observations(&content)
}

/// Write a prediction result to a JSON file.
pub fn write_json(
    result: &GrowthPredictionResult,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), GrowthError> {
    let content = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    std::fs::write(path.as_ref(), content)?;
    Ok(())
}
