use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::GrowthError;
use crate::models::{GrowthPredictionResult, WeightObservation};

/// CSV row structure for a weighing.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct ObservationRow {
    date: NaiveDate,
    #[serde(alias = "weight_kg")]
    weight: f64,
}

/// CSV row structure for an exported prediction point.
#[derive(Debug, serde::Serialize)]
struct PredictionRow {
    date: NaiveDate,
    age_in_days: i64,
    weight: f64,
    kind: String,
    lower: Option<f64>,
    upper: Option<f64>,
}

fn parse_csv_records<R: Read>(
    rdr: &mut csv::Reader<R>,
) -> Result<Vec<WeightObservation>, GrowthError> {
    let mut observations = Vec::new();

    for result in rdr.deserialize() {
        let row: ObservationRow = result?;
        let observation = WeightObservation::new(row.date, row.weight);
        observation.validate()?;
        observations.push(observation);
    }

    observations.sort_by_key(|o| o.date);
    Ok(observations)
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).flexible(true).trim(csv::Trim::All);
    builder
}

/// Read weight observations (`date,weight` columns) from a CSV file.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Vec<WeightObservation>, GrowthError> {
    let mut rdr = reader_builder().from_path(path.as_ref())?;
    parse_csv_records(&mut rdr)
}

/// Write every point of a prediction to a CSV file. Bounds are filled in for
/// predicted points only.
pub fn write_csv(result: &GrowthPredictionResult, path: impl AsRef<Path>) -> Result<(), GrowthError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;

    let mut band_index = 0;
    for point in &result.predictions {
        let (lower, upper) = if point.is_predicted() {
            let bounds = (
                result.confidence_band.lower.get(band_index).copied(),
                result.confidence_band.upper.get(band_index).copied(),
            );
            band_index += 1;
            bounds
        } else {
            (None, None)
        };
        wtr.serialize(PredictionRow {
            date: point.date,
            age_in_days: point.age_in_days,
            weight: point.weight,
            kind: point.kind.to_string(),
            lower,
            upper,
        })?;
    }

    wtr.flush()?;
    Ok(())
}
