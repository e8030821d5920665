//! Growth prediction example: fit a curve to a sample weight log and compare
//! the estimated breed against an explicit one.
//!
//! Run from the project root:
//!   cargo run --example predict_growth

use std::path::Path;

use chrono::NaiveDate;
use puppy_growth::io::{CsvFormat, ObservationReader};
use puppy_growth::models::{BreedCategory, Sex};
use puppy_growth::visualization::{print_prediction_summary, print_weight_chart};
use puppy_growth::{GrowthConfig, GrowthEngine};

fn main() {
    let path = Path::new("data/samples/sample_weights.csv");
    let observations = CsvFormat.read(path).expect("Failed to read CSV file");
    let birth_date = NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date");

    let config = GrowthConfig::default();
    let engine = GrowthEngine::new(&config);

    // Breed estimated from the latest weighing
    println!("\n=== Estimated Breed ===");
    match engine.predict(&observations, birth_date, None, Sex::Male) {
        Ok(result) => {
            print_prediction_summary(&result);
            print_weight_chart(&result);
        }
        Err(e) => eprintln!("Prediction failed: {e}"),
    }

    // Explicit giant-breed female
    println!("\n=== Giant Breed (female) ===");
    let giant = config.breeds.profile(BreedCategory::Giant);
    match engine.predict(&observations, birth_date, Some(&giant), Sex::Female) {
        Ok(result) => print_prediction_summary(&result),
        Err(e) => eprintln!("Prediction failed: {e}"),
    }
}
