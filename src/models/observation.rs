use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::GrowthError;

/// Sex of the animal. Adult weight ranges and growth duration differ by sex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sex::Male => write!(f, "male"),
            Sex::Female => write!(f, "female"),
        }
    }
}

impl std::str::FromStr for Sex {
    type Err = GrowthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            _ => Err(GrowthError::ParseError(format!("Unknown sex: '{s}'"))),
        }
    }
}

/// A single weighing of the animal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightObservation {
    /// Date of the weighing
    pub date: NaiveDate,
    /// Weight in kilograms
    pub weight: f64,
}

impl WeightObservation {
    pub fn new(date: NaiveDate, weight: f64) -> Self {
        Self { date, weight }
    }

    /// Whole days between the birth date and this weighing. Negative when the
    /// observation predates the birth date.
    pub fn age_in_days(&self, birth_date: NaiveDate) -> i64 {
        (self.date - birth_date).num_days()
    }

    /// Validate the measurement. Returns `GrowthError::ValidationError` on failure.
    pub fn validate(&self) -> Result<(), GrowthError> {
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(GrowthError::ValidationError(format!(
                "{}: weight must be a positive number of kilograms, got {}",
                self.date, self.weight
            )));
        }
        Ok(())
    }
}
