use serde::{Deserialize, Serialize};

use super::observation::Sex;
use crate::error::GrowthError;

/// Average days per month used to convert maturity ages.
pub const DAYS_PER_MONTH: f64 = 30.4375;

/// Weeks per month used by the growth-phase thresholds.
pub const WEEKS_PER_MONTH: f64 = 4.33;

/// Size category of a breed, ordered from smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreedCategory {
    Toy,
    Small,
    Medium,
    Large,
    Giant,
}

impl BreedCategory {
    /// All categories, smallest first.
    pub const ALL: [BreedCategory; 5] = [
        BreedCategory::Toy,
        BreedCategory::Small,
        BreedCategory::Medium,
        BreedCategory::Large,
        BreedCategory::Giant,
    ];
}

impl std::fmt::Display for BreedCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BreedCategory::Toy => write!(f, "toy"),
            BreedCategory::Small => write!(f, "small"),
            BreedCategory::Medium => write!(f, "medium"),
            BreedCategory::Large => write!(f, "large"),
            BreedCategory::Giant => write!(f, "giant"),
        }
    }
}

impl std::str::FromStr for BreedCategory {
    type Err = GrowthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "toy" => Ok(BreedCategory::Toy),
            "small" => Ok(BreedCategory::Small),
            "medium" => Ok(BreedCategory::Medium),
            "large" => Ok(BreedCategory::Large),
            "giant" => Ok(BreedCategory::Giant),
            _ => Err(GrowthError::ParseError(format!(
                "Unknown breed category: '{s}'"
            ))),
        }
    }
}

/// Inclusive weight range in kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightRange {
    pub min: f64,
    pub max: f64,
}

impl WeightRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, weight: f64) -> bool {
        (self.min..=self.max).contains(&weight)
    }

    pub fn clamp(&self, weight: f64) -> f64 {
        weight.clamp(self.min, self.max)
    }
}

/// Age in weeks at which each growth phase ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseThresholds {
    pub rapid_growth_end_weeks: f64,
    pub steady_growth_end_weeks: f64,
    pub slowing_growth_end_weeks: f64,
}

/// Expected adult size and maturation age of a breed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedProfile {
    /// Display name, e.g. "Labrador Retriever" or "medium (estimated)"
    pub name: String,
    pub category: BreedCategory,
    /// Adult weight range for males in kilograms
    pub male: WeightRange,
    /// Adult weight range for females in kilograms
    pub female: WeightRange,
    /// Age at which the breed reaches adult weight
    pub maturity_months: f64,
}

impl BreedProfile {
    pub fn adult_range(&self, sex: Sex) -> WeightRange {
        match sex {
            Sex::Male => self.male,
            Sex::Female => self.female,
        }
    }

    pub fn maturity_days(&self) -> f64 {
        self.maturity_months * DAYS_PER_MONTH
    }

    pub fn maturity_weeks(&self) -> f64 {
        self.maturity_months * WEEKS_PER_MONTH
    }
}

/// One row of the breed reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfile {
    pub category: BreedCategory,
    pub male: WeightRange,
    pub female: WeightRange,
    pub maturity_months: f64,
    /// Inflection age as a fraction of the maturity age
    pub inflection_fraction: f64,
    pub phases: PhaseThresholds,
}

impl CategoryProfile {
    /// Built-in reference values for a category.
    pub fn builtin(category: BreedCategory) -> Self {
        let (male, female, maturity_months, inflection_fraction, weeks) = match category {
            BreedCategory::Toy => ((2.0, 5.0), (1.5, 4.5), 10.0, 0.25, (12.0, 24.0, 32.0)),
            BreedCategory::Small => ((5.0, 10.0), (4.0, 9.0), 12.0, 0.30, (14.0, 28.0, 40.0)),
            BreedCategory::Medium => ((10.0, 25.0), (8.0, 22.0), 15.0, 0.35, (16.0, 32.0, 52.0)),
            BreedCategory::Large => ((25.0, 45.0), (22.0, 40.0), 18.0, 0.40, (20.0, 40.0, 64.0)),
            BreedCategory::Giant => ((45.0, 90.0), (40.0, 80.0), 24.0, 0.45, (24.0, 48.0, 80.0)),
        };
        Self {
            category,
            male: WeightRange::new(male.0, male.1),
            female: WeightRange::new(female.0, female.1),
            maturity_months,
            inflection_fraction,
            phases: PhaseThresholds {
                rapid_growth_end_weeks: weeks.0,
                steady_growth_end_weeks: weeks.1,
                slowing_growth_end_weeks: weeks.2,
            },
        }
    }

    /// A breed profile that stands for the whole category.
    pub fn to_breed_profile(&self) -> BreedProfile {
        BreedProfile {
            name: self.category.to_string(),
            category: self.category,
            male: self.male,
            female: self.female,
            maturity_months: self.maturity_months,
        }
    }

    fn validate(&self) -> Result<(), GrowthError> {
        for (label, range) in [("male", self.male), ("female", self.female)] {
            if !(range.min > 0.0 && range.min < range.max) {
                return Err(GrowthError::ValidationError(format!(
                    "{}: {label} adult range must satisfy 0 < min < max, got {}..{}",
                    self.category, range.min, range.max
                )));
            }
        }
        if self.maturity_months <= 0.0 {
            return Err(GrowthError::ValidationError(format!(
                "{}: maturity_months must be positive, got {}",
                self.category, self.maturity_months
            )));
        }
        if !(self.inflection_fraction > 0.0 && self.inflection_fraction < 1.0) {
            return Err(GrowthError::ValidationError(format!(
                "{}: inflection_fraction must be in (0, 1), got {}",
                self.category, self.inflection_fraction
            )));
        }
        let p = &self.phases;
        if !(p.rapid_growth_end_weeks > 0.0
            && p.rapid_growth_end_weeks < p.steady_growth_end_weeks
            && p.steady_growth_end_weeks < p.slowing_growth_end_weeks)
        {
            return Err(GrowthError::ValidationError(format!(
                "{}: phase thresholds must be strictly increasing",
                self.category
            )));
        }
        Ok(())
    }
}

/// Read-only breed reference data shared by breed estimation, parameter
/// seeding and phase classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedTable {
    pub categories: Vec<CategoryProfile>,
}

impl Default for BreedTable {
    fn default() -> Self {
        Self {
            categories: BreedCategory::ALL
                .iter()
                .map(|c| CategoryProfile::builtin(*c))
                .collect(),
        }
    }
}

impl BreedTable {
    /// Look up a category, falling back to the built-in row when the table
    /// does not carry it.
    pub fn category(&self, category: BreedCategory) -> CategoryProfile {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .cloned()
            .unwrap_or_else(|| CategoryProfile::builtin(category))
    }

    pub fn profile(&self, category: BreedCategory) -> BreedProfile {
        self.category(category).to_breed_profile()
    }

    /// Categories ordered smallest first.
    pub fn sorted(&self) -> Vec<&CategoryProfile> {
        let mut rows: Vec<&CategoryProfile> = self.categories.iter().collect();
        rows.sort_by_key(|c| c.category);
        rows
    }

    /// Check that every category appears exactly once and carries sane values.
    pub fn validate(&self) -> Result<(), GrowthError> {
        for category in BreedCategory::ALL {
            let count = self
                .categories
                .iter()
                .filter(|c| c.category == category)
                .count();
            if count != 1 {
                return Err(GrowthError::ValidationError(format!(
                    "breed table must list category '{category}' exactly once, found {count}"
                )));
            }
        }
        for row in &self.categories {
            row.validate()?;
        }
        Ok(())
    }
}
