use tracing::debug;

use crate::models::{BreedCategory, BreedProfile, BreedTable, Sex};

/// Age in days by which growth progress is taken as complete (1.5 years).
const FULL_PROGRESS_DAYS: f64 = 1.5 * 365.0;
/// Progress is never assumed beyond this fraction.
const MAX_PROGRESS: f64 = 0.9;
/// Fraction of adult weight at the Gompertz inflection (1/e).
const INFLECTION_FRACTION: f64 = 0.368;

/// Estimate a breed profile from the animal's current weight and age.
///
/// Treats the animal as partway along a Gompertz curve: progress is
/// `min(0.9, age / 1.5 years)` and the saturation fraction is
/// `0.368 + 0.632 * progress`. The estimated adult weight is the current
/// weight divided by that fraction. Returns the smallest category whose
/// adult maximum covers the estimate, or the largest category.
pub fn estimate_breed(
    table: &BreedTable,
    current_weight: f64,
    age_in_days: f64,
    sex: Sex,
) -> BreedProfile {
    let progress = (age_in_days.max(0.0) / FULL_PROGRESS_DAYS).min(MAX_PROGRESS);
    let fraction = INFLECTION_FRACTION + (1.0 - INFLECTION_FRACTION) * progress;
    let estimated_adult = current_weight / fraction;

    let rows = table.sorted();
    let row = rows
        .iter()
        .find(|row| {
            let range = match sex {
                Sex::Male => row.male,
                Sex::Female => row.female,
            };
            estimated_adult <= range.max
        })
        .or_else(|| rows.last())
        .map(|row| (*row).clone())
        .unwrap_or_else(|| table.category(BreedCategory::Giant));

    debug!(
        current_weight,
        age_in_days,
        estimated_adult,
        category = %row.category,
        "estimated breed category"
    );

    let mut profile = row.to_breed_profile();
    profile.name = format!("{} (estimated)", row.category);
    profile
}

/// Use the explicit profile when given, otherwise estimate one.
pub fn resolve_breed(
    table: &BreedTable,
    explicit: Option<&BreedProfile>,
    current_weight: f64,
    age_in_days: f64,
    sex: Sex,
) -> BreedProfile {
    match explicit {
        Some(profile) => profile.clone(),
        None => estimate_breed(table, current_weight, age_in_days, sex),
    }
}
