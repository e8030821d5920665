use crate::models::{BreedProfile, GrowthCurveParameters, Sex};

/// Extra growth duration in days assumed for males.
pub const MALE_DURATION_OFFSET_DAYS: f64 = 8.0;

/// Seed the optimizer from a breed profile.
///
/// - adult weight: midpoint of the sex-specific adult range
/// - growth duration: half the maturity age in days, plus 8 days for males
/// - inflection age: maturity age times the category's inflection fraction
///
/// No validation happens here.
pub fn initial_parameters(
    profile: &BreedProfile,
    sex: Sex,
    inflection_fraction: f64,
) -> GrowthCurveParameters {
    let maturity_days = profile.maturity_days();
    let sex_offset = match sex {
        Sex::Male => MALE_DURATION_OFFSET_DAYS,
        Sex::Female => 0.0,
    };
    GrowthCurveParameters {
        adult_weight: profile.adult_range(sex).midpoint(),
        growth_duration: maturity_days * 0.5 + sex_offset,
        inflection_age: maturity_days * inflection_fraction,
        fit_quality: 0.0,
        confidence: 0.0,
    }
}
