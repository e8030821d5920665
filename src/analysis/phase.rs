use crate::models::{BreedProfile, BreedTable, GrowthPhase};

/// Classify the growth phase at an age, using the category's week thresholds
/// from the breed table and the profile's maturity age.
///
/// Each threshold belongs to the following phase: a toy breed at exactly 12
/// weeks is already in steady growth.
pub fn classify_phase(age_in_days: f64, profile: &BreedProfile, table: &BreedTable) -> GrowthPhase {
    let weeks = age_in_days.max(0.0) / 7.0;
    let thresholds = table.category(profile.category).phases;

    if weeks < thresholds.rapid_growth_end_weeks {
        GrowthPhase::RapidGrowth
    } else if weeks < thresholds.steady_growth_end_weeks {
        GrowthPhase::SteadyGrowth
    } else if weeks < thresholds.slowing_growth_end_weeks {
        GrowthPhase::SlowingGrowth
    } else if weeks > profile.maturity_weeks() {
        GrowthPhase::Adult
    } else {
        GrowthPhase::ApproachingAdult
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BreedCategory;

    fn classify(weeks: f64, category: BreedCategory) -> GrowthPhase {
        let table = BreedTable::default();
        classify_phase(weeks * 7.0, &table.profile(category), &table)
    }

    #[test]
    fn test_toy_boundaries() {
        assert_eq!(classify(0.0, BreedCategory::Toy), GrowthPhase::RapidGrowth);
        assert_eq!(classify(11.9, BreedCategory::Toy), GrowthPhase::RapidGrowth);
        assert_eq!(classify(12.0, BreedCategory::Toy), GrowthPhase::SteadyGrowth);
        assert_eq!(classify(24.0, BreedCategory::Toy), GrowthPhase::SlowingGrowth);
        assert_eq!(classify(32.0, BreedCategory::Toy), GrowthPhase::ApproachingAdult);
        // Toy maturity: 10 months * 4.33 = 43.3 weeks
        assert_eq!(classify(43.0, BreedCategory::Toy), GrowthPhase::ApproachingAdult);
        assert_eq!(classify(44.0, BreedCategory::Toy), GrowthPhase::Adult);
    }

    #[test]
    fn test_giant_boundaries() {
        assert_eq!(classify(23.0, BreedCategory::Giant), GrowthPhase::RapidGrowth);
        assert_eq!(classify(24.0, BreedCategory::Giant), GrowthPhase::SteadyGrowth);
        assert_eq!(classify(48.0, BreedCategory::Giant), GrowthPhase::SlowingGrowth);
        assert_eq!(classify(80.0, BreedCategory::Giant), GrowthPhase::ApproachingAdult);
        assert_eq!(classify(104.0, BreedCategory::Giant), GrowthPhase::Adult);
    }

    #[test]
    fn test_phases_are_monotonic_in_age() {
        for category in BreedCategory::ALL {
            let mut previous = GrowthPhase::RapidGrowth;
            for week in 0..150 {
                let phase = classify(week as f64, category);
                assert!(phase >= previous, "{category} week {week}");
                previous = phase;
            }
            assert_eq!(previous, GrowthPhase::Adult);
        }
    }

    #[test]
    fn test_custom_table_thresholds() {
        let mut table = BreedTable::default();
        table.categories[0].phases.rapid_growth_end_weeks = 8.0;
        let profile = table.profile(BreedCategory::Toy);
        assert_eq!(classify_phase(63.0, &profile, &table), GrowthPhase::SteadyGrowth);
    }

    #[test]
    fn test_negative_age_is_rapid_growth() {
        let table = BreedTable::default();
        let profile = table.profile(BreedCategory::Medium);
        assert_eq!(classify_phase(-10.0, &profile, &table), GrowthPhase::RapidGrowth);
    }
}
