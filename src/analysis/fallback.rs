use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::fitter::{evaluate_fit, GrowthSample};
use super::predictor::confidence_bounds;
use crate::error::GrowthError;
use crate::models::{BreedProfile, ConfidenceBand, FitQuality, PointKind, PredictionPoint, Sex};

/// Weekly growth rate is kept within this range (kg/week).
pub const WEEKLY_RATE_RANGE: (f64, f64) = (0.01, 0.5);
/// Number of weekly points projected forward.
pub const HORIZON_WEEKS: u32 = 26;
/// Share of the growth rate that remains once maturity is reached.
pub const RESIDUAL_GROWTH: f64 = 0.2;
/// Confidence used for the fallback's bands.
pub const FALLBACK_CONFIDENCE: f64 = 0.7;

/// Output of the slope-based projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearProjection {
    /// Clamped average growth rate in kg/week
    pub weekly_rate: f64,
    pub points: Vec<PredictionPoint>,
    pub band: ConfidenceBand,
    /// Weight reached at maturity, within the breed's adult range
    pub adult_weight: f64,
    pub maturity_age_days: i64,
    pub quality: FitQuality,
}

/// Average weekly gain between the first and last sample, clamped to
/// [`WEEKLY_RATE_RANGE`]. Samples must be sorted by age.
pub fn weekly_growth_rate(samples: &[GrowthSample]) -> f64 {
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return WEEKLY_RATE_RANGE.0;
    };
    let weeks = (last.age_in_days - first.age_in_days) / 7.0;
    let raw = if weeks > 0.0 {
        (last.weight - first.weight) / weeks
    } else {
        WEEKLY_RATE_RANGE.0
    };
    raw.clamp(WEEKLY_RATE_RANGE.0, WEEKLY_RATE_RANGE.1)
}

/// Fraction of the growth rate still applied at `age_weeks`: falls linearly
/// from 1 at birth to [`RESIDUAL_GROWTH`] at maturity.
pub fn slowing_factor(age_weeks: f64, maturity_weeks: f64) -> f64 {
    let progress = if maturity_weeks > 0.0 {
        (age_weeks / maturity_weeks).clamp(0.0, 1.0)
    } else {
        1.0
    };
    1.0 - (1.0 - RESIDUAL_GROWTH) * progress
}

/// Project weight forward [`HORIZON_WEEKS`] weeks from the latest sample.
///
/// Growth slows toward maturity and never exceeds the breed's maximum adult
/// weight (or the current weight, if already heavier).
pub fn project_linear(
    samples: &[GrowthSample],
    birth_date: NaiveDate,
    profile: &BreedProfile,
    sex: Sex,
) -> Result<LinearProjection, GrowthError> {
    if samples.len() < 2 {
        return Err(GrowthError::InsufficientData(format!(
            "Need at least 2 weight observations, got {}",
            samples.len()
        )));
    }
    let first = samples[0];
    let last = samples[samples.len() - 1];

    let rate = weekly_growth_rate(samples);
    let maturity_weeks = profile.maturity_weeks();
    let range = profile.adult_range(sex);
    let cap = range.max.max(last.weight);
    let current_age = last.age_in_days.round() as i64;

    let mut points = Vec::with_capacity(HORIZON_WEEKS as usize);
    let mut band = ConfidenceBand::default();
    let mut weight = last.weight;
    for week in 1..=HORIZON_WEEKS {
        let days_ahead = 7 * i64::from(week);
        let age = current_age + days_ahead;
        weight = (weight + rate * slowing_factor(age as f64 / 7.0, maturity_weeks)).min(cap);
        let (lower, upper) = confidence_bounds(FALLBACK_CONFIDENCE, weight, days_ahead as f64);
        points.push(PredictionPoint {
            date: birth_date + Duration::days(age),
            age_in_days: age,
            weight,
            kind: PointKind::Predicted,
        });
        band.push(lower, upper);
    }

    let mut adult = weight;
    let mut age_weeks = (current_age as f64 / 7.0) + f64::from(HORIZON_WEEKS);
    while age_weeks < maturity_weeks {
        age_weeks += 1.0;
        adult = (adult + rate * slowing_factor(age_weeks, maturity_weeks)).min(cap);
    }
    let adult_weight = range.clamp(adult);

    let quality = evaluate_fit(samples, |age| {
        first.weight + rate * (age - first.age_in_days) / 7.0
    });
    let maturity_age_days = (profile.maturity_days().round() as i64).max(current_age);

    debug!(
        rate,
        adult_weight,
        horizon_weeks = HORIZON_WEEKS,
        "linear projection computed"
    );

    Ok(LinearProjection {
        weekly_rate: rate,
        points,
        band,
        adult_weight,
        maturity_age_days,
        quality,
    })
}
