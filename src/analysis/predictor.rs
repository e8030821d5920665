use chrono::{Duration, NaiveDate};

use crate::models::{ConfidenceBand, GrowthCurveParameters, PointKind, PredictionPoint};

/// Default spacing of predicted points in days.
pub const DEFAULT_STEP_DAYS: u32 = 7;

/// No bound is reported below this weight in kilograms.
pub const MIN_BOUND_WEIGHT: f64 = 0.01;

const DAYS_PER_YEAR: f64 = 365.0;

/// Half-width of the confidence interval around a prediction. Widens
/// linearly with the forecast horizon.
pub fn confidence_interval(confidence: f64, predicted_weight: f64, years_ahead: f64) -> f64 {
    confidence * (1.0 + 0.2 * years_ahead.max(0.0)) * 0.15 * predicted_weight
}

/// `(lower, upper)` bounds for a prediction made `days_ahead` past the
/// latest observation.
pub fn confidence_bounds(confidence: f64, predicted_weight: f64, days_ahead: f64) -> (f64, f64) {
    let interval = confidence_interval(confidence, predicted_weight, days_ahead / DAYS_PER_YEAR);
    (
        (predicted_weight - interval).max(MIN_BOUND_WEIGHT),
        (predicted_weight + interval).max(MIN_BOUND_WEIGHT),
    )
}

/// Evaluate the fitted curve from `start_age` to `end_age` (inclusive, in
/// days) every `step_days`, with a parallel confidence band.
pub fn predict_curve(
    params: &GrowthCurveParameters,
    birth_date: NaiveDate,
    current_age: i64,
    start_age: i64,
    end_age: i64,
    step_days: u32,
) -> (Vec<PredictionPoint>, ConfidenceBand) {
    let step = i64::from(step_days.max(1));
    let mut points = Vec::new();
    let mut band = ConfidenceBand::default();

    let mut age = start_age;
    while age <= end_age {
        let weight = params.weight_at(age as f64);
        let (lower, upper) =
            confidence_bounds(params.confidence, weight, (age - current_age) as f64);
        points.push(PredictionPoint {
            date: birth_date + Duration::days(age),
            age_in_days: age,
            weight,
            kind: PointKind::Predicted,
        });
        band.push(lower, upper);
        age += step;
    }

    (points, band)
}
