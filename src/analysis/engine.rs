use chrono::NaiveDate;
use tracing::{info, warn};

use super::breed::resolve_breed;
use super::fallback::project_linear;
use super::fitter::{fit_growth_curve, samples_from_observations, CurveFit, GrowthSample};
use super::initializer::initial_parameters;
use super::phase::classify_phase;
use super::predictor::predict_curve;
use super::validator::{is_biologically_plausible, ParameterBounds};
use crate::config::GrowthConfig;
use crate::error::GrowthError;
use crate::models::{
    BreedProfile, GrowthPhase, GrowthPredictionResult, PointKind, PredictionPoint,
    PredictionSource, Sex, WeightObservation,
};

/// Share of adult weight taken as "grown".
const MATURITY_FRACTION: f64 = 0.95;

/// Growth prediction over a fixed configuration.
pub struct GrowthEngine<'a> {
    config: &'a GrowthConfig,
}

impl<'a> GrowthEngine<'a> {
    /// Create a new engine for the given configuration.
    pub fn new(config: &'a GrowthConfig) -> Self {
        Self { config }
    }

    /// Fit a growth curve to the observations and forecast forward.
    ///
    /// Observations before the birth date or with non-positive weight are
    /// ignored; fewer than two remaining is an `InsufficientData` error. When
    /// no breed is given it is estimated from the latest observation. A fit
    /// that fails biological validation, or whose RMSE exceeds
    /// `max_relative_rmse` of the mean observed weight, is replaced by the
    /// linear fallback.
    pub fn predict(
        &self,
        observations: &[WeightObservation],
        birth_date: NaiveDate,
        breed: Option<&BreedProfile>,
        sex: Sex,
    ) -> Result<GrowthPredictionResult, GrowthError> {
        let samples = samples_from_observations(observations, birth_date);
        let Some(current) = samples.last().copied().filter(|_| samples.len() >= 2) else {
            return Err(GrowthError::InsufficientData(format!(
                "Need at least 2 weight observations on or after the birth date, got {}",
                samples.len()
            )));
        };

        let table = &self.config.breeds;
        let profile = resolve_breed(table, breed, current.weight, current.age_in_days, sex);
        let inflection_fraction = table.category(profile.category).inflection_fraction;
        let initial = initial_parameters(&profile, sex, inflection_fraction);
        let bounds = ParameterBounds::for_profile(&profile, sex);
        let phase = classify_phase(current.age_in_days, &profile, table);

        let mut predictions = observed_points(observations, birth_date);

        let max_relative_rmse = self.config.fit.max_relative_rmse;
        match fit_growth_curve(&samples, &initial, &bounds, &self.config.fit) {
            Ok(fit) if !is_biologically_plausible(&fit.parameters) => warn!(
                adult_weight = fit.parameters.adult_weight,
                growth_duration = fit.parameters.growth_duration,
                inflection_age = fit.parameters.inflection_age,
                "fitted curve failed biological validation, using linear fallback"
            ),
            Ok(fit) if fit.relative_rmse(&samples) > max_relative_rmse => warn!(
                relative_rmse = fit.relative_rmse(&samples),
                max_relative_rmse,
                "fitted curve does not follow the observations, using linear fallback"
            ),
            Ok(fit) => {
                info!(
                    breed = %profile.name,
                    r_squared = fit.quality.r_squared,
                    relative_rmse = fit.relative_rmse(&samples),
                    "using Gompertz fit"
                );
                return Ok(self.curve_result(fit, predictions, &samples, birth_date, profile, phase));
            }
            Err(e) => warn!(error = %e, "curve fit failed, using linear fallback"),
        }

        let projection = project_linear(&samples, birth_date, &profile, sex)?;
        predictions.extend(projection.points);
        Ok(GrowthPredictionResult {
            predictions,
            fit_quality: projection.quality,
            predicted_adult_weight: projection.adult_weight,
            estimated_maturity_age_days: projection.maturity_age_days,
            confidence_band: projection.band,
            current_growth_phase: phase,
            current_weekly_growth_rate: projection.weekly_rate,
            breed: profile,
            source: PredictionSource::LinearFallback,
            parameters: None,
        })
    }

    /// Growth phase of an animal of the given age.
    pub fn classify(&self, age_in_days: f64, profile: &BreedProfile) -> GrowthPhase {
        classify_phase(age_in_days, profile, &self.config.breeds)
    }

    fn curve_result(
        &self,
        fit: CurveFit,
        mut predictions: Vec<PredictionPoint>,
        samples: &[GrowthSample],
        birth_date: NaiveDate,
        profile: BreedProfile,
        phase: GrowthPhase,
    ) -> GrowthPredictionResult {
        let params = fit.parameters;
        let current_age = samples
            .last()
            .map(|s| s.age_in_days.round() as i64)
            .unwrap_or_default();
        let forecast = &self.config.forecast;
        let step = i64::from(forecast.step_days.max(1));
        let horizon_end = current_age + 7 * i64::from(forecast.curve_horizon_weeks);
        let end_age = horizon_end.max(profile.maturity_days().round() as i64);

        let (points, band) = predict_curve(
            &params,
            birth_date,
            current_age,
            current_age + step,
            end_age,
            forecast.step_days,
        );
        predictions.extend(points);

        let now = current_age as f64;
        let weekly_rate = (params.weight_at(now + 7.0) - params.weight_at(now)).max(0.0);
        let maturity_age = params.age_at_fraction(MATURITY_FRACTION).round() as i64;

        GrowthPredictionResult {
            predictions,
            fit_quality: fit.quality,
            predicted_adult_weight: params.adult_weight,
            estimated_maturity_age_days: maturity_age.max(current_age),
            confidence_band: band,
            current_growth_phase: phase,
            current_weekly_growth_rate: weekly_rate,
            breed: profile,
            source: PredictionSource::GompertzFit,
            parameters: Some(params),
        }
    }
}

/// Predict growth with the built-in configuration.
pub fn predict_growth(
    observations: &[WeightObservation],
    birth_date: NaiveDate,
    breed: Option<&BreedProfile>,
    sex: Sex,
) -> Result<GrowthPredictionResult, GrowthError> {
    let config = GrowthConfig::default();
    GrowthEngine::new(&config).predict(observations, birth_date, breed, sex)
}

/// Usable observations as timeline points, sorted by date.
fn observed_points(observations: &[WeightObservation], birth_date: NaiveDate) -> Vec<PredictionPoint> {
    let mut points: Vec<PredictionPoint> = observations
        .iter()
        .filter(|o| o.age_in_days(birth_date) >= 0 && o.validate().is_ok())
        .map(|o| PredictionPoint {
            date: o.date,
            age_in_days: o.age_in_days(birth_date),
            weight: o.weight,
            kind: PointKind::Observed,
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Solver;
    use crate::models::{BreedCategory, BreedTable};

    fn birth() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    fn series(points: &[(i64, f64)]) -> Vec<WeightObservation> {
        points
            .iter()
            .map(|&(day, w)| WeightObservation::new(birth() + chrono::Duration::days(day), w))
            .collect()
    }

    fn labrador() -> Vec<WeightObservation> {
        series(&[
            (49, 4.5),
            (63, 6.3),
            (77, 8.4),
            (91, 10.2),
            (119, 14.0),
            (150, 17.5),
            (180, 20.4),
        ])
    }

    #[test]
    fn test_insufficient_data() {
        let err = predict_growth(&series(&[(30, 3.0)]), birth(), None, Sex::Male).unwrap_err();
        assert!(matches!(err, GrowthError::InsufficientData(_)));

        let filtered = series(&[(-5, 0.4), (10, 0.0), (30, 3.0)]);
        let err = predict_growth(&filtered, birth(), None, Sex::Male).unwrap_err();
        assert!(matches!(err, GrowthError::InsufficientData(_)));
    }

    #[test]
    fn test_realistic_series_uses_gompertz_fit() {
        let result = predict_growth(&labrador(), birth(), None, Sex::Male).unwrap();
        assert_eq!(result.source, PredictionSource::GompertzFit);
        let params = result.parameters.unwrap();
        assert!(is_biologically_plausible(&params));
        assert_eq!(result.breed.category, BreedCategory::Large);
        assert!(result.breed.male.contains(result.predicted_adult_weight));
        assert_eq!(result.observed_points().count(), 7);
        assert_eq!(result.confidence_band.len(), result.predicted_points().count());
        assert_eq!(result.current_growth_phase, GrowthPhase::SteadyGrowth);
    }

    #[test]
    fn test_gompertz_window_reaches_maturity() {
        let result = predict_growth(&labrador(), birth(), None, Sex::Male).unwrap();
        let last = result.predicted_points().last().unwrap();
        let maturity = result.breed.maturity_days().round() as i64;
        assert!(last.age_in_days <= maturity);
        assert!(last.age_in_days + 7 > maturity);
        assert_eq!(result.predicted_points().next().unwrap().age_in_days, 187);
    }

    #[test]
    fn test_decreasing_weights_fall_back() {
        let result = predict_growth(&series(&[(30, 3.0), (44, 2.8)]), birth(), None, Sex::Male).unwrap();
        assert_eq!(result.source, PredictionSource::LinearFallback);
        assert!(result.parameters.is_none());
        assert_eq!(result.current_weekly_growth_rate, 0.01);
        assert_eq!(result.predicted_points().count(), 26);
    }

    #[test]
    fn test_three_point_series_fits_a_curve_reaching_day_365() {
        let result = predict_growth(&series(&[(0, 1.0), (30, 3.0), (60, 5.0)]), birth(), None, Sex::Male).unwrap();
        assert_eq!(result.source, PredictionSource::GompertzFit);
        assert_eq!(result.breed.category, BreedCategory::Medium);
        let params = result.parameters.unwrap();
        assert!(params.weight_at(0.0) <= 0.1 * params.adult_weight);
        let year_one = result.weight_at_age(365).unwrap();
        assert!(year_one >= 5.0 && year_one <= 1.1 * result.predicted_adult_weight);
    }

    #[test]
    fn test_flat_series_falls_back_despite_plausible_curve() {
        let result = predict_growth(&series(&[(0, 4.0), (7, 4.0), (14, 4.0)]), birth(), None, Sex::Male).unwrap();
        assert_eq!(result.source, PredictionSource::LinearFallback);
        assert_eq!(result.current_weekly_growth_rate, 0.01);
    }

    #[test]
    fn test_strict_rmse_limit_forces_fallback() {
        let config = GrowthConfig {
            fit: crate::analysis::FitSettings {
                max_relative_rmse: 1e-6,
                ..Default::default()
            },
            ..Default::default()
        };
        let result = GrowthEngine::new(&config)
            .predict(&labrador(), birth(), None, Sex::Male)
            .unwrap();
        assert_eq!(result.source, PredictionSource::LinearFallback);
    }

    #[test]
    fn test_explicit_breed_is_used() {
        let table = BreedTable::default();
        let giant = table.profile(BreedCategory::Giant);
        let result = predict_growth(&labrador(), birth(), Some(&giant), Sex::Female).unwrap();
        assert_eq!(result.breed, giant);
        assert!(result.predicted_adult_weight >= 40.0 && result.predicted_adult_weight <= 80.0);
    }

    #[test]
    fn test_observed_points_sorted_and_filtered() {
        let mut obs = labrador();
        obs.reverse();
        obs.push(WeightObservation::new(birth() - chrono::Duration::days(3), 0.4));
        let result = predict_growth(&obs, birth(), None, Sex::Male).unwrap();
        let observed: Vec<i64> = result.observed_points().map(|p| p.age_in_days).collect();
        assert_eq!(observed, vec![49, 63, 77, 91, 119, 150, 180]);
        assert!(result.predictions[..7].iter().all(|p| p.is_observed()));
    }

    #[test]
    fn test_gradient_descent_config_still_predicts() {
        let config = GrowthConfig {
            fit: crate::analysis::FitSettings {
                solver: Solver::GradientDescent,
                ..Default::default()
            },
            ..Default::default()
        };
        let engine = GrowthEngine::new(&config);
        let result = engine.predict(&labrador(), birth(), None, Sex::Male).unwrap();
        assert!(!result.predictions.is_empty());
        let predicted: Vec<f64> = result.predicted_points().map(|p| p.weight).collect();
        assert!(predicted.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_engine_classify_matches_free_function() {
        let config = GrowthConfig::default();
        let engine = GrowthEngine::new(&config);
        let toy = config.breeds.profile(BreedCategory::Toy);
        assert_eq!(engine.classify(84.0, &toy), GrowthPhase::SteadyGrowth);
        assert_eq!(engine.classify(84.0, &toy), classify_phase(84.0, &toy, &config.breeds));
    }
}
