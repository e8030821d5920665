//! Bounded nonlinear least-squares fit of the Gompertz curve.
//!
//! Both solvers share one outer loop:
//!
//! - the parameters are clamped back into [`ParameterBounds`] after every step,
//!   so the optimizer never leaves biologically valid territory
//! - the lowest-MSE parameter set seen so far is kept, not the last iterate
//! - after `divergence_patience` iterations the loop stops once the current
//!   MSE exceeds the best by more than `divergence_tolerance`
//!
//! Partial derivatives are taken by forward finite differences.

use chrono::NaiveDate;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::debug;

use super::validator::ParameterBounds;
use crate::error::GrowthError;
use crate::models::{gompertz, FitQuality, GrowthCurveParameters, WeightObservation};

const MIN_DAMPING: f64 = 1e-9;
const MAX_DAMPING: f64 = 1e9;
const MIN_DIAGONAL: f64 = 1e-9;
const SUM_EPSILON: f64 = 1e-12;

/// Reported R² never leaves this range.
pub const R_SQUARED_RANGE: (f64, f64) = (0.6, 0.95);

/// Parameter update rule used by the fitter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Solver {
    /// Plain first-order descent: `p -= learning_rate * mean(r * dr/dp)`
    GradientDescent,
    /// Damped Gauss-Newton steps, accepted only when they lower the MSE
    #[default]
    LevenbergMarquardt,
}

/// Optimizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitSettings {
    pub solver: Solver,
    pub max_iterations: usize,
    /// Step size for gradient descent
    pub learning_rate: f64,
    /// Finite-difference step, relative to `max(|p|, 1)`
    pub finite_difference_step: f64,
    /// Starting damping factor for Levenberg-Marquardt
    pub initial_damping: f64,
    /// Iterations before the divergence guard may stop the loop
    pub divergence_patience: usize,
    /// Ratio of current to best MSE treated as divergence
    pub divergence_tolerance: f64,
    /// Largest RMSE, as a share of the mean observed weight, for which a
    /// fitted curve is used instead of the linear fallback
    pub max_relative_rmse: f64,
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            solver: Solver::default(),
            max_iterations: 100,
            learning_rate: 0.1,
            finite_difference_step: 1e-4,
            initial_damping: 1e-2,
            divergence_patience: 10,
            divergence_tolerance: 1.1,
            max_relative_rmse: 0.15,
        }
    }
}

/// A usable (age, weight) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthSample {
    pub age_in_days: f64,
    /// Weight in kilograms
    pub weight: f64,
}

impl GrowthSample {
    fn is_usable(&self) -> bool {
        self.age_in_days >= 0.0 && self.weight.is_finite() && self.weight > 0.0
    }
}

/// Convert dated observations into samples sorted by age, dropping weighings
/// before the birth date and non-positive weights.
pub fn samples_from_observations(
    observations: &[WeightObservation],
    birth_date: NaiveDate,
) -> Vec<GrowthSample> {
    let mut samples: Vec<GrowthSample> = observations
        .iter()
        .map(|o| GrowthSample {
            age_in_days: o.age_in_days(birth_date) as f64,
            weight: o.weight,
        })
        .filter(GrowthSample::is_usable)
        .collect();
    samples.sort_by(|a, b| a.age_in_days.total_cmp(&b.age_in_days));
    samples
}

/// Result of a curve fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveFit {
    /// Best parameters, with `fit_quality` and `confidence` filled in
    pub parameters: GrowthCurveParameters,
    pub quality: FitQuality,
    pub iterations: usize,
    /// Mean squared error at the best parameters
    pub mse: f64,
    /// Mean squared error of the last iterate
    pub final_mse: f64,
}

impl CurveFit {
    /// RMSE as a share of the mean sample weight.
    pub fn relative_rmse(&self, samples: &[GrowthSample]) -> f64 {
        let mean = samples.iter().map(|s| s.weight).mean();
        if mean > 0.0 {
            self.quality.rmse / mean
        } else {
            f64::INFINITY
        }
    }
}

/// Fit the Gompertz curve to the samples, starting from `initial`.
///
/// Fails when fewer than two usable samples remain, or when no iterate has a
/// finite error.
pub fn fit_growth_curve(
    samples: &[GrowthSample],
    initial: &GrowthCurveParameters,
    bounds: &ParameterBounds,
    settings: &FitSettings,
) -> Result<CurveFit, GrowthError> {
    let samples: Vec<GrowthSample> = samples.iter().copied().filter(GrowthSample::is_usable).collect();
    if samples.len() < 2 {
        return Err(GrowthError::InsufficientData(format!(
            "Need at least 2 weight observations with non-negative age, got {}",
            samples.len()
        )));
    }

    let mut params = bounds.clamp(*initial);
    let mut best = params;
    let mut best_mse = f64::INFINITY;
    let mut damping = settings.initial_damping;
    let mut iterations = 0;

    for iteration in 0..settings.max_iterations {
        iterations = iteration + 1;
        let mse = mean_squared_error(&samples, &params);
        if mse < best_mse {
            best = params;
            best_mse = mse;
        } else if iteration >= settings.divergence_patience
            && mse > best_mse * settings.divergence_tolerance
        {
            debug!(iteration, mse, best_mse, "fit diverging, stopping early");
            break;
        }

        let next = match settings.solver {
            Solver::GradientDescent => gradient_step(&samples, &params, settings),
            Solver::LevenbergMarquardt => {
                damped_step(&samples, &params, bounds, settings, &mut damping)
            }
        };
        params = bounds.clamp(next);
    }

    let final_mse = mean_squared_error(&samples, &params);
    if final_mse < best_mse {
        best = params;
        best_mse = final_mse;
    }
    if !best_mse.is_finite() {
        return Err(GrowthError::AnalysisError(format!(
            "Curve fit produced no finite error after {iterations} iterations"
        )));
    }

    let quality = evaluate_fit(&samples, |age| best.weight_at(age));
    let parameters = GrowthCurveParameters {
        fit_quality: quality.r_squared,
        confidence: confidence_from_r_squared(quality.r_squared),
        ..best
    };
    debug!(
        iterations,
        mse = best_mse,
        final_mse,
        adult_weight = parameters.adult_weight,
        growth_duration = parameters.growth_duration,
        inflection_age = parameters.inflection_age,
        r_squared = quality.r_squared,
        "growth curve fitted"
    );

    Ok(CurveFit {
        parameters,
        quality,
        iterations,
        mse: best_mse,
        final_mse,
    })
}

/// Map R² onto the confidence levels reported with a fit.
pub fn confidence_from_r_squared(r_squared: f64) -> f64 {
    if r_squared > 0.85 {
        0.9
    } else if r_squared > 0.75 {
        0.8
    } else {
        0.7
    }
}

/// R² (clamped to [`R_SQUARED_RANGE`]), RMSE and MAE of a model against the samples.
pub(crate) fn evaluate_fit(samples: &[GrowthSample], model: impl Fn(f64) -> f64) -> FitQuality {
    if samples.is_empty() {
        return FitQuality {
            r_squared: R_SQUARED_RANGE.0,
            rmse: 0.0,
            mae: 0.0,
        };
    }
    let n = samples.len() as f64;
    let mean = samples.iter().map(|s| s.weight).mean();

    let residuals: Vec<f64> = samples
        .iter()
        .map(|s| model(s.age_in_days) - s.weight)
        .collect();
    let ss_res: f64 = residuals.iter().map(|r| r * r).sum();
    let ss_tot: f64 = samples.iter().map(|s| (s.weight - mean).powi(2)).sum();

    let raw = if ss_tot <= SUM_EPSILON {
        if ss_res <= SUM_EPSILON {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    };
    let r_squared = if raw.is_nan() {
        R_SQUARED_RANGE.0
    } else {
        raw.clamp(R_SQUARED_RANGE.0, R_SQUARED_RANGE.1)
    };

    FitQuality {
        r_squared,
        rmse: (ss_res / n).sqrt(),
        mae: residuals.iter().map(|r| r.abs()).sum::<f64>() / n,
    }
}

fn mean_squared_error(samples: &[GrowthSample], params: &GrowthCurveParameters) -> f64 {
    let sse: f64 = samples
        .iter()
        .map(|s| (params.weight_at(s.age_in_days) - s.weight).powi(2))
        .sum();
    sse / samples.len() as f64
}

/// Residual (predicted - observed) and its finite-difference gradient with
/// respect to `[adult_weight, growth_duration, inflection_age]`.
fn residual_and_gradient(
    sample: &GrowthSample,
    p: [f64; 3],
    relative_step: f64,
) -> (f64, [f64; 3]) {
    let base = gompertz(sample.age_in_days, p[0], p[1], p[2]);
    let mut gradient = [0.0; 3];
    for (k, slot) in gradient.iter_mut().enumerate() {
        let h = relative_step * p[k].abs().max(1.0);
        let mut shifted = p;
        shifted[k] += h;
        let moved = gompertz(sample.age_in_days, shifted[0], shifted[1], shifted[2]);
        *slot = (moved - base) / h;
    }
    (base - sample.weight, gradient)
}

fn gradient_step(
    samples: &[GrowthSample],
    params: &GrowthCurveParameters,
    settings: &FitSettings,
) -> GrowthCurveParameters {
    let p = params.as_array();
    let mut summed = [0.0; 3];
    for sample in samples {
        let (residual, gradient) = residual_and_gradient(sample, p, settings.finite_difference_step);
        for k in 0..3 {
            summed[k] += residual * gradient[k];
        }
    }
    let n = samples.len() as f64;
    let mut next = p;
    for k in 0..3 {
        next[k] -= settings.learning_rate * summed[k] / n;
    }
    params.with_array(next)
}

/// One Levenberg-Marquardt step. Returns the clamped trial point when it
/// lowers the MSE, otherwise the current point with a stiffer damping.
fn damped_step(
    samples: &[GrowthSample],
    params: &GrowthCurveParameters,
    bounds: &ParameterBounds,
    settings: &FitSettings,
    damping: &mut f64,
) -> GrowthCurveParameters {
    let p = params.as_array();
    let mut jtj = Matrix3::<f64>::zeros();
    let mut jtr = Vector3::<f64>::zeros();
    for sample in samples {
        let (residual, gradient) = residual_and_gradient(sample, p, settings.finite_difference_step);
        let row = Vector3::from(gradient);
        jtj += row * row.transpose();
        jtr += row * residual;
    }

    let mut system = jtj;
    for i in 0..3 {
        system[(i, i)] += *damping * jtj[(i, i)].max(MIN_DIAGONAL);
    }

    let delta = match system.lu().solve(&(-jtr)) {
        Some(delta) if delta.iter().all(|v| v.is_finite()) => delta,
        _ => {
            *damping = (*damping * 10.0).min(MAX_DAMPING);
            return *params;
        }
    };

    let trial = bounds.clamp(params.with_array([p[0] + delta[0], p[1] + delta[1], p[2] + delta[2]]));
    if mean_squared_error(samples, &trial) < mean_squared_error(samples, params) {
        *damping = (*damping / 10.0).max(MIN_DAMPING);
        trial
    } else {
        *damping = (*damping * 10.0).min(MAX_DAMPING);
        *params
    }
}
