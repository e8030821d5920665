mod breed;
mod initializer;
mod fitter;
mod validator;
mod predictor;
mod phase;
mod fallback;
mod engine;

pub use breed::{estimate_breed, resolve_breed};
pub use initializer::{initial_parameters, MALE_DURATION_OFFSET_DAYS};
pub use fitter::{
    confidence_from_r_squared, fit_growth_curve, samples_from_observations, CurveFit,
    FitSettings, GrowthSample, Solver, R_SQUARED_RANGE,
};
pub use validator::{is_biologically_plausible, ParameterBounds, MIN_INFLECTION_RATIO};
pub use predictor::{
    confidence_bounds, confidence_interval, predict_curve, DEFAULT_STEP_DAYS, MIN_BOUND_WEIGHT,
};
pub use phase::classify_phase;
pub use fallback::{
    project_linear, slowing_factor, weekly_growth_rate, LinearProjection, FALLBACK_CONFIDENCE,
    HORIZON_WEEKS, RESIDUAL_GROWTH, WEEKLY_RATE_RANGE,
};
pub use engine::{predict_growth, GrowthEngine};
