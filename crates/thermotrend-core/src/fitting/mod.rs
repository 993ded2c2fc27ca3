//! Two-regime trend fitting: an exponential approach curve first, an
//! ordinary least-squares line when that fit cannot be obtained.

mod exponential;
mod linear;
pub mod solver;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::error::AnalysisError;
use crate::series::{SampleSeries, TimeAxis};

pub use exponential::{exp_approach, initial_guess, ExponentialApproach};
pub use linear::LinearTrend;
pub use solver::SolverOptions;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("solver did not converge within {evaluations} evaluations")]
    NonConvergence { evaluations: usize },

    #[error("parameter {index} has contradictory bounds [{lower}, {upper}]")]
    InvalidBounds {
        index: usize,
        lower: f64,
        upper: f64,
    },

    #[error("initial guess {guess:?} lies outside the parameter bounds")]
    InfeasibleGuess { guess: Vec<f64> },

    #[error("{found} samples cannot determine {parameters} parameters")]
    TooFewPoints { found: usize, parameters: usize },

    #[error("{elapsed} elapsed times but {values} values")]
    LengthMismatch { elapsed: usize, values: usize },

    #[error("non-finite {0} encountered")]
    NonFinite(&'static str),

    #[error("normal equations are singular")]
    SingularSystem,

    #[error("all samples share the same instant")]
    ZeroTimeSpan,

    #[error("{0}")]
    Statistics(String),
}

impl From<AnalysisError> for FitError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::DegenerateInput { .. } => FitError::ZeroTimeSpan,
            AnalysisError::InsufficientData {
                required, found, ..
            } => FitError::TooFewPoints {
                found,
                parameters: required,
            },
            other => FitError::Statistics(other.to_string()),
        }
    }
}

/// A fitted trend, evaluable at any elapsed-seconds value without refitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum FitResult {
    ExponentialFit {
        asymptote: f64,
        amplitude: f64,
        rate: f64,
    },
    LinearFit {
        slope: f64,
        intercept: f64,
    },
}

impl FitResult {
    pub fn evaluate(&self, elapsed_seconds: f64) -> f64 {
        match *self {
            FitResult::ExponentialFit {
                asymptote,
                amplitude,
                rate,
            } => exp_approach(elapsed_seconds, asymptote, amplitude, rate),
            FitResult::LinearFit { slope, intercept } => slope * elapsed_seconds + intercept,
        }
    }

    pub fn evaluate_many(&self, elapsed_seconds: &[f64]) -> Vec<f64> {
        elapsed_seconds.iter().map(|t| self.evaluate(*t)).collect()
    }

    pub fn model_name(&self) -> &'static str {
        match self {
            FitResult::ExponentialFit { .. } => "exponential_approach",
            FitResult::LinearFit { .. } => "linear",
        }
    }

    pub fn is_linear(&self) -> bool {
        matches!(self, FitResult::LinearFit { .. })
    }
}

pub fn evaluate(fit: &FitResult, elapsed_seconds: &[f64]) -> Vec<f64> {
    fit.evaluate_many(elapsed_seconds)
}

pub trait TrendModel: Send + Sync {
    fn name(&self) -> &'static str;
    fn fit(&self, elapsed: &[f64], values: &[f64]) -> Result<FitResult, FitError>;
}

/// Emitted when the primary model failed and the fallback produced the trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallbackEvent {
    pub failed_model: &'static str,
    pub fallback_model: &'static str,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendFit {
    pub result: FitResult,
    pub fallback: Option<FallbackEvent>,
}

impl TrendFit {
    pub fn used_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

pub struct TrendFitter {
    primary: Box<dyn TrendModel>,
    fallback: Box<dyn TrendModel>,
}

impl std::fmt::Debug for TrendFitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrendFitter")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

impl Default for TrendFitter {
    fn default() -> Self {
        Self::new(SolverOptions::default())
    }
}

impl TrendFitter {
    pub fn new(options: SolverOptions) -> Self {
        Self::with_models(
            Box::new(ExponentialApproach::new(options)),
            Box::new(LinearTrend),
        )
    }

    pub fn with_models(primary: Box<dyn TrendModel>, fallback: Box<dyn TrendModel>) -> Self {
        Self { primary, fallback }
    }

    pub fn fit_series(&self, series: &SampleSeries) -> Result<TrendFit, AnalysisError> {
        self.fit(&series.time_axis(), &series.values())
    }

    /// Fits the primary model against raw elapsed seconds. Any primary failure
    /// is absorbed: the fallback model is fitted instead and the failure is
    /// reported through [`TrendFit::fallback`]. Only a failing fallback is an
    /// error.
    pub fn fit(&self, axis: &TimeAxis, values: &[f64]) -> Result<TrendFit, AnalysisError> {
        let elapsed = axis.elapsed_seconds();

        let primary_err = match self.primary.fit(elapsed, values) {
            Ok(result) => {
                return Ok(TrendFit {
                    result,
                    fallback: None,
                })
            }
            Err(err) => err,
        };

        warn!(
            failed_model = self.primary.name(),
            fallback_model = self.fallback.name(),
            reason = %primary_err,
            "primary trend fit failed, using fallback"
        );

        let result = self
            .fallback
            .fit(elapsed, values)
            .map_err(|err| fallback_error(self.fallback.name(), err))?;

        Ok(TrendFit {
            result,
            fallback: Some(FallbackEvent {
                failed_model: self.primary.name(),
                fallback_model: self.fallback.name(),
                reason: primary_err.to_string(),
            }),
        })
    }
}

fn fallback_error(model: &'static str, err: FitError) -> AnalysisError {
    match err {
        FitError::ZeroTimeSpan => AnalysisError::DegenerateInput { statistic: "trend" },
        FitError::TooFewPoints { found, parameters } => AnalysisError::InsufficientData {
            statistic: "trend",
            required: parameters,
            found,
        },
        other => AnalysisError::FitFailed {
            model,
            message: other.to_string(),
        },
    }
}
