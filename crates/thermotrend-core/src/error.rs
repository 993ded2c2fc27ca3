// crates/thermotrend-core/src/error.rs

use chrono::NaiveDateTime;
use thermotrend_parser::ParserError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Input parsing failed: {0}")]
    Parse(#[from] ParserError),

    #[error("{statistic} requires at least {required} samples, found {found}")]
    InsufficientData {
        statistic: &'static str,
        required: usize,
        found: usize,
    },

    #[error("{statistic} is undefined: every sample shares the same instant")]
    DegenerateInput { statistic: &'static str },

    #[error("Timeframe start {start} is after end {end}")]
    InvalidTimeframe {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Invalid timeframe bound '{0}'")]
    InvalidBound(String),

    #[error("Sample at {timestamp} has non-finite value {value}")]
    NonFiniteValue {
        timestamp: NaiveDateTime,
        value: f64,
    },

    #[error("{model} fit failed: {message}")]
    FitFailed {
        model: &'static str,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
