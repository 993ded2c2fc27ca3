pub mod error;
pub mod fitting;
pub mod outputs;
pub mod pipeline;
pub mod series;
pub mod statistics;
pub mod timeframe;

pub use error::{AnalysisError, Result};
pub use fitting::{FallbackEvent, FitResult, SolverOptions, TrendFit, TrendFitter};
pub use pipeline::{AnalysisOutcome, AnalysisPipeline, AnalysisReport};
pub use series::{SampleSeries, TimeAxis};
pub use statistics::{summarize, SummaryResult};
pub use timeframe::Timeframe;
