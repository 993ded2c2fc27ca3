use super::{FitError, FitResult, TrendModel};
use crate::statistics::fit_line;

/// Ordinary least-squares line; the fallback when the exponential fit fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearTrend;

impl TrendModel for LinearTrend {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn fit(&self, elapsed: &[f64], values: &[f64]) -> Result<FitResult, FitError> {
        if elapsed.len() != values.len() {
            return Err(FitError::LengthMismatch {
                elapsed: elapsed.len(),
                values: values.len(),
            });
        }
        let line = fit_line("linear_trend", elapsed, values)?;
        Ok(FitResult::LinearFit {
            slope: line.slope,
            intercept: line.intercept,
        })
    }
}
