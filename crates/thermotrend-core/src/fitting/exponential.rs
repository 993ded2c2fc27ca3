use super::solver::{self, LeastSquaresProblem, SolverOptions};
use super::{FitError, FitResult, TrendModel};

/// `value(t) = a - b * exp(-c * t)`: a reading rising toward the ceiling `a`.
#[derive(Debug, Clone, Default)]
pub struct ExponentialApproach {
    pub options: SolverOptions,
}

impl ExponentialApproach {
    pub fn new(options: SolverOptions) -> Self {
        Self { options }
    }
}

/// Asymptote at the observed maximum, amplitude spanning the observed range,
/// rate as the inverse of the mean elapsed time.
pub fn initial_guess(elapsed: &[f64], values: &[f64]) -> [f64; 3] {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mean_elapsed = elapsed.iter().sum::<f64>() / elapsed.len() as f64;
    [max, max - min, 1.0 / mean_elapsed]
}

pub fn exp_approach(t: f64, asymptote: f64, amplitude: f64, rate: f64) -> f64 {
    asymptote - amplitude * (-rate * t).exp()
}

struct ApproachProblem<'a> {
    elapsed: &'a [f64],
    values: &'a [f64],
}

impl LeastSquaresProblem<3> for ApproachProblem<'_> {
    fn observations(&self) -> usize {
        self.elapsed.len()
    }

    fn residuals(&self, params: &[f64; 3], out: &mut Vec<f64>) {
        let [a, b, c] = *params;
        out.clear();
        out.extend(
            self.elapsed
                .iter()
                .zip(self.values)
                .map(|(t, y)| exp_approach(*t, a, b, c) - y),
        );
    }

    fn jacobian(&self, params: &[f64; 3], out: &mut Vec<[f64; 3]>) {
        let [_, b, c] = *params;
        out.clear();
        out.extend(self.elapsed.iter().map(|t| {
            let decay = (-c * t).exp();
            [1.0, -decay, b * t * decay]
        }));
    }
}

impl TrendModel for ExponentialApproach {
    fn name(&self) -> &'static str {
        "exponential_approach"
    }

    fn fit(&self, elapsed: &[f64], values: &[f64]) -> Result<FitResult, FitError> {
        if elapsed.len() != values.len() {
            return Err(FitError::LengthMismatch {
                elapsed: elapsed.len(),
                values: values.len(),
            });
        }
        if elapsed.len() < 3 {
            return Err(FitError::TooFewPoints {
                found: elapsed.len(),
                parameters: 3,
            });
        }

        let problem = ApproachProblem { elapsed, values };
        let opts = &self.options;
        let solution = solver::minimize(
            &problem,
            initial_guess(elapsed, values),
            opts.lower,
            opts.upper,
            opts.max_evaluations,
            (opts.ftol, opts.xtol, opts.gtol),
        )?;

        let [asymptote, amplitude, rate] = solution.params;
        tracing::debug!(
            asymptote,
            amplitude,
            rate,
            cost = solution.cost,
            evaluations = solution.evaluations,
            "exponential approach converged"
        );

        Ok(FitResult::ExponentialFit {
            asymptote,
            amplitude,
            rate,
        })
    }
}
