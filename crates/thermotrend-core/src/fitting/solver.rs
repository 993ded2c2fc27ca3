//! Box-constrained Levenberg-Marquardt least squares.
//!
//! Steps solve the Marquardt-scaled normal equations
//! `(JᵀJ + λ·diag(JᵀJ)) δ = -Jᵀr` and are then projected onto the parameter
//! bounds. The damping `λ` shrinks tenfold after an accepted step and grows
//! tenfold after a rejected one. Nothing here is randomized, so the same
//! problem and options always produce the same parameters.

use serde::{Deserialize, Serialize};

use super::FitError;

const INITIAL_DAMPING: f64 = 1e-3;
const MIN_DAMPING: f64 = 1e-12;
const MAX_DAMPING: f64 = 1e16;

/// A residual vector and its Jacobian over `N` parameters.
pub trait LeastSquaresProblem<const N: usize> {
    fn observations(&self) -> usize;

    /// Writes `model(params) - observed` into `out`.
    fn residuals(&self, params: &[f64; N], out: &mut Vec<f64>);

    /// Writes one row of partial derivatives per observation into `out`.
    fn jacobian(&self, params: &[f64; N], out: &mut Vec<[f64; N]>);
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Residual evaluations allowed before giving up.
    pub max_evaluations: usize,
    pub ftol: f64,
    pub xtol: f64,
    pub gtol: f64,
    pub lower: [f64; 3],
    pub upper: [f64; 3],
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_evaluations: 300,
            ftol: 1e-8,
            xtol: 1e-8,
            gtol: 1e-8,
            lower: [0.0; 3],
            upper: [f64::INFINITY; 3],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution<const N: usize> {
    pub params: [f64; N],
    /// Half the residual sum of squares.
    pub cost: f64,
    pub evaluations: usize,
    pub iterations: usize,
}

pub fn minimize<P, const N: usize>(
    problem: &P,
    initial: [f64; N],
    lower: [f64; N],
    upper: [f64; N],
    max_evaluations: usize,
    tolerances: (f64, f64, f64),
) -> Result<Solution<N>, FitError>
where
    P: LeastSquaresProblem<N>,
{
    let (ftol, xtol, gtol) = tolerances;

    for index in 0..N {
        let (lo, hi) = (lower[index], upper[index]);
        if lo.is_nan() || hi.is_nan() || lo > hi {
            return Err(FitError::InvalidBounds {
                index,
                lower: lo,
                upper: hi,
            });
        }
    }
    if initial.iter().any(|p| !p.is_finite()) {
        return Err(FitError::NonFinite("initial guess"));
    }
    if (0..N).any(|i| initial[i] < lower[i] || initial[i] > upper[i]) {
        return Err(FitError::InfeasibleGuess {
            guess: initial.to_vec(),
        });
    }
    let m = problem.observations();
    if m < N {
        return Err(FitError::TooFewPoints {
            found: m,
            parameters: N,
        });
    }

    let mut params = initial;
    let mut residuals = Vec::with_capacity(m);
    let mut trial_residuals = Vec::with_capacity(m);
    let mut jacobian = Vec::with_capacity(m);

    problem.residuals(&params, &mut residuals);
    let mut evaluations = 1;
    if residuals.iter().any(|r| !r.is_finite()) {
        return Err(FitError::NonFinite("residual"));
    }
    let mut cost = half_sum_squares(&residuals);
    let mut damping = INITIAL_DAMPING;
    let mut iterations = 0;

    let solution = |params, cost, evaluations, iterations| Solution {
        params,
        cost,
        evaluations,
        iterations,
    };

    if cost == 0.0 {
        return Ok(solution(params, cost, evaluations, iterations));
    }

    loop {
        iterations += 1;
        problem.jacobian(&params, &mut jacobian);
        if jacobian.iter().flatten().any(|v| !v.is_finite()) {
            return Err(FitError::NonFinite("jacobian"));
        }

        let (normal, gradient) = normal_equations(&jacobian, &residuals);

        // Parameters pinned at a bound with the gradient pushing outward stay put.
        let pinned: [bool; N] = std::array::from_fn(|i| {
            let g = gradient[i];
            (params[i] <= lower[i] && g > 0.0) || (params[i] >= upper[i] && g < 0.0)
        });
        let projected_gradient = (0..N)
            .filter(|&i| !pinned[i])
            .map(|i| gradient[i].abs())
            .fold(0.0, f64::max);
        if projected_gradient <= gtol {
            return Ok(solution(params, cost, evaluations, iterations));
        }

        loop {
            let Some(step) = damped_step(&normal, &gradient, &pinned, damping) else {
                damping *= 10.0;
                if damping > MAX_DAMPING {
                    return Err(FitError::SingularSystem);
                }
                continue;
            };

            let mut trial = params;
            for i in 0..N {
                trial[i] = (params[i] + step[i]).clamp(lower[i], upper[i]);
            }

            let step_norm = norm(&std::array::from_fn::<f64, N, _>(|i| trial[i] - params[i]));
            if step_norm <= xtol * (xtol + norm(&params)) {
                return Ok(solution(params, cost, evaluations, iterations));
            }

            if evaluations >= max_evaluations {
                return Err(FitError::NonConvergence { evaluations });
            }
            problem.residuals(&trial, &mut trial_residuals);
            evaluations += 1;

            let trial_cost = if trial_residuals.iter().all(|r| r.is_finite()) {
                half_sum_squares(&trial_residuals)
            } else {
                f64::INFINITY
            };

            if trial_cost < cost {
                let reduction = (cost - trial_cost) / cost;
                params = trial;
                cost = trial_cost;
                std::mem::swap(&mut residuals, &mut trial_residuals);
                damping = (damping / 10.0).max(MIN_DAMPING);

                if cost == 0.0 || reduction <= ftol {
                    return Ok(solution(params, cost, evaluations, iterations));
                }
                break;
            }

            damping *= 10.0;
            if damping > MAX_DAMPING {
                return Err(FitError::NonConvergence { evaluations });
            }
        }
    }
}

fn half_sum_squares(values: &[f64]) -> f64 {
    0.5 * values.iter().map(|v| v * v).sum::<f64>()
}

fn norm<const N: usize>(values: &[f64; N]) -> f64 {
    values.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// Returns `JᵀJ` and `Jᵀr`.
fn normal_equations<const N: usize>(
    jacobian: &[[f64; N]],
    residuals: &[f64],
) -> ([[f64; N]; N], [f64; N]) {
    let mut normal = [[0.0; N]; N];
    let mut gradient = [0.0; N];
    for (row, r) in jacobian.iter().zip(residuals) {
        for i in 0..N {
            gradient[i] += row[i] * r;
            for j in 0..N {
                normal[i][j] += row[i] * row[j];
            }
        }
    }
    (normal, gradient)
}

/// Solves the damped system in Jacobi-scaled coordinates, where the
/// Marquardt term becomes `λ·I`. Pinned parameters get a zero step.
fn damped_step<const N: usize>(
    normal: &[[f64; N]; N],
    gradient: &[f64; N],
    pinned: &[bool; N],
    damping: f64,
) -> Option<[f64; N]> {
    let scale: [f64; N] = std::array::from_fn(|i| {
        let d = normal[i][i].sqrt();
        if d > 0.0 && d.is_finite() {
            d
        } else {
            1.0
        }
    });

    let mut matrix = [[0.0; N]; N];
    let mut rhs = [0.0; N];
    for i in 0..N {
        if pinned[i] {
            matrix[i][i] = 1.0;
            continue;
        }
        for j in 0..N {
            if !pinned[j] {
                matrix[i][j] = normal[i][j] / (scale[i] * scale[j]);
            }
        }
        matrix[i][i] += damping;
        rhs[i] = -gradient[i] / scale[i];
    }

    let scaled = solve_linear(matrix, rhs)?;
    Some(std::array::from_fn(|i| scaled[i] / scale[i]))
}

/// Gaussian elimination with partial pivoting.
fn solve_linear<const N: usize>(mut a: [[f64; N]; N], mut b: [f64; N]) -> Option<[f64; N]> {
    let magnitude = a
        .iter()
        .flatten()
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let threshold = f64::EPSILON * magnitude.max(1.0);

    for col in 0..N {
        let pivot_row = (col..N).max_by(|&x, &y| a[x][col].abs().total_cmp(&a[y][col].abs()))?;
        if a[pivot_row][col].abs() <= threshold {
            return None;
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in (col + 1)..N {
            let factor = a[row][col] / a[col][col];
            for k in col..N {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0; N];
    for row in (0..N).rev() {
        let tail: f64 = ((row + 1)..N).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    x.iter().all(|v| v.is_finite()).then_some(x)
}
