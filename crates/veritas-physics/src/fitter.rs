//! Constant-acceleration trajectory fitting.
//!
//! Fits `y(t) = h0 + v0·t − ½·a·t²` to observed (t, y) samples with a
//! Levenberg–Marquardt least-squares solver started from a neutral guess
//! (all parameters 1.0). The fitted `a` is the effective downward
//! acceleration of the tracked object.

use tracing::debug;
use veritas_models::TrajectorySamples;

use crate::constants::FIT_MIN_SAMPLES;
use crate::error::{PhysicsError, PhysicsResult};

/// Histogram of solver iterations per fit.
pub const FIT_ITERATIONS: &str = "veritas_fit_iterations";

/// Configuration for the Levenberg–Marquardt solver.
#[derive(Debug, Clone)]
pub struct FitterConfig {
    /// Maximum outer iterations.
    pub max_iterations: usize,
    /// Relative step / cost tolerance for convergence.
    pub tolerance: f64,
    /// Initial damping factor (lambda).
    pub initial_damping: f64,
    /// Damping multiplier after a rejected step.
    pub damping_increase: f64,
    /// Damping divisor after an accepted step.
    pub damping_decrease: f64,
    /// Damping above which no descent direction is considered available.
    pub max_damping: f64,
}

impl Default for FitterConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-10,
            initial_damping: 1e-3,
            damping_increase: 10.0,
            damping_decrease: 10.0,
            max_damping: 1e12,
        }
    }
}

/// Fitted parameters of the kinematic model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicFit {
    /// Effective acceleration `a`, m/s² (positive is downward)
    pub acceleration: f64,
    /// Initial vertical velocity `v0`, m/s
    pub initial_velocity: f64,
    /// Initial height `h0`, m
    pub initial_height: f64,
    /// Solver iterations used
    pub iterations: usize,
    /// Root-mean-square residual at the solution
    pub residual_rms: f64,
}

/// Stateless fitter; holds only solver constants.
#[derive(Debug, Clone, Default)]
pub struct KinematicFitter {
    config: FitterConfig,
}

impl KinematicFitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FitterConfig) -> Self {
        Self { config }
    }

    /// Model position at time `t` for parameters `[v0, a, h0]`.
    pub fn model(params: &[f64; 3], t: f64) -> f64 {
        let [v0, a, h0] = *params;
        h0 + v0 * t - 0.5 * a * t * t
    }

    /// Fit the model to a trajectory.
    pub fn fit(&self, samples: &TrajectorySamples) -> PhysicsResult<KinematicFit> {
        let (t, y) = validate_samples(samples)?;
        let cfg = &self.config;

        let mut params = [1.0_f64; 3];
        let mut lambda = cfg.initial_damping;
        let mut cost = sum_squares(&params, t, y);
        let mut converged = false;
        let mut iterations = 0;

        for iter in 0..cfg.max_iterations {
            iterations = iter + 1;

            if cost <= f64::MIN_POSITIVE {
                converged = true;
                break;
            }

            let (jtj, jtr) = normal_equations(&params, t, y);

            // Inner loop: raise damping until the step reduces the cost.
            let mut accepted = None;
            while lambda <= cfg.max_damping {
                let mut damped = jtj;
                for i in 0..3 {
                    damped[i][i] += lambda * jtj[i][i];
                }

                if let Some(delta) = solve3(&damped, &jtr) {
                    let candidate = [
                        params[0] + delta[0],
                        params[1] + delta[1],
                        params[2] + delta[2],
                    ];
                    let candidate_cost = sum_squares(&candidate, t, y);
                    if candidate_cost.is_finite() && candidate_cost < cost {
                        accepted = Some((candidate, candidate_cost, delta));
                        lambda /= cfg.damping_decrease;
                        break;
                    }
                }
                lambda *= cfg.damping_increase;
            }

            let Some((candidate, candidate_cost, delta)) = accepted else {
                // No descent direction left: we are sitting on the minimum.
                converged = true;
                break;
            };

            let step = norm(&delta);
            let scale = norm(&candidate) + cfg.tolerance;
            let cost_drop = cost - candidate_cost;

            params = candidate;
            cost = candidate_cost;

            if step <= cfg.tolerance * scale || cost_drop <= cfg.tolerance * cost {
                converged = true;
                break;
            }
        }

        metrics::histogram!(FIT_ITERATIONS).record(iterations as f64);

        if !converged {
            return Err(PhysicsError::fit_error(
                format!(
                    "no convergence after {} iterations (cost {:.3e})",
                    iterations, cost
                ),
                iterations,
            ));
        }

        if params.iter().any(|p| !p.is_finite()) {
            return Err(PhysicsError::fit_error(
                "fitted parameters are not finite",
                iterations,
            ));
        }

        // A singular normal matrix at the solution means the parameters are
        // not identifiable from these samples.
        let (jtj, _) = normal_equations(&params, t, y);
        if solve3(&jtj, &[0.0, 0.0, 1.0]).is_none() {
            return Err(PhysicsError::fit_error(
                "parameter covariance could not be estimated",
                iterations,
            ));
        }

        let residual_rms = (cost / t.len() as f64).sqrt();
        debug!(
            acceleration = params[1],
            iterations, residual_rms, "Kinematic fit converged"
        );

        Ok(KinematicFit {
            initial_velocity: params[0],
            acceleration: params[1],
            initial_height: params[2],
            iterations,
            residual_rms,
        })
    }
}

fn validate_samples(samples: &TrajectorySamples) -> PhysicsResult<(&[f64], &[f64])> {
    let t = samples.timestamps.as_slice();
    let y = samples.positions.as_slice();

    if t.len() != y.len() {
        return Err(PhysicsError::degenerate(format!(
            "{} timestamps but {} positions",
            t.len(),
            y.len()
        )));
    }
    if t.len() < FIT_MIN_SAMPLES {
        return Err(PhysicsError::degenerate(format!(
            "need at least {} samples, got {}",
            FIT_MIN_SAMPLES,
            t.len()
        )));
    }
    if t.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(PhysicsError::degenerate("samples contain non-finite values"));
    }

    let distinct = distinct_count(t);
    if distinct < FIT_MIN_SAMPLES {
        return Err(PhysicsError::degenerate(format!(
            "need at least {} distinct timestamps, got {}",
            FIT_MIN_SAMPLES, distinct
        )));
    }

    Ok((t, y))
}

fn distinct_count(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let span = (sorted[sorted.len() - 1] - sorted[0]).abs().max(1.0);
    1 + sorted
        .windows(2)
        .filter(|w| (w[1] - w[0]) > 1e-12 * span)
        .count()
}

fn sum_squares(params: &[f64; 3], t: &[f64], y: &[f64]) -> f64 {
    t.iter()
        .zip(y)
        .map(|(&ti, &yi)| (yi - KinematicFitter::model(params, ti)).powi(2))
        .sum()
}

/// Build JᵀJ and Jᵀr for the current parameters.
fn normal_equations(params: &[f64; 3], t: &[f64], y: &[f64]) -> ([[f64; 3]; 3], [f64; 3]) {
    let mut jtj = [[0.0; 3]; 3];
    let mut jtr = [0.0; 3];
    for (&ti, &yi) in t.iter().zip(y) {
        // ∂y/∂v0, ∂y/∂a, ∂y/∂h0
        let row = [ti, -0.5 * ti * ti, 1.0];
        let r = yi - KinematicFitter::model(params, ti);
        for i in 0..3 {
            jtr[i] += row[i] * r;
            for j in 0..3 {
                jtj[i][j] += row[i] * row[j];
            }
        }
    }
    (jtj, jtr)
}

/// Solve a 3×3 system by Gaussian elimination with partial pivoting.
/// Returns `None` when the matrix is numerically singular.
fn solve3(a: &[[f64; 3]; 3], b: &[f64; 3]) -> Option<[f64; 3]> {
    let mut m = [[0.0; 4]; 3];
    let mut max_abs = 0.0_f64;
    for i in 0..3 {
        for j in 0..3 {
            m[i][j] = a[i][j];
            max_abs = max_abs.max(a[i][j].abs());
        }
        m[i][3] = b[i];
    }
    if max_abs == 0.0 || !max_abs.is_finite() {
        return None;
    }
    let eps = 1e-13 * max_abs;

    for col in 0..3 {
        let pivot = (col..3).max_by(|&r1, &r2| m[r1][col].abs().total_cmp(&m[r2][col].abs()))?;
        if m[pivot][col].abs() <= eps {
            return None;
        }
        m.swap(col, pivot);
        for row in (col + 1)..3 {
            let factor = m[row][col] / m[col][col];
            for k in col..4 {
                m[row][k] -= factor * m[col][k];
            }
        }
    }

    let mut x = [0.0; 3];
    for i in (0..3).rev() {
        let mut sum = m[i][3];
        for j in (i + 1)..3 {
            sum -= m[i][j] * x[j];
        }
        x[i] = sum / m[i][i];
    }
    Some(x)
}

fn norm(v: &[f64; 3]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic(a: f64, v0: f64, h0: f64, noise: f64, n: usize) -> TrajectorySamples {
        let t: Vec<f64> = (0..n).map(|i| i as f64 * 0.05).collect();
        let y = t
            .iter()
            .enumerate()
            .map(|(i, &ti)| {
                h0 + v0 * ti - 0.5 * a * ti * ti + noise * ((i as f64) * 1.7).sin()
            })
            .collect();
        TrajectorySamples::new(t, y)
    }

    #[test]
    fn test_recovers_exact_acceleration() {
        let fit = KinematicFitter::new()
            .fit(&synthetic(9.81, 2.0, 10.0, 0.0, 20))
            .unwrap();
        assert!((fit.acceleration - 9.81).abs() < 1e-6);
        assert!((fit.initial_velocity - 2.0).abs() < 1e-6);
        assert!((fit.initial_height - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_recovers_acceleration_under_noise() {
        for &a in &[1.62, 3.72, 9.81, 12.5, 20.0] {
            let fit = KinematicFitter::new()
                .fit(&synthetic(a, 0.5, 5.0, 0.002, 30))
                .unwrap();
            assert!(
                (fit.acceleration - a).abs() < 0.1,
                "expected {} got {}",
                a,
                fit.acceleration
            );
        }
    }

    #[test]
    fn test_reference_scenario() {
        let samples = TrajectorySamples::new(
            vec![0.0, 0.1, 0.2, 0.3, 0.4],
            vec![10.0, 9.5, 8.0, 5.5, 2.0],
        );
        let fit = KinematicFitter::new().fit(&samples).unwrap();
        assert!(fit.acceleration > 11.0);
        assert!((fit.acceleration - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_too_few_samples() {
        let samples = TrajectorySamples::new(vec![0.0, 0.1], vec![1.0, 0.9]);
        let err = KinematicFitter::new().fit(&samples).unwrap_err();
        assert!(matches!(err, PhysicsError::DegenerateSamples(_)));
    }

    #[test]
    fn test_duplicate_timestamps() {
        let samples = TrajectorySamples::new(vec![0.1, 0.1, 0.2, 0.2], vec![1.0, 1.1, 0.9, 0.8]);
        let err = KinematicFitter::new().fit(&samples).unwrap_err();
        assert!(matches!(err, PhysicsError::DegenerateSamples(_)));
    }

    #[test]
    fn test_non_finite_samples() {
        let samples = TrajectorySamples::new(vec![0.0, 0.1, 0.2], vec![1.0, f64::NAN, 0.8]);
        assert!(KinematicFitter::new().fit(&samples).is_err());
    }

    #[test]
    fn test_iteration_cap_reports_fit_error() {
        let fitter = KinematicFitter::with_config(FitterConfig {
            max_iterations: 1,
            tolerance: 0.0,
            ..Default::default()
        });
        let err = fitter.fit(&synthetic(9.81, 1.0, 3.0, 0.01, 10)).unwrap_err();
        assert!(matches!(err, PhysicsError::FitError { iterations: 1, .. }));
    }

    #[test]
    fn test_solve3_singular() {
        let a = [[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 1.0]];
        assert!(solve3(&a, &[1.0, 2.0, 3.0]).is_none());
        let id = [[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 4.0]];
        assert_eq!(solve3(&id, &[1.0, 2.0, 4.0]), Some([1.0, 1.0, 1.0]));
    }
}
