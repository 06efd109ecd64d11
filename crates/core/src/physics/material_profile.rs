//! Material profile evaluator
//!
//! Maps `(t, x[..])` to the 4-row auxiliary array
//! `[ε_r, μ_r, ∂ε_r/∂t, ∂μ_r/∂t]`. The output depends only on the time, the
//! positions and the static configuration, never on a previous evaluation.

use super::ensure_finite;
use crate::config::{Configuration, MaterialProfile};
use crate::core_types::{RowArray, AUX_ROWS, EPSILON, EPSILON_RATE, MU, MU_RATE};
use crate::error::ModelError;
use rayon::prelude::*;
use std::sync::Arc;

const AUX_QUANTITIES: [&str; AUX_ROWS] = ["epsilon_r", "mu_r", "d(epsilon_r)/dt", "d(mu_r)/dt"];

/// Evaluates the configured material profile at arbitrary positions
#[derive(Debug, Clone)]
pub struct MaterialEvaluator {
    config: Arc<Configuration>,
}

impl MaterialEvaluator {
    pub fn new(config: Arc<Configuration>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// One auxiliary component at a single point
    #[inline]
    fn component(&self, row: usize, t: f64, x: f64) -> f64 {
        let bg = self.config.background();
        match (self.config.material(), row) {
            (MaterialProfile::Homogeneous, EPSILON) => bg.epsilon_r,
            (MaterialProfile::Homogeneous, MU) => bg.mu_r,
            (MaterialProfile::Interface { epsilon, .. }, EPSILON) => epsilon.value(x),
            (MaterialProfile::Interface { mu, .. }, MU) => mu.value(x),
            (MaterialProfile::MovingGaussian { epsilon, .. }, EPSILON) => {
                bg.epsilon_r + epsilon.map_or(0.0, |p| p.value(t, x))
            }
            (MaterialProfile::MovingGaussian { mu, .. }, MU) => {
                bg.mu_r + mu.map_or(0.0, |p| p.value(t, x))
            }
            (MaterialProfile::MovingGaussian { epsilon, .. }, EPSILON_RATE) => {
                epsilon.map_or(0.0, |p| p.rate(t, x))
            }
            (MaterialProfile::MovingGaussian { mu, .. }, MU_RATE) => {
                mu.map_or(0.0, |p| p.rate(t, x))
            }
            // Static profiles have no time dependence
            _ => 0.0,
        }
    }

    /// All four auxiliary components at a single point
    pub fn evaluate_point(&self, t: f64, x: f64) -> [f64; AUX_ROWS] {
        [
            self.component(EPSILON, t, x),
            self.component(MU, t, x),
            self.component(EPSILON_RATE, t, x),
            self.component(MU_RATE, t, x),
        ]
    }

    /// Evaluate the profile at every position
    ///
    /// # Errors
    ///
    /// Returns `ModelError::NonFinite` with the offending time and position if
    /// any component is NaN or infinite.
    pub fn evaluate(&self, t: f64, x: &[f64]) -> Result<RowArray, ModelError> {
        let mut out = RowArray::aux(x.len());
        self.evaluate_into(t, x, &mut out)?;
        Ok(out)
    }

    /// Evaluate into an existing 4×len(x) array, overwriting every entry
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ShapeMismatch` if `out` is not 4×len(x), or
    /// `ModelError::NonFinite` as [`Self::evaluate`].
    pub fn evaluate_into(&self, t: f64, x: &[f64], out: &mut RowArray) -> Result<(), ModelError> {
        out.expect_shape("aux", AUX_ROWS, x.len())?;
        if x.is_empty() {
            return Ok(());
        }
        for (row, dst) in out.data.chunks_mut(x.len()).enumerate() {
            dst.par_iter_mut()
                .zip(x.par_iter())
                .for_each(|(d, &xi)| *d = self.component(row, t, xi));
        }
        ensure_finite(out, &AUX_QUANTITIES, t, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PerturbationParameters, SimulationParameters};
    use approx::assert_relative_eq;

    fn evaluator(params: SimulationParameters) -> MaterialEvaluator {
        MaterialEvaluator::new(Arc::new(Configuration::new(params).unwrap()))
    }

    fn moving(velocity: f64) -> MaterialEvaluator {
        evaluator(
            SimulationParameters {
                material_shape: "moving_gaussian".to_string(),
                ..Default::default()
            }
            .with_matched_perturbation(PerturbationParameters {
                amplitude: 0.5,
                width: 5e-6,
                offset: 100e-6,
                velocity,
            }),
        )
    }

    #[test]
    fn test_homogeneous_is_background() {
        let eval = evaluator(SimulationParameters {
            material_shape: "homogeneous".to_string(),
            ..Default::default()
        });
        let aux = eval.evaluate(3.0, &[-1e-6, 0.0, 250e-6, 600e-6]).unwrap();
        assert!(aux.row(EPSILON).iter().all(|&v| v == 1.5));
        assert!(aux.row(MU).iter().all(|&v| v == 1.5));
        assert!(aux.row(EPSILON_RATE).iter().all(|&v| v == 0.0));
        assert!(aux.row(MU_RATE).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_interface_tie_break() {
        let eval = evaluator(SimulationParameters::default());
        for t in [0.0, 1e-12, 42.0] {
            let aux = eval.evaluate(t, &[100e-6, 250e-6, 400e-6]).unwrap();
            assert_eq!(aux.row(EPSILON), &[1.0, 4.0, 4.0]);
            assert_eq!(aux.row(MU), &[1.0, 4.0, 4.0]);
            assert!(aux.row(EPSILON_RATE).iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_gaussian_peak_moves_with_velocity() {
        let v = 1e8;
        let eval = moving(v);
        let t = 1e-13;
        let center = 100e-6 + v * t;
        let [eps, mu, eps_t, mu_t] = eval.evaluate_point(t, center);
        assert_relative_eq!(eps, 2.0);
        assert_relative_eq!(mu, 2.0);
        // Derivative vanishes at the peak (rates elsewhere are of order 1e13)
        assert!(eps_t.abs() < 1e-3);
        assert!(mu_t.abs() < 1e-3);

        // Ahead of the peak the material rises as the bump arrives
        let [_, _, ahead_rate, _] = eval.evaluate_point(t, center + 2e-6);
        assert!(ahead_rate > 0.0);
    }

    #[test]
    fn test_static_gaussian_has_zero_rate() {
        let eval = moving(0.0);
        let x: Vec<f64> = (0..50).map(|i| f64::from(i) * 4e-6).collect();
        let aux = eval.evaluate(7.5, &x).unwrap();
        assert!(aux.row(EPSILON_RATE).iter().all(|&v| v == 0.0));
        assert!(aux.row(MU_RATE).iter().all(|&v| v == 0.0));
        assert!(aux.row(EPSILON).iter().any(|&v| v > 1.5));
    }

    #[test]
    fn test_evaluate_into_checks_shape() {
        let eval = evaluator(SimulationParameters::default());
        let mut wrong = RowArray::field(3);
        let err = eval.evaluate_into(0.0, &[0.0, 1.0, 2.0], &mut wrong).unwrap_err();
        assert!(matches!(err, ModelError::ShapeMismatch { array: "aux", .. }));
    }

    #[test]
    fn test_empty_positions() {
        let eval = evaluator(SimulationParameters::default());
        let aux = eval.evaluate(0.0, &[]).unwrap();
        assert_eq!(aux.len, 0);
    }

    #[test]
    fn test_non_finite_position_is_reported() {
        let eval = moving(1.0);
        let err = eval.evaluate(0.5, &[0.0, f64::NAN]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::NonFinite { quantity: "epsilon_r", time, .. } if time == 0.5
        ));
    }
}
