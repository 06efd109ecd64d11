//! Nonlinear response model
//!
//! Adds the second- and third-order susceptibility correction to the linear
//! material response and provides the time-centered derivative of the linear
//! response used by the host's dispersive source term.
//!
//! The nonlinear correction is evaluated from the current field state, not at
//! the half step, so the effective capacity is only first-order accurate in
//! time. This is a known approximation of the coupling.

use super::{ensure_finite, MaterialEvaluator};
use crate::config::NonlinearParameters;
use crate::core_types::{RowArray, ELECTRIC, EPSILON, FIELD_ROWS, MAGNETIC, MU};
use crate::error::ModelError;
use rayon::prelude::*;

/// χ2/χ3 correction on top of the linear material profile
#[derive(Debug, Clone)]
pub struct NonlinearResponse {
    evaluator: MaterialEvaluator,
    chi: NonlinearParameters,
}

impl NonlinearResponse {
    pub fn new(evaluator: MaterialEvaluator) -> Self {
        let chi = evaluator.config().nonlinear();
        Self { evaluator, chi }
    }

    /// Whether every susceptibility coefficient is zero
    pub fn is_linear(&self) -> bool {
        let c = self.chi;
        c.chi2_e == 0.0 && c.chi3_e == 0.0 && c.chi2_m == 0.0 && c.chi3_m == 0.0
    }

    /// `2·χ2·F + 3·χ3·F²` for a single field value
    #[inline]
    fn term(chi2: f64, chi3: f64, field: f64) -> f64 {
        2.0 * chi2 * field + 3.0 * chi3 * field * field
    }

    /// Nonlinear correction per cell, rows `[ε, μ]`
    ///
    /// The ε row is driven by the electric field, the μ row by the magnetic field.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ShapeMismatch` if `q` is not a 2-row field state.
    pub fn correction(&self, q: &RowArray) -> Result<RowArray, ModelError> {
        q.expect_shape("q", FIELD_ROWS, q.len)?;
        let mut out = RowArray::new(2, q.len);
        let chi = self.chi;
        let (eps, mu) = out.row_pair_mut(0, 1);
        eps.par_iter_mut()
            .zip(q.row(ELECTRIC).par_iter())
            .for_each(|(d, &e)| *d = Self::term(chi.chi2_e, chi.chi3_e, e));
        mu.par_iter_mut()
            .zip(q.row(MAGNETIC).par_iter())
            .for_each(|(d, &h)| *d = Self::term(chi.chi2_m, chi.chi3_m, h));
        Ok(out)
    }

    /// Effective capacity `linear(t, x) + nonlinear(q)`, rows `[ε, μ]`
    ///
    /// `x` and `q` must describe the same cells (the host passes interior
    /// centers together with the interior field state).
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ShapeMismatch` if `q` is not 2×len(x), or
    /// `ModelError::NonFinite` if the sum overflows.
    pub fn capacity(&self, t: f64, x: &[f64], q: &RowArray) -> Result<RowArray, ModelError> {
        q.expect_shape("q", FIELD_ROWS, x.len())?;
        let linear = self.evaluator.evaluate(t, x)?;
        let mut kappa = self.correction(q)?;
        for (row, aux_row) in [(0, EPSILON), (1, MU)] {
            for (k, &l) in kappa.row_mut(row).iter_mut().zip(linear.row(aux_row)) {
                *k += l;
            }
        }
        ensure_finite(&kappa, &["capacity epsilon", "capacity mu"], t, x)?;
        Ok(kappa)
    }

    /// Time-centered derivative of the linear response, rows `[ε, μ]`
    ///
    /// `(profile(t + dt/2, x) − profile(t − dt/2, x)) / dt`
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidParameter` if `dt` is not finite and
    /// positive, or `ModelError::NonFinite` from the profile evaluation.
    pub fn response_rate(&self, t: f64, dt: f64, x: &[f64]) -> Result<RowArray, ModelError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ModelError::invalid(
                "dt",
                format!("must be finite and positive, got {dt}"),
            ));
        }
        let ahead = self.evaluator.evaluate(t + 0.5 * dt, x)?;
        let behind = self.evaluator.evaluate(t - 0.5 * dt, x)?;
        let mut rate = RowArray::new(2, x.len());
        for (row, aux_row) in [(0, EPSILON), (1, MU)] {
            for ((r, &a), &b) in rate
                .row_mut(row)
                .iter_mut()
                .zip(ahead.row(aux_row))
                .zip(behind.row(aux_row))
            {
                *r = (a - b) / dt;
            }
        }
        ensure_finite(&rate, &["rate epsilon", "rate mu"], t, x)?;
        Ok(rate)
    }
}
