//! Boundary source injector
//!
//! Computes the incident wave `amplitude · envelope(t, x) · carrier(t, x)` for
//! both field components. The result does not depend on the interior
//! solution: this is a scattering (incident-field) boundary, not a reflecting
//! or absorbing one.

use super::ensure_finite;
use crate::config::{Configuration, IncidentWave};
use crate::core_types::{RowArray, ELECTRIC, FIELD_ROWS, MAGNETIC};
use crate::error::ModelError;
use rayon::prelude::*;
use std::sync::Arc;

/// Evaluates the configured incident wave at arbitrary positions
#[derive(Debug, Clone)]
pub struct SourceInjector {
    config: Arc<Configuration>,
}

impl SourceInjector {
    pub fn new(config: Arc<Configuration>) -> Self {
        Self { config }
    }

    pub fn incident_wave(&self) -> &IncidentWave {
        self.config.incident()
    }

    /// `(E, H)` of the incident wave at a single point
    #[inline]
    pub fn incident_point(&self, t: f64, x: f64) -> (f64, f64) {
        let wave = self.incident_wave();
        let w = wave.excitation.waveform(t, x);
        (wave.amplitude_e * w, wave.amplitude_h * w)
    }

    /// Incident field at every position, rows `[E, H]`
    ///
    /// # Errors
    ///
    /// Returns `ModelError::NonFinite` with the offending time and position.
    pub fn incident(&self, t: f64, x: &[f64]) -> Result<RowArray, ModelError> {
        let mut out = RowArray::field(x.len());
        self.incident_into(t, x, &mut out)?;
        Ok(out)
    }

    /// Write the incident field into a 2×len(x) array
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ShapeMismatch` if `out` is not 2×len(x), or
    /// `ModelError::NonFinite` as [`Self::incident`].
    pub fn incident_into(&self, t: f64, x: &[f64], out: &mut RowArray) -> Result<(), ModelError> {
        out.expect_shape("q", FIELD_ROWS, x.len())?;
        let (e_row, h_row) = out.row_pair_mut(ELECTRIC, MAGNETIC);
        e_row
            .par_iter_mut()
            .zip(h_row.par_iter_mut())
            .zip(x.par_iter())
            .for_each(|((e, h), &xi)| {
                let (ev, hv) = self.incident_point(t, xi);
                *e = ev;
                *h = hv;
            });
        ensure_finite(out, &["incident E", "incident H"], t, x)
    }
}
