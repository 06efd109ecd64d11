//! Constitutive physics of the one-dimensional medium
//!
//! - [`material_profile`]: ε_r, μ_r and their time derivatives at (t, x)
//! - [`nonlinear`]: χ2/χ3 correction and time-centered response rate
//! - [`source`]: incident wave injected through the lower boundary
//!
//! All evaluators are stateless apart from the shared configuration, so a host
//! may call them concurrently on disjoint position ranges.

pub mod material_profile;
pub mod nonlinear;
pub mod source;

pub use material_profile::MaterialEvaluator;
pub use nonlinear::NonlinearResponse;
pub use source::SourceInjector;

use crate::core_types::RowArray;
use crate::error::ModelError;

/// Report the first non-finite entry of `values` (one row per quantity)
pub(crate) fn ensure_finite(
    values: &RowArray,
    quantities: &[&'static str],
    time: f64,
    positions: &[f64],
) -> Result<(), ModelError> {
    for (row, &quantity) in quantities.iter().enumerate().take(values.rows) {
        if let Some(i) = values.row(row).iter().position(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite {
                quantity,
                time,
                position: positions.get(i).copied().unwrap_or(f64::NAN),
            });
        }
    }
    Ok(())
}
