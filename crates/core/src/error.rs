//! Error taxonomy for the material and boundary model
//!
//! Every failure is fatal for the run: the material law and the excitation are
//! static, so re-evaluating would only reproduce the same error. The host loop
//! is expected to stop on the first `Err`.

use thiserror::Error;

/// Errors raised while configuring or evaluating the model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Material-profile selector does not name a known profile
    #[error("unknown material profile '{0}' (expected homogeneous, interface or moving_gaussian)")]
    UnknownMaterialProfile(String),

    /// Excitation selector does not name a known source wave
    #[error("unknown excitation type '{0}' (expected plane, gauss_pulse or simple_pulse)")]
    UnknownExcitation(String),

    /// A scalar parameter is outside its admissible range
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Moving Gaussian perturbation with a non-zero amplitude but zero width
    #[error("moving gaussian perturbation of {field} has zero width")]
    ZeroWidthPerturbation { field: &'static str },

    /// Evaluation produced NaN or infinity
    #[error("non-finite {quantity} at t = {time:e}, x = {position:e}")]
    NonFinite {
        quantity: &'static str,
        time: f64,
        position: f64,
    },

    /// Host handed over an array of the wrong shape
    #[error(
        "{array} has shape {rows}x{len}, expected {expected_rows}x{expected_len}"
    )]
    ShapeMismatch {
        array: &'static str,
        expected_rows: usize,
        rows: usize,
        expected_len: usize,
        len: usize,
    },
}

impl ModelError {
    /// Whether the error was detected while building the configuration
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownMaterialProfile(_)
                | Self::UnknownExcitation(_)
                | Self::InvalidParameter { .. }
                | Self::ZeroWidthPerturbation { .. }
        )
    }

    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
