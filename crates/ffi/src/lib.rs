//! C ABI for the one-dimensional electromagnetic material model
//!
//! A host written in C or C++ creates one [`EmModelInstance`] per run with
//! `em_model_new`, calls the hook functions with its own buffers, and frees
//! the handle with `em_model_destroy`. The per-step hooks are
//! `em_model_before_step`, `em_model_fill_aux_lower` / `em_model_fill_aux_upper`
//! and `em_model_fill_field_lower`. Every function returns an
//! [`EmErrorCode`]; details of the last failure on the calling thread are
//! available from `em_get_last_error`.
//!
//! All buffers are row-major `f64` arrays: a field array of `n` cells is
//! `2 * n` values (electric row, then magnetic row), an auxiliary array is
//! `4 * n` values (ε_r, μ_r, ∂ε_r/∂t, ∂μ_r/∂t).

mod error;
mod helpers;
mod instance;
mod parameters;

pub use error::{em_get_last_error, em_get_last_error_code, EmErrorCode};
pub use instance::{
    em_model_before_step, em_model_capacity, em_model_cell_count, em_model_destroy,
    em_model_evaluate, em_model_fill_aux_lower, em_model_fill_aux_upper,
    em_model_fill_field_lower, em_model_new, em_model_response_rate,
    em_model_set_initial_conditions, EmModelInstance,
};
pub use parameters::{
    em_parameters_default, EmParameters, EmPerturbation, EM_EXCITATION_GAUSS_PULSE,
    EM_EXCITATION_PLANE, EM_EXCITATION_SIMPLE_PULSE, EM_MATERIAL_HOMOGENEOUS,
    EM_MATERIAL_INTERFACE, EM_MATERIAL_MOVING_GAUSSIAN,
};
