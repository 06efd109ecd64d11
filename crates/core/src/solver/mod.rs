//! Host-facing solver hooks
//!
//! The core abstraction is the `MaterialModel` trait: the callbacks a
//! finite-volume wave-propagation engine invokes before each step or stage,
//! when it fills ghost cells, and once at start-up. `EmMaterialModel` is the
//! implementation backed by the configured material profile, nonlinear
//! response and incident wave.
//!
//! # Example
//!
//! ```
//! use em1d_core::config::SimulationParameters;
//! use em1d_core::solver::{create_material_model, SolverState};
//!
//! let model = create_material_model(SimulationParameters::default()).unwrap();
//! let grid = em1d_core::config::Configuration::new(SimulationParameters::default())
//!     .unwrap()
//!     .grid()
//!     .unwrap();
//! let mut state = SolverState::new(grid, 0.0);
//! model.set_initial_conditions(&mut state).unwrap();
//! model.before_step(&mut state).unwrap();
//! ```

mod boundary;
mod initial;
mod model;
pub mod profiler;
mod state;
mod synchronizer;
#[allow(clippy::module_name_repetitions)]
mod r#trait;

// Re-exports
pub use boundary::{AuxBoundary, ScatteringBoundary};
pub use initial::set_zero_field;
pub use model::EmMaterialModel;
pub use profiler::ProfilerScope;
pub use r#trait::MaterialModel;
pub use state::SolverState;
pub use synchronizer::AuxSynchronizer;

use crate::config::{Configuration, SimulationParameters};
use crate::error::ModelError;
use std::sync::Arc;
use tracing::info;

/// Build the material and boundary model for a run
///
/// Resolves and validates `params` once; the returned model shares the
/// immutable configuration with all of its components.
///
/// # Errors
///
/// Any configuration error from [`Configuration::new`]; the run must not
/// start with an undefined material law.
pub fn create_material_model(
    params: SimulationParameters,
) -> Result<Box<dyn MaterialModel>, ModelError> {
    let config = Arc::new(Configuration::new(params)?);
    info!(
        "Using material model: {} profile, {} excitation, refresh each stage={}",
        config.material().shape(),
        config.incident().excitation.kind(),
        config.refresh_each_stage()
    );
    Ok(Box::new(EmMaterialModel::new(config)))
}
