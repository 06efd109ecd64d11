//! Host hook interface
//!
//! This module defines the `MaterialModel` trait: the set of callbacks a
//! finite-volume host engine invokes around each step. The host owns the
//! grid and the state arrays; the model only reads time and positions and
//! overwrites the arrays it is handed.

use super::SolverState;
use crate::core_types::{RowArray, UniformGrid};
use crate::error::ModelError;

/// Material response and boundary source of the medium, as seen by the host
///
/// Every method is re-entrant. A host that splits the domain across threads
/// may call `evaluate` on disjoint position ranges concurrently; it is the
/// host's job not to let two hooks write the same buffer at once.
pub trait MaterialModel: Send + Sync {
    /// Evaluate `[ε_r, μ_r, ∂ε_r/∂t, ∂μ_r/∂t]` at time `t` for positions `x`
    ///
    /// # Errors
    ///
    /// `ModelError::NonFinite` with the offending time and position.
    fn evaluate(&self, t: f64, x: &[f64]) -> Result<RowArray, ModelError>;

    /// Called before every step (and every stage when
    /// [`Self::refresh_each_stage`] is set) to rebuild `state.aux` at `state.t`
    ///
    /// # Errors
    ///
    /// Shape or evaluation errors; both are fatal for the run.
    fn before_step(&self, state: &mut SolverState) -> Result<(), ModelError>;

    /// Fill the lower ghost columns of the ghost-padded auxiliary array
    ///
    /// # Errors
    ///
    /// Shape or evaluation errors.
    fn fill_aux_lower(
        &self,
        grid: &UniformGrid,
        t: f64,
        auxbc: &mut RowArray,
        num_ghost: usize,
    ) -> Result<(), ModelError>;

    /// Fill the upper ghost columns of the ghost-padded auxiliary array
    ///
    /// # Errors
    ///
    /// Shape or evaluation errors.
    fn fill_aux_upper(
        &self,
        grid: &UniformGrid,
        t: f64,
        auxbc: &mut RowArray,
        num_ghost: usize,
    ) -> Result<(), ModelError>;

    /// Inject the incident wave into the lower ghost columns of the
    /// ghost-padded field array. The upper side is left to the host.
    ///
    /// # Errors
    ///
    /// Shape or evaluation errors.
    fn fill_field_lower(
        &self,
        grid: &UniformGrid,
        t: f64,
        qbc: &mut RowArray,
        num_ghost: usize,
    ) -> Result<(), ModelError>;

    /// Zero the field state at the start of the run
    ///
    /// # Errors
    ///
    /// `ModelError::ShapeMismatch` if `q` does not match the grid.
    fn set_initial_conditions(&self, state: &mut SolverState) -> Result<(), ModelError>;

    /// Effective capacity `linear + nonlinear` on the interior cells, rows `[ε, μ]`
    ///
    /// # Errors
    ///
    /// Shape or evaluation errors.
    fn capacity(&self, state: &SolverState) -> Result<RowArray, ModelError>;

    /// Time-centered derivative of the linear response on the interior cells
    ///
    /// # Errors
    ///
    /// Invalid `dt` or evaluation errors.
    fn response_rate(&self, state: &SolverState, dt: f64) -> Result<RowArray, ModelError>;

    /// Whether `before_step` should run before every stage, not only every step
    fn refresh_each_stage(&self) -> bool;
}
