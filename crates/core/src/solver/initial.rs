//! Zero-field initial condition

use super::SolverState;
use crate::core_types::FIELD_ROWS;
use crate::error::ModelError;

/// Set E and H to zero over all interior cells
///
/// # Errors
///
/// Returns `ModelError::ShapeMismatch` if `q` does not match the grid.
pub fn set_zero_field(state: &mut SolverState) -> Result<(), ModelError> {
    state.q.expect_shape("q", FIELD_ROWS, state.num_cells())?;
    state.q.fill(0.0);
    Ok(())
}
