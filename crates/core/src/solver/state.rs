//! Host-owned solver state handed to the hooks

use crate::config::ProblemData;
use crate::core_types::{RowArray, UniformGrid, AUX_ROWS, FIELD_ROWS};
use crate::error::ModelError;

/// Field state, auxiliary state, time and parameter store of one run
///
/// `q` and `aux` cover the interior cells only; ghost-padded copies are built
/// by the host for each stage and filled through the boundary hooks.
#[derive(Debug, Clone)]
pub struct SolverState {
    pub grid: UniformGrid,
    /// Field state, rows `[E, H]`
    pub q: RowArray,
    /// Auxiliary state, rows `[ε_r, μ_r, ∂ε_r/∂t, ∂μ_r/∂t]`
    pub aux: RowArray,
    /// Current simulation time
    pub t: f64,
    pub problem_data: ProblemData,
}

impl SolverState {
    /// Zero-filled state on `grid` at time `t`
    pub fn new(grid: UniformGrid, t: f64) -> Self {
        let n = grid.num_cells();
        Self {
            grid,
            q: RowArray::field(n),
            aux: RowArray::aux(n),
            t,
            problem_data: ProblemData::default(),
        }
    }

    pub fn num_cells(&self) -> usize {
        self.grid.num_cells()
    }

    /// Check `q` and `aux` against the grid
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ShapeMismatch` for the first array with the wrong shape.
    pub fn validate(&self) -> Result<(), ModelError> {
        let n = self.num_cells();
        self.q.expect_shape("q", FIELD_ROWS, n)?;
        self.aux.expect_shape("aux", AUX_ROWS, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_zero() {
        let grid = UniformGrid::new(0.0, 1.0, 8).unwrap();
        let state = SolverState::new(grid, 0.0);
        assert_eq!(state.q.len, 8);
        assert_eq!(state.aux.rows, AUX_ROWS);
        assert!(state.q.data.iter().all(|&v| v == 0.0));
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_validate_detects_wrong_rows() {
        let grid = UniformGrid::new(0.0, 1.0, 8).unwrap();
        let mut state = SolverState::new(grid, 0.0);
        state.aux = RowArray::new(3, 8);
        assert!(matches!(
            state.validate(),
            Err(ModelError::ShapeMismatch { array: "aux", rows: 3, .. })
        ));
    }
}
