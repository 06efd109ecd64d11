//! Ghost-cell fills for the auxiliary and field states
//!
//! Arrays passed here are ghost-padded: `num_ghost` columns below the domain,
//! the interior cells, then `num_ghost` columns above.

use super::profiler::ProfilerScope;
use crate::core_types::{RowArray, UniformGrid, AUX_ROWS, FIELD_ROWS};
use crate::error::ModelError;
use crate::physics::{MaterialEvaluator, SourceInjector};
use tracing::debug;

fn expect_padded(
    array: &'static str,
    values: &RowArray,
    rows: usize,
    grid: &UniformGrid,
    num_ghost: usize,
) -> Result<(), ModelError> {
    values.expect_shape(array, rows, grid.padded_len(num_ghost)?)
}

/// Material-profile fills for the auxiliary ghost cells on both sides
#[derive(Debug, Clone)]
pub struct AuxBoundary {
    evaluator: MaterialEvaluator,
}

impl AuxBoundary {
    pub fn new(evaluator: MaterialEvaluator) -> Self {
        Self { evaluator }
    }

    /// Evaluate the profile on the lower ghost cells
    ///
    /// # Errors
    ///
    /// `ModelError::ShapeMismatch` if `auxbc` is not 4×(N + 2·num_ghost),
    /// `ModelError::InvalidParameter` if that length overflows, or
    /// `ModelError::NonFinite` from the evaluator.
    pub fn fill_lower(
        &self,
        grid: &UniformGrid,
        t: f64,
        auxbc: &mut RowArray,
        num_ghost: usize,
    ) -> Result<(), ModelError> {
        expect_padded("auxbc", auxbc, AUX_ROWS, grid, num_ghost)?;
        let ghosts = self.evaluator.evaluate(t, &grid.lower_ghost_centers(num_ghost))?;
        auxbc.write_columns(0, &ghosts)
    }

    /// Evaluate the profile on the upper ghost cells
    ///
    /// # Errors
    ///
    /// As [`Self::fill_lower`].
    pub fn fill_upper(
        &self,
        grid: &UniformGrid,
        t: f64,
        auxbc: &mut RowArray,
        num_ghost: usize,
    ) -> Result<(), ModelError> {
        expect_padded("auxbc", auxbc, AUX_ROWS, grid, num_ghost)?;
        let ghosts = self.evaluator.evaluate(t, &grid.upper_ghost_centers(num_ghost))?;
        auxbc.write_columns(grid.num_cells() + num_ghost, &ghosts)
    }
}

/// Scattering boundary: incident wave on the lower field ghost cells
#[derive(Debug, Clone)]
pub struct ScatteringBoundary {
    injector: SourceInjector,
}

impl ScatteringBoundary {
    pub fn new(injector: SourceInjector) -> Self {
        Self { injector }
    }

    /// Write the incident wave into the lower ghost columns of `qbc`
    ///
    /// Interior and upper ghost columns are not touched.
    ///
    /// # Errors
    ///
    /// `ModelError::ShapeMismatch` if `qbc` is not 2×(N + 2·num_ghost), or
    /// `ModelError::NonFinite` from the injector.
    pub fn fill_lower(
        &self,
        grid: &UniformGrid,
        t: f64,
        qbc: &mut RowArray,
        num_ghost: usize,
    ) -> Result<(), ModelError> {
        let _scope = ProfilerScope::new("scattering bc");
        expect_padded("qbc", qbc, FIELD_ROWS, grid, num_ghost)?;
        let incident = self.injector.incident(t, &grid.lower_ghost_centers(num_ghost))?;
        qbc.write_columns(0, &incident)?;
        debug!("Injected incident wave into {} ghost cells at t={:e}", num_ghost, t);
        Ok(())
    }
}
