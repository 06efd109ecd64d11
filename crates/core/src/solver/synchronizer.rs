//! Auxiliary state synchronizer
//!
//! Overwrites the whole auxiliary array from the material profile at the
//! current time. There is no blending with the previous array: the result
//! depends only on `(t, centers, configuration)`.

use super::profiler::ProfilerScope;
use super::SolverState;
use crate::core_types::AUX_ROWS;
use crate::error::ModelError;
use crate::physics::MaterialEvaluator;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct AuxSynchronizer {
    evaluator: MaterialEvaluator,
}

impl AuxSynchronizer {
    pub fn new(evaluator: MaterialEvaluator) -> Self {
        Self { evaluator }
    }

    /// Recompute `state.aux` at `state.t`; `state.q` is left untouched
    ///
    /// # Errors
    ///
    /// `ModelError::ShapeMismatch` if `aux` does not match the grid, or the
    /// evaluator's `ModelError::NonFinite`.
    pub fn refresh(&self, state: &mut SolverState) -> Result<(), ModelError> {
        let _scope = ProfilerScope::new("aux refresh");
        let n = state.num_cells();
        state.aux.expect_shape("aux", AUX_ROWS, n)?;
        let centers = state.grid.centers();
        self.evaluator.evaluate_into(state.t, &centers, &mut state.aux)?;
        debug!("Refreshed auxiliary state: t={:e}, {} cells", state.t, n);
        Ok(())
    }
}
