//! Electromagnetic material and boundary model
//!
//! `EmMaterialModel` wires the physics evaluators to the host hooks. It holds
//! no mutable state; everything it knows comes from the shared
//! [`Configuration`].

use super::boundary::{AuxBoundary, ScatteringBoundary};
use super::initial::set_zero_field;
use super::synchronizer::AuxSynchronizer;
use super::{MaterialModel, SolverState};
use crate::config::Configuration;
use crate::core_types::{RowArray, UniformGrid};
use crate::error::ModelError;
use crate::physics::{MaterialEvaluator, NonlinearResponse, SourceInjector};
use std::sync::Arc;

/// The single [`MaterialModel`] implementation
#[derive(Debug, Clone)]
pub struct EmMaterialModel {
    config: Arc<Configuration>,
    evaluator: MaterialEvaluator,
    nonlinear: NonlinearResponse,
    synchronizer: AuxSynchronizer,
    aux_boundary: AuxBoundary,
    scattering: ScatteringBoundary,
}

impl EmMaterialModel {
    pub fn new(config: Arc<Configuration>) -> Self {
        let evaluator = MaterialEvaluator::new(Arc::clone(&config));
        Self {
            nonlinear: NonlinearResponse::new(evaluator.clone()),
            synchronizer: AuxSynchronizer::new(evaluator.clone()),
            aux_boundary: AuxBoundary::new(evaluator.clone()),
            scattering: ScatteringBoundary::new(SourceInjector::new(Arc::clone(&config))),
            evaluator,
            config,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }
}

impl MaterialModel for EmMaterialModel {
    fn evaluate(&self, t: f64, x: &[f64]) -> Result<RowArray, ModelError> {
        self.evaluator.evaluate(t, x)
    }

    fn before_step(&self, state: &mut SolverState) -> Result<(), ModelError> {
        self.synchronizer.refresh(state)
    }

    fn fill_aux_lower(
        &self,
        grid: &UniformGrid,
        t: f64,
        auxbc: &mut RowArray,
        num_ghost: usize,
    ) -> Result<(), ModelError> {
        self.aux_boundary.fill_lower(grid, t, auxbc, num_ghost)
    }

    fn fill_aux_upper(
        &self,
        grid: &UniformGrid,
        t: f64,
        auxbc: &mut RowArray,
        num_ghost: usize,
    ) -> Result<(), ModelError> {
        self.aux_boundary.fill_upper(grid, t, auxbc, num_ghost)
    }

    fn fill_field_lower(
        &self,
        grid: &UniformGrid,
        t: f64,
        qbc: &mut RowArray,
        num_ghost: usize,
    ) -> Result<(), ModelError> {
        self.scattering.fill_lower(grid, t, qbc, num_ghost)
    }

    fn set_initial_conditions(&self, state: &mut SolverState) -> Result<(), ModelError> {
        set_zero_field(state)
    }

    fn capacity(&self, state: &SolverState) -> Result<RowArray, ModelError> {
        self.nonlinear.capacity(state.t, &state.grid.centers(), &state.q)
    }

    fn response_rate(&self, state: &SolverState, dt: f64) -> Result<RowArray, ModelError> {
        self.nonlinear.response_rate(state.t, dt, &state.grid.centers())
    }

    fn refresh_each_stage(&self) -> bool {
        self.config.refresh_each_stage()
    }
}
