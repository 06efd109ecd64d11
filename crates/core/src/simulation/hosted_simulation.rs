//! Hook sequencing on behalf of a host engine
//!
//! `HostedSimulation` performs the calls a finite-volume engine makes into the
//! `MaterialModel` around each stage: refresh the auxiliary state, build
//! ghost-padded copies of `q` and `aux`, fill their ghost cells, and copy the
//! updated interior back. It does no flux computation or time integration;
//! those belong to the engine that consumes the [`StageBuffers`].

use crate::config::{Configuration, ProblemData, SimulationParameters};
use crate::core_types::RowArray;
use crate::error::ModelError;
use crate::solver::{EmMaterialModel, MaterialModel, SolverState};
use std::sync::Arc;
use tracing::{debug, info};

/// Ghost-padded arrays for one stage
#[derive(Debug, Clone, PartialEq)]
pub struct StageBuffers {
    /// Field state with `num_ghost` columns on each side
    pub qbc: RowArray,
    /// Auxiliary state with `num_ghost` columns on each side
    pub auxbc: RowArray,
    pub num_ghost: usize,
}

impl StageBuffers {
    /// Interior columns of `qbc`
    ///
    /// # Errors
    ///
    /// `ModelError::InvalidParameter` if `qbc` is narrower than its ghost columns.
    pub fn interior_q(&self) -> Result<RowArray, ModelError> {
        let n = self
            .num_ghost
            .checked_mul(2)
            .and_then(|ghosts| self.qbc.len.checked_sub(ghosts))
            .ok_or_else(|| {
                ModelError::invalid(
                    "num_ghost",
                    format!(
                        "{} ghost cells per side do not fit a row of {}",
                        self.num_ghost, self.qbc.len
                    ),
                )
            })?;
        let mut q = RowArray::new(self.qbc.rows, n);
        for row in 0..self.qbc.rows {
            q.row_mut(row)
                .copy_from_slice(&self.qbc.row(row)[self.num_ghost..self.num_ghost + n]);
        }
        Ok(q)
    }
}

/// Copy the last interior column into every upper ghost column
fn extrapolate_upper(values: &mut RowArray, num_cells: usize, num_ghost: usize) {
    let last = num_ghost + num_cells - 1;
    for row in 0..values.rows {
        let r = values.row_mut(row);
        let edge = r[last];
        r[last + 1..].fill(edge);
    }
}

/// Material model plus host-owned state, driven stage by stage
pub struct HostedSimulation {
    /// Backend-agnostic material model
    model: Box<dyn MaterialModel>,
    state: SolverState,
    num_ghost: usize,
    steps: u64,
}

impl HostedSimulation {
    /// Build the model and a zero-initialised state from raw parameters
    ///
    /// # Errors
    ///
    /// Configuration errors, or evaluation errors from the initial auxiliary fill.
    pub fn new(params: SimulationParameters) -> Result<Self, ModelError> {
        let config = Arc::new(Configuration::new(params)?);
        let grid = config.grid()?;
        let mut state = SolverState::new(grid, 0.0);
        state.problem_data = ProblemData::from_configuration(&config, grid.delta());
        let num_ghost = config.num_ghost();
        Self::with_model(Box::new(EmMaterialModel::new(config)), state, num_ghost)
    }

    /// Attach an existing model to a host state
    ///
    /// Runs the initial condition and the first auxiliary refresh.
    ///
    /// # Errors
    ///
    /// Shape errors from `state`, a `num_ghost` whose padded arrays cannot be
    /// sized, or evaluation errors from the model.
    pub fn with_model(
        model: Box<dyn MaterialModel>,
        mut state: SolverState,
        num_ghost: usize,
    ) -> Result<Self, ModelError> {
        state.validate()?;
        state.grid.padded_len(num_ghost)?;
        model.set_initial_conditions(&mut state)?;
        model.before_step(&mut state)?;

        info!(
            "Hosted simulation initialized: {} cells, dx={:e} m, {} ghost cells",
            state.num_cells(),
            state.grid.delta(),
            num_ghost
        );

        Ok(Self {
            model,
            state,
            num_ghost,
            steps: 0,
        })
    }

    pub fn state(&self) -> &SolverState {
        &self.state
    }

    /// Mutable state for the host's own update of `q`
    pub fn state_mut(&mut self) -> &mut SolverState {
        &mut self.state
    }

    pub fn model(&self) -> &dyn MaterialModel {
        self.model.as_ref()
    }

    pub fn time(&self) -> f64 {
        self.state.t
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn num_ghost(&self) -> usize {
        self.num_ghost
    }

    /// Run the before-step hook and build the ghost-padded arrays for `stage`
    ///
    /// Stage 0 always refreshes the auxiliary state; later stages refresh
    /// only when the model asks for it.
    ///
    /// # Errors
    ///
    /// Any hook error; the run should stop.
    pub fn prepare_stage(&mut self, stage: usize) -> Result<StageBuffers, ModelError> {
        if stage == 0 || self.model.refresh_each_stage() {
            self.model.before_step(&mut self.state)?;
        }

        let n = self.state.num_cells();
        let g = self.num_ghost;
        let grid = self.state.grid;
        let t = self.state.t;
        let padded = grid.padded_len(g)?;

        let mut qbc = RowArray::field(padded);
        qbc.write_columns(g, &self.state.q)?;
        self.model.fill_field_lower(&grid, t, &mut qbc, g)?;
        extrapolate_upper(&mut qbc, n, g);

        let mut auxbc = RowArray::aux(padded);
        auxbc.write_columns(g, &self.state.aux)?;
        self.model.fill_aux_lower(&grid, t, &mut auxbc, g)?;
        self.model.fill_aux_upper(&grid, t, &mut auxbc, g)?;

        debug!("Prepared stage {} at t={:e}", stage, t);
        Ok(StageBuffers {
            qbc,
            auxbc,
            num_ghost: g,
        })
    }

    /// Copy the interior of an updated `qbc` back into the field state
    ///
    /// # Errors
    ///
    /// `ModelError::ShapeMismatch` if the buffers do not match this run.
    pub fn commit_stage(&mut self, buffers: &StageBuffers) -> Result<(), ModelError> {
        let padded = self.state.grid.padded_len(self.num_ghost)?;
        buffers.qbc.expect_shape("qbc", self.state.q.rows, padded)?;
        if buffers.num_ghost != self.num_ghost {
            return Err(ModelError::invalid(
                "num_ghost",
                format!("expected {}, got {}", self.num_ghost, buffers.num_ghost),
            ));
        }
        self.state.q = buffers.interior_q()?;
        Ok(())
    }

    /// Advance the simulation clock after a completed step
    ///
    /// # Errors
    ///
    /// `ModelError::InvalidParameter` if `dt` is not finite and positive.
    pub fn advance_time(&mut self, dt: f64) -> Result<(), ModelError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ModelError::invalid(
                "dt",
                format!("must be finite and positive, got {dt}"),
            ));
        }
        self.state.t += dt;
        self.steps += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{ELECTRIC, EPSILON, MAGNETIC};

    fn params() -> SimulationParameters {
        let mut params = SimulationParameters::default();
        params.geometry.x_upper = 5e-6;
        params.geometry.num_ghost = 2;
        params.interface.position = Some(2.5e-6);
        params
    }

    #[test]
    fn test_initial_state() {
        let sim = HostedSimulation::new(params()).unwrap();
        assert_eq!(sim.state().num_cells(), 300);
        assert!(sim.state().q.data.iter().all(|&v| v == 0.0));
        assert_eq!(sim.state().aux.get(EPSILON, 0), 1.0);
        assert_eq!(sim.state().aux.get(EPSILON, 299), 4.0);
        assert_eq!(sim.state().problem_data.get("dx"), Some(sim.state().grid.delta()));
    }

    #[test]
    fn test_stage_buffers_layout() {
        let mut sim = HostedSimulation::new(params()).unwrap();
        sim.state_mut().q.set(ELECTRIC, 299, 0.75);
        let buffers = sim.prepare_stage(0).unwrap();
        assert_eq!(buffers.qbc.len, 304);

        // Upper field ghosts are extrapolated from the last interior cell
        let e = buffers.qbc.row(ELECTRIC);
        assert_eq!(&e[302..], &[0.75, 0.75]);

        // Lower field ghosts carry the incident plane wave
        let ghosts = sim.state().grid.lower_ghost_centers(2);
        let k = 2.0 * std::f64::consts::PI / 1e-6;
        assert_eq!(e[0], (k * ghosts[0]).sin());
        assert_eq!(buffers.qbc.row(MAGNETIC)[1], (k * ghosts[1]).sin());

        let eps = buffers.auxbc.row(EPSILON);
        assert_eq!(&eps[..2], &[1.0, 1.0]);
        assert_eq!(&eps[302..], &[4.0, 4.0]);
    }

    #[test]
    fn test_commit_stage_copies_interior() {
        let mut sim = HostedSimulation::new(params()).unwrap();
        let mut buffers = sim.prepare_stage(0).unwrap();
        buffers.qbc.row_mut(MAGNETIC)[2..302].fill(0.5);
        sim.commit_stage(&buffers).unwrap();
        assert!(sim.state().q.row(MAGNETIC).iter().all(|&v| v == 0.5));
    }

    #[test]
    fn test_stage_refresh_policy() {
        let mut p = params();
        p.refresh_each_stage = false;
        let mut sim = HostedSimulation::new(p).unwrap();
        sim.state_mut().aux.fill(-1.0);
        let later = sim.prepare_stage(1).unwrap();
        assert_eq!(later.auxbc.get(EPSILON, 2), -1.0);
        let first = sim.prepare_stage(0).unwrap();
        assert_eq!(first.auxbc.get(EPSILON, 2), 1.0);
    }

    #[test]
    fn test_unsizable_ghost_count_is_an_error() {
        let mut p = params();
        p.geometry.num_ghost = usize::MAX / 2 + 1;
        assert!(matches!(
            HostedSimulation::new(p),
            Err(ModelError::InvalidParameter { name: "num_ghost", .. })
        ));

        let config = Arc::new(Configuration::new(params()).unwrap());
        let state = SolverState::new(config.grid().unwrap(), 0.0);
        let model = Box::new(EmMaterialModel::new(config));
        assert!(HostedSimulation::with_model(model, state, usize::MAX / 2 + 1).is_err());
    }

    #[test]
    fn test_interior_of_narrow_buffers_is_an_error() {
        let buffers = StageBuffers {
            qbc: RowArray::field(3),
            auxbc: RowArray::aux(3),
            num_ghost: 2,
        };
        assert!(buffers.interior_q().is_err());
    }

    #[test]
    fn test_advance_time() {
        let mut sim = HostedSimulation::new(params()).unwrap();
        sim.advance_time(0.005).unwrap();
        sim.advance_time(0.005).unwrap();
        assert_eq!(sim.steps(), 2);
        assert!((sim.time() - 0.01).abs() < 1e-15);
        assert!(sim.advance_time(-1.0).is_err());
    }
}
