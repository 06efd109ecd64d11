//! One-dimensional electromagnetic material core
//!
//! Constitutive response of a 1-D medium driven by a finite-volume Maxwell
//! solver, and the incident wave that enters through the lower boundary.
//! The host engine owns the grid, the state arrays and the time stepping; this
//! crate supplies the callbacks it invokes around every step.
//!
//! ## Components
//!
//! - Material profile evaluator: homogeneous, step interface, or moving
//!   Gaussian perturbation of ε_r and μ_r, with analytic time derivatives
//! - Nonlinear response: χ2/χ3 capacity correction and the time-centered
//!   derivative of the linear response
//! - Auxiliary synchronizer, boundary fills and zero initial condition behind
//!   the `MaterialModel` trait
//! - `HostedSimulation`: the stage-by-stage hook sequence a host performs

// Core types and utilities
pub mod core_types;
pub mod error;

// Configuration surface
pub mod config;

// Physics and host hooks
pub mod physics;
pub mod simulation;
pub mod solver;

// Re-export core types
pub use core_types::{RowArray, UniformGrid};
pub use error::ModelError;

// Re-export configuration and hooks
pub use config::{Configuration, SimulationParameters};
pub use physics::{MaterialEvaluator, NonlinearResponse, SourceInjector};
pub use simulation::{HostedSimulation, StageBuffers};
pub use solver::{create_material_model, EmMaterialModel, MaterialModel, SolverState};
