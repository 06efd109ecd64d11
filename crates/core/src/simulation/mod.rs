//! Stage-by-stage hook sequencing for a host engine

mod hosted_simulation;

pub use hosted_simulation::{HostedSimulation, StageBuffers};
