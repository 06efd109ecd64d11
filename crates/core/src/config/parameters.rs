//! Raw run parameters
//!
//! Flat, serializable parameter set as the orchestration layer hands it over.
//! Selectors are plain strings here; they are resolved into closed enums by
//! [`Configuration::new`](super::Configuration::new).

use serde::{Deserialize, Serialize};

/// Domain extent and resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryParameters {
    /// Lower domain bound (m)
    pub x_lower: f64,
    /// Upper domain bound (m)
    pub x_upper: f64,
    /// Cells per excitation wavelength
    pub cells_per_wavelength: f64,
    /// Ghost cells on each side
    pub num_ghost: usize,
}

impl Default for GeometryParameters {
    fn default() -> Self {
        Self {
            x_lower: 0.0,
            x_upper: 500e-6,
            cells_per_wavelength: 60.0,
            num_ghost: 3,
        }
    }
}

/// Background medium
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackgroundParameters {
    pub epsilon_r: f64,
    pub mu_r: f64,
}

impl Default for BackgroundParameters {
    fn default() -> Self {
        Self {
            epsilon_r: 1.5,
            mu_r: 1.5,
        }
    }
}

/// Step interface values (left of / right of the interface)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterfaceParameters {
    /// Interface position (m); `None` places it at the domain midpoint
    pub position: Option<f64>,
    pub epsilon: (f64, f64),
    pub mu: (f64, f64),
}

impl Default for InterfaceParameters {
    fn default() -> Self {
        Self {
            position: None,
            epsilon: (1.0, 4.0),
            mu: (1.0, 4.0),
        }
    }
}

/// Gaussian perturbation of one material quantity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerturbationParameters {
    /// Peak change Δ added to the background value
    pub amplitude: f64,
    /// Gaussian width σ (m)
    pub width: f64,
    /// Center position at t = 0 (m)
    pub offset: f64,
    /// Translation velocity (m/s)
    pub velocity: f64,
}

impl Default for PerturbationParameters {
    fn default() -> Self {
        Self {
            amplitude: 0.0,
            width: 0.0,
            offset: 10e-6,
            velocity: 0.0,
        }
    }
}

/// Second- and third-order susceptibilities
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NonlinearParameters {
    pub chi2_e: f64,
    pub chi3_e: f64,
    pub chi2_m: f64,
    pub chi3_m: f64,
}

/// Incident wave injected at the lower boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcitationParameters {
    /// `plane`, `gauss_pulse` or `simple_pulse`
    pub kind: String,
    /// Carrier wavelength (m)
    pub wavelength: f64,
    /// Spatial envelope width σ_x (m)
    pub width: f64,
    /// Extra delay added to the envelope reference time (s)
    pub time_offset: f64,
    /// Envelope center at the reference time (m)
    pub space_offset: f64,
    pub amplitude_e: f64,
    pub amplitude_h: f64,
}

impl Default for ExcitationParameters {
    fn default() -> Self {
        Self {
            kind: "plane".to_string(),
            wavelength: 1e-6,
            width: 1e-6,
            time_offset: 0.0,
            space_offset: 0.02e-6,
            amplitude_e: 1.0,
            amplitude_h: 1.0,
        }
    }
}

/// Complete raw parameter set for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    pub geometry: GeometryParameters,
    pub background: BackgroundParameters,
    /// `homogeneous`, `interface` or `moving_gaussian` (aliases `rip`, `gaussian1dx`)
    pub material_shape: String,
    pub interface: InterfaceParameters,
    pub perturbation_epsilon: PerturbationParameters,
    pub perturbation_mu: PerturbationParameters,
    pub nonlinear: NonlinearParameters,
    pub excitation: ExcitationParameters,
    /// Refresh the auxiliary state before every stage instead of every step
    pub refresh_each_stage: bool,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            geometry: GeometryParameters::default(),
            background: BackgroundParameters::default(),
            material_shape: "interface".to_string(),
            interface: InterfaceParameters::default(),
            perturbation_epsilon: PerturbationParameters::default(),
            perturbation_mu: PerturbationParameters::default(),
            nonlinear: NonlinearParameters::default(),
            excitation: ExcitationParameters::default(),
            refresh_each_stage: true,
        }
    }
}

impl SimulationParameters {
    /// Same perturbation for ε and μ (impedance-matched perturbation)
    pub fn with_matched_perturbation(mut self, perturbation: PerturbationParameters) -> Self {
        self.perturbation_epsilon = perturbation;
        self.perturbation_mu = perturbation;
        self
    }
}
