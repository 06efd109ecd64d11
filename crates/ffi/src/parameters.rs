//! FFI-exposed run parameters.
//!
//! `EmParameters` is a flat, `#[repr(C)]` mirror of
//! [`SimulationParameters`]. The string selectors of the Rust API become small
//! integer codes so the struct stays plain data on the C side; an unknown code
//! is reported as `EmErrorCode::InvalidConfiguration` when the model is built.

use crate::error::DefaultEmError;
use em1d_core::config::{
    BackgroundParameters, ExcitationParameters, GeometryParameters, InterfaceParameters,
    NonlinearParameters, PerturbationParameters,
};
use em1d_core::SimulationParameters;

/// Uniform medium.
pub const EM_MATERIAL_HOMOGENEOUS: u8 = 0;
/// Step in ε_r and μ_r at `interface_position`.
pub const EM_MATERIAL_INTERFACE: u8 = 1;
/// Gaussian bump travelling through the background.
pub const EM_MATERIAL_MOVING_GAUSSIAN: u8 = 2;

/// Continuous carrier wave.
pub const EM_EXCITATION_PLANE: u8 = 0;
/// Carrier under a travelling Gaussian envelope.
pub const EM_EXCITATION_GAUSS_PULSE: u8 = 1;
/// Bare travelling Gaussian envelope.
pub const EM_EXCITATION_SIMPLE_PULSE: u8 = 2;

const MATERIAL_NAMES: [&str; 3] = ["homogeneous", "interface", "moving_gaussian"];
const EXCITATION_NAMES: [&str; 3] = ["plane", "gauss_pulse", "simple_pulse"];

/// Moving Gaussian perturbation of one material component.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmPerturbation {
    /// Peak height added to the background value.
    pub amplitude: f64,
    /// Gaussian width in meters. May only be zero when `amplitude` is zero.
    pub width: f64,
    /// Peak position at t = 0 in meters.
    pub offset: f64,
    /// Peak velocity in m/s.
    pub velocity: f64,
}

impl From<PerturbationParameters> for EmPerturbation {
    fn from(p: PerturbationParameters) -> Self {
        Self {
            amplitude: p.amplitude,
            width: p.width,
            offset: p.offset,
            velocity: p.velocity,
        }
    }
}

impl From<EmPerturbation> for PerturbationParameters {
    fn from(p: EmPerturbation) -> Self {
        Self {
            amplitude: p.amplitude,
            width: p.width,
            offset: p.offset,
            velocity: p.velocity,
        }
    }
}

/// Run parameters passed to `em_model_new`.
///
/// Start from `em_parameters_default()` and override the fields you need.
///
/// ```c
/// EmParameters params = em_parameters_default();
/// params.material = EM_MATERIAL_MOVING_GAUSSIAN;
/// params.perturbation_epsilon.amplitude = 0.1;
/// params.perturbation_epsilon.width = 2e-6;
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmParameters {
    /// Lower domain bound in meters.
    pub x_lower: f64,
    /// Upper domain bound in meters.
    pub x_upper: f64,
    /// Grid resolution relative to the carrier wavelength.
    pub cells_per_wavelength: f64,
    /// Ghost columns per side the host pads its arrays with.
    pub num_ghost: usize,

    /// Background relative permittivity.
    pub epsilon_r: f64,
    /// Background relative permeability.
    pub mu_r: f64,

    /// One of the `EM_MATERIAL_*` codes.
    pub material: u8,
    /// Interface position in meters. NaN places it at the domain midpoint.
    pub interface_position: f64,
    /// ε_r to the left of the interface.
    pub interface_epsilon_left: f64,
    /// ε_r at and to the right of the interface.
    pub interface_epsilon_right: f64,
    /// μ_r to the left of the interface.
    pub interface_mu_left: f64,
    /// μ_r at and to the right of the interface.
    pub interface_mu_right: f64,
    pub perturbation_epsilon: EmPerturbation,
    pub perturbation_mu: EmPerturbation,

    pub chi2_e: f64,
    pub chi3_e: f64,
    pub chi2_m: f64,
    pub chi3_m: f64,

    /// One of the `EM_EXCITATION_*` codes.
    pub excitation: u8,
    /// Carrier wavelength in meters.
    pub wavelength: f64,
    /// Envelope width in meters (pulses only).
    pub pulse_width: f64,
    /// Shift of the envelope reference time in seconds.
    pub time_offset: f64,
    /// Envelope position offset in meters.
    pub space_offset: f64,
    /// Electric field amplitude of the incident wave.
    pub amplitude_e: f64,
    /// Magnetic field amplitude of the incident wave.
    pub amplitude_h: f64,

    /// Refresh the auxiliary array before every stage instead of every step.
    pub refresh_each_stage: bool,
}

impl Default for EmParameters {
    fn default() -> Self {
        Self::from(&SimulationParameters::default())
    }
}

impl From<&SimulationParameters> for EmParameters {
    fn from(params: &SimulationParameters) -> Self {
        Self {
            x_lower: params.geometry.x_lower,
            x_upper: params.geometry.x_upper,
            cells_per_wavelength: params.geometry.cells_per_wavelength,
            num_ghost: params.geometry.num_ghost,
            epsilon_r: params.background.epsilon_r,
            mu_r: params.background.mu_r,
            material: selector_code(&MATERIAL_NAMES, &params.material_shape)
                .unwrap_or(EM_MATERIAL_INTERFACE),
            interface_position: params.interface.position.unwrap_or(f64::NAN),
            interface_epsilon_left: params.interface.epsilon.0,
            interface_epsilon_right: params.interface.epsilon.1,
            interface_mu_left: params.interface.mu.0,
            interface_mu_right: params.interface.mu.1,
            perturbation_epsilon: params.perturbation_epsilon.into(),
            perturbation_mu: params.perturbation_mu.into(),
            chi2_e: params.nonlinear.chi2_e,
            chi3_e: params.nonlinear.chi3_e,
            chi2_m: params.nonlinear.chi2_m,
            chi3_m: params.nonlinear.chi3_m,
            excitation: selector_code(&EXCITATION_NAMES, &params.excitation.kind)
                .unwrap_or(EM_EXCITATION_PLANE),
            wavelength: params.excitation.wavelength,
            pulse_width: params.excitation.width,
            time_offset: params.excitation.time_offset,
            space_offset: params.excitation.space_offset,
            amplitude_e: params.excitation.amplitude_e,
            amplitude_h: params.excitation.amplitude_h,
            refresh_each_stage: params.refresh_each_stage,
        }
    }
}

fn selector_code(names: &[&str], name: &str) -> Option<u8> {
    names.iter().position(|n| *n == name).map(|i| i as u8)
}

impl EmParameters {
    /// Convert into the Rust-side parameters.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `material` or `excitation` is not a known code.
    /// Range checks are left to `Configuration::new`.
    pub(crate) fn simulation_parameters(&self) -> Result<SimulationParameters, DefaultEmError> {
        let material_shape = MATERIAL_NAMES
            .get(usize::from(self.material))
            .ok_or_else(|| DefaultEmError::unknown_material(self.material))?;
        let kind = EXCITATION_NAMES
            .get(usize::from(self.excitation))
            .ok_or_else(|| DefaultEmError::unknown_excitation(self.excitation))?;

        Ok(SimulationParameters {
            geometry: GeometryParameters {
                x_lower: self.x_lower,
                x_upper: self.x_upper,
                cells_per_wavelength: self.cells_per_wavelength,
                num_ghost: self.num_ghost,
            },
            background: BackgroundParameters {
                epsilon_r: self.epsilon_r,
                mu_r: self.mu_r,
            },
            material_shape: (*material_shape).to_string(),
            interface: InterfaceParameters {
                position: (!self.interface_position.is_nan()).then_some(self.interface_position),
                epsilon: (self.interface_epsilon_left, self.interface_epsilon_right),
                mu: (self.interface_mu_left, self.interface_mu_right),
            },
            perturbation_epsilon: self.perturbation_epsilon.into(),
            perturbation_mu: self.perturbation_mu.into(),
            nonlinear: NonlinearParameters {
                chi2_e: self.chi2_e,
                chi3_e: self.chi3_e,
                chi2_m: self.chi2_m,
                chi3_m: self.chi3_m,
            },
            excitation: ExcitationParameters {
                kind: (*kind).to_string(),
                wavelength: self.wavelength,
                width: self.pulse_width,
                time_offset: self.time_offset,
                space_offset: self.space_offset,
                amplitude_e: self.amplitude_e,
                amplitude_h: self.amplitude_h,
            },
            refresh_each_stage: self.refresh_each_stage,
        })
    }
}

/// Default run parameters: interface profile, plane wave at 1 µm.
#[no_mangle]
pub extern "C" fn em_parameters_default() -> EmParameters {
    EmParameters::default()
}
