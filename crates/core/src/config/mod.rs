//! Immutable run configuration
//!
//! [`SimulationParameters`] is the raw, serializable input. [`Configuration::new`]
//! validates it, resolves the selector strings into [`MaterialProfile`] and
//! [`Excitation`], and computes the [`DerivedConstants`] once. The result is
//! shared by `Arc` with every component and never mutated.
//!
//! # Example
//!
//! ```
//! use em1d_core::config::{Configuration, SimulationParameters};
//!
//! let params = SimulationParameters {
//!     material_shape: "homogeneous".to_string(),
//!     ..Default::default()
//! };
//! let config = Configuration::new(params).unwrap();
//! assert_eq!(config.num_cells(), 30_000);
//! ```

mod derived;
mod parameters;
mod problem_data;
mod selection;

pub use derived::{DerivedConstants, VACUUM_PERMEABILITY, VACUUM_PERMITTIVITY};
pub use parameters::{
    BackgroundParameters, ExcitationParameters, GeometryParameters, InterfaceParameters,
    NonlinearParameters, PerturbationParameters, SimulationParameters,
};
pub use problem_data::ProblemData;
pub use selection::{
    Carrier, Envelope, Excitation, ExcitationKind, GaussianPerturbation, MaterialProfile,
    MaterialShape, Step, ENVELOPE_REFERENCE_TIME,
};

use crate::core_types::{padded_len, UniformGrid};
use crate::error::ModelError;
use tracing::info;

/// Amplitudes and shape of the wave injected at the lower boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncidentWave {
    pub excitation: Excitation,
    pub amplitude_e: f64,
    pub amplitude_h: f64,
}

/// Validated, resolved configuration for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    x_lower: f64,
    x_upper: f64,
    num_cells: usize,
    num_ghost: usize,
    background: BackgroundParameters,
    material: MaterialProfile,
    nonlinear: NonlinearParameters,
    incident: IncidentWave,
    derived: DerivedConstants,
    refresh_each_stage: bool,
}

fn require_positive(name: &'static str, value: f64) -> Result<f64, ModelError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ModelError::invalid(
            name,
            format!("must be finite and positive, got {value}"),
        ))
    }
}

fn require_finite(name: &'static str, value: f64) -> Result<f64, ModelError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::invalid(name, format!("must be finite, got {value}")))
    }
}

impl Configuration {
    /// Validate raw parameters and resolve them into a configuration
    ///
    /// # Errors
    ///
    /// - `UnknownMaterialProfile` / `UnknownExcitation` for unrecognised selectors
    /// - `ZeroWidthPerturbation` for a moving Gaussian with zero width
    /// - `InvalidParameter` for non-finite or out-of-range scalars, or a ghost
    ///   count whose padded arrays cannot be sized
    pub fn new(params: SimulationParameters) -> Result<Self, ModelError> {
        let SimulationParameters {
            geometry,
            background,
            material_shape,
            interface,
            perturbation_epsilon,
            perturbation_mu,
            nonlinear,
            excitation: ex,
            refresh_each_stage,
        } = params;
        let x_lower = require_finite("x_lower", geometry.x_lower)?;
        let x_upper = require_finite("x_upper", geometry.x_upper)?;
        if x_upper <= x_lower {
            return Err(ModelError::invalid(
                "x_upper",
                format!("must exceed x_lower ({x_lower:e}), got {x_upper:e}"),
            ));
        }
        let cells_per_wavelength =
            require_positive("cells_per_wavelength", geometry.cells_per_wavelength)?;

        let background = BackgroundParameters {
            epsilon_r: require_positive("background epsilon_r", background.epsilon_r)?,
            mu_r: require_positive("background mu_r", background.mu_r)?,
        };

        let wavelength = require_positive("wavelength", ex.wavelength)?;
        let num_cells = (cells_per_wavelength * (x_upper - x_lower) / wavelength).floor() as usize;
        if num_cells == 0 {
            return Err(ModelError::invalid(
                "cells_per_wavelength",
                "domain resolves to zero cells",
            ));
        }
        let num_ghost = geometry.num_ghost;
        padded_len(num_cells, num_ghost)?;

        let shape: MaterialShape = material_shape.parse()?;
        let material = MaterialProfile::resolve(
            shape,
            &interface,
            0.5 * (x_lower + x_upper),
            &perturbation_epsilon,
            &perturbation_mu,
        )?;

        let nonlinear = NonlinearParameters {
            chi2_e: require_finite("chi2_e", nonlinear.chi2_e)?,
            chi3_e: require_finite("chi3_e", nonlinear.chi3_e)?,
            chi2_m: require_finite("chi2_m", nonlinear.chi2_m)?,
            chi3_m: require_finite("chi3_m", nonlinear.chi3_m)?,
        };

        let derived = DerivedConstants::compute(background.epsilon_r, background.mu_r, wavelength);
        let kind: ExcitationKind = ex.kind.parse()?;
        let carrier = Carrier {
            wavenumber: derived.wavenumber,
            angular_frequency: derived.angular_frequency,
        };
        let excitation = match kind {
            ExcitationKind::Plane => Excitation::Plane { carrier },
            ExcitationKind::GaussPulse | ExcitationKind::SimplePulse => {
                let envelope = Envelope {
                    width: require_positive("excitation width", ex.width)?,
                    space_offset: require_finite("space_offset", ex.space_offset)?,
                    reference_time: ENVELOPE_REFERENCE_TIME
                        + require_finite("time_offset", ex.time_offset)?,
                    velocity: derived.speed,
                };
                if kind == ExcitationKind::GaussPulse {
                    Excitation::GaussPulse { carrier, envelope }
                } else {
                    Excitation::SimplePulse { envelope }
                }
            }
        };
        let incident = IncidentWave {
            excitation,
            amplitude_e: require_finite("amplitude_e", ex.amplitude_e)?,
            amplitude_h: require_finite("amplitude_h", ex.amplitude_h)?,
        };

        info!(
            "Resolved configuration: material={}, excitation={}, {} cells on [{:e}, {:e}] m, n={:.3}",
            shape, kind, num_cells, x_lower, x_upper, derived.refractive_index
        );

        Ok(Self {
            x_lower,
            x_upper,
            num_cells,
            num_ghost,
            background,
            material,
            nonlinear,
            incident,
            derived,
            refresh_each_stage,
        })
    }

    pub fn x_lower(&self) -> f64 {
        self.x_lower
    }

    pub fn x_upper(&self) -> f64 {
        self.x_upper
    }

    /// Interior cell count, `floor(cells_per_wavelength · L / λ)`
    pub fn num_cells(&self) -> usize {
        self.num_cells
    }

    pub fn num_ghost(&self) -> usize {
        self.num_ghost
    }

    pub fn background(&self) -> BackgroundParameters {
        self.background
    }

    pub fn material(&self) -> &MaterialProfile {
        &self.material
    }

    pub fn nonlinear(&self) -> NonlinearParameters {
        self.nonlinear
    }

    pub fn incident(&self) -> &IncidentWave {
        &self.incident
    }

    pub fn derived(&self) -> &DerivedConstants {
        &self.derived
    }

    pub fn refresh_each_stage(&self) -> bool {
        self.refresh_each_stage
    }

    /// Grid matching the configured geometry
    ///
    /// # Errors
    ///
    /// Cannot fail for a validated configuration; the `Result` mirrors
    /// [`UniformGrid::new`].
    pub fn grid(&self) -> Result<UniformGrid, ModelError> {
        UniformGrid::new(self.x_lower, self.x_upper, self.num_cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration() {
        let config = Configuration::new(SimulationParameters::default()).unwrap();
        assert_eq!(config.num_cells(), 30_000);
        assert_eq!(config.num_ghost(), 3);
        assert!(config.refresh_each_stage());
        match config.material() {
            MaterialProfile::Interface { epsilon, mu } => {
                assert_eq!(epsilon.position, 250e-6);
                assert_eq!((epsilon.left, epsilon.right), (1.0, 4.0));
                assert_eq!((mu.left, mu.right), (1.0, 4.0));
            }
            other => panic!("unexpected profile {other:?}"),
        }
        assert_eq!(config.incident().excitation.kind(), ExcitationKind::Plane);
    }

    #[test]
    fn test_unknown_selectors_are_rejected() {
        let params = SimulationParameters {
            material_shape: "multilayered".to_string(),
            ..Default::default()
        };
        let err = Configuration::new(params).unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(err, ModelError::UnknownMaterialProfile("multilayered".into()));

        let mut params = SimulationParameters::default();
        params.excitation.kind = "chirp".to_string();
        assert_eq!(
            Configuration::new(params).unwrap_err(),
            ModelError::UnknownExcitation("chirp".into())
        );
    }

    #[test]
    fn test_zero_width_gaussian_is_fatal() {
        let params = SimulationParameters {
            material_shape: "moving_gaussian".to_string(),
            ..Default::default()
        }
        .with_matched_perturbation(PerturbationParameters {
            amplitude: 0.1,
            width: 0.0,
            offset: 10e-6,
            velocity: 0.0,
        });
        assert_eq!(
            Configuration::new(params).unwrap_err(),
            ModelError::ZeroWidthPerturbation { field: "epsilon" }
        );
    }

    #[test]
    fn test_zero_width_ignored_for_static_profiles() {
        // The default perturbation has zero width; only the moving profile reads it.
        let params = SimulationParameters {
            material_shape: "interface".to_string(),
            ..Default::default()
        }
        .with_matched_perturbation(PerturbationParameters {
            amplitude: 0.1,
            ..Default::default()
        });
        assert!(Configuration::new(params).is_ok());
    }

    #[test]
    fn test_pulse_requires_width() {
        let mut params = SimulationParameters::default();
        params.excitation.kind = "gauss_pulse".to_string();
        params.excitation.width = 0.0;
        assert!(matches!(
            Configuration::new(params),
            Err(ModelError::InvalidParameter { name: "excitation width", .. })
        ));
    }

    #[test]
    fn test_invalid_geometry() {
        let mut params = SimulationParameters::default();
        params.geometry.x_upper = -1.0;
        assert!(Configuration::new(params).is_err());

        let mut params = SimulationParameters::default();
        params.background.epsilon_r = 0.0;
        assert!(Configuration::new(params).is_err());

        let mut params = SimulationParameters::default();
        params.geometry.cells_per_wavelength = 1e-9;
        assert!(Configuration::new(params).is_err());
    }

    #[test]
    fn test_unsizable_ghost_padding_is_rejected() {
        let mut params = SimulationParameters::default();
        params.geometry.num_ghost = usize::MAX / 2 + 1;
        assert!(matches!(
            Configuration::new(params),
            Err(ModelError::InvalidParameter { name: "num_ghost", .. })
        ));

        let mut params = SimulationParameters::default();
        params.geometry.num_ghost = 0;
        assert_eq!(Configuration::new(params).unwrap().num_ghost(), 0);
    }

    #[test]
    fn test_envelope_uses_background_speed() {
        let mut params = SimulationParameters::default();
        params.excitation.kind = "simple_pulse".to_string();
        params.excitation.time_offset = 0.01;
        let config = Configuration::new(params).unwrap();
        match config.incident().excitation {
            Excitation::SimplePulse { envelope } => {
                assert_eq!(envelope.velocity, config.derived().speed);
                assert!((envelope.reference_time - 0.06).abs() < 1e-15);
            }
            other => panic!("unexpected excitation {other:?}"),
        }
    }
}
