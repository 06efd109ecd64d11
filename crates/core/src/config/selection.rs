//! Material-profile and excitation variants
//!
//! Selector strings are parsed exactly once, while building the
//! [`Configuration`](super::Configuration). Evaluation code only ever matches
//! on these enums.

use super::parameters::{InterfaceParameters, PerturbationParameters};
use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Reference time of the pulse envelope (s)
pub const ENVELOPE_REFERENCE_TIME: f64 = 0.05;

/// Spatial material profile selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialShape {
    Homogeneous,
    Interface,
    MovingGaussian,
}

impl FromStr for MaterialShape {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "homogeneous" => Ok(Self::Homogeneous),
            "interface" => Ok(Self::Interface),
            "moving_gaussian" | "rip" | "gaussian1dx" => Ok(Self::MovingGaussian),
            _ => Err(ModelError::UnknownMaterialProfile(s.to_string())),
        }
    }
}

impl fmt::Display for MaterialShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Homogeneous => "homogeneous",
            Self::Interface => "interface",
            Self::MovingGaussian => "moving_gaussian",
        })
    }
}

/// Incident wave selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExcitationKind {
    Plane,
    GaussPulse,
    SimplePulse,
}

impl FromStr for ExcitationKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plane" => Ok(Self::Plane),
            "gauss_pulse" => Ok(Self::GaussPulse),
            "simple_pulse" => Ok(Self::SimplePulse),
            _ => Err(ModelError::UnknownExcitation(s.to_string())),
        }
    }
}

impl fmt::Display for ExcitationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plane => "plane",
            Self::GaussPulse => "gauss_pulse",
            Self::SimplePulse => "simple_pulse",
        })
    }
}

/// Sharp step between a left and a right value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub position: f64,
    pub left: f64,
    pub right: f64,
}

impl Step {
    /// Right-inclusive: `x == position` takes the right value
    #[inline]
    pub fn value(&self, x: f64) -> f64 {
        if x < self.position {
            self.left
        } else {
            self.right
        }
    }
}

/// Translating Gaussian bump `Δ·exp(−(x − v·t − x0)²/σ²)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianPerturbation {
    pub amplitude: f64,
    pub width: f64,
    pub offset: f64,
    pub velocity: f64,
}

impl GaussianPerturbation {
    /// Validate one perturbation component
    ///
    /// Returns `Ok(None)` when the component is absent (zero width and zero
    /// amplitude), in which case it stays at the background value.
    fn resolve(
        field: &'static str,
        p: &PerturbationParameters,
    ) -> Result<Option<Self>, ModelError> {
        for (name, value) in [
            ("perturbation amplitude", p.amplitude),
            ("perturbation width", p.width),
            ("perturbation offset", p.offset),
            ("perturbation velocity", p.velocity),
        ] {
            if !value.is_finite() {
                return Err(ModelError::invalid(name, format!("{field}: {value} is not finite")));
            }
        }
        if p.width < 0.0 {
            return Err(ModelError::invalid(
                "perturbation width",
                format!("{field}: {} is negative", p.width),
            ));
        }
        if p.width == 0.0 {
            if p.amplitude != 0.0 {
                return Err(ModelError::ZeroWidthPerturbation { field });
            }
            warn!("{} perturbation has zero width and amplitude, using background", field);
            return Ok(None);
        }
        Ok(Some(Self {
            amplitude: p.amplitude,
            width: p.width,
            offset: p.offset,
            velocity: p.velocity,
        }))
    }

    /// Distance from the moving center
    #[inline]
    fn shift(&self, t: f64, x: f64) -> f64 {
        x - self.velocity * t - self.offset
    }

    /// Perturbation value added to the background
    #[inline]
    pub fn value(&self, t: f64, x: f64) -> f64 {
        let u = self.shift(t, x);
        self.amplitude * (-(u * u) / (self.width * self.width)).exp()
    }

    /// Analytic time derivative of [`Self::value`]
    #[inline]
    pub fn rate(&self, t: f64, x: f64) -> f64 {
        let u = self.shift(t, x);
        let s = self.width * self.width;
        2.0 * self.velocity * u * self.amplitude * (-(u * u) / s).exp() / s
    }
}

/// Spatial material law, resolved once per run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MaterialProfile {
    /// Background everywhere
    Homogeneous,
    /// Static step for ε_r and μ_r at the same position
    Interface { epsilon: Step, mu: Step },
    /// Background plus independent moving bumps; `None` components stay at background
    MovingGaussian {
        epsilon: Option<GaussianPerturbation>,
        mu: Option<GaussianPerturbation>,
    },
}

impl MaterialProfile {
    pub(crate) fn resolve(
        shape: MaterialShape,
        interface: &InterfaceParameters,
        default_position: f64,
        epsilon: &PerturbationParameters,
        mu: &PerturbationParameters,
    ) -> Result<Self, ModelError> {
        match shape {
            MaterialShape::Homogeneous => Ok(Self::Homogeneous),
            MaterialShape::Interface => {
                let position = interface.position.unwrap_or(default_position);
                let values = [
                    position,
                    interface.epsilon.0,
                    interface.epsilon.1,
                    interface.mu.0,
                    interface.mu.1,
                ];
                if values.iter().any(|v| !v.is_finite()) {
                    return Err(ModelError::invalid("interface", "values must be finite"));
                }
                Ok(Self::Interface {
                    epsilon: Step {
                        position,
                        left: interface.epsilon.0,
                        right: interface.epsilon.1,
                    },
                    mu: Step {
                        position,
                        left: interface.mu.0,
                        right: interface.mu.1,
                    },
                })
            }
            MaterialShape::MovingGaussian => Ok(Self::MovingGaussian {
                epsilon: GaussianPerturbation::resolve("epsilon", epsilon)?,
                mu: GaussianPerturbation::resolve("mu", mu)?,
            }),
        }
    }

    pub fn shape(&self) -> MaterialShape {
        match self {
            Self::Homogeneous => MaterialShape::Homogeneous,
            Self::Interface { .. } => MaterialShape::Interface,
            Self::MovingGaussian { .. } => MaterialShape::MovingGaussian,
        }
    }

    /// Whether ∂ε_r/∂t and ∂μ_r/∂t can be non-zero
    pub fn is_time_dependent(&self) -> bool {
        match self {
            Self::Homogeneous | Self::Interface { .. } => false,
            Self::MovingGaussian { epsilon, mu } => [epsilon, mu]
                .iter()
                .any(|p| p.is_some_and(|p| p.velocity != 0.0)),
        }
    }
}

/// Oscillating carrier `sin(k·x − ω·t)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Carrier {
    pub wavenumber: f64,
    pub angular_frequency: f64,
}

impl Carrier {
    #[inline]
    pub fn value(&self, t: f64, x: f64) -> f64 {
        (self.wavenumber * x - self.angular_frequency * t).sin()
    }
}

/// Gaussian envelope `exp(−(x − x0 − v·(t − t0))²/σ²)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub width: f64,
    pub space_offset: f64,
    /// t0, the reference time plus the configured time offset
    pub reference_time: f64,
    pub velocity: f64,
}

impl Envelope {
    #[inline]
    pub fn value(&self, t: f64, x: f64) -> f64 {
        let u = x - self.space_offset - self.velocity * (t - self.reference_time);
        (-(u * u) / (self.width * self.width)).exp()
    }
}

/// Incident wave shape, resolved once per run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Excitation {
    /// Unit envelope, oscillating carrier
    Plane { carrier: Carrier },
    /// Gaussian envelope, oscillating carrier
    GaussPulse { carrier: Carrier, envelope: Envelope },
    /// Gaussian envelope, no carrier
    SimplePulse { envelope: Envelope },
}

impl Excitation {
    pub fn kind(&self) -> ExcitationKind {
        match self {
            Self::Plane { .. } => ExcitationKind::Plane,
            Self::GaussPulse { .. } => ExcitationKind::GaussPulse,
            Self::SimplePulse { .. } => ExcitationKind::SimplePulse,
        }
    }

    /// Envelope factor at (t, x)
    #[inline]
    pub fn envelope(&self, t: f64, x: f64) -> f64 {
        match self {
            Self::Plane { .. } => 1.0,
            Self::GaussPulse { envelope, .. } | Self::SimplePulse { envelope } => {
                envelope.value(t, x)
            }
        }
    }

    /// Carrier factor at (t, x)
    #[inline]
    pub fn carrier(&self, t: f64, x: f64) -> f64 {
        match self {
            Self::Plane { carrier } | Self::GaussPulse { carrier, .. } => carrier.value(t, x),
            Self::SimplePulse { .. } => 1.0,
        }
    }

    /// Unscaled incident waveform, envelope × carrier
    #[inline]
    pub fn waveform(&self, t: f64, x: f64) -> f64 {
        self.envelope(t, x) * self.carrier(t, x)
    }
}
