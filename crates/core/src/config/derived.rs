//! Vacuum constants and per-run derived quantities

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Vacuum permittivity ε0 (F/m)
pub const VACUUM_PERMITTIVITY: f64 = 8.854187817e-12;
/// Vacuum permeability μ0 (V·s/(A·m))
pub const VACUUM_PERMEABILITY: f64 = 4e-7 * PI;

/// Quantities computed once from the configuration and read-only afterwards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedConstants {
    /// ε0
    pub eo: f64,
    /// μ0
    pub mo: f64,
    /// Vacuum speed of light c0 = 1/√(ε0μ0)
    pub co: f64,
    /// Vacuum impedance Z0 = √(μ0/ε0)
    pub zo: f64,
    /// Background refractive index n = √(ε_r μ_r)
    pub refractive_index: f64,
    /// Propagation speed in the background medium, c0 / n
    pub speed: f64,
    /// Carrier wavenumber k = 2π/λ
    pub wavenumber: f64,
    /// Carrier angular frequency ω = k·v
    pub angular_frequency: f64,
}

impl DerivedConstants {
    pub(crate) fn compute(epsilon_r: f64, mu_r: f64, wavelength: f64) -> Self {
        let eo = VACUUM_PERMITTIVITY;
        let mo = VACUUM_PERMEABILITY;
        let co = 1.0 / (eo * mo).sqrt();
        let refractive_index = (epsilon_r * mu_r).sqrt();
        let speed = co / refractive_index;
        let wavenumber = 2.0 * PI / wavelength;
        Self {
            eo,
            mo,
            co,
            zo: (mo / eo).sqrt(),
            refractive_index,
            speed,
            wavenumber,
            angular_frequency: wavenumber * speed,
        }
    }
}
