// Configuration record for halo model construction
//
// A plain value, not process-wide state: parse or build one, validate it,
// hand it to HaloModel::from_config and drop it.

use serde::{Deserialize, Serialize};

use crate::error::HaloError;

fn default_unit_length_cm() -> f64 {
    3.085678e21 // kpc
}

fn default_unit_mass_g() -> f64 {
    1.989e43 // 1e10 Msun
}

fn default_unit_velocity_cm_s() -> f64 {
    1e5 // km/s
}

/// User-facing halo description: mass and scale radius in code units plus
/// the cgs conversion factors that fix the unit system.
///
/// The unit fields default to the galactic convention (kpc, 1e10 Msun,
/// km/s) so a minimal record only needs `mass` and `scale_radius`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HaloConfig {
    /// Total halo mass in code mass units.
    pub mass: f64,
    /// Scale radius in code length units.
    pub scale_radius: f64,
    #[serde(default = "default_unit_length_cm")]
    pub unit_length_cm: f64,
    #[serde(default = "default_unit_mass_g")]
    pub unit_mass_g: f64,
    #[serde(default = "default_unit_velocity_cm_s")]
    pub unit_velocity_cm_s: f64,
}

impl HaloConfig {
    /// Configuration with the default galactic unit system.
    pub fn new(mass: f64, scale_radius: f64) -> Self {
        Self {
            mass,
            scale_radius,
            unit_length_cm: default_unit_length_cm(),
            unit_mass_g: default_unit_mass_g(),
            unit_velocity_cm_s: default_unit_velocity_cm_s(),
        }
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, HaloError> {
        let config: HaloConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field is finite and strictly positive.
    pub fn validate(&self) -> Result<(), HaloError> {
        let fields = [
            ("mass", self.mass),
            ("scale_radius", self.scale_radius),
            ("unit_length_cm", self.unit_length_cm),
            ("unit_mass_g", self.unit_mass_g),
            ("unit_velocity_cm_s", self.unit_velocity_cm_s),
        ];
        for (name, value) in fields {
            if !(value > 0.0) || !value.is_finite() {
                return Err(HaloError::InvalidParameter {
                    name,
                    value,
                    reason: "must be finite and strictly positive",
                });
            }
        }
        Ok(())
    }
}
