// Hernquist (1990) spherical halo profile: closed-form density, potential,
// enclosed mass, escape speed and radial velocity dispersion.

use crate::config::HaloConfig;
use crate::error::HaloError;
use crate::units::UnitSystem;

use std::f64::consts::PI;

/// Beyond this r/a the closed-form dispersion loses all significant digits
/// to cancellation and the asymptotic form GM/(5r) takes over.
const DISPERSION_ASYMPTOTIC_RT: f64 = 300.0;

/// A two-parameter Hernquist halo in a fixed unit system.
///
/// Immutable once constructed; all profile operations are pure functions of
/// radius. The prefactors of the distribution function (Hernquist 1990,
/// eqs. 17 and 23) are derived here once and reused by every evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HaloModel {
    /// Total halo mass in code units.
    pub m: f64,
    /// Scale radius in code units.
    pub a: f64,
    /// Unit system, carrying the gravitational constant `g`.
    pub units: UnitSystem,
    /// Characteristic velocity sqrt(G M / a).
    pub v_g: f64,
    /// Central potential Φ(0) = -G M / a (negative).
    pub phi_0: f64,
    pub(crate) density_prefactor: f64,
    pub(crate) f_prefactor: f64,
    pub(crate) g_prefactor: f64,
}

impl HaloModel {
    /// Build a model from mass and scale radius, validating both.
    pub fn new(m: f64, a: f64, units: UnitSystem) -> Result<Self, HaloError> {
        if !(m > 0.0) || !m.is_finite() {
            return Err(HaloError::InvalidParameter {
                name: "mass",
                value: m,
                reason: "must be finite and strictly positive",
            });
        }
        if !(a > 0.0) || !a.is_finite() {
            return Err(HaloError::InvalidParameter {
                name: "scale_radius",
                value: a,
                reason: "must be finite and strictly positive",
            });
        }

        let g = units.g;
        let v_g = (g * m / a).sqrt();
        Ok(Self {
            m,
            a,
            units,
            v_g,
            phi_0: -g * m / a,
            density_prefactor: m / (2.0 * PI * a.powi(3)),
            f_prefactor: m / (8.0 * 2f64.sqrt() * PI.powi(3) * a.powi(3) * v_g.powi(3)),
            g_prefactor: 2.0 * 2f64.sqrt() * PI.powi(2) * a.powi(3) * v_g / 3.0,
        })
    }

    pub fn from_config(config: &HaloConfig) -> Result<Self, HaloError> {
        config.validate()?;
        let units = UnitSystem::new(
            config.unit_length_cm,
            config.unit_mass_g,
            config.unit_velocity_cm_s,
        );
        Self::new(config.mass, config.scale_radius, units)
    }

    /// Mass density ρ(r) = M/(2π a³) (r/a)⁻¹ (1+r/a)⁻³.
    ///
    /// Diverges at r = 0; callers sampling at the origin must guard.
    pub fn density(&self, r: f64) -> f64 {
        assert!(r >= 0.0, "negative radius {r}");
        let rt = r / self.a;
        self.density_prefactor / (rt * (1.0 + rt).powi(3))
    }

    /// Gravitational potential Φ(r) = -G M / (r + a).
    ///
    /// Monotonically increasing from Φ(0) = -G M / a toward 0 at infinity.
    pub fn potential(&self, r: f64) -> f64 {
        assert!(r >= 0.0, "negative radius {r}");
        -self.units.g * self.m / (r + self.a)
    }

    /// Enclosed mass M(r) = M (r/a)² / (1 + r/a)².
    pub fn mass_enclosed(&self, r: f64) -> f64 {
        assert!(r >= 0.0, "negative radius {r}");
        let rt = r / self.a;
        self.m * rt * rt / ((1.0 + rt) * (1.0 + rt))
    }

    /// Squared escape speed v_esc²(r) = 2 G M / (r + a) = 2 |Φ(r)|.
    pub fn escape_speed_squared(&self, r: f64) -> f64 {
        assert!(r >= 0.0, "negative radius {r}");
        2.0 * self.units.g * self.m / (r + self.a)
    }

    /// Radial velocity dispersion σ_r²(r) (Hernquist 1990, eq. 10).
    ///
    /// The closed form subtracts two nearly equal terms; past r/a = 300 the
    /// cancellation swamps the result and the asymptotic G M / (5 r) is used
    /// instead. At r → 0 the unguarded expression is 0·∞ = NaN, mapped to 0.
    pub fn velocity_dispersion_squared(&self, r: f64) -> f64 {
        assert!(r >= 0.0, "negative radius {r}");
        let g = self.units.g;
        let rt = r / self.a;

        if rt > DISPERSION_ASYMPTOTIC_RT {
            return g * self.m / (5.0 * r);
        }

        let prefactor = g * self.m / (12.0 * self.a);
        let one_plus_rt = 1.0 + rt;

        let log_term = 12.0 * rt * one_plus_rt.powi(3) * (1.0 + 1.0 / rt).ln();
        let poly_term = (rt / one_plus_rt)
            * (25.0 + 52.0 * rt + 42.0 * rt * rt + 12.0 * rt.powi(3));

        let ans = prefactor * (log_term - poly_term);
        if ans.is_nan() && rt < 1e-12 {
            return 0.0;
        }
        ans
    }
}
