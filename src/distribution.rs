// Energy distribution function of the Hernquist model
//
// Everything here is expressed in the dimensionless energy variable
// q = sqrt(E / Φ(0)), with E negative for bound orbits. q → 1 is the
// most-bound limit where the closed forms turn singular; q → 0 is the
// E → 0 (marginally bound) edge. Taylor substitutions replace the
// closed forms where they lose precision to catastrophic cancellation.

use tracing::warn;

use crate::profile::HaloModel;

/// Positive energies below this are rounding artifacts of E = Φ + v²/2 near
/// the escape boundary and are clamped to a small bound value.
const POSITIVE_ENERGY_CLAMP: f64 = 1e-8;

/// Positive energies above this indicate a sampled energy far outside the
/// physically expected magnitude; logged, not rejected.
const ANOMALOUS_ENERGY: f64 = 1e-2;

/// Switch dM/dE to its (1-q²) series when 1-q drops below this.
const DMDE_NEAR_UNITY: f64 = 1e-4;

/// Switch dM/dE to its q² series when q drops below this.
const DMDE_NEAR_ZERO: f64 = 1e-3;

impl HaloModel {
    /// Phase-space distribution function f(q) (Hernquist 1990, eq. 17).
    ///
    /// Domain q ∈ [0, 1); diverges as (1-q²)^(-5/2) toward q = 1.
    pub fn f_of_q(&self, q: f64) -> f64 {
        assert!((0.0..1.0).contains(&q), "q = {q} outside [0, 1)");
        let q_sq = q * q;
        let one_minus_q_sq = 1.0 - q_sq;

        let term1 = 3.0 * q.asin();
        // q * sqrt(1-q²) * (1 - 2q²) * (8q⁴ - 8q² - 3)
        let term2 = q
            * one_minus_q_sq.sqrt()
            * (one_minus_q_sq - q_sq)
            * (8.0 * (q_sq * q_sq - q_sq) - 3.0);

        self.f_prefactor * (term1 + term2) * one_minus_q_sq.powf(-2.5)
    }

    /// Near-singular closed form for f as q → 1.
    ///
    /// Kept with the prefactor and correction term as implemented in the
    /// validated sampler rather than the published equation; agrees with
    /// [`f_of_q`] at leading order in (1-q²).
    pub fn f_of_q_near_unity(&self, q: f64) -> f64 {
        assert!((0.0..1.0).contains(&q), "q = {q} outside [0, 1)");
        let prefactor = 3.0 * self.m
            / (16.0 * 2f64.sqrt() * std::f64::consts::PI.powi(2) * self.a.powi(3) * self.v_g.powi(3));
        let w = (1.0 - q * q).powf(2.5);
        prefactor * (1.0 - 32.0 / (5.0 * std::f64::consts::PI) * w) / w
    }

    /// Distribution function as a function of specific energy.
    ///
    /// Energies in (0, 1e-8) are rounding noise from the escape-speed edge
    /// and are treated as a small bound energy; larger positive energies up
    /// to the anomaly threshold convert to a NaN q and trip the domain
    /// assertion in [`f_of_q`], which is the fail-fast contract.
    pub fn f_of_e(&self, e: f64) -> f64 {
        if e > ANOMALOUS_ENERGY {
            warn!(energy = e, "energy exceeds expected magnitude for this unit system");
        }
        let e = if e > 0.0 && e < POSITIVE_ENERGY_CLAMP {
            -POSITIVE_ENERGY_CLAMP
        } else {
            e
        };
        self.f_of_q(self.q_of_e(e))
    }

    /// f evaluated at speed v and radius r, f(Φ(r) + v²/2).
    pub fn f_of_v_at_r(&self, v: f64, r: f64) -> f64 {
        self.f_of_e(self.potential(r) + 0.5 * v * v)
    }

    /// Speed-weighted distribution v² f(Φ(r) + v²/2), the rejection target
    /// for speed draws.
    pub fn speed_weighted_f(&self, v: f64, r: f64) -> f64 {
        v * v * self.f_of_v_at_r(v, r)
    }

    /// Density-of-states factor g(q) (Hernquist 1990, eq. 23).
    ///
    /// The q^-5 prefactor diverges at q = 0; dM/dE handles that edge with
    /// its series form, so the bare evaluation requires q > 0.
    pub fn g_of_q(&self, q: f64) -> f64 {
        assert!(q > 0.0 && q < 1.0, "q = {q} outside (0, 1)");
        let q_sq = q * q;

        // 3 * (8q⁴ - 4q² + 1) * arccos(q)
        let term1 = 3.0 * (8.0 * q_sq * q_sq - 4.0 * q_sq + 1.0) * q.acos();
        // q * sqrt(1-q²) * (4q² - 1) * (2q² + 3)
        let term2 =
            q * (1.0 - q_sq).sqrt() * (4.0 * q_sq - 1.0) * (2.0 * q_sq + 3.0);

        self.g_prefactor * (term1 - term2) * q.powi(-5)
    }

    /// Differential mass function dM/dE as a function of q.
    ///
    /// The f·g product cancels to machine epsilon at both domain edges, so
    /// validated two-term series take over for 1-q < 1e-4 and q < 1e-3.
    pub fn dm_de_of_q(&self, q: f64) -> f64 {
        assert!((0.0..1.0).contains(&q), "q = {q} outside [0, 1)");
        if 1.0 - q < DMDE_NEAR_UNITY {
            return self.dm_de_near_unity(q);
        }
        if q < DMDE_NEAR_ZERO {
            return self.dm_de_near_zero(q);
        }
        self.f_of_q(q) * self.g_of_q(q)
    }

    /// dM/dE as a function of energy.
    pub fn dm_de(&self, e: f64) -> f64 {
        self.dm_de_of_q(self.q_of_e(e))
    }

    // Series for q -> 1. The 16/35 prefactor is half the published value;
    // the halved form is what matches the f·g product at the boundary.
    fn dm_de_near_unity(&self, q: f64) -> f64 {
        let prefactor = (16.0 / 35.0) * self.m / (self.v_g * self.v_g);
        prefactor * (1.0 - q * q)
    }

    // Series for q -> 0.
    fn dm_de_near_zero(&self, q: f64) -> f64 {
        let prefactor = (16.0 / 5.0) * self.m / (self.v_g * self.v_g);
        prefactor * (1.0 - 18.0 / 7.0 * q * q)
    }

    /// E(q) = Φ(0) q².
    pub fn e_of_q(&self, q: f64) -> f64 {
        self.phi_0 * q * q
    }

    /// q(E) = sqrt(E / Φ(0)); exact inverse of [`e_of_q`] for bound E ≤ 0.
    pub fn q_of_e(&self, e: f64) -> f64 {
        (e / self.phi_0).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::UnitSystem;

    fn model() -> HaloModel {
        HaloModel::new(100.0, 20.0, UnitSystem::galactic()).unwrap()
    }

    #[test]
    fn test_f_of_q_nonnegative_and_finite() {
        let m = model();
        for i in 0..=1000 {
            let q = i as f64 / 1000.0 * (1.0 - 1e-6);
            let f = m.f_of_q(q);
            assert!(f.is_finite(), "f({q}) not finite");
            assert!(f >= 0.0, "f({q}) = {f} negative");
        }
    }

    #[test]
    fn test_f_of_q_vanishes_at_zero() {
        assert_eq!(model().f_of_q(0.0), 0.0);
    }

    #[test]
    fn test_f_of_q_diverges_toward_unity() {
        let m = model();
        assert!(m.f_of_q(0.999999) > 1e6 * m.f_of_q(0.5));
    }

    #[test]
    #[should_panic(expected = "outside [0, 1)")]
    fn test_f_of_q_domain_violation() {
        model().f_of_q(1.0);
    }

    #[test]
    fn test_near_unity_form_matches_direct() {
        let m = model();
        // At 1-q² = 1e-4 both expressions are still well conditioned
        let q = (1.0 - 1e-4f64).sqrt();
        let direct = m.f_of_q(q);
        let series = m.f_of_q_near_unity(q);
        assert!(
            ((series - direct) / direct).abs() < 1e-3,
            "direct = {direct}, series = {series}"
        );
    }

    #[test]
    fn test_f_of_e_clamps_rounding_noise() {
        let m = model();
        // A tiny positive energy is the escape-boundary rounding case
        let f = m.f_of_e(1e-9);
        assert!(f.is_finite());
        assert_eq!(f, m.f_of_e(-POSITIVE_ENERGY_CLAMP));
    }

    #[test]
    fn test_f_of_e_matches_f_of_q() {
        let m = model();
        let q = 0.42;
        let e = m.e_of_q(q);
        assert!((m.f_of_e(e) - m.f_of_q(q)).abs() < 1e-12 * m.f_of_q(q).abs());
    }

    #[test]
    fn test_energy_q_round_trip() {
        let m = model();
        for q in [1e-6, 0.01, 0.3, 0.7, 0.999] {
            let back = m.q_of_e(m.e_of_q(q));
            assert!((back - q).abs() < 1e-14, "q = {q}, back = {back}");
        }
        for frac in [0.9, 0.5, 0.1, 1e-4] {
            let e = m.phi_0 * frac;
            let back = m.e_of_q(m.q_of_e(e));
            assert!((back - e).abs() < 1e-12 * e.abs());
        }
    }

    #[test]
    fn test_g_of_q_positive() {
        let m = model();
        for i in 1..100 {
            let q = i as f64 / 100.0;
            let g = m.g_of_q(q);
            assert!(g.is_finite() && g > 0.0, "g({q}) = {g}");
        }
    }

    #[test]
    fn test_dm_de_continuous_at_near_zero_boundary() {
        let m = model();
        let q = DMDE_NEAR_ZERO;
        // At the boundary the closed-form product is still accurate enough
        // to check the series against it
        let series = m.dm_de_near_zero(q);
        let direct = m.f_of_q(q) * m.g_of_q(q);
        assert!(
            ((series - direct) / direct).abs() < 1e-3,
            "series = {series}, direct = {direct}"
        );
    }

    #[test]
    fn test_dm_de_continuous_at_near_unity_boundary() {
        let m = model();
        let q = 1.0 - DMDE_NEAR_UNITY;
        let series = m.dm_de_near_unity(q);
        let direct = m.f_of_q(q) * m.g_of_q(q);
        assert!(
            ((series - direct) / direct).abs() < 1e-2,
            "series = {series}, direct = {direct}"
        );
    }

    #[test]
    fn test_dm_de_positive_across_domain() {
        let m = model();
        for i in 0..1000 {
            let q = i as f64 / 1000.0;
            let v = m.dm_de_of_q(q);
            assert!(v.is_finite() && v > 0.0, "dM/dE({q}) = {v}");
        }
    }

    #[test]
    fn test_dm_de_of_energy_consistent() {
        let m = model();
        let q = 0.37;
        let e = m.e_of_q(q);
        let a = m.dm_de(e);
        let b = m.dm_de_of_q(q);
        assert!((a - b).abs() < 1e-12 * b.abs());
    }

    #[test]
    fn test_speed_weighted_target_edges() {
        let m = model();
        let r = m.a;
        // Zero speed contributes nothing
        assert_eq!(m.speed_weighted_f(0.0, r), 0.0);
        // At the escape speed E = 0 exactly, q = 0, f = 0
        let v_esc = m.escape_speed_squared(r).sqrt();
        let at_edge = m.speed_weighted_f(v_esc, r);
        assert!(at_edge.abs() < 1e-30, "target at v_esc = {at_edge}");
        // Interior speeds have positive density
        assert!(m.speed_weighted_f(0.5 * v_esc, r) > 0.0);
    }
}
