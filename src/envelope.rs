// Precomputed rejection-sampling envelope over a logarithmic radius grid
//
// The table amortizes the per-sample search for an upper bound on the
// speed-weighted distribution function. It is a performance optimization,
// not a correctness guarantee: the sampler's bound escalation remains the
// authority when a tabulated bound turns out to be too tight.

use crate::profile::HaloModel;
use crate::utilities::{interpolate_linear, linspace, logspace};

/// Default grid: 1e4 points spanning 1e-6 a .. 1e4 a.
const DEFAULT_LOG10_RT_MIN: f64 = -6.0;
const DEFAULT_LOG10_RT_MAX: f64 = 4.0;
const DEFAULT_GRID_POINTS: usize = 10_000;

/// Speeds scanned per grid radius when searching for the local maximum.
const SPEED_SCAN_POINTS: usize = 100;

/// Extra headroom applied to every scanned maximum.
const SAFETY_FACTOR: f64 = 2.0;

/// Radius-indexed upper bounds on v² f(Φ(r) + v²/2) over [0, v_esc(r)].
///
/// Immutable after construction; queries interpolate linearly between grid
/// radii and clamp flat outside the grid, so an out-of-range radius never
/// receives a bound tighter than the nearest tabulated one.
#[derive(Debug, Clone)]
pub struct EnvelopeTable {
    radii: Vec<f64>,
    bounds: Vec<f64>,
}

impl EnvelopeTable {
    /// Build the default table for a model.
    pub fn new(model: &HaloModel) -> Self {
        Self::with_grid(
            model,
            DEFAULT_LOG10_RT_MIN,
            DEFAULT_LOG10_RT_MAX,
            DEFAULT_GRID_POINTS,
        )
    }

    /// Build a table over radii 10^log10_rt_min a .. 10^log10_rt_max a.
    ///
    /// For each grid radius the target is scanned on 100 linearly spaced
    /// speeds up to the local escape speed; the NaN-ignoring maximum is
    /// doubled and stored as the bound.
    pub fn with_grid(
        model: &HaloModel,
        log10_rt_min: f64,
        log10_rt_max: f64,
        n_grid: usize,
    ) -> Self {
        assert!(n_grid >= 2, "envelope grid needs at least 2 points");
        assert!(
            log10_rt_max > log10_rt_min,
            "empty envelope radius range [{log10_rt_min}, {log10_rt_max}]"
        );

        let radii: Vec<f64> = logspace(log10_rt_min, log10_rt_max, n_grid)
            .into_iter()
            .map(|rt| rt * model.a)
            .collect();

        let bounds = radii
            .iter()
            .map(|&r| {
                let v_max = (2.0 * model.potential(r).abs()).sqrt();
                let peak = linspace(0.0, v_max, SPEED_SCAN_POINTS)
                    .into_iter()
                    .map(|v| model.speed_weighted_f(v, r))
                    .filter(|f| !f.is_nan())
                    .fold(f64::NEG_INFINITY, f64::max);
                peak * SAFETY_FACTOR
            })
            .collect();

        Self { radii, bounds }
    }

    /// Upper bound on the speed-weighted distribution function at radius r.
    pub fn max_value(&self, r: f64) -> f64 {
        interpolate_linear(&self.radii, &self.bounds, r)
    }

    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    /// Grid radii, strictly increasing.
    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    /// Tabulated bounds, finite and non-negative.
    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }
}
