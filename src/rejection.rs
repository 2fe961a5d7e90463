// Generic accept/reject draw with automatic bound escalation
//
// Candidates are drawn in small rounds. If any target evaluation in a round
// exceeds the assumed bound, the bound was invalid: it is raised to 1.5x
// the worst offender, the round is discarded, and sampling restarts under
// the corrected bound. Samples are never accepted under a known-bad bound.

use rand::Rng;
use tracing::warn;

/// Candidates evaluated per round before redrawing.
const CANDIDATES_PER_ROUND: usize = 10;

/// Escalation factor applied to an exceeded bound.
const ESCALATION_FACTOR: f64 = 1.5;

/// One accepted draw plus its diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct RejectionSample {
    /// The accepted variate.
    pub value: f64,
    /// Target evaluations performed before acceptance.
    pub trials: u64,
    /// Number of bound escalations that occurred.
    pub escalations: u32,
    /// The bound in effect when the sample was accepted.
    pub maxval: f64,
}

/// Draw one variate from an un-normalized density `target` on [lo, hi],
/// assuming `maxval` bounds the target on that interval.
///
/// The loop has no iteration cap; the expected number of trials is the
/// ratio of the bounding box area to the target area, so callers should
/// keep envelopes tight. An undersized `maxval` is corrected on the fly
/// and reported through the returned diagnostics, never by failing.
pub fn rejection_sample<R: Rng + ?Sized, F: Fn(f64) -> f64>(
    target: F,
    mut maxval: f64,
    lo: f64,
    hi: f64,
    rng: &mut R,
) -> RejectionSample {
    assert!(hi > lo, "empty sampling interval [{lo}, {hi}]");
    assert!(
        maxval > 0.0 && maxval.is_finite(),
        "invalid initial bound {maxval}"
    );

    let width = hi - lo;
    let mut trials: u64 = 0;
    let mut escalations: u32 = 0;

    loop {
        let xs: [f64; CANDIDATES_PER_ROUND] =
            std::array::from_fn(|_| lo + width * rng.gen::<f64>());
        let ys: [f64; CANDIDATES_PER_ROUND] =
            std::array::from_fn(|_| maxval * rng.gen::<f64>());

        let evals = xs.map(&target);
        trials += CANDIDATES_PER_ROUND as u64;

        let worst = evals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if worst > maxval {
            let corrected = ESCALATION_FACTOR * worst;
            warn!(
                old_bound = maxval,
                observed = worst,
                new_bound = corrected,
                "rejection bound exceeded; escalating and restarting round"
            );
            maxval = corrected;
            escalations += 1;
            continue;
        }

        for (x, (y, f)) in xs.iter().zip(ys.iter().zip(evals.iter())) {
            if *y < *f {
                return RejectionSample {
                    value: *x,
                    trials,
                    escalations,
                    maxval,
                };
            }
        }
    }
}
