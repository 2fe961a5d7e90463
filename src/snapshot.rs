// Sampled phase-space batch and the snapshot-writer capability seam

use crate::error::HaloError;

/// One realized N-body sample: equal-mass particles with positions and
/// velocities in code units.
///
/// Transient output of the sampling pipeline; persisting it is the job of
/// an external [`SnapshotWriter`].
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBatch {
    /// Mass per particle (total halo mass / particle count).
    pub particle_mass: f64,
    /// Particle identifiers, 1..=N.
    pub ids: Vec<u64>,
    pub positions: Vec<[f64; 3]>,
    pub velocities: Vec<[f64; 3]>,
}

impl SampleBatch {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Capability for persisting a sampled batch as simulation initial
/// conditions.
///
/// Supplied (or not) to the pipeline at construction time; the pipeline
/// checks its presence once per export call rather than branching on a
/// runtime import. Implementations live outside this crate.
pub trait SnapshotWriter: Send + Sync {
    fn write(&self, batch: &SampleBatch) -> Result<(), HaloError>;
}
