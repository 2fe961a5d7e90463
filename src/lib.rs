//! Equilibrium phase-space sampling for Hernquist (1990) dark-matter halos.
//!
//! Given a halo mass, scale radius and unit system, this crate evaluates
//! the analytic energy distribution function (with series substitutions in
//! its ill-conditioned limits), precomputes a rejection-sampling envelope
//! over radius, and draws self-consistent positions and velocities for an
//! N-body realization. Writing the result to a simulation snapshot is left
//! to an external [`SnapshotWriter`] implementation.

// Import the modules and re-export the types for library usage
mod config;
mod distribution;
mod envelope;
mod error;
mod profile;
mod rejection;
mod sampler;
mod snapshot;
mod stats;
mod units;
mod utilities;

pub use config::HaloConfig;
pub use envelope::EnvelopeTable;
pub use error::HaloError;
pub use profile::HaloModel;
pub use rejection::{rejection_sample, RejectionSample};
pub use sampler::HaloSampler;
pub use snapshot::{SampleBatch, SnapshotWriter};
pub use stats::{sample_isotropic_direction, sample_sphere_angles};
pub use units::{UnitSystem, GRAVITY_CGS, SEC_PER_GIGAYEAR, SEC_PER_MEGAYEAR, SEC_PER_YEAR};
pub use utilities::interpolate_linear;
