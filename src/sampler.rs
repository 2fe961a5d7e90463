// Sampling pipeline: radii -> coordinates -> speeds -> velocities
//
// Radii come from the closed-form inverse CDF of the enclosed-mass profile;
// speeds come from rejection sampling against the envelope table. Speed and
// velocity draws are parallelized across particles, each particle on its
// own independently seeded stream, and the i-th output always corresponds
// to the i-th input.

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rayon::prelude::*;

use crate::envelope::EnvelopeTable;
use crate::error::HaloError;
use crate::profile::HaloModel;
use crate::rejection::rejection_sample;
use crate::snapshot::{SampleBatch, SnapshotWriter};
use crate::stats::sample_isotropic_direction;

/// Offset between per-particle RNG streams.
const STREAM_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Gaussian velocity draws are rejected above this fraction of the local
/// squared escape speed.
const GAUSSIAN_ESCAPE_FRACTION: f64 = 0.95;

/// Draws self-consistent phase-space samples for one halo model.
///
/// Owns the model and its envelope table; the optional snapshot writer is
/// the export capability checked at call time by [`HaloSampler::write_ics`].
pub struct HaloSampler {
    model: HaloModel,
    envelope: EnvelopeTable,
    writer: Option<Box<dyn SnapshotWriter>>,
}

impl HaloSampler {
    /// Build a sampler with the default envelope grid.
    pub fn new(model: HaloModel) -> Self {
        let envelope = EnvelopeTable::new(&model);
        Self::with_envelope(model, envelope)
    }

    /// Build a sampler around a custom envelope table.
    pub fn with_envelope(model: HaloModel, envelope: EnvelopeTable) -> Self {
        Self {
            model,
            envelope,
            writer: None,
        }
    }

    /// Attach a snapshot-writer capability.
    pub fn with_writer(mut self, writer: Box<dyn SnapshotWriter>) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn model(&self) -> &HaloModel {
        &self.model
    }

    pub fn envelope(&self) -> &EnvelopeTable {
        &self.envelope
    }

    /// Draw n radii from the enclosed-mass profile by inverting its CDF:
    /// with f uniform in [0, 1), r/a = sqrt(f) / (1 - sqrt(f)). Exact, no
    /// rejection step.
    pub fn draw_radii<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        (0..n)
            .map(|_| {
                let sqrt_f = rng.gen::<f64>().sqrt();
                self.model.a * sqrt_f / (1.0 - sqrt_f)
            })
            .collect()
    }

    /// Draw n positions: profile radii combined with isotropic directions.
    pub fn draw_coordinates<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<[f64; 3]> {
        self.draw_radii(n, rng)
            .into_iter()
            .map(|r| (r * sample_isotropic_direction(rng)).into())
            .collect()
    }

    /// Draw one speed at radius r from v² f(Φ(r) + v²/2) on [0, v_esc(r)],
    /// bounded by the envelope table.
    pub fn draw_speed_at<R: Rng + ?Sized>(&self, r: f64, rng: &mut R) -> f64 {
        let v_esc = self.model.escape_speed_squared(r).sqrt();
        let maxval = self.envelope.max_value(r);
        rejection_sample(
            |v| self.model.speed_weighted_f(v, r),
            maxval,
            0.0,
            v_esc,
            rng,
        )
        .value
    }

    /// Draw one speed per input radius, in parallel across particles.
    pub fn draw_speeds(&self, radii: &[f64], seed: u64) -> Vec<f64> {
        radii
            .par_iter()
            .enumerate()
            .map(|(i, &r)| {
                let mut rng = StdRng::seed_from_u64(particle_seed(seed, i as u64));
                self.draw_speed_at(r, &mut rng)
            })
            .collect()
    }

    /// Draw one velocity per input position: the speed drawn at the
    /// position's radius, pointed along an isotropic direction.
    pub fn draw_velocities(&self, positions: &[[f64; 3]], seed: u64) -> Vec<[f64; 3]> {
        positions
            .par_iter()
            .enumerate()
            .map(|(i, pos)| {
                let mut rng = StdRng::seed_from_u64(particle_seed(seed, i as u64));
                let r = Vector3::from(*pos).norm();
                let speed = self.draw_speed_at(r, &mut rng);
                (speed * sample_isotropic_direction(&mut rng)).into()
            })
            .collect()
    }

    /// Local-Maxwellian approximation to the velocity draw: three Gaussian
    /// components with the radial dispersion of the profile, redrawn while
    /// the speed exceeds 95% of the local escape speed.
    ///
    /// A cheap cross-check for the distribution-function path, not an
    /// equilibrium sample in its own right.
    pub fn draw_velocities_gaussian<R: Rng + ?Sized>(
        &self,
        positions: &[[f64; 3]],
        rng: &mut R,
    ) -> Vec<[f64; 3]> {
        positions
            .iter()
            .map(|pos| {
                let r = Vector3::from(*pos).norm();
                let sigma = self.model.velocity_dispersion_squared(r).sqrt();
                let v_cap_sq = GAUSSIAN_ESCAPE_FRACTION * self.model.escape_speed_squared(r);
                loop {
                    let v = Vector3::new(
                        sigma * rng.sample::<f64, _>(StandardNormal),
                        sigma * rng.sample::<f64, _>(StandardNormal),
                        sigma * rng.sample::<f64, _>(StandardNormal),
                    );
                    if v.norm_squared() <= v_cap_sq {
                        return v.into();
                    }
                }
            })
            .collect()
    }

    /// Draw one energy per input radius from f(E) on [Φ(r), 0], bounded
    /// locally by f(Φ(r)). Validation path; serial.
    pub fn draw_energies<R: Rng + ?Sized>(&self, radii: &[f64], rng: &mut R) -> Vec<f64> {
        radii
            .iter()
            .map(|&r| {
                let pot = self.model.potential(r);
                let maxval = self.model.f_of_e(pot);
                rejection_sample(|e| self.model.f_of_e(e), maxval, pot, 0.0, rng).value
            })
            .collect()
    }

    /// Realize a full equal-mass N-body sample of the halo.
    pub fn generate(&self, n: usize, seed: u64) -> SampleBatch {
        let mut rng = StdRng::seed_from_u64(seed);
        let positions = self.draw_coordinates(n, &mut rng);
        let velocities = self.draw_velocities(&positions, seed.wrapping_add(1));

        SampleBatch {
            particle_mass: self.model.m / n as f64,
            ids: (1..=n as u64).collect(),
            positions,
            velocities,
        }
    }

    /// Generate a sample and persist it through the writer capability.
    ///
    /// Fails with [`HaloError::WriterUnavailable`] when no writer was
    /// supplied at construction; the sampling core itself is unaffected.
    pub fn write_ics(&self, n: usize, seed: u64) -> Result<SampleBatch, HaloError> {
        let writer = self.writer.as_ref().ok_or(HaloError::WriterUnavailable)?;
        let batch = self.generate(n, seed);
        writer.write(&batch)?;
        Ok(batch)
    }
}

/// Seed for the i-th particle's independent stream.
fn particle_seed(seed: u64, i: u64) -> u64 {
    seed.wrapping_add((i.wrapping_add(1)).wrapping_mul(STREAM_STRIDE))
}
