// Isotropic angular sampling on the unit sphere

use nalgebra::Vector3;
use rand::Rng;

use std::f64::consts::PI;

/// Sample a direction uniformly on the unit sphere.
///
/// Area-preserving: the polar cosine is uniform on [-1, 1] and the
/// azimuth uniform on [0, 2π).
pub fn sample_isotropic_direction<R: Rng + ?Sized>(rng: &mut R) -> Vector3<f64> {
    let mu = 2.0 * rng.gen::<f64>() - 1.0; // cosine of polar angle
    let phi = 2.0 * PI * rng.gen::<f64>(); // azimuthal angle

    let sin_theta = (1.0 - mu * mu).sqrt();
    Vector3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), mu)
}

/// Sample (polar, azimuthal) angle pairs uniform on the sphere.
pub fn sample_sphere_angles<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<(f64, f64)> {
    (0..n)
        .map(|_| {
            let theta = (1.0 - 2.0 * rng.gen::<f64>()).acos();
            let phi = 2.0 * PI * rng.gen::<f64>();
            (theta, phi)
        })
        .collect()
}
