// Statistical integration tests - drawn samples must reproduce the analytic
// profile within sampling error

use rand::rngs::StdRng;
use rand::SeedableRng;

use halo_ics::{EnvelopeTable, HaloModel, HaloSampler, UnitSystem};

fn sampler() -> HaloSampler {
    let model = HaloModel::new(100.0, 20.0, UnitSystem::galactic()).unwrap();
    let envelope = EnvelopeTable::with_grid(&model, -4.0, 3.0, 1000);
    HaloSampler::with_envelope(model, envelope)
}

#[test]
fn test_radii_match_enclosed_mass_profile() {
    // Kolmogorov-Smirnov test of the empirical enclosed-mass fraction
    // against M(r)/M for 100k particles
    let s = sampler();
    let model = *s.model();
    let mut rng = StdRng::seed_from_u64(42);

    let n = 100_000;
    let mut radii = s.draw_radii(n, &mut rng);
    radii.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mut d_stat: f64 = 0.0;
    for (i, &r) in radii.iter().enumerate() {
        let analytic = model.mass_enclosed(r) / model.m;
        let below = i as f64 / n as f64;
        let above = (i + 1) as f64 / n as f64;
        d_stat = d_stat.max((analytic - below).abs()).max((above - analytic).abs());
    }

    // 0.1% critical value of the one-sample KS statistic
    let critical = 1.95 / (n as f64).sqrt();
    assert!(d_stat < critical, "KS statistic {d_stat} above {critical}");
}

#[test]
fn test_mean_squared_speed_matches_dispersion() {
    // Isotropy ties the distribution-function draw to the Jeans dispersion:
    // <v^2> at fixed radius is 3 sigma_r^2
    let s = sampler();
    let model = *s.model();
    let r = model.a;

    let n = 5000;
    let radii = vec![r; n];
    let speeds = s.draw_speeds(&radii, 42);

    let mean_v_sq: f64 = speeds.iter().map(|v| v * v).sum::<f64>() / n as f64;
    let expected = 3.0 * model.velocity_dispersion_squared(r);
    assert!(
        (mean_v_sq / expected - 1.0).abs() < 0.1,
        "<v^2> = {mean_v_sq}, 3 sigma^2 = {expected}"
    );
}

#[test]
fn test_speed_distribution_positive_support() {
    let s = sampler();
    let model = *s.model();
    let r = 2.0 * model.a;
    let speeds = s.draw_speeds(&vec![r; 2000], 7);

    let v_esc = model.escape_speed_squared(r).sqrt();
    for &v in &speeds {
        assert!(v > 0.0 && v < v_esc);
    }
    // The speed law is broad: both halves of [0, v_esc] must be populated
    let low = speeds.iter().filter(|&&v| v < 0.5 * v_esc).count();
    assert!(low > 200 && low < 1800, "low-speed count {low}");
}

#[test]
fn test_drawn_energies_match_distribution_mean() {
    // Empirical mean of E drawn from f(E) on [phi(r), 0] against the
    // trapezoid integral of E f(E) / integral of f(E)
    let s = sampler();
    let model = *s.model();
    let r = model.a;
    let pot = model.potential(r);

    let n = 3000;
    let mut rng = StdRng::seed_from_u64(11);
    let energies = s.draw_energies(&vec![r; n], &mut rng);
    let mean: f64 = energies.iter().sum::<f64>() / n as f64;

    let steps = 4000;
    let h = -pot / steps as f64;
    let mut weight = 0.0;
    let mut weighted_e = 0.0;
    for i in 0..=steps {
        let e = pot + h * i as f64;
        let f = model.f_of_e(e.min(-1e-12));
        let w = if i == 0 || i == steps { 0.5 } else { 1.0 };
        weight += w * f;
        weighted_e += w * f * e;
    }
    let expected = weighted_e / weight;

    assert!(
        (mean / expected - 1.0).abs() < 0.08,
        "mean E = {mean}, expected = {expected}"
    );
}

#[test]
fn test_positions_isotropic() {
    // No preferred axis: mean unit-vector components vanish
    let s = sampler();
    let mut rng = StdRng::seed_from_u64(19);
    let positions = s.draw_coordinates(20_000, &mut rng);

    let mut mean = [0.0f64; 3];
    for pos in &positions {
        let r = (pos[0] * pos[0] + pos[1] * pos[1] + pos[2] * pos[2]).sqrt();
        for (m, &x) in mean.iter_mut().zip(pos) {
            *m += x / r;
        }
    }
    for (axis, m) in mean.iter().enumerate() {
        let avg = m / positions.len() as f64;
        assert!(avg.abs() < 0.02, "axis {axis} mean direction {avg}");
    }
}

#[test]
fn test_gaussian_and_exact_velocities_agree_roughly() {
    // The local-Maxwellian path is an approximation; its dispersion should
    // land within ~20% of the distribution-function draw at moderate radius
    let s = sampler();
    let model = *s.model();
    let mut rng = StdRng::seed_from_u64(23);

    let n = 4000;
    let r = model.a;
    let positions: Vec<[f64; 3]> = vec![[r, 0.0, 0.0]; n];

    let exact = s.draw_velocities(&positions, 31);
    let gauss = s.draw_velocities_gaussian(&positions, &mut rng);

    let mean_sq = |vels: &[[f64; 3]]| {
        vels.iter()
            .map(|v| v[0] * v[0] + v[1] * v[1] + v[2] * v[2])
            .sum::<f64>()
            / vels.len() as f64
    };
    let ratio = mean_sq(&gauss) / mean_sq(&exact);
    assert!((0.7..1.3).contains(&ratio), "<v^2> ratio {ratio}");
}
