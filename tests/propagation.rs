use approx::assert_abs_diff_eq;
use ndarray as nd;
use num_complex::Complex64 as C64;
use split2d::{
    config::SimConfig,
    operators::{ build_operators, Potential, Specs },
    splitstep::{ step, Propagator },
    utils::{ gaussian_packet, probability_density, wf_norm, wf_normalized, WavePacket },
};

fn centroid_y(d: &nd::Array2<f64>) -> f64 {
    let h = d.nrows() as f64;
    d.indexed_iter()
        .map(|((i, _), dk)| i as f64 / h * dk)
        .sum::<f64>() / d.sum()
}

#[test]
fn free_norm_conserved() {
    let specs = Specs::new(64, 64, 1.0, 1.0, 1e-4, 1.0).unwrap();
    let ops = build_operators(&specs, Some(&Potential::Zero)).unwrap();
    let packet = WavePacket { momentum: (3.0, 5.0), ..Default::default() };
    let psi0 = wf_normalized(&gaussian_packet(&specs, &packet).unwrap());
    let mut prop = Propagator::new(specs, ops, psi0).unwrap();
    prop.run(1000).unwrap();
    assert_eq!(prop.steps(), 1000);
    assert!((prop.norm() - 1.0).abs() < 1e-6);
}

#[test]
fn barrier_norm_conserved() {
    let config = SimConfig { w: 64, h: 128, ..Default::default() };
    let specs = config.specs().unwrap();
    let ops = build_operators(&specs, Some(&config.potential)).unwrap();
    let psi0 = wf_normalized(&gaussian_packet(&specs, &config.packet).unwrap());
    let mut prop = Propagator::new(specs, ops, psi0).unwrap();
    prop.run(300).unwrap();
    assert!((prop.norm() - 1.0).abs() < 1e-6);
}

#[test]
fn free_packet_drifts_at_group_velocity() {
    // p = 2π·4 along y; one step of size dt advances by dt/2 in physical time,
    // so the centroid moves by p/m · (steps · dt / 2)
    let (steps, dt) = (100, 1e-4);
    let specs = Specs::new(64, 64, 1.0, 1.0, dt, 1.0).unwrap();
    let ops = build_operators(&specs, None).unwrap();
    let packet = WavePacket {
        center: (0.5, 0.5),
        momentum: (0.0, 4.0),
        width: (0.1, 0.1),
        amplitude: 1.0,
    };
    let psi0 = wf_normalized(&gaussian_packet(&specs, &packet).unwrap());
    let y0 = centroid_y(&probability_density(&psi0));
    assert_abs_diff_eq!(y0, 0.5, epsilon = 1e-9);

    let mut prop = Propagator::new(specs, ops, psi0).unwrap();
    prop.run(steps).unwrap();
    let p = std::f64::consts::TAU * 4.0;
    let expected = y0 + p * steps as f64 * dt / 2.0;
    let y1 = centroid_y(&probability_density(prop.current()));
    assert_abs_diff_eq!(y1, expected, epsilon = 2e-3);

    // elapsed time agrees with the distance travelled at v = p/m
    assert_abs_diff_eq!(prop.time(), steps as f64 * dt / 2.0, epsilon = 1e-15);
    assert_abs_diff_eq!((y1 - y0) / p, prop.time(), epsilon = 5e-5);
}

#[test]
fn propagator_matches_free_function() {
    let specs = Specs::new(32, 16, 2.0, 1.0, 5e-4, 0.5).unwrap();
    let potential = Potential::Harmonic { strength: 50.0 };
    let ops = build_operators(&specs, Some(&potential)).unwrap();
    let psi0 = gaussian_packet(&specs, &WavePacket::default()).unwrap();

    let mut q = psi0.clone();
    for _ in 0..5 {
        q = step(&q, ops.exp_kinetic(), ops.exp_potential()).unwrap();
    }
    let mut prop = Propagator::new(specs, ops, psi0).unwrap();
    prop.run(5).unwrap();

    for (a, b) in prop.current().iter().zip(q.iter()) {
        assert_abs_diff_eq!(a.re, b.re, epsilon = 1e-12);
        assert_abs_diff_eq!(a.im, b.im, epsilon = 1e-12);
    }
    assert_abs_diff_eq!(wf_norm(&q), prop.norm(), epsilon = 1e-10);
}

#[test]
fn zero_wavefunction_stays_zero() {
    let specs = Specs::new(16, 16, 1.0, 1.0, 1e-3, 1.0).unwrap();
    let ops = build_operators(&specs, Some(&Potential::default())).unwrap();
    let mut prop
        = Propagator::new(specs, ops, nd::Array2::zeros(specs.dim())).unwrap();
    prop.run(10).unwrap();
    assert!(prop.current().iter().all(|z| *z == C64::new(0.0, 0.0)));
}
