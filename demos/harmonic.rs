use std::path::PathBuf;
use ndarray as nd;
use ndarray_npy::write_npy;
use num_complex::Complex64 as C64;
use split2d::{
    operators::{ build_imaginary_operators, build_operators, Potential, Specs },
    splitstep::Propagator,
    utils::{ gaussian_packet, probability_density, wf_normalized, WavePacket },
};

// relax into the ground state of a harmonic well, then displace it and watch
// it oscillate

fn main() {
    const N: usize = 128;
    const STRENGTH: f64 = 1e4; // V = s (x² + y²) in fractional coordinates

    let specs = Specs::new(N, N, 1.0, 1.0, 1e-4, 1.0).unwrap();
    let potential = Potential::Harmonic { strength: STRENGTH };

    // imaginary-time relaxation from a broad packet
    let relax = build_imaginary_operators(&specs, Some(&potential)).unwrap();
    let broad = WavePacket {
        center: (0.5, 0.5),
        momentum: (0.0, 0.0),
        width: (0.2, 0.2),
        amplitude: 1.0,
    };
    let q0 = gaussian_packet(&specs, &broad).unwrap();
    let mut prop = Propagator::new(specs, relax, q0).unwrap();
    prop.run(3000).unwrap();
    let ground: nd::Array2<C64> = prop.current().clone();

    // shift the ground state an eighth of the way across the grid and release
    // it in real time
    let shifted: nd::Array2<C64>
        = nd::Array2::from_shape_fn(specs.dim(), |(i, j)| {
            ground[[i, (j + N / 8) % N]]
        });
    let ops = build_operators(&specs, Some(&potential)).unwrap();
    let mut prop = Propagator::new(specs, ops, wf_normalized(&shifted)).unwrap();
    let mut centroid_x: Vec<f64> = Vec::new();
    for _ in 0..200 {
        prop.run(10).unwrap();
        let d = probability_density(prop.current());
        let cx: f64
            = d.indexed_iter()
            .map(|((_, j), dk)| j as f64 * dk)
            .sum::<f64>() / d.sum();
        centroid_x.push(cx);
    }
    println!("norm after {} steps: {:.12}", prop.steps(), prop.norm());

    let outdir = PathBuf::from("output");
    std::fs::create_dir_all(&outdir).unwrap();
    write_npy(outdir.join("harmonic_ground.npy"), &probability_density(&ground))
        .unwrap();
    write_npy(outdir.join("harmonic_centroid.npy"), &nd::Array1::from(centroid_x))
        .unwrap();
}
