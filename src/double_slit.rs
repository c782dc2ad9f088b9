use std::path::PathBuf;
use anyhow::Context;
use ndarray as nd;
use ndarray_npy::write_npy;
use split2d::{
    operators::{ build_operators, Potential, Specs, DEF_SLIT_HEIGHT },
    splitstep::Propagator,
    utils::{ gaussian_packet, probability_density, wf_normalized, WavePacket },
};

// send a wave packet through a double slit and record snapshots of the
// probability density

const N: usize = 256; // grid size
const DT: f64 = 3e-5; // step parameter; each step advances t by DT/2
const FRAMES: usize = 40;
const STEPS_PER_FRAME: usize = 50;

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .format_timestamp_secs()
        .init();

    let specs = Specs::new(N, N, 1.0, 1.0, DT, 1.0)?;
    let potential = Potential::DoubleSlit { height: DEF_SLIT_HEIGHT };
    let operators = build_operators(&specs, Some(&potential))?;
    let psi0 = wf_normalized(&gaussian_packet(&specs, &WavePacket::default())?);
    let mut prop = Propagator::new(specs, operators, psi0)?;

    let mut frames: Vec<nd::Array2<f64>> = Vec::with_capacity(FRAMES + 1);
    frames.push(probability_density(prop.current()));
    let mut t: Vec<f64> = Vec::with_capacity(FRAMES + 1);
    t.push(prop.time());
    for k in 0..FRAMES {
        prop.run(STEPS_PER_FRAME)?;
        frames.push(probability_density(prop.current()));
        t.push(prop.time());
        log::info!("frame {}/{}: norm = {:.12}", k + 1, FRAMES, prop.norm());
    }
    let views: Vec<nd::ArrayView2<f64>> = frames.iter().map(|f| f.view()).collect();
    let density: nd::Array3<f64> = nd::stack(nd::Axis(0), &views)?;

    let outdir = PathBuf::from("output");
    std::fs::create_dir_all(&outdir)
        .context("failed to create output directory")?;
    write_npy(outdir.join("double_slit_density.npy"), &density)?;
    write_npy(outdir.join("double_slit_t.npy"), &nd::Array1::from(t))?;
    write_npy(outdir.join("double_slit_v.npy"), prop.operators().potential())?;
    Ok(())
}
