use std::{ path::PathBuf, time::Instant };
use anyhow::Context;
use clap::Parser;
use ndarray_npy::write_npy;
use split2d::{
    config::{ read_toml, SimConfig },
    operators::{ build_imaginary_operators, build_operators },
    splitstep::Propagator,
    utils::{ gaussian_packet, probability_density, wf_normalized },
};

/// Evolve a Gaussian wave packet on a periodic 2D grid and write the final
/// probability density.
#[derive(Parser)]
#[clap(version, about)]
struct CommandLineArguments {
    /// Path to a TOML run configuration; built-in defaults are used otherwise.
    #[clap(long, short)]
    toml: Option<PathBuf>,
    /// Override the number of steps.
    #[clap(long, short)]
    steps: Option<usize>,
    /// Override the number of worker threads.
    #[clap(long, short = 'j')]
    threads: Option<usize>,
    /// Override the output directory.
    #[clap(long, short)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .format_timestamp_secs()
        .init();

    let args = CommandLineArguments::parse();
    let mut config: SimConfig = match &args.toml {
        Some(path) => read_toml(path)?,
        None => SimConfig::default(),
    };
    if let Some(steps) = args.steps { config.steps = steps; }
    if let Some(threads) = args.threads { config.threads = Some(threads); }
    if let Some(out) = args.out { config.output = Some(out); }

    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
    }

    let specs = config.specs()?;
    log::info!(
        "{}x{} grid, dt = {:.3e}, {} steps",
        specs.w(), specs.h(), specs.dt(), config.steps,
    );
    let operators
        = if config.imaginary {
            build_imaginary_operators(&specs, Some(&config.potential))?
        } else {
            build_operators(&specs, Some(&config.potential))?
        };
    let psi0 = wf_normalized(&gaussian_packet(&specs, &config.packet)?);
    let mut prop = Propagator::new(specs, operators, psi0)?
        .renormalize_each_step(config.renormalize);
    let norm0 = prop.norm();

    let start = Instant::now();
    let chunk = if config.report_every == 0 { config.steps } else { config.report_every };
    let mut remaining = config.steps;
    while remaining > 0 {
        let n = chunk.min(remaining);
        prop.run(n)?;
        remaining -= n;
        if config.report_every > 0 {
            log::info!(
                "step {:>6}: t = {:.5e}, norm drift = {:+.3e}",
                prop.steps(), prop.time(), prop.norm() / norm0 - 1.0,
            );
        }
    }
    log::info!(
        "finished {} steps in {:.3} s",
        prop.steps(), start.elapsed().as_secs_f64(),
    );

    if let Some(outdir) = &config.output {
        std::fs::create_dir_all(outdir)
            .with_context(|| format!("failed to create {}", outdir.display()))?;
        write_npy(outdir.join("density.npy"), &probability_density(prop.current()))
            .context("failed to write density")?;
        write_npy(outdir.join("potential.npy"), prop.operators().potential())
            .context("failed to write potential")?;
        log::info!("wrote output to {}", outdir.display());
    }
    Ok(())
}
