//! Run configuration, read from TOML.
//!
//! Every field is optional; anything left out takes the value of
//! [`SimConfig::default`]. A minimal file might read
//! ```toml
//! w = 128
//! h = 128
//! steps = 500
//!
//! [potential]
//! type = "Harmonic"
//! strength = 10000.0
//!
//! [packet]
//! center = [0.5, 0.5]
//! momentum = [0.0, 0.0]
//! ```

use std::{ path::{ Path, PathBuf }, str::FromStr };
use serde::{ Deserialize, Serialize };
use crate::{
    error::{ ConfigError, SpecError },
    operators::{ Potential, Specs },
    utils::WavePacket,
};

/// Parameters for a single run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Grid width; must be a power of two.
    pub w: usize,
    /// Grid height; must be a power of two.
    pub h: usize,
    /// Physical extent of the domain along x.
    pub lx: f64,
    /// Physical extent of the domain along y.
    pub ly: f64,
    /// Timestep.
    pub dt: f64,
    /// Particle mass.
    pub mass: f64,
    /// Number of steps to take.
    pub steps: usize,
    /// Renormalize the wavefunction after every step.
    pub renormalize: bool,
    /// Evolve in imaginary time instead of real time.
    pub imaginary: bool,
    /// Log progress every this many steps; zero disables progress reports.
    pub report_every: usize,
    /// Worker threads for the data-parallel loops; defaults to one per core.
    pub threads: Option<usize>,
    /// Directory to write output arrays into.
    pub output: Option<PathBuf>,
    /// Static potential.
    pub potential: Potential,
    /// Initial wave packet.
    pub packet: WavePacket,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            w: 256,
            h: 256,
            lx: 1.0,
            ly: 1.0,
            dt: 3e-5,
            mass: 1.0,
            steps: 1000,
            renormalize: false,
            imaginary: false,
            report_every: 100,
            threads: None,
            output: None,
            potential: Potential::default(),
            packet: WavePacket::default(),
        }
    }
}

impl SimConfig {
    /// Validate the grid and physical parameters.
    pub fn specs(&self) -> Result<Specs, SpecError> {
        Specs::new(self.w, self.h, self.lx, self.ly, self.dt, self.mass)
    }

    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.specs()?;
        Ok(config)
    }
}

impl FromStr for SimConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::from_toml_str(s) }
}

/// Read and validate a configuration file.
pub fn read_toml<P>(path: P) -> Result<SimConfig, ConfigError>
where P: AsRef<Path>
{
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
    SimConfig::from_toml_str(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DimError;

    #[test]
    fn empty_is_default() {
        let config: SimConfig = "".parse().unwrap();
        assert_eq!(config, SimConfig::default());
        let specs = config.specs().unwrap();
        assert_eq!(specs.dim(), (256, 256));
        assert_eq!(specs.dt(), 3e-5);
    }

    #[test]
    fn partial_override() {
        let text = r#"
            w = 64
            h = 32
            steps = 10
            threads = 2
            output = "out"

            [potential]
            type = "Harmonic"
            strength = 5.0

            [packet]
            momentum = [3.0, 0.0]
        "#;
        let config: SimConfig = text.parse().unwrap();
        assert_eq!(config.specs().unwrap().dim(), (32, 64));
        assert_eq!(config.steps, 10);
        assert_eq!(config.threads, Some(2));
        assert_eq!(config.output, Some(PathBuf::from("out")));
        assert_eq!(config.potential, Potential::Harmonic { strength: 5.0 });
        assert_eq!(config.packet.momentum, (3.0, 0.0));
        assert_eq!(config.packet.center, WavePacket::default().center);
    }

    #[test]
    fn invalid_configs() {
        assert!(matches!(
            "w = 100".parse::<SimConfig>(),
            Err(ConfigError::Spec(SpecError::Dim(DimError(100))))
        ));
        assert!(matches!(
            "dt = -1.0".parse::<SimConfig>(),
            Err(ConfigError::Spec(SpecError::BadTimestep(..)))
        ));
        assert!(matches!(
            "bogus = 1".parse::<SimConfig>(),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file() {
        let res = read_toml("this/path/does/not/exist.toml");
        assert!(matches!(res, Err(ConfigError::Read { .. })));
    }
}
