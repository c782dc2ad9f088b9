//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use ndarray as nd;
use thiserror::Error;

/// Returned when a transform length or grid dimension is not a power of two.
#[derive(Debug, Error)]
#[error("transform lengths must be non-zero powers of two; got {0}")]
pub struct DimError(pub usize);

impl DimError {
    pub(crate) fn check(n: usize) -> Result<(), Self> {
        n.is_power_of_two().then_some(()).ok_or(Self(n))
    }
}

/// Returned when an operation requiring grids of equal shape encounters grids
/// with different shapes.
#[derive(Debug, Error)]
#[error("encountered grids with incompatible shapes; got {0:?} and {1:?}")]
pub struct ShapeError(pub (usize, usize), pub (usize, usize));

impl ShapeError {
    pub(crate) fn check<S, A, T, B>(
        a: &nd::ArrayBase<S, nd::Ix2>,
        b: &nd::ArrayBase<T, nd::Ix2>,
    ) -> Result<(), Self>
    where
        S: nd::Data<Elem = A>,
        T: nd::Data<Elem = B>,
    {
        Self::check_dim(a, b.dim())
    }

    pub(crate) fn check_dim<S, A>(
        a: &nd::ArrayBase<S, nd::Ix2>,
        dim: (usize, usize),
    ) -> Result<(), Self>
    where S: nd::Data<Elem = A>
    {
        (a.dim() == dim).then_some(()).ok_or(Self(a.dim(), dim))
    }
}

/// Returned when a sampled potential holds a non-finite value, giving the
/// `(row, column)` of the first such cell.
#[derive(Debug, Error)]
#[error("potential must be finite everywhere; got {2} at ({0}, {1})")]
pub struct NonFiniteError(pub usize, pub usize, pub f64);

impl NonFiniteError {
    pub(crate) fn check<S>(v: &nd::ArrayBase<S, nd::Ix2>) -> Result<(), Self>
    where S: nd::Data<Elem = f64>
    {
        match v.indexed_iter().find(|(_, vk)| !vk.is_finite()) {
            Some(((i, j), vk)) => Err(Self(i, j, *vk)),
            None => Ok(()),
        }
    }
}

/// Returned when a grid is not stored contiguously in row-major order.
#[derive(Debug, Error)]
#[error("grids must be contiguous and row-major; got strides {0:?}")]
pub struct LayoutError(pub Vec<isize>);

/// Returned from functions in [`fft`][crate::fft].
#[derive(Debug, Error)]
pub enum FftError {
    /// [`DimError`]
    #[error("dimension error: {0}")]
    Dim(#[from] DimError),

    /// [`LayoutError`]
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// Returned when constructing [`Specs`][crate::operators::Specs] or a
/// [`WavePacket`][crate::utils::WavePacket] with unphysical parameters.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Returned when a domain extent is not positive and finite.
    #[error("domain extents must be positive and finite; got ({0}, {1})")]
    BadExtent(f64, f64),

    /// Returned when the timestep is not positive and finite.
    #[error("timestep must be positive and finite; got {0}")]
    BadTimestep(f64),

    /// Returned when the particle mass is not positive and finite.
    #[error("mass must be positive and finite; got {0}")]
    BadMass(f64),

    /// Returned when a wave packet width is not positive and finite.
    #[error("wave packet widths must be positive and finite; got ({0}, {1})")]
    BadWidth(f64, f64),

    /// [`DimError`]
    #[error("grid dimension error: {0}")]
    Dim(#[from] DimError),
}

fn positive(x: f64) -> bool { x.is_finite() && x > 0.0 }

impl SpecError {
    pub(crate) fn check_extent(lx: f64, ly: f64) -> Result<(), Self> {
        (positive(lx) && positive(ly)).then_some(())
            .ok_or(Self::BadExtent(lx, ly))
    }

    pub(crate) fn check_timestep(dt: f64) -> Result<(), Self> {
        positive(dt).then_some(()).ok_or(Self::BadTimestep(dt))
    }

    pub(crate) fn check_mass(m: f64) -> Result<(), Self> {
        positive(m).then_some(()).ok_or(Self::BadMass(m))
    }

    pub(crate) fn check_width(sx: f64, sy: f64) -> Result<(), Self> {
        (positive(sx) && positive(sy)).then_some(())
            .ok_or(Self::BadWidth(sx, sy))
    }
}

/// Returned from functions in [`operators`][crate::operators].
#[derive(Debug, Error)]
pub enum OpError {
    /// [`ShapeError`]
    #[error("potential shape error: {0}")]
    Shape(#[from] ShapeError),

    /// [`NonFiniteError`]
    #[error("potential value error: {0}")]
    NonFinite(#[from] NonFiniteError),
}

/// Returned from the split-step propagator.
#[derive(Debug, Error)]
pub enum StepError {
    /// [`ShapeError`]
    #[error("grid shape error: {0}")]
    Shape(#[from] ShapeError),

    /// [`FftError`]
    #[error("fft error: {0}")]
    Fft(#[from] FftError),

    /// Returned when renormalization is requested for a wavefunction with
    /// vanishing norm.
    #[error("cannot renormalize a wavefunction with zero norm")]
    ZeroNorm,
}

/// Returned when reading a simulation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Returned when the configuration file cannot be read.
    #[error("unable to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// Returned when the configuration cannot be parsed.
    #[error("unable to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// [`SpecError`]
    #[error("invalid simulation parameters: {0}")]
    Spec(#[from] SpecError),
}
