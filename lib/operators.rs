//! Construction of the precomputed phase operators applied by the split-step
//! propagator.
//!
//! With ħ = 1, a full step of the propagator applies
//! ```text
//! exp(-i dt V / 4) · IFFT · exp(-i dt p² / 4m) · FFT · exp(-i dt V / 4)
//! ```
//! to the wavefunction, where the momentum `p = 2π ħ f / L` is built from the
//! integer frequency grid of [`freq`][crate::freq]. See
//! [`docs`][crate::docs#operators] for background.

use std::f64::consts::TAU;
use ndarray as nd;
use num_complex::Complex64 as C64;
use serde::{ Deserialize, Serialize };
use crate::{
    Arr2,
    error::{ DimError, NonFiniteError, OpError, ShapeError, SpecError },
    freq::fft_freq2,
};

pub type OpResult<T> = Result<T, OpError>;

/// Reduced Planck constant in simulation units.
pub const HBAR: f64 = 1.0;

/// Default barrier height for [`Potential::DoubleSlit`].
pub const DEF_SLIT_HEIGHT: f64 = 40000.0;

/// Immutable simulation parameters.
///
/// Grid dimensions must be powers of two; the domain extents, timestep and
/// mass must be positive and finite.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Specs {
    w: usize,
    h: usize,
    lx: f64,
    ly: f64,
    dt: f64,
    m: f64,
}

impl Specs {
    /// Validate and construct.
    pub fn new(w: usize, h: usize, lx: f64, ly: f64, dt: f64, m: f64)
        -> Result<Self, SpecError>
    {
        DimError::check(w)?;
        DimError::check(h)?;
        SpecError::check_extent(lx, ly)?;
        SpecError::check_timestep(dt)?;
        SpecError::check_mass(m)?;
        Ok(Self { w, h, lx, ly, dt, m })
    }

    /// Grid width (number of columns).
    pub fn w(&self) -> usize { self.w }

    /// Grid height (number of rows).
    pub fn h(&self) -> usize { self.h }

    /// Grid shape as `(rows, columns)`, i.e. `(h, w)`.
    pub fn dim(&self) -> (usize, usize) { (self.h, self.w) }

    /// Physical extent of the domain along x.
    pub fn lx(&self) -> f64 { self.lx }

    /// Physical extent of the domain along y.
    pub fn ly(&self) -> f64 { self.ly }

    /// Timestep.
    pub fn dt(&self) -> f64 { self.dt }

    /// Particle mass.
    pub fn m(&self) -> f64 { self.m }

    /// Physical coordinates of cell `(i, j)`, centred so that cell
    /// `(h/2, w/2)` sits at the origin.
    pub fn coords(&self, i: usize, j: usize) -> (f64, f64) {
        let x = (j as f64 - (self.w / 2) as f64) * self.lx / self.w as f64;
        let y = (i as f64 - (self.h / 2) as f64) * self.ly / self.h as f64;
        (x, y)
    }
}

fn default_slit_height() -> f64 { DEF_SLIT_HEIGHT }

/// A static potential, sampled once onto the simulation grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Potential {
    /// Free particle.
    Zero,

    /// Harmonic well `V = s (x² + y²)` in fractional coordinates
    /// `x = (j - w/2)/w`, `y = (i - h/2)/h`.
    Harmonic { strength: f64 },

    /// A horizontal wall of the given height across the middle of the grid,
    /// pierced by two narrow slits.
    DoubleSlit {
        #[serde(default = "default_slit_height")]
        height: f64,
    },

    /// A caller-sampled grid with the same shape as the simulation grid.
    #[serde(skip)]
    Sampled(nd::Array2<f64>),
}

impl Default for Potential {
    fn default() -> Self { Self::DoubleSlit { height: DEF_SLIT_HEIGHT } }
}

impl Potential {
    /// Sample a function of the physical coordinates returned by
    /// [`Specs::coords`].
    pub fn from_fn<F>(specs: &Specs, f: F) -> Self
    where F: Fn(f64, f64) -> f64
    {
        let v = nd::Array2::from_shape_fn(specs.dim(), |(i, j)| {
            let (x, y) = specs.coords(i, j);
            f(x, y)
        });
        Self::Sampled(v)
    }

    /// Evaluate the potential over every cell of the grid described by
    /// `specs`.
    ///
    /// Fails if any sampled value is infinite or NaN.
    pub fn sample(&self, specs: &Specs) -> OpResult<nd::Array2<f64>> {
        let (h, w) = specs.dim();
        let v = match self {
            Self::Zero => nd::Array2::zeros((h, w)),
            Self::Harmonic { strength } => {
                nd::Array2::from_shape_fn((h, w), |(i, j)| {
                    let x = (j as f64 - (w / 2) as f64) / w as f64;
                    let y = (i as f64 - (h / 2) as f64) / h as f64;
                    strength * (x * x + y * y)
                })
            },
            Self::DoubleSlit { height } => {
                let (wi, hi) = (w as i64, h as i64);
                let in_wall = |i: i64| i > hi / 2 - 5 && i < hi / 2 + 4;
                let blocked = |j: i64| {
                    (j < 16 * wi / 40 || j > 17 * wi / 40)
                        && (j < 23 * wi / 40 || j > 24 * wi / 40)
                };
                nd::Array2::from_shape_fn((h, w), |(i, j)| {
                    if in_wall(i as i64) && blocked(j as i64) {
                        *height
                    } else {
                        0.0
                    }
                })
            },
            Self::Sampled(v) => {
                ShapeError::check_dim(v, (h, w))?;
                v.as_standard_layout().into_owned()
            },
        };
        NonFiniteError::check(&v)?;
        Ok(v)
    }
}

/// Whether the operators advance the wavefunction in real time or relax it in
/// imaginary time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Evolution {
    /// Unitary evolution; all operator cells have unit modulus.
    Real,
    /// Imaginary-time (Wick-rotated) relaxation toward the ground state; the
    /// operators are real decaying factors and the wavefunction must be
    /// renormalized after every step.
    Imaginary,
    /// Complex timestep `dt · (a + ib)`. `Complex(1 + 0i)` is [`Self::Real`]
    /// and `Complex(0 - 1i)` is [`Self::Imaginary`]; a negative imaginary part
    /// damps the wavefunction and a positive one amplifies it.
    Complex(C64),
}

impl Evolution {
    // factor applied for an accumulated phase angle θ
    fn factor(self, theta: f64) -> C64 {
        match self {
            Self::Real => C64::cis(theta),
            Self::Imaginary => C64::new(theta.exp(), 0.0),
            Self::Complex(z) => (theta * C64::new(-z.im, z.re)).exp(),
        }
    }

    /// Return `true` if the operators do not conserve the norm, in which case
    /// the propagator renormalizes after every step.
    pub fn is_dissipative(self) -> bool {
        match self {
            Self::Real => false,
            Self::Imaginary => true,
            Self::Complex(z) => z.im != 0.0,
        }
    }
}

/// Generate the full-step kinetic operator in momentum space.
///
/// Cell `(i, j)` holds `exp(iθ)` with `θ = -dt p² / 4mħ`, where
/// `p = 2πħ (fx / lx, fy / ly)`.
pub fn exp_kinetic(specs: &Specs) -> nd::Array2<C64> {
    make_exp_kinetic(specs, Evolution::Real)
}

fn make_exp_kinetic(specs: &Specs, evolution: Evolution) -> nd::Array2<C64> {
    let (freq_x, freq_y) = fft_freq2(specs.w, specs.h);
    let mut op: nd::Array2<C64> = nd::Array2::zeros(specs.dim());
    nd::Zip::from(&mut op).and(&freq_x).and(&freq_y)
        .par_for_each(|opk, &fx, &fy| {
            let px = TAU * HBAR * fx / specs.lx;
            let py = TAU * HBAR * fy / specs.ly;
            let e = (px * px + py * py) / (2.0 * specs.m);
            *opk = evolution.factor(-0.5 * specs.dt * e / HBAR);
        });
    op
}

/// Generate the quarter-step potential operator from a sampled potential.
///
/// Cell `(i, j)` holds `exp(iθ)` with `θ = -dt V / 4ħ`. The potential is
/// applied twice per step, on either side of the kinetic operator.
pub fn exp_potential<S>(specs: &Specs, v: &Arr2<S>) -> OpResult<nd::Array2<C64>>
where S: nd::Data<Elem = f64>
{
    make_exp_potential(specs, v, Evolution::Real)
}

fn make_exp_potential<S>(specs: &Specs, v: &Arr2<S>, evolution: Evolution)
    -> OpResult<nd::Array2<C64>>
where S: nd::Data<Elem = f64>
{
    ShapeError::check_dim(v, specs.dim())?;
    let mut op: nd::Array2<C64> = nd::Array2::zeros(specs.dim());
    nd::Zip::from(&mut op).and(v)
        .par_for_each(|opk, &vk| {
            *opk = evolution.factor(-0.25 * specs.dt * vk / HBAR);
        });
    Ok(op)
}

/// Precomputed operator grids for a run.
///
/// The raw potential is retained alongside its phase operator for display
/// purposes; the propagator only reads the two operator grids.
#[derive(Clone, Debug)]
pub struct Operators {
    exp_kinetic: nd::Array2<C64>,
    exp_potential: nd::Array2<C64>,
    potential: nd::Array2<f64>,
    evolution: Evolution,
}

impl Operators {
    fn build(specs: &Specs, potential: Option<&Potential>, evolution: Evolution)
        -> OpResult<Self>
    {
        let potential = match potential {
            Some(p) => p.sample(specs)?,
            None => nd::Array2::zeros(specs.dim()),
        };
        let exp_kinetic = make_exp_kinetic(specs, evolution);
        let exp_potential = make_exp_potential(specs, &potential, evolution)?;
        log::debug!(
            "built {:?}-time operators for a {}x{} grid",
            evolution, specs.w, specs.h,
        );
        Ok(Self { exp_kinetic, exp_potential, potential, evolution })
    }

    /// Full-step kinetic operator.
    pub fn exp_kinetic(&self) -> &nd::Array2<C64> { &self.exp_kinetic }

    /// Quarter-step potential operator.
    pub fn exp_potential(&self) -> &nd::Array2<C64> { &self.exp_potential }

    /// Sampled potential.
    pub fn potential(&self) -> &nd::Array2<f64> { &self.potential }

    /// How the operators advance the wavefunction.
    pub fn evolution(&self) -> Evolution { self.evolution }

    /// Replace the potential, rebuilding only the potential operator.
    pub fn set_potential(&mut self, specs: &Specs, potential: &Potential)
        -> OpResult<()>
    {
        let v = potential.sample(specs)?;
        self.exp_potential = make_exp_potential(specs, &v, self.evolution)?;
        self.potential = v;
        Ok(())
    }
}

/// Build the operators for real-time evolution. `None` is a free particle.
pub fn build_operators(specs: &Specs, potential: Option<&Potential>)
    -> OpResult<Operators>
{
    Operators::build(specs, potential, Evolution::Real)
}

/// Build the operators for an arbitrary [`Evolution`]. `None` is a free
/// particle.
pub fn build_operators_with(
    specs: &Specs,
    potential: Option<&Potential>,
    evolution: Evolution,
) -> OpResult<Operators>
{
    Operators::build(specs, potential, evolution)
}

/// Build the operators for imaginary-time relaxation. `None` is a free
/// particle.
pub fn build_imaginary_operators(specs: &Specs, potential: Option<&Potential>)
    -> OpResult<Operators>
{
    Operators::build(specs, potential, Evolution::Imaginary)
}
