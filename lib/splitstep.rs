//! Split-step propagation of two-dimensional wavefunction grids.
//!
//! A single step applies, in order,
//! ```text
//! PotentialHalf1 -> MomentumSpace -> KineticFull -> PositionSpace -> PotentialHalf2
//! ```
//! i.e. multiplication by the potential operator, a forward FFT,
//! multiplication by the kinetic operator, a normalized inverse FFT and a
//! second multiplication by the potential operator. With unit-modulus
//! operators every stage is unitary, so the norm of the wavefunction is
//! preserved up to rounding.
//!
//! [`step`] is a pure function of its inputs; [`Propagator`] owns the operator
//! grids and a pair of wavefunction buffers that alternate roles every step.

use std::time::Instant;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    Arr2,
    error::{ OpError, ShapeError, StepError },
    fft::FftEngine,
    operators::{ Operators, Potential, Specs },
    utils::{ wf_norm, wf_renormalize },
};

pub type StepResult<T> = Result<T, StepError>;

/// One stage of a split-step update.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Multiply by the potential operator in position space.
    PotentialHalf1,
    /// Forward transform to momentum space.
    MomentumSpace,
    /// Multiply by the kinetic operator in momentum space.
    KineticFull,
    /// Inverse transform back to position space.
    PositionSpace,
    /// Multiply by the potential operator again.
    PotentialHalf2,
}

impl Stage {
    /// All stages of a step in the order they are applied.
    pub const SEQUENCE: [Self; 5] = [
        Self::PotentialHalf1,
        Self::MomentumSpace,
        Self::KineticFull,
        Self::PositionSpace,
        Self::PotentialHalf2,
    ];

    /// Stage following `self` within a step, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::PotentialHalf1 => Some(Self::MomentumSpace),
            Self::MomentumSpace => Some(Self::KineticFull),
            Self::KineticFull => Some(Self::PositionSpace),
            Self::PositionSpace => Some(Self::PotentialHalf2),
            Self::PotentialHalf2 => None,
        }
    }
}

/// Multiply `q` by `op` elementwise, in place.
pub fn multiply_inplace<S, T>(q: &mut Arr2<S>, op: &Arr2<T>) -> StepResult<()>
where
    S: nd::DataMut<Elem = C64>,
    T: nd::Data<Elem = C64>,
{
    ShapeError::check(q, op)?;
    nd::Zip::from(q).and(op)
        .par_for_each(|qk, opk| { *qk *= *opk; });
    Ok(())
}

/// Write the elementwise product of `a` and `b` into `out`.
pub fn multiply_into<S, T, U>(out: &mut Arr2<S>, a: &Arr2<T>, b: &Arr2<U>)
    -> StepResult<()>
where
    S: nd::DataMut<Elem = C64>,
    T: nd::Data<Elem = C64>,
    U: nd::Data<Elem = C64>,
{
    ShapeError::check(out, a)?;
    ShapeError::check(out, b)?;
    nd::Zip::from(out).and(a).and(b)
        .par_for_each(|ok, ak, bk| { *ok = ak * bk; });
    Ok(())
}

fn apply_stage<S, T, U>(
    engine: &FftEngine,
    stage: Stage,
    q: &mut Arr2<S>,
    exp_kinetic: &Arr2<T>,
    exp_potential: &Arr2<U>,
) -> StepResult<()>
where
    S: nd::DataMut<Elem = C64>,
    T: nd::Data<Elem = C64>,
    U: nd::Data<Elem = C64>,
{
    match stage {
        Stage::PotentialHalf1 | Stage::PotentialHalf2
            => multiply_inplace(q, exp_potential),
        Stage::MomentumSpace
            => engine.fft2_inplace(q).map_err(StepError::from),
        Stage::KineticFull
            => multiply_inplace(q, exp_kinetic),
        Stage::PositionSpace
            => engine.ifft2_inplace(q).map_err(StepError::from),
    }
}

fn step_into_with<S, T, U, V>(
    engine: &FftEngine,
    current: &Arr2<S>,
    next: &mut Arr2<T>,
    exp_kinetic: &Arr2<U>,
    exp_potential: &Arr2<V>,
) -> StepResult<()>
where
    S: nd::Data<Elem = C64>,
    T: nd::DataMut<Elem = C64>,
    U: nd::Data<Elem = C64>,
    V: nd::Data<Elem = C64>,
{
    ShapeError::check(current, exp_kinetic)?;
    // the first stage doubles as the copy into the output buffer
    multiply_into(next, current, exp_potential)?;
    Stage::SEQUENCE.iter().skip(1)
        .try_for_each(|&stage| {
            apply_stage(engine, stage, next, exp_kinetic, exp_potential)
        })
}

/// Advance `current` by one timestep, writing the result into `next`.
///
/// `next` must be a distinct grid of the same shape in standard layout.
pub fn step_into<S, T, U, V>(
    current: &Arr2<S>,
    next: &mut Arr2<T>,
    exp_kinetic: &Arr2<U>,
    exp_potential: &Arr2<V>,
) -> StepResult<()>
where
    S: nd::Data<Elem = C64>,
    T: nd::DataMut<Elem = C64>,
    U: nd::Data<Elem = C64>,
    V: nd::Data<Elem = C64>,
{
    step_into_with(FftEngine::global(), current, next, exp_kinetic, exp_potential)
}

/// Advance `current` by one timestep, returning the result as a new grid.
pub fn step<S, U, V>(
    current: &Arr2<S>,
    exp_kinetic: &Arr2<U>,
    exp_potential: &Arr2<V>,
) -> StepResult<nd::Array2<C64>>
where
    S: nd::Data<Elem = C64>,
    U: nd::Data<Elem = C64>,
    V: nd::Data<Elem = C64>,
{
    let mut next: nd::Array2<C64> = nd::Array2::zeros(current.raw_dim());
    step_into(current, &mut next, exp_kinetic, exp_potential)?;
    Ok(next)
}

/// Owner of a running simulation: parameters, operators, a transform engine
/// and two wavefunction buffers.
///
/// Each step reads the current buffer and writes the other one, after which
/// the roles are exchanged by flipping an index. Buffer contents are never
/// copied between slots.
#[derive(Debug)]
pub struct Propagator {
    specs: Specs,
    operators: Operators,
    engine: FftEngine,
    slots: [nd::Array2<C64>; 2],
    current: usize,
    steps: usize,
    renormalize: bool,
}

impl Propagator {
    /// Set up a simulation from an initial wavefunction.
    ///
    /// Dissipative operators (see [`Evolution::is_dissipative`]) imply
    /// renormalization after every step.
    ///
    /// [`Evolution::is_dissipative`]: crate::operators::Evolution::is_dissipative
    pub fn new(specs: Specs, operators: Operators, psi0: nd::Array2<C64>)
        -> StepResult<Self>
    {
        ShapeError::check_dim(&psi0, specs.dim())?;
        ShapeError::check(&psi0, operators.exp_kinetic())?;
        let psi0 = psi0.as_standard_layout().into_owned();
        let other: nd::Array2<C64> = nd::Array2::zeros(psi0.raw_dim());
        let renormalize = operators.evolution().is_dissipative();
        Ok(Self {
            specs,
            operators,
            engine: FftEngine::new(),
            slots: [psi0, other],
            current: 0,
            steps: 0,
            renormalize,
        })
    }

    /// Renormalize the wavefunction after every step.
    ///
    /// Ignored (always on) for dissipative evolution.
    pub fn renormalize_each_step(mut self, renormalize: bool) -> Self {
        self.renormalize
            = renormalize || self.operators.evolution().is_dissipative();
        self
    }

    /// Simulation parameters.
    pub fn specs(&self) -> &Specs { &self.specs }

    /// Operator grids.
    pub fn operators(&self) -> &Operators { &self.operators }

    /// Current wavefunction.
    pub fn current(&self) -> &nd::Array2<C64> { &self.slots[self.current] }

    /// Index of the buffer holding the current wavefunction.
    pub fn current_slot(&self) -> usize { self.current }

    /// Number of completed steps.
    pub fn steps(&self) -> usize { self.steps }

    /// Elapsed physical time.
    ///
    /// Each step advances the wavefunction by `dt / 2`; see
    /// [`docs`][crate::docs#operators].
    pub fn time(&self) -> f64 { 0.5 * self.steps as f64 * self.specs.dt() }

    /// Norm of the current wavefunction.
    pub fn norm(&self) -> f64 { wf_norm(self.current()) }

    /// Replace the current wavefunction, e.g. to inject a new wave packet.
    pub fn set_wavefunction(&mut self, psi: nd::Array2<C64>) -> StepResult<()> {
        ShapeError::check_dim(&psi, self.specs.dim())?;
        self.slots[self.current] = psi.as_standard_layout().into_owned();
        Ok(())
    }

    /// Replace the potential, rebuilding its operator.
    pub fn set_potential(&mut self, potential: &Potential) -> Result<(), OpError> {
        self.operators.set_potential(&self.specs, potential)
    }

    /// Take a single step.
    pub fn advance(&mut self) -> StepResult<()> {
        let (first, second) = self.slots.split_at_mut(1);
        let (src, dst) = if self.current == 0 {
            (&first[0], &mut second[0])
        } else {
            (&second[0], &mut first[0])
        };
        step_into_with(
            &self.engine,
            src,
            dst,
            self.operators.exp_kinetic(),
            self.operators.exp_potential(),
        )?;
        if self.renormalize && wf_renormalize(dst) == 0.0 {
            return Err(StepError::ZeroNorm);
        }
        self.current = 1 - self.current;
        self.steps += 1;
        log::trace!("completed step {}", self.steps);
        Ok(())
    }

    /// Take `n` steps.
    pub fn run(&mut self, n: usize) -> StepResult<()> {
        let start = Instant::now();
        (0..n).try_for_each(|_| self.advance())?;
        log::debug!(
            "{} steps in {:.3} s (t = {:.5e})",
            n, start.elapsed().as_secs_f64(), self.time(),
        );
        Ok(())
    }
}
