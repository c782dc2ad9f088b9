//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Units](#units)
//! - [Transforms](#transforms)
//! - [Operators](#operators)
//! - [Imaginary time](#imaginary-time)
//!
//! # Background
//! The time-dependent Schrödinger equation for a single particle of mass *m*
//! moving in a static two-dimensional potential *V*(*x*, *y*) reads
//! ```text
//!   ∂ψ      ħ²
//! i -- = - --- (∂²/∂x² + ∂²/∂y²) ψ + V ψ ≡ (H_k + H_v) ψ
//!   ∂t     2 m
//! ```
//! The formal solution over a timestep *dt* is exp(-*i* (*H*<sub>*k*</sub> +
//! *H*<sub>*v*</sub>) *dt* / *ħ*) *ψ*, but the two operators do not commute
//! and so the exponential cannot simply be split. Sandwiching a full kinetic
//! step between two half-sized potential steps (Strang splitting) does so with
//! only a local *O*(*dt*³) error:
//! ```text
//!               -i H_v dt/2ħ  -i H_k dt/ħ  -i H_v dt/2ħ
//! ψ(t + dt) = [e             e            e            ] ψ(t) + O(dt³)
//! ```
//! The potential factor is diagonal in position space and the kinetic factor
//! is diagonal in momentum space, so each is applied as a pointwise phase in
//! the space where it is diagonal, with fast Fourier transforms moving the
//! grid between the two.
//!
//! The grid is periodic: a packet leaving through one edge re-enters through
//! the opposite edge.
//!
//! # Units
//! All quantities are in simulation units with *ħ* = 1 (see
//! [`HBAR`][crate::operators::HBAR]). The domain extents *L*<sub>*x*</sub>,
//! *L*<sub>*y*</sub>, the timestep and the mass are plain positive numbers
//! whose physical meaning is left to the caller.
//!
//! # Transforms
//! The transforms in [`fft`][crate::fft] are unnormalized in the forward
//! direction and carry the full 1/*n* factor in the inverse direction. The
//! forward kernel is
//! ```text
//!        n-1
//! X[k] =  Σ  x[j] exp(+2πi jk/n)
//!        j=0
//! ```
//! which is the opposite sign convention to most numerical libraries. Since
//! the kinetic operator depends only on *p*², the propagator is insensitive to
//! the choice.
//!
//! Two-dimensional transforms apply the one-dimensional transform to every
//! row, transpose, apply it to every row again, and transpose back. Square
//! grids are transposed in place; rectangular grids go through a scratch
//! buffer.
//!
//! # Operators
//! Bin (*i*, *j*) of a transformed *h* × *w* grid holds the spatial
//! frequencies *f*<sub>*x*</sub> = [`fft_freq`][crate::freq::fft_freq](*w*)\[*j*\]
//! and *f*<sub>*y*</sub> = `fft_freq(h)[i]`, with momenta
//! ```text
//! p_x = 2π ħ f_x / L_x
//! p_y = 2π ħ f_y / L_y
//! ```
//! The two precomputed grids are then
//! ```text
//!                          (p_x² + p_y²)
//! exp_kinetic   = exp(-i dt ------------ / 2ħ)
//!                              2 m
//!
//! exp_potential = exp(-i dt V / 4ħ)
//! ```
//! Both phases are half of those in the textbook step above, so one step of
//! size *dt* advances the wavefunction by *dt*/2 in textbook units. Every
//! factor still has unit modulus, so the discrete norm is conserved to
//! rounding error.
//!
//! One step is then:
//! ```text
//!        ψ(t, x)
//!           |
//!           V
//!     exp_potential
//!           |
//!           '--> FFT ---.
//!                       |
//!                       V
//!                  exp_kinetic
//!                       |
//!           .-- iFFT <--'
//!           |
//!           V
//!     exp_potential
//!           |
//!           V
//!   ψ(t + dt/2, x)
//! ```
//! [`Propagator::time`][crate::splitstep::Propagator::time] reports elapsed
//! time in this physical convention.
//!
//! # Imaginary time
//! Substituting *t* → -*i* *τ* turns every phase into a real decay factor,
//! exp(-*E* *dτ*), which damps each energy eigencomponent at a rate set by its
//! energy. Repeated steps followed by renormalization converge to the ground
//! state of the potential. See
//! [`build_imaginary_operators`][crate::operators::build_imaginary_operators]
//! and [`Propagator::renormalize_each_step`][crate::splitstep::Propagator::renormalize_each_step].
