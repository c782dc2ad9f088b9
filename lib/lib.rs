//! Provides functions and higher-level constructs for time evolution of a
//! single quantum particle on a periodic two-dimensional grid via the
//! split-step Fourier method.
//!
//! Provides implementations for the following numerical routines:
//! - Transforms:
//!     - Radix-2 decimation-in-time FFT with cached cosine tables, in one and
//!       two dimensions
//!     - Bit-reversal permutation and (square or rectangular) transposition
//! - Time-dependent:
//!     - Second-order (Strang) split-step operator, in real or imaginary time
//!     - Double-buffered propagator with optional per-step renormalization
//!
//! See [`docs`] for theoretical background.

pub mod config;
pub mod error;
pub mod fft;
pub mod freq;
pub mod operators;
pub mod permute;
pub mod pixel;
pub mod splitstep;
pub mod utils;

pub mod docs;

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;
pub type Arr2<S> = ndarray::ArrayBase<S, ndarray::Ix2>;
