//! Iterative, in-place radix-2 Cooley-Tukey transforms in one and two
//! dimensions.
//!
//! The forward transform uses the kernel `exp(+2πi jk/n)` and is unnormalized;
//! the inverse uses `exp(-2πi jk/n)` and divides by `n` on its final butterfly
//! stage, so that `ifft(fft(z)) == z` without a separate scaling pass. Two
//! dimensional transforms apply the same convention along each axis.
//!
//! Twiddle factors are read from a [`CosTable`] built once per transform
//! length and cached by an [`FftEngine`]. The free functions in this module
//! share a single process-wide engine.
//!
//! ```
//! use num_complex::Complex64 as C64;
//! use split2d::fft::{ fft_inplace, ifft_inplace };
//!
//! let mut z: Vec<C64> = vec![C64::new(0.0, 0.0); 8];
//! z[0] = C64::new(1.0, 0.0);
//! fft_inplace(&mut z).unwrap();
//! assert!(z.iter().all(|zk| (zk - C64::new(1.0, 0.0)).norm() < 1e-12));
//! ifft_inplace(&mut z).unwrap();
//! assert!((z[0] - C64::new(1.0, 0.0)).norm() < 1e-12);
//! ```

use std::{
    collections::HashMap,
    f64::consts::{ FRAC_1_SQRT_2, TAU },
    sync::{ Arc, OnceLock, PoisonError, RwLock },
};
use ndarray as nd;
use num_complex::Complex64 as C64;
use num_traits::Zero;
use rayon::prelude::*;
use crate::{
    error::{ DimError, FftError, LayoutError },
    permute::{ bit_reverse, square_transpose, transpose_into },
};

pub type FftResult<T> = Result<T, FftError>;

/// Cosine values `cos(2π j/n)` for `j < n/2`, used for the twiddle factors of
/// a length-`n` transform.
///
/// Only the first octant is evaluated directly; the rest of the table follows
/// from quarter-wave symmetry. Sines are read from the same table shifted by a
/// quarter period.
#[derive(Clone, Debug)]
pub struct CosTable {
    n: usize,
    cos: Vec<f64>,
}

impl CosTable {
    /// Build the table for transforms of length `n`.
    ///
    /// *Panics if `n` is not a power of two*.
    pub fn new(n: usize) -> Self {
        assert!(n.is_power_of_two(), "cosine table length must be a power of two");
        let half = n / 2;
        let mut cos: Vec<f64> = vec![0.0; half];
        let angle = TAU / n as f64;
        if n < 8 {
            cos.iter_mut().enumerate()
                .for_each(|(j, c)| { *c = (angle * j as f64).cos(); });
            return Self { n, cos };
        }
        let quarter = n / 4;
        let eighth = n / 8;
        cos[0] = 1.0;
        cos[eighth] = FRAC_1_SQRT_2;
        cos[quarter] = 0.0;
        cos[3 * eighth] = -FRAC_1_SQRT_2;
        for i in 1..eighth {
            let (s, c) = (angle * i as f64).sin_cos();
            cos[i] = c;
            cos[quarter - i] = s;
            cos[quarter + i] = -s;
            cos[half - i] = -c;
        }
        Self { n, cos }
    }

    /// Transform length served by this table.
    pub fn len(&self) -> usize { self.n }

    /// Always `false`: tables serve lengths of at least 1.
    pub fn is_empty(&self) -> bool { self.n == 0 }

    /// Return `cos(2π j/n)`.
    ///
    /// *Panics if `j >= n/2`*.
    pub fn cos(&self, j: usize) -> f64 { self.cos[j] }

    /// Return `sin(2π j/n)`.
    ///
    /// *Panics if `j >= n/2`*.
    pub fn sin(&self, j: usize) -> f64 {
        let quarter = self.n / 4;
        if quarter == 0 {
            0.0
        } else if j < quarter {
            -self.cos[j + quarter]
        } else {
            self.cos[j - quarter]
        }
    }

    // exp(i sign 2π j/n)
    fn twiddle(&self, j: usize, sign: f64) -> C64 {
        C64::new(self.cos(j), sign * self.sin(j))
    }
}

// the butterfly network proper; `z.len()` must equal `table.len()`
fn transform(table: &CosTable, z: &mut [C64], inverse: bool) {
    let n = z.len();
    debug_assert_eq!(n, table.len());
    bit_reverse(z);
    let sign = if inverse { -1.0 } else { 1.0 };
    let mut block = 2;
    while block <= n {
        let half = block / 2;
        let stride = n / block;
        // fold the inverse normalization into the last stage
        let scale = if inverse && block == n { (n as f64).recip() } else { 1.0 };
        for chunk in z.chunks_exact_mut(block) {
            let (evens, odds) = chunk.split_at_mut(half);
            evens.iter_mut().zip(odds.iter_mut()).enumerate()
                .for_each(|(k, (e, o))| {
                    let t = table.twiddle(k * stride, sign) * *o;
                    let even = *e;
                    *e = (even + t) * scale;
                    *o = (even - t) * scale;
                });
        }
        block <<= 1;
    }
}

// transform every length-`n` row of `data` in parallel
fn transform_rows(table: &CosTable, data: &mut [C64], n: usize, inverse: bool) {
    data.par_chunks_exact_mut(n)
        .for_each(|row| transform(table, row, inverse));
}

/// Owner of the per-length cosine tables used by the transforms.
///
/// Tables are built lazily on first use of a given length and are shared by
/// every later transform of that length. The cache is guarded so that
/// concurrent first calls build each table once; parallel row loops receive
/// the table before they start and never touch the lock.
#[derive(Debug, Default)]
pub struct FftEngine {
    tables: RwLock<HashMap<usize, Arc<CosTable>>>,
}

static GLOBAL_ENGINE: OnceLock<FftEngine> = OnceLock::new();

impl FftEngine {
    /// Create an engine with an empty cache.
    pub fn new() -> Self { Self::default() }

    /// Return the process-wide engine used by the free functions in this
    /// module.
    pub fn global() -> &'static Self {
        GLOBAL_ENGINE.get_or_init(Self::new)
    }

    /// Return the cosine table for length `n`, building it if necessary.
    ///
    /// *Panics if `n` is not a power of two*.
    pub fn table(&self, n: usize) -> Arc<CosTable> {
        let cached = self.tables.read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&n)
            .cloned();
        if let Some(table) = cached { return table; }
        let mut tables = self.tables.write()
            .unwrap_or_else(PoisonError::into_inner);
        tables.entry(n)
            .or_insert_with(|| {
                log::debug!("building cosine table for length {n}");
                Arc::new(CosTable::new(n))
            })
            .clone()
    }

    /// List the transform lengths with a cached table, in ascending order.
    pub fn cached_lengths(&self) -> Vec<usize> {
        let mut lengths: Vec<usize> = self.tables.read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect();
        lengths.sort_unstable();
        lengths
    }

    fn transform1(&self, z: &mut [C64], inverse: bool) -> FftResult<()> {
        DimError::check(z.len())?;
        transform(&self.table(z.len()), z, inverse);
        Ok(())
    }

    /// Perform the one-dimensional forward transform in place.
    pub fn fft_inplace(&self, z: &mut [C64]) -> FftResult<()> {
        self.transform1(z, false)
    }

    /// Perform the one-dimensional, normalized inverse transform in place.
    pub fn ifft_inplace(&self, z: &mut [C64]) -> FftResult<()> {
        self.transform1(z, true)
    }

    fn transform2<S>(&self, grid: &mut nd::ArrayBase<S, nd::Ix2>, inverse: bool)
        -> FftResult<()>
    where S: nd::DataMut<Elem = C64>
    {
        let (h, w) = grid.dim();
        DimError::check(w)?;
        DimError::check(h)?;
        let strides = grid.strides().to_vec();
        let data = grid.as_slice_mut().ok_or(LayoutError(strides))?;
        let row_table = self.table(w);
        if w == h {
            transform_rows(&row_table, data, w, inverse);
            square_transpose(data, w);
            transform_rows(&row_table, data, w, inverse);
            square_transpose(data, w);
        } else {
            let col_table = self.table(h);
            transform_rows(&row_table, data, w, inverse);
            let mut scratch: Vec<C64> = vec![C64::zero(); w * h];
            transpose_into(&mut scratch, data, w, h);
            transform_rows(&col_table, &mut scratch, h, inverse);
            transpose_into(data, &scratch, h, w);
        }
        Ok(())
    }

    /// Perform the two-dimensional forward transform of an `h × w` grid in
    /// place.
    ///
    /// Both dimensions must be powers of two and the grid must be in standard
    /// (row-major, contiguous) layout.
    pub fn fft2_inplace<S>(&self, grid: &mut nd::ArrayBase<S, nd::Ix2>)
        -> FftResult<()>
    where S: nd::DataMut<Elem = C64>
    {
        self.transform2(grid, false)
    }

    /// Perform the two-dimensional, normalized inverse transform of an `h × w`
    /// grid in place.
    ///
    /// Each axis is normalized by its own length, for a total factor of
    /// `1/(w h)`.
    pub fn ifft2_inplace<S>(&self, grid: &mut nd::ArrayBase<S, nd::Ix2>)
        -> FftResult<()>
    where S: nd::DataMut<Elem = C64>
    {
        self.transform2(grid, true)
    }
}

/// Perform the one-dimensional forward transform in place.
pub fn fft_inplace(z: &mut [C64]) -> FftResult<()> {
    FftEngine::global().fft_inplace(z)
}

/// Perform the one-dimensional, normalized inverse transform in place.
pub fn ifft_inplace(z: &mut [C64]) -> FftResult<()> {
    FftEngine::global().ifft_inplace(z)
}

/// Perform the one-dimensional forward transform, returning a new sequence.
pub fn fft(z: &[C64]) -> FftResult<Vec<C64>> {
    let mut f = z.to_vec();
    fft_inplace(&mut f)?;
    Ok(f)
}

/// Perform the one-dimensional, normalized inverse transform, returning a new
/// sequence.
pub fn ifft(z: &[C64]) -> FftResult<Vec<C64>> {
    let mut x = z.to_vec();
    ifft_inplace(&mut x)?;
    Ok(x)
}

/// Perform the two-dimensional forward transform in place.
pub fn forward_fft2<S>(grid: &mut nd::ArrayBase<S, nd::Ix2>) -> FftResult<()>
where S: nd::DataMut<Elem = C64>
{
    FftEngine::global().fft2_inplace(grid)
}

/// Perform the two-dimensional, normalized inverse transform in place.
pub fn inverse_fft2<S>(grid: &mut nd::ArrayBase<S, nd::Ix2>) -> FftResult<()>
where S: nd::DataMut<Elem = C64>
{
    FftEngine::global().ifft2_inplace(grid)
}

/// Perform the two-dimensional forward transform, returning a new grid.
pub fn fft2<S>(grid: &nd::ArrayBase<S, nd::Ix2>) -> FftResult<nd::Array2<C64>>
where S: nd::Data<Elem = C64>
{
    let mut f = grid.as_standard_layout().into_owned();
    forward_fft2(&mut f)?;
    Ok(f)
}

/// Perform the two-dimensional, normalized inverse transform, returning a new
/// grid.
pub fn ifft2<S>(grid: &nd::ArrayBase<S, nd::Ix2>) -> FftResult<nd::Array2<C64>>
where S: nd::Data<Elem = C64>
{
    let mut x = grid.as_standard_layout().into_owned();
    inverse_fft2(&mut x)?;
    Ok(x)
}
