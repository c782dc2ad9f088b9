//! Frequency-space coordinates accompanying the transforms in
//! [`fft`][crate::fft].
//!
//! Frequencies are integer indices: element `k` of a length-`n` transform
//! corresponds to the spatial frequency `fft_freq(n)[k] / L` for a domain of
//! extent `L`.

use ndarray::{ self as nd, concatenate };
use crate::{ Arr1, Arr2 };

/// Generate the integer frequency index of each bin of a length-`n` transform.
///
/// Indices `0..⌈n/2⌉` map to themselves and the rest to negative frequencies
/// counting up to `-1`, e.g. `[0, 1, 2, 3, -4, -3, -2, -1]` for `n = 8` and
/// `[0, 1, 2, -2, -1]` for `n = 5`.
pub fn fft_freq(n: usize) -> nd::Array1<f64> {
    let m = (n + 1) / 2;
    let fp: nd::Array1<f64> = (0..m).map(|k| k as f64).collect();
    let fm: nd::Array1<f64>
        = (1..=n - m).rev()
        .map(|k| -(k as f64))
        .collect();
    concatenate!(nd::Axis(0), fp, fm)
}

/// Generate horizontal and vertical frequency indices for every cell of an
/// `h × w` grid.
///
/// Each row of the first grid is [`fft_freq`]`(w)`; the second grid is built
/// as `w` rows of [`fft_freq`]`(h)` and transposed into place, so that each of
/// its columns is `fft_freq(h)`.
pub fn fft_freq2(w: usize, h: usize) -> (nd::Array2<f64>, nd::Array2<f64>) {
    let mut freq_x: nd::Array2<f64> = nd::Array2::zeros((h, w));
    let fx = fft_freq(w);
    freq_x.rows_mut().into_iter()
        .for_each(|mut row| { row.assign(&fx); });
    let mut rows_y: nd::Array2<f64> = nd::Array2::zeros((w, h));
    let fy = fft_freq(h);
    rows_y.rows_mut().into_iter()
        .for_each(|mut row| { row.assign(&fy); });
    let freq_y = rows_y.reversed_axes().as_standard_layout().into_owned();
    (freq_x, freq_y)
}

// source index feeding output index `k` after rolling by `shift`
fn rolled(k: usize, n: usize, shift: usize) -> usize { (k + n - shift) % n }

/// Return a copy of `x` with the zero-frequency bin moved to the centre.
pub fn fft_shift<S, A>(x: &Arr1<S>) -> nd::Array1<A>
where
    S: nd::Data<Elem = A>,
    A: Clone,
{
    let n = x.len();
    nd::Array1::from_shape_fn(n, |k| x[rolled(k, n, n / 2)].clone())
}

/// Undo [`fft_shift`].
pub fn ifft_shift<S, A>(x: &Arr1<S>) -> nd::Array1<A>
where
    S: nd::Data<Elem = A>,
    A: Clone,
{
    let n = x.len();
    nd::Array1::from_shape_fn(n, |k| x[rolled(k, n, n - n / 2)].clone())
}

/// Return a copy of `x` with the zero-frequency bin moved to the centre along
/// both axes.
pub fn fft_shift2<S, A>(x: &Arr2<S>) -> nd::Array2<A>
where
    S: nd::Data<Elem = A>,
    A: Clone,
{
    let (h, w) = x.dim();
    nd::Array2::from_shape_fn((h, w), |(i, j)| {
        x[[rolled(i, h, h / 2), rolled(j, w, w / 2)]].clone()
    })
}

/// Undo [`fft_shift2`].
pub fn ifft_shift2<S, A>(x: &Arr2<S>) -> nd::Array2<A>
where
    S: nd::Data<Elem = A>,
    A: Clone,
{
    let (h, w) = x.dim();
    nd::Array2::from_shape_fn((h, w), |(i, j)| {
        x[[rolled(i, h, h - h / 2), rolled(j, w, w - w / 2)]].clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freq_even_and_odd() {
        assert_eq!(fft_freq(8), nd::array![0.0, 1.0, 2.0, 3.0, -4.0, -3.0, -2.0, -1.0]);
        assert_eq!(fft_freq(5), nd::array![0.0, 1.0, 2.0, -2.0, -1.0]);
        assert_eq!(fft_freq(1), nd::array![0.0]);
        assert_eq!(fft_freq(2), nd::array![0.0, -1.0]);
    }

    #[test]
    fn freq2_axes() {
        let (w, h) = (8, 4);
        let (fx, fy) = fft_freq2(w, h);
        assert_eq!(fx.dim(), (h, w));
        assert_eq!(fy.dim(), (h, w));
        assert!(fy.is_standard_layout());
        for i in 0..h {
            assert_eq!(fx.row(i), fft_freq(w));
        }
        for j in 0..w {
            assert_eq!(fy.column(j), fft_freq(h));
        }
    }

    #[test]
    fn shifts() {
        let f = fft_freq(8);
        assert_eq!(fft_shift(&f), nd::array![-4.0, -3.0, -2.0, -1.0, 0.0, 1.0, 2.0, 3.0]);
        assert_eq!(ifft_shift(&fft_shift(&f)), f);
        let g = fft_freq(5);
        assert_eq!(fft_shift(&g), nd::array![-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(ifft_shift(&fft_shift(&g)), g);

        let (fx, fy) = fft_freq2(4, 2);
        let sx = fft_shift2(&fx);
        let sy = fft_shift2(&fy);
        assert_eq!(sx.row(0), nd::array![-2.0, -1.0, 0.0, 1.0]);
        assert_eq!(sy.column(0), nd::array![-1.0, 0.0]);
        assert_eq!(ifft_shift2(&sx), fx);
    }
}
