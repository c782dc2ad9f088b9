//! In-place index permutations underlying the radix-2 transforms: bit
//! reversal and transposition of row-major grids.
//!
//! These functions work on plain slices of any element type and assume a
//! power-of-two length where noted; dimension checks are left to callers in
//! [`fft`][crate::fft].

use rayon::prelude::*;

// reverse the lowest `bits` bits of `i`
fn reverse_index(i: usize, bits: u32) -> usize {
    i.reverse_bits() >> (usize::BITS - bits)
}

/// Apply the bit-reversal permutation to a sequence of power-of-two length in
/// place.
///
/// Each element at index `i` is swapped with the element at the index obtained
/// by reversing the `log2(n)` low bits of `i`. The permutation is its own
/// inverse.
pub fn bit_reverse<T>(arr: &mut [T]) {
    let n = arr.len();
    if n < 2 { return; }
    let bits = n.trailing_zeros();
    for i in 0..n {
        let rev = reverse_index(i, bits);
        if rev > i { arr.swap(i, rev); }
    }
}

/// Apply the bit-reversal permutation independently along both axes of a
/// row-major `h × w` grid: every row is permuted with the length-`w`
/// permutation and every column with the length-`h` one.
///
/// Works for rectangular grids. *Panics if `arr.len() != w * h`*.
pub fn bit_reverse2<T>(arr: &mut [T], w: usize, h: usize)
where T: Send
{
    assert_eq!(arr.len(), w * h, "grid length does not match dimensions");
    if w == 0 || h == 0 { return; }
    arr.par_chunks_exact_mut(w).for_each(bit_reverse);
    if h < 2 { return; }
    // column permutation is a permutation of whole rows
    let bits = h.trailing_zeros();
    for i in 0..h {
        let rev = reverse_index(i, bits);
        if rev > i {
            let (top, bottom) = arr.split_at_mut(rev * w);
            top[i * w..(i + 1) * w].swap_with_slice(&mut bottom[..w]);
        }
    }
}

/// Transpose a square `n × n` row-major grid in place.
///
/// *Panics if `arr.len() != n * n`*.
pub fn square_transpose<T>(arr: &mut [T], n: usize) {
    assert_eq!(arr.len(), n * n, "grid length does not match dimensions");
    for i in 0..n {
        for j in i + 1..n {
            arr.swap(n * i + j, n * j + i);
        }
    }
}

/// Transpose a row-major `h × w` grid `src` into the row-major `w × h` grid
/// `dest`.
///
/// Each row of `dest` gathers one column of `src`, so rows are filled in
/// parallel. *Panics if either slice has length other than `w * h`*.
pub fn transpose_into<T>(dest: &mut [T], src: &[T], w: usize, h: usize)
where T: Copy + Send + Sync
{
    assert_eq!(src.len(), w * h, "source length does not match dimensions");
    assert_eq!(dest.len(), w * h, "destination length does not match dimensions");
    if w == 0 || h == 0 { return; }
    dest.par_chunks_exact_mut(h).enumerate()
        .for_each(|(j, col)| {
            col.iter_mut().enumerate()
                .for_each(|(i, d)| { *d = src[i * w + j]; });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_reverse_eight() {
        let mut a: Vec<usize> = (0..8).collect();
        bit_reverse(&mut a);
        assert_eq!(a, vec![0, 4, 2, 6, 1, 5, 3, 7]);
    }

    #[test]
    fn bit_reverse_is_involution() {
        for n in [1, 2, 4, 16, 64, 256] {
            let orig: Vec<usize> = (0..n).collect();
            let mut a = orig.clone();
            bit_reverse(&mut a);
            bit_reverse(&mut a);
            assert_eq!(a, orig);
        }
    }

    #[test]
    fn bit_reverse2_rectangular() {
        let (w, h) = (4, 2);
        let mut a: Vec<(usize, usize)> = (0..h)
            .flat_map(|i| (0..w).map(move |j| (i, j)))
            .collect();
        bit_reverse2(&mut a, w, h);
        // two rows keep their order; columns 1 and 2 swap
        let expected = vec![
            (0, 0), (0, 2), (0, 1), (0, 3),
            (1, 0), (1, 2), (1, 1), (1, 3),
        ];
        assert_eq!(a, expected);

        let (w, h) = (2, 8);
        let orig: Vec<usize> = (0..w * h).collect();
        let mut a = orig.clone();
        bit_reverse2(&mut a, w, h);
        assert_eq!(&a[2..4], &[8, 9]);
        assert_eq!(&a[6..8], &[12, 13]);
        bit_reverse2(&mut a, w, h);
        assert_eq!(a, orig);
    }

    #[test]
    fn bit_reverse2_matches_row_and_column_passes() {
        let n = 8;
        let mut a: Vec<usize> = (0..n * n).collect();
        let mut b = a.clone();
        bit_reverse2(&mut a, n, n);
        b.chunks_exact_mut(n).for_each(bit_reverse);
        square_transpose(&mut b, n);
        b.chunks_exact_mut(n).for_each(bit_reverse);
        square_transpose(&mut b, n);
        assert_eq!(a, b);
    }

    #[test]
    fn transposes() {
        let (w, h) = (4, 2);
        let src: Vec<usize> = (0..w * h).collect();
        let mut dest = vec![0; w * h];
        transpose_into(&mut dest, &src, w, h);
        assert_eq!(dest, vec![0, 4, 1, 5, 2, 6, 3, 7]);
        let mut back = vec![0; w * h];
        transpose_into(&mut back, &dest, h, w);
        assert_eq!(back, src);

        let mut sq: Vec<usize> = (0..9).collect();
        square_transpose(&mut sq, 3);
        assert_eq!(sq, vec![0, 3, 6, 1, 4, 7, 2, 5, 8]);
    }
}
