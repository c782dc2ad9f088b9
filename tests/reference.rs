//! Cross-checks against `rustfft`.
//!
//! The forward transform here uses the `exp(+2πi jk/n)` kernel, which is the
//! unnormalized inverse in `rustfft`'s convention; the inverse here matches
//! `rustfft`'s forward transform scaled by `1/n`.

use approx::assert_abs_diff_eq;
use ndarray as nd;
use num_complex::Complex64 as C64;
use rustfft::{ Fft, FftPlanner };
use split2d::fft::{ self, FftEngine };

fn signal(n: usize) -> Vec<C64> {
    (0..n)
        .map(|k| {
            let x = k as f64;
            C64::new((0.3 * x).sin() + 0.1 * x, (1.7 * x).cos() - 0.05 * x * x / n as f64)
        })
        .collect()
}

fn grid(h: usize, w: usize) -> nd::Array2<C64> {
    nd::Array2::from_shape_fn((h, w), |(i, j)| {
        let (x, y) = (j as f64, i as f64);
        C64::new((0.7 * x + 0.2 * y).cos() + 0.01 * x * y, (0.4 * y - 1.1 * x).sin())
    })
}

fn assert_close(a: &[C64], b: &[C64], eps: f64) {
    assert_eq!(a.len(), b.len());
    for (ak, bk) in a.iter().zip(b) {
        assert_abs_diff_eq!(ak.re, bk.re, epsilon = eps);
        assert_abs_diff_eq!(ak.im, bk.im, epsilon = eps);
    }
}

// apply a rustfft plan along both axes of a standard-layout grid
fn rustfft2(q: &nd::Array2<C64>, inverse: bool) -> nd::Array2<C64> {
    let (h, w) = q.dim();
    let mut planner = FftPlanner::<f64>::new();
    let (plan_w, plan_h)
        = if inverse {
            (planner.plan_fft_inverse(w), planner.plan_fft_inverse(h))
        } else {
            (planner.plan_fft_forward(w), planner.plan_fft_forward(h))
        };
    let mut out = q.clone();
    for mut row in out.rows_mut() {
        let mut buf: Vec<C64> = row.to_vec();
        plan_w.process(&mut buf);
        row.assign(&nd::Array1::from(buf));
    }
    for mut col in out.columns_mut() {
        let mut buf: Vec<C64> = col.to_vec();
        plan_h.process(&mut buf);
        col.assign(&nd::Array1::from(buf));
    }
    out
}

#[test]
fn matches_rustfft_1d() {
    let mut planner = FftPlanner::<f64>::new();
    for n in [1, 2, 4, 8, 16, 64, 256, 1024] {
        let x = signal(n);

        let ours = fft::fft(&x).unwrap();
        let mut theirs = x.clone();
        planner.plan_fft_inverse(n).process(&mut theirs);
        assert_close(&ours, &theirs, 1e-9 * n as f64);

        let mut ours = x.clone();
        fft::ifft_inplace(&mut ours).unwrap();
        let mut theirs = x.clone();
        planner.plan_fft_forward(n).process(&mut theirs);
        theirs.iter_mut().for_each(|z| { *z /= n as f64; });
        assert_close(&ours, &theirs, 1e-10);
        assert_close(&fft::ifft(&fft::fft(&x).unwrap()).unwrap(), &x, 1e-9);
    }
}

#[test]
fn matches_rustfft_2d() {
    for (h, w) in [(8, 8), (64, 64), (16, 4), (4, 32), (1, 16), (128, 2)] {
        let q = grid(h, w);

        let ours = fft::fft2(&q).unwrap();
        let theirs = rustfft2(&q, true);
        let tol = 1e-9 * (w * h) as f64;
        assert_close(ours.as_slice().unwrap(), theirs.as_slice().unwrap(), tol);

        let ours = fft::ifft2(&q).unwrap();
        let theirs = rustfft2(&q, false).mapv(|z| z / (w * h) as f64);
        assert_close(ours.as_slice().unwrap(), theirs.as_slice().unwrap(), 1e-10);
    }
}

#[test]
fn round_trip_through_engine() {
    let engine = FftEngine::new();
    let q0 = grid(32, 64);
    let mut q = q0.clone();
    engine.fft2_inplace(&mut q).unwrap();
    engine.ifft2_inplace(&mut q).unwrap();
    assert_close(q.as_slice().unwrap(), q0.as_slice().unwrap(), 1e-10);
    assert_eq!(engine.cached_lengths(), vec![32, 64]);
}

#[test]
fn impulse_transforms_to_constant() {
    let mut q: nd::Array2<C64> = nd::Array2::zeros((16, 32));
    q[[0, 0]] = C64::new(1.0, 0.0);
    fft::forward_fft2(&mut q).unwrap();
    let ones = vec![C64::new(1.0, 0.0); 16 * 32];
    assert_close(q.as_slice().unwrap(), &ones, 1e-12);
}
