//! Miscellaneous tools for preparing and inspecting wavefunction grids.

use std::f64::consts::TAU;
use ndarray as nd;
use num_complex::Complex64 as C64;
use serde::{ Deserialize, Serialize };
use crate::{
    Arr2,
    error::SpecError,
    operators::Specs,
};

/// Calculate the discrete norm `Σ |ψ|²` of a wavefunction grid.
pub fn wf_norm<S>(q: &Arr2<S>) -> f64
where S: nd::Data<Elem = C64>
{
    q.iter().map(|qk| qk.norm_sqr()).sum()
}

/// Renormalize a wavefunction in place so that [`wf_norm`] is 1.
///
/// Returns the norm prior to renormalization. Grids with zero norm are left
/// untouched.
pub fn wf_renormalize<S>(q: &mut Arr2<S>) -> f64
where S: nd::DataMut<Elem = C64>
{
    let norm = wf_norm(q);
    if norm > 0.0 {
        let scale = norm.sqrt().recip();
        q.par_map_inplace(|qk| { *qk *= scale; });
    }
    norm
}

/// Return a normalized copy of a wavefunction.
pub fn wf_normalized<S>(q: &Arr2<S>) -> nd::Array2<C64>
where S: nd::Data<Elem = C64>
{
    let mut new = q.to_owned();
    wf_renormalize(&mut new);
    new
}

/// Compute `|ψ|²` for every cell.
pub fn probability_density<S>(q: &Arr2<S>) -> nd::Array2<f64>
where S: nd::Data<Elem = C64>
{
    q.map(|qk| qk.norm_sqr())
}

fn def_center() -> (f64, f64) { (0.5, 0.25) }
fn def_momentum() -> (f64, f64) { (0.0, 25.0) }
fn def_width() -> (f64, f64) { (0.05, 0.05) }
fn def_amplitude() -> f64 { 1.0 }

/// A Gaussian wave packet in fractional grid coordinates.
///
/// Sampled at `x = j/w`, `y = i/h` as
/// ```text
/// amp · exp(-((x - bx)/sx)²/2 - ((y - by)/sy)²/2) · exp(2πi (px x + py y))
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WavePacket {
    /// Centre `(bx, by)`.
    #[serde(default = "def_center")]
    pub center: (f64, f64),
    /// Wave numbers `(px, py)` in cycles per domain.
    #[serde(default = "def_momentum")]
    pub momentum: (f64, f64),
    /// Widths `(sx, sy)`.
    #[serde(default = "def_width")]
    pub width: (f64, f64),
    /// Peak amplitude.
    #[serde(default = "def_amplitude")]
    pub amplitude: f64,
}

impl Default for WavePacket {
    fn default() -> Self {
        Self {
            center: def_center(),
            momentum: def_momentum(),
            width: def_width(),
            amplitude: def_amplitude(),
        }
    }
}

/// Sample a wave packet onto the grid described by `specs`.
pub fn gaussian_packet(specs: &Specs, packet: &WavePacket)
    -> Result<nd::Array2<C64>, SpecError>
{
    let (sx, sy) = packet.width;
    SpecError::check_width(sx, sy)?;
    let (bx, by) = packet.center;
    let (px, py) = packet.momentum;
    let (h, w) = specs.dim();
    let mut q: nd::Array2<C64> = nd::Array2::zeros((h, w));
    nd::Zip::indexed(&mut q)
        .par_for_each(|(i, j), qk| {
            let x = j as f64 / w as f64;
            let y = i as f64 / h as f64;
            let env = (
                -0.5 * ((x - bx) / sx).powi(2) - 0.5 * ((y - by) / sy).powi(2)
            ).exp();
            *qk = packet.amplitude * env * C64::cis(TAU * (px * x + py * y));
        });
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn packet_peak_and_phase() {
        let specs = Specs::new(64, 32, 1.0, 1.0, 1e-4, 1.0).unwrap();
        let packet = WavePacket {
            center: (0.5, 0.25),
            momentum: (2.0, 0.0),
            width: (0.1, 0.1),
            amplitude: 3.0,
        };
        let q = gaussian_packet(&specs, &packet).unwrap();
        // (i, j) = (8, 32) is the centre
        assert_abs_diff_eq!(q[[8, 32]].norm(), 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(q[[8, 32]].arg().abs(), 0.0, epsilon = 1e-12);
        assert!(q[[8, 0]].norm() < 1e-4);
        let d = probability_density(&q);
        assert_abs_diff_eq!(d[[8, 32]], 9.0, epsilon = 1e-10);
    }

    #[test]
    fn packet_rejects_bad_width() {
        let specs = Specs::new(8, 8, 1.0, 1.0, 1e-4, 1.0).unwrap();
        let packet = WavePacket { width: (0.0, 0.1), ..Default::default() };
        assert!(matches!(
            gaussian_packet(&specs, &packet),
            Err(SpecError::BadWidth(..))
        ));
    }

    #[test]
    fn renormalization() {
        let specs = Specs::new(32, 32, 1.0, 1.0, 1e-4, 1.0).unwrap();
        let q = gaussian_packet(&specs, &WavePacket::default()).unwrap();
        let qn = wf_normalized(&q);
        assert_abs_diff_eq!(wf_norm(&qn), 1.0, epsilon = 1e-12);

        let mut z: nd::Array2<C64> = nd::Array2::zeros((4, 4));
        assert_eq!(wf_renormalize(&mut z), 0.0);
        assert!(z.iter().all(|zk| *zk == C64::new(0.0, 0.0)));
    }
}
