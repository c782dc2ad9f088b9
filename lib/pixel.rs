//! Conversion between complex grids and four-channel float pixels, for
//! handing wavefunctions to a texture-based display layer.
//!
//! The real and imaginary parts occupy the red and green channels; blue is
//! zero and alpha is one. The transforms themselves only ever see [`C64`].

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::Arr2;

/// An RGBA pixel with `f32` channels.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[repr(C)]
pub struct RgbaPixel(pub [f32; 4]);

impl RgbaPixel {
    /// Red channel, holding the real part.
    pub fn re(&self) -> f32 { self.0[0] }

    /// Green channel, holding the imaginary part.
    pub fn im(&self) -> f32 { self.0[1] }
}

impl From<C64> for RgbaPixel {
    fn from(z: C64) -> Self {
        Self([z.re as f32, z.im as f32, 0.0, 1.0])
    }
}

impl From<RgbaPixel> for C64 {
    fn from(p: RgbaPixel) -> Self {
        C64::new(f64::from(p.re()), f64::from(p.im()))
    }
}

/// Convert a complex grid to pixels.
pub fn to_pixels<S>(q: &Arr2<S>) -> nd::Array2<RgbaPixel>
where S: nd::Data<Elem = C64>
{
    q.mapv(RgbaPixel::from)
}

/// Convert pixels back to a complex grid. Blue and alpha are discarded.
pub fn from_pixels<S>(p: &Arr2<S>) -> nd::Array2<C64>
where S: nd::Data<Elem = RgbaPixel>
{
    p.mapv(C64::from)
}
