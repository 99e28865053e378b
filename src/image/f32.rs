//! Owned float raster, row-major and tightly packed.
//!
//! Holds the grey levels and local means of the binarizer and the 0/1 ink
//! image the gradient pass runs on.
use super::traits::{ImageView, ImageViewMut};

#[derive(Clone, Debug)]
pub struct ImageF32 {
    pub w: usize,
    pub h: usize,
    /// Always equal to `w`.
    pub stride: usize,
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// All-zero buffer of `w × h` pixels.
    pub fn new(w: usize, h: usize) -> Self {
        Self::from_fn(w, h, |_, _| 0.0)
    }

    /// Buffer whose pixel `(x, y)` is `f(x, y)`, filled in raster order.
    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            data.extend((0..w).map(|x| f(x, y)));
        }
        Self {
            w,
            h,
            stride: w,
            data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.stride + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        self.data[y * self.stride + x] = v;
    }
}

impl ImageView for ImageF32 {
    type Pixel = f32;

    fn width(&self) -> usize {
        self.w
    }

    fn height(&self) -> usize {
        self.h
    }

    fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        &self.data[y * self.stride..][..self.w]
    }

    fn as_slice(&self) -> Option<&[f32]> {
        Some(&self.data)
    }
}

impl ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let w = self.w;
        &mut self.data[y * self.stride..][..w]
    }
}
