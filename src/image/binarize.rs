//! Adaptive binarization of the input raster into an ink mask.
//!
//! A pixel is ink when it is darker than its Gaussian-weighted neighbourhood
//! mean by more than `offset` grey levels. The local mean is computed with a
//! separable Gaussian of `block_size` taps (sigma derived from the block size
//! the same way common adaptive-threshold implementations do), borders
//! replicate.
//!
//! Working on a local mean keeps the threshold stable under uneven lighting
//! of scanned or photographed sheets. A perfectly uniform image yields no ink.
use super::{ImageF32, ImageU8, ImageView, ImageViewMut};
use serde::{Deserialize, Serialize};

/// Parameters of the adaptive threshold.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BinarizeOptions {
    /// Odd window size of the local mean (pixels).
    pub block_size: usize,
    /// Grey levels a pixel must sit below the local mean to count as ink.
    pub offset: f32,
}

impl Default for BinarizeOptions {
    fn default() -> Self {
        Self {
            block_size: 41,
            offset: 5.0,
        }
    }
}

/// Binary image of drawn strokes, one byte per pixel (1 = ink).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InkMask {
    w: usize,
    h: usize,
    data: Vec<u8>,
}

impl InkMask {
    /// Wrap an existing 0/1 buffer. Any non-zero byte counts as ink.
    pub fn from_raw(w: usize, h: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), w * h, "mask buffer must be w*h bytes");
        Self { w, h, data }
    }

    /// Threshold a grayscale view against its local Gaussian mean.
    pub fn from_gray(gray: &ImageU8<'_>, options: &BinarizeOptions) -> Self {
        let (w, h) = (gray.w, gray.h);
        let levels = ImageF32::from_fn(w, h, |x, y| gray.get(x, y) as f32);
        let taps = gaussian_taps(options.block_size);
        let mean = separable_blur(&levels, &taps);

        let mut data = vec![0u8; w * h];
        for y in 0..h {
            let src = levels.row(y);
            let local = mean.row(y);
            let out = &mut data[y * w..(y + 1) * w];
            for x in 0..w {
                if src[x] < local[x] - options.offset {
                    out[x] = 1;
                }
            }
        }
        Self { w, h, data }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }

    #[inline]
    pub fn is_ink(&self, x: usize, y: usize) -> bool {
        self.data[y * self.w + x] != 0
    }

    /// Bounds-checked variant taking signed coordinates; outside is background.
    #[inline]
    pub fn is_ink_at(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 || x >= self.w as isize || y >= self.h as isize {
            return false;
        }
        self.is_ink(x as usize, y as usize)
    }

    /// Ink lookup at a continuous position (pixel `(x, y)` covers
    /// `[x, x + 1) × [y, y + 1)`).
    #[inline]
    pub fn is_ink_point(&self, p: [f32; 2]) -> bool {
        self.is_ink_at(p[0].floor() as isize, p[1].floor() as isize)
    }

    pub fn ink_count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Ink rendered as a float image (ink = 1.0) for gradient computation.
    pub fn to_f32(&self) -> ImageF32 {
        ImageF32::from_fn(self.w, self.h, |x, y| if self.is_ink(x, y) { 1.0 } else { 0.0 })
    }
}

fn gaussian_taps(block_size: usize) -> Vec<f32> {
    let size = (block_size.max(3)) | 1;
    let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let radius = (size / 2) as isize;
    let mut taps: Vec<f32> = (-radius..=radius)
        .map(|i| {
            let d = i as f32;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = taps.iter().sum();
    for t in taps.iter_mut() {
        *t /= sum;
    }
    taps
}

fn separable_blur(src: &ImageF32, taps: &[f32]) -> ImageF32 {
    let (w, h) = (src.w, src.h);
    let radius = (taps.len() / 2) as isize;
    let mut horiz = ImageF32::new(w, h);
    if w == 0 || h == 0 {
        return horiz;
    }
    let max_x = w as isize - 1;
    let max_y = h as isize - 1;

    for y in 0..h {
        let row = src.row(y);
        let out = horiz.row_mut(y);
        for (x, dst) in out.iter_mut().enumerate() {
            let mut acc = 0.0;
            for (k, &t) in taps.iter().enumerate() {
                let sx = (x as isize + k as isize - radius).clamp(0, max_x) as usize;
                acc += row[sx] * t;
            }
            *dst = acc;
        }
    }

    let mut out = ImageF32::new(w, h);
    for y in 0..h {
        let dst = out.row_mut(y);
        for (k, &t) in taps.iter().enumerate() {
            let sy = (y as isize + k as isize - radius).clamp(0, max_y) as usize;
            let row = horiz.row(sy);
            for (d, &s) in dst.iter_mut().zip(row) {
                *d += s * t;
            }
        }
    }
    out
}
