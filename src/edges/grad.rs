//! 3×3 Sobel derivatives of the ink image.
//!
//! On a 0/1 ink image a straight stroke of width `w` produces two parallel
//! ridges of magnitude 4 with opposite gradient directions; the connector
//! extractor folds orientation into `[0, π)` so both ridges grow into the same
//! line support. Borders replicate.
use crate::image::{ImageF32, ImageView, ImageViewMut};

/// Per-pixel derivatives and their magnitude.
#[derive(Clone, Debug)]
pub struct Grad {
    pub gx: ImageF32,
    pub gy: ImageF32,
    pub mag: ImageF32,
}

impl Grad {
    /// Gradient orientation `atan2(gy, gx)` at a pixel.
    #[inline]
    pub fn angle(&self, x: usize, y: usize) -> f32 {
        self.gy.get(x, y).atan2(self.gx.get(x, y))
    }
}

/// Sobel pass over `src`.
pub fn sobel_gradients(src: &ImageF32) -> Grad {
    let (w, h) = (src.w, src.h);
    let mut gx = ImageF32::new(w, h);
    let mut gy = ImageF32::new(w, h);
    let mut mag = ImageF32::new(w, h);
    if w == 0 || h == 0 {
        return Grad { gx, gy, mag };
    }

    for y in 0..h {
        let up = src.row(y.saturating_sub(1));
        let mid = src.row(y);
        let down = src.row((y + 1).min(h - 1));
        let (row_gx, row_gy, row_mag) = (gx.row_mut(y), gy.row_mut(y), mag.row_mut(y));
        for x in 0..w {
            let l = x.saturating_sub(1);
            let r = (x + 1).min(w - 1);
            // [1 2 1] smoothing across the derivative direction.
            let dx = (up[r] - up[l]) + 2.0 * (mid[r] - mid[l]) + (down[r] - down[l]);
            let dy = (down[l] - up[l]) + 2.0 * (down[x] - up[x]) + (down[r] - up[r]);
            row_gx[x] = dx;
            row_gy[x] = dy;
            row_mag[x] = dx.hypot(dy);
        }
    }
    Grad { gx, gy, mag }
}
