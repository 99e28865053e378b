use crate::error::{ExtractError, Result};

/// Borrowed 8-bit grayscale raster. The caller owns the pixels; every stage
/// of the pipeline only reads them.
#[derive(Clone, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    /// Tightly packed view (`stride == w`).
    pub fn new(w: usize, h: usize, data: &'a [u8]) -> Self {
        Self {
            w,
            h,
            stride: w,
            data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }

    /// Check that the view is non-empty and that `data` covers every row.
    pub fn validate(&self) -> Result<()> {
        if self.w == 0 || self.h == 0 {
            return Err(ExtractError::EmptyImage {
                width: self.w,
                height: self.h,
            });
        }
        if self.stride < self.w {
            return Err(ExtractError::InvalidImage(format!(
                "stride {} is smaller than width {}",
                self.stride, self.w
            )));
        }
        let required = (self.h - 1) * self.stride + self.w;
        if self.data.len() < required {
            return Err(ExtractError::InvalidImage(format!(
                "buffer holds {} bytes, {}x{} with stride {} needs {}",
                self.data.len(),
                self.w,
                self.h,
                self.stride,
                required
            )));
        }
        Ok(())
    }
}

impl<'a> crate::image::traits::ImageView for ImageU8<'a> {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        (self.stride == self.w).then_some(&self.data[..self.w * self.h])
    }
}
