//! Raster buffers used by the pipeline.
//!
//! - [`ImageU8`]: borrowed 8-bit grayscale input (the caller's raster).
//! - [`ImageF32`]: owned float buffer for gradients and local means.
//! - [`InkMask`]: binary image of drawn strokes produced by the adaptive
//!   threshold; both detectors read it.
//! - [`io`]: loading images and writing JSON/text artifacts.

pub mod binarize;
pub mod f32;
pub mod io;
pub mod traits;
pub mod u8;

pub use self::binarize::{BinarizeOptions, InkMask};
pub use self::f32::ImageF32;
pub use self::traits::{ImageView, ImageViewMut};
pub use self::u8::ImageU8;
