//! Image gradients feeding the connector extractor.
//!
//! The connector stage grows line regions from per-pixel gradient
//! orientation, so the only building block kept here is a 3×3 Sobel pass
//! producing `gx`, `gy` and magnitude. Borders clamp (replicate).

pub mod grad;

pub use grad::{sobel_gradients, Grad};
