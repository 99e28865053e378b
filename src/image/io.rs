//! I/O helpers for grayscale images, JSON and text artifacts.
//!
//! - `load_grayscale_image`: read a PNG/JPEG into an owned 8-bit gray buffer.
//! - `save_ink_mask`: write a binarized mask as a black-on-white PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
//! - `read_json_file`: deserialize a JSON document from disk.
//! - `write_text_file`: write a text export (e.g. Mermaid) to disk.
use super::{ImageU8, InkMask};
use crate::error::{ExtractError, Result};
use image::{GrayImage, Luma};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned 8-bit grayscale buffer with borrowed view conversion.
#[derive(Clone, Debug)]
pub struct GrayImageU8 {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayImageU8 {
    /// Construct an owned grayscale buffer given tightly packed raw bytes.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Borrow as a read-only `ImageU8` view
    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8::new(self.width, self.height, &self.data)
    }
}

/// Load an image from disk and convert to 8-bit grayscale.
pub fn load_grayscale_image(path: &Path) -> Result<GrayImageU8> {
    let img = image::open(path)
        .map_err(|source| ExtractError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .into_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    if width == 0 || height == 0 {
        return Err(ExtractError::EmptyImage { width, height });
    }
    Ok(GrayImageU8::new(width, height, img.into_raw()))
}

/// Save an ink mask as a PNG (ink black, background white).
pub fn save_ink_mask(mask: &InkMask, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(mask.width() as u32, mask.height() as u32);
    for y in 0..mask.height() {
        for x in 0..mask.width() {
            let v = if mask.is_ink(x, y) { 0u8 } else { 255u8 };
            out.put_pixel(x as u32, y as u32, Luma([v]));
        }
    }
    out.save(path).map_err(|source| ExtractError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|e| ExtractError::io(path, e))
}

pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;
    Ok(serde_json::from_str(&data)?)
}

/// Write UTF-8 text to `path`, creating parent directories.
pub fn write_text_file(path: &Path, contents: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, contents).map_err(|e| ExtractError::io(path, e))
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| ExtractError::io(parent, e))?;
        }
    }
    Ok(())
}
