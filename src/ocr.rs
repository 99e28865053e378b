//! OCR boundary.
//!
//! The engine consumes recognized text as finished values; the recognizer
//! itself lives outside the crate. [`PrecomputedText`] serves regions that
//! were recognized ahead of time (e.g. loaded from a JSON file next to the
//! image).
use crate::error::{ExtractError, Result};
use crate::geometry::BoundingBox;
use crate::image::io::read_json_file;
use crate::image::ImageU8;
use crate::text::TextRegion;
use std::path::Path;

pub trait TextRecognizer {
    /// Recognize text inside `region` of `image`. Returned boxes are in full
    /// image coordinates.
    fn recognize_text(&self, image: &ImageU8<'_>, region: &BoundingBox) -> Result<Vec<TextRegion>>;
}

/// Run `recognizer` once over the whole image.
pub fn recognize_page<R: TextRecognizer + ?Sized>(recognizer: &R, image: &ImageU8<'_>) -> Result<Vec<TextRegion>> {
    image.validate()?;
    let page = BoundingBox::new(0.0, 0.0, image.w as f32, image.h as f32);
    recognizer.recognize_text(image, &page)
}

/// Regions recognized beforehand.
#[derive(Clone, Debug, Default)]
pub struct PrecomputedText {
    regions: Vec<TextRegion>,
}

impl PrecomputedText {
    pub fn new(regions: Vec<TextRegion>) -> Self {
        Self { regions }
    }

    /// Load a JSON array of regions.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        Ok(Self::new(read_json_file(path)?))
    }

    pub fn regions(&self) -> &[TextRegion] {
        &self.regions
    }
}

impl TextRecognizer for PrecomputedText {
    /// Regions whose centroid falls inside `region`, in stored order.
    fn recognize_text(&self, image: &ImageU8<'_>, region: &BoundingBox) -> Result<Vec<TextRegion>> {
        let bounds = BoundingBox::new(0.0, 0.0, image.w as f32, image.h as f32);
        if let Some(outside) = self.regions.iter().find(|r| bounds.distance_to(r.centroid()) > 0.0) {
            return Err(ExtractError::Ocr(format!(
                "region {:?} lies outside the {}x{} image",
                outside.text, image.w, image.h
            )));
        }
        Ok(self
            .regions
            .iter()
            .filter(|r| region.contains(r.centroid()))
            .cloned()
            .collect())
    }
}
