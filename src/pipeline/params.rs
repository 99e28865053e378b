//! Parameters of a full extraction.
//!
//! One immutable value carries the knobs of every stage; the extractor only
//! ever reads it. Every group deserializes with defaults, so a config file
//! may name just the fields it changes.

use crate::connectors::ConnectorOptions;
use crate::image::BinarizeOptions;
use crate::resolve::ResolveOptions;
use crate::shapes::ShapeOptions;
use crate::text::TextOptions;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorParams {
    /// Adaptive threshold producing the ink mask.
    pub binarize: BinarizeOptions,
    /// Contour area gate and classification tolerances.
    pub shapes: ShapeOptions,
    /// Line extraction, merging and arrow-head probing.
    pub connectors: ConnectorOptions,
    /// Endpoint snap distance and tie handling.
    pub resolve: ResolveOptions,
    pub text: TextOptions,
}

impl ExtractorParams {
    pub fn with_min_area(mut self, min_area: f32) -> Self {
        self.shapes.min_area = min_area;
        self
    }

    pub fn with_min_connector_length(mut self, min_length_px: f32) -> Self {
        self.connectors.min_connector_length_px = min_length_px;
        self
    }

    pub fn with_snap_distance(mut self, snap_distance_px: f32) -> Self {
        self.resolve.snap_distance_px = snap_distance_px;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_other_defaults() {
        let params: ExtractorParams =
            serde_json::from_str(r#"{"shapes": {"min_area": 50.0}, "resolve": {"snap_distance_px": 8.0}}"#)
                .expect("parse");
        assert_eq!(params.shapes.min_area, 50.0);
        assert_eq!(params.shapes.min_side_px, ShapeOptions::default().min_side_px);
        assert_eq!(params.resolve.snap_distance_px, 8.0);
        assert_eq!(
            params.connectors.min_connector_length_px,
            ConnectorOptions::default().min_connector_length_px
        );
    }
}
