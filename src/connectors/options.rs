use serde::{Deserialize, Serialize};

/// Options of the connector detector.
///
/// - Line extraction runs on the ink mask rendered as a 0/1 float image, so
///   `magnitude_threshold` is in Sobel units of a unit step (max 4).
/// - `shape_margin_px` widens each shape's box before it is masked out; it
///   must cover the 3x3 Sobel support around the outline.
/// - Merge and join tolerances are in pixels / degrees of the input image.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorOptions {
    pub shape_margin_px: f32,
    /// Minimum gradient magnitude for seeds and grown pixels.
    pub magnitude_threshold: f32,
    /// Orientation tolerance around the seed normal in degrees.
    pub angle_tolerance_deg: f32,
    /// Minimum pixel count of a grown region.
    pub min_region_px: usize,
    /// Minimum length of a raw fitted segment.
    pub min_segment_px: f32,
    pub min_aligned_fraction: f32,
    /// Widest stroke whose two edge responses fuse into one centreline.
    pub max_stroke_width_px: f32,
    /// Max angle between segments merged into one connector.
    pub merge_angle_tol_deg: f32,
    /// Max perpendicular offset between merged segments.
    pub merge_offset_px: f32,
    /// Max gap bridged between collinear segments.
    pub gap_tolerance_px: f32,
    /// Length of the window inspected behind an endpoint for an arrow head.
    pub head_probe_px: f32,
    /// On thick strokes the head window grows to this many stroke widths.
    pub head_width_factor: f32,
    /// Off-axis ink pixels required on each side of the axis.
    pub head_min_pixels: usize,
    /// Max distance between two connector ends joined at a corner.
    pub join_radius_px: f32,
    /// Connectors shorter than this are noise.
    pub min_connector_length_px: f32,
}

impl Default for ConnectorOptions {
    fn default() -> Self {
        Self {
            shape_margin_px: 2.0,
            magnitude_threshold: 1.0,
            angle_tolerance_deg: 22.5,
            min_region_px: 12,
            min_segment_px: 4.0,
            min_aligned_fraction: 0.6,
            max_stroke_width_px: 12.0,
            merge_angle_tol_deg: 10.0,
            merge_offset_px: 4.0,
            gap_tolerance_px: 8.0,
            head_probe_px: 14.0,
            head_width_factor: 3.0,
            head_min_pixels: 6,
            join_radius_px: 8.0,
            min_connector_length_px: 20.0,
        }
    }
}

impl ConnectorOptions {
    pub fn with_min_length(mut self, min_connector_length_px: f32) -> Self {
        self.min_connector_length_px = min_connector_length_px;
        self
    }

    /// Arrow-head window for a stroke of the given width.
    pub fn head_window(&self, stroke_width: f32) -> f32 {
        self.head_probe_px.max(self.head_width_factor * stroke_width).max(1.0)
    }
}
