use serde::{Deserialize, Serialize};

/// Thresholds of the shape detector.
///
/// - `min_area`: contours with a smaller enclosed area are noise (glyph holes,
///   speckles) and never become shapes.
/// - `approx_epsilon_ratio`: Douglas–Peucker tolerance as a fraction of the
///   contour perimeter.
/// - The angular tolerances are in degrees against the image axes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeOptions {
    /// Minimum enclosed contour area (px²).
    pub min_area: f32,
    /// Minimum width and height of the stroke-inclusive bounding box (px).
    pub min_side_px: f32,
    pub approx_epsilon_ratio: f32,
    /// Maximum edge deviation from the axes for rectangles.
    pub axis_tolerance_deg: f32,
    /// Maximum edge deviation from 45° for diamonds.
    pub diagonal_tolerance_deg: f32,
    /// Minimum ratio between opposite sides of a quadrilateral.
    pub min_side_ratio: f32,
    /// Vertex count from which a convex outline is treated as curved.
    pub curve_min_vertices: usize,
    /// Mean deviation of the normalized radius from 1 accepted for ellipses.
    pub ellipse_tolerance: f32,
    /// Upper bound on area / bounding-box area for ellipses (π/4 ideal).
    pub ellipse_max_fill: f32,
    /// Minimum long/short side ratio of a terminator.
    pub terminator_min_elongation: f32,
    /// Minimum length of a terminator's straight side relative to its long side.
    pub straight_side_ratio: f32,
    /// Cap on the stroke thickness added around the inner contour (px).
    pub max_stroke_px: usize,
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self {
            min_area: 300.0,
            min_side_px: 15.0,
            approx_epsilon_ratio: 0.02,
            axis_tolerance_deg: 15.0,
            diagonal_tolerance_deg: 15.0,
            min_side_ratio: 0.6,
            curve_min_vertices: 6,
            ellipse_tolerance: 0.08,
            ellipse_max_fill: 0.85,
            terminator_min_elongation: 1.3,
            straight_side_ratio: 0.25,
            max_stroke_px: 12,
        }
    }
}

impl ShapeOptions {
    pub fn with_min_area(mut self, min_area: f32) -> Self {
        self.min_area = min_area;
        self
    }
}
