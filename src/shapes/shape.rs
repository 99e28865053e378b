use crate::geometry::{point_in_polygon, point_polygon_boundary_distance, BoundingBox};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable node identifier, assigned in raster order of detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(pub u32);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Flowchart primitive a closed contour was classified as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Process box.
    Rectangle,
    /// Decision node.
    Diamond,
    Ellipse,
    /// Start/end node: rectangle with semicircular caps.
    Terminator,
    Unknown,
}

impl ShapeKind {
    pub fn is_decision(self) -> bool {
        matches!(self, ShapeKind::Diamond)
    }
}

/// A node candidate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub id: ShapeId,
    pub kind: ShapeKind,
    /// Box around the drawn outline, stroke included.
    pub bounding_box: BoundingBox,
    pub centroid: [f32; 2],
    /// Area enclosed by the contour (px²).
    pub area: f32,
    pub text: Option<String>,
    /// Simplified inner outline used for boundary distances.
    #[serde(skip)]
    pub outline: Vec<[f32; 2]>,
}

impl Shape {
    /// Distance from `p` to the shape boundary, 0 for points inside.
    ///
    /// Shapes without an outline (e.g. read back from an export) fall back to
    /// their bounding box.
    pub fn boundary_distance(&self, p: [f32; 2]) -> f32 {
        if self.outline.len() >= 3 {
            if point_in_polygon(p, &self.outline) {
                0.0
            } else {
                point_polygon_boundary_distance(p, &self.outline)
            }
        } else {
            self.bounding_box.distance_to(p)
        }
    }
}
