//! Text association: OCR regions → shape text and connector labels.
//!
//! A region belongs to the shape whose bounding box contains the region's
//! centroid. Nested boxes resolve to the smallest box, then the lower id.
//! Regions outside every shape go to the connector whose polyline passes
//! nearest, within `connector_proximity_px` (ties resolve to the lower
//! connector index). Anything else is left unassigned and only counted.
//!
//! Several regions on one target are joined with single spaces in raster
//! order of their boxes. Blank strings are ignored. OCR confidence is carried
//! through untouched and never filtered on.
//!
//! Labels: a connector leaving a diamond gets the canonical branch label when
//! its text matches the branch vocabulary, and no label otherwise. Other
//! connectors carry their trimmed text as label when
//! `label_plain_connectors` is set.

mod vocabulary;

pub use vocabulary::{classify_branch, BranchLabel};

use crate::geometry::{point_polyline_distance, raster_cmp, BoundingBox};
use crate::resolve::Connector;
use crate::shapes::{Shape, ShapeKind};
use log::debug;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Recognized text with its location, as handed over by an OCR engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRegion {
    pub bounding_box: BoundingBox,
    pub text: String,
    /// Informational only.
    #[serde(default)]
    pub confidence: f32,
}

impl TextRegion {
    pub fn new(bounding_box: BoundingBox, text: impl Into<String>, confidence: f32) -> Self {
        Self {
            bounding_box,
            text: text.into(),
            confidence,
        }
    }

    pub fn centroid(&self) -> [f32; 2] {
        self.bounding_box.center()
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    /// Max distance from a region centroid to a connector polyline.
    pub connector_proximity_px: f32,
    /// Use the text of connectors not leaving a diamond as their label.
    pub label_plain_connectors: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            connector_proximity_px: 20.0,
            label_plain_connectors: true,
        }
    }
}

/// Where one text region went.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextTarget {
    Shape(usize),
    Connector(usize),
    Unassigned,
}

/// Shapes and connectors with text and labels filled in.
#[derive(Clone, Debug, Default)]
pub struct Association {
    pub shapes: Vec<Shape>,
    pub connectors: Vec<Connector>,
    /// Non-blank regions that matched nothing.
    pub unassigned: usize,
}

/// Decide the target of a single region.
pub fn assign_region(
    region: &TextRegion,
    shapes: &[Shape],
    connectors: &[Connector],
    options: &TextOptions,
) -> TextTarget {
    let c = region.centroid();
    let container = shapes
        .iter()
        .enumerate()
        .filter(|(_, s)| s.bounding_box.contains(c))
        .min_by(|(_, a), (_, b)| {
            a.bounding_box
                .area()
                .total_cmp(&b.bounding_box.area())
                .then(a.id.cmp(&b.id))
        });
    if let Some((idx, _)) = container {
        return TextTarget::Shape(idx);
    }

    connectors
        .iter()
        .enumerate()
        .map(|(idx, conn)| (idx, point_polyline_distance(c, &conn.points)))
        .filter(|&(_, d)| d <= options.connector_proximity_px)
        .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
        .map_or(TextTarget::Unassigned, |(idx, _)| TextTarget::Connector(idx))
}

fn assign_all(
    regions: &[&TextRegion],
    shapes: &[Shape],
    connectors: &[Connector],
    options: &TextOptions,
) -> Vec<TextTarget> {
    #[cfg(feature = "parallel")]
    {
        regions
            .par_iter()
            .map(|r| assign_region(r, shapes, connectors, options))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        regions
            .iter()
            .map(|r| assign_region(r, shapes, connectors, options))
            .collect()
    }
}

/// Attach `regions` to `shapes` and `connectors`.
pub fn associate(
    mut shapes: Vec<Shape>,
    mut connectors: Vec<Connector>,
    regions: &[TextRegion],
    options: &TextOptions,
) -> Association {
    let mut ordered: Vec<&TextRegion> = regions.iter().filter(|r| !r.text.trim().is_empty()).collect();
    ordered.sort_by(|a, b| region_order(a, b));

    let targets = assign_all(&ordered, &shapes, &connectors, options);

    let mut shape_text: Vec<Vec<&str>> = vec![Vec::new(); shapes.len()];
    let mut conn_text: Vec<Vec<&str>> = vec![Vec::new(); connectors.len()];
    let mut unassigned = 0usize;
    for (region, target) in ordered.iter().zip(&targets) {
        match *target {
            TextTarget::Shape(i) => shape_text[i].push(region.text.trim()),
            TextTarget::Connector(i) => conn_text[i].push(region.text.trim()),
            TextTarget::Unassigned => unassigned += 1,
        }
    }

    for (shape, parts) in shapes.iter_mut().zip(&shape_text) {
        if !parts.is_empty() {
            shape.text = Some(parts.join(" "));
        }
    }
    for (conn, parts) in connectors.iter_mut().zip(&conn_text) {
        if !parts.is_empty() {
            conn.text = Some(parts.join(" "));
        }
    }
    for conn in connectors.iter_mut() {
        conn.label = connector_label(conn, &shapes, options);
    }

    debug!(
        "associate regions={} shapes_with_text={} connectors_with_text={} unassigned={}",
        ordered.len(),
        shapes.iter().filter(|s| s.text.is_some()).count(),
        connectors.iter().filter(|c| c.text.is_some()).count(),
        unassigned
    );
    Association {
        shapes,
        connectors,
        unassigned,
    }
}

fn connector_label(conn: &Connector, shapes: &[Shape], options: &TextOptions) -> Option<String> {
    let text = conn.text.as_deref()?;
    let from_decision = conn
        .source
        .and_then(|id| shapes.iter().find(|s| s.id == id))
        .is_some_and(|s| s.kind == ShapeKind::Diamond);
    if from_decision {
        classify_branch(text).map(|b| b.as_str().to_string())
    } else if options.label_plain_connectors {
        Some(text.trim().to_string())
    } else {
        None
    }
}

fn region_order(a: &TextRegion, b: &TextRegion) -> Ordering {
    let pa = [a.bounding_box.x0, a.bounding_box.y0];
    let pb = [b.bounding_box.x0, b.bounding_box.y0];
    raster_cmp(pa, pb).then_with(|| a.text.cmp(&b.text))
}
