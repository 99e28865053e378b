//! Connector detection: open strokes between shapes, with arrow heads.
//!
//! Works on the ink mask with every shape hidden behind its bounding box
//! (plus `shape_margin_px`), so outline strokes never turn into connectors.
//! The stages are:
//!
//! - Line extraction: region growing on gradient orientation over the ink
//!   image with a PCA fit per region (`extractor`).
//! - Stroke centrelines: the two flank responses of a stroke wider than
//!   about 2 px are replaced by the line halfway between them (`merge`).
//! - Collinear merge: near-collinear pieces separated by at most
//!   `gap_tolerance_px` fuse into one segment (`merge`).
//! - Endpoint extension: each end follows the ink under its axis up to the
//!   head window, which carries it through arrow heads to the tip. The
//!   window grows with the measured stroke width.
//! - Arrow heads: the neighbourhood behind each end is probed for ink that
//!   spreads on both sides of the axis and tapers to the tip (`arrowhead`).
//!   Short strokes inside a detected head, whose extent is measured on the
//!   ink, are absorbed.
//! - Corner joining: two head-less ends meeting away from every shape chain
//!   into one polyline.
//! - Length filter: connectors shorter than `min_connector_length_px` are
//!   dropped. It runs last, so raising the threshold can only remove
//!   connectors.
//!
//! Every polyline is oriented to start at its raster-first end and the output
//! is sorted in raster order of that end.

mod arrowhead;
mod extractor;
mod merge;
mod options;
mod region_accumulator;

pub use extractor::LineSegment;
pub use options::ConnectorOptions;

use crate::geometry::{distance, polyline_length, raster_cmp, BoundingBox};
use crate::image::InkMask;
use crate::shapes::Shape;
use arrowhead::InkProbe;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Detected stroke before endpoint resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConnector {
    /// Polyline vertices, at least two.
    pub points: Vec<[f32; 2]>,
    pub head_at_start: bool,
    pub head_at_end: bool,
    /// Measured ink thickness (px).
    pub stroke_width: f32,
}

impl RawConnector {
    pub fn start(&self) -> [f32; 2] {
        self.points[0]
    }

    pub fn end(&self) -> [f32; 2] {
        self.points[self.points.len() - 1]
    }

    pub fn length(&self) -> f32 {
        polyline_length(&self.points)
    }

    /// Number of arrow heads (0, 1 or 2).
    pub fn head_count(&self) -> usize {
        usize::from(self.head_at_start) + usize::from(self.head_at_end)
    }

    /// Same stroke walked the other way.
    pub fn reversed(mut self) -> Self {
        self.points.reverse();
        std::mem::swap(&mut self.head_at_start, &mut self.head_at_end);
        self
    }

    /// Point halfway along the polyline.
    pub fn midpoint(&self) -> [f32; 2] {
        let half = 0.5 * self.length();
        let mut walked = 0.0;
        for w in self.points.windows(2) {
            let d = distance(w[0], w[1]);
            if walked + d >= half && d > 0.0 {
                let t = (half - walked) / d;
                return [w[0][0] + t * (w[1][0] - w[0][0]), w[0][1] + t * (w[1][1] - w[0][1])];
            }
            walked += d;
        }
        self.points[0]
    }

    fn raster_oriented(self) -> Self {
        if raster_cmp(self.end(), self.start()) == Ordering::Less {
            self.reversed()
        } else {
            self
        }
    }
}

/// Connectors of one image plus counters for diagnostics.
#[derive(Clone, Debug, Default)]
pub struct ConnectorScan {
    pub connectors: Vec<RawConnector>,
    /// Fitted line pieces before merging.
    pub segments_found: usize,
    /// Strokes absorbed into arrow heads.
    pub absorbed_strokes: usize,
    /// Connectors dropped by the length filter.
    pub rejected_short: usize,
}

/// Detect connectors in `mask`, ignoring everything covered by `shapes`.
pub fn detect_connectors(mask: &InkMask, shapes: &[Shape], options: &ConnectorOptions) -> Vec<RawConnector> {
    scan_connectors(mask, shapes, options).connectors
}

pub fn scan_connectors(mask: &InkMask, shapes: &[Shape], options: &ConnectorOptions) -> ConnectorScan {
    let boxes: Vec<BoundingBox> = shapes
        .iter()
        .map(|s| s.bounding_box.expanded(options.shape_margin_px))
        .collect();
    let allowed = allowed_mask(mask.width(), mask.height(), &boxes);
    let ink = mask.to_f32();

    let probe = InkProbe { ink: mask, allowed: &allowed };

    let segments = extractor::LineExtractor::new(&ink, Some(&allowed), options).extract();
    let segments_found = segments.len();
    let centred = merge::fuse_stroke_edges(segments, &probe, options);
    let merged = merge::merge_collinear(centred, options);

    let connectors: Vec<RawConnector> = merged
        .iter()
        .map(|s| arrowhead::to_connector(s, &probe, options))
        .collect();
    let (connectors, absorbed_strokes) = arrowhead::absorb_head_strokes(connectors, &probe, options);

    let shape_boxes: Vec<BoundingBox> = shapes.iter().map(|s| s.bounding_box).collect();
    let connectors = merge::join_corners(connectors, &shape_boxes, options);

    let before = connectors.len();
    let mut connectors: Vec<RawConnector> = connectors
        .into_iter()
        .filter(|c| c.length() >= options.min_connector_length_px)
        .map(RawConnector::raster_oriented)
        .collect();
    let rejected_short = before - connectors.len();
    connectors.sort_by(|a, b| {
        raster_cmp(a.start(), b.start()).then_with(|| raster_cmp(a.end(), b.end()))
    });

    debug!(
        "scan_connectors segments={} merged={} absorbed={} short={} connectors={}",
        segments_found,
        merged.len(),
        absorbed_strokes,
        rejected_short,
        connectors.len()
    );
    ConnectorScan {
        connectors,
        segments_found,
        absorbed_strokes,
        rejected_short,
    }
}

/// 1 outside every box, 0 inside any.
fn allowed_mask(w: usize, h: usize, boxes: &[BoundingBox]) -> Vec<u8> {
    let mut allowed = vec![1u8; w * h];
    for b in boxes {
        let x0 = b.x0.floor().max(0.0) as usize;
        let y0 = b.y0.floor().max(0.0) as usize;
        let x1 = (b.x1.ceil().max(0.0) as usize).min(w);
        let y1 = (b.y1.ceil().max(0.0) as usize).min(h);
        for y in y0..y1 {
            for x in x0..x1 {
                allowed[y * w + x] = 0;
            }
        }
    }
    allowed
}

#[cfg(test)]
mod tests;
