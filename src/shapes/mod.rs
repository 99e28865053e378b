//! Shape detection: closed outlines → classified flowchart nodes.
//!
//! The detector works on the binarized ink mask:
//!
//! - Contour extraction: every background region (4-connected) that does not
//!   reach the image border is enclosed by drawn strokes. Its outer boundary
//!   is traced from the raster-first pixel (see `contour`).
//! - Area filter: contours enclosing less than `min_area` px² are glyph holes
//!   or speckles and are dropped before ids are assigned, so every emitted
//!   shape satisfies `area >= min_area`.
//! - Classification: closed Douglas–Peucker approximation followed by a closed
//!   match over [`ShapeKind`] (see `classify`). Contours that fit no
//!   primitive are kept as `Unknown`.
//! - Descriptors: area centroid of the contour, and a bounding box that is
//!   pushed outward by the measured stroke thickness so it covers the drawn
//!   outline rather than only its interior.
//!
//! Shapes come out in raster order of their first contour point and carry ids
//! `0..n` in that order. The detector is a pure function of its input.

mod classify;
mod contour;
mod options;
mod shape;

pub use classify::{classify_contour, Classification};
pub use contour::{find_closed_contours, Contour};
pub use options::ShapeOptions;
pub use shape::{Shape, ShapeId, ShapeKind};

use crate::geometry::BoundingBox;
use crate::image::{BinarizeOptions, ImageU8, InkMask};
use log::debug;

/// Shapes of one image plus the bookkeeping needed for diagnostics.
#[derive(Clone, Debug, Default)]
pub struct ShapeScan {
    pub shapes: Vec<Shape>,
    /// Closed contours found before filtering.
    pub contours_found: usize,
    /// Contours rejected by the area or side-length gate.
    pub rejected_small: usize,
}

/// Binarize `image` with default settings and detect shapes.
pub fn detect_shapes(image: &ImageU8<'_>, options: &ShapeOptions) -> Vec<Shape> {
    let mask = InkMask::from_gray(image, &BinarizeOptions::default());
    detect_shapes_in_mask(&mask, options)
}

/// Detect shapes in an existing ink mask.
pub fn detect_shapes_in_mask(mask: &InkMask, options: &ShapeOptions) -> Vec<Shape> {
    scan_shapes(mask, options).shapes
}

/// Detect shapes and report how many contours were seen and rejected.
pub fn scan_shapes(mask: &InkMask, options: &ShapeOptions) -> ShapeScan {
    let contours = find_closed_contours(mask);
    let contours_found = contours.len();
    let mut shapes = Vec::new();
    let mut rejected_small = 0usize;

    for contour in contours {
        let area = contour.area();
        if area < options.min_area {
            rejected_small += 1;
            continue;
        }
        let bounding_box = outer_box(mask, &contour, options.max_stroke_px);
        if bounding_box.width() < options.min_side_px || bounding_box.height() < options.min_side_px {
            rejected_small += 1;
            continue;
        }
        let Classification { kind, polygon } = classify_contour(&contour, options);
        let id = ShapeId(shapes.len() as u32);
        debug!(
            "shape {} kind={:?} area={:.1} vertices={} box=({:.1},{:.1})-({:.1},{:.1})",
            id,
            kind,
            area,
            polygon.len(),
            bounding_box.x0,
            bounding_box.y0,
            bounding_box.x1,
            bounding_box.y1
        );
        shapes.push(Shape {
            id,
            kind,
            bounding_box,
            centroid: classify::contour_centroid(&contour),
            area,
            text: None,
            outline: polygon,
        });
    }

    debug!(
        "scan_shapes contours={} shapes={} rejected={}",
        contours_found,
        shapes.len(),
        rejected_small
    );
    ShapeScan {
        shapes,
        contours_found,
        rejected_small,
    }
}

/// Pixel-edge box of the contour grown by the stroke thickness on each side.
fn outer_box(mask: &InkMask, contour: &Contour, max_stroke: usize) -> BoundingBox {
    let pixels = &contour.pixels;
    let min_x = pixels.iter().map(|p| p.0).min().unwrap_or(0);
    let max_x = pixels.iter().map(|p| p.0).max().unwrap_or(0);
    let min_y = pixels.iter().map(|p| p.1).min().unwrap_or(0);
    let max_y = pixels.iter().map(|p| p.1).max().unwrap_or(0);

    let side = |select: &dyn Fn(&(usize, usize)) -> bool, step: (isize, isize)| {
        let runs: Vec<usize> = pixels
            .iter()
            .filter(|p| select(p))
            .map(|&(x, y)| ink_run(mask, x, y, step, max_stroke))
            .collect();
        median(runs) as f32
    };
    let left = side(&|p| p.0 == min_x, (-1, 0));
    let right = side(&|p| p.0 == max_x, (1, 0));
    let top = side(&|p| p.1 == min_y, (0, -1));
    let bottom = side(&|p| p.1 == max_y, (0, 1));

    BoundingBox::new(
        min_x as f32 - left,
        min_y as f32 - top,
        (max_x + 1) as f32 + right,
        (max_y + 1) as f32 + bottom,
    )
}

/// Number of consecutive ink pixels stepping from `(x, y)` along `step`.
fn ink_run(mask: &InkMask, x: usize, y: usize, step: (isize, isize), cap: usize) -> usize {
    let mut run = 0;
    let (mut cx, mut cy) = (x as isize, y as isize);
    while run < cap {
        cx += step.0;
        cy += step.1;
        if !mask.is_ink_at(cx, cy) {
            break;
        }
        run += 1;
    }
    run
}

fn median(mut values: Vec<usize>) -> usize {
    if values.is_empty() {
        return 0;
    }
    values.sort_unstable();
    values[values.len() / 2]
}
