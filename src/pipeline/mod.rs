//! End-to-end extraction: raster in, [`FlowGraph`] plus diagnostics out.
//!
//! Stages run strictly in order, each a pure function of its inputs and the
//! immutable [`ExtractorParams`]:
//!
//! 1. Binarize the grayscale view into an ink mask.
//! 2. Shapes: closed contours, area gate, classification, ids in raster order.
//! 3. Connectors: line pieces outside the shape boxes, merged and joined into
//!    polylines, with arrow heads probed at both ends.
//! 4. Resolve: bind endpoints to shapes and orient source → target.
//! 5. Text: attach recognized regions to shapes and connectors, derive labels.
//! 6. Assemble the graph.
//!
//! Typical usage:
//! ```no_run
//! use flowchart_detector::{ExtractorParams, FlowchartExtractor};
//! use flowchart_detector::image::ImageU8;
//!
//! # fn example(gray: ImageU8) -> flowchart_detector::Result<()> {
//! let extractor = FlowchartExtractor::new(ExtractorParams::default());
//! let report = extractor.process(&gray, &[])?;
//! println!("{}", report.graph.to_mermaid());
//! # Ok(())
//! # }
//! ```

mod params;

pub use params::ExtractorParams;

use crate::connectors::scan_connectors;
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{ExtractionDiagnostics, StageTiming, TimingBreakdown};
use crate::error::Result;
use crate::graph::{assemble, FlowGraph};
use crate::image::{ImageU8, InkMask};
use crate::ocr::{recognize_page, TextRecognizer};
use crate::resolve::resolve;
use crate::review::SemanticReviewer;
use crate::shapes::scan_shapes;
use crate::text::{associate, TextRegion};
use log::debug;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

/// Graph of one image and what happened while building it.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionReport {
    pub graph: FlowGraph,
    pub diagnostics: ExtractionDiagnostics,
}

/// Runs the stage chain with a fixed parameter set.
#[derive(Clone, Debug, Default)]
pub struct FlowchartExtractor {
    params: ExtractorParams,
}

impl FlowchartExtractor {
    pub fn new(params: ExtractorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ExtractorParams {
        &self.params
    }

    /// Extract the graph of `image` using already recognized `regions`.
    ///
    /// Fails only when the image itself is unusable; degenerate drawings are
    /// reported through the diagnostics.
    pub fn process(&self, image: &ImageU8<'_>, regions: &[TextRegion]) -> Result<ExtractionReport> {
        image.validate()?;
        let total_start = Instant::now();
        let mut timing = TimingBreakdown::default();
        let mut diag = ExtractionDiagnostics {
            width: image.w,
            height: image.h,
            ..Default::default()
        };

        let t = Instant::now();
        let mask = InkMask::from_gray(image, &self.params.binarize);
        timing.push("binarize", elapsed_ms(t));
        diag.ink_pixels = mask.ink_count();

        let t = Instant::now();
        let shape_scan = scan_shapes(&mask, &self.params.shapes);
        timing.push("shapes", elapsed_ms(t));
        diag.contours_found = shape_scan.contours_found;
        diag.rejected_contours = shape_scan.rejected_small;
        diag.shapes = shape_scan.shapes.len();

        let t = Instant::now();
        let conn_scan = scan_connectors(&mask, &shape_scan.shapes, &self.params.connectors);
        timing.push("connectors", elapsed_ms(t));
        diag.segments_found = conn_scan.segments_found;
        diag.absorbed_strokes = conn_scan.absorbed_strokes;
        diag.short_connectors = conn_scan.rejected_short;
        diag.raw_connectors = conn_scan.connectors.len();

        let t = Instant::now();
        let resolved = resolve(&conn_scan.connectors, &shape_scan.shapes, &self.params.resolve);
        timing.push("resolve", elapsed_ms(t));
        diag.dropped_connectors = resolved.dropped;
        diag.dangling_edges = resolved.dangling();

        let t = Instant::now();
        let assoc = associate(shape_scan.shapes, resolved.connectors, regions, &self.params.text);
        timing.push("text", elapsed_ms(t));
        diag.unassociated_text = assoc.unassigned;

        let t = Instant::now();
        let graph = assemble(assoc.shapes, &assoc.connectors);
        timing.push("assemble", elapsed_ms(t));

        timing.total_ms = elapsed_ms(total_start);
        debug!(
            "extract {}x{} shapes={} edges={} dropped={} dangling={} unassociated={} total_ms={:.3}",
            image.w,
            image.h,
            graph.shapes.len(),
            graph.edges.len(),
            diag.dropped_connectors,
            diag.dangling_edges,
            diag.unassociated_text,
            timing.total_ms
        );
        diag.timing = timing;
        Ok(ExtractionReport {
            graph,
            diagnostics: diag,
        })
    }

    /// Recognize text with `recognizer` over the whole page, then extract.
    pub fn process_with_ocr<R: TextRecognizer + ?Sized>(
        &self,
        image: &ImageU8<'_>,
        recognizer: &R,
    ) -> Result<ExtractionReport> {
        let t = Instant::now();
        let regions = recognize_page(recognizer, image)?;
        let ocr_ms = elapsed_ms(t);
        let mut report = self.process(image, &regions)?;
        report
            .diagnostics
            .timing
            .stages
            .insert(0, StageTiming::new("ocr", ocr_ms));
        report.diagnostics.timing.total_ms += ocr_ms;
        Ok(report)
    }

    /// Extract, then pass the graph through `reviewer`.
    ///
    /// Reviewer failures propagate; the diagnostics still describe the
    /// geometric extraction.
    pub fn process_and_review<S: SemanticReviewer + ?Sized>(
        &self,
        image: &ImageU8<'_>,
        regions: &[TextRegion],
        reviewer: &S,
    ) -> Result<ExtractionReport> {
        let mut report = self.process(image, regions)?;
        let t = Instant::now();
        report.graph = reviewer.review(&report.graph)?;
        let review_ms = elapsed_ms(t);
        report.diagnostics.timing.push("review", review_ms);
        report.diagnostics.timing.total_ms += review_ms;
        Ok(report)
    }
}

/// One image of a batch with the text recognized on it.
#[derive(Clone, Debug)]
pub struct BatchItem<'a> {
    pub image: ImageU8<'a>,
    pub regions: &'a [TextRegion],
}

/// Extract every item independently. Results keep the input order.
pub fn extract_batch(params: &ExtractorParams, items: &[BatchItem<'_>]) -> Vec<Result<ExtractionReport>> {
    let extractor = FlowchartExtractor::new(*params);
    #[cfg(feature = "parallel")]
    {
        items
            .par_iter()
            .map(|item| extractor.process(&item.image, item.regions))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        items
            .iter()
            .map(|item| extractor.process(&item.image, item.regions))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;

    #[test]
    fn blank_page_gives_empty_graph() {
        let data = vec![255u8; 64 * 48];
        let img = ImageU8::new(64, 48, &data);
        let report = FlowchartExtractor::default().process(&img, &[]).expect("extract");
        assert!(report.graph.is_empty());
        assert_eq!(report.diagnostics.ink_pixels, 0);
        let labels: Vec<&str> = report
            .diagnostics
            .timing
            .stages
            .iter()
            .map(|s| s.label.as_str())
            .collect();
        assert_eq!(labels, ["binarize", "shapes", "connectors", "resolve", "text", "assemble"]);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let data = vec![255u8; 10];
        let img = ImageU8::new(8, 8, &data);
        assert!(matches!(
            FlowchartExtractor::default().process(&img, &[]),
            Err(ExtractError::InvalidImage(_))
        ));
    }

    #[test]
    fn batch_keeps_input_order() {
        let a = vec![255u8; 32 * 32];
        let items = [
            BatchItem {
                image: ImageU8::new(32, 32, &a),
                regions: &[],
            },
            BatchItem {
                image: ImageU8::new(0, 0, &[]),
                regions: &[],
            },
        ];
        let out = extract_batch(&ExtractorParams::default(), &items);
        assert!(out[0].is_ok());
        assert!(matches!(out[1], Err(ExtractError::EmptyImage { .. })));
    }
}
