#![doc = include_str!("../README.md")]

// Stages, in data-flow order.
pub mod shapes;
pub mod connectors;
pub mod resolve;
pub mod text;
pub mod graph;

// Orchestration and reporting.
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod pipeline;

// Collaborator boundaries.
pub mod ocr;
pub mod review;

// Building blocks shared by the stages.
pub mod angle;
pub mod edges;
pub mod geometry;
pub mod image;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{ExtractError, Result};
pub use crate::graph::{Edge, FlowGraph, Orientation};
pub use crate::pipeline::{extract_batch, BatchItem, ExtractionReport, ExtractorParams, FlowchartExtractor};
pub use crate::shapes::{Shape, ShapeId, ShapeKind};
pub use crate::text::TextRegion;

pub use crate::diagnostics::ExtractionDiagnostics;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use flowchart_detector::prelude::*;
///
/// # fn main() -> flowchart_detector::Result<()> {
/// let (w, h) = (320usize, 240usize);
/// let gray = vec![255u8; w * h];
/// let img = ImageU8::new(w, h, &gray);
///
/// let extractor = FlowchartExtractor::new(ExtractorParams::default());
/// let report = extractor.process(&img, &[])?;
/// println!("shapes={} edges={}", report.graph.shapes.len(), report.graph.edges.len());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ImageU8;
    pub use crate::{ExtractorParams, FlowGraph, FlowchartExtractor, TextRegion};
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    pub use crate::connectors::{detect_connectors, scan_connectors, ConnectorOptions, RawConnector};
    pub use crate::graph::assemble;
    pub use crate::image::{BinarizeOptions, InkMask};
    pub use crate::resolve::{bind_endpoint, resolve, Connector, ResolveOptions};
    pub use crate::shapes::{detect_shapes, scan_shapes, ShapeOptions};
    pub use crate::text::{associate, classify_branch, BranchLabel, TextOptions};
}
