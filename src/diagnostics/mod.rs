//! Diagnostics reported next to every extracted graph.
//!
//! None of the situations counted here abort an extraction: a sheet without
//! shapes yields an empty graph, a connector that touches nothing is dropped,
//! and text that lands nowhere is ignored. The counts make those outcomes
//! visible to the caller, and `timing` records where the time went.

pub mod timing;

pub use timing::{StageTiming, TimingBreakdown};

use serde::{Deserialize, Serialize};

/// Counters of one extraction run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionDiagnostics {
    pub width: usize,
    pub height: usize,
    /// Pixels classified as ink by the binarizer.
    pub ink_pixels: usize,
    /// Closed contours before the size gate.
    pub contours_found: usize,
    /// Contours below `min_area` or `min_side_px`.
    pub rejected_contours: usize,
    pub shapes: usize,
    /// Fitted line pieces before merging.
    pub segments_found: usize,
    /// Short strokes folded into arrow heads.
    pub absorbed_strokes: usize,
    /// Connectors under the minimum length.
    pub short_connectors: usize,
    /// Connectors handed to the resolver.
    pub raw_connectors: usize,
    /// Connectors with no endpoint near any shape, or too short to loop.
    pub dropped_connectors: usize,
    /// Edges with exactly one null side.
    pub dangling_edges: usize,
    /// Non-blank text regions assigned to nothing.
    pub unassociated_text: usize,
    pub timing: TimingBreakdown,
}

impl ExtractionDiagnostics {
    /// True when the run hit none of the soft failure modes.
    pub fn is_clean(&self) -> bool {
        self.dropped_connectors == 0 && self.dangling_edges == 0 && self.unassociated_text == 0
    }
}
