//! Error type shared by the extraction pipeline, the I/O helpers and the
//! collaborator boundaries.
//!
//! Only input problems abort an extraction. Degenerate geometry (no shapes,
//! dangling or dropped connectors, unassociated text) is reported through
//! [`crate::diagnostics::ExtractionDiagnostics`] instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The image has a zero dimension.
    #[error("empty image: {width}x{height}")]
    EmptyImage { width: usize, height: usize },

    /// The image buffer does not match its declared layout.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("image codec error on {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// The semantic reviewer returned something that is not a FlowGraph.
    #[error("review failed: {0}")]
    Review(String),

    #[error("text recognition failed: {0}")]
    Ocr(String),
}

impl ExtractError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ExtractError> = std::result::Result<T, E>;
