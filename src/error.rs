//! Error type shared by parsing, rendering and export.

use crate::types::DiagramFormat;

/// Everything that can go wrong between a source document and its output.
#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    /// The source document could not be read as the expected format.
    #[error("failed to parse {format} output: {message}")]
    Parse {
        /// Format the document was parsed as
        format: DiagramFormat,
        /// Underlying parser message
        message: String,
    },
    /// The document is well formed but contains nothing that can be drawn.
    #[error("diagram has no renderable content")]
    NoRenderableContent,
    /// Raster decode or encode failed.
    #[error("raster export failed: {0}")]
    Export(String),
}

impl DiagramError {
    pub(crate) fn parse(format: DiagramFormat, err: impl std::fmt::Display) -> Self {
        DiagramError::Parse {
            format,
            message: err.to_string(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DiagramError>;
