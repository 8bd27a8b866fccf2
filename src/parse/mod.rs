//! Readers for the two document shapes the external converter produces.
//!
//! - `excalidraw` - scene JSON with a flat `elements` array (container/shape model)
//! - `drawio` - mxGraph XML with `mxCell` vertices and edges (cell/edge model)

mod drawio;
mod excalidraw;

pub use drawio::parse_drawio;
pub use excalidraw::parse_excalidraw;

use crate::error::Result;
use crate::types::{DiagramElement, DiagramFormat};

/// Parses a source document of the given format into diagram elements.
pub fn parse_source(source: &str, format: DiagramFormat) -> Result<Vec<DiagramElement>> {
    match format {
        DiagramFormat::Excalidraw => parse_excalidraw(source),
        DiagramFormat::DrawIo => parse_drawio(source),
    }
}
