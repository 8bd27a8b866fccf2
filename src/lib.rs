//! # Diagram Preview
//!
//! Renders diagram documents produced by a text-to-diagram converter into
//! standalone SVG, and hosts them in an interactive viewer. Supports two
//! source models:
//! - **Excalidraw scenes**: free-form shapes, arrows and text bound to containers
//! - **Draw.io graphs**: vertex cells joined by edge cells
//!
//! ## Features
//! - Content bounds over heterogeneous elements, with padding and fallbacks
//! - One SVG renderer per source model, escaping all user text
//! - Zoom, pan, fit-to-view and grid overlay in two viewer flavours
//! - PNG export at double pixel density on a white background

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod bounds;
pub mod constants;
pub mod debounce;
pub mod error;
pub mod examples;
pub mod parse;
pub mod raster;
pub mod render;
mod types;
pub mod viewport;
mod ui;

// Re-export public types and functions
pub use bounds::{compute_bounds, try_compute_bounds};
pub use error::{DiagramError, Result};
pub use raster::RasterExporter;
pub use render::{render_source, DrawGraphRenderer, FreeformRenderer, MessageKind, Preview, SvgRenderer};
pub use types::*;
pub use viewport::{ViewportController, ViewportPolicy};
use ui::DiagramApp;

/// Runs the viewer application with default settings.
///
/// This function initializes the egui application window and starts the main event loop.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an `eframe::Error` if
/// initialization fails.
///
/// # Example
///
/// ```no_run
/// use diagram_preview::run_app;
///
/// fn main() -> Result<(), eframe::Error> {
///     run_app()
/// }
/// ```
pub fn run_app() -> std::result::Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Diagram Preview")
            .with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Diagram Preview",
        options,
        Box::new(|_cc| Ok(Box::new(DiagramApp::default()))),
    )
}
