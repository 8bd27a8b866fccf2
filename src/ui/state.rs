//! Application state management structures.
//!
//! This module contains the state structures that track the source document,
//! the viewer's viewport and cached texture, and in-flight PNG exports.

use crate::constants;
use crate::debounce::Debouncer;
use crate::raster::RasterExporter;
use crate::render::Preview;
use crate::types::DiagramFormat;
use crate::viewport::{ViewerVariant, ViewportController};
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::JoinHandle;

/// State of the source document being previewed.
pub struct SourceState {
    /// Source text as shown in the editor
    pub text: String,
    /// Forced format, or `None` to detect it from the text
    pub format: Option<DiagramFormat>,
    /// Pending re-render after an edit
    pub edit_debounce: Debouncer<()>,
    /// Name of the file the source was loaded from, if any
    pub file_name: Option<String>,
}

impl Default for SourceState {
    fn default() -> Self {
        Self {
            text: String::new(),
            format: None,
            edit_debounce: Debouncer::new(constants::EDIT_DEBOUNCE_SECS),
            file_name: None,
        }
    }
}

/// State of the diagram viewer.
///
/// Replaced wholesale when the viewer variant changes, so zoom and pan start
/// over with the new policy.
pub struct ViewerState {
    /// Which viewer flavour is active
    pub variant: ViewerVariant,
    /// Zoom/pan state machine
    pub controller: ViewportController,
    /// Pending automatic fit-to-view
    pub fit_debounce: Debouncer<()>,
    /// Rasterized diagram, rebuilt when the preview changes
    pub texture: Option<egui::TextureHandle>,
    /// Set when the texture no longer matches the preview
    pub texture_stale: bool,
    /// Why the last rasterization failed, if it did
    pub raster_error: Option<String>,
    /// Size of the viewer surface as of the last frame
    pub canvas_size: egui::Vec2,
}

impl ViewerState {
    /// Creates a fresh viewer of the given variant.
    pub fn new(variant: ViewerVariant) -> Self {
        Self {
            variant,
            controller: ViewportController::new(variant.policy()),
            fit_debounce: Debouncer::new(constants::FIT_DEBOUNCE_SECS),
            texture: None,
            texture_stale: true,
            raster_error: None,
            canvas_size: egui::Vec2::ZERO,
        }
    }
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new(ViewerVariant::Grid)
    }
}

/// A finished PNG export, tagged with the preview generation it was made from.
pub struct ExportResult {
    /// Preview generation at the time the export started
    pub generation: u64,
    /// Encoded PNG
    pub bytes: Vec<u8>,
}

/// State related to PNG export.
pub struct ExportState {
    /// Rasterizer used for both export and on-screen display
    pub exporter: RasterExporter,
    /// Channel for background export completions
    pub sender: Sender<ExportResult>,
    /// Receiver polled every frame
    pub receiver: Receiver<ExportResult>,
    /// Background export thread, while one is running
    pub task: Option<JoinHandle<()>>,
    /// Last export outcome shown in the toolbar
    pub status: Option<String>,
}

impl Default for ExportState {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            exporter: RasterExporter::default(),
            sender,
            receiver,
            task: None,
            status: None,
        }
    }
}

impl ExportState {
    /// Whether an export is running.
    pub fn in_progress(&self) -> bool {
        self.task.is_some()
    }
}

/// The main application structure.
///
/// This struct implements the `eframe::App` trait and handles all user interface
/// rendering and interaction logic.
pub struct DiagramApp {
    /// Source document state
    pub source: SourceState,
    /// What the viewer displays for the current source
    pub preview: Preview,
    /// Incremented whenever `preview` is replaced
    pub generation: u64,
    /// Viewer state
    pub viewer: ViewerState,
    /// Export state
    pub export: ExportState,
    /// Width of the source panel
    pub source_panel_width: f32,
}

impl Default for DiagramApp {
    fn default() -> Self {
        Self {
            source: SourceState::default(),
            preview: Preview::Empty,
            generation: 0,
            viewer: ViewerState::default(),
            export: ExportState::default(),
            source_panel_width: 380.0,
        }
    }
}
