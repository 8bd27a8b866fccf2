//! Document loading and PNG export.
//!
//! Native file dialogs come from `rfd`. Export encodes on a background thread
//! and reports back over the channel in [`ExportState`](super::state::ExportState);
//! the save dialog opens once the bytes arrive.

use super::state::{DiagramApp, ExportResult};
use crate::constants;
use crate::examples::{example_source, ExampleKind};
use crate::render::Preview;
use eframe::egui;
use std::time::Duration;

impl DiagramApp {
    /// Replaces the source text and renders it immediately.
    ///
    /// # Arguments
    ///
    /// * `text` - The new source document
    /// * `file_name` - Where it came from, for display
    /// * `now` - Current input time in seconds
    pub fn load_source(&mut self, text: String, file_name: Option<String>, now: f64) {
        self.source.text = text;
        self.source.file_name = file_name;
        self.source.edit_debounce.cancel();
        self.refresh_preview(now);
    }

    /// Loads one of the built-in examples.
    pub fn load_example(&mut self, kind: ExampleKind, now: f64) {
        log::info!("loading example {:?}", kind);
        self.load_source(example_source(kind).to_string(), None, now);
    }

    /// Re-renders the current source and invalidates everything derived from it.
    ///
    /// A successful render schedules an automatic fit-to-view.
    pub fn refresh_preview(&mut self, now: f64) {
        self.preview = Preview::from_source(&self.source.text, self.source.format);
        self.generation += 1;
        self.viewer.texture_stale = true;
        if self.preview.diagram().is_some() {
            self.viewer.fit_debounce.schedule(now, ());
        } else {
            self.viewer.fit_debounce.cancel();
        }
    }

    /// Re-renders once the edit debounce has elapsed.
    ///
    /// Returns how long until the pending edit is due, if one is waiting.
    pub fn poll_source_edits(&mut self, now: f64) -> Option<f64> {
        if self.source.edit_debounce.poll(now).is_some() {
            self.refresh_preview(now);
            return None;
        }
        self.source.edit_debounce.remaining(now)
    }

    /// Shows an open dialog and loads the chosen document.
    pub fn open_file(&mut self, now: f64) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Diagram", &["excalidraw", "json", "drawio", "xml"])
            .add_filter("All files", &["*"])
            .pick_file()
        else {
            return;
        };

        match std::fs::read_to_string(&path) {
            Ok(text) => {
                log::info!("opened {}", path.display());
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned());
                self.load_source(text, name, now);
            }
            Err(e) => {
                log::warn!("failed to read {}: {}", path.display(), e);
                self.export.status = Some(format!("Could not open file: {}", e));
            }
        }
    }

    /// Starts a background PNG export of the current diagram.
    ///
    /// Does nothing when there is no rendered diagram.
    pub fn start_export(&mut self, ctx: &egui::Context) {
        let svg = self.preview.diagram().map(|d| d.markup.as_str());
        let sender = self.export.sender.clone();
        let generation = self.generation;
        let repaint = ctx.clone();
        self.export.task = self.export.exporter.export(svg, move |bytes| {
            let _ = sender.send(ExportResult { generation, bytes });
            repaint.request_repaint();
        });
    }

    /// Drains finished exports. Results for an outdated preview are dropped.
    pub fn handle_export_results(&mut self, ctx: &egui::Context) {
        // A finished thread has already sent its result, if it had one
        let finished = self.export.task.as_ref().is_some_and(|t| t.is_finished());

        while let Ok(result) = self.export.receiver.try_recv() {
            if result.generation != self.generation {
                log::debug!(
                    "dropping export of generation {} (current {})",
                    result.generation,
                    self.generation
                );
                continue;
            }
            self.save_png(&result.bytes);
        }

        if finished {
            self.export.task = None;
        } else if self.export.in_progress() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    /// Asks where to save the PNG and writes it.
    fn save_png(&mut self, bytes: &[u8]) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(constants::EXPORT_FILE_NAME)
            .save_file()
        else {
            return;
        };

        match std::fs::write(&path, bytes) {
            Ok(()) => {
                log::info!("saved {}", path.display());
                self.export.status = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::warn!("failed to save PNG: {}", e);
                self.export.status = Some(format!("Could not save PNG: {}", e));
            }
        }
    }
}
