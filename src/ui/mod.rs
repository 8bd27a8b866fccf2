//! User interface components for the diagram viewer.
//!
//! This module contains all the UI-related code including the main application
//! struct, the toolbar, the source panel and the interactive viewer.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main DiagramApp
//! - `file_ops` - Opening documents, loading examples and PNG export
//! - `canvas` - Viewer surface input, zooming, panning and fit-to-view
//! - `rendering` - Drawing the grid, the diagram texture and inline messages

mod canvas;
mod file_ops;
mod rendering;
mod state;

pub use state::*;

use crate::examples::all_examples;
use crate::types::DiagramFormat;
use crate::viewport::ViewerVariant;
use eframe::egui;
use std::time::Duration;

impl eframe::App for DiagramApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::light());
        let now = ctx.input(|i| i.time);

        // Handle finished background exports
        self.handle_export_results(ctx);

        // Re-render the source once typing has paused
        if let Some(remaining) = self.poll_source_edits(now) {
            ctx.request_repaint_after(Duration::from_secs_f64(remaining));
        }

        // Top toolbar occupies full width
        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        // Source editor on the left, below the toolbar
        let viewport_width = ctx.input(|i| i.screen_rect().width());
        let clamped_width = self
            .source_panel_width
            .clamp(200.0, (viewport_width * 0.6).max(200.0));
        egui::SidePanel::left("source_panel")
            .resizable(true)
            .default_width(clamped_width)
            .show(ctx, |ui| {
                self.source_panel_width = ui.available_width();
                self.draw_source_panel(ui);
            });

        // Viewer takes the remaining space
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.draw_viewer(ui);
            });
    }
}

impl DiagramApp {
    /// Switches the viewer flavour, starting over with a fresh viewport.
    pub fn set_viewer_variant(&mut self, variant: ViewerVariant, now: f64) {
        if self.viewer.variant == variant {
            return;
        }
        let canvas_size = self.viewer.canvas_size;
        self.viewer = ViewerState::new(variant);
        self.viewer.canvas_size = canvas_size;
        if self.preview.diagram().is_some() {
            self.viewer.fit_debounce.schedule(now, ());
        }
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        let now = ui.input(|i| i.time);
        ui.horizontal(|ui| {
            // Document sources
            if ui.button("Open").clicked() {
                self.open_file(now);
            }
            ui.menu_button("Examples", |ui| {
                for info in all_examples() {
                    let label = format!("{} ({})", info.name, info.format);
                    if ui.button(label).on_hover_text(info.description).clicked() {
                        self.load_example(info.kind, now);
                        ui.close();
                    }
                }
            });

            ui.separator();

            // Format and viewer selection
            let format_label = match self.source.format {
                Some(format) => format.to_string(),
                None => "Auto-detect".to_string(),
            };
            let mut format_changed = false;
            egui::ComboBox::from_id_salt("format_combo")
                .selected_text(format_label)
                .show_ui(ui, |ui| {
                    format_changed |= ui
                        .selectable_value(&mut self.source.format, None, "Auto-detect")
                        .changed();
                    for format in [DiagramFormat::Excalidraw, DiagramFormat::DrawIo] {
                        format_changed |= ui
                            .selectable_value(&mut self.source.format, Some(format), format.to_string())
                            .changed();
                    }
                });
            if format_changed {
                self.refresh_preview(now);
            }

            let mut variant = self.viewer.variant;
            egui::ComboBox::from_id_salt("viewer_combo")
                .selected_text(variant.label())
                .show_ui(ui, |ui| {
                    for option in ViewerVariant::ALL {
                        ui.selectable_value(&mut variant, option, option.label());
                    }
                });
            self.set_viewer_variant(variant, now);

            ui.separator();

            // Viewport controls
            if ui.button("−").on_hover_text("Zoom out").clicked() {
                self.viewer.controller.zoom_out();
            }
            ui.label(format!("{}%", (self.viewer.controller.zoom() * 100.0).round()));
            if ui.button("+").on_hover_text("Zoom in").clicked() {
                self.viewer.controller.zoom_in();
            }
            if ui.button("Fit").clicked() {
                self.fit_to_view();
            }
            if ui.button("Reset").clicked() {
                self.viewer.controller.reset();
            }
            let mut grid = self.viewer.controller.grid_enabled();
            if ui.checkbox(&mut grid, "Grid").changed() {
                self.viewer.controller.toggle_grid();
            }

            ui.separator();

            // Export
            let can_export = self.preview.diagram().is_some() && !self.export.in_progress();
            ui.add_enabled_ui(can_export, |ui| {
                if ui.button("Export PNG").clicked() {
                    let ctx = ui.ctx().clone();
                    self.start_export(&ctx);
                }
            });
            if self.export.in_progress() {
                ui.spinner();
            }
            if let Some(status) = &self.export.status {
                ui.label(status);
            }
        });
    }

    fn draw_source_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Source");
        ui.horizontal(|ui| {
            if let Some(name) = &self.source.file_name {
                ui.label(name);
            }
            let detected = self
                .source
                .format
                .or_else(|| DiagramFormat::detect(&self.source.text));
            if let Some(format) = detected {
                ui.weak(format.to_string());
            }
        });
        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            let response = ui.add(
                egui::TextEdit::multiline(&mut self.source.text)
                    .code_editor()
                    .desired_width(f32::INFINITY)
                    .desired_rows(30)
                    .hint_text("Paste Excalidraw JSON or Draw.io XML"),
            );
            if response.changed() {
                let now = ui.input(|i| i.time);
                self.source.edit_debounce.schedule(now, ());
            }
        });
    }
}
