//! Viewer rendering: grid overlay, the diagram texture and inline messages.

use super::state::DiagramApp;
use crate::render::{MessageKind, Preview};
use crate::viewport::ViewTransform;
use eframe::egui;

const MESSAGE_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 116, 139);
const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 38, 38);

impl DiagramApp {
    /// Renders the viewer contents in layers: background, grid, diagram, hint.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The egui context, used for textures and animation
    /// * `painter` - The painter clipped to the viewer
    /// * `canvas_rect` - The screen-space rectangle of the viewer
    pub fn render_viewer(&mut self, ctx: &egui::Context, painter: &egui::Painter, canvas_rect: egui::Rect) {
        painter.rect_filled(canvas_rect, 0.0, egui::Color32::from_gray(248));

        if self.viewer.controller.grid_enabled() {
            self.draw_grid(painter, canvas_rect);
        }

        if matches!(self.preview, Preview::Ready(_)) {
            self.ensure_texture(ctx);
            self.draw_diagram(ctx, painter, canvas_rect);
        }
        match &self.preview {
            Preview::Empty => {
                self.draw_message(
                    painter,
                    canvas_rect,
                    "Nothing to preview",
                    "Open a document or pick an example",
                    MESSAGE_COLOR,
                );
            }
            Preview::Message { kind, title, detail } => {
                let color = match kind {
                    MessageKind::Error => ERROR_COLOR,
                    MessageKind::Notice => MESSAGE_COLOR,
                };
                self.draw_message(painter, canvas_rect, title, detail, color);
            }
            Preview::Ready(_) => {}
        }

        painter.text(
            canvas_rect.left_bottom() + egui::vec2(8.0, -8.0),
            egui::Align2::LEFT_BOTTOM,
            self.pan_hint(),
            egui::FontId::proportional(11.0),
            MESSAGE_COLOR,
        );
    }

    /// Rebuilds the diagram texture if the preview changed since the last build.
    pub fn ensure_texture(&mut self, ctx: &egui::Context) {
        if !self.viewer.texture_stale {
            return;
        }
        self.viewer.texture_stale = false;
        self.viewer.texture = None;
        self.viewer.raster_error = None;

        let Some(diagram) = self.preview.diagram() else {
            return;
        };
        // Stay within the backend's texture limit; export keeps full density
        let max_side = ctx.input(|i| i.max_texture_side);
        let exporter = self
            .export
            .exporter
            .limited_to(max_side, diagram.width, diagram.height);
        if exporter != self.export.exporter {
            log::debug!(
                "viewer texture density lowered to {:.3} (max side {})",
                exporter.pixel_density(),
                max_side
            );
        }
        match exporter.rasterize(&diagram.markup) {
            Ok(pixmap) => {
                let size = [pixmap.width() as usize, pixmap.height() as usize];
                let image = egui::ColorImage::from_rgba_premultiplied(size, pixmap.data());
                self.viewer.texture = Some(ctx.load_texture("diagram", image, egui::TextureOptions::LINEAR));
            }
            Err(err) => {
                log::warn!("could not rasterize diagram: {}", err);
                self.viewer.raster_error = Some(err.to_string());
            }
        }
    }

    /// Paints the diagram texture under the (eased) viewport transform.
    fn draw_diagram(&self, ctx: &egui::Context, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let Some(diagram) = self.preview.diagram() else {
            return;
        };
        if let Some(err) = &self.viewer.raster_error {
            self.draw_message(painter, canvas_rect, "Render Error", err, ERROR_COLOR);
            return;
        }
        let Some(texture) = &self.viewer.texture else {
            return;
        };

        let shown = eased_transform(ctx, self.viewer.controller.transform());
        let content_size = egui::vec2(diagram.width as f32, diagram.height as f32);
        let rect = shown.content_rect(canvas_rect, content_size);
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        painter.image(texture.id(), rect, uv, egui::Color32::WHITE);
    }

    /// Draws a fixed screen-space grid across the viewer.
    ///
    /// # Arguments
    ///
    /// * `painter` - The egui painter for drawing operations
    /// * `canvas_rect` - The screen-space rectangle defining visible area
    pub fn draw_grid(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let grid_size = crate::constants::GRID_SIZE;
        let grid_color = egui::Color32::from_rgba_unmultiplied(128, 128, 128, 32);
        let stroke = egui::Stroke::new(1.0, grid_color);

        // Draw vertical grid lines
        let mut x = canvas_rect.left();
        while x <= canvas_rect.right() {
            painter.line_segment(
                [egui::pos2(x, canvas_rect.top()), egui::pos2(x, canvas_rect.bottom())],
                stroke,
            );
            x += grid_size;
        }

        // Draw horizontal grid lines
        let mut y = canvas_rect.top();
        while y <= canvas_rect.bottom() {
            painter.line_segment(
                [egui::pos2(canvas_rect.left(), y), egui::pos2(canvas_rect.right(), y)],
                stroke,
            );
            y += grid_size;
        }
    }

    /// Draws a centered title and detail line in place of the diagram.
    fn draw_message(
        &self,
        painter: &egui::Painter,
        canvas_rect: egui::Rect,
        title: &str,
        detail: &str,
        color: egui::Color32,
    ) {
        let center = canvas_rect.center();
        painter.text(
            center - egui::vec2(0.0, 12.0),
            egui::Align2::CENTER_CENTER,
            title,
            egui::FontId::proportional(16.0),
            color,
        );
        painter.text(
            center + egui::vec2(0.0, 12.0),
            egui::Align2::CENTER_CENTER,
            detail,
            egui::FontId::monospace(12.0),
            MESSAGE_COLOR,
        );
    }

    fn pan_hint(&self) -> &'static str {
        let modifiers = self.viewer.controller.policy().pan_modifiers;
        if modifiers.len() > 1 {
            "Alt/Shift+Drag or Middle-click to pan, scroll to zoom"
        } else {
            "Alt+Drag or Middle-click to pan, Ctrl+Scroll to zoom"
        }
    }
}

/// Eases zoom and pan toward the controller's target, except while panning.
fn eased_transform(ctx: &egui::Context, target: ViewTransform) -> ViewTransform {
    let id = egui::Id::new("viewer_transform");
    let time = if target.animate { target.duration } else { 0.0 };
    let ease = |key: &str, value: f32| {
        let eased = ctx.animate_value_with_time(id.with(key), value, time);
        if target.animate {
            eased
        } else {
            value
        }
    };
    let zoom = ease("zoom", target.zoom);
    let pan = egui::vec2(ease("pan_x", target.pan.x), ease("pan_y", target.pan.y));
    ViewTransform { zoom, pan, ..target }
}
