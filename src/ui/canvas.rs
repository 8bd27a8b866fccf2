//! Viewer surface interaction and navigation.
//!
//! This module maps egui pointer and wheel events onto the
//! [`ViewportController`](crate::viewport::ViewportController) and runs the
//! automatic fit-to-view.

use super::state::DiagramApp;
use eframe::egui;
use std::time::Duration;

impl DiagramApp {
    /// Draws the viewer surface and handles its input.
    ///
    /// # Arguments
    ///
    /// * `ui` - The egui UI context
    pub fn draw_viewer(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let canvas_rect = response.rect;
        self.viewer.canvas_size = canvas_rect.size();

        // Pan and zoom from raw pointer/wheel events
        self.handle_viewer_input(ui, canvas_rect);

        // Automatic fit once new content has settled
        let now = ui.input(|i| i.time);
        if self.viewer.fit_debounce.poll(now).is_some() {
            self.fit_to_view();
        } else if let Some(remaining) = self.viewer.fit_debounce.remaining(now) {
            ui.ctx()
                .request_repaint_after(Duration::from_secs_f64(remaining));
        }

        self.render_viewer(ui.ctx(), &painter, canvas_rect);
    }

    /// Feeds this frame's pointer and wheel events to the viewport controller.
    ///
    /// Presses only count inside `canvas_rect`; moving outside it while
    /// panning ends the pan. Wheel events over the viewer are consumed so no
    /// other widget scrolls.
    ///
    /// # Arguments
    ///
    /// * `ui` - The egui UI context
    /// * `canvas_rect` - Screen-space rectangle of the viewer
    pub fn handle_viewer_input(&mut self, ui: &mut egui::Ui, canvas_rect: egui::Rect) {
        let (events, hover_pos) = ui.input(|i| (i.events.clone(), i.pointer.hover_pos()));
        let controller = &mut self.viewer.controller;
        let mut consumed_wheel = false;

        for event in events {
            match event {
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    modifiers,
                } => {
                    if !pressed {
                        controller.release();
                    } else if canvas_rect.contains(pos) {
                        controller.press(button, pos, modifiers);
                    }
                }
                egui::Event::PointerMoved(pos) => {
                    if controller.is_panning() && !canvas_rect.contains(pos) {
                        controller.pointer_left();
                    } else {
                        controller.pointer_moved(pos);
                    }
                }
                egui::Event::PointerGone => controller.pointer_left(),
                egui::Event::MouseWheel {
                    unit,
                    delta,
                    modifiers,
                    ..
                } => {
                    if !hover_pos.is_some_and(|p| canvas_rect.contains(p)) {
                        continue;
                    }
                    // Shift+wheel may already arrive as horizontal scroll
                    let raw = if delta.y != 0.0 { delta.y } else { delta.x };
                    let points = match unit {
                        egui::MouseWheelUnit::Point => raw,
                        egui::MouseWheelUnit::Line => raw * 40.0,
                        egui::MouseWheelUnit::Page => raw * canvas_rect.height(),
                    };
                    // egui reports scrolling up as positive
                    consumed_wheel |= controller.wheel(-points, modifiers);
                }
                _ => {}
            }
        }

        if consumed_wheel {
            ui.ctx().input_mut(|i| {
                i.smooth_scroll_delta = egui::Vec2::ZERO;
                i.raw_scroll_delta = egui::Vec2::ZERO;
            });
        }
    }

    /// Fits the current diagram into the last known viewer size.
    pub fn fit_to_view(&mut self) {
        let Some(diagram) = self.preview.diagram() else {
            return;
        };
        let content = egui::vec2(diagram.width as f32, diagram.height as f32);
        self.viewer
            .controller
            .fit_to_view(self.viewer.canvas_size, content);
    }
}
