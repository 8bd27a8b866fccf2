//! Zoom, pan and fit-to-view state for a diagram viewer.
//!
//! [`ViewportController`] is a small state machine (idle / panning) driven by
//! pointer and wheel input. The numeric behavior comes from a
//! [`ViewportPolicy`]; two named policies reproduce the two viewer flavours
//! offered by the application.

use crate::constants;
use eframe::egui;

/// How the zoom buttons change the zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomStep {
    /// Multiply (zoom in) or divide (zoom out) by the factor
    Multiplicative(f32),
    /// Add (zoom in) or subtract (zoom out) the amount
    Additive(f32),
}

/// How wheel input is interpreted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelBehavior {
    /// Unmodified wheel scales the zoom; shift+wheel pans horizontally
    ScaleOrPan {
        /// Factor applied when scrolling up
        zoom_in: f32,
        /// Factor applied when scrolling down
        zoom_out: f32,
    },
    /// Wheel changes the zoom by a fixed step, only while ctrl/command is held
    StepWithCommand {
        /// Zoom change per wheel event
        step: f32,
    },
}

/// Modifier keys that turn a primary-button drag into a pan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanModifier {
    /// Alt / Option
    Alt,
    /// Shift
    Shift,
}

impl PanModifier {
    fn is_held(self, modifiers: &egui::Modifiers) -> bool {
        match self {
            PanModifier::Alt => modifiers.alt,
            PanModifier::Shift => modifiers.shift,
        }
    }
}

/// Per-viewer configuration of the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportPolicy {
    /// Zoom button step
    pub step: ZoomStep,
    /// Smallest allowed zoom
    pub min_zoom: f32,
    /// Largest allowed zoom
    pub max_zoom: f32,
    /// Wheel handling
    pub wheel: WheelBehavior,
    /// Modifiers that allow panning with the primary button
    pub pan_modifiers: &'static [PanModifier],
    /// Duration of the zoom/pan transition in seconds
    pub transition_secs: f32,
    /// Whether the grid overlay starts enabled
    pub grid_by_default: bool,
}

impl ViewportPolicy {
    /// The viewer with a grid overlay and free wheel zoom.
    pub const fn grid_viewer() -> Self {
        Self {
            step: ZoomStep::Multiplicative(1.25),
            min_zoom: 0.1,
            max_zoom: 5.0,
            wheel: WheelBehavior::ScaleOrPan {
                zoom_in: 1.1,
                zoom_out: 0.9,
            },
            pan_modifiers: &[PanModifier::Alt, PanModifier::Shift],
            transition_secs: 0.15,
            grid_by_default: true,
        }
    }

    /// The plain viewer, zooming with ctrl/command+wheel only.
    pub const fn plain_viewer() -> Self {
        Self {
            step: ZoomStep::Additive(0.25),
            min_zoom: 0.25,
            max_zoom: 3.0,
            wheel: WheelBehavior::StepWithCommand { step: 0.1 },
            pan_modifiers: &[PanModifier::Alt],
            transition_secs: 0.1,
            grid_by_default: false,
        }
    }

    fn clamp(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

/// The viewer flavours selectable from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerVariant {
    /// [`ViewportPolicy::grid_viewer`]
    Grid,
    /// [`ViewportPolicy::plain_viewer`]
    Plain,
}

impl ViewerVariant {
    /// Every variant, in menu order.
    pub const ALL: [ViewerVariant; 2] = [ViewerVariant::Grid, ViewerVariant::Plain];

    /// Policy backing this variant.
    pub const fn policy(self) -> ViewportPolicy {
        match self {
            ViewerVariant::Grid => ViewportPolicy::grid_viewer(),
            ViewerVariant::Plain => ViewportPolicy::plain_viewer(),
        }
    }

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            ViewerVariant::Grid => "Grid viewer",
            ViewerVariant::Plain => "Plain viewer",
        }
    }
}

/// Zoom, pan and grid flag of one viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ViewportState {
    /// Current zoom level (1.0 = natural size)
    zoom: f32,
    /// Offset of the content center from the canvas center, in screen pixels
    pan: egui::Vec2,
    /// Whether the grid overlay is drawn
    grid_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Panning { last: egui::Pos2 },
}

/// Placement of the content for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Translation of the content center
    pub pan: egui::Vec2,
    /// Scale about the content center
    pub zoom: f32,
    /// Whether changes should be eased in
    pub animate: bool,
    /// Easing duration in seconds
    pub duration: f32,
}

impl ViewTransform {
    /// On-screen rectangle of content of `content_size` inside `canvas`.
    ///
    /// Unpanned content is centered in the canvas.
    pub fn content_rect(&self, canvas: egui::Rect, content_size: egui::Vec2) -> egui::Rect {
        egui::Rect::from_center_size(canvas.center() + self.pan, content_size * self.zoom)
    }
}

/// Zoom/pan state machine of one viewer.
#[derive(Debug, Clone)]
pub struct ViewportController {
    policy: ViewportPolicy,
    state: ViewportState,
    gesture: Gesture,
}

impl ViewportController {
    /// Creates a controller at zoom 1, no pan, grid per the policy.
    pub fn new(policy: ViewportPolicy) -> Self {
        Self {
            policy,
            state: ViewportState {
                zoom: 1.0,
                pan: egui::Vec2::ZERO,
                grid_enabled: policy.grid_by_default,
            },
            gesture: Gesture::Idle,
        }
    }

    /// The active policy.
    pub fn policy(&self) -> &ViewportPolicy {
        &self.policy
    }

    /// Current zoom level.
    pub fn zoom(&self) -> f32 {
        self.state.zoom
    }

    /// Current pan offset.
    pub fn pan(&self) -> egui::Vec2 {
        self.state.pan
    }

    /// Whether the grid overlay is enabled.
    pub fn grid_enabled(&self) -> bool {
        self.state.grid_enabled
    }

    /// Whether a pan gesture is in progress.
    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    /// Handles a button press at `pos`. Returns `true` if a pan started.
    ///
    /// The middle button always pans; the primary button pans only while one
    /// of the policy's pan modifiers is held.
    pub fn press(&mut self, button: egui::PointerButton, pos: egui::Pos2, modifiers: egui::Modifiers) -> bool {
        let starts_pan = match button {
            egui::PointerButton::Middle => true,
            egui::PointerButton::Primary => self
                .policy
                .pan_modifiers
                .iter()
                .any(|m| m.is_held(&modifiers)),
            _ => false,
        };
        if starts_pan {
            self.gesture = Gesture::Panning { last: pos };
        }
        starts_pan
    }

    /// Accumulates the pointer delta into the pan while panning.
    pub fn pointer_moved(&mut self, pos: egui::Pos2) {
        if let Gesture::Panning { last } = &mut self.gesture {
            self.state.pan += pos - *last;
            *last = pos;
        }
    }

    /// Ends any pan gesture.
    pub fn release(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Ends any pan gesture when the pointer leaves the viewer surface.
    pub fn pointer_left(&mut self) {
        self.release();
    }

    /// Handles one wheel event.
    ///
    /// `delta_y` follows the browser convention: negative when scrolling up.
    /// Always returns `true`, meaning the event must not scroll anything else.
    pub fn wheel(&mut self, delta_y: f32, modifiers: egui::Modifiers) -> bool {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return true;
        }
        match self.policy.wheel {
            WheelBehavior::ScaleOrPan { zoom_in, zoom_out } => {
                if modifiers.shift {
                    self.state.pan.x -= delta_y;
                } else {
                    let factor = if delta_y < 0.0 { zoom_in } else { zoom_out };
                    self.set_zoom(self.state.zoom * factor);
                }
            }
            WheelBehavior::StepWithCommand { step } => {
                if modifiers.ctrl || modifiers.command {
                    let delta = if delta_y < 0.0 { step } else { -step };
                    self.set_zoom(self.state.zoom + delta);
                }
            }
        }
        true
    }

    /// Zooms in by one policy step.
    pub fn zoom_in(&mut self) {
        let zoom = match self.policy.step {
            ZoomStep::Multiplicative(factor) => self.state.zoom * factor,
            ZoomStep::Additive(amount) => self.state.zoom + amount,
        };
        self.set_zoom(zoom);
    }

    /// Zooms out by one policy step.
    pub fn zoom_out(&mut self) {
        let zoom = match self.policy.step {
            ZoomStep::Multiplicative(factor) => self.state.zoom / factor,
            ZoomStep::Additive(amount) => self.state.zoom - amount,
        };
        self.set_zoom(zoom);
    }

    /// Sets the zoom, clamped into the policy interval.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.state.zoom = self.policy.clamp(zoom);
        }
    }

    /// Scales `content` to fit inside `container` with a margin, and recenters.
    ///
    /// The zoom never exceeds [`constants::FIT_MAX_ZOOM`] and stays within the
    /// policy interval, whatever the inputs.
    pub fn fit_to_view(&mut self, container: egui::Vec2, content: egui::Vec2) {
        let cap = constants::FIT_MAX_ZOOM;
        let margin = constants::FIT_MARGIN;
        let ratio = |available: f32, extent: f32| {
            if extent.is_finite() && extent > 0.0 && available.is_finite() {
                (available - 2.0 * margin).max(0.0) / extent
            } else {
                cap
            }
        };
        let zoom = ratio(container.x, content.x)
            .min(ratio(container.y, content.y))
            .min(cap);
        let upper = self.policy.max_zoom.min(cap).max(self.policy.min_zoom);
        self.state.zoom = zoom.clamp(self.policy.min_zoom, upper);
        self.state.pan = egui::Vec2::ZERO;
    }

    /// Back to zoom 1 with no pan.
    pub fn reset(&mut self) {
        self.state.zoom = self.policy.clamp(1.0);
        self.state.pan = egui::Vec2::ZERO;
    }

    /// Flips the grid overlay.
    pub fn toggle_grid(&mut self) {
        self.state.grid_enabled = !self.state.grid_enabled;
    }

    /// Transform to apply this frame. Panning is never eased.
    pub fn transform(&self) -> ViewTransform {
        ViewTransform {
            pan: self.state.pan,
            zoom: self.state.zoom,
            animate: !self.is_panning(),
            duration: self.policy.transition_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> ViewportController {
        ViewportController::new(ViewportPolicy::grid_viewer())
    }

    fn plain() -> ViewportController {
        ViewportController::new(ViewportPolicy::plain_viewer())
    }

    #[test]
    fn zoom_buttons_never_pass_the_upper_limit() {
        let mut viewer = grid();
        for _ in 0..50 {
            viewer.zoom_in();
        }
        assert_eq!(viewer.zoom(), 5.0);

        let mut viewer = plain();
        for _ in 0..50 {
            viewer.zoom_in();
        }
        assert_eq!(viewer.zoom(), 3.0);
    }

    #[test]
    fn zoom_buttons_never_pass_the_lower_limit() {
        let mut viewer = grid();
        for _ in 0..50 {
            viewer.zoom_out();
        }
        assert!((viewer.zoom() - 0.1).abs() < 1e-6);

        let mut viewer = plain();
        for _ in 0..50 {
            viewer.zoom_out();
        }
        assert_eq!(viewer.zoom(), 0.25);
    }

    #[test]
    fn zoom_steps_follow_the_policy() {
        let mut viewer = grid();
        viewer.zoom_in();
        assert!((viewer.zoom() - 1.25).abs() < 1e-6);

        let mut viewer = plain();
        viewer.zoom_out();
        assert!((viewer.zoom() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn pointer_motion_in_idle_does_not_pan() {
        let mut viewer = grid();
        viewer.pointer_moved(egui::pos2(10.0, 10.0));
        viewer.pointer_moved(egui::pos2(50.0, 80.0));
        assert_eq!(viewer.pan(), egui::Vec2::ZERO);
    }

    #[test]
    fn middle_drag_accumulates_pan() {
        let mut viewer = plain();
        assert!(viewer.press(egui::PointerButton::Middle, egui::pos2(10.0, 10.0), egui::Modifiers::NONE));
        viewer.pointer_moved(egui::pos2(20.0, 15.0));
        viewer.pointer_moved(egui::pos2(50.0, 5.0));
        assert_eq!(viewer.pan(), egui::vec2(40.0, -5.0));
        assert!(!viewer.transform().animate);

        viewer.release();
        viewer.pointer_moved(egui::pos2(500.0, 500.0));
        assert_eq!(viewer.pan(), egui::vec2(40.0, -5.0));
        assert!(viewer.transform().animate);
    }

    #[test]
    fn primary_press_pans_only_with_policy_modifiers() {
        let mut viewer = plain();
        assert!(!viewer.press(egui::PointerButton::Primary, egui::Pos2::ZERO, egui::Modifiers::NONE));
        assert!(!viewer.press(egui::PointerButton::Primary, egui::Pos2::ZERO, egui::Modifiers::SHIFT));
        assert!(viewer.press(egui::PointerButton::Primary, egui::Pos2::ZERO, egui::Modifiers::ALT));

        let mut viewer = grid();
        assert!(viewer.press(egui::PointerButton::Primary, egui::Pos2::ZERO, egui::Modifiers::SHIFT));
        assert!(!viewer.press(egui::PointerButton::Secondary, egui::Pos2::ZERO, egui::Modifiers::ALT));
    }

    #[test]
    fn leaving_the_surface_ends_the_pan() {
        let mut viewer = grid();
        viewer.press(egui::PointerButton::Middle, egui::Pos2::ZERO, egui::Modifiers::NONE);
        viewer.pointer_left();
        assert!(!viewer.is_panning());
        viewer.pointer_moved(egui::pos2(30.0, 30.0));
        assert_eq!(viewer.pan(), egui::Vec2::ZERO);
    }

    #[test]
    fn grid_viewer_wheel_zooms_or_pans() {
        let mut viewer = grid();
        assert!(viewer.wheel(-100.0, egui::Modifiers::NONE));
        assert!((viewer.zoom() - 1.1).abs() < 1e-6);
        assert!(viewer.wheel(100.0, egui::Modifiers::NONE));
        assert!((viewer.zoom() - 0.99).abs() < 1e-6);

        assert!(viewer.wheel(30.0, egui::Modifiers::SHIFT));
        assert_eq!(viewer.pan(), egui::vec2(-30.0, 0.0));
    }

    #[test]
    fn plain_viewer_wheel_needs_command() {
        let mut viewer = plain();
        // consumed even when nothing changes
        assert!(viewer.wheel(-100.0, egui::Modifiers::NONE));
        assert_eq!(viewer.zoom(), 1.0);

        viewer.wheel(-100.0, egui::Modifiers::CTRL);
        assert!((viewer.zoom() - 1.1).abs() < 1e-6);
        viewer.wheel(100.0, egui::Modifiers::COMMAND);
        assert!((viewer.zoom() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn fit_to_view_scales_down_and_recenters() {
        let mut viewer = grid();
        viewer.press(egui::PointerButton::Middle, egui::Pos2::ZERO, egui::Modifiers::NONE);
        viewer.pointer_moved(egui::pos2(40.0, 40.0));
        viewer.release();

        viewer.fit_to_view(egui::vec2(440.0, 1000.0), egui::vec2(800.0, 200.0));
        assert!((viewer.zoom() - 0.5).abs() < 1e-6);
        assert_eq!(viewer.pan(), egui::Vec2::ZERO);
    }

    #[test]
    fn fit_to_view_caps_small_content() {
        let mut viewer = grid();
        viewer.fit_to_view(egui::vec2(1000.0, 1000.0), egui::vec2(10.0, 10.0));
        assert_eq!(viewer.zoom(), 2.0);
    }

    #[test]
    fn fit_to_view_survives_degenerate_input() {
        let cases = [
            (egui::vec2(0.0, 0.0), egui::vec2(100.0, 100.0)),
            (egui::vec2(10.0, 10.0), egui::vec2(100.0, 100.0)),
            (egui::vec2(500.0, 500.0), egui::vec2(0.0, 0.0)),
            (egui::vec2(500.0, 500.0), egui::vec2(f32::NAN, 50.0)),
            (egui::vec2(f32::INFINITY, 500.0), egui::vec2(-5.0, 50.0)),
        ];
        for policy in [ViewportPolicy::grid_viewer(), ViewportPolicy::plain_viewer()] {
            for (container, content) in cases {
                let mut viewer = ViewportController::new(policy);
                viewer.fit_to_view(container, content);
                let zoom = viewer.zoom();
                assert!(zoom > 0.0 && zoom <= 2.0, "zoom {} for {:?} / {:?}", zoom, container, content);
                assert!(zoom >= policy.min_zoom);
            }
        }
    }

    #[test]
    fn reset_and_grid_toggle() {
        let mut viewer = grid();
        assert!(viewer.grid_enabled());
        assert!(!plain().grid_enabled());

        viewer.zoom_in();
        viewer.wheel(10.0, egui::Modifiers::SHIFT);
        viewer.reset();
        assert_eq!(viewer.zoom(), 1.0);
        assert_eq!(viewer.pan(), egui::Vec2::ZERO);

        viewer.toggle_grid();
        assert!(!viewer.grid_enabled());
    }

    #[test]
    fn content_rect_is_centered_and_scaled() {
        let mut viewer = plain();
        viewer.zoom_in();
        viewer.press(egui::PointerButton::Middle, egui::Pos2::ZERO, egui::Modifiers::NONE);
        viewer.pointer_moved(egui::pos2(10.0, 0.0));
        let canvas = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(400.0, 300.0));
        let rect = viewer.transform().content_rect(canvas, egui::vec2(100.0, 60.0));
        assert_eq!(rect.center(), egui::pos2(210.0, 150.0));
        assert_eq!(rect.size(), egui::vec2(125.0, 75.0));
        assert_eq!(viewer.transform().duration, 0.1);
    }
}
