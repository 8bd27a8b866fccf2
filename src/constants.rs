//! Shared application-wide constants.
//! Centralizes tweakable values used across rendering, the viewport and export.

// Geometry
/// Padding (in diagram units) added on every side of the content bounds in rendered SVG.
pub const PADDING: f64 = 60.0;
/// Width substituted for elements without an explicit, positive width.
pub const DEFAULT_SHAPE_WIDTH: f64 = 100.0;
/// Height substituted for elements without an explicit, positive height.
pub const DEFAULT_SHAPE_HEIGHT: f64 = 60.0;
/// Width of the bounds returned when nothing in a diagram can be positioned.
pub const FALLBACK_WIDTH: f64 = 400.0;
/// Height of the bounds returned when nothing in a diagram can be positioned.
pub const FALLBACK_HEIGHT: f64 = 300.0;

// Text
/// Font size for labels centered inside container shapes.
pub const CONTAINER_LABEL_FONT_SIZE: f64 = 14.0;
/// Font size for cell labels in the cell/edge graph renderer.
pub const CELL_LABEL_FONT_SIZE: f64 = 13.0;
/// Font size for edge labels.
pub const EDGE_LABEL_FONT_SIZE: f64 = 11.0;
/// Font size for free-standing text lacking an explicit size.
pub const DEFAULT_TEXT_FONT_SIZE: f64 = 16.0;
/// Line height as a multiple of the font size for multi-line text.
pub const LINE_HEIGHT_FACTOR: f64 = 1.25;
/// Font family used for every text primitive.
pub const FONT_FAMILY: &str = "system-ui, sans-serif";

// Viewport
/// Margin (in screen pixels) kept around content by fit-to-view.
pub const FIT_MARGIN: f32 = 20.0;
/// Upper bound on the zoom level chosen by fit-to-view.
pub const FIT_MAX_ZOOM: f32 = 2.0;
/// Delay before the automatic fit-to-view runs after new content arrives.
pub const FIT_DEBOUNCE_SECS: f64 = 0.1;
/// Delay before an edited source is re-rendered.
pub const EDIT_DEBOUNCE_SECS: f64 = 0.3;

// Grid/drawing
/// Grid cell size of the viewer overlay, in screen pixels.
pub const GRID_SIZE: f32 = 20.0;

// Export
/// Pixel density multiplier used for raster export and on-screen rasterization.
pub const EXPORT_PIXEL_DENSITY: f32 = 2.0;
/// File name offered when saving an exported raster image.
pub const EXPORT_FILE_NAME: &str = "diagram.png";
