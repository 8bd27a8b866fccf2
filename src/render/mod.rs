//! SVG rendering of diagram element lists.
//!
//! Two renderers implement [`SvgRenderer`], one per source model:
//!
//! - [`FreeformRenderer`] - container/shape model (Excalidraw)
//! - [`DrawGraphRenderer`] - cell/edge graph model (Draw.io)
//!
//! Both lay the diagram out in a frame sized to the content bounds plus
//! [`constants::PADDING`] on every side, translated so the bounds' minimum
//! corner lands at `(PADDING, PADDING)`.

mod drawio;
mod freeform;

pub use drawio::DrawGraphRenderer;
pub use freeform::FreeformRenderer;

use crate::bounds::{compute_bounds, is_positionable};
use crate::constants;
use crate::error::{DiagramError, Result};
use crate::parse::parse_source;
use crate::types::*;
use std::fmt::{self, Write as _};

/// Default text color for labels and free text.
pub(crate) const TEXT_COLOR: &str = "#1e293b";

/// Maps a diagram model onto a standalone SVG document.
pub trait SvgRenderer {
    /// Renders `elements` laid out from `bounds`.
    ///
    /// Returns [`DiagramError::NoRenderableContent`] when no element can be
    /// positioned, so callers can show a placeholder instead of an empty image.
    fn render(&self, elements: &[DiagramElement], bounds: &Bounds) -> Result<String>;
}

/// Returns the renderer matching a source format.
pub fn renderer_for(format: DiagramFormat) -> &'static dyn SvgRenderer {
    match format {
        DiagramFormat::Excalidraw => &FreeformRenderer,
        DiagramFormat::DrawIo => &DrawGraphRenderer,
    }
}

/// Parses, measures and renders a source document in one pass.
pub fn render_source(source: &str, format: DiagramFormat) -> Result<RenderedDiagram> {
    let elements = parse_source(source, format)?;
    let bounds = compute_bounds(&elements);
    let markup = renderer_for(format).render(&elements, &bounds)?;
    let frame = Frame::new(&bounds);
    Ok(RenderedDiagram {
        markup,
        bounds,
        width: frame.width,
        height: frame.height,
    })
}

/// How an inline message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// The source could not be rendered
    Error,
    /// The source is fine but there is nothing to show
    Notice,
}

/// What the viewer should display for a given source.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    /// No source yet
    Empty,
    /// A rendered diagram
    Ready(RenderedDiagram),
    /// An inline message standing in for the diagram
    Message {
        /// Error or plain notice
        kind: MessageKind,
        /// Short heading
        title: &'static str,
        /// Underlying cause
        detail: String,
    },
}

impl Preview {
    /// Renders `source`, turning parse and empty-content failures into inline messages.
    ///
    /// When `format` is `None` it is detected from the source text.
    pub fn from_source(source: &str, format: Option<DiagramFormat>) -> Self {
        if source.trim().is_empty() {
            return Preview::Empty;
        }
        let Some(format) = format.or_else(|| DiagramFormat::detect(source)) else {
            return Preview::Message {
                kind: MessageKind::Error,
                title: "Render Error",
                detail: "unrecognized document format".to_string(),
            };
        };
        match render_source(source, format) {
            Ok(diagram) => Preview::Ready(diagram),
            Err(err @ DiagramError::NoRenderableContent) => {
                log::debug!("nothing to render: {}", err);
                Preview::Message {
                    kind: MessageKind::Notice,
                    title: "Preview not available",
                    detail: err.to_string(),
                }
            }
            Err(err) => {
                log::warn!("render failed: {}", err);
                Preview::Message {
                    kind: MessageKind::Error,
                    title: "Render Error",
                    detail: err.to_string(),
                }
            }
        }
    }

    /// The rendered diagram, if any.
    pub fn diagram(&self) -> Option<&RenderedDiagram> {
        match self {
            Preview::Ready(diagram) => Some(diagram),
            _ => None,
        }
    }
}

/// Fails with [`DiagramError::NoRenderableContent`] if nothing can be positioned.
pub(crate) fn ensure_renderable(elements: &[DiagramElement]) -> Result<()> {
    if elements.iter().any(is_positionable) {
        Ok(())
    } else {
        Err(DiagramError::NoRenderableContent)
    }
}

/// Default fill/stroke pair for a shape kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Fill color
    pub fill: &'static str,
    /// Stroke color
    pub stroke: &'static str,
}

const PALETTES: &[(ShapeKind, Palette)] = &[
    (ShapeKind::Rectangle, Palette { fill: "#e0e7ff", stroke: "#6366f1" }),
    (ShapeKind::Ellipse, Palette { fill: "#d1fae5", stroke: "#10b981" }),
    (ShapeKind::Diamond, Palette { fill: "#fef3c7", stroke: "#f59e0b" }),
    (ShapeKind::Cylinder, Palette { fill: "#e0f2fe", stroke: "#0ea5e9" }),
];

/// Looks up the default palette of a shape kind.
pub fn palette(kind: ShapeKind) -> Palette {
    PALETTES
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, p)| *p)
        .unwrap_or(PALETTES[0].1)
}

/// Returns a source color unless it is missing, blank, or a transparent/none sentinel.
pub(crate) fn usable_color(value: Option<&str>) -> Option<&str> {
    let value = value?.trim();
    let sentinel = value.is_empty()
        || value.eq_ignore_ascii_case("transparent")
        || value.eq_ignore_ascii_case("none");
    (!sentinel).then_some(value)
}

/// Escapes the XML-significant characters of text content.
pub fn escape_xml(input: &str) -> String {
    let mut s = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            _ => s.push(ch),
        }
    }
    s
}

/// Escapes a value placed inside a double-quoted attribute.
pub(crate) fn escape_attr(input: &str) -> String {
    escape_xml(input).replace('"', "&quot;")
}

/// Number formatting for coordinates: at most two decimals, no trailing zeros.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Num(pub f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = (self.0 * 100.0).round() / 100.0;
        // avoid "-0"
        let rounded = if rounded == 0.0 { 0.0 } else { rounded };
        write!(f, "{}", rounded)
    }
}

/// The output coordinate frame derived from content bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Frame {
    offset_x: f64,
    offset_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(bounds: &Bounds) -> Self {
        let padding = constants::PADDING;
        Self {
            offset_x: padding - bounds.min_x,
            offset_y: padding - bounds.min_y,
            width: bounds.width() + 2.0 * padding,
            height: bounds.height() + 2.0 * padding,
        }
    }

    /// Maps a diagram point into the frame.
    pub fn map(&self, p: Point) -> Point {
        Point::new(p.x + self.offset_x, p.y + self.offset_y)
    }

    /// Opens the document and writes the given `<defs>` body.
    pub fn write_header(&self, out: &mut String, defs: &str) {
        let _ = writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = Num(self.width),
            h = Num(self.height)
        );
        let _ = writeln!(out, "<defs>{}</defs>", defs);
    }
}

/// A shape's box in frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ShapeBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl ShapeBox {
    pub fn of(shape: &Shape, frame: &Frame) -> Self {
        let origin = frame.map(shape.position);
        let size = effective_size(shape.size);
        Self {
            x: origin.x,
            y: origin.y,
            w: size.width,
            h: size.height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Paint attributes shared by every shape primitive.
pub(crate) struct Paint<'a> {
    pub fill: &'a str,
    pub stroke: &'a str,
    pub corner_radius: f64,
    pub filter: &'a str,
}

/// Writes the primitive for one shape kind.
pub(crate) fn write_shape(out: &mut String, kind: ShapeKind, b: ShapeBox, paint: &Paint) {
    let common = format!(
        "fill=\"{}\" stroke=\"{}\" stroke-width=\"2\" filter=\"url(#{})\"",
        escape_attr(paint.fill),
        escape_attr(paint.stroke),
        paint.filter
    );
    let c = b.center();
    match kind {
        ShapeKind::Rectangle => {
            let _ = writeln!(
                out,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" {}/>",
                Num(b.x),
                Num(b.y),
                Num(b.w),
                Num(b.h),
                Num(paint.corner_radius),
                common
            );
        }
        ShapeKind::Ellipse => {
            let _ = writeln!(
                out,
                "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" {}/>",
                Num(c.x),
                Num(c.y),
                Num(b.w / 2.0),
                Num(b.h / 2.0),
                common
            );
        }
        ShapeKind::Diamond => {
            let _ = writeln!(
                out,
                "<polygon points=\"{},{} {},{} {},{} {},{}\" {}/>",
                Num(c.x),
                Num(b.y),
                Num(b.x + b.w),
                Num(c.y),
                Num(c.x),
                Num(b.y + b.h),
                Num(b.x),
                Num(c.y),
                common
            );
        }
        ShapeKind::Cylinder => {
            let rx = b.w / 2.0;
            let ry = (b.h * 0.15).min(12.0);
            let (left, right) = (b.x, b.x + b.w);
            let (top, bottom) = (b.y + ry, b.y + b.h - ry);
            let _ = writeln!(
                out,
                "<path d=\"M {l},{t} L {l},{bt} A {rx},{ry} 0 0 0 {r},{bt} L {r},{t} A {rx},{ry} 0 0 0 {l},{t} Z\" {common}/>",
                l = Num(left),
                r = Num(right),
                t = Num(top),
                bt = Num(bottom),
                rx = Num(rx),
                ry = Num(ry),
                common = common
            );
            // front rim of the lid
            let _ = writeln!(
                out,
                "<path d=\"M {l},{t} A {rx},{ry} 0 0 0 {r},{t}\" fill=\"none\" stroke=\"{s}\" stroke-width=\"2\"/>",
                l = Num(left),
                r = Num(right),
                t = Num(top),
                rx = Num(rx),
                ry = Num(ry),
                s = escape_attr(paint.stroke)
            );
        }
    }
}

/// Vertical placement of a text block relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextAnchor {
    /// Lines are centered on the anchor, horizontally and vertically
    Center,
    /// The first line hangs from the anchor, left aligned
    TopLeft,
}

/// Text appearance.
pub(crate) struct TextStyle<'a> {
    pub font_size: f64,
    pub fill: &'a str,
    pub font_weight: Option<&'a str>,
}

/// Writes a possibly multi-line text block, escaping its content.
pub(crate) fn write_text(out: &mut String, at: Point, content: &str, anchor: TextAnchor, style: &TextStyle) {
    let lines: Vec<&str> = content.lines().collect();
    let (alignment, baseline) = match anchor {
        TextAnchor::Center => (" text-anchor=\"middle\"", "central"),
        TextAnchor::TopLeft => ("", "hanging"),
    };
    let weight = style
        .font_weight
        .map(|w| format!(" font-weight=\"{}\"", w))
        .unwrap_or_default();
    let _ = write!(
        out,
        "<text x=\"{}\" y=\"{}\"{} dominant-baseline=\"{}\" fill=\"{}\" font-size=\"{}\" font-family=\"{}\"{}>",
        Num(at.x),
        Num(at.y),
        alignment,
        baseline,
        style.fill,
        Num(style.font_size),
        constants::FONT_FAMILY,
        weight
    );

    if lines.len() <= 1 {
        let _ = write!(out, "{}", escape_xml(lines.first().copied().unwrap_or_default()));
    } else {
        let line_height = style.font_size * constants::LINE_HEIGHT_FACTOR;
        let first_dy = match anchor {
            TextAnchor::Center => -(lines.len() as f64 - 1.0) * line_height / 2.0,
            TextAnchor::TopLeft => 0.0,
        };
        for (i, line) in lines.iter().enumerate() {
            let dy = if i == 0 { first_dy } else { line_height };
            let _ = write!(
                out,
                "<tspan x=\"{}\" dy=\"{}\">{}</tspan>",
                Num(at.x),
                Num(dy),
                escape_xml(line)
            );
        }
    }
    let _ = writeln!(out, "</text>");
}

/// Writes a label on a small opaque backing rectangle centered at `at`.
pub(crate) fn write_backed_label(out: &mut String, at: Point, label: &str, font_size: f64, fill: &str) {
    let longest = label.lines().map(|l| l.chars().count()).max().unwrap_or(0) as f64;
    let rows = label.lines().count().max(1) as f64;
    let width = (longest * font_size * 0.6 + 12.0).max(40.0);
    let height = (rows * font_size * constants::LINE_HEIGHT_FACTOR + 6.0).max(20.0);
    let _ = writeln!(
        out,
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"white\" rx=\"4\"/>",
        Num(at.x - width / 2.0),
        Num(at.y - height / 2.0),
        Num(width),
        Num(height)
    );
    write_text(
        out,
        at,
        label,
        TextAnchor::Center,
        &TextStyle {
            font_size,
            fill,
            font_weight: None,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_xml_neutralizes_markup() {
        assert_eq!(escape_xml("<script>x</script>"), "&lt;script&gt;x&lt;/script&gt;");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_attr("say \"hi\""), "say &quot;hi&quot;");
    }

    #[test]
    fn numbers_are_compact() {
        assert_eq!(Num(60.0).to_string(), "60");
        assert_eq!(Num(0.1 + 0.2).to_string(), "0.3");
        assert_eq!(Num(-0.001).to_string(), "0");
        assert_eq!(Num(12.346).to_string(), "12.35");
    }

    #[test]
    fn palettes_are_distinct_per_kind() {
        assert_eq!(palette(ShapeKind::Rectangle).fill, "#e0e7ff");
        assert_eq!(palette(ShapeKind::Ellipse).stroke, "#10b981");
        assert_eq!(palette(ShapeKind::Diamond).fill, "#fef3c7");
        assert_eq!(palette(ShapeKind::Cylinder).stroke, "#0ea5e9");
    }

    #[test]
    fn sentinel_colors_are_unusable() {
        assert_eq!(usable_color(Some("#ff0000")), Some("#ff0000"));
        assert_eq!(usable_color(Some("transparent")), None);
        assert_eq!(usable_color(Some("NONE")), None);
        assert_eq!(usable_color(Some("  ")), None);
        assert_eq!(usable_color(None), None);
    }

    #[test]
    fn frame_maps_min_corner_to_padding() {
        let bounds = Bounds { min_x: -20.0, min_y: 10.0, max_x: 80.0, max_y: 70.0 };
        let frame = Frame::new(&bounds);
        assert_eq!(frame.map(Point::new(-20.0, 10.0)), Point::new(60.0, 60.0));
        assert_eq!(frame.width, 220.0);
        assert_eq!(frame.height, 180.0);
    }

    #[test]
    fn multi_line_text_uses_tspans() {
        let mut out = String::new();
        let style = TextStyle { font_size: 10.0, fill: TEXT_COLOR, font_weight: None };
        write_text(&mut out, Point::new(0.0, 0.0), "one\ntwo", TextAnchor::Center, &style);
        assert_eq!(out.matches("<tspan").count(), 2);
        assert!(out.contains("dy=\"-6.25\""));
    }

    #[test]
    fn preview_surfaces_failures_as_messages() {
        assert_eq!(Preview::from_source("   ", None), Preview::Empty);

        match Preview::from_source("{\"elements\": [", None) {
            Preview::Message { kind, title, detail } => {
                assert_eq!(kind, MessageKind::Error);
                assert_eq!(title, "Render Error");
                assert!(detail.contains("Excalidraw"));
            }
            other => panic!("expected message, got {:?}", other),
        }

        match Preview::from_source("{\"elements\": []}", None) {
            Preview::Message { kind, title, detail } => {
                assert_eq!(kind, MessageKind::Notice);
                assert_eq!(title, "Preview not available");
                assert!(detail.contains("no renderable content"));
            }
            other => panic!("expected message, got {:?}", other),
        }

        assert!(matches!(
            Preview::from_source("graph TD; A-->B", None),
            Preview::Message { kind: MessageKind::Error, .. }
        ));
    }

    #[test]
    fn render_source_reports_document_size() {
        let source = r#"{"elements":[{"id":"r","type":"rectangle","x":0,"y":0,"width":100,"height":60}]}"#;
        let diagram = render_source(source, DiagramFormat::Excalidraw).unwrap();
        assert_eq!(diagram.width, 220.0);
        assert_eq!(diagram.height, 180.0);
        assert!(diagram.markup.starts_with("<svg"));
        assert!(diagram.markup.trim_end().ends_with("</svg>"));
    }
}
