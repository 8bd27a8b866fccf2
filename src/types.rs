//! Core data types shared by the parsers, the bounds calculator and the renderers.
//!
//! A diagram is a flat, ordered list of [`DiagramElement`]s. Relations between
//! elements (a label belonging to a container, an edge attached to two cells)
//! are expressed with string identifiers and resolved by lookup at render time.

use crate::constants;
use std::fmt;

/// A point in diagram coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Creates a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An explicit element size in diagram units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Size {
    /// Creates a size from its dimensions.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Resolves an optional explicit size to a usable one.
///
/// Each dimension that is missing, non-finite or not strictly positive is
/// replaced by the default shape dimension, so the result always spans a
/// non-degenerate area.
pub fn effective_size(size: Option<Size>) -> Size {
    let pick = |value: Option<f64>, default: f64| match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => default,
    };
    Size {
        width: pick(size.map(|s| s.width), constants::DEFAULT_SHAPE_WIDTH),
        height: pick(size.map(|s| s.height), constants::DEFAULT_SHAPE_HEIGHT),
    }
}

/// The geometric kind of a shape element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Axis-aligned rectangle, optionally with rounded corners
    Rectangle,
    /// Ellipse inscribed in the shape box
    Ellipse,
    /// Rhombus touching the midpoints of the shape box edges
    Diamond,
    /// Cylinder (database symbol) filling the shape box
    Cylinder,
}

/// Visual style carried by an element in its source document.
///
/// Colors are kept verbatim; renderers decide whether a value is usable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeStyle {
    /// Fill color, if the source specified one
    pub fill: Option<String>,
    /// Stroke color, if the source specified one
    pub stroke: Option<String>,
    /// Whether corners should be rounded
    pub rounded: bool,
}

/// A closed shape with a position and (optionally) an explicit size.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Identifier used by labels and edges to refer to this shape
    pub id: String,
    /// Geometric kind
    pub kind: ShapeKind,
    /// Top-left corner
    pub position: Point,
    /// Explicit size, if any
    pub size: Option<Size>,
    /// Source style
    pub style: ShapeStyle,
    /// Inline label (cell/edge model); container labels come from text elements
    pub label: Option<String>,
}

/// A line or arrow between two points, or between two shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    /// Identifier used by bound labels to refer to this connector
    pub id: String,
    /// Origin the path points are relative to; `None` for edges attached by reference
    pub origin: Option<Point>,
    /// Nominal size of the connector's box around its origin
    pub size: Option<Size>,
    /// Path points relative to `origin`
    pub points: Vec<Point>,
    /// Inline label
    pub label: Option<String>,
    /// Source style (only the stroke is used)
    pub style: ShapeStyle,
    /// Source shape identifier for edges attached by reference
    pub source: Option<String>,
    /// Target shape identifier for edges attached by reference
    pub target: Option<String>,
    /// Whether an arrowhead is drawn at the terminus
    pub end_arrow: bool,
}

/// A run of text, either free-standing or bound to a container.
#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    /// Identifier of this text element
    pub id: String,
    /// Top-left corner of the text box; bound text may omit it
    pub position: Option<Point>,
    /// Explicit size of the text box, if any
    pub size: Option<Size>,
    /// Text content, possibly spanning several lines
    pub content: String,
    /// Font size in diagram units
    pub font_size: f64,
    /// Identifier of the owning container (lookup only)
    pub container_id: Option<String>,
}

/// A single element of a diagram.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagramElement {
    /// A closed shape
    Shape(Shape),
    /// A line, arrow or edge
    Connector(Connector),
    /// A text run
    Text(TextElement),
}

/// Finds the first text element bound to the container with the given id.
///
/// The relation is a weak reference: the text element stays owned by the
/// element list and is found by scanning it, whatever the rendering order.
pub fn bound_text<'a>(elements: &'a [DiagramElement], container_id: &str) -> Option<&'a TextElement> {
    elements.iter().find_map(|element| match element {
        DiagramElement::Text(text) if text.container_id.as_deref() == Some(container_id) => Some(text),
        _ => None,
    })
}

/// Finds the shape with the given id.
pub fn find_shape<'a>(elements: &'a [DiagramElement], id: &str) -> Option<&'a Shape> {
    elements.iter().find_map(|element| match element {
        DiagramElement::Shape(shape) if shape.id == id => Some(shape),
        _ => None,
    })
}

/// Axis-aligned bounding box in diagram coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Left edge
    pub min_x: f64,
    /// Top edge
    pub min_y: f64,
    /// Right edge
    pub max_x: f64,
    /// Bottom edge
    pub max_y: f64,
}

impl Bounds {
    /// The bounds used when a diagram has nothing positionable.
    pub const FALLBACK: Bounds = Bounds {
        min_x: 0.0,
        min_y: 0.0,
        max_x: constants::FALLBACK_WIDTH,
        max_y: constants::FALLBACK_HEIGHT,
    };

    /// Horizontal span.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Vertical span.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// The two source document shapes produced by the external converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramFormat {
    /// Excalidraw scene JSON (container/shape model)
    Excalidraw,
    /// Draw.io mxGraph XML (cell/edge model)
    DrawIo,
}

impl DiagramFormat {
    /// Guesses the format from the first non-whitespace character.
    ///
    /// A leading byte order mark is ignored. Returns `None` when the input is
    /// empty or starts with anything other than `{` or `<`.
    pub fn detect(source: &str) -> Option<Self> {
        match strip_bom(source).trim_start().chars().next() {
            Some('{') => Some(DiagramFormat::Excalidraw),
            Some('<') => Some(DiagramFormat::DrawIo),
            _ => None,
        }
    }
}

/// Drops a leading UTF-8 byte order mark.
pub(crate) fn strip_bom(source: &str) -> &str {
    source.strip_prefix('\u{feff}').unwrap_or(source)
}

impl fmt::Display for DiagramFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramFormat::Excalidraw => write!(f, "Excalidraw"),
            DiagramFormat::DrawIo => write!(f, "Draw.io"),
        }
    }
}

/// The output of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDiagram {
    /// Standalone SVG document
    pub markup: String,
    /// Content bounds the document was laid out from
    pub bounds: Bounds,
    /// Document width (bounds span plus padding)
    pub width: f64,
    /// Document height (bounds span plus padding)
    pub height: f64,
}
