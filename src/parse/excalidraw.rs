//! Excalidraw scene JSON reader.

use crate::constants;
use crate::error::{DiagramError, Result};
use crate::types::*;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Scene {
    #[serde(default)]
    elements: Vec<RawElement>,
}

/// One entry of the scene's `elements` array, restricted to the fields we draw.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawElement {
    #[serde(default)]
    id: String,
    #[serde(rename = "type")]
    kind: String,
    x: Option<f64>,
    y: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    points: Option<Vec<[f64; 2]>>,
    background_color: Option<String>,
    stroke_color: Option<String>,
    text: Option<String>,
    container_id: Option<String>,
    font_size: Option<f64>,
    roundness: Option<serde_json::Value>,
    #[serde(default)]
    is_deleted: bool,
}

impl RawElement {
    fn position(&self) -> Option<Point> {
        Some(Point::new(self.x?, self.y?))
    }

    fn size(&self) -> Option<Size> {
        match (self.width, self.height) {
            (None, None) => None,
            (w, h) => Some(Size::new(w.unwrap_or(0.0), h.unwrap_or(0.0))),
        }
    }

    fn style(&self) -> ShapeStyle {
        ShapeStyle {
            fill: self.background_color.clone(),
            stroke: self.stroke_color.clone(),
            rounded: self.roundness.is_some(),
        }
    }
}

/// Parses an Excalidraw scene into diagram elements.
///
/// Deleted elements and element types without a visual counterpart here
/// (free drawings, images, frames) are dropped.
pub fn parse_excalidraw(source: &str) -> Result<Vec<DiagramElement>> {
    let scene: Scene = serde_json::from_str(strip_bom(source))
        .map_err(|e| DiagramError::parse(DiagramFormat::Excalidraw, e))?;

    let mut elements = Vec::with_capacity(scene.elements.len());
    for raw in scene.elements {
        if raw.is_deleted {
            continue;
        }
        if let Some(element) = convert_element(raw) {
            elements.push(element);
        }
    }
    Ok(elements)
}

fn convert_element(raw: RawElement) -> Option<DiagramElement> {
    let shape_kind = match raw.kind.as_str() {
        "rectangle" => Some(ShapeKind::Rectangle),
        "ellipse" => Some(ShapeKind::Ellipse),
        "diamond" => Some(ShapeKind::Diamond),
        _ => None,
    };

    if let Some(kind) = shape_kind {
        let Some(position) = raw.position() else {
            log::warn!("skipping {} '{}' without a position", raw.kind, raw.id);
            return None;
        };
        return Some(DiagramElement::Shape(Shape {
            kind,
            position,
            size: raw.size(),
            style: raw.style(),
            label: None,
            id: raw.id,
        }));
    }

    match raw.kind.as_str() {
        "arrow" | "line" => Some(DiagramElement::Connector(Connector {
            origin: raw.position(),
            size: raw.size(),
            points: raw
                .points
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(|[x, y]| Point::new(*x, *y))
                .collect(),
            label: None,
            style: raw.style(),
            source: None,
            target: None,
            end_arrow: raw.kind == "arrow",
            id: raw.id,
        })),
        "text" => Some(DiagramElement::Text(TextElement {
            position: raw.position(),
            size: raw.size(),
            content: raw.text.unwrap_or_default(),
            font_size: raw
                .font_size
                .filter(|s| s.is_finite() && *s > 0.0)
                .unwrap_or(constants::DEFAULT_TEXT_FONT_SIZE),
            container_id: raw.container_id.filter(|c| !c.is_empty()),
            id: raw.id,
        })),
        other => {
            log::debug!("ignoring unsupported element type '{}'", other);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_shapes_connectors_and_text() {
        let scene = json!({
            "type": "excalidraw",
            "elements": [
                {"id": "r1", "type": "rectangle", "x": 0, "y": 0, "width": 100, "height": 60,
                 "backgroundColor": "#ffc9c9", "strokeColor": "#1e1e1e", "roundness": {"type": 3}},
                {"id": "t1", "type": "text", "x": 10, "y": 20, "text": "Hi", "containerId": "r1", "fontSize": 20},
                {"id": "a1", "type": "arrow", "x": 100, "y": 30, "points": [[0, 0], [80, 0]]},
                {"id": "l1", "type": "line", "x": 0, "y": 100}
            ]
        });
        let elements = parse_excalidraw(&scene.to_string()).unwrap();
        assert_eq!(elements.len(), 4);

        match &elements[0] {
            DiagramElement::Shape(shape) => {
                assert_eq!(shape.kind, ShapeKind::Rectangle);
                assert_eq!(shape.size, Some(Size::new(100.0, 60.0)));
                assert_eq!(shape.style.fill.as_deref(), Some("#ffc9c9"));
                assert!(shape.style.rounded);
            }
            other => panic!("expected shape, got {:?}", other),
        }
        match &elements[1] {
            DiagramElement::Text(text) => {
                assert_eq!(text.container_id.as_deref(), Some("r1"));
                assert_eq!(text.font_size, 20.0);
            }
            other => panic!("expected text, got {:?}", other),
        }
        match &elements[2] {
            DiagramElement::Connector(arrow) => {
                assert!(arrow.end_arrow);
                assert_eq!(arrow.points, vec![Point::new(0.0, 0.0), Point::new(80.0, 0.0)]);
            }
            other => panic!("expected connector, got {:?}", other),
        }
        match &elements[3] {
            DiagramElement::Connector(line) => {
                assert!(!line.end_arrow);
                assert!(line.points.is_empty());
            }
            other => panic!("expected connector, got {:?}", other),
        }
    }

    #[test]
    fn skips_deleted_and_unsupported_elements() {
        let scene = json!({
            "elements": [
                {"id": "gone", "type": "rectangle", "x": 0, "y": 0, "isDeleted": true},
                {"id": "pen", "type": "freedraw", "x": 0, "y": 0},
                {"id": "floating", "type": "ellipse"},
                {"id": "kept", "type": "diamond", "x": 5, "y": 5}
            ]
        });
        let elements = parse_excalidraw(&scene.to_string()).unwrap();
        assert_eq!(elements.len(), 1);
        assert!(matches!(&elements[0], DiagramElement::Shape(shape) if shape.id == "kept"));
    }

    #[test]
    fn leading_byte_order_mark_is_ignored() {
        let source = "\u{feff}{\"elements\":[{\"id\":\"r\",\"type\":\"rectangle\",\"x\":0,\"y\":0}]}";
        assert_eq!(parse_excalidraw(source).unwrap().len(), 1);
    }

    #[test]
    fn null_container_and_missing_elements_are_tolerated() {
        let elements = parse_excalidraw(r#"{"elements":[{"id":"t","type":"text","x":1,"y":2,"text":"free","containerId":null}]}"#).unwrap();
        match &elements[0] {
            DiagramElement::Text(text) => {
                assert!(text.container_id.is_none());
                assert_eq!(text.font_size, 16.0);
            }
            other => panic!("expected text, got {:?}", other),
        }
        assert!(parse_excalidraw("{}").unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = parse_excalidraw("{\"elements\": [").unwrap_err();
        assert!(matches!(err, DiagramError::Parse { format: DiagramFormat::Excalidraw, .. }));
    }
}
