//! Draw.io (mxGraph) XML reader.

use crate::error::{DiagramError, Result};
use crate::types::*;

/// Style descriptor markers and the shape kind they select, checked in order.
const STYLE_MARKERS: &[(&str, ShapeKind)] = &[
    ("rhombus", ShapeKind::Diamond),
    ("ellipse", ShapeKind::Ellipse),
    ("cylinder", ShapeKind::Cylinder),
];

/// Infers a shape kind from an mxGraph style descriptor such as
/// `"rhombus;whiteSpace=wrap;html=1;"`. Unrecognized descriptors are rectangles.
pub fn shape_kind_from_style(style: &str) -> ShapeKind {
    STYLE_MARKERS
        .iter()
        .find(|(marker, _)| style.contains(marker))
        .map(|(_, kind)| *kind)
        .unwrap_or(ShapeKind::Rectangle)
}

/// Parses an mxGraph document into diagram elements.
///
/// Vertex cells become shapes positioned by their `mxGeometry`; edge cells
/// become connectors attached to their `source`/`target` cells by id.
pub fn parse_drawio(source: &str) -> Result<Vec<DiagramElement>> {
    let doc = roxmltree::Document::parse(strip_bom(source))
        .map_err(|e| DiagramError::parse(DiagramFormat::DrawIo, e))?;

    let mut elements = Vec::new();
    for cell in doc.descendants().filter(|n| n.has_tag_name("mxCell")) {
        if cell.attribute("vertex") == Some("1") {
            if let Some(shape) = parse_vertex(&cell) {
                elements.push(DiagramElement::Shape(shape));
            }
        } else if cell.attribute("edge") == Some("1") {
            elements.push(DiagramElement::Connector(parse_edge(&cell)));
        }
    }
    Ok(elements)
}

/// Cell id and label, falling back to a wrapping `UserObject`/`object` element.
fn identity(cell: &roxmltree::Node) -> (String, Option<String>) {
    let wrapper = cell
        .parent_element()
        .filter(|p| p.has_tag_name("UserObject") || p.has_tag_name("object"));
    let id = cell
        .attribute("id")
        .or_else(|| wrapper.and_then(|w| w.attribute("id")))
        .unwrap_or_default()
        .to_string();
    let label = cell
        .attribute("value")
        .or_else(|| wrapper.and_then(|w| w.attribute("label")))
        .filter(|v| !v.is_empty())
        .map(str::to_string);
    (id, label)
}

fn parse_vertex(cell: &roxmltree::Node) -> Option<Shape> {
    let (id, label) = identity(cell);
    let Some(geometry) = cell.children().find(|n| n.has_tag_name("mxGeometry")) else {
        log::debug!("skipping vertex '{}' without geometry", id);
        return None;
    };

    let coordinate = |name: &str| -> Option<f64> {
        match geometry.attribute(name) {
            None => Some(0.0),
            Some(raw) => raw.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    };
    let (Some(x), Some(y)) = (coordinate("x"), coordinate("y")) else {
        log::warn!("skipping vertex '{}' with a malformed position", id);
        return None;
    };

    let dimension = |name: &str| geometry.attribute(name).and_then(|raw| raw.trim().parse::<f64>().ok());
    let size = match (dimension("width"), dimension("height")) {
        (None, None) => None,
        (w, h) => Some(Size::new(w.unwrap_or(0.0), h.unwrap_or(0.0))),
    };

    let style = cell.attribute("style").unwrap_or_default();
    Some(Shape {
        id,
        kind: shape_kind_from_style(style),
        position: Point::new(x, y),
        size,
        style: ShapeStyle {
            fill: None,
            stroke: None,
            rounded: style.contains("rounded=1"),
        },
        label,
    })
}

fn parse_edge(cell: &roxmltree::Node) -> Connector {
    let (id, label) = identity(cell);
    Connector {
        id,
        origin: None,
        size: None,
        points: Vec::new(),
        label,
        style: ShapeStyle::default(),
        source: cell.attribute("source").map(str::to_string),
        target: cell.attribute("target").map(str::to_string),
        end_arrow: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_NODES: &str = r#"<mxfile><diagram><mxGraphModel><root>
        <mxCell id="0"/>
        <mxCell id="1" parent="0"/>
        <mxCell id="a" value="Start" style="ellipse;whiteSpace=wrap;" vertex="1" parent="1">
            <mxGeometry x="40" y="60" width="120" height="60" as="geometry"/>
        </mxCell>
        <mxCell id="b" value="Check" style="rhombus;rounded=1;" vertex="1" parent="1">
            <mxGeometry x="240" y="50" width="80" height="80" as="geometry"/>
        </mxCell>
        <mxCell id="e" value="yes" edge="1" source="a" target="b" parent="1">
            <mxGeometry relative="1" as="geometry"/>
        </mxCell>
    </root></mxGraphModel></diagram></mxfile>"#;

    #[test]
    fn style_markers_select_kinds() {
        assert_eq!(shape_kind_from_style("rhombus;whiteSpace=wrap;"), ShapeKind::Diamond);
        assert_eq!(shape_kind_from_style("ellipse;"), ShapeKind::Ellipse);
        assert_eq!(shape_kind_from_style("shape=cylinder3;boundedLbl=1;"), ShapeKind::Cylinder);
        assert_eq!(shape_kind_from_style("rounded=1;whiteSpace=wrap;"), ShapeKind::Rectangle);
        assert_eq!(shape_kind_from_style("shape=hexagon"), ShapeKind::Rectangle);
    }

    #[test]
    fn parses_vertices_and_edges() {
        let elements = parse_drawio(TWO_NODES).unwrap();
        assert_eq!(elements.len(), 3);

        let a = find_shape(&elements, "a").unwrap();
        assert_eq!(a.kind, ShapeKind::Ellipse);
        assert_eq!(a.position, Point::new(40.0, 60.0));
        assert_eq!(a.size, Some(Size::new(120.0, 60.0)));
        assert_eq!(a.label.as_deref(), Some("Start"));

        let b = find_shape(&elements, "b").unwrap();
        assert_eq!(b.kind, ShapeKind::Diamond);
        assert!(b.style.rounded);

        match &elements[2] {
            DiagramElement::Connector(edge) => {
                assert_eq!(edge.source.as_deref(), Some("a"));
                assert_eq!(edge.target.as_deref(), Some("b"));
                assert_eq!(edge.label.as_deref(), Some("yes"));
                assert!(edge.origin.is_none());
            }
            other => panic!("expected connector, got {:?}", other),
        }
    }

    #[test]
    fn user_objects_supply_id_and_label() {
        let xml = r#"<root><UserObject id="u1" label="Wrapped">
            <mxCell vertex="1" style=""><mxGeometry x="1" y="2" as="geometry"/></mxCell>
        </UserObject></root>"#;
        let elements = parse_drawio(xml).unwrap();
        let shape = find_shape(&elements, "u1").unwrap();
        assert_eq!(shape.label.as_deref(), Some("Wrapped"));
        assert_eq!(shape.size, None);
    }

    #[test]
    fn malformed_vertices_are_skipped() {
        let xml = r#"<root>
            <mxCell id="nogeo" vertex="1"/>
            <mxCell id="bad" vertex="1"><mxGeometry x="abc" y="0" as="geometry"/></mxCell>
        </root>"#;
        assert!(parse_drawio(xml).unwrap().is_empty());
    }

    #[test]
    fn leading_byte_order_mark_is_ignored() {
        let with_bom = format!("\u{feff}{}", TWO_NODES);
        assert_eq!(parse_drawio(&with_bom).unwrap().len(), 3);
    }

    #[test]
    fn invalid_xml_is_a_parse_error() {
        let err = parse_drawio("<mxfile><root>").unwrap_err();
        assert!(matches!(err, DiagramError::Parse { format: DiagramFormat::DrawIo, .. }));
    }
}
