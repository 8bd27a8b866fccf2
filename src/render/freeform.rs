//! Renderer for the container/shape model.

use super::*;
use std::fmt::Write as _;

const DEFS: &str = concat!(
    "<filter id=\"shadow\" x=\"-20%\" y=\"-20%\" width=\"140%\" height=\"140%\">",
    "<feDropShadow dx=\"2\" dy=\"2\" stdDeviation=\"3\" flood-opacity=\"0.15\"/></filter>",
    "<marker id=\"exc-arrow\" markerWidth=\"12\" markerHeight=\"8\" refX=\"10\" refY=\"4\" orient=\"auto\">",
    "<polygon points=\"0 0, 12 4, 0 8\" fill=\"#1e293b\"/></marker>"
);

const CONNECTOR_STROKE: &str = "#64748b";
const ROUNDED_RADIUS: f64 = 8.0;
/// Path used by connectors that carry no points.
const DEFAULT_PATH: [Point; 2] = [Point::new(0.0, 0.0), Point::new(100.0, 0.0)];

/// Renders Excalidraw-style element lists.
///
/// Layering is shapes, then connectors, then free-standing text, so arrows
/// stay visible on top of the shapes they join.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeformRenderer;

impl SvgRenderer for FreeformRenderer {
    fn render(&self, elements: &[DiagramElement], bounds: &Bounds) -> Result<String> {
        ensure_renderable(elements)?;

        let frame = Frame::new(bounds);
        let mut out = String::new();
        frame.write_header(&mut out, DEFS);

        for element in elements {
            if let DiagramElement::Shape(shape) = element {
                self.write_container(&mut out, elements, shape, &frame);
            }
        }

        for element in elements {
            if let DiagramElement::Connector(connector) = element {
                self.write_connector(&mut out, elements, connector, &frame);
            }
        }

        for element in elements {
            if let DiagramElement::Text(text) = element {
                self.write_free_text(&mut out, text, &frame);
            }
        }

        let _ = writeln!(out, "</svg>");
        Ok(out)
    }
}

impl FreeformRenderer {
    fn write_container(&self, out: &mut String, elements: &[DiagramElement], shape: &Shape, frame: &Frame) {
        let b = ShapeBox::of(shape, frame);
        let defaults = palette(shape.kind);
        let fill = usable_color(shape.style.fill.as_deref()).unwrap_or(defaults.fill);
        let stroke = usable_color(shape.style.stroke.as_deref()).unwrap_or(defaults.stroke);
        let corner_radius = if shape.style.rounded { ROUNDED_RADIUS } else { 0.0 };
        write_shape(
            out,
            shape.kind,
            b,
            &Paint {
                fill,
                stroke,
                corner_radius,
                filter: "shadow",
            },
        );

        let label = bound_text(elements, &shape.id)
            .map(|t| t.content.as_str())
            .or(shape.label.as_deref())
            .filter(|l| !l.is_empty());
        if let Some(label) = label {
            write_text(
                out,
                b.center(),
                label,
                TextAnchor::Center,
                &TextStyle {
                    font_size: constants::CONTAINER_LABEL_FONT_SIZE,
                    fill: TEXT_COLOR,
                    font_weight: Some("500"),
                },
            );
        }
    }

    /// Draws a straight segment from the first to the last path point.
    fn write_connector(&self, out: &mut String, elements: &[DiagramElement], connector: &Connector, frame: &Frame) {
        let Some(origin) = connector.origin.filter(|o| o.is_finite()) else {
            log::debug!("skipping connector '{}' without an origin", connector.id);
            return;
        };
        let points: &[Point] = if connector.points.is_empty() {
            &DEFAULT_PATH
        } else {
            &connector.points
        };
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return;
        };
        if points.len() < 2 {
            return;
        }

        let origin = frame.map(origin);
        let start = Point::new(origin.x + first.x, origin.y + first.y);
        let end = Point::new(origin.x + last.x, origin.y + last.y);
        let stroke = usable_color(connector.style.stroke.as_deref()).unwrap_or(CONNECTOR_STROKE);
        let marker = if connector.end_arrow {
            " marker-end=\"url(#exc-arrow)\""
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"2\"{}/>",
            Num(start.x),
            Num(start.y),
            Num(end.x),
            Num(end.y),
            escape_attr(stroke),
            marker
        );

        let label = bound_text(elements, &connector.id)
            .map(|t| t.content.as_str())
            .or(connector.label.as_deref())
            .filter(|l| !l.is_empty());
        if let Some(label) = label {
            let mid = Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
            write_backed_label(out, mid, label, constants::CONTAINER_LABEL_FONT_SIZE, TEXT_COLOR);
        }
    }

    fn write_free_text(&self, out: &mut String, text: &TextElement, frame: &Frame) {
        if text.container_id.is_some() || text.content.is_empty() {
            return;
        }
        let Some(position) = text.position.filter(|p| p.is_finite()) else {
            return;
        };
        write_text(
            out,
            frame.map(position),
            &text.content,
            TextAnchor::TopLeft,
            &TextStyle {
                font_size: text.font_size,
                fill: TEXT_COLOR,
                font_weight: None,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::compute_bounds;
    use crate::parse::parse_excalidraw;
    use serde_json::json;

    fn render(scene: serde_json::Value) -> Result<String> {
        let elements = parse_excalidraw(&scene.to_string())?;
        let bounds = compute_bounds(&elements);
        FreeformRenderer.render(&elements, &bounds)
    }

    #[test]
    fn rectangle_with_bound_text() {
        let svg = render(json!({"elements": [
            {"id": "r1", "type": "rectangle", "x": 0, "y": 0, "width": 100, "height": 60},
            {"id": "t1", "type": "text", "x": 20, "y": 20, "text": "Hi", "containerId": "r1"}
        ]}))
        .unwrap();
        assert_eq!(svg.matches("<rect ").count(), 1);
        assert!(svg.contains("<rect x=\"60\" y=\"60\" width=\"100\" height=\"60\""));
        assert_eq!(svg.matches("<text ").count(), 1);
        assert!(svg.contains(">Hi</text>"));
        // label centered in its container
        assert!(svg.contains("<text x=\"110\" y=\"90\" text-anchor=\"middle\""));
        assert!(svg.contains("width=\"220\" height=\"180\""));
    }

    #[test]
    fn labels_and_free_text_are_escaped() {
        let svg = render(json!({"elements": [
            {"id": "r1", "type": "rectangle", "x": 0, "y": 0},
            {"id": "t1", "type": "text", "text": "<script>x</script>", "containerId": "r1"},
            {"id": "t2", "type": "text", "x": 0, "y": 100, "text": "a & b > c"}
        ]}))
        .unwrap();
        assert!(!svg.contains("<script>"));
        assert!(svg.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(svg.contains("a &amp; b &gt; c"));
    }

    #[test]
    fn own_colors_win_unless_sentinel() {
        let svg = render(json!({"elements": [
            {"id": "a", "type": "rectangle", "x": 0, "y": 0, "backgroundColor": "#ffc9c9", "strokeColor": "#c92a2a"},
            {"id": "b", "type": "ellipse", "x": 200, "y": 0, "backgroundColor": "transparent"},
            {"id": "c", "type": "diamond", "x": 400, "y": 0, "backgroundColor": "none", "strokeColor": "transparent"}
        ]}))
        .unwrap();
        assert!(svg.contains("fill=\"#ffc9c9\" stroke=\"#c92a2a\""));
        assert!(svg.contains("fill=\"#d1fae5\" stroke=\"#10b981\""));
        assert!(svg.contains("fill=\"#fef3c7\" stroke=\"#f59e0b\""));
    }

    #[test]
    fn layering_is_shapes_connectors_text() {
        let svg = render(json!({"elements": [
            {"id": "note", "type": "text", "x": 0, "y": 200, "text": "note"},
            {"id": "arrow", "type": "arrow", "x": 100, "y": 30, "points": [[0, 0], [100, 0]]},
            {"id": "box", "type": "rectangle", "x": 0, "y": 0}
        ]}))
        .unwrap();
        let shape_at = svg.find("<rect ").unwrap();
        let line_at = svg.find("<line ").unwrap();
        let text_at = svg.find("<text ").unwrap();
        assert!(shape_at < line_at && line_at < text_at);
    }

    #[test]
    fn connectors_are_straight_with_arrowheads() {
        let svg = render(json!({"elements": [
            {"id": "a", "type": "arrow", "x": 0, "y": 0, "width": 100, "height": 50,
             "points": [[0, 0], [50, 80], [100, 50]], "strokeColor": "#1971c2"},
            {"id": "l", "type": "line", "x": 0, "y": 100}
        ]}))
        .unwrap();
        assert!(svg.contains(
            "<line x1=\"60\" y1=\"60\" x2=\"160\" y2=\"110\" stroke=\"#1971c2\" stroke-width=\"2\" marker-end=\"url(#exc-arrow)\"/>"
        ));
        // a line without points uses the default path and no arrowhead
        assert!(svg.contains("<line x1=\"60\" y1=\"160\" x2=\"160\" y2=\"160\" stroke=\"#64748b\" stroke-width=\"2\"/>"));
    }

    #[test]
    fn text_bound_to_an_arrow_sits_on_its_midpoint() {
        let svg = render(json!({"elements": [
            {"id": "a", "type": "arrow", "x": 0, "y": 0, "points": [[0, 0], [100, 0]]},
            {"id": "t", "type": "text", "text": "calls", "containerId": "a"}
        ]}))
        .unwrap();
        assert!(svg.contains("fill=\"white\""));
        assert!(svg.contains("<text x=\"110\" y=\"60\" text-anchor=\"middle\""));
        assert!(svg.contains(">calls</text>"));
    }

    #[test]
    fn single_point_connectors_are_skipped() {
        let svg = render(json!({"elements": [
            {"id": "a", "type": "arrow", "x": 0, "y": 0, "points": [[0, 0]]}
        ]}))
        .unwrap();
        assert!(!svg.contains("<line "));
    }

    #[test]
    fn only_bound_text_is_not_renderable() {
        let err = render(json!({"elements": [
            {"id": "t", "type": "text", "x": 0, "y": 0, "text": "orphan", "containerId": "gone"}
        ]}))
        .unwrap_err();
        assert!(matches!(err, DiagramError::NoRenderableContent));
    }
}
