//! Renderer for the cell/edge graph model.

use super::*;
use std::fmt::Write as _;

const DEFS: &str = concat!(
    "<filter id=\"drawio-shadow\" x=\"-20%\" y=\"-20%\" width=\"140%\" height=\"140%\">",
    "<feDropShadow dx=\"2\" dy=\"3\" stdDeviation=\"4\" flood-opacity=\"0.12\"/></filter>",
    "<marker id=\"drawio-arrow\" markerWidth=\"12\" markerHeight=\"8\" refX=\"10\" refY=\"4\" orient=\"auto\">",
    "<polygon points=\"0 0, 12 4, 0 8\" fill=\"#6366f1\"/></marker>"
);

const EDGE_STROKE: &str = "#94a3b8";
const EDGE_LABEL_COLOR: &str = "#64748b";
const ROUNDED_RADIUS: f64 = 10.0;
const SQUARE_RADIUS: f64 = 4.0;

/// Renders Draw.io cell graphs.
///
/// Edges are drawn before vertices so vertex fills cover the edge ends at
/// their attachment points. Vertices always use their kind's default palette.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawGraphRenderer;

impl SvgRenderer for DrawGraphRenderer {
    fn render(&self, elements: &[DiagramElement], bounds: &Bounds) -> Result<String> {
        ensure_renderable(elements)?;

        let frame = Frame::new(bounds);
        let mut out = String::new();
        frame.write_header(&mut out, DEFS);

        for element in elements {
            if let DiagramElement::Connector(edge) = element {
                self.write_edge(&mut out, elements, edge, &frame);
            }
        }

        for element in elements {
            if let DiagramElement::Shape(shape) = element {
                self.write_vertex(&mut out, shape, &frame);
            }
        }

        let _ = writeln!(out, "</svg>");
        Ok(out)
    }
}

impl DrawGraphRenderer {
    /// Draws a curve from the source's right-edge midpoint to the target's
    /// left-edge midpoint.
    fn write_edge(&self, out: &mut String, elements: &[DiagramElement], edge: &Connector, frame: &Frame) {
        let endpoints = edge
            .source
            .as_deref()
            .and_then(|id| find_shape(elements, id))
            .zip(edge.target.as_deref().and_then(|id| find_shape(elements, id)));
        let Some((source, target)) = endpoints else {
            log::debug!("skipping edge '{}' with an unresolved endpoint", edge.id);
            return;
        };

        let from = ShapeBox::of(source, frame);
        let to = ShapeBox::of(target, frame);
        let (sx, sy) = (from.x + from.w, from.y + from.h / 2.0);
        let (tx, ty) = (to.x, to.y + to.h / 2.0);
        let mid_x = (sx + tx) / 2.0;

        let _ = writeln!(
            out,
            "<path d=\"M {} {} C {} {}, {} {}, {} {}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\" marker-end=\"url(#drawio-arrow)\"/>",
            Num(sx),
            Num(sy),
            Num(mid_x),
            Num(sy),
            Num(mid_x),
            Num(ty),
            Num(tx),
            Num(ty),
            EDGE_STROKE
        );

        if let Some(label) = edge.label.as_deref().filter(|l| !l.is_empty()) {
            // B(0.5) of this curve is the midpoint of its endpoints
            let mid = Point::new(mid_x, (sy + ty) / 2.0);
            write_backed_label(out, mid, label, constants::EDGE_LABEL_FONT_SIZE, EDGE_LABEL_COLOR);
        }
    }

    fn write_vertex(&self, out: &mut String, shape: &Shape, frame: &Frame) {
        let b = ShapeBox::of(shape, frame);
        let colors = palette(shape.kind);
        let corner_radius = if shape.style.rounded {
            ROUNDED_RADIUS
        } else {
            SQUARE_RADIUS
        };
        write_shape(
            out,
            shape.kind,
            b,
            &Paint {
                fill: colors.fill,
                stroke: colors.stroke,
                corner_radius,
                filter: "drawio-shadow",
            },
        );

        if let Some(label) = shape.label.as_deref().filter(|l| !l.is_empty()) {
            write_text(
                out,
                b.center(),
                label,
                TextAnchor::Center,
                &TextStyle {
                    font_size: constants::CELL_LABEL_FONT_SIZE,
                    fill: TEXT_COLOR,
                    font_weight: Some("500"),
                },
            );
        }
    }
}
