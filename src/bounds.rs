//! Bounding-box computation over heterogeneous diagram elements.

use crate::types::*;

/// Accumulates the union of boxes and points.
#[derive(Debug, Clone, Copy)]
struct Extent {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Extent {
    const EMPTY: Extent = Extent {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    fn include_point(&mut self, p: Point) {
        if !p.is_finite() {
            return;
        }
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    fn include_box(&mut self, origin: Point, size: Option<Size>) {
        let size = effective_size(size);
        self.include_point(origin);
        self.include_point(Point::new(origin.x + size.width, origin.y + size.height));
    }

    fn finish(self) -> Option<Bounds> {
        let finite = [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return None;
        }
        Some(Bounds {
            min_x: self.min_x,
            min_y: self.min_y,
            max_x: self.max_x,
            max_y: self.max_y,
        })
    }
}

/// Whether the element contributes geometry to the diagram bounds.
///
/// Text bound to a container is excluded since its container already covers it,
/// and elements without a finite position have nowhere to be drawn.
pub fn is_positionable(element: &DiagramElement) -> bool {
    match element {
        DiagramElement::Shape(shape) => shape.position.is_finite(),
        DiagramElement::Connector(connector) => connector.origin.is_some_and(|o| o.is_finite()),
        DiagramElement::Text(text) => {
            text.container_id.is_none() && text.position.is_some_and(|p| p.is_finite())
        }
    }
}

/// Computes the bounds of the positionable elements, or `None` if there are none.
pub fn try_compute_bounds(elements: &[DiagramElement]) -> Option<Bounds> {
    let mut extent = Extent::EMPTY;

    for element in elements.iter().filter(|e| is_positionable(e)) {
        match element {
            DiagramElement::Shape(shape) => extent.include_box(shape.position, shape.size),
            DiagramElement::Connector(connector) => {
                let Some(origin) = connector.origin else { continue };
                extent.include_box(origin, connector.size);
                // Arrow paths can leave their nominal box
                for p in &connector.points {
                    extent.include_point(Point::new(origin.x + p.x, origin.y + p.y));
                }
            }
            DiagramElement::Text(text) => {
                if let Some(position) = text.position {
                    extent.include_box(position, text.size);
                }
            }
        }
    }

    extent.finish()
}

/// Computes the bounds of a diagram.
///
/// Always returns finite bounds with strictly positive width and height:
/// when nothing can be positioned the fixed (0,0)–(400,300) fallback is used.
pub fn compute_bounds(elements: &[DiagramElement]) -> Bounds {
    try_compute_bounds(elements).unwrap_or(Bounds::FALLBACK)
}
