//! Hit testing: is a query point on or inside an element?
//!
//! Used by erasing and selection, never by classification. Outline
//! elements (paths, lines) test proximity within a threshold; filled
//! elements (rectangles, images, circles, triangles, text) test
//! containment and ignore the threshold.

use crate::element::ElementKind;
use crate::metrics::distance_to_segment;
use crate::types::{BoundingBox, Point};

/// Estimated glyph advance as a fraction of the font size.
pub const TEXT_ADVANCE_RATIO: f64 = 0.6;

/// Estimated line height as a multiple of the font size.
pub const TEXT_LINE_HEIGHT_RATIO: f64 = 1.5;

/// Whether `point` hits an element of the given kind.
#[must_use]
pub fn is_near(kind: &ElementKind, point: Point, threshold: f64) -> bool {
    match kind {
        ElementKind::Path { points, .. } => near_polyline(points, point, threshold),
        ElementKind::Line { start, end } => distance_to_segment(point, *start, *end) <= threshold,
        ElementKind::Rectangle { bounds } | ElementKind::Image { bounds, .. } => {
            bounds.contains(point)
        }
        ElementKind::Circle { bounds } => in_ellipse(bounds, point, threshold),
        ElementKind::Triangle { bounds, vertices } => {
            in_triangle(vertices.unwrap_or_else(|| inscribed_triangle(bounds)), point)
        }
        ElementKind::Text {
            origin,
            content,
            font_size,
        } => text_bounds(*origin, content, *font_size).contains(point),
    }
}

/// Whether `point` is within `threshold` of any segment of `points`.
///
/// A single point counts as a zero-length segment; an empty path is
/// never hit.
#[must_use]
pub fn near_polyline(points: &[Point], point: Point, threshold: f64) -> bool {
    match points {
        [] => false,
        [only] => only.distance(point) <= threshold,
        _ => points
            .windows(2)
            .any(|w| distance_to_segment(point, w[0], w[1]) <= threshold),
    }
}

/// Normalized ellipse test for the ellipse inscribed in `bounds`.
///
/// A box with zero width or height has no interior; it degenerates to
/// the segment along its non-zero axis and is tested by proximity.
fn in_ellipse(bounds: &BoundingBox, point: Point, threshold: f64) -> bool {
    let center = bounds.center();
    let rx = bounds.width / 2.0;
    let ry = bounds.height / 2.0;

    if rx <= 0.0 || ry <= 0.0 {
        let a = Point::new(bounds.x, bounds.y);
        let b = Point::new(bounds.max_x(), bounds.max_y());
        return distance_to_segment(point, a, b) <= threshold;
    }

    let nx = (point.x - center.x) / rx;
    let ny = (point.y - center.y) / ry;
    nx.mul_add(nx, ny * ny) <= 1.0
}

/// Triangle inscribed in `bounds`: apex top-center, base along the bottom.
#[must_use]
pub fn inscribed_triangle(bounds: &BoundingBox) -> [Point; 3] {
    [
        Point::new(bounds.center().x, bounds.y),
        Point::new(bounds.x, bounds.max_y()),
        Point::new(bounds.max_x(), bounds.max_y()),
    ]
}

/// Same-sign test over the three edge cross products.
///
/// Works for either winding. A zero cross product puts the point on an
/// edge, which counts as inside.
#[must_use]
pub fn in_triangle([a, b, c]: [Point; 3], p: Point) -> bool {
    let d1 = cross(p, a, b);
    let d2 = cross(p, b, c);
    let d3 = cross(p, c, a);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Z component of `(p - b) x (a - b)`.
fn cross(p: Point, a: Point, b: Point) -> f64 {
    (p.x - b.x).mul_add(a.y - b.y, -((a.x - b.x) * (p.y - b.y)))
}

/// Approximate extent of a text run from its character count.
#[must_use]
pub fn text_bounds(origin: Point, content: &str, font_size: f64) -> BoundingBox {
    #[allow(clippy::cast_precision_loss)]
    let chars = content.chars().count() as f64;
    BoundingBox::new(
        origin.x,
        origin.y,
        chars * font_size * TEXT_ADVANCE_RATIO,
        font_size * TEXT_LINE_HEIGHT_RATIO,
    )
}
