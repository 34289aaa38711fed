//! Path metrics: total, pure measurements over point sequences.
//!
//! None of these functions fail. Degenerate inputs (empty sequences,
//! zero-length segments, zero-area boxes) produce zero values, or `None`
//! for the ratios whose denominator vanishes.

use crate::types::{BoundingBox, Point};

/// Euclidean distance between two points.
#[must_use]
pub fn distance(p: Point, q: Point) -> f64 {
    p.distance(q)
}

/// Sum of consecutive point distances. Zero for fewer than two points.
#[must_use]
pub fn path_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Axis-aligned box tightly enclosing `points`.
///
/// Returns a zero box at the origin for an empty sequence.
#[must_use]
pub fn bounding_box(points: &[Point]) -> BoundingBox {
    let Some(first) = points.first() else {
        return BoundingBox::default();
    };

    let (min_x, min_y, max_x, max_y) = points.iter().fold(
        (first.x, first.y, first.x, first.y),
        |(min_x, min_y, max_x, max_y), p| {
            (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
        },
    );

    BoundingBox::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

/// Distance from `p` to the closed segment `v`-`w`.
///
/// The projection is clamped to the segment, so points beyond either end
/// measure to the nearer endpoint. When `v == w` this is `distance(p, v)`.
#[must_use]
pub fn distance_to_segment(p: Point, v: Point, w: Point) -> f64 {
    let length_sq = v.distance_squared(w);
    if length_sq == 0.0 {
        return p.distance(v);
    }

    let t = ((p.x - v.x).mul_add(w.x - v.x, (p.y - v.y) * (w.y - v.y)) / length_sq).clamp(0.0, 1.0);
    p.distance(v.lerp(w, t))
}

/// Perpendicular distance from `p` to the infinite line through `a` and `b`.
///
/// Uses `|cross(b - a, p - a)| / |b - a|`. When `a` and `b` coincide,
/// returns the distance from `p` to `a`.
#[must_use]
pub fn distance_to_line(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx.mul_add(dx, dy * dy);

    if length_sq == 0.0 {
        return p.distance(a);
    }

    let cross = dx.mul_add(a.y - p.y, -(dy * (a.x - p.x)));
    cross.abs() / length_sq.sqrt()
}

/// Unsigned shoelace area of `points` treated as a closed polygon.
///
/// The closing edge from the last point back to the first is implicit.
#[must_use]
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let twice_signed: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x.mul_add(b.y, -(b.x * a.y)))
        .sum();

    twice_signed.abs() / 2.0
}

/// Mean of the points, or `None` for an empty sequence.
#[must_use]
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// Coefficient of variation of each point's distance from `center`.
///
/// Low values mean a near-constant radius. Returns `None` when the
/// sequence is empty or every point sits on `center` (mean radius zero).
#[must_use]
pub fn radius_ratio(points: &[Point], center: Point) -> Option<f64> {
    if points.is_empty() {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let radii: Vec<f64> = points.iter().map(|p| p.distance(center)).collect();
    let mean = radii.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return None;
    }

    let variance = radii.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt() / mean)
}

/// Polygon area of `points` over the area of `bounds`.
///
/// Near 1 for a path that fills its box (a rectangle), near 0.5 for a
/// triangle. Returns `None` when the box has zero area.
#[must_use]
pub fn area_ratio(points: &[Point], bounds: &BoundingBox) -> Option<f64> {
    let box_area = bounds.area();
    if box_area <= 0.0 {
        return None;
    }
    Some(polygon_area(points) / box_area)
}
