//! Triangle vertex extraction by greedy farthest-point search.
//!
//! Used when the corner detector miscounts on a stroke that still looks
//! triangular by area. Three well-separated extremal points are enough
//! to pin down a triangle, and extremal points survive noise and rounded
//! corners far better than a corner signal does.

use crate::metrics::{centroid, distance_to_line};
use crate::types::Point;

/// Pick three representative triangle vertices from `points`.
///
/// 1. `a` is the point farthest from the centroid.
/// 2. `b` is the point farthest from `a`.
/// 3. `c` is the point farthest from the line through `a` and `b`.
///
/// Ties resolve to the earliest point. No winding order is implied.
/// Returns `None` for an empty input; fewer than three distinct points
/// yield repeated vertices.
#[must_use]
pub fn extract_triangle(points: &[Point]) -> Option<[Point; 3]> {
    let center = centroid(points)?;
    let a = farthest_by(points, |p| p.distance_squared(center))?;
    let b = farthest_by(points, |p| p.distance_squared(a))?;
    let c = farthest_by(points, |p| distance_to_line(p, a, b))?;
    Some([a, b, c])
}

/// The first point maximizing `score`.
fn farthest_by(points: &[Point], score: impl Fn(Point) -> f64) -> Option<Point> {
    let mut best: Option<(Point, f64)> = None;
    for &p in points {
        let s = score(p);
        match best {
            Some((_, best_score)) if s <= best_score => {}
            _ => best = Some((p, s)),
        }
    }
    best.map(|(p, _)| p)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_strokes;

    #[test]
    fn empty_input_has_no_vertices() {
        assert_eq!(extract_triangle(&[]), None);
    }

    #[test]
    fn exact_triangle_returns_its_corners() {
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(4.0, 8.0),
        ];
        let mut points = corners.to_vec();
        // Edge midpoints never beat the corners.
        points.push(Point::new(5.0, 0.0));
        points.push(Point::new(7.0, 4.0));
        points.push(Point::new(2.0, 4.0));

        let found = extract_triangle(&points).unwrap();
        for corner in corners {
            assert!(found.contains(&corner), "missing {corner:?} in {found:?}");
        }
    }

    #[test]
    fn order_of_input_does_not_change_the_vertex_set() {
        let triangle = test_strokes::triangle(90.0, 20);
        let mut reversed = triangle.clone();
        reversed.reverse();

        let forward = extract_triangle(&triangle).unwrap();
        let backward = extract_triangle(&reversed).unwrap();
        for v in forward {
            assert!(
                backward.iter().any(|w| w.distance(v) < 1e-6),
                "{v:?} not in {backward:?}"
            );
        }
    }

    #[test]
    fn noisy_triangle_vertices_are_well_separated() {
        let triangle = test_strokes::jitter(&test_strokes::triangle(100.0, 40), 1.5);
        let [a, b, c] = extract_triangle(&triangle).unwrap();
        for d in [a.distance(b), b.distance(c), c.distance(a)] {
            assert!((d - 100.0).abs() < 10.0, "side {d}");
        }
    }

    #[test]
    fn single_point_repeats() {
        let p = Point::new(3.0, 3.0);
        assert_eq!(extract_triangle(&[p]), Some([p, p, p]));
    }
}
