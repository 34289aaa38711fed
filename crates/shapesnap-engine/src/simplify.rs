//! Ramer-Douglas-Peucker simplification of retained freehand paths.
//!
//! Runs only on strokes the classifier leaves freehand, so hand-drawn
//! paths stay light on the board. Works from an explicit stack of
//! index ranges rather than recursion: a long slow stroke can carry
//! thousands of points and a near-collinear one would recurse that deep.

use crate::metrics::distance_to_line;
use crate::types::Point;

/// Simplify a polyline with the Ramer-Douglas-Peucker algorithm.
///
/// Points within `tolerance` of the chord between their kept neighbors
/// are dropped. A tolerance of 0.0 preserves every point; so does a
/// negative or non-finite one. Fewer than 3 points are returned
/// unchanged. Endpoints are always kept.
#[must_use = "returns the simplified polyline"]
pub fn simplify(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() < 3 || !(tolerance.is_finite() && tolerance > 0.0) {
        return points.to_vec();
    }

    let last = points.len() - 1;
    let mut kept = vec![false; points.len()];
    kept[0] = true;
    kept[last] = true;

    let mut pending = vec![(0, last)];
    while let Some((start, end)) = pending.pop() {
        if end <= start + 1 {
            continue;
        }
        if let Some((idx, dist)) = farthest_from_chord(points, start, end)
            && dist > tolerance
        {
            kept[idx] = true;
            pending.push((start, idx));
            pending.push((idx, end));
        }
    }

    points
        .iter()
        .zip(&kept)
        .filter(|&(_, k)| *k)
        .map(|(&p, _)| p)
        .collect()
}

/// Interior point of `start..=end` farthest from the chord, first on ties.
fn farthest_from_chord(points: &[Point], start: usize, end: usize) -> Option<(usize, f64)> {
    let (a, b) = (points[start], points[end]);
    ((start + 1)..end)
        .map(|i| (i, distance_to_line(points[i], a, b)))
        .fold(None, |best, (i, d)| match best {
            Some((_, best_d)) if d <= best_d => best,
            _ => Some((i, d)),
        })
}
