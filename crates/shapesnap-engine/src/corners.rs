//! Corner detection with the "straw" method.
//!
//! On a uniformly resampled path, the chord between the points `W` steps
//! before and after index `i` (the straw) is close to `2 * W * spacing`
//! wherever the path runs straight, and shrinks where it folds. Corners
//! are the local minima of the straw that fall clearly below the
//! straight-line span.
//!
//! The input is expected to be a closed loop: the caller appends the
//! first point before resampling, so the first and last samples sit
//! next to each other across the closing seam.

use crate::metrics::path_length;
use crate::types::Point;

/// Fewer resampled points than this carry too little resolution to judge.
pub const MIN_POINTS: usize = 10;

/// Parameters for [`detect_corners`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrawParams {
    /// Half-window `W`, in resampled steps.
    pub window: usize,
    /// Fraction of the straight-line span below which a straw is a corner.
    pub ratio: f64,
    /// Corners fewer than this many indices apart are merged.
    pub merge_gap: usize,
    /// A trailing corner within this many steps of the first corner across
    /// the seam is dropped.
    pub wraparound_gap: usize,
}

/// Straw value at every index with a full window on both sides.
///
/// Entry `i` is `None` for the first and last `window` indices.
#[must_use]
pub fn straws(points: &[Point], window: usize) -> Vec<Option<f64>> {
    let n = points.len();
    (0..n)
        .map(|i| {
            if i < window || i + window >= n {
                None
            } else {
                Some(points[i - window].distance(points[i + window]))
            }
        })
        .collect()
}

/// Indices whose straw is a local minimum below `threshold`.
///
/// A candidate must be strictly below both neighbors. A flat run of equal
/// straws is not a minimum.
#[must_use]
pub fn straw_minima(straws: &[Option<f64>], threshold: f64) -> Vec<usize> {
    straws
        .windows(3)
        .enumerate()
        .filter_map(|(offset, w)| match (w[0], w[1], w[2]) {
            (Some(prev), Some(s), Some(next)) if s < threshold && s < prev && s < next => {
                Some(offset + 1)
            }
            _ => None,
        })
        .collect()
}

/// Collapse runs of corners closer than `gap` indices, keeping the first
/// of each run.
#[must_use]
pub fn merge_adjacent(corners: &[usize], gap: usize) -> Vec<usize> {
    let mut merged: Vec<usize> = Vec::with_capacity(corners.len());
    for &c in corners {
        match merged.last() {
            Some(&kept) if c - kept < gap => {}
            _ => merged.push(c),
        }
    }
    merged
}

/// Drop the last corner when it and the first corner are the same fold
/// seen from both sides of the closing seam.
///
/// `len` is the number of resampled points; the seam distance is counted
/// in steps from the last corner to the end plus from the start to the
/// first corner. A corner index at or past `len` counts as on the seam.
#[must_use]
pub fn drop_wraparound(mut corners: Vec<usize>, len: usize, gap: usize) -> Vec<usize> {
    if corners.len() >= 2
        && let (Some(&first), Some(&last)) = (corners.first(), corners.last())
        && len.saturating_sub(1).saturating_sub(last) + first < gap
    {
        corners.pop();
    }
    corners
}

/// Detect corners in a resampled closed path.
///
/// Returns cleaned corner indices in ascending order: straw minima below
/// `ratio * 2 * window * average_spacing`, merged and de-duplicated
/// across the seam. Returns nothing for fewer than [`MIN_POINTS`] points.
#[must_use]
pub fn detect_corners(points: &[Point], params: &StrawParams) -> Vec<usize> {
    let n = points.len();
    if n < MIN_POINTS || params.window == 0 {
        return Vec::new();
    }

    #[allow(clippy::cast_precision_loss)]
    let average_spacing = path_length(points) / (n - 1) as f64;
    #[allow(clippy::cast_precision_loss)]
    let threshold = params.ratio * 2.0 * params.window as f64 * average_spacing;

    let candidates = straw_minima(&straws(points, params.window), threshold);
    log::trace!(
        "straw threshold {threshold:.3} over {n} points: candidates {candidates:?}"
    );

    let merged = merge_adjacent(&candidates, params.merge_gap);
    drop_wraparound(merged, n, params.wraparound_gap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resample::resample;
    use crate::test_strokes;

    const PARAMS: StrawParams = StrawParams {
        window: 3,
        ratio: 0.95,
        merge_gap: 3,
        wraparound_gap: 4,
    };

    /// Resample a closed outline the way the classifier does.
    fn closed(points: &[Point], spacing: f64) -> Vec<Point> {
        let mut loop_points = points.to_vec();
        if let Some(&first) = points.first() {
            loop_points.push(first);
        }
        resample(&loop_points, spacing)
    }

    #[test]
    fn too_few_points_yield_nothing() {
        let p: Vec<Point> = (0..9).map(|i| Point::new(f64::from(i), 0.0)).collect();
        assert!(detect_corners(&p, &PARAMS).is_empty());
    }

    #[test]
    fn straight_path_has_no_corners() {
        let p: Vec<Point> = (0..40).map(|i| Point::new(f64::from(i) * 5.0, 0.0)).collect();
        assert!(detect_corners(&p, &PARAMS).is_empty());
    }

    #[test]
    fn straws_skip_window_edges() {
        let p: Vec<Point> = (0..10).map(|i| Point::new(f64::from(i), 0.0)).collect();
        let s = straws(&p, 3);
        assert!(s[..3].iter().all(Option::is_none));
        assert!(s[7..].iter().all(Option::is_none));
        assert!((s[3].unwrap_or_default() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn right_angle_is_found_at_the_fold() {
        // Down the y axis to the origin, then along the x axis.
        let mut p: Vec<Point> = (0..=10).rev().map(|i| Point::new(0.0, f64::from(i) * 5.0)).collect();
        p.extend((1..=10).map(|i| Point::new(f64::from(i) * 5.0, 0.0)));
        assert_eq!(detect_corners(&p, &PARAMS), vec![10]);
    }

    #[test]
    fn square_has_four_corners() {
        let square = test_strokes::square(100.0, 25);
        let resampled = closed(&square, 5.0);
        assert_eq!(detect_corners(&resampled, &PARAMS).len(), 4);
    }

    #[test]
    fn triangle_has_three_corners() {
        let triangle = test_strokes::triangle(120.0, 30);
        let resampled = closed(&triangle, 5.0);
        assert_eq!(detect_corners(&resampled, &PARAMS).len(), 3);
    }

    #[test]
    fn large_circle_has_no_corners() {
        let circle = test_strokes::circle(100.0, 72);
        let resampled = closed(&circle, 200.0 * std::f64::consts::SQRT_2 / 40.0);
        assert!(detect_corners(&resampled, &PARAMS).is_empty());
    }

    #[test]
    fn merge_keeps_first_of_each_run() {
        assert_eq!(merge_adjacent(&[4, 5, 6, 12, 14, 30], 3), vec![4, 12, 30]);
        assert_eq!(merge_adjacent(&[], 3), Vec::<usize>::new());
    }

    #[test]
    fn merge_compares_against_kept_corner() {
        // 4 and 6 merge; 8 is 4 away from the kept 4, so it survives.
        assert_eq!(merge_adjacent(&[4, 6, 8], 3), vec![4, 8]);
    }

    #[test]
    fn wraparound_drops_trailing_duplicate() {
        // 50 points: last corner at 48 is 1 step from the end, first at 1.
        assert_eq!(drop_wraparound(vec![1, 20, 48], 50, 4), vec![1, 20]);
    }

    #[test]
    fn straw_minimum_must_be_strict() {
        let plateau = [Some(10.0), Some(9.0), Some(2.0), Some(2.0), Some(9.0)];
        assert!(straw_minima(&plateau, 5.0).is_empty());
        let dip = [Some(10.0), Some(9.0), Some(2.0), Some(3.0), Some(9.0)];
        assert_eq!(straw_minima(&dip, 5.0), vec![2]);
    }

    #[test]
    fn wraparound_tolerates_out_of_range_corner() {
        assert_eq!(drop_wraparound(vec![1, 60], 50, 4), vec![1]);
        assert_eq!(drop_wraparound(vec![10, 60], 50, 4), vec![10, 60]);
    }

    #[test]
    fn wraparound_keeps_distinct_corners() {
        assert_eq!(drop_wraparound(vec![10, 20, 40], 50, 4), vec![10, 20, 40]);
        // A lone corner is never dropped.
        assert_eq!(drop_wraparound(vec![0], 50, 4), vec![0]);
    }
}
