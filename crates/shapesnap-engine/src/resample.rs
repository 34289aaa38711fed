//! Arc-length resampling: re-space a polyline to near-uniform steps.
//!
//! The corner detector compares chord lengths over a fixed number of
//! steps, which only means something when every step covers the same
//! distance along the path. Raw pointer input is anything but uniform:
//! fast strokes leave wide gaps, slow ones pile up near-duplicates.

use crate::types::Point;

/// Resample `points` so consecutive output points are `spacing` apart
/// along the original path.
///
/// Distance traveled since the last emission carries across input
/// vertices. Within a segment, the k-th emission sits at a fixed offset
/// `k * spacing - carried` from the segment's start and is interpolated
/// from that start, never from the previous emission. Each segment
/// therefore emits a count fixed up front, and huge coordinates (where
/// one step is below an ulp) cannot stall the walk. The first point is
/// always kept; the tail shorter than `spacing` is dropped.
///
/// A bare segment (two points or fewer) has nothing to re-space and is
/// returned unchanged, as is any input when `spacing` is non-positive or
/// non-finite.
///
/// # Examples
///
/// ```
/// use shapesnap_engine::Point;
/// use shapesnap_engine::resample::resample;
///
/// let line = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(20.0, 0.0)];
/// let out = resample(&line, 4.0);
/// // Emitted at x = 0, 4, 8, 12, 16, 20.
/// assert_eq!(out.len(), 6);
/// ```
#[must_use]
pub fn resample(points: &[Point], spacing: f64) -> Vec<Point> {
    if points.len() <= 2 || !(spacing.is_finite() && spacing > 0.0) {
        return points.to_vec();
    }

    let mut out = vec![points[0]];
    let mut carried = 0.0;

    for w in points.windows(2) {
        let (start, end) = (w[0], w[1]);
        let length = start.distance(end);
        if length <= 0.0 {
            continue;
        }

        let reach = carried + length;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let emissions = (reach / spacing).floor() as usize;
        out.extend((1..=emissions).map(|k| {
            #[allow(clippy::cast_precision_loss)]
            let offset = (k as f64).mul_add(spacing, -carried);
            start.lerp(end, (offset / length).min(1.0))
        }));

        #[allow(clippy::cast_precision_loss)]
        let used = emissions as f64 * spacing;
        carried = (reach - used).clamp(0.0, spacing);
    }

    out
}
