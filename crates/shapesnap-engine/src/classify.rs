//! Stroke classification: the decision cascade.
//!
//! Cheap, high-confidence gates run first (too short, straight, open),
//! then the corner count decides when it is 3 or 4. Everything else
//! falls through to two ratio features, because straw corners are
//! unreliable on smooth loops and on folds near the straw threshold.
//!
//! The cascade never answers "unrecognized" once a stroke passes the
//! closure gate: the last rule is an unconditional square. Callers that
//! want a stricter no-match behavior must gate upstream, for example by
//! consulting an [`oracle`](crate::oracle).

use crate::config::RecognizerConfig;
use crate::corners::{StrawParams, detect_corners};
use crate::diagnostics::{ClassificationDiagnostics, Clock, NullClock, Rule, StageMetrics};
use crate::metrics::{area_ratio, bounding_box, path_length, radius_ratio};
use crate::resample::resample;
use crate::types::{Point, Recognition, ShapeVerdict, Stroke};
use crate::vertices::extract_triangle;

impl From<&RecognizerConfig> for StrawParams {
    fn from(config: &RecognizerConfig) -> Self {
        Self {
            window: config.straw_window,
            ratio: config.straw_ratio,
            merge_gap: config.corner_merge_gap,
            wraparound_gap: config.wraparound_gap,
        }
    }
}

/// Classify a completed stroke.
///
/// Total and deterministic: every finite-valued input yields a verdict.
#[must_use]
pub fn classify(points: &[Point], config: &RecognizerConfig) -> ShapeVerdict {
    classify_with_diagnostics(points, config, &NullClock).0
}

/// Classify a stroke and pair the verdict with its bounding box.
#[must_use]
pub fn recognize(stroke: &Stroke, config: &RecognizerConfig) -> Recognition {
    Recognition {
        verdict: classify(stroke.points(), config),
        bounds: bounding_box(stroke.points()),
    }
}

/// Classify a stroke, recording features and per-stage timings.
pub fn classify_with_diagnostics<C: Clock>(
    points: &[Point],
    config: &RecognizerConfig,
    clock: &C,
) -> (ShapeVerdict, ClassificationDiagnostics) {
    let started = clock.now();
    let mut diag = ClassificationDiagnostics::new(points.len());

    let (verdict, rule) = cascade(points, config, clock, &mut diag);

    diag.rule = rule;
    diag.verdict = verdict;
    diag.total_duration = clock.elapsed(&started);
    log::debug!(
        "classified {} points as {verdict:?} ({})",
        points.len(),
        rule.describe()
    );

    (verdict, diag)
}

fn cascade<C: Clock>(
    points: &[Point],
    config: &RecognizerConfig,
    clock: &C,
    diag: &mut ClassificationDiagnostics,
) -> (ShapeVerdict, Rule) {
    // 1. Too little information.
    if points.len() < config.min_points {
        return (ShapeVerdict::None, Rule::TooFewPoints);
    }
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return (ShapeVerdict::None, Rule::TooFewPoints);
    };

    // 2. Whole-stroke measurements.
    let t = clock.now();
    let length = path_length(points);
    let gap = first.distance(last);
    let bounds = bounding_box(points);
    diag.push(
        clock.elapsed(&t),
        StageMetrics::Measure {
            path_length: length,
            endpoint_distance: gap,
            bounds,
        },
    );

    // 3. Line gate, independent of closure.
    if gap > config.line_ratio * length {
        return (
            ShapeVerdict::Line {
                start: first,
                end: last,
            },
            Rule::Straight,
        );
    }

    // 4. Closure gate.
    if gap > config.closure_ratio * length {
        return (ShapeVerdict::None, Rule::Open);
    }

    // 5. Close the loop and resample.
    let t = clock.now();
    let spacing = config
        .min_spacing
        .max(bounds.diagonal() / config.spacing_divisor);
    let mut closed = Vec::with_capacity(points.len() + 1);
    closed.extend_from_slice(points);
    closed.push(first);
    let resampled = resample(&closed, spacing);
    diag.push(
        clock.elapsed(&t),
        StageMetrics::Resample {
            spacing,
            input_points: closed.len(),
            output_points: resampled.len(),
        },
    );

    let t = clock.now();
    let corners = detect_corners(&resampled, &StrawParams::from(config));
    diag.push(
        clock.elapsed(&t),
        StageMetrics::Corners {
            indices: corners.clone(),
        },
    );
    log::trace!(
        "spacing {spacing:.2}: {} resampled points, corners {corners:?}",
        resampled.len()
    );

    // 6. Corner count decides when it can.
    match *corners.as_slice() {
        [a, b, c] => {
            return (
                ShapeVerdict::Triangle {
                    vertices: Some([resampled[a], resampled[b], resampled[c]]),
                },
                Rule::ThreeCorners,
            );
        }
        [_, _, _, _] => return (ShapeVerdict::Square, Rule::FourCorners),
        _ => {}
    }

    // 7. Ratio fallback over the original points.
    let t = clock.now();
    let radius = radius_ratio(points, bounds.center());
    let area = area_ratio(points, &bounds);
    diag.push(
        clock.elapsed(&t),
        StageMetrics::Fallback {
            radius_ratio: radius,
            area_ratio: area,
        },
    );
    log::trace!("radius ratio {radius:?}, area ratio {area:?}");

    if corners.is_empty() && radius.is_some_and(|r| r < config.smooth_circle_radius_ratio) {
        return (ShapeVerdict::Circle, Rule::SmoothRound);
    }
    if radius.is_some_and(|r| r < config.circle_radius_ratio) {
        return (ShapeVerdict::Circle, Rule::Round);
    }
    if area.is_some_and(|a| a > config.rectangle_area_ratio) {
        return (ShapeVerdict::Square, Rule::FillsBox);
    }
    if area.is_some_and(|a| a < config.triangle_area_ratio) {
        return (
            ShapeVerdict::Triangle {
                vertices: extract_triangle(&resampled),
            },
            Rule::Tapered,
        );
    }
    if corners.len() == 5 {
        return (ShapeVerdict::Square, Rule::FiveCorners);
    }
    (ShapeVerdict::Square, Rule::Default)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::test_strokes;

    fn config() -> RecognizerConfig {
        RecognizerConfig::default()
    }

    fn classify_traced(points: &[Point]) -> (ShapeVerdict, Rule) {
        let (verdict, diag) = classify_with_diagnostics(points, &config(), &NullClock);
        (verdict, diag.rule)
    }

    #[test]
    fn short_strokes_are_rejected() {
        for n in 0..10 {
            let p: Vec<Point> = (0..n).map(|i| Point::new(f64::from(i) * 10.0, 0.0)).collect();
            assert_eq!(classify(&p, &config()), ShapeVerdict::None, "{n} points");
        }
    }

    #[test]
    fn straight_stroke_is_a_line() {
        let p: Vec<Point> = (0..20).map(|i| Point::new(f64::from(i) * 4.0, f64::from(i) * 3.0)).collect();
        let (verdict, rule) = classify_traced(&p);
        assert_eq!(rule, Rule::Straight);
        assert_eq!(
            verdict,
            ShapeVerdict::Line {
                start: Point::new(0.0, 0.0),
                end: Point::new(76.0, 57.0),
            }
        );
    }

    #[test]
    fn open_arc_is_not_a_shape() {
        // Half circle: endpoint gap is 2r over a path of pi*r (0.64).
        let p: Vec<Point> = (0..=30)
            .map(|i| {
                let a = std::f64::consts::PI * f64::from(i) / 30.0;
                Point::new(100.0 * a.cos(), 100.0 * a.sin())
            })
            .collect();
        assert_eq!(classify_traced(&p), (ShapeVerdict::None, Rule::Open));
    }

    #[test]
    fn square_is_classified_by_its_corners() {
        let square = test_strokes::square(100.0, 25);
        assert_eq!(classify_traced(&square), (ShapeVerdict::Square, Rule::FourCorners));
    }

    #[test]
    fn triangle_carries_its_corner_vertices() {
        let triangle = test_strokes::triangle(120.0, 30);
        let (verdict, rule) = classify_traced(&triangle);
        assert_eq!(rule, Rule::ThreeCorners);
        let ShapeVerdict::Triangle {
            vertices: Some([a, b, c]),
        } = verdict
        else {
            panic!("expected triangle with vertices, got {verdict:?}");
        };
        for d in [a.distance(b), b.distance(c), c.distance(a)] {
            assert!((d - 120.0).abs() < 12.0, "side {d}");
        }
    }

    #[test]
    fn circle_has_no_corners_and_constant_radius() {
        let circle = test_strokes::circle(100.0, 72);
        assert_eq!(classify_traced(&circle), (ShapeVerdict::Circle, Rule::SmoothRound));
    }

    #[test]
    fn pentagon_with_five_corners_is_round() {
        // Corners found, but every vertex sits at the same radius.
        let side = 80.0;
        let r = side / (2.0 * (std::f64::consts::PI / 5.0).sin());
        let corners: Vec<Point> = (0..5)
            .map(|k| {
                let a = f64::from(k).mul_add(std::f64::consts::TAU / 5.0, -std::f64::consts::FRAC_PI_2);
                Point::new(r * a.cos(), r * a.sin())
            })
            .collect();
        let mut outline = vec![corners[0].lerp(corners[1], 0.5)];
        outline.extend_from_slice(&corners[1..]);
        outline.push(corners[0]);

        let (verdict, diag) =
            classify_with_diagnostics(&test_strokes::polygon(&outline, 10), &config(), &NullClock);
        assert_eq!(diag.rule, Rule::Round);
        assert_eq!(verdict, ShapeVerdict::Circle);
        assert_eq!(diag.corner_count(), Some(5));
    }

    #[test]
    fn notched_rectangle_with_five_corners_is_a_square() {
        // The notch tip sits on the box center, so neither ratio decides.
        let outline = [
            Point::new(40.0, 0.0),
            Point::new(80.0, 0.0),
            Point::new(80.0, 60.0),
            Point::new(40.0, 30.0),
            Point::new(0.0, 60.0),
            Point::new(0.0, 0.0),
        ];
        let (verdict, diag) =
            classify_with_diagnostics(&test_strokes::polygon(&outline, 10), &config(), &NullClock);
        assert_eq!(diag.rule, Rule::FiveCorners);
        assert_eq!(verdict, ShapeVerdict::Square);
        assert_eq!(diag.corner_count(), Some(5));
    }

    #[test]
    fn stepped_outline_filling_its_box_is_a_square() {
        // Six corners, one small bite out of a 160x90 box.
        let outline = [
            Point::new(80.0, 90.0),
            Point::new(0.0, 90.0),
            Point::new(0.0, 0.0),
            Point::new(80.0, 0.0),
            Point::new(80.0, 25.0),
            Point::new(160.0, 25.0),
            Point::new(160.0, 90.0),
        ];
        let (verdict, diag) =
            classify_with_diagnostics(&test_strokes::polygon(&outline, 10), &config(), &NullClock);
        assert_eq!(diag.rule, Rule::FillsBox);
        assert_eq!(verdict, ShapeVerdict::Square);
        assert_eq!(diag.corner_count(), Some(6));
    }

    #[test]
    fn triangle_started_on_a_vertex_is_recovered_by_area() {
        // The starting vertex sits on the seam where no straw reaches,
        // so only two corners are seen.
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(120.0, 0.0),
            Point::new(0.0, 90.0),
        ];
        let (verdict, diag) =
            classify_with_diagnostics(&test_strokes::polygon(&corners, 12), &config(), &NullClock);
        assert_eq!(diag.rule, Rule::Tapered);
        assert_eq!(diag.corner_count(), Some(2));

        let ShapeVerdict::Triangle {
            vertices: Some(found),
        } = verdict
        else {
            panic!("expected triangle with vertices, got {verdict:?}");
        };
        for corner in corners {
            assert!(
                found.iter().any(|v| v.distance(corner) < 2.0),
                "no vertex near {corner:?} in {found:?}"
            );
        }
        for (i, a) in found.iter().enumerate() {
            for b in &found[i + 1..] {
                assert!(a.distance(*b) > 60.0, "{a:?} and {b:?} too close");
            }
        }
    }

    #[test]
    fn huge_coordinates_still_classify() {
        // At 2^56 one ulp is 16 units, coarser than the resample spacing.
        let base = 2f64.powi(56);
        let outline = [
            Point::new(base, 0.0),
            Point::new(base + 32.0, 0.0),
            Point::new(base + 32.0, 32.0),
            Point::new(base, 32.0),
        ];
        let square = test_strokes::polygon(&outline, 3);
        assert_eq!(square.len(), 12);

        let (verdict, diag) = classify_with_diagnostics(&square, &config(), &NullClock);
        assert_ne!(verdict, ShapeVerdict::None);
        let resampled = diag.stages.iter().find_map(|s| match s.metrics {
            StageMetrics::Resample { output_points, .. } => Some(output_points),
            _ => None,
        });
        // 128 units of closed path at spacing 5.
        assert!(resampled.is_some_and(|n| n <= 26), "{resampled:?}");
    }

    #[test]
    fn repeated_point_falls_through_to_default() {
        // Zero length passes both gates; every ratio is undefined.
        let p = vec![Point::new(5.0, 5.0); 12];
        assert_eq!(classify_traced(&p), (ShapeVerdict::Square, Rule::Default));
    }

    #[test]
    fn diagnostics_record_every_reached_stage() {
        let square = test_strokes::square(100.0, 25);
        let (_, diag) = classify_with_diagnostics(&square, &config(), &NullClock);
        assert_eq!(diag.point_count, square.len());
        assert_eq!(diag.stages.len(), 3);
        assert_eq!(diag.corner_count(), Some(4));

        let p: Vec<Point> = (0..20).map(|i| Point::new(f64::from(i), 0.0)).collect();
        let (_, diag) = classify_with_diagnostics(&p, &config(), &NullClock);
        assert_eq!(diag.stages.len(), 1);
        assert_eq!(diag.corner_count(), None);
    }

    #[test]
    fn recognize_pairs_verdict_with_bounds() {
        let square = Stroke::new(test_strokes::square(100.0, 25));
        let rec = recognize(&square, &config());
        assert_eq!(rec.verdict, ShapeVerdict::Square);
        assert!((rec.bounds.x).abs() < 1e-9);
        assert!((rec.bounds.width - 100.0).abs() < 1e-9);
        assert!((rec.bounds.height - 100.0).abs() < 1e-9);
    }

    #[test]
    fn classification_is_deterministic() {
        let stroke = test_strokes::jitter(&test_strokes::triangle(80.0, 25), 1.0);
        let first = classify(&stroke, &config());
        for _ in 0..5 {
            assert_eq!(classify(&stroke, &config()), first);
        }
    }

    #[test]
    fn raising_min_points_rejects_otherwise_valid_strokes() {
        let square = test_strokes::square(100.0, 5);
        let strict = RecognizerConfig {
            min_points: 50,
            ..config()
        };
        assert_eq!(classify(&square, &strict), ShapeVerdict::None);
    }
}
