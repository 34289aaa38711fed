//! Integration test: finished strokes go through the classifier onto a
//! board, then get found and erased by hit testing.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use shapesnap_engine::{
    Board, Color, ElementKind, Point, RecognizerConfig, ShapeKind, ShapeVerdict, Stroke,
    StrokeStyle, recognize,
};

/// Square outline offset to `(x0, y0)`, traced from the middle of its top
/// edge like a hand would.
fn square_stroke(x0: f64, y0: f64, side: f64) -> Stroke {
    let n = 80;
    let perimeter = 4.0 * side;
    let points = (0..n)
        .map(|k| {
            let s = (f64::from(k) * perimeter / f64::from(n) + side / 2.0) % perimeter;
            let (x, y) = if s < side {
                (s, 0.0)
            } else if s < 2.0 * side {
                (side, s - side)
            } else if s < 3.0 * side {
                (3.0 * side - s, side)
            } else {
                (0.0, 4.0 * side - s)
            };
            Point::new(x0 + x, y0 + y)
        })
        .collect::<Vec<_>>();
    Stroke::new(points)
}

fn circle_stroke(cx: f64, cy: f64, r: f64) -> Stroke {
    let n = 60;
    Stroke::new(
        (0..n)
            .map(|k| {
                let a = std::f64::consts::TAU * f64::from(k) / f64::from(n);
                Point::new(cx + r * a.cos(), cy + r * a.sin())
            })
            .collect(),
    )
}

fn line_stroke(from: Point, to: Point) -> Stroke {
    Stroke::new(
        (0..=20)
            .map(|k| from.lerp(to, f64::from(k) / 20.0))
            .collect(),
    )
}

fn board() -> Board {
    Board::new(RecognizerConfig::default()).expect("default config is valid")
}

#[test]
fn drawn_square_becomes_rectangle_and_can_be_erased() {
    let mut b = board();
    let style = StrokeStyle {
        color: Color::rgb(30, 120, 200),
        width: 4.0,
    };
    let id = b.commit_stroke(square_stroke(100.0, 100.0, 120.0), style);

    let element = &b.elements()[0];
    assert_eq!(element.id, id);
    assert_eq!(element.style, style);
    let ElementKind::Rectangle { bounds } = element.kind else {
        panic!("expected rectangle, got {:?}", element.kind);
    };
    assert!((bounds.x - 100.0).abs() < 1e-9);
    assert!((bounds.width - 120.0).abs() < 1e-9);

    // Interior counts, not only the outline.
    assert_eq!(b.hit(Point::new(160.0, 160.0), 2.0), Some(id));
    assert_eq!(b.erase_at(Point::new(160.0, 160.0), 2.0), vec![id]);
    assert!(b.elements().is_empty());
}

#[test]
fn drawn_circle_is_hit_at_its_center() {
    let mut b = board();
    let id = b.commit_stroke(circle_stroke(300.0, 200.0, 80.0), StrokeStyle::default());
    assert!(matches!(b.elements()[0].kind, ElementKind::Circle { .. }));
    assert_eq!(b.hit(Point::new(300.0, 200.0), 0.0), Some(id));
    assert_eq!(b.hit(Point::new(300.0, 1000.0), 0.0), None);
}

#[test]
fn drawn_line_keeps_its_endpoints() {
    let mut b = board();
    let from = Point::new(10.0, 10.0);
    let to = Point::new(210.0, 60.0);
    let id = b.commit_stroke(line_stroke(from, to), StrokeStyle::default());
    assert_eq!(b.elements()[0].kind, ElementKind::Line { start: from, end: to });
    assert_eq!(b.hit(Point::new(110.0, 37.0), 3.0), Some(id));
    assert_eq!(b.hit(Point::new(110.0, 80.0), 3.0), None);
}

#[test]
fn short_stroke_stays_freehand() {
    let mut b = board();
    let dab = Stroke::new(vec![
        Point::new(0.0, 0.0),
        Point::new(1.0, 2.0),
        Point::new(3.0, 1.0),
    ]);
    b.commit_stroke(dab, StrokeStyle::default());
    assert!(matches!(b.elements()[0].kind, ElementKind::Path { .. }));
}

#[test]
fn later_shapes_are_on_top() {
    let mut b = board();
    let big = b.commit_stroke(square_stroke(0.0, 0.0, 200.0), StrokeStyle::default());
    let small = b.commit_stroke(circle_stroke(100.0, 100.0, 50.0), StrokeStyle::default());
    assert_eq!(b.hit(Point::new(100.0, 100.0), 0.0), Some(small));
    assert_eq!(b.hit(Point::new(10.0, 10.0), 0.0), Some(big));
}

#[test]
fn recognition_kind_matches_element() {
    let config = RecognizerConfig::default();
    let rec = recognize(&circle_stroke(0.0, 0.0, 50.0), &config);
    assert_eq!(rec.verdict, ShapeVerdict::Circle);
    assert_eq!(rec.verdict.kind(), Some(ShapeKind::Circle));
}

#[test]
fn partial_config_json_fills_defaults() {
    let config: RecognizerConfig = serde_json::from_str(r#"{"min_points": 25}"#).unwrap();
    assert_eq!(config.min_points, 25);
    assert!((config.line_ratio - RecognizerConfig::DEFAULT_LINE_RATIO).abs() < f64::EPSILON);
    assert!(config.validate().is_ok());
}
