//! Shared types for the shapesnap recognition engine.

use serde::{Deserialize, Serialize};

use crate::element::ElementId;

/// A 2D point in drawing-surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Point at parameter `t` along the segment from `self` to `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            (other.x - self.x).mul_add(t, self.x),
            (other.y - self.y).mul_add(t, self.y),
        )
    }
}

/// One continuous pointer gesture, from pointer-down through pointer-up.
///
/// Points are in capture order and may contain consecutive duplicates.
/// The engine only ever borrows a stroke for the duration of one call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stroke(Vec<Point>);

impl Stroke {
    /// Create a new stroke from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the stroke has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the stroke.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first point, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.0.first()
    }

    /// Returns the last point, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.0.last()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Consumes the stroke and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

impl From<Vec<Point>> for Stroke {
    fn from(points: Vec<Point>) -> Self {
        Self(points)
    }
}

/// Axis-aligned box tightly enclosing a point sequence.
///
/// `width` and `height` are never negative. An empty or single-point
/// sequence yields a degenerate 0x0 box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            self.width.mul_add(0.5, self.x),
            self.height.mul_add(0.5, self.y),
        )
    }

    /// Length of the box diagonal.
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        self.width.hypot(self.height)
    }

    /// Area of the box.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Right edge.
    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.max_x() && p.y >= self.y && p.y <= self.max_y()
    }
}

/// Primitive kinds the engine can recognize.
///
/// Accepts `"square"` as an alias for [`Rectangle`](Self::Rectangle) so
/// that external labels using either name deserialize to the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// A straight segment.
    Line,
    /// A three-vertex polygon.
    Triangle,
    /// An axis-aligned rectangle (squares included).
    #[serde(alias = "square")]
    Rectangle,
    /// An axis-aligned ellipse (circles included).
    Circle,
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Line => "line",
            Self::Triangle => "triangle",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
        };
        f.write_str(name)
    }
}

/// Outcome of classifying one stroke.
///
/// Square and circle verdicts are fully described by the stroke's
/// bounding box, so they carry no geometry of their own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeVerdict {
    /// Not a recognizable primitive; keep the freehand path.
    None,
    /// A straight segment between the stroke's first and last points.
    Line {
        /// First captured point.
        start: Point,
        /// Last captured point.
        end: Point,
    },
    /// A triangle, optionally with explicit vertices preserving orientation.
    ///
    /// When `vertices` is `None`, consumers fall back to the triangle
    /// inscribed in the bounding box (apex top-center).
    Triangle {
        /// The three detected vertices, in no particular winding.
        vertices: Option<[Point; 3]>,
    },
    /// An axis-aligned rectangle filling the bounding box.
    Square,
    /// An ellipse inscribed in the bounding box.
    Circle,
}

impl ShapeVerdict {
    /// The primitive kind this verdict produces, or `None` for a freehand
    /// path.
    #[must_use]
    pub const fn kind(&self) -> Option<ShapeKind> {
        match self {
            Self::None => None,
            Self::Line { .. } => Some(ShapeKind::Line),
            Self::Triangle { .. } => Some(ShapeKind::Triangle),
            Self::Square => Some(ShapeKind::Rectangle),
            Self::Circle => Some(ShapeKind::Circle),
        }
    }

    /// Returns `true` when the stroke was recognized as a primitive.
    #[must_use]
    pub const fn is_shape(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// A verdict paired with the geometry the replacing primitive needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recognition {
    /// The classifier's verdict.
    pub verdict: ShapeVerdict,
    /// Bounding box of the original stroke.
    pub bounds: BoundingBox,
}

/// Errors from the fallible parts of the engine (configuration and the
/// board model). Classification itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Recognizer configuration is invalid.
    #[error("invalid recognizer configuration: {0}")]
    InvalidConfig(String),

    /// No element with the given id exists on the board.
    #[error("no element with id {0}")]
    UnknownElement(ElementId),
}
