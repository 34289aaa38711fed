//! Board elements: the typed primitives that replace recognized strokes.
//!
//! An element is created once and never edited in place; changing one
//! means replacing it wholesale on the [`Board`](crate::board::Board).

use crate::hit;
use crate::metrics::bounding_box;
use crate::simplify::simplify;
use crate::types::{BoundingBox, Point, Recognition, ShapeVerdict, Stroke};

/// Stable identity of an element on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Straight RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Opaque color from red, green, and blue channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Appearance shared by every element kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Outline color.
    pub color: Color,
    /// Outline width in surface units.
    pub width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 2.0,
        }
    }
}

/// What drew a freehand path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathTool {
    /// Ordinary ink.
    #[default]
    Pen,
    /// Eraser trail.
    Eraser,
}

/// Shape-specific geometry of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// A freehand polyline.
    Path {
        /// Points in drawing order.
        points: Vec<Point>,
        /// Tool that produced the path.
        tool: PathTool,
    },
    /// A straight segment.
    Line {
        /// First endpoint.
        start: Point,
        /// Second endpoint.
        end: Point,
    },
    /// An axis-aligned rectangle.
    Rectangle {
        /// Extent of the rectangle.
        bounds: BoundingBox,
    },
    /// An axis-aligned ellipse inscribed in `bounds`.
    Circle {
        /// Box enclosing the ellipse.
        bounds: BoundingBox,
    },
    /// A triangle.
    ///
    /// Without explicit vertices the triangle is the one inscribed in
    /// `bounds`: apex at top-center, base along the bottom edge.
    Triangle {
        /// Box enclosing the triangle.
        bounds: BoundingBox,
        /// Explicit vertices preserving the drawn orientation.
        vertices: Option<[Point; 3]>,
    },
    /// A run of text, anchored at its top-left corner.
    Text {
        /// Top-left anchor.
        origin: Point,
        /// Text content.
        content: String,
        /// Font size in surface units.
        font_size: f64,
    },
    /// A placed image.
    Image {
        /// Placement box.
        bounds: BoundingBox,
        /// Where the image data comes from (URL or asset key).
        source: String,
    },
}

impl ElementKind {
    /// Geometry for a recognized stroke.
    ///
    /// Returns `None` for [`ShapeVerdict::None`]; the caller keeps the
    /// freehand path in that case.
    #[must_use]
    pub const fn from_recognition(recognition: &Recognition) -> Option<Self> {
        let bounds = recognition.bounds;
        match recognition.verdict {
            ShapeVerdict::None => None,
            ShapeVerdict::Line { start, end } => Some(Self::Line { start, end }),
            ShapeVerdict::Triangle { vertices } => Some(Self::Triangle { bounds, vertices }),
            ShapeVerdict::Square => Some(Self::Rectangle { bounds }),
            ShapeVerdict::Circle => Some(Self::Circle { bounds }),
        }
    }

    /// Axis-aligned extent of the geometry.
    #[must_use]
    pub fn bounds(&self) -> BoundingBox {
        match self {
            Self::Path { points, .. } => bounding_box(points),
            Self::Line { start, end } => bounding_box(&[*start, *end]),
            Self::Rectangle { bounds }
            | Self::Circle { bounds }
            | Self::Triangle { bounds, .. }
            | Self::Image { bounds, .. } => *bounds,
            Self::Text {
                origin,
                content,
                font_size,
            } => hit::text_bounds(*origin, content, *font_size),
        }
    }
}

/// One item on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Identity on the owning board.
    pub id: ElementId,
    /// Color and outline width.
    pub style: StrokeStyle,
    /// Geometry.
    pub kind: ElementKind,
}

impl Element {
    /// Build the element that replaces a finished pen stroke.
    ///
    /// Recognized strokes become the matching primitive; unrecognized ones
    /// stay freehand, simplified with `simplify_tolerance` (0 keeps every
    /// point). Either way the stroke's style carries over.
    #[must_use]
    pub fn from_stroke(
        id: ElementId,
        style: StrokeStyle,
        stroke: Stroke,
        recognition: &Recognition,
        simplify_tolerance: f64,
    ) -> Self {
        let kind = ElementKind::from_recognition(recognition).unwrap_or_else(|| ElementKind::Path {
            points: simplify(stroke.points(), simplify_tolerance),
            tool: PathTool::Pen,
        });
        Self { id, style, kind }
    }

    /// Whether `point` is within `threshold` of (or inside) this element.
    #[must_use]
    pub fn is_near(&self, point: Point, threshold: f64) -> bool {
        hit::is_near(&self.kind, point, threshold)
    }
}
