//! Boundary to an optional external shape-confirmation service.
//!
//! The service takes a rendered image of a stroke and answers with
//! `{"isShape": bool, "shapeType": "circle"}`. It is advisory and slow,
//! so it never sits on the local classification path: callers apply the
//! local verdict first and may consult the oracle afterwards. Every
//! failure fails closed, meaning "no shape detected".
//!
//! Transport is the implementor's business. This module only renders
//! the request image and interprets the answer.

use serde::Deserialize;
use tiny_skia::{Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::metrics::bounding_box;
use crate::types::{Point, ShapeKind};

/// Errors at the oracle boundary.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// The stroke could not be rasterized or encoded.
    #[error("failed to render stroke: {0}")]
    Render(String),

    /// The request never got a usable reply.
    #[error("oracle transport failed: {0}")]
    Transport(String),

    /// The reply did not match the expected shape.
    #[error("malformed oracle response: {0}")]
    Malformed(String),

    /// The oracle did not answer in time.
    #[error("oracle timed out")]
    Timeout,
}

/// The oracle's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleVerdict {
    /// Whether the image shows a recognizable primitive.
    pub is_shape: bool,
    /// Which primitive, when `is_shape` holds.
    #[serde(default)]
    pub shape_type: Option<ShapeKind>,
}

impl OracleVerdict {
    /// Parse a JSON reply body.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Malformed`] if the body is not the expected
    /// object or names an unknown shape type.
    pub fn from_json(body: &str) -> Result<Self, OracleError> {
        serde_json::from_str(body).map_err(|e| OracleError::Malformed(e.to_string()))
    }

    /// The confirmed primitive, if any.
    #[must_use]
    pub const fn confirmed(&self) -> Option<ShapeKind> {
        if self.is_shape { self.shape_type } else { None }
    }
}

/// A shape-confirmation service.
///
/// Implementations own transport and timeouts; a slow call should be
/// made off the interactive path.
pub trait ShapeOracle {
    /// Ask whether the PNG image shows a primitive shape.
    ///
    /// # Errors
    ///
    /// Any [`OracleError`]; callers treat every error as "no shape".
    fn confirm(&self, png: &[u8]) -> Result<OracleVerdict, OracleError>;
}

/// Rendering parameters for oracle requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OracleOptions {
    /// Side of the square canvas, in pixels.
    pub size: u32,
    /// Stroke width on the canvas, in pixels.
    pub line_width: f32,
}

impl Default for OracleOptions {
    fn default() -> Self {
        Self {
            size: 256,
            line_width: 4.0,
        }
    }
}

/// Rasterize a stroke as black ink on white and encode it as PNG.
///
/// The stroke is scaled uniformly and centered so its larger bounding-box
/// side fills the canvas minus a margin. Aspect ratio is preserved.
///
/// # Errors
///
/// Returns [`OracleError::Render`] for fewer than two points, a zero-size
/// canvas, or a PNG encoding failure.
#[allow(clippy::cast_possible_truncation)]
pub fn render_stroke_png(points: &[Point], size: u32, line_width: f32) -> Result<Vec<u8>, OracleError> {
    if points.len() < 2 {
        return Err(OracleError::Render(format!(
            "need at least 2 points, got {}",
            points.len()
        )));
    }

    let bounds = bounding_box(points);
    let canvas = f64::from(size);
    let margin = canvas.mul_add(0.1, f64::from(line_width));
    let extent = bounds.width.max(bounds.height);
    let scale = if extent > 0.0 {
        ((canvas - 2.0 * margin) / extent).max(0.0)
    } else {
        1.0
    };
    let center = bounds.center();
    let to_canvas = |p: &Point| {
        (
            (p.x - center.x).mul_add(scale, canvas / 2.0) as f32,
            (p.y - center.y).mul_add(scale, canvas / 2.0) as f32,
        )
    };

    let mut pb = PathBuilder::new();
    let (x, y) = to_canvas(&points[0]);
    pb.move_to(x, y);
    for p in &points[1..] {
        let (x, y) = to_canvas(p);
        pb.line_to(x, y);
    }
    let path = pb
        .finish()
        .ok_or_else(|| OracleError::Render("degenerate path".to_string()))?;

    let stroke = Stroke {
        width: line_width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };
    let mut paint = Paint::default();
    paint.set_color_rgba8(0, 0, 0, 255);
    paint.anti_alias = true;

    let mut pixmap = Pixmap::new(size, size)
        .ok_or_else(|| OracleError::Render(format!("invalid canvas size {size}")))?;
    pixmap.fill(Color::WHITE);
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);

    pixmap
        .encode_png()
        .map_err(|e| OracleError::Render(e.to_string()))
}

/// Render a stroke, ask the oracle, and interpret the answer.
///
/// Fails closed: render errors, oracle errors, `isShape == false`, and a
/// missing shape type all yield `None`. Whether a confirmed kind may
/// override the local verdict is the caller's policy.
pub fn consult<O: ShapeOracle + ?Sized>(
    oracle: &O,
    points: &[Point],
    options: &OracleOptions,
) -> Option<ShapeKind> {
    let answer = render_stroke_png(points, options.size, options.line_width)
        .and_then(|png| oracle.confirm(&png));
    match answer {
        Ok(verdict) => {
            log::debug!("oracle answered {verdict:?}");
            verdict.confirmed()
        }
        Err(e) => {
            log::warn!("shape oracle failed, treating as no shape: {e}");
            None
        }
    }
}
