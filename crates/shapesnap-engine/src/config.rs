//! Tunable thresholds for the recognition cascade.

use serde::{Deserialize, Serialize};

use crate::types::EngineError;

/// Thresholds for the stroke classifier.
///
/// The values were tuned by hand against real pointer input. Several look
/// redundant (the two circle cutoffs, for instance) but are layered gates
/// and are kept as separate fields.
///
/// Fields are public and unchecked; call [`validate`](Self::validate)
/// once when accepting a config from outside the program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Strokes with fewer points are never classified.
    pub min_points: usize,

    /// A stroke whose endpoint distance exceeds this fraction of its path
    /// length is a line.
    pub line_ratio: f64,

    /// A non-line stroke whose endpoint distance exceeds this fraction of
    /// its path length is too open to be a closed primitive.
    pub closure_ratio: f64,

    /// Lower bound on the resampling spacing, in surface units.
    pub min_spacing: f64,

    /// Resampling spacing is the bounding-box diagonal divided by this.
    pub spacing_divisor: f64,

    /// Half-window `W` of the straw corner detector, in resampled steps.
    pub straw_window: usize,

    /// A straw shorter than this fraction of the straight-line window span
    /// (`2 * W * average spacing`) marks a corner.
    pub straw_ratio: f64,

    /// Corners fewer than this many indices apart are merged.
    pub corner_merge_gap: usize,

    /// A trailing corner within this many steps of the first corner across
    /// the closing seam is dropped.
    pub wraparound_gap: usize,

    /// Radius ratio below which a stroke with no corners is a circle.
    pub smooth_circle_radius_ratio: f64,

    /// Radius ratio below which any fallback stroke is a circle.
    pub circle_radius_ratio: f64,

    /// Area ratio above which a fallback stroke is a rectangle.
    pub rectangle_area_ratio: f64,

    /// Area ratio below which a fallback stroke is a triangle.
    pub triangle_area_ratio: f64,
}

impl RecognizerConfig {
    /// Default minimum point count.
    pub const DEFAULT_MIN_POINTS: usize = 10;
    /// Default line ratio.
    pub const DEFAULT_LINE_RATIO: f64 = 0.85;
    /// Default closure ratio.
    pub const DEFAULT_CLOSURE_RATIO: f64 = 0.3;
    /// Default minimum resampling spacing.
    pub const DEFAULT_MIN_SPACING: f64 = 5.0;
    /// Default spacing divisor.
    pub const DEFAULT_SPACING_DIVISOR: f64 = 40.0;
    /// Default straw half-window.
    pub const DEFAULT_STRAW_WINDOW: usize = 3;
    /// Default straw ratio.
    pub const DEFAULT_STRAW_RATIO: f64 = 0.95;
    /// Default corner merge gap.
    pub const DEFAULT_CORNER_MERGE_GAP: usize = 3;
    /// Default wrap-around gap.
    pub const DEFAULT_WRAPAROUND_GAP: usize = 4;
    /// Default radius ratio for corner-free circles.
    pub const DEFAULT_SMOOTH_CIRCLE_RADIUS_RATIO: f64 = 0.25;
    /// Default radius ratio for circles.
    pub const DEFAULT_CIRCLE_RADIUS_RATIO: f64 = 0.20;
    /// Default area ratio for rectangles.
    pub const DEFAULT_RECTANGLE_AREA_RATIO: f64 = 0.80;
    /// Default area ratio for triangles.
    pub const DEFAULT_TRIANGLE_AREA_RATIO: f64 = 0.65;

    /// Check every field for a usable value.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] naming the first offending
    /// field.
    pub fn validate(&self) -> Result<(), EngineError> {
        let unit_ratios = [
            ("line_ratio", self.line_ratio),
            ("closure_ratio", self.closure_ratio),
            ("straw_ratio", self.straw_ratio),
            ("smooth_circle_radius_ratio", self.smooth_circle_radius_ratio),
            ("circle_radius_ratio", self.circle_radius_ratio),
            ("rectangle_area_ratio", self.rectangle_area_ratio),
            ("triangle_area_ratio", self.triangle_area_ratio),
        ];
        for (name, value) in unit_ratios {
            if !(value.is_finite() && value > 0.0 && value <= 1.0) {
                return Err(EngineError::InvalidConfig(format!(
                    "{name} must be in (0, 1], got {value}"
                )));
            }
        }

        if !(self.min_spacing.is_finite() && self.min_spacing > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "min_spacing must be positive, got {}",
                self.min_spacing
            )));
        }
        if !(self.spacing_divisor.is_finite() && self.spacing_divisor > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "spacing_divisor must be positive, got {}",
                self.spacing_divisor
            )));
        }
        if self.straw_window == 0 {
            return Err(EngineError::InvalidConfig(
                "straw_window must be at least 1".to_string(),
            ));
        }
        if self.closure_ratio > self.line_ratio {
            return Err(EngineError::InvalidConfig(format!(
                "closure_ratio ({}) must not exceed line_ratio ({})",
                self.closure_ratio, self.line_ratio
            )));
        }
        Ok(())
    }
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            min_points: Self::DEFAULT_MIN_POINTS,
            line_ratio: Self::DEFAULT_LINE_RATIO,
            closure_ratio: Self::DEFAULT_CLOSURE_RATIO,
            min_spacing: Self::DEFAULT_MIN_SPACING,
            spacing_divisor: Self::DEFAULT_SPACING_DIVISOR,
            straw_window: Self::DEFAULT_STRAW_WINDOW,
            straw_ratio: Self::DEFAULT_STRAW_RATIO,
            corner_merge_gap: Self::DEFAULT_CORNER_MERGE_GAP,
            wraparound_gap: Self::DEFAULT_WRAPAROUND_GAP,
            smooth_circle_radius_ratio: Self::DEFAULT_SMOOTH_CIRCLE_RADIUS_RATIO,
            circle_radius_ratio: Self::DEFAULT_CIRCLE_RADIUS_RATIO,
            rectangle_area_ratio: Self::DEFAULT_RECTANGLE_AREA_RATIO,
            triangle_area_ratio: Self::DEFAULT_TRIANGLE_AREA_RATIO,
        }
    }
}
