//! Classification diagnostics: features, timings, and the deciding rule.
//!
//! Every call to [`classify_with_diagnostics`](crate::classify::classify_with_diagnostics)
//! collects these alongside the verdict. They exist for threshold tuning:
//! seeing *why* a stroke became a square is usually more useful than the
//! verdict itself.
//!
//! Time is read through the [`Clock`] trait. [`WebClock`] is backed by the
//! `web-time` crate (`performance.now()` on WASM, `std::time::Instant`
//! natively); [`NullClock`] records zero durations for callers that only
//! want the verdict.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{BoundingBox, ShapeVerdict};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Source of timestamps for stage timing.
pub trait Clock {
    /// Opaque timestamp type.
    type Instant;

    /// Capture the current time.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// [`Clock`] that never reads the time; every duration is zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullClock;

impl Clock for NullClock {
    type Instant = ();

    fn now(&self) {}

    fn elapsed(&self, _since: &()) -> Duration {
        Duration::ZERO
    }
}

/// [`Clock`] backed by `web_time::Instant`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebClock;

impl Clock for WebClock {
    type Instant = web_time::Instant;

    fn now(&self) -> web_time::Instant {
        web_time::Instant::now()
    }

    fn elapsed(&self, since: &web_time::Instant) -> Duration {
        since.elapsed()
    }
}

/// The step of the cascade that produced the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rule {
    /// Fewer points than `min_points`.
    TooFewPoints,
    /// Endpoint distance above `line_ratio` of path length.
    Straight,
    /// Endpoint distance above `closure_ratio` of path length.
    Open,
    /// Exactly three corners.
    ThreeCorners,
    /// Exactly four corners.
    FourCorners,
    /// No corners and radius ratio below `smooth_circle_radius_ratio`.
    SmoothRound,
    /// Radius ratio below `circle_radius_ratio`.
    Round,
    /// Area ratio above `rectangle_area_ratio`.
    FillsBox,
    /// Area ratio below `triangle_area_ratio`.
    Tapered,
    /// Exactly five corners.
    FiveCorners,
    /// No rule matched; the cascade defaults to a square.
    Default,
}

impl Rule {
    /// Short human-readable description.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::TooFewPoints => "too few points",
            Self::Straight => "nearly straight end to end",
            Self::Open => "too open to be closed",
            Self::ThreeCorners => "three corners",
            Self::FourCorners => "four corners",
            Self::SmoothRound => "no corners, near-constant radius",
            Self::Round => "near-constant radius",
            Self::FillsBox => "fills its bounding box",
            Self::Tapered => "tapers inside its bounding box",
            Self::FiveCorners => "five corners",
            Self::Default => "no rule matched",
        }
    }
}

/// Diagnostics collected from a single classification.
///
/// Stages that the cascade never reached are absent from `stages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationDiagnostics {
    /// Number of points in the input stroke.
    pub point_count: usize,
    /// Per-stage timings and metrics, in execution order.
    pub stages: Vec<StageDiagnostics>,
    /// The rule that decided the verdict.
    pub rule: Rule,
    /// The verdict.
    pub verdict: ShapeVerdict,
    /// Total wall-clock duration of the classification (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
}

/// Diagnostics for a single cascade stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Whole-stroke measurements feeding the line and closure gates.
    Measure {
        /// Total path length.
        path_length: f64,
        /// Distance between the first and last points.
        endpoint_distance: f64,
        /// Bounding box of the stroke.
        bounds: BoundingBox,
    },
    /// Arc-length resampling of the closed stroke.
    Resample {
        /// Spacing used, in surface units.
        spacing: f64,
        /// Points in the closed input (stroke plus closing point).
        input_points: usize,
        /// Points after resampling.
        output_points: usize,
    },
    /// Straw corner detection.
    Corners {
        /// Cleaned corner indices into the resampled path.
        indices: Vec<usize>,
    },
    /// Ratio features for strokes without 3 or 4 corners.
    Fallback {
        /// Radius ratio, `None` when undefined.
        radius_ratio: Option<f64>,
        /// Area ratio, `None` when undefined.
        area_ratio: Option<f64>,
    },
}

impl ClassificationDiagnostics {
    /// Start a record for a stroke of `point_count` points.
    pub(crate) const fn new(point_count: usize) -> Self {
        Self {
            point_count,
            stages: Vec::new(),
            rule: Rule::Default,
            verdict: ShapeVerdict::None,
            total_duration: Duration::ZERO,
        }
    }

    /// Append a completed stage.
    pub(crate) fn push(&mut self, duration: Duration, metrics: StageMetrics) {
        self.stages.push(StageDiagnostics { duration, metrics });
    }

    /// Corner count, if corner detection ran.
    #[must_use]
    pub fn corner_count(&self) -> Option<usize> {
        self.stages.iter().find_map(|s| match &s.metrics {
            StageMetrics::Corners { indices } => Some(indices.len()),
            _ => None,
        })
    }

    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Classification Report\n{}", "=".repeat(60)));
        lines.push(format!("Points: {}", self.point_count));
        lines.push(format!(
            "Verdict: {}  ({})",
            verdict_name(&self.verdict),
            self.rule.describe(),
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<12} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);
        for stage in &self.stages {
            let ms = duration_ms(stage.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let (name, details) = format_metrics(&stage.metrics);
            lines.push(format!("{name:<12} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.join("\n")
    }
}

/// Short lowercase name for a verdict.
#[must_use]
pub fn verdict_name(verdict: &ShapeVerdict) -> String {
    verdict
        .kind()
        .map_or_else(|| "none".to_string(), |k| k.to_string())
}

/// Convert a `Duration` to fractional milliseconds.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Stage name and one-line details for the report table.
fn format_metrics(metrics: &StageMetrics) -> (&'static str, String) {
    match metrics {
        StageMetrics::Measure {
            path_length,
            endpoint_distance,
            bounds,
        } => {
            let closure = if *path_length > 0.0 {
                endpoint_distance / path_length
            } else {
                0.0
            };
            (
                "Measure",
                format!(
                    "len={path_length:.1} gap={endpoint_distance:.1} ({closure:.2}) box={:.1}x{:.1}",
                    bounds.width, bounds.height,
                ),
            )
        }
        StageMetrics::Resample {
            spacing,
            input_points,
            output_points,
        } => (
            "Resample",
            format!("spacing={spacing:.2} pts={input_points}->{output_points}"),
        ),
        StageMetrics::Corners { indices } => {
            ("Corners", format!("{} at {indices:?}", indices.len()))
        }
        StageMetrics::Fallback {
            radius_ratio,
            area_ratio,
        } => (
            "Fallback",
            format!(
                "radius_ratio={} area_ratio={}",
                format_ratio(*radius_ratio),
                format_ratio(*area_ratio),
            ),
        ),
    }
}

fn format_ratio(ratio: Option<f64>) -> String {
    ratio.map_or_else(|| "undefined".to_string(), |r| format!("{r:.3}"))
}
