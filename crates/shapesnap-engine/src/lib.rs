//! shapesnap-engine: freehand stroke recognition for whiteboards (sans-IO).
//!
//! Turns a completed pointer stroke into one of a few primitives (line,
//! triangle, rectangle, ellipse) or leaves it freehand:
//! measure -> line/closure gates -> resample -> straw corners ->
//! corner-count decision -> ratio fallback.
//!
//! Around the classifier sit the board model (elements, hit testing,
//! erasing), freehand simplification, and the boundary to an optional
//! external shape oracle. This crate does no file or network I/O;
//! the oracle transport is supplied by the caller.

pub mod board;
pub mod classify;
pub mod config;
pub mod corners;
pub mod diagnostics;
pub mod element;
pub mod hit;
pub mod metrics;
pub mod oracle;
pub mod resample;
pub mod simplify;
pub mod types;
pub mod vertices;

pub use board::Board;
pub use classify::{classify, classify_with_diagnostics, recognize};
pub use config::RecognizerConfig;
pub use diagnostics::{ClassificationDiagnostics, Clock, NullClock, Rule, WebClock};
pub use element::{Color, Element, ElementId, ElementKind, PathTool, StrokeStyle};
pub use oracle::{OracleError, OracleOptions, OracleVerdict, ShapeOracle, consult};
pub use types::{BoundingBox, EngineError, Point, Recognition, ShapeKind, ShapeVerdict, Stroke};
