//! An ordered collection of elements, with stroke commit and erasing.
//!
//! Draw order is insertion order: later elements sit on top. The board
//! owns identity allocation so ids never repeat within one board.

use crate::classify::recognize;
use crate::config::RecognizerConfig;
use crate::element::{Element, ElementId, ElementKind, StrokeStyle};
use crate::types::{EngineError, Point, Stroke};

/// Default RDP tolerance for freehand paths that stay on the board.
pub const DEFAULT_SIMPLIFY_TOLERANCE: f64 = 1.0;

/// A drawing surface's element list.
#[derive(Debug, Clone)]
pub struct Board {
    elements: Vec<Element>,
    next_id: u64,
    config: RecognizerConfig,
    simplify_tolerance: f64,
}

impl Board {
    /// Create an empty board that classifies strokes with `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if `config` fails
    /// [`RecognizerConfig::validate`].
    pub fn new(config: RecognizerConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            elements: Vec::new(),
            next_id: 1,
            config,
            simplify_tolerance: DEFAULT_SIMPLIFY_TOLERANCE,
        })
    }

    /// Set the tolerance used to simplify unrecognized strokes.
    #[must_use]
    pub const fn with_simplify_tolerance(mut self, tolerance: f64) -> Self {
        self.simplify_tolerance = tolerance;
        self
    }

    /// The recognizer configuration in use.
    #[must_use]
    pub const fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    /// Elements in draw order, bottom first.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Look up an element by id.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    const fn allocate_id(&mut self) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an element on top and return its id.
    pub fn push(&mut self, style: StrokeStyle, kind: ElementKind) -> ElementId {
        let id = self.allocate_id();
        self.elements.push(Element { id, style, kind });
        id
    }

    /// Classify a finished pen stroke and add the resulting element.
    ///
    /// A recognized stroke becomes its primitive; anything else is kept
    /// as a simplified freehand path. Returns the new element's id.
    pub fn commit_stroke(&mut self, stroke: Stroke, style: StrokeStyle) -> ElementId {
        let recognition = recognize(&stroke, &self.config);
        let id = self.allocate_id();
        let element = Element::from_stroke(id, style, stroke, &recognition, self.simplify_tolerance);
        log::debug!("committed {id} as {:?}", recognition.verdict.kind());
        self.elements.push(element);
        id
    }

    /// Swap an element's geometry, keeping its id, style, and position in
    /// draw order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownElement`] if `id` is not on the board.
    pub fn replace(&mut self, id: ElementId, kind: ElementKind) -> Result<(), EngineError> {
        let element = self
            .elements
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(EngineError::UnknownElement(id))?;
        element.kind = kind;
        Ok(())
    }

    /// Remove an element and return it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownElement`] if `id` is not on the board.
    pub fn remove(&mut self, id: ElementId) -> Result<Element, EngineError> {
        let index = self
            .elements
            .iter()
            .position(|e| e.id == id)
            .ok_or(EngineError::UnknownElement(id))?;
        Ok(self.elements.remove(index))
    }

    /// The topmost element hit by `point`, if any.
    #[must_use]
    pub fn hit(&self, point: Point, threshold: f64) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.is_near(point, threshold))
            .map(|e| e.id)
    }

    /// Remove every element hit by `point`; returns their ids in draw order.
    pub fn erase_at(&mut self, point: Point, threshold: f64) -> Vec<ElementId> {
        let mut erased = Vec::new();
        self.elements.retain(|e| {
            let hit = e.is_near(point, threshold);
            if hit {
                erased.push(e.id);
            }
            !hit
        });
        if !erased.is_empty() {
            log::debug!("erased {} element(s) at ({}, {})", erased.len(), point.x, point.y);
        }
        erased
    }
}
