//! Transient visual feedback drawn above the elements (guides, masks, markers).
//!
//! Overlays are keyed so each plugin owns and replaces its own feedback without
//! touching the document.

use crate::shapes::SerializableColor;
use kurbo::{Point, Rect};

/// One primitive of an overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayItem {
    /// A guide or helper segment.
    Segment { start: Point, end: Point },
    /// A circular marker.
    Circle { center: Point, radius: f64 },
    /// A translucent highlight over an element.
    Mask { rect: Rect, angle: f64 },
}

/// A group of overlay primitives sharing a paint.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub items: Vec<OverlayItem>,
    pub stroke: SerializableColor,
    pub stroke_width: f64,
    pub fill: Option<SerializableColor>,
}

impl Overlay {
    pub fn new(stroke: SerializableColor, stroke_width: f64) -> Self {
        Self {
            items: Vec::new(),
            stroke,
            stroke_width,
            fill: None,
        }
    }

    pub fn with_fill(mut self, fill: SerializableColor) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn push(&mut self, item: OverlayItem) {
        self.items.push(item);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
