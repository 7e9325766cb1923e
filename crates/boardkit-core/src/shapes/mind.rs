//! Mind-map nodes.

use super::{Element, ElementId, ElementStyle, ElementTrait, SerializableColor};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Arrangement of a mind-map subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MindLayout {
    /// Children split between the right and left of the root.
    #[default]
    Standard,
    Right,
    Left,
    Downward,
    Upward,
}

impl MindLayout {
    pub fn is_standard(self) -> bool {
        self == MindLayout::Standard
    }
}

/// A node of a mind map. Children are nested elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindElement {
    pub id: ElementId,
    pub topic: String,
    /// Top-left corner of the node.
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub children: Vec<Element>,
    /// Number of leading children laid out on the right in a standard layout.
    #[serde(default)]
    pub right_node_count: Option<usize>,
    #[serde(default)]
    pub layout: Option<MindLayout>,
    /// First sibling index summarized by this node, when it is an abstract node.
    #[serde(default)]
    pub start: Option<usize>,
    /// Last sibling index summarized by this node, when it is an abstract node.
    #[serde(default)]
    pub end: Option<usize>,
    #[serde(default)]
    pub stroke_color: Option<SerializableColor>,
    #[serde(default)]
    pub link_color: Option<SerializableColor>,
    #[serde(default)]
    pub is_root: bool,
    #[serde(default)]
    pub style: ElementStyle,
}

impl MindElement {
    pub fn new(topic: impl Into<String>, origin: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic: topic.into(),
            origin,
            width,
            height,
            children: Vec::new(),
            right_node_count: None,
            layout: None,
            start: None,
            end: None,
            stroke_color: None,
            link_color: None,
            is_root: false,
            style: ElementStyle::default(),
        }
    }

    /// Create a root node with a standard layout.
    pub fn root(topic: impl Into<String>, origin: Point, width: f64, height: f64) -> Self {
        let mut root = Self::new(topic, origin, width, height);
        root.is_root = true;
        root.layout = Some(MindLayout::Standard);
        root.right_node_count = Some(0);
        root
    }

    pub fn with_children(mut self, children: Vec<Element>) -> Self {
        self.children = children;
        self
    }

    /// Whether this node summarizes a range of its siblings.
    pub fn is_abstract(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Whether this abstract node covers sibling `index`.
    pub fn covers(&self, index: usize) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => index >= start && index <= end,
            _ => false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin, (self.width, self.height))
    }

    /// Index of the child with `id`.
    pub fn child_index(&self, id: ElementId) -> Option<usize> {
        self.children.iter().position(|child| child.id() == id)
    }
}

impl ElementTrait for MindElement {
    fn id(&self) -> ElementId {
        self.id
    }

    fn rectangle(&self) -> Option<Rect> {
        Some(self.bounds())
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abstract_range() {
        let mut node = MindElement::new("summary", Point::ZERO, 28.0, 20.0);
        assert!(!node.is_abstract());
        node.start = Some(1);
        node.end = Some(2);
        assert!(node.is_abstract());
        assert!(node.covers(1));
        assert!(node.covers(2));
        assert!(!node.covers(3));
    }

    #[test]
    fn test_child_index() {
        let a = MindElement::new("a", Point::ZERO, 10.0, 10.0);
        let b = MindElement::new("b", Point::ZERO, 10.0, 10.0);
        let b_id = b.id;
        let root = MindElement::root("root", Point::ZERO, 100.0, 40.0).with_children(vec![a.into(), b.into()]);
        assert_eq!(root.child_index(b_id), Some(1));
        assert!(root.layout.is_some_and(MindLayout::is_standard));
    }
}
