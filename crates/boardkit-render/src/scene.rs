//! Retained visual tree.
//!
//! A slotmap arena of groups, shapes, text runs and images. Node ids are
//! generational, so a handle to a removed node is detected instead of silently
//! aliasing whatever reused its slot. Attach semantics follow the DOM: appending
//! a node that already has a parent moves it.

use kurbo::{Affine, BezPath, Point, Rect};
use peniko::Color;
use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

new_key_type! {
    /// Handle to a node of a [`VisualTree`].
    pub struct NodeId;
}

/// Visual tree errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("node {0:?} is no longer in the tree")]
    StaleNode(NodeId),
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
}

/// Result type for visual tree operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Paint of a vector shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeNode {
    pub path: BezPath,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    /// Dash lengths; empty for a solid stroke.
    pub dashes: Vec<f64>,
}

impl ShapeNode {
    /// Outline-only shape.
    pub fn stroked(path: BezPath, stroke: Color, stroke_width: f64) -> Self {
        Self {
            path,
            fill: None,
            stroke: Some(stroke),
            stroke_width,
            dashes: Vec::new(),
        }
    }

    /// Fill-only shape.
    pub fn filled(path: BezPath, fill: Color) -> Self {
        Self {
            path,
            fill: Some(fill),
            stroke: None,
            stroke_width: 0.0,
            dashes: Vec::new(),
        }
    }

    pub fn with_fill(mut self, fill: Option<Color>) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_dashes(mut self, dashes: Vec<f64>) -> Self {
        self.dashes = dashes;
        self
    }
}

/// A single line of text, anchored at its center.
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub center: Point,
    pub text: String,
    pub font_size: f64,
    pub color: Color,
}

/// Payload of a visual node.
#[derive(Debug, Clone, PartialEq)]
pub enum Visual {
    Group { class: Option<String> },
    Shape(ShapeNode),
    Text(TextNode),
    Image { url: String, rect: Rect },
}

#[derive(Debug)]
struct NodeData {
    visual: Visual,
    transform: Affine,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed tree of visual nodes with a permanent root group.
#[derive(Debug)]
pub struct VisualTree {
    nodes: SlotMap<NodeId, NodeData>,
    root: NodeId,
}

impl Default for VisualTree {
    fn default() -> Self {
        Self::new()
    }
}

impl VisualTree {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeData {
            visual: Visual::Group { class: None },
            transform: Affine::IDENTITY,
            parent: None,
            children: Vec::new(),
        });
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    fn create(&mut self, visual: Visual) -> NodeId {
        self.nodes.insert(NodeData {
            visual,
            transform: Affine::IDENTITY,
            parent: None,
            children: Vec::new(),
        })
    }

    /// A detached group.
    pub fn create_group(&mut self, class: Option<&str>) -> NodeId {
        self.create(Visual::Group {
            class: class.map(str::to_owned),
        })
    }

    /// A detached shape.
    pub fn create_shape(&mut self, shape: ShapeNode) -> NodeId {
        self.create(Visual::Shape(shape))
    }

    /// A detached text run.
    pub fn create_text(&mut self, text: TextNode) -> NodeId {
        self.create(Visual::Text(text))
    }

    /// A group attached as the topmost child of the root.
    pub fn create_layer(&mut self, class: &str) -> NodeId {
        let root = self.root;
        let layer = self.create_group(Some(class));
        if let Some(data) = self.nodes.get_mut(root) {
            data.children.push(layer);
            if let Some(layer_data) = self.nodes.get_mut(layer) {
                layer_data.parent = Some(root);
            }
        }
        layer
    }

    /// A detached image.
    pub fn create_image(&mut self, url: impl Into<String>, rect: Rect) -> NodeId {
        self.create(Visual::Image { url: url.into(), rect })
    }

    pub fn is_alive(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    fn data(&self, node: NodeId) -> SceneResult<&NodeData> {
        self.nodes.get(node).ok_or(SceneError::StaleNode(node))
    }

    fn data_mut(&mut self, node: NodeId) -> SceneResult<&mut NodeData> {
        self.nodes.get_mut(node).ok_or(SceneError::StaleNode(node))
    }

    pub fn visual(&self, node: NodeId) -> Option<&Visual> {
        self.nodes.get(node).map(|data| &data.visual)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|data| data.parent)
    }

    /// Children of `node` in paint order; empty for a stale node.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node).map(|data| data.children.as_slice()).unwrap_or_default()
    }

    pub fn transform(&self, node: NodeId) -> Option<Affine> {
        self.nodes.get(node).map(|data| data.transform)
    }

    pub fn set_transform(&mut self, node: NodeId, transform: Affine) -> SceneResult<()> {
        self.data_mut(node)?.transform = transform;
        Ok(())
    }

    /// Whether `node` is `ancestor` itself or lies below it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn detach(&mut self, node: NodeId) -> SceneResult<()> {
        let Some(parent) = self.data(node)?.parent else {
            return Ok(());
        };
        if let Some(data) = self.nodes.get_mut(parent) {
            data.children.retain(|&child| child != node);
        }
        self.data_mut(node)?.parent = None;
        Ok(())
    }

    fn insert_child(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) -> SceneResult<()> {
        self.data(parent)?;
        self.detach(child)?;
        let children = &mut self.data_mut(parent)?.children;
        match index {
            Some(index) => children.insert(index.min(children.len()), child),
            None => children.push(child),
        }
        self.data_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Attach `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        self.insert_child(parent, child, None)
    }

    /// Attach `child` as the first child of `parent`.
    pub fn prepend(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        self.insert_child(parent, child, Some(0))
    }

    /// Put `new` where `old` is and free `old` with its subtree.
    pub fn replace_with(&mut self, old: NodeId, new: NodeId) -> SceneResult<()> {
        self.data(new)?;
        let parent = self.data(old)?.parent;
        match parent {
            Some(parent) => {
                let index = self
                    .children(parent)
                    .iter()
                    .position(|&child| child == old)
                    .ok_or(SceneError::NotAChild { parent, child: old })?;
                self.insert_child(parent, new, Some(index))?;
            }
            None => self.detach(new)?,
        }
        self.remove(old)
    }

    fn free_subtree(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(data) = self.nodes.remove(id) {
                stack.extend(data.children);
            }
        }
    }

    /// Detach `node` and free it together with its subtree.
    pub fn remove(&mut self, node: NodeId) -> SceneResult<()> {
        self.detach(node)?;
        self.free_subtree(node);
        Ok(())
    }

    /// Like [`remove`](Self::remove), but a stale `node` is simply ignored.
    pub fn discard(&mut self, node: NodeId) {
        if let Some(parent) = self.parent(node) {
            if let Some(data) = self.nodes.get_mut(parent) {
                data.children.retain(|&child| child != node);
            }
        }
        self.free_subtree(node);
    }

    /// Remove every child of `node`.
    pub fn clear_children(&mut self, node: NodeId) -> SceneResult<()> {
        let children = std::mem::take(&mut self.data_mut(node)?.children);
        for child in children {
            if let Some(data) = self.nodes.get_mut(child) {
                data.parent = None;
            }
            self.remove(child)?;
        }
        Ok(())
    }

    /// Move the listed children of `parent` to the front, in order. Children not
    /// listed keep their relative order after them.
    pub fn reorder(&mut self, parent: NodeId, order: &[NodeId]) -> SceneResult<()> {
        let children = &self.data(parent)?.children;
        if let Some(&child) = order.iter().find(|child| !children.contains(child)) {
            return Err(SceneError::NotAChild { parent, child });
        }
        let rest: Vec<NodeId> = children.iter().copied().filter(|child| !order.contains(child)).collect();
        let data = self.data_mut(parent)?;
        data.children = order.iter().copied().chain(rest).collect();
        Ok(())
    }

    /// Depth-first walk below `node` (inclusive) with accumulated transforms.
    pub fn walk(&self, node: NodeId, mut visit: impl FnMut(NodeId, &Visual, Affine, usize)) {
        fn go(tree: &VisualTree, node: NodeId, parent: Affine, depth: usize, visit: &mut dyn FnMut(NodeId, &Visual, Affine, usize)) {
            let Some(data) = tree.nodes.get(node) else {
                return;
            };
            let transform = parent * data.transform;
            visit(node, &data.visual, transform, depth);
            for &child in &data.children {
                go(tree, child, transform, depth + 1, visit);
            }
        }
        go(self, node, Affine::IDENTITY, 0, &mut visit);
    }
}
