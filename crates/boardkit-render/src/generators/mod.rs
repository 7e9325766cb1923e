//! Concrete generators for each element kind, plus the active-state decoration.

mod active;
mod geometry;
mod image;
mod line;
mod mind;

pub use active::{ActiveData, ActiveGenerator};
pub use geometry::GeometryShapeGenerator;
pub use image::ImageGenerator;
pub use line::{LineShapeGenerator, ARROW_LENGTH};
pub use mind::{MindNodeData, MindNodeGenerator};

use crate::scene::{NodeId, ShapeNode, TextNode, VisualTree};
use boardkit_core::shapes::ElementStyle;
use kurbo::{BezPath, Point};
use peniko::Color;

/// Font size of element labels.
pub const LABEL_FONT_SIZE: f64 = 14.0;

/// Stroke and fill of `path` as the element style asks.
pub(crate) fn styled_shape(path: BezPath, style: &ElementStyle) -> ShapeNode {
    ShapeNode::stroked(path, style.stroke(), style.stroke_width)
        .with_fill(style.fill())
        .with_dashes(style.stroke_style.dash_pattern(style.stroke_width))
}

/// A group holding `children`. If the tree refuses one of them, nothing of the
/// drawing is kept.
pub(crate) fn group_of(tree: &mut VisualTree, class: &str, children: impl IntoIterator<Item = NodeId>) -> Option<NodeId> {
    let group = tree.create_group(Some(class));
    let mut children = children.into_iter();
    while let Some(child) = children.next() {
        if let Err(err) = tree.append(group, child) {
            log::warn!("dropping {class} drawing: {err}");
            tree.discard(group);
            for rest in children.by_ref() {
                tree.discard(rest);
            }
            return None;
        }
    }
    Some(group)
}

pub(crate) fn label(tree: &mut VisualTree, center: Point, text: &str, color: Color) -> NodeId {
    tree.create_text(TextNode {
        center,
        text: text.to_owned(),
        font_size: LABEL_FONT_SIZE,
        color,
    })
}
