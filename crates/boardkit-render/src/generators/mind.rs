//! Mind node generator: parent link or summary brace, frame and topic.

use super::{group_of, label};
use crate::generator::{DrawContext, Generator};
use crate::scene::{NodeId, ShapeNode, VisualTree};
use boardkit_core::shapes::MindElement;
use kurbo::{BezPath, Point, Rect, RoundedRect, Shape};

const NODE_RADIUS: f64 = 4.0;
/// Horizontal reach of a summary brace beyond the covered siblings.
const BRACE_WIDTH: f64 = 12.0;
const BRACE_GAP: f64 = 4.0;

/// Where a mind node sits relative to its neighbours, computed by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MindNodeData {
    /// Rectangle of the parent node, for the link.
    pub parent: Option<Rect>,
    /// Union of the siblings a summary node covers.
    pub covered: Option<Rect>,
}

/// Topic box with its link to the parent, or a brace for summary nodes.
#[derive(Debug, Default)]
pub struct MindNodeGenerator;

fn link(from: Rect, to: Rect) -> BezPath {
    let (start, end) = if to.center().x >= from.center().x {
        (Point::new(from.x1, from.center().y), Point::new(to.x0, to.center().y))
    } else {
        (Point::new(from.x0, from.center().y), Point::new(to.x1, to.center().y))
    };
    let mid = (start.x + end.x) / 2.0;
    let mut path = BezPath::new();
    path.move_to(start);
    path.curve_to(Point::new(mid, start.y), Point::new(mid, end.y), end);
    path
}

fn brace(covered: Rect) -> BezPath {
    let x = covered.x1 + BRACE_GAP;
    let tip = Point::new(x + BRACE_WIDTH, covered.center().y);
    let mut path = BezPath::new();
    path.move_to(Point::new(x, covered.y0));
    path.quad_to(Point::new(x + BRACE_WIDTH / 2.0, covered.y0), Point::new(x + BRACE_WIDTH / 2.0, tip.y - BRACE_WIDTH / 2.0));
    path.line_to(tip);
    path.move_to(Point::new(x, covered.y1));
    path.quad_to(Point::new(x + BRACE_WIDTH / 2.0, covered.y1), Point::new(x + BRACE_WIDTH / 2.0, tip.y + BRACE_WIDTH / 2.0));
    path.line_to(tip);
    path
}

impl Generator for MindNodeGenerator {
    type Target = MindElement;
    type Data = MindNodeData;

    fn can_draw(&self, _ctx: &DrawContext<'_>, element: &MindElement, _data: &MindNodeData) -> bool {
        element.width > 0.0 && element.height > 0.0
    }

    fn draw(&mut self, _ctx: &DrawContext<'_>, tree: &mut VisualTree, element: &MindElement, data: &MindNodeData) -> Option<NodeId> {
        let style = &element.style;
        let stroke = element.stroke_color.map(Into::into).unwrap_or_else(|| style.stroke());
        let link_color = element.link_color.map(Into::into).unwrap_or(stroke);
        let bounds = element.bounds();

        let mut children = Vec::new();
        let connector = if element.is_abstract() {
            data.covered.map(brace)
        } else {
            data.parent.map(|parent| link(parent, bounds))
        };
        if let Some(path) = connector {
            children.push(tree.create_shape(ShapeNode::stroked(path, link_color, style.stroke_width)));
        }
        let frame = RoundedRect::from_rect(bounds, NODE_RADIUS).to_path(0.1);
        children.push(tree.create_shape(ShapeNode::stroked(frame, stroke, style.stroke_width).with_fill(style.fill())));
        children.push(label(tree, bounds.center(), &element.topic, stroke));
        group_of(tree, if element.is_abstract() { "mind-abstract" } else { "mind-node" }, children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorSlot;
    use crate::scene::Visual;
    use boardkit_core::board::Board;
    use boardkit_core::shapes::SerializableColor;
    use peniko::Color;

    #[test]
    fn test_summary_node_draws_gray_brace() {
        let board = Board::default();
        let ctx = DrawContext::new(&board);
        let mut tree = VisualTree::new();
        let root = tree.root();
        let mut node = MindElement::new("Summary", Point::new(300.0, 40.0), 28.0, 20.0);
        node.start = Some(0);
        node.end = Some(1);
        node.stroke_color = Some(SerializableColor::gray());
        node.link_color = Some(SerializableColor::gray());
        let data = MindNodeData {
            parent: None,
            covered: Some(Rect::new(200.0, 0.0, 260.0, 100.0)),
        };
        let mut slot = GeneratorSlot::new(MindNodeGenerator);
        slot.process_drawing(&ctx, &mut tree, &node, root, &data).unwrap();

        let group = slot.node().unwrap();
        assert_eq!(tree.visual(group), Some(&Visual::Group { class: Some("mind-abstract".into()) }));
        let children = tree.children(group);
        assert_eq!(children.len(), 3);
        let gray: Color = SerializableColor::gray().into();
        match tree.visual(children[0]) {
            Some(Visual::Shape(shape)) => {
                assert_eq!(shape.stroke, Some(gray));
                let bounds = shape.path.bounding_box();
                assert!((bounds.x0 - 264.0).abs() < 1e-9);
                assert!((bounds.x1 - 276.0).abs() < 1e-9);
            }
            other => panic!("expected the brace, got {other:?}"),
        }
    }

    #[test]
    fn test_child_links_to_parent() {
        let board = Board::default();
        let ctx = DrawContext::new(&board);
        let mut tree = VisualTree::new();
        let root = tree.root();
        let node = MindElement::new("idea", Point::new(200.0, 0.0), 60.0, 30.0);
        let data = MindNodeData {
            parent: Some(Rect::new(0.0, 0.0, 100.0, 30.0)),
            covered: None,
        };
        let mut slot = GeneratorSlot::new(MindNodeGenerator);
        slot.process_drawing(&ctx, &mut tree, &node, root, &data).unwrap();
        let children = tree.children(slot.node().unwrap());
        match tree.visual(children[0]) {
            Some(Visual::Shape(shape)) => {
                let bounds = shape.path.bounding_box();
                assert!((bounds.x0 - 100.0).abs() < 1e-9);
                assert!((bounds.x1 - 200.0).abs() < 1e-9);
            }
            other => panic!("expected the link, got {other:?}"),
        }
    }
}
