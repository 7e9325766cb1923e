//! Selection outline, hover outline and resize handles.

use super::group_of;
use crate::generator::{DrawContext, Generator};
use crate::scene::{NodeId, ShapeNode, VisualTree};
use boardkit_core::resize::{resize_handles, RESIZE_HANDLE_SIZE};
use boardkit_core::routing::{connector_path, ConnectorShape};
use boardkit_core::shapes::{Element, SerializableColor};
use kurbo::{Circle, Point, Rect, Shape};
use peniko::Color;

const OUTLINE_GAP: f64 = 2.0;
const OUTLINE_WIDTH: f64 = 1.0;
const DASH: f64 = 4.0;

/// Interaction state of the element being decorated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveData {
    pub selected: bool,
    pub hovered: bool,
    /// Whether resize handles are shown.
    pub handles: bool,
}

/// Selection outline, hover outline and resize handles. Drawn into the active layer
/// above all elements.
#[derive(Debug, Default)]
pub struct ActiveGenerator;

fn selection_color() -> Color {
    SerializableColor::selection().into()
}

fn handle_square(tree: &mut VisualTree, center: Point) -> NodeId {
    let half = RESIZE_HANDLE_SIZE / 2.0;
    let rect = Rect::new(center.x - half, center.y - half, center.x + half, center.y + half);
    tree.create_shape(ShapeNode::stroked(rect.to_path(0.1), selection_color(), OUTLINE_WIDTH).with_fill(Some(Color::WHITE)))
}

fn handle_dot(tree: &mut VisualTree, center: Point) -> NodeId {
    let circle = Circle::new(center, RESIZE_HANDLE_SIZE / 2.0);
    tree.create_shape(ShapeNode::stroked(circle.to_path(0.1), selection_color(), OUTLINE_WIDTH).with_fill(Some(Color::WHITE)))
}

impl Generator for ActiveGenerator {
    type Target = Element;
    type Data = ActiveData;

    fn can_draw(&self, _ctx: &DrawContext<'_>, _element: &Element, data: &ActiveData) -> bool {
        data.selected || data.hovered
    }

    fn draw(&mut self, ctx: &DrawContext<'_>, tree: &mut VisualTree, element: &Element, data: &ActiveData) -> Option<NodeId> {
        let mut children = Vec::new();
        if let Element::Line(line) = element {
            let points = ctx.board.line_points(line);
            if !data.selected {
                let outline = connector_path(line.shape, &points);
                let hover = selection_color().with_alpha(0.5);
                children.push(tree.create_shape(ShapeNode::stroked(outline, hover, line.style.stroke_width + 4.0)));
            } else if data.handles {
                let ends = [points.first().copied(), points.last().copied()];
                for end in ends.into_iter().flatten() {
                    children.push(handle_dot(tree, end));
                }
                if line.shape == ConnectorShape::Straight && line.points.len() > 2 {
                    for &via in &line.points[1..line.points.len() - 1] {
                        children.push(handle_square(tree, via));
                    }
                }
            }
        } else {
            let rect = ctx.board.get_rectangle(element)?.inflate(OUTLINE_GAP, OUTLINE_GAP);
            let outline = ShapeNode::stroked(rect.to_path(0.1), selection_color(), OUTLINE_WIDTH);
            let outline = if data.selected { outline.with_dashes(vec![DASH, DASH]) } else { outline };
            children.push(tree.create_shape(outline));
            if data.selected && data.handles {
                if let Some(bounds) = element.rectangle() {
                    for (_, point) in resize_handles(bounds) {
                        children.push(handle_square(tree, point));
                    }
                }
            }
        }
        if children.is_empty() {
            return None;
        }
        group_of(tree, "active", children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorSlot;
    use boardkit_core::board::{Board, BoardOptions};
    use boardkit_core::shapes::{Geometry, GeometryShape};

    fn rect() -> Element {
        Geometry::new(GeometryShape::Rectangle, [Point::new(0.0, 0.0), Point::new(100.0, 50.0)]).into()
    }

    #[test]
    fn test_selected_with_handles() {
        let element = rect();
        let board = Board::new(vec![element.clone()], BoardOptions::default());
        let ctx = DrawContext::new(&board);
        let mut tree = VisualTree::new();
        let root = tree.root();
        let mut slot = GeneratorSlot::new(ActiveGenerator);
        let data = ActiveData {
            selected: true,
            hovered: false,
            handles: true,
        };
        slot.process_drawing(&ctx, &mut tree, &element, root, &data).unwrap();
        assert_eq!(tree.children(slot.node().unwrap()).len(), 9);

        let data = ActiveData { handles: false, ..data };
        slot.process_drawing(&ctx, &mut tree, &element, root, &data).unwrap();
        assert_eq!(tree.children(slot.node().unwrap()).len(), 1);
        assert_eq!(tree.children(root).len(), 1);
    }

    #[test]
    fn test_idle_element_has_no_decoration() {
        let element = rect();
        let board = Board::new(vec![element.clone()], BoardOptions::default());
        let ctx = DrawContext::new(&board);
        let mut tree = VisualTree::new();
        let root = tree.root();
        let mut slot = GeneratorSlot::new(ActiveGenerator);
        slot.process_drawing(&ctx, &mut tree, &element, root, &ActiveData::default()).unwrap();
        assert!(slot.node().is_none());
        assert!(tree.children(root).is_empty());
    }
}
