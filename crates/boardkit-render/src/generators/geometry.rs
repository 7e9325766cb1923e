//! Geometry shape generator.

use super::{group_of, label, styled_shape};
use crate::generator::{DrawContext, Generator};
use crate::scene::{NodeId, VisualTree};
use boardkit_core::shapes::Geometry;

/// Outline, fill and centered label of a basic shape.
#[derive(Debug, Default)]
pub struct GeometryShapeGenerator;

impl Generator for GeometryShapeGenerator {
    type Target = Geometry;
    type Data = ();

    fn can_draw(&self, _ctx: &DrawContext<'_>, element: &Geometry, _data: &()) -> bool {
        let rect = element.bounds();
        rect.width() > 0.0 || rect.height() > 0.0
    }

    fn draw(&mut self, _ctx: &DrawContext<'_>, tree: &mut VisualTree, element: &Geometry, _data: &()) -> Option<NodeId> {
        let mut children = vec![tree.create_shape(styled_shape(element.outline(), &element.style))];
        if let Some(text) = element.text.as_deref().filter(|text| !text.is_empty()) {
            children.push(label(tree, element.bounds().center(), text, element.style.stroke()));
        }
        group_of(tree, "geometry", children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorSlot;
    use crate::scene::Visual;
    use boardkit_core::board::Board;
    use boardkit_core::shapes::GeometryShape;
    use kurbo::Point;

    #[test]
    fn test_shape_with_label() {
        let board = Board::default();
        let ctx = DrawContext::new(&board);
        let mut tree = VisualTree::new();
        let root = tree.root();
        let geometry = Geometry::new(GeometryShape::Ellipse, [Point::new(0.0, 0.0), Point::new(80.0, 40.0)]).with_text("start", 20.0);
        let mut slot = GeneratorSlot::new(GeometryShapeGenerator);
        slot.process_drawing(&ctx, &mut tree, &geometry, root, &()).unwrap();

        let group = slot.node().unwrap();
        let children = tree.children(group);
        assert_eq!(children.len(), 2);
        assert!(matches!(tree.visual(children[0]), Some(Visual::Shape(_))));
        match tree.visual(children[1]) {
            Some(Visual::Text(text)) => {
                assert_eq!(text.text, "start");
                assert_eq!(text.center, Point::new(40.0, 20.0));
            }
            other => panic!("expected a label, got {other:?}"),
        }
    }

    #[test]
    fn test_degenerate_shape_not_drawn() {
        let board = Board::default();
        let ctx = DrawContext::new(&board);
        let geometry = Geometry::new(GeometryShape::Rectangle, [Point::new(5.0, 5.0), Point::new(5.0, 5.0)]);
        assert!(!GeometryShapeGenerator.can_draw(&ctx, &geometry, &()));
    }
}
