//! Vello painter for a visual tree.

use crate::scene::{NodeId, ShapeNode, Visual, VisualTree};
use kurbo::{Affine, BezPath, Point, Rect, Shape, Stroke};
use peniko::{Color, Fill};
use vello::Scene;

/// Encodes a [`VisualTree`] into a vello [`Scene`].
pub struct VelloPainter {
    scene: Scene,
}

impl Default for VelloPainter {
    fn default() -> Self {
        Self::new()
    }
}

fn paint_shape(scene: &mut Scene, shape: &ShapeNode, transform: Affine) {
    if let Some(fill) = shape.fill {
        scene.fill(Fill::NonZero, transform, fill, None, &shape.path);
    }
    if let Some(stroke_color) = shape.stroke {
        let mut stroke = Stroke::new(shape.stroke_width);
        if !shape.dashes.is_empty() {
            stroke = stroke.with_dashes(0.0, shape.dashes.iter().copied());
        }
        scene.stroke(&stroke, transform, stroke_color, None, &shape.path);
    }
}

/// Gray box with a cross; image data is not decoded here.
fn paint_image_placeholder(scene: &mut Scene, bounds: Rect, transform: Affine) {
    let rect_path = bounds.to_path(0.1);
    scene.fill(Fill::NonZero, transform, Color::from_rgba8(200, 200, 200, 255), None, &rect_path);

    let stroke = Stroke::new(2.0);
    let mut cross = BezPath::new();
    cross.move_to(Point::new(bounds.x0, bounds.y0));
    cross.line_to(Point::new(bounds.x1, bounds.y1));
    cross.move_to(Point::new(bounds.x1, bounds.y0));
    cross.line_to(Point::new(bounds.x0, bounds.y1));
    scene.stroke(&stroke, transform, Color::from_rgba8(150, 150, 150, 255), None, &cross);
    scene.stroke(&stroke, transform, Color::from_rgba8(100, 100, 100, 255), None, &rect_path);
}

impl VelloPainter {
    pub fn new() -> Self {
        Self { scene: Scene::new() }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Encode everything below `root`, with `base` applied on top of the tree's own transforms.
    pub fn paint(&mut self, tree: &VisualTree, root: NodeId, base: Affine) {
        self.scene.reset();
        let scene = &mut self.scene;
        let mut skipped_text = 0usize;
        tree.walk(root, |_, visual, transform, _| {
            let transform = base * transform;
            match visual {
                Visual::Group { .. } => {}
                Visual::Shape(shape) => paint_shape(scene, shape, transform),
                Visual::Image { rect, .. } => paint_image_placeholder(scene, *rect, transform),
                Visual::Text(_) => skipped_text += 1,
            }
        });
        if skipped_text > 0 {
            log::trace!("vello painter skipped {skipped_text} text run(s)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_painter_creation() {
        let painter = VelloPainter::new();
        assert!(painter.scene().encoding().is_empty());
    }

    #[test]
    fn test_paint_shapes() {
        let mut tree = VisualTree::new();
        let root = tree.root();
        let shape = tree.create_shape(ShapeNode::stroked(Rect::new(0.0, 0.0, 10.0, 10.0).to_path(0.1), Color::BLACK, 1.0));
        tree.append(root, shape).unwrap();
        let mut painter = VelloPainter::new();
        painter.paint(&tree, root, Affine::IDENTITY);
        assert!(!painter.scene().encoding().is_empty());
    }
}
