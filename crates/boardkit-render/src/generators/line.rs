//! Connector generator with arrow markers and text labels.

use super::{group_of, label, styled_shape, LABEL_FONT_SIZE};
use crate::generator::{AfterDraw, DrawContext, Generator};
use crate::scene::{NodeId, ShapeNode, VisualTree};
use boardkit_core::routing::connector_path;
use boardkit_core::shapes::{Line, LineMarker};
use kurbo::{BezPath, Point, Rect, Shape, Vec2};
use peniko::Color;

/// Length of an arrow head along the connector.
pub const ARROW_LENGTH: f64 = 12.0;
const ARROW_HALF_WIDTH: f64 = 5.0;
const LABEL_PADDING: f64 = 4.0;

/// Connector path with arrow heads. Labels are added after the path is on
/// screen, on top of it.
#[derive(Debug, Default)]
pub struct LineShapeGenerator;

fn arrow_head(tip: Point, from: Point) -> Option<BezPath> {
    let direction = tip - from;
    let length = direction.hypot();
    if length < f64::EPSILON {
        return None;
    }
    let unit = direction / length;
    let normal = Vec2::new(-unit.y, unit.x);
    let base = tip - unit * ARROW_LENGTH;
    let mut path = BezPath::new();
    path.move_to(tip);
    path.line_to(base + normal * ARROW_HALF_WIDTH);
    path.line_to(base - normal * ARROW_HALF_WIDTH);
    path.close_path();
    Some(path)
}

impl Generator for LineShapeGenerator {
    type Target = Line;
    type Data = ();

    fn can_draw(&self, _ctx: &DrawContext<'_>, element: &Line, _data: &()) -> bool {
        element.points.len() >= 2
    }

    fn draw(&mut self, ctx: &DrawContext<'_>, tree: &mut VisualTree, element: &Line, _data: &()) -> Option<NodeId> {
        let points = ctx.board.line_points(element);
        let (&first, &last) = (points.first()?, points.last()?);
        let mut children = vec![tree.create_shape(styled_shape(connector_path(element.shape, &points), &element.style))];

        let color = element.style.stroke();
        let ends = [
            (element.source.marker, first, points.get(1).copied()),
            (element.target.marker, last, points.len().checked_sub(2).and_then(|i| points.get(i).copied())),
        ];
        for (marker, tip, from) in ends {
            if marker != LineMarker::Arrow {
                continue;
            }
            if let Some(head) = from.and_then(|from| arrow_head(tip, from)) {
                children.push(tree.create_shape(ShapeNode::filled(head, color)));
            }
        }
        group_of(tree, "line", children)
    }

    fn as_after_draw(&mut self) -> Option<&mut dyn AfterDraw<Line>> {
        Some(self)
    }
}

impl AfterDraw<Line> for LineShapeGenerator {
    fn after_draw(&mut self, ctx: &DrawContext<'_>, tree: &mut VisualTree, element: &Line, node: NodeId) {
        if element.texts.is_empty() {
            return;
        }
        let points = ctx.board.line_points(element);
        for (center, text) in element.text_positions(&points) {
            // Rough advance estimate; real glyph metrics belong to the painter.
            let half_width = text.text.chars().count() as f64 * LABEL_FONT_SIZE * 0.3 + LABEL_PADDING;
            let half_height = LABEL_FONT_SIZE / 2.0 + LABEL_PADDING;
            let backdrop = Rect::new(
                center.x - half_width,
                center.y - half_height,
                center.x + half_width,
                center.y + half_height,
            );
            let backdrop = tree.create_shape(ShapeNode::filled(backdrop.to_path(0.1), Color::WHITE));
            let text = label(tree, center, &text.text, element.style.stroke());
            for child in [backdrop, text] {
                if let Err(err) = tree.append(node, child) {
                    log::warn!("line label for {} dropped: {err}", element.id);
                }
            }
        }
    }
}
