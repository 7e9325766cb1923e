//! Feedback while a connector end looks for a shape to attach to.

use crate::board::{Board, Overlay, OverlayItem, PointerType};
use crate::input::PointerEvent;
use crate::plugin::{BoardPlugin, Next};
use crate::resize::{is_resizing_by, ActiveHandle};
use crate::shapes::SerializableColor;
use crate::snap::{bound_target, ACTIVE_STROKE_WIDTH, BOUND_MARKER_RADIUS};

/// Overlay key of the bound-shape mask and attachment marker.
pub const LINE_BOUND_OVERLAY_KEY: &str = "line-bound";

/// While drawing a connector or dragging one of its ends, masks the shape under the
/// pointer and marks the point the end would attach to.
#[derive(Debug, Default)]
pub struct LineBoundReaction;

impl BoardPlugin for LineBoundReaction {
    fn name(&self) -> &'static str {
        "line-bound-reaction"
    }

    fn pointer_move(&mut self, board: &mut Board, event: &PointerEvent, next: Next<'_>) {
        board.remove_overlay(LINE_BOUND_OVERLAY_KEY);
        if board.options.readonly {
            next.pointer_move(board, event);
            return;
        }
        let is_line_pointer = board.pointer == PointerType::Line;
        let is_line_resizing = is_resizing_by(board, |active| {
            active.is_line && matches!(active.handle, ActiveHandle::Line(handle) if handle.is_end())
        });
        if is_line_pointer || is_line_resizing {
            let point = board.viewport.client_to_view_box(event.client_point());
            if let Some(target) = bound_target(board, point, None) {
                let mut overlay =
                    Overlay::new(SerializableColor::selection(), ACTIVE_STROKE_WIDTH).with_fill(SerializableColor::selection());
                overlay.push(OverlayItem::Mask {
                    rect: target.rect,
                    angle: target.angle,
                });
                overlay.push(OverlayItem::Circle {
                    center: target.point,
                    radius: BOUND_MARKER_RADIUS,
                });
                board.set_overlay(LINE_BOUND_OVERLAY_KEY, overlay);
            }
        }
        next.pointer_move(board, event);
    }

    fn pointer_up(&mut self, board: &mut Board, event: &PointerEvent, next: Next<'_>) {
        board.remove_overlay(LINE_BOUND_OVERLAY_KEY);
        next.pointer_up(board, event);
    }

    fn global_pointer_up(&mut self, board: &mut Board, event: &PointerEvent, next: Next<'_>) {
        board.remove_overlay(LINE_BOUND_OVERLAY_KEY);
        next.global_pointer_up(board, event);
    }

    fn pointer_cancel(&mut self, board: &mut Board, event: &PointerEvent, next: Next<'_>) {
        board.remove_overlay(LINE_BOUND_OVERLAY_KEY);
        next.pointer_cancel(board, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardOptions;
    use crate::input::BoardEvent;
    use crate::plugin::BoardHost;
    use crate::shapes::{Element, Geometry, GeometryShape};
    use kurbo::{Point, Rect};

    fn host(pointer: PointerType) -> BoardHost {
        let shape: Element = Geometry::new(GeometryShape::Rectangle, [Point::new(0.0, 0.0), Point::new(100.0, 100.0)]).into();
        let mut board = Board::new(vec![shape], BoardOptions::default());
        board.pointer = pointer;
        BoardHost::new(board).with_plugin(LineBoundReaction)
    }

    #[test]
    fn test_marker_on_connector_point() {
        let mut host = host(PointerType::Line);
        host.handle(&BoardEvent::PointerMove(PointerEvent::new(97.0, 52.0)));
        let overlay = host.board.overlay(LINE_BOUND_OVERLAY_KEY).unwrap();
        assert_eq!(
            overlay.items,
            vec![
                OverlayItem::Mask {
                    rect: Rect::new(0.0, 0.0, 100.0, 100.0),
                    angle: 0.0,
                },
                OverlayItem::Circle {
                    center: Point::new(100.0, 50.0),
                    radius: BOUND_MARKER_RADIUS,
                },
            ]
        );
        host.handle(&BoardEvent::PointerUp(PointerEvent::new(97.0, 52.0)));
        assert!(host.board.overlay(LINE_BOUND_OVERLAY_KEY).is_none());
    }

    #[test]
    fn test_no_feedback_with_selection_pointer() {
        let mut host = host(PointerType::Selection);
        host.handle(&BoardEvent::PointerMove(PointerEvent::new(97.0, 52.0)));
        assert!(host.board.overlay(LINE_BOUND_OVERLAY_KEY).is_none());
    }

    #[test]
    fn test_feedback_removed_when_leaving_shape() {
        let mut host = host(PointerType::Line);
        host.handle(&BoardEvent::PointerMove(PointerEvent::new(50.0, 2.0)));
        assert!(host.board.overlay(LINE_BOUND_OVERLAY_KEY).is_some());
        host.handle(&BoardEvent::PointerMove(PointerEvent::new(500.0, 500.0)));
        assert!(host.board.overlay(LINE_BOUND_OVERLAY_KEY).is_none());
    }
}
