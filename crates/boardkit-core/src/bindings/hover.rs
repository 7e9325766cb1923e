//! Tracks the element under the pointer.

use crate::board::Board;
use crate::input::PointerEvent;
use crate::plugin::{BoardPlugin, Next};

/// Publishes the hovered element id on the board while no gesture is running.
#[derive(Debug, Default)]
pub struct HoverHighlight;

impl BoardPlugin for HoverHighlight {
    fn name(&self) -> &'static str {
        "hover-highlight"
    }

    fn pointer_move(&mut self, board: &mut Board, event: &PointerEvent, next: Next<'_>) {
        if board.resizing().is_none() {
            let point = board.viewport.client_to_view_box(event.client_point());
            board.hovered = board.hit_element(point);
        }
        next.pointer_move(board, event);
    }

    fn pointer_cancel(&mut self, board: &mut Board, event: &PointerEvent, next: Next<'_>) {
        board.hovered = None;
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
    use kurbo::Point;

    #[test]
    fn test_hovered_follows_pointer() {
        let shape: Element = Geometry::new(GeometryShape::Ellipse, [Point::new(0.0, 0.0), Point::new(100.0, 100.0)]).into();
        let id = shape.id();
        let mut host = BoardHost::new(Board::new(vec![shape], BoardOptions::default())).with_plugin(HoverHighlight);
        host.handle(&BoardEvent::PointerMove(PointerEvent::new(50.0, 50.0)));
        assert_eq!(host.board.hovered, Some(id));
        host.handle(&BoardEvent::PointerMove(PointerEvent::new(2.0, 2.0)));
        assert_eq!(host.board.hovered, None);
    }
}
