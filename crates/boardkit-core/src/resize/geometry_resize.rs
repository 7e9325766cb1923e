//! Resizing of basic geometry shapes and images.

use super::engine::{move_point_by_zoom, resize_align, resize_origin_and_handle_point, resize_points, resize_zoom};
use super::handle::{hit_rectangle_resize_handle, ResizeHandle};
use super::{has_resize_handle, ResizeHit, ResizeOptions, ResizeOutcome, ResizeRef, ResizeState};
use crate::board::{Board, Overlay, OverlayItem};
use crate::geometry::normalize_shape_points;
use crate::shapes::{Element, Geometry, SerializableColor};
use kurbo::Point;

/// Overlay key of the alignment guides shown while resizing.
pub const ALIGN_OVERLAY_KEY: &str = "resize-align";

/// Resize module for geometry and image elements.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeometryResize;

/// `geometry` reshaped to `points`. The text keeps its laid-out height and the
/// shape stops auto-sizing to it.
pub fn resize_geometry(geometry: &Geometry, points: [Point; 2]) -> Geometry {
    let mut resized = geometry.clone();
    resized.points = normalize_shape_points(points);
    resized.auto_size = false;
    resized
}

impl ResizeOptions for GeometryResize {
    type Handle = ResizeHandle;

    fn key(&self) -> &'static str {
        "draw-geometry"
    }

    fn hit_test(&self, board: &Board, point: Point) -> Option<ResizeHit<ResizeHandle>> {
        let selected = board.selected_elements();
        let [target] = selected.as_slice() else {
            return None;
        };
        if !(target.is_geometry() || target.is_image()) || !has_resize_handle(board, target) {
            return None;
        }
        let rectangle = board.get_rectangle(target)?;
        let handle = hit_rectangle_resize_handle(rectangle, point, board.options.hit_radius)?;
        Some(ResizeHit {
            element: (*target).clone(),
            handle,
            cursor: handle.cursor(),
            rectangle: Some(rectangle),
        })
    }

    fn on_resize(&mut self, board: &mut Board, resize_ref: &ResizeRef<ResizeHandle>, state: &ResizeState) -> Option<Element> {
        board.remove_overlay(ALIGN_OVERLAY_KEY);
        let rectangle = resize_ref.rectangle?;
        let aspect_ratio = state.is_shift || resize_ref.element.has_fixed_aspect();
        let (origin, handle_point) = resize_origin_and_handle_point(resize_ref.handle, rectangle);
        let zoom = resize_zoom(state, origin, handle_point, resize_ref.handle, aspect_ratio);
        let points = resize_points(rectangle, origin, zoom);
        let moved_handle = move_point_by_zoom(handle_point, origin, zoom);

        let others = board.alignment_rectangles(resize_ref.element.id());
        let aligned = resize_align(
            points,
            origin,
            moved_handle,
            resize_ref.handle,
            aspect_ratio,
            &others,
            board.options.align_tolerance,
        );
        if !aligned.guides.is_empty() {
            let mut overlay = Overlay::new(SerializableColor::selection(), 1.0);
            for (start, end) in &aligned.guides {
                overlay.push(OverlayItem::Segment { start: *start, end: *end });
            }
            board.set_overlay(ALIGN_OVERLAY_KEY, overlay);
        }

        match &resize_ref.element {
            Element::Geometry(geometry) => Some(resize_geometry(geometry, aligned.points).into()),
            Element::Image(image) => {
                let mut image = image.clone();
                image.points = normalize_shape_points(aligned.points);
                Some(image.into())
            }
            _ => None,
        }
    }

    fn after_resize(&mut self, board: &mut Board, _resize_ref: &ResizeRef<ResizeHandle>, _outcome: ResizeOutcome) {
        board.remove_overlay(ALIGN_OVERLAY_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardOptions, Cursor, Path};
    use crate::input::{BoardEvent, KeyEvent, PointerEvent};
    use crate::plugin::BoardHost;
    use crate::resize::{is_resizing_by, WithResize};
    use crate::shapes::{ElementId, GeometryShape, Image};
    use kurbo::Rect;

    fn rect_at(x0: f64, y0: f64, x1: f64, y1: f64) -> Element {
        Geometry::new(GeometryShape::Rectangle, [Point::new(x0, y0), Point::new(x1, y1)])
            .with_text("label", 20.0)
            .into()
    }

    fn host(elements: Vec<Element>, selected: &[ElementId]) -> BoardHost {
        let mut board = Board::new(elements, BoardOptions::default());
        board.selection = selected.to_vec();
        BoardHost::new(board).with_plugin(WithResize::new(GeometryResize))
    }

    fn down(x: f64, y: f64) -> BoardEvent {
        BoardEvent::PointerDown(PointerEvent::new(x, y))
    }

    fn mv(x: f64, y: f64) -> BoardEvent {
        BoardEvent::PointerMove(PointerEvent::new(x, y))
    }

    fn up(x: f64, y: f64) -> BoardEvent {
        BoardEvent::PointerUp(PointerEvent::new(x, y))
    }

    fn committed_rect(host: &BoardHost, index: usize) -> Rect {
        host.board.get(&Path::from([index])).unwrap().rectangle().unwrap()
    }

    #[test]
    fn test_hit_test_requires_single_selection() {
        let a = rect_at(0.0, 0.0, 100.0, 50.0);
        let b = rect_at(300.0, 0.0, 400.0, 50.0);
        let (a_id, b_id) = (a.id(), b.id());
        let mut board = Board::new(vec![a, b], BoardOptions::default());
        let corner = Point::new(100.0, 50.0);

        assert!(GeometryResize.hit_test(&board, corner).is_none());
        board.selection = vec![a_id, b_id];
        assert!(GeometryResize.hit_test(&board, corner).is_none());
        board.selection = vec![a_id];
        let hit = GeometryResize.hit_test(&board, corner).unwrap();
        assert_eq!(hit.handle, ResizeHandle::BottomRight);
        assert_eq!(hit.cursor, Cursor::NwseResize);
        assert!(GeometryResize.hit_test(&board, Point::new(50.0, 25.0)).is_none());
    }

    #[test]
    fn test_hit_test_readonly() {
        let a = rect_at(0.0, 0.0, 100.0, 50.0);
        let id = a.id();
        let mut board = Board::new(vec![a], BoardOptions { readonly: true, ..BoardOptions::default() });
        board.selection = vec![id];
        assert!(GeometryResize.hit_test(&board, Point::new(100.0, 50.0)).is_none());
    }

    #[test]
    fn test_drag_commits_single_operation() {
        let a = rect_at(0.0, 0.0, 100.0, 50.0);
        let id = a.id();
        let mut host = host(vec![a], &[id]);

        host.handle(&down(100.0, 50.0));
        host.handle(&mv(120.0, 80.0));
        assert!(is_resizing_by(&host.board, |active| active.element == id && !active.is_line));
        host.handle(&mv(150.0, 120.0));
        // The committed element is untouched until release; the preview carries the new shape.
        assert_eq!(committed_rect(&host, 0), Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(host.board.preview(id).and_then(Element::rectangle), Some(Rect::new(0.0, 0.0, 150.0, 120.0)));

        let mut batches = Vec::new();
        host.dispatch(&up(150.0, 120.0));
        batches.push(host.board.pending_operations().len());
        assert!(host.board.flush());
        assert_eq!(batches, vec![1]);

        assert_eq!(committed_rect(&host, 0), Rect::new(0.0, 0.0, 150.0, 120.0));
        let geometry = host.board.get(&Path::from([0])).unwrap().as_geometry().unwrap();
        assert!(!geometry.auto_size);
        assert!((geometry.text_height - 20.0).abs() < f64::EPSILON);
        assert!(host.board.preview(id).is_none());
        assert!(host.board.resizing().is_none());
        assert_eq!(host.board.cursor, Cursor::Default);
    }

    #[test]
    fn test_shift_locks_aspect_ratio() {
        let a = rect_at(0.0, 0.0, 100.0, 50.0);
        let id = a.id();
        let mut host = host(vec![a], &[id]);
        host.handle(&down(100.0, 50.0));
        host.handle(&BoardEvent::PointerMove(PointerEvent::new(150.0, 120.0).with_shift()));
        host.handle(&BoardEvent::PointerUp(PointerEvent::new(150.0, 120.0).with_shift()));
        assert_eq!(committed_rect(&host, 0), Rect::new(0.0, 0.0, 240.0, 120.0));
    }

    #[test]
    fn test_image_always_keeps_aspect_ratio() {
        let image: Element = Image::new("photo.png", [Point::new(0.0, 0.0), Point::new(100.0, 50.0)]).into();
        let id = image.id();
        let mut host = host(vec![image], &[id]);
        host.handle(&down(100.0, 50.0));
        host.handle(&mv(150.0, 120.0));
        host.handle(&up(150.0, 120.0));
        assert_eq!(committed_rect(&host, 0), Rect::new(0.0, 0.0, 240.0, 120.0));
    }

    #[test]
    fn test_escape_cancels_without_mutation() {
        let a = rect_at(0.0, 0.0, 100.0, 50.0);
        let id = a.id();
        let other = rect_at(151.0, 200.0, 200.0, 250.0);
        let mut host = host(vec![a, other], &[id]);
        host.handle(&down(100.0, 50.0));
        host.handle(&mv(150.0, 120.0));
        assert!(host.board.overlay(ALIGN_OVERLAY_KEY).is_some());

        let flushed = host.handle(&BoardEvent::KeyDown(KeyEvent::new("Escape")));
        assert!(!flushed);
        assert!(host.board.overlay(ALIGN_OVERLAY_KEY).is_none());
        assert!(host.board.preview(id).is_none());
        assert_eq!(committed_rect(&host, 0), Rect::new(0.0, 0.0, 100.0, 50.0));

        // Releasing afterwards does nothing either.
        assert!(!host.handle(&up(150.0, 120.0)));
    }

    #[test]
    fn test_small_move_does_not_start_resize() {
        let a = rect_at(0.0, 0.0, 100.0, 50.0);
        let id = a.id();
        let mut host = host(vec![a], &[id]);
        host.handle(&down(100.0, 50.0));
        host.handle(&mv(101.0, 51.0));
        assert!(host.board.resizing().is_none());
        assert!(!host.handle(&up(101.0, 51.0)));
        assert_eq!(committed_rect(&host, 0), Rect::new(0.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn test_alignment_snaps_committed_rect() {
        let a = rect_at(0.0, 0.0, 100.0, 50.0);
        let id = a.id();
        let other = rect_at(151.0, 200.0, 200.0, 250.0);
        let mut host = host(vec![a, other], &[id]);
        host.handle(&down(100.0, 50.0));
        host.handle(&mv(150.0, 120.0));
        let overlay = host.board.overlay(ALIGN_OVERLAY_KEY).unwrap();
        assert_eq!(
            overlay.items,
            vec![OverlayItem::Segment {
                start: Point::new(151.0, 0.0),
                end: Point::new(151.0, 250.0),
            }]
        );
        host.handle(&up(150.0, 120.0));
        let rect = committed_rect(&host, 0);
        assert!((rect.x1 - 151.0).abs() < 1e-9);
        assert!(host.board.overlay(ALIGN_OVERLAY_KEY).is_none());
    }

    #[test]
    fn test_hover_sets_cursor() {
        let a = rect_at(0.0, 0.0, 100.0, 50.0);
        let id = a.id();
        let mut host = host(vec![a], &[id]);
        host.handle(&mv(0.0, 25.0));
        assert_eq!(host.board.cursor, Cursor::EwResize);
        host.handle(&mv(50.0, 25.0));
        assert_eq!(host.board.cursor, Cursor::Default);
    }
}
