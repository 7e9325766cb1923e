//! Resize math: origin/handle selection, zoom factors and alignment snapping.

use super::handle::ResizeHandle;
use crate::board::{Cursor, Path};
use crate::shapes::Element;
use kurbo::{Point, Rect, Vec2};

/// What a resize module's hit test found under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeHit<H> {
    pub element: Element,
    pub handle: H,
    pub cursor: Cursor,
    pub rectangle: Option<Rect>,
}

/// The element being resized, fixed for the whole gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeRef<H> {
    pub element: Element,
    pub path: Path,
    pub handle: H,
    pub cursor: Cursor,
    pub rectangle: Option<Rect>,
}

impl<H> ResizeRef<H> {
    pub fn new(hit: ResizeHit<H>, path: Path) -> Self {
        Self {
            element: hit.element,
            path,
            handle: hit.handle,
            cursor: hit.cursor,
            rectangle: hit.rectangle,
        }
    }
}

/// Per-move state of a resize gesture, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeState {
    pub start_point: Point,
    pub end_point: Point,
    pub is_shift: bool,
}

impl ResizeState {
    pub fn offset(&self) -> Vec2 {
        self.end_point - self.start_point
    }
}

/// Fixed origin (opposite handle) and the dragged handle's position.
pub fn resize_origin_and_handle_point(handle: ResizeHandle, rect: Rect) -> (Point, Point) {
    (handle.opposite().point_on(rect), handle.point_on(rect))
}

fn sign(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

fn axis_zoom(span: f64, offset: f64) -> f64 {
    if span.abs() < f64::EPSILON {
        1.0
    } else {
        (span + offset) / span
    }
}

/// Scale factors to apply around the origin for the current pointer offset.
///
/// With an aspect lock both axes use the larger magnitude, each keeping its own
/// sign so a drag across the origin still flips the shape. Edge handles under an
/// aspect lock scale the other axis symmetrically by the same magnitude.
pub fn resize_zoom(state: &ResizeState, origin: Point, handle_point: Point, handle: ResizeHandle, aspect_ratio: bool) -> Vec2 {
    let (moves_x, moves_y) = handle.moves_axes();
    let offset = state.offset();
    let span = handle_point - origin;
    let mut zoom = Vec2::new(
        if moves_x { axis_zoom(span.x, offset.x) } else { 1.0 },
        if moves_y { axis_zoom(span.y, offset.y) } else { 1.0 },
    );
    if aspect_ratio {
        if handle.is_corner() {
            let factor = zoom.x.abs().max(zoom.y.abs());
            zoom = Vec2::new(factor * sign(zoom.x), factor * sign(zoom.y));
        } else if moves_x {
            zoom.y = zoom.x.abs();
        } else {
            zoom.x = zoom.y.abs();
        }
    }
    zoom
}

/// Scale `point` about `origin`.
pub fn move_point_by_zoom(point: Point, origin: Point, zoom: Vec2) -> Point {
    Point::new(origin.x + (point.x - origin.x) * zoom.x, origin.y + (point.y - origin.y) * zoom.y)
}

/// Corner points of `rect` after scaling about `origin`.
pub fn resize_points(rect: Rect, origin: Point, zoom: Vec2) -> [Point; 2] {
    [
        move_point_by_zoom(Point::new(rect.x0, rect.y0), origin, zoom),
        move_point_by_zoom(Point::new(rect.x1, rect.y1), origin, zoom),
    ]
}

/// Snapped resize result plus the guide lines to display.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeAlignResult {
    pub points: [Point; 2],
    pub guides: Vec<(Point, Point)>,
}

#[derive(Debug, Clone, Copy)]
struct AxisSnap {
    /// Distance between the active line and the target line.
    delta: f64,
    /// How far the handle must move to close `delta`.
    shift: f64,
    /// Aligned coordinate.
    line: f64,
    other: Rect,
}

fn snap_axis(handle: f64, center: f64, targets: impl Iterator<Item = (f64, f64, f64, Rect)>, tolerance: f64) -> Option<AxisSnap> {
    let mut best: Option<AxisSnap> = None;
    for (start, mid, end, other) in targets {
        for line in [start, mid, end] {
            // The center moves half as fast as the handle since the origin stays put.
            for (value, weight) in [(handle, 1.0), (center, 2.0)] {
                let delta = line - value;
                if delta.abs() <= tolerance && best.is_none_or(|b| delta.abs() < b.delta.abs()) {
                    best = Some(AxisSnap {
                        delta,
                        shift: delta * weight,
                        line,
                        other,
                    });
                }
            }
        }
    }
    best
}

/// Snap the moving edges of a resized rectangle to edges and centerlines of `others`.
///
/// `points` are the zoomed corners, `origin` the fixed point and `handle_point` the
/// dragged handle after zooming.
pub fn resize_align(
    points: [Point; 2],
    origin: Point,
    handle_point: Point,
    handle: ResizeHandle,
    aspect_ratio: bool,
    others: &[Rect],
    tolerance: f64,
) -> ResizeAlignResult {
    let rect = Rect::from_points(points[0], points[1]);
    let center = rect.center();
    let (moves_x, moves_y) = handle.moves_axes();
    let span = handle_point - origin;

    let x_snap = (moves_x && span.x.abs() > f64::EPSILON)
        .then(|| snap_axis(handle_point.x, center.x, others.iter().map(|r| (r.x0, r.center().x, r.x1, *r)), tolerance))
        .flatten();
    let y_snap = (moves_y && span.y.abs() > f64::EPSILON)
        .then(|| snap_axis(handle_point.y, center.y, others.iter().map(|r| (r.y0, r.center().y, r.y1, *r)), tolerance))
        .flatten();

    let (x_snap, y_snap) = if aspect_ratio {
        match (x_snap, y_snap) {
            (Some(x), Some(y)) if y.delta.abs() < x.delta.abs() => (None, Some(y)),
            (Some(x), _) => (Some(x), None),
            (None, y) => (None, y),
        }
    } else {
        (x_snap, y_snap)
    };

    let fx = x_snap.map(|s| (span.x + s.shift) / span.x);
    let fy = y_snap.map(|s| (span.y + s.shift) / span.y);
    let zoom = match (fx, fy, aspect_ratio) {
        (Some(fx), None, true) => Vec2::new(fx, fx),
        (None, Some(fy), true) => Vec2::new(fy, fy),
        (fx, fy, _) => Vec2::new(fx.unwrap_or(1.0), fy.unwrap_or(1.0)),
    };
    let snapped = if zoom == Vec2::new(1.0, 1.0) {
        points
    } else {
        [move_point_by_zoom(points[0], origin, zoom), move_point_by_zoom(points[1], origin, zoom)]
    };

    let snapped_rect = Rect::from_points(snapped[0], snapped[1]);
    let mut guides = Vec::new();
    if let Some(s) = x_snap {
        let top = snapped_rect.y0.min(s.other.y0);
        let bottom = snapped_rect.y1.max(s.other.y1);
        guides.push((Point::new(s.line, top), Point::new(s.line, bottom)));
    }
    if let Some(s) = y_snap {
        let left = snapped_rect.x0.min(s.other.x0);
        let right = snapped_rect.x1.max(s.other.x1);
        guides.push((Point::new(left, s.line), Point::new(right, s.line)));
    }
    ResizeAlignResult { points: snapped, guides }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(start: (f64, f64), end: (f64, f64), is_shift: bool) -> ResizeState {
        ResizeState {
            start_point: Point::new(start.0, start.1),
            end_point: Point::new(end.0, end.1),
            is_shift,
        }
    }

    fn size(points: [Point; 2]) -> (f64, f64) {
        let rect = Rect::from_points(points[0], points[1]);
        (rect.width(), rect.height())
    }

    #[test]
    fn test_origin_is_opposite_handle() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let (origin, handle) = resize_origin_and_handle_point(ResizeHandle::BottomRight, rect);
        assert_eq!(origin, Point::new(0.0, 0.0));
        assert_eq!(handle, Point::new(100.0, 50.0));
        let (origin, handle) = resize_origin_and_handle_point(ResizeHandle::Left, rect);
        assert_eq!(origin, Point::new(100.0, 25.0));
        assert_eq!(handle, Point::new(0.0, 25.0));
    }

    #[test]
    fn test_corner_resize_free() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let (origin, handle) = resize_origin_and_handle_point(ResizeHandle::BottomRight, rect);
        let zoom = resize_zoom(&state((100.0, 50.0), (150.0, 120.0), false), origin, handle, ResizeHandle::BottomRight, false);
        let (w, h) = size(resize_points(rect, origin, zoom));
        assert!((w - 150.0).abs() < 1e-9);
        assert!((h - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_corner_resize_aspect_locked() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let (origin, handle) = resize_origin_and_handle_point(ResizeHandle::BottomRight, rect);
        let zoom = resize_zoom(&state((100.0, 50.0), (150.0, 120.0), true), origin, handle, ResizeHandle::BottomRight, true);
        // Uniform factor max(150 / 100, 120 / 50) = 2.4.
        assert!((zoom.x - 2.4).abs() < 1e-9);
        assert!((zoom.y - 2.4).abs() < 1e-9);
        let (w, h) = size(resize_points(rect, origin, zoom));
        assert!((w - 240.0).abs() < 1e-9);
        assert!((h - 120.0).abs() < 1e-9);
        assert!((w / h - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_aspect_lock_keeps_flip_sign() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let (origin, handle) = resize_origin_and_handle_point(ResizeHandle::BottomRight, rect);
        // Drag across the origin horizontally.
        let zoom = resize_zoom(&state((100.0, 50.0), (-100.0, 60.0), false), origin, handle, ResizeHandle::BottomRight, true);
        assert!(zoom.x < 0.0);
        assert!(zoom.y > 0.0);
        assert!((zoom.x.abs() - zoom.y.abs()).abs() < 1e-9);
    }

    #[test]
    fn test_edge_resize_moves_one_axis() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let (origin, handle) = resize_origin_and_handle_point(ResizeHandle::Right, rect);
        let zoom = resize_zoom(&state((100.0, 25.0), (150.0, 90.0), false), origin, handle, ResizeHandle::Right, false);
        assert!((zoom.x - 1.5).abs() < 1e-9);
        assert!((zoom.y - 1.0).abs() < f64::EPSILON);
        let locked = resize_zoom(&state((100.0, 25.0), (150.0, 90.0), false), origin, handle, ResizeHandle::Right, true);
        let points = resize_points(rect, origin, locked);
        assert_eq!(points[0], Point::new(0.0, -12.5));
        assert_eq!(points[1], Point::new(150.0, 62.5));
    }

    #[test]
    fn test_degenerate_span_keeps_axis() {
        let zoom = resize_zoom(
            &state((0.0, 0.0), (10.0, 10.0), false),
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            ResizeHandle::BottomRight,
            false,
        );
        assert!((zoom.x - 1.0).abs() < f64::EPSILON);
        assert!((zoom.y - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_align_snaps_edge() {
        let points = [Point::new(0.0, 0.0), Point::new(148.5, 80.0)];
        let other = Rect::new(150.0, 200.0, 200.0, 250.0);
        let result = resize_align(points, Point::ZERO, Point::new(148.5, 80.0), ResizeHandle::BottomRight, false, &[other], 2.0);
        assert!((result.points[1].x - 150.0).abs() < 1e-9);
        assert!((result.points[1].y - 80.0).abs() < 1e-9);
        assert_eq!(result.guides, vec![(Point::new(150.0, 0.0), Point::new(150.0, 250.0))]);
    }

    #[test]
    fn test_resize_align_out_of_tolerance() {
        let points = [Point::new(0.0, 0.0), Point::new(140.0, 80.0)];
        let other = Rect::new(150.0, 200.0, 200.0, 250.0);
        let result = resize_align(points, Point::ZERO, Point::new(140.0, 80.0), ResizeHandle::BottomRight, false, &[other], 2.0);
        assert_eq!(result.points, points);
        assert!(result.guides.is_empty());
    }

    #[test]
    fn test_resize_align_aspect_scales_both_axes() {
        let points = [Point::new(0.0, 0.0), Point::new(99.0, 49.5)];
        let other = Rect::new(100.0, 300.0, 120.0, 320.0);
        let result = resize_align(points, Point::ZERO, Point::new(99.0, 49.5), ResizeHandle::BottomRight, true, &[other], 2.0);
        assert!((result.points[1].x - 100.0).abs() < 1e-9);
        assert!((result.points[1].y - 50.0).abs() < 1e-9);
        assert_eq!(result.guides.len(), 1);
    }
}
