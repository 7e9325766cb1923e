//! Resize handles of a bounding rectangle.

use crate::board::Cursor;
use crate::geometry::distance;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Visual size of a resize handle in document units.
pub const RESIZE_HANDLE_SIZE: f64 = 8.0;

/// A control point of a bounding box. Corners move two axes, edges one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl ResizeHandle {
    /// Corners first: they win when a corner and an edge handle overlap on tiny shapes.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::TopLeft,
        ResizeHandle::TopRight,
        ResizeHandle::BottomRight,
        ResizeHandle::BottomLeft,
        ResizeHandle::Top,
        ResizeHandle::Right,
        ResizeHandle::Bottom,
        ResizeHandle::Left,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            ResizeHandle::TopLeft | ResizeHandle::TopRight | ResizeHandle::BottomRight | ResizeHandle::BottomLeft
        )
    }

    /// The handle diagonally or orthogonally across the rectangle.
    pub fn opposite(self) -> Self {
        match self {
            ResizeHandle::TopLeft => ResizeHandle::BottomRight,
            ResizeHandle::Top => ResizeHandle::Bottom,
            ResizeHandle::TopRight => ResizeHandle::BottomLeft,
            ResizeHandle::Right => ResizeHandle::Left,
            ResizeHandle::BottomRight => ResizeHandle::TopLeft,
            ResizeHandle::Bottom => ResizeHandle::Top,
            ResizeHandle::BottomLeft => ResizeHandle::TopRight,
            ResizeHandle::Left => ResizeHandle::Right,
        }
    }

    /// Whether dragging this handle changes the width / the height.
    pub fn moves_axes(self) -> (bool, bool) {
        match self {
            ResizeHandle::Top | ResizeHandle::Bottom => (false, true),
            ResizeHandle::Left | ResizeHandle::Right => (true, false),
            _ => (true, true),
        }
    }

    /// Position of this handle on `rect`.
    pub fn point_on(self, rect: Rect) -> Point {
        let center = rect.center();
        match self {
            ResizeHandle::TopLeft => Point::new(rect.x0, rect.y0),
            ResizeHandle::Top => Point::new(center.x, rect.y0),
            ResizeHandle::TopRight => Point::new(rect.x1, rect.y0),
            ResizeHandle::Right => Point::new(rect.x1, center.y),
            ResizeHandle::BottomRight => Point::new(rect.x1, rect.y1),
            ResizeHandle::Bottom => Point::new(center.x, rect.y1),
            ResizeHandle::BottomLeft => Point::new(rect.x0, rect.y1),
            ResizeHandle::Left => Point::new(rect.x0, center.y),
        }
    }

    pub fn cursor(self) -> Cursor {
        match self {
            ResizeHandle::TopLeft | ResizeHandle::BottomRight => Cursor::NwseResize,
            ResizeHandle::TopRight | ResizeHandle::BottomLeft => Cursor::NeswResize,
            ResizeHandle::Left | ResizeHandle::Right => Cursor::EwResize,
            ResizeHandle::Top | ResizeHandle::Bottom => Cursor::NsResize,
        }
    }
}

/// All handles of `rect` with their positions.
pub fn resize_handles(rect: Rect) -> [(ResizeHandle, Point); 8] {
    ResizeHandle::ALL.map(|handle| (handle, handle.point_on(rect)))
}

/// Handle of `rect` within `radius` of `point`.
pub fn hit_rectangle_resize_handle(rect: Rect, point: Point, radius: f64) -> Option<ResizeHandle> {
    resize_handles(rect)
        .into_iter()
        .find(|&(_, position)| distance(position, point) <= radius)
        .map(|(handle, _)| handle)
}
