//! Dragging connector ends and waypoints.

use super::{has_resize_handle, ResizeHit, ResizeOptions, ResizeOutcome, ResizeRef, ResizeState};
use crate::bindings::LINE_BOUND_OVERLAY_KEY;
use crate::board::{Board, Cursor};
use crate::geometry::distance;
use crate::routing::ConnectorShape;
use crate::shapes::{Element, LineHandle};
use crate::snap::bound_target;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A draggable point of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineResizeHandle {
    Source,
    Target,
    /// Interior waypoint of a straight connector, by index into its points.
    Via(usize),
}

impl LineResizeHandle {
    /// Whether the handle is one of the two ends.
    pub fn is_end(self) -> bool {
        matches!(self, LineResizeHandle::Source | LineResizeHandle::Target)
    }
}

/// Resize module for connectors: moves an end (rebinding it to the shape under the
/// pointer) or a waypoint.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineResize;

impl ResizeOptions for LineResize {
    type Handle = LineResizeHandle;

    fn key(&self) -> &'static str {
        "draw-line"
    }

    fn hit_test(&self, board: &Board, point: Point) -> Option<ResizeHit<LineResizeHandle>> {
        let selected = board.selected_elements();
        let [target] = selected.as_slice() else {
            return None;
        };
        let line = target.as_line()?;
        if !has_resize_handle(board, target) {
            return None;
        }
        let radius = board.options.hit_radius;
        let points = board.line_points(line);
        let (first, last) = (points.first().copied()?, points.last().copied()?);
        let handle = if distance(first, point) <= radius {
            LineResizeHandle::Source
        } else if distance(last, point) <= radius {
            LineResizeHandle::Target
        } else if line.shape == ConnectorShape::Straight && line.points.len() > 2 {
            let index = (1..line.points.len() - 1).find(|&i| distance(line.points[i], point) <= radius)?;
            LineResizeHandle::Via(index)
        } else {
            return None;
        };
        Some(ResizeHit {
            element: (*target).clone(),
            handle,
            cursor: if handle.is_end() { Cursor::Crosshair } else { Cursor::Move },
            rectangle: board.get_rectangle(target),
        })
    }

    fn on_resize(&mut self, board: &mut Board, resize_ref: &ResizeRef<LineResizeHandle>, state: &ResizeState) -> Option<Element> {
        let mut line = resize_ref.element.as_line()?.clone();
        let point = state.end_point;
        match resize_ref.handle {
            LineResizeHandle::Source | LineResizeHandle::Target => {
                let is_source = resize_ref.handle == LineResizeHandle::Source;
                let marker = if is_source { line.source.marker } else { line.target.marker };
                let (handle, end) = match bound_target(board, point, Some(line.id)) {
                    Some(target) => (LineHandle::bound(target.id, target.connection, marker), target.point),
                    None => (LineHandle::free(marker), point),
                };
                if is_source {
                    line.source = handle;
                    *line.points.first_mut()? = end;
                } else {
                    line.target = handle;
                    *line.points.last_mut()? = end;
                }
            }
            LineResizeHandle::Via(index) => {
                *line.points.get_mut(index)? = point;
            }
        }
        Some(line.into())
    }

    /// The bound-shape feedback belongs to the gesture; drop it however the gesture ended.
    fn after_resize(&mut self, board: &mut Board, _resize_ref: &ResizeRef<LineResizeHandle>, _outcome: ResizeOutcome) {
        board.remove_overlay(LINE_BOUND_OVERLAY_KEY);
    }
}
