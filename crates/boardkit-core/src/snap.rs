//! Snapping a connector end onto a shape's outline.

use crate::board::Board;
use crate::geometry::{hit_connector_point, ratio_of_point};
use crate::shapes::{Element, ElementId};
use kurbo::{Point, Rect};

/// Radius of the marker drawn at a snapped connector end.
pub const BOUND_MARKER_RADIUS: f64 = 6.0;

/// Stroke width of active (selection) decorations; also inflates outlines when
/// looking for a connector point.
pub const ACTIVE_STROKE_WIDTH: f64 = 1.0;

/// A shape a connector end would attach to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundTarget {
    pub id: ElementId,
    pub rect: Rect,
    pub angle: f64,
    /// Attachment point on the outline, snapped to a connector point when close.
    pub point: Point,
    /// `point` as a ratio of `rect`.
    pub connection: Point,
    /// Whether `point` is one of the four connector points.
    pub on_connector: bool,
}

fn nearest_outline_point(element: &Element, point: Point) -> Option<Point> {
    match element {
        Element::Geometry(geometry) => Some(geometry.nearest_outline_point(point)),
        Element::Image(image) => Some(crate::geometry::nearest_point_on_rect_outline(image.bounds(), point)),
        Element::Mind(mind) => Some(crate::geometry::nearest_point_on_rect_outline(mind.bounds(), point)),
        Element::Line(_) => None,
    }
}

/// Topmost bindable element whose outline area contains `point`, shrunk by `inset`
/// when positive or grown when negative.
pub fn hit_outline_element(board: &Board, point: Point, inset: f64, exclude: Option<ElementId>) -> Option<&Element> {
    board
        .elements_with_paths()
        .into_iter()
        .rev()
        .map(|(_, element)| element)
        .filter(|element| !element.is_line() && Some(element.id()) != exclude)
        .find(|element| element.hit_test(point, -inset))
}

/// Where a connector end at `point` would bind, if over a shape.
pub fn bound_target(board: &Board, point: Point, exclude: Option<ElementId>) -> Option<BoundTarget> {
    let element = hit_outline_element(board, point, -board.options.hit_radius / 2.0, exclude)?;
    let rect = element.rectangle()?;
    let nearest = nearest_outline_point(element, point)?;
    let active = rect.inflate(ACTIVE_STROKE_WIDTH, ACTIVE_STROKE_WIDTH);
    let connector = hit_connector_point(nearest, rect, active.width().min(active.height()) * 0.1 + ACTIVE_STROKE_WIDTH * 2.0);
    let snapped = connector.unwrap_or(nearest);
    Some(BoundTarget {
        id: element.id(),
        rect,
        angle: element.angle(),
        point: snapped,
        connection: ratio_of_point(rect, snapped),
        on_connector: connector.is_some(),
    })
}
