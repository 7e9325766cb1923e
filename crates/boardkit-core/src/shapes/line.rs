//! Connector lines between elements.
//!
//! A line stores its endpoints and, for each end, an optional binding to another
//! element. Bound ends are addressed by a connection ratio inside the bound
//! element's rectangle so they follow the element when it moves or resizes.

use super::{point_to_polyline_dist, ElementId, ElementStyle, ElementTrait};
use crate::geometry::{direction_by_ratio, point_by_ratio, point_on_polyline, rectangle_from_points, Direction};
use crate::routing::{connector_waypoints, Anchor, ConnectorShape};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Decoration drawn at a line end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineMarker {
    #[default]
    None,
    Arrow,
}

/// One end of a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LineHandle {
    /// Element this end is attached to.
    #[serde(default)]
    pub bound_id: Option<ElementId>,
    /// Position inside the bound element's rectangle, `(0, 0)` top-left to `(1, 1)` bottom-right.
    #[serde(default)]
    pub connection: Option<Point>,
    #[serde(default)]
    pub marker: LineMarker,
}

impl LineHandle {
    pub fn free(marker: LineMarker) -> Self {
        Self {
            bound_id: None,
            connection: None,
            marker,
        }
    }

    pub fn bound(id: ElementId, connection: Point, marker: LineMarker) -> Self {
        Self {
            bound_id: Some(id),
            connection: Some(connection),
            marker,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.bound_id.is_some() && self.connection.is_some()
    }
}

/// A text label placed along a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineText {
    pub text: String,
    /// Arc-length ratio along the rendered line, in `[0, 1]`.
    pub position: f64,
}

/// A connector element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: ElementId,
    #[serde(default)]
    pub shape: ConnectorShape,
    /// Stored points: first and last are the endpoints, anything between are user waypoints.
    pub points: Vec<Point>,
    #[serde(default)]
    pub source: LineHandle,
    #[serde(default = "default_target")]
    pub target: LineHandle,
    #[serde(default)]
    pub texts: Vec<LineText>,
    #[serde(default)]
    pub style: ElementStyle,
}

fn default_target() -> LineHandle {
    LineHandle::free(LineMarker::Arrow)
}

/// Side an unbound end faces: toward `other` along the dominant axis.
fn facing(from: Point, other: Point) -> Direction {
    let d = other - from;
    if d.x.abs() >= d.y.abs() {
        if d.x >= 0.0 { Direction::Right } else { Direction::Left }
    } else if d.y >= 0.0 {
        Direction::Bottom
    } else {
        Direction::Top
    }
}

impl Line {
    pub fn new(shape: ConnectorShape, start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            shape,
            points: vec![start, end],
            source: LineHandle::free(LineMarker::None),
            target: default_target(),
            texts: Vec::new(),
            style: ElementStyle::default(),
        }
    }

    pub fn start(&self) -> Point {
        self.points.first().copied().unwrap_or(Point::ZERO)
    }

    pub fn end(&self) -> Point {
        self.points.last().copied().unwrap_or(Point::ZERO)
    }

    fn via(&self) -> &[Point] {
        if self.points.len() > 2 {
            &self.points[1..self.points.len() - 1]
        } else {
            &[]
        }
    }

    fn anchor(handle: &LineHandle, bound_rect: Option<Rect>, stored: Point, other: Point) -> Anchor {
        match (handle.connection, bound_rect) {
            (Some(connection), Some(rect)) if handle.bound_id.is_some() => {
                Anchor::new(point_by_ratio(rect, connection), direction_by_ratio(connection))
            }
            _ => Anchor::new(stored, facing(stored, other)),
        }
    }

    /// Resolve both ends to anchors, given the rectangles of the bound elements.
    pub fn anchors(&self, source_rect: Option<Rect>, target_rect: Option<Rect>) -> (Anchor, Anchor) {
        let (start, end) = (self.start(), self.end());
        let source_point = match (self.source.connection, source_rect) {
            (Some(c), Some(rect)) if self.source.bound_id.is_some() => point_by_ratio(rect, c),
            _ => start,
        };
        let target_point = match (self.target.connection, target_rect) {
            (Some(c), Some(rect)) if self.target.bound_id.is_some() => point_by_ratio(rect, c),
            _ => end,
        };
        (
            Self::anchor(&self.source, source_rect, start, target_point),
            Self::anchor(&self.target, target_rect, end, source_point),
        )
    }

    /// Rendered waypoints of the line.
    pub fn waypoints(&self, source_rect: Option<Rect>, target_rect: Option<Rect>, offset: f64) -> Vec<Point> {
        let (source, target) = self.anchors(source_rect, target_rect);
        connector_waypoints(self.shape, source, target, self.via(), offset)
    }

    /// Hit test against already-resolved waypoints.
    pub fn hit_test_points(&self, points: &[Point], point: Point, tolerance: f64) -> bool {
        point_to_polyline_dist(point, points) <= tolerance + self.style.stroke_width / 2.0
    }

    /// Positions of the text labels along resolved waypoints.
    pub fn text_positions(&self, points: &[Point]) -> Vec<(Point, &LineText)> {
        self.texts
            .iter()
            .filter_map(|text| point_on_polyline(points, text.position).map(|p| (p, text)))
            .collect()
    }
}

impl ElementTrait for Line {
    fn id(&self) -> ElementId {
        self.id
    }

    fn rectangle(&self) -> Option<Rect> {
        if self.points.is_empty() {
            None
        } else {
            Some(rectangle_from_points(&self.points))
        }
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.hit_test_points(&self.points, point, tolerance)
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }
}
