//! Geometry primitives shared by routing, resizing and hit testing.
//!
//! All coordinates are document (view box) coordinates with the y axis pointing down.

use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tolerance used when testing whether a point lies on a segment.
pub const SEGMENT_TOLERANCE: f64 = 0.1;

/// Geometry errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("point ({x}, {y}) does not lie on the polyline")]
    PointNotOnPolyline { x: f64, y: f64 },
}

/// Result type for geometry queries that can fail.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Cardinal side of a shape where a connector leaves or enters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Top, Direction::Right, Direction::Bottom, Direction::Left];

    /// The side facing this one.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Top => Direction::Bottom,
            Direction::Bottom => Direction::Top,
        }
    }

    /// Unit step for this direction.
    pub fn factor(self) -> Vec2 {
        match self {
            Direction::Top => Vec2::new(0.0, -1.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::Bottom => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
        }
    }

    /// Whether travel along this direction changes x.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).hypot()
}

/// Check whether `point` lies on the segment `start`→`end`.
///
/// The point must be collinear with the segment (within [`SEGMENT_TOLERANCE`]) and
/// fall inside its bounds. A zero-length segment only contains its own endpoint.
pub fn is_point_on_segment(point: Point, start: Point, end: Point) -> bool {
    let seg = end - start;
    let len = seg.hypot();
    if len < f64::EPSILON {
        return distance(point, start) <= SEGMENT_TOLERANCE;
    }
    let cross = seg.cross(point - start);
    if (cross / len).abs() > SEGMENT_TOLERANCE {
        return false;
    }
    let bounds = Rect::from_points(start, end).inflate(SEGMENT_TOLERANCE, SEGMENT_TOLERANCE);
    bounds.contains(point)
}

/// Total length of a polyline.
pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| distance(w[0], w[1])).sum()
}

/// Point at the given fractional arc length along a polyline.
///
/// `ratio` is clamped to `[0, 1]`. Returns `None` for an empty polyline.
pub fn point_on_polyline(points: &[Point], ratio: f64) -> Option<Point> {
    let first = *points.first()?;
    let total = polyline_length(points);
    if total < f64::EPSILON {
        return Some(first);
    }
    let target = total * ratio.clamp(0.0, 1.0);

    let mut accumulated = 0.0;
    for w in points.windows(2) {
        let segment = distance(w[0], w[1]);
        if segment > 0.0 && accumulated + segment >= target {
            let t = (target - accumulated) / segment;
            return Some(w[0].lerp(w[1], t));
        }
        accumulated += segment;
    }
    points.last().copied()
}

/// Fractional arc length at which `point` lies on a polyline.
///
/// This is an exact containment test against each segment in order, not a projection:
/// a point off the polyline is an error.
pub fn ratio_by_point(points: &[Point], point: Point) -> GeometryResult<f64> {
    let total = polyline_length(points);
    let mut walked = 0.0;
    for w in points.windows(2) {
        if is_point_on_segment(point, w[0], w[1]) {
            if total < f64::EPSILON {
                return Ok(0.0);
            }
            walked += distance(point, w[0]);
            return Ok((walked / total).clamp(0.0, 1.0));
        }
        walked += distance(w[0], w[1]);
    }
    Err(GeometryError::PointNotOnPolyline { x: point.x, y: point.y })
}

/// Point at `extend_distance` from `source` along the ray towards `target`.
///
/// Coincident points have no direction; they are treated as the (1, 1) step.
pub fn extend_point(source: Point, target: Point, extend_distance: f64) -> Point {
    let length = distance(source, target);
    let (cos, sin) = if source == target {
        (1.0, 1.0)
    } else {
        ((target.x - source.x) / length, (target.y - source.y) / length)
    };
    Point::new(source.x + extend_distance * cos, source.y + extend_distance * sin)
}

/// Center between two points plus the half extents on each axis.
pub fn edge_center(source: Point, target: Point) -> (f64, f64, f64, f64) {
    let x_offset = (target.x - source.x).abs() / 2.0;
    let center_x = if target.x < source.x { target.x + x_offset } else { target.x - x_offset };
    let y_offset = (target.y - source.y).abs() / 2.0;
    let center_y = if target.y < source.y { target.y + y_offset } else { target.y - y_offset };
    (center_x, center_y, x_offset, y_offset)
}

/// Whether all points share the same y coordinate.
pub fn is_over_horizontal(points: &[Point]) -> bool {
    points.windows(2).all(|w| w[0].y == w[1].y)
}

/// Whether all points share the same x coordinate.
pub fn is_over_vertical(points: &[Point]) -> bool {
    points.windows(2).all(|w| w[0].x == w[1].x)
}

/// Remove repeated points, keeping the first occurrence of each.
pub fn remove_duplicate_points(points: &[Point]) -> Vec<Point> {
    let mut unique: Vec<Point> = Vec::with_capacity(points.len());
    for &point in points {
        if !unique.contains(&point) {
            unique.push(point);
        }
    }
    unique
}

/// Axis-aligned bounds of a point set. Empty input yields a zero rectangle.
pub fn rectangle_from_points(points: &[Point]) -> Rect {
    let Some(&first) = points.first() else {
        return Rect::ZERO;
    };
    points.iter().skip(1).fold(Rect::from_points(first, first), |rect, &p| rect.union_pt(p))
}

/// Reorder two corner points so the first is the top-left and the second the bottom-right.
pub fn normalize_shape_points(points: [Point; 2]) -> [Point; 2] {
    let rect = Rect::from_points(points[0], points[1]);
    [Point::new(rect.x0, rect.y0), Point::new(rect.x1, rect.y1)]
}

/// The four edge midpoints of a rectangle, in top, right, bottom, left order.
pub fn connector_points(rect: Rect) -> [Point; 4] {
    let center = rect.center();
    [
        Point::new(center.x, rect.y0),
        Point::new(rect.x1, center.y),
        Point::new(center.x, rect.y1),
        Point::new(rect.x0, center.y),
    ]
}

/// Connector point of `rect` within `radius` of `point`, if any.
pub fn hit_connector_point(point: Point, rect: Rect, radius: f64) -> Option<Point> {
    connector_points(rect)
        .into_iter()
        .find(|&connector| distance(connector, point) <= radius)
}

/// Nearest point on the outline of a rectangle.
pub fn nearest_point_on_rect_outline(rect: Rect, point: Point) -> Point {
    let x = point.x.clamp(rect.x0, rect.x1);
    let y = point.y.clamp(rect.y0, rect.y1);
    if x > rect.x0 && x < rect.x1 && y > rect.y0 && y < rect.y1 {
        // Inside: push out through the closest side.
        let candidates = [
            (y - rect.y0, Point::new(x, rect.y0)),
            (rect.x1 - x, Point::new(rect.x1, y)),
            (rect.y1 - y, Point::new(x, rect.y1)),
            (x - rect.x0, Point::new(rect.x0, y)),
        ];
        return candidates
            .into_iter()
            .fold((f64::INFINITY, Point::new(x, y)), |best, c| if c.0 < best.0 { c } else { best })
            .1;
    }
    Point::new(x, y)
}

/// Nearest point on the outline of the ellipse inscribed in `rect`.
///
/// Uses a fixed number of curvature-based refinement steps, which converges well
/// within a pixel for on-screen shapes.
pub fn nearest_point_on_ellipse_outline(rect: Rect, point: Point) -> Point {
    let center = rect.center();
    let a = rect.width().abs() / 2.0;
    let b = rect.height().abs() / 2.0;
    if a < f64::EPSILON || b < f64::EPSILON {
        return nearest_point_on_rect_outline(rect, point);
    }
    let px = (point.x - center.x).abs();
    let py = (point.y - center.y).abs();

    let mut tx = std::f64::consts::FRAC_1_SQRT_2;
    let mut ty = std::f64::consts::FRAC_1_SQRT_2;
    for _ in 0..4 {
        let x = a * tx;
        let y = b * ty;
        let ex = (a * a - b * b) * tx.powi(3) / a;
        let ey = (b * b - a * a) * ty.powi(3) / b;
        let r = (x - ex).hypot(y - ey);
        let q = (px - ex).hypot(py - ey);
        if q < f64::EPSILON {
            break;
        }
        tx = ((px - ex) * r / q + ex) / a;
        ty = ((py - ey) * r / q + ey) / b;
        tx = tx.clamp(0.0, 1.0);
        ty = ty.clamp(0.0, 1.0);
        let t = tx.hypot(ty);
        tx /= t;
        ty /= t;
    }
    let sign = |v: f64| if v < 0.0 { -1.0 } else { 1.0 };
    Point::new(
        center.x + a * tx * sign(point.x - center.x),
        center.y + b * ty * sign(point.y - center.y),
    )
}

/// Point of `rect` addressed by a ratio pair (`(0, 0)` top-left, `(1, 1)` bottom-right).
pub fn point_by_ratio(rect: Rect, ratio: Point) -> Point {
    Point::new(rect.x0 + rect.width() * ratio.x, rect.y0 + rect.height() * ratio.y)
}

/// Ratio pair addressing `point` inside `rect`. Degenerate axes map to 0.5.
pub fn ratio_of_point(rect: Rect, point: Point) -> Point {
    let axis = |v: f64, start: f64, size: f64| if size.abs() < f64::EPSILON { 0.5 } else { (v - start) / size };
    Point::new(axis(point.x, rect.x0, rect.width()), axis(point.y, rect.y0, rect.height()))
}

/// Side of a rectangle a connection ratio belongs to (the closest edge wins).
pub fn direction_by_ratio(ratio: Point) -> Direction {
    let candidates = [
        (ratio.y, Direction::Top),
        (1.0 - ratio.x, Direction::Right),
        (1.0 - ratio.y, Direction::Bottom),
        (ratio.x, Direction::Left),
    ];
    candidates
        .into_iter()
        .fold((f64::INFINITY, Direction::Bottom), |best, c| if c.0 < best.0 { c } else { best })
        .1
}

/// Side of `rect` a boundary point belongs to.
pub fn direction_of_point(rect: Rect, point: Point) -> Direction {
    direction_by_ratio(ratio_of_point(rect, point))
}

/// Rotate `point` around `center` by `angle` radians.
pub fn rotate_point(point: Point, center: Point, angle: f64) -> Point {
    if angle == 0.0 {
        return point;
    }
    Affine::rotate_about(angle, center) * point
}

/// Closest point to `point` on the segment `start..end`.
pub fn nearest_point_on_segment(point: Point, start: Point, end: Point) -> Point {
    let seg = end - start;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return start;
    }
    let t = ((point - start).dot(seg) / len_sq).clamp(0.0, 1.0);
    start + seg * t
}

/// Closest point to `point` on a closed polygon outline.
pub fn nearest_point_on_polygon(polygon: &[Point], point: Point) -> Point {
    let Some(&first) = polygon.first() else {
        return point;
    };
    let mut best = first;
    let mut best_distance = f64::INFINITY;
    for i in 0..polygon.len() {
        let candidate = nearest_point_on_segment(point, polygon[i], polygon[(i + 1) % polygon.len()]);
        let d = distance(candidate, point);
        if d < best_distance {
            best_distance = d;
            best = candidate;
        }
    }
    best
}
