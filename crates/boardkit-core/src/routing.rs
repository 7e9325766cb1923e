//! Connector routing between two anchors.
//!
//! The orthogonal router is a pure function of its inputs: it produces the waypoint
//! list `[source, source_gapped, ..bends, target_gapped, target]` and leaves cleanup
//! (duplicate removal, collinear collapse) to [`simplify_orthogonal_points`].

use crate::geometry::{edge_center, is_over_horizontal, is_over_vertical, remove_duplicate_points, Direction};
use kurbo::{BezPath, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Default stand-off between a shape boundary and the first bend of a connector.
pub const DEFAULT_STANDOFF: f64 = 30.0;

/// Rendered shape of a connector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorShape {
    /// Straight segments through the stored points.
    Straight,
    /// Right-angle route computed from the anchor directions.
    #[default]
    Elbow,
    /// Cubic curve leaving and entering along the anchor directions.
    Curve,
}

/// A connector end: where it touches a shape and which side it leaves through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub point: Point,
    pub direction: Direction,
}

impl Anchor {
    pub fn new(point: Point, direction: Direction) -> Self {
        Self { point, direction }
    }

    /// The anchor point pushed out along its direction.
    pub fn gapped(&self, offset: f64) -> Point {
        self.point + self.direction.factor() * offset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn other(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    fn of_vec(self, v: Vec2) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    fn of_point(self, p: Point) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }
}

/// Unit travel direction from `source` towards `target`, restricted to the axis of
/// `source_direction`.
pub fn travel_direction(source: Point, source_direction: Direction, target: Point) -> Vec2 {
    if source_direction.is_horizontal() {
        if source.x < target.x { Vec2::new(1.0, 0.0) } else { Vec2::new(-1.0, 0.0) }
    } else if source.y < target.y {
        Vec2::new(0.0, 1.0)
    } else {
        Vec2::new(0.0, -1.0)
    }
}

/// Orthogonal waypoints from `source` to `target`.
///
/// Both ends are first pushed out by `offset` along their directions; the bends between
/// the gapped points depend on whether the anchors face each other.
pub fn route(source: Point, source_direction: Direction, target: Point, target_direction: Direction, offset: f64) -> Vec<Point> {
    let source_factor = source_direction.factor();
    let target_factor = target_direction.factor();
    let source_gapped = source + source_factor * offset;
    let target_gapped = target + target_factor * offset;

    let dir = travel_direction(source_gapped, source_direction, target_gapped);
    let axis = if dir.x != 0.0 { Axis::X } else { Axis::Y };
    let current_dir = axis.of_vec(dir);
    let source_on_axis = axis.of_vec(source_factor);

    let bends: Vec<Point> = if source_on_axis * axis.of_vec(target_factor) == -1.0 {
        // Anchors face each other: split through the middle.
        let (center_x, center_y, _, _) = edge_center(source, target);
        let vertical_split = vec![Point::new(center_x, source_gapped.y), Point::new(center_x, target_gapped.y)];
        let horizontal_split = vec![Point::new(source_gapped.x, center_y), Point::new(target_gapped.x, center_y)];
        match (source_on_axis == current_dir, axis) {
            (true, Axis::X) | (false, Axis::Y) => vertical_split,
            (true, Axis::Y) | (false, Axis::X) => horizontal_split,
        }
    } else {
        // Single bend, x from source and y from target or the other way around.
        let source_target = Point::new(source_gapped.x, target_gapped.y);
        let target_source = Point::new(target_gapped.x, source_gapped.y);
        let mut bend = match axis {
            Axis::X if source_factor.x == current_dir => target_source,
            Axis::X => source_target,
            Axis::Y if source_factor.y == current_dir => source_target,
            Axis::Y => target_source,
        };

        // Mixed sides (e.g. right -> bottom) must not bend back through the shape.
        if source_direction != target_direction {
            let cross = axis.other();
            let is_same_dir = source_on_axis == cross.of_vec(target_factor);
            let source_gt_target = cross.of_point(source_gapped) > cross.of_point(target_gapped);
            let source_lt_target = cross.of_point(source_gapped) < cross.of_point(target_gapped);
            let flip = (source_on_axis == 1.0 && ((!is_same_dir && source_gt_target) || (is_same_dir && source_lt_target)))
                || (source_on_axis != 1.0 && ((!is_same_dir && source_lt_target) || (is_same_dir && source_gt_target)));
            if flip {
                bend = match axis {
                    Axis::X => source_target,
                    Axis::Y => target_source,
                };
            }
        }
        vec![bend]
    };

    let mut points = Vec::with_capacity(bends.len() + 4);
    points.push(source);
    points.push(source_gapped);
    points.extend(bends);
    points.push(target_gapped);
    points.push(target);
    points
}

/// [`route`] with duplicates removed and collinear waypoints collapsed.
pub fn elbow_route(source: Anchor, target: Anchor, offset: f64) -> Vec<Point> {
    let raw = route(source.point, source.direction, target.point, target.direction, offset);
    simplify_orthogonal_points(&remove_duplicate_points(&raw))
}

/// Drop interior points that are not genuine turns.
///
/// A point is kept only when it and its neighbours do not share a horizontal or
/// vertical line. The pass repeats until nothing changes, so the result is stable
/// under reapplication.
pub fn simplify_orthogonal_points(points: &[Point]) -> Vec<Point> {
    let mut current = points.to_vec();
    loop {
        let next = simplify_pass(&current);
        if next.len() == current.len() {
            return next;
        }
        current = next;
    }
}

fn simplify_pass(points: &[Point]) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let mut simplified = vec![points[0]];
    for w in points.windows(3) {
        let is_turn = !(is_over_horizontal(w) || is_over_vertical(w));
        if is_turn {
            simplified.push(w[1]);
        }
    }
    simplified.push(points[points.len() - 1]);
    simplified
}

/// Control polygon `[source, c1, c2, target]` for a curved connector.
pub fn curve_points(source: Anchor, target: Anchor, offset: f64) -> Vec<Point> {
    let span = target.point - source.point;
    let reach = (span.x.abs().max(span.y.abs()) / 2.0).max(offset);
    vec![
        source.point,
        source.gapped(reach),
        target.gapped(reach),
        target.point,
    ]
}

/// Waypoints for a connector of the given shape.
///
/// `via` holds user-placed interior points; they are only honoured by straight
/// connectors.
pub fn connector_waypoints(shape: ConnectorShape, source: Anchor, target: Anchor, via: &[Point], offset: f64) -> Vec<Point> {
    match shape {
        ConnectorShape::Straight => {
            let mut points = Vec::with_capacity(via.len() + 2);
            points.push(source.point);
            points.extend_from_slice(via);
            points.push(target.point);
            points
        }
        ConnectorShape::Elbow => elbow_route(source, target, offset),
        ConnectorShape::Curve => curve_points(source, target, offset),
    }
}

/// Build a drawable path from connector waypoints.
pub fn connector_path(shape: ConnectorShape, points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some(&first) = points.first() else {
        return path;
    };
    path.move_to(first);
    match shape {
        ConnectorShape::Curve if points.len() == 4 => {
            path.curve_to(points[1], points[2], points[3]);
        }
        ConnectorShape::Curve => {
            // Catmull-Rom through the points, converted to cubic segments.
            let tension = 0.5;
            for i in 0..points.len().saturating_sub(1) {
                let p0 = points[i.saturating_sub(1)];
                let p1 = points[i];
                let p2 = points[i + 1];
                let p3 = points[(i + 2).min(points.len() - 1)];
                let cp1 = p1 + (p2 - p0) * (tension / 3.0);
                let cp2 = p2 - (p3 - p1) * (tension / 3.0);
                path.curve_to(cp1, cp2, p2);
            }
        }
        ConnectorShape::Straight | ConnectorShape::Elbow => {
            for &p in &points[1..] {
                path.line_to(p);
            }
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Top),
            Just(Direction::Right),
            Just(Direction::Bottom),
            Just(Direction::Left),
        ]
    }

    #[test]
    fn test_route_face_to_face() {
        let points = route(p(0.0, 0.0), Direction::Right, p(10.0, 10.0), Direction::Left, 5.0);
        assert_eq!(
            points,
            vec![p(0.0, 0.0), p(5.0, 0.0), p(5.0, 5.0), p(5.0, 5.0), p(5.0, 10.0), p(10.0, 10.0)]
        );
    }

    #[test]
    fn test_route_face_to_face_far_apart() {
        let points = route(p(0.0, 0.0), Direction::Right, p(100.0, 40.0), Direction::Left, 10.0);
        assert_eq!(
            points,
            vec![p(0.0, 0.0), p(10.0, 0.0), p(50.0, 0.0), p(50.0, 40.0), p(90.0, 40.0), p(100.0, 40.0)]
        );
        let simplified = simplify_orthogonal_points(&points);
        assert_eq!(simplified, vec![p(0.0, 0.0), p(50.0, 0.0), p(50.0, 40.0), p(100.0, 40.0)]);
    }

    #[test]
    fn test_route_vertical_face_to_face() {
        let points = route(p(0.0, 0.0), Direction::Bottom, p(40.0, 100.0), Direction::Top, 10.0);
        assert_eq!(
            points,
            vec![p(0.0, 0.0), p(0.0, 10.0), p(0.0, 50.0), p(40.0, 50.0), p(40.0, 90.0), p(40.0, 100.0)]
        );
    }

    #[test]
    fn test_route_same_side() {
        // Both anchors leave through the top: one bend above the higher gapped point.
        let points = route(p(0.0, 0.0), Direction::Top, p(100.0, 50.0), Direction::Top, 10.0);
        assert_eq!(points, vec![p(0.0, 0.0), p(0.0, -10.0), p(100.0, -10.0), p(100.0, 40.0), p(100.0, 50.0)]);
    }

    #[test]
    fn test_route_mixed_sides_right_to_top() {
        let points = route(p(0.0, 0.0), Direction::Right, p(100.0, 100.0), Direction::Top, 10.0);
        assert_eq!(points, vec![p(0.0, 0.0), p(10.0, 0.0), p(100.0, 0.0), p(100.0, 90.0), p(100.0, 100.0)]);
    }

    #[test]
    fn test_route_mixed_sides_flipped() {
        // Target above the source: the bend flips so it does not cross back through it.
        let points = route(p(0.0, 100.0), Direction::Right, p(100.0, 0.0), Direction::Bottom, 10.0);
        assert_eq!(points, vec![p(0.0, 100.0), p(10.0, 100.0), p(100.0, 100.0), p(100.0, 10.0), p(100.0, 0.0)]);
    }

    #[test]
    fn test_elbow_route_is_simplified() {
        let route = elbow_route(
            Anchor::new(p(0.0, 0.0), Direction::Right),
            Anchor::new(p(10.0, 10.0), Direction::Left),
            5.0,
        );
        assert_eq!(route, vec![p(0.0, 0.0), p(5.0, 0.0), p(5.0, 10.0), p(10.0, 10.0)]);
    }

    #[test]
    fn test_simplify_keeps_turns() {
        let points = vec![p(0.0, 0.0), p(5.0, 0.0), p(10.0, 0.0), p(10.0, 5.0), p(10.0, 10.0), p(20.0, 10.0)];
        assert_eq!(
            simplify_orthogonal_points(&points),
            vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(20.0, 10.0)]
        );
        assert_eq!(simplify_orthogonal_points(&points[..2]), points[..2].to_vec());
    }

    #[test]
    fn test_simplify_backtracking_is_stable() {
        let points = vec![p(0.0, 0.0), p(5.0, 0.0), p(5.0, 5.0), p(5.0, 0.0), p(9.0, 0.0)];
        let once = simplify_orthogonal_points(&points);
        assert_eq!(simplify_orthogonal_points(&once), once);
    }

    #[test]
    fn test_curve_points_follow_directions() {
        let points = curve_points(
            Anchor::new(p(0.0, 0.0), Direction::Right),
            Anchor::new(p(100.0, 100.0), Direction::Left),
            30.0,
        );
        assert_eq!(points, vec![p(0.0, 0.0), p(50.0, 0.0), p(50.0, 100.0), p(100.0, 100.0)]);
    }

    #[test]
    fn test_connector_waypoints_straight_keeps_via() {
        let points = connector_waypoints(
            ConnectorShape::Straight,
            Anchor::new(p(0.0, 0.0), Direction::Right),
            Anchor::new(p(10.0, 0.0), Direction::Left),
            &[p(5.0, 5.0)],
            30.0,
        );
        assert_eq!(points, vec![p(0.0, 0.0), p(5.0, 5.0), p(10.0, 0.0)]);
    }

    #[test]
    fn test_connector_path_elements() {
        let path = connector_path(ConnectorShape::Elbow, &[p(0.0, 0.0), p(5.0, 0.0), p(5.0, 5.0)]);
        assert_eq!(path.elements().len(), 3);
        let curve = connector_path(ConnectorShape::Curve, &[p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0)]);
        assert_eq!(curve.elements().len(), 2);
        assert!(connector_path(ConnectorShape::Straight, &[]).elements().is_empty());
    }

    proptest! {
        #[test]
        fn prop_opposite_is_involution(d in direction()) {
            prop_assert_eq!(d.opposite().opposite(), d);
        }

        #[test]
        fn prop_route_keeps_endpoints(
            sx in -1000.0f64..1000.0, sy in -1000.0f64..1000.0,
            tx in -1000.0f64..1000.0, ty in -1000.0f64..1000.0,
            sd in direction(), td in direction(),
            offset in 0.0f64..100.0,
        ) {
            let source = Point::new(sx, sy);
            let target = Point::new(tx, ty);
            let points = route(source, sd, target, td, offset);
            prop_assert!(points.len() >= 4);
            prop_assert_eq!(points[0], source);
            prop_assert_eq!(*points.last().unwrap(), target);
        }

        #[test]
        fn prop_route_is_orthogonal(
            sx in -1000i32..1000, sy in -1000i32..1000,
            tx in -1000i32..1000, ty in -1000i32..1000,
            sd in direction(), td in direction(),
            offset in 0i32..100,
        ) {
            let points = route(
                Point::new(sx as f64, sy as f64), sd,
                Point::new(tx as f64, ty as f64), td,
                offset as f64,
            );
            // Every leg between the gapped points is axis-aligned.
            for w in points[1..points.len() - 1].windows(2) {
                prop_assert!(w[0].x == w[1].x || w[0].y == w[1].y);
            }
        }

        #[test]
        fn prop_simplify_idempotent(raw in prop::collection::vec((-20i32..20, -20i32..20), 0..12)) {
            let points: Vec<Point> = raw.into_iter().map(|(x, y)| Point::new(x as f64, y as f64)).collect();
            let once = simplify_orthogonal_points(&points);
            let twice = simplify_orthogonal_points(&once);
            prop_assert_eq!(once, twice);
        }
    }
}
