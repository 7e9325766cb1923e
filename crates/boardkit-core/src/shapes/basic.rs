//! Basic geometry shapes: rectangles, rounded rectangles, ellipses and diamonds.

use super::{ElementId, ElementStyle, ElementTrait};
use crate::geometry::{
    nearest_point_on_ellipse_outline, nearest_point_on_polygon, nearest_point_on_rect_outline, normalize_shape_points,
    rotate_point,
};
use kurbo::{BezPath, Ellipse, Point, Rect, RoundedRect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Corner radius of a round rectangle relative to its shorter side.
const ROUND_RECTANGLE_RATIO: f64 = 0.1;
/// Upper bound on the corner radius of a round rectangle.
const ROUND_RECTANGLE_MAX_RADIUS: f64 = 16.0;

/// Outline kind of a geometry element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GeometryShape {
    #[default]
    Rectangle,
    RoundRectangle,
    Ellipse,
    Diamond,
}

/// A closed shape defined by two corner points, optionally carrying a text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub id: ElementId,
    pub shape: GeometryShape,
    /// Top-left and bottom-right corners.
    pub points: [Point; 2],
    /// Rotation in radians around the center.
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub text: Option<String>,
    /// Height of the laid-out text, kept independent of the shape height.
    #[serde(default)]
    pub text_height: f64,
    /// Whether the shape grows with its text. Cleared once the user resizes it.
    #[serde(default)]
    pub auto_size: bool,
    #[serde(default)]
    pub style: ElementStyle,
}

impl Geometry {
    /// Create a new geometry element from two corner points (in any order).
    pub fn new(shape: GeometryShape, points: [Point; 2]) -> Self {
        Self {
            id: Uuid::new_v4(),
            shape,
            points: normalize_shape_points(points),
            angle: 0.0,
            text: None,
            text_height: 0.0,
            auto_size: false,
            style: ElementStyle::default(),
        }
    }

    /// Attach a text label of the given laid-out height.
    pub fn with_text(mut self, text: impl Into<String>, text_height: f64) -> Self {
        self.text = Some(text.into());
        self.text_height = text_height;
        self.auto_size = true;
        self
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.points[0], self.points[1])
    }

    fn diamond_corners(rect: Rect) -> [Point; 4] {
        let center = rect.center();
        [
            Point::new(center.x, rect.y0),
            Point::new(rect.x1, center.y),
            Point::new(center.x, rect.y1),
            Point::new(rect.x0, center.y),
        ]
    }

    /// Unrotated outline as a path.
    pub fn outline(&self) -> BezPath {
        let rect = self.bounds();
        match self.shape {
            GeometryShape::Rectangle => rect.to_path(0.1),
            GeometryShape::RoundRectangle => {
                let radius = (rect.width().min(rect.height()) * ROUND_RECTANGLE_RATIO).min(ROUND_RECTANGLE_MAX_RADIUS);
                RoundedRect::from_rect(rect, radius).to_path(0.1)
            }
            GeometryShape::Ellipse => Ellipse::from_rect(rect).to_path(0.1),
            GeometryShape::Diamond => {
                let corners = Self::diamond_corners(rect);
                let mut path = BezPath::new();
                path.move_to(corners[0]);
                for &corner in &corners[1..] {
                    path.line_to(corner);
                }
                path.close_path();
                path
            }
        }
    }

    /// Closest point on the (unrotated) outline.
    pub fn nearest_outline_point(&self, point: Point) -> Point {
        let rect = self.bounds();
        match self.shape {
            GeometryShape::Rectangle | GeometryShape::RoundRectangle => nearest_point_on_rect_outline(rect, point),
            GeometryShape::Ellipse => nearest_point_on_ellipse_outline(rect, point),
            GeometryShape::Diamond => nearest_point_on_polygon(&Self::diamond_corners(rect), point),
        }
    }

    fn contains_local(&self, point: Point, tolerance: f64) -> bool {
        let rect = self.bounds();
        let center = rect.center();
        let a = rect.width() / 2.0 + tolerance;
        let b = rect.height() / 2.0 + tolerance;
        if a <= 0.0 || b <= 0.0 {
            return false;
        }
        let dx = (point.x - center.x).abs();
        let dy = (point.y - center.y).abs();
        match self.shape {
            GeometryShape::Rectangle | GeometryShape::RoundRectangle => dx <= a && dy <= b,
            GeometryShape::Ellipse => (dx / a).powi(2) + (dy / b).powi(2) <= 1.0,
            GeometryShape::Diamond => dx / a + dy / b <= 1.0,
        }
    }
}

impl ElementTrait for Geometry {
    fn id(&self) -> ElementId {
        self.id
    }

    fn rectangle(&self) -> Option<Rect> {
        Some(self.bounds())
    }

    fn angle(&self) -> f64 {
        self.angle
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let local = rotate_point(point, self.bounds().center(), -self.angle);
        self.contains_local(local, tolerance)
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(shape: GeometryShape) -> Geometry {
        Geometry::new(shape, [Point::new(100.0, 50.0), Point::new(0.0, 0.0)])
    }

    #[test]
    fn test_new_normalizes_points() {
        let g = geometry(GeometryShape::Rectangle);
        assert_eq!(g.points, [Point::new(0.0, 0.0), Point::new(100.0, 50.0)]);
        assert_eq!(g.rectangle(), Some(Rect::new(0.0, 0.0, 100.0, 50.0)));
    }

    #[test]
    fn test_rectangle_hit_test() {
        let g = geometry(GeometryShape::Rectangle);
        assert!(g.hit_test(Point::new(50.0, 25.0), 0.0));
        assert!(g.hit_test(Point::new(103.0, 25.0), 5.0));
        assert!(!g.hit_test(Point::new(110.0, 25.0), 5.0));
    }

    #[test]
    fn test_ellipse_hit_test() {
        let g = geometry(GeometryShape::Ellipse);
        assert!(g.hit_test(Point::new(50.0, 25.0), 0.0));
        // Bounding box corner lies outside the ellipse.
        assert!(!g.hit_test(Point::new(2.0, 2.0), 0.0));
    }

    #[test]
    fn test_diamond_hit_test() {
        let g = geometry(GeometryShape::Diamond);
        assert!(g.hit_test(Point::new(50.0, 25.0), 0.0));
        assert!(!g.hit_test(Point::new(90.0, 5.0), 0.0));
    }

    #[test]
    fn test_rotated_hit_test() {
        let mut g = Geometry::new(GeometryShape::Rectangle, [Point::new(0.0, 40.0), Point::new(100.0, 60.0)]);
        assert!(!g.hit_test(Point::new(50.0, 5.0), 0.0));
        g.angle = std::f64::consts::FRAC_PI_2;
        assert!(g.hit_test(Point::new(50.0, 5.0), 0.0));
    }

    #[test]
    fn test_nearest_outline_point() {
        let g = geometry(GeometryShape::Rectangle);
        assert_eq!(g.nearest_outline_point(Point::new(50.0, -20.0)), Point::new(50.0, 0.0));
        let e = geometry(GeometryShape::Ellipse);
        let p = e.nearest_outline_point(Point::new(150.0, 25.0));
        assert!((p.x - 100.0).abs() < 1e-6);
        assert!((p.y - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_with_text_enables_auto_size() {
        let g = geometry(GeometryShape::RoundRectangle).with_text("hello", 20.0);
        assert!(g.auto_size);
        assert_eq!(g.text.as_deref(), Some("hello"));
        assert!(!g.outline().is_empty());
    }
}
