//! Viewport transform between client, host and view box coordinates.
//!
//! Client coordinates are what input devices report, host coordinates are relative
//! to the board's host surface, and view box coordinates are document space.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Pan/zoom state of the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Position of the host surface in client coordinates.
    pub host_origin: Point,
    /// Translation applied after zooming (host pixels).
    pub offset: Vec2,
    /// Current zoom level (1.0 = 100%).
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            host_origin: Point::ZERO,
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 4.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// View box → host transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Client point → host point.
    pub fn to_host_point(&self, client: Point) -> Point {
        client - self.host_origin.to_vec2()
    }

    /// Host point → view box (document) point.
    pub fn to_view_box_point(&self, host: Point) -> Point {
        self.transform().inverse() * host
    }

    /// Client point straight to document space.
    pub fn client_to_view_box(&self, client: Point) -> Point {
        self.to_view_box_point(self.to_host_point(client))
    }

    /// View box point → client point.
    pub fn to_screen_point(&self, view_box: Point) -> Point {
        self.transform() * view_box + self.host_origin.to_vec2()
    }

    /// Pan by a delta in host pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom by `factor`, keeping the host point fixed on screen.
    pub fn zoom_at(&mut self, host: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }
        let anchor = self.to_view_box_point(host);
        self.zoom = new_zoom;
        let moved = self.transform() * anchor;
        self.offset += host - moved;
    }

    /// Fit `bounds` into a host surface of `size`, leaving `padding` on each side.
    pub fn fit_to_bounds(&mut self, bounds: Rect, size: Size, padding: f64) {
        if bounds.is_zero_area() {
            self.offset = Vec2::ZERO;
            self.zoom = 1.0;
            return;
        }
        let available = Size::new((size.width - padding * 2.0).max(1.0), (size.height - padding * 2.0).max(1.0));
        self.zoom = (available.width / bounds.width())
            .min(available.height / bounds.height())
            .clamp(self.min_zoom, self.max_zoom);
        let center = bounds.center();
        self.offset = Vec2::new(size.width / 2.0 - center.x * self.zoom, size.height / 2.0 - center.y * self.zoom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_conversion() {
        let viewport = Viewport::new();
        let p = Point::new(100.0, 200.0);
        assert_eq!(viewport.client_to_view_box(p), p);
    }

    #[test]
    fn test_host_origin_and_zoom() {
        let viewport = Viewport {
            host_origin: Point::new(10.0, 20.0),
            zoom: 2.0,
            ..Viewport::default()
        };
        let host = viewport.to_host_point(Point::new(110.0, 220.0));
        assert_eq!(host, Point::new(100.0, 200.0));
        let doc = viewport.to_view_box_point(host);
        assert!((doc.x - 50.0).abs() < f64::EPSILON);
        assert!((doc.y - 100.0).abs() < f64::EPSILON);
        let back = viewport.to_screen_point(doc);
        assert!((back.x - 110.0).abs() < 1e-10);
        assert!((back.y - 220.0).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_at_keeps_point_fixed() {
        let mut viewport = Viewport::new();
        viewport.offset = Vec2::new(30.0, -20.0);
        let host = Point::new(200.0, 150.0);
        let before = viewport.to_view_box_point(host);
        viewport.zoom_at(host, 1.5);
        let after = viewport.to_view_box_point(host);
        assert!((before.x - after.x).abs() < 1e-10);
        assert!((before.y - after.y).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut viewport = Viewport::new();
        viewport.zoom_at(Point::ZERO, 0.001);
        assert!((viewport.zoom - viewport.min_zoom).abs() < f64::EPSILON);
        viewport.zoom_at(Point::ZERO, 1000.0);
        assert!((viewport.zoom - viewport.max_zoom).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fit_to_bounds_centers() {
        let mut viewport = Viewport::new();
        viewport.fit_to_bounds(Rect::new(0.0, 0.0, 100.0, 50.0), Size::new(400.0, 400.0), 0.0);
        assert!((viewport.zoom - 4.0).abs() < f64::EPSILON);
        let center = viewport.transform() * Point::new(50.0, 25.0);
        assert!((center.x - 200.0).abs() < 1e-10);
        assert!((center.y - 200.0).abs() < 1e-10);
    }
}
