//! Embedded raster image element.

use super::{ElementId, ElementStyle, ElementTrait};
use crate::geometry::{normalize_shape_points, rotate_point};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An image placed on the board. Images always resize with a locked aspect ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: ElementId,
    pub points: [Point; 2],
    /// Source location of the image data.
    pub url: String,
    #[serde(default)]
    pub angle: f64,
    #[serde(skip, default)]
    style: ElementStyle,
}

impl Image {
    pub fn new(url: impl Into<String>, points: [Point; 2]) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: normalize_shape_points(points),
            url: url.into(),
            angle: 0.0,
            style: ElementStyle::default(),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.points[0], self.points[1])
    }

    /// Width / height of the image frame.
    pub fn aspect_ratio(&self) -> f64 {
        let rect = self.bounds();
        if rect.height().abs() < f64::EPSILON {
            1.0
        } else {
            rect.width() / rect.height()
        }
    }
}

impl ElementTrait for Image {
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
        let rect = self.bounds();
        let local = rotate_point(point, rect.center(), -self.angle);
        rect.inflate(tolerance, tolerance).contains(local)
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }
}
