//! Element definitions for the board.

mod basic;
mod image;
mod line;
mod mind;

pub use basic::{Geometry, GeometryShape};
pub use image::Image;
pub use line::{Line, LineHandle, LineMarker, LineText};
pub use mind::{MindElement, MindLayout};

use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Neutral gray used for summary nodes and secondary decorations.
    pub const fn gray() -> Self {
        Self::new(0x99, 0x99, 0x99, 255)
    }

    /// Accent blue used for selection and alignment feedback.
    pub const fn selection() -> Self {
        Self::new(0x66, 0x98, 0xff, 255)
    }

    /// CSS-style `#rrggbb` / `rgba()` string for vector output.
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a as f64 / 255.0)
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Stroke style for outlines and connectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl StrokeStyle {
    /// Dash pattern for this style at the given stroke width (empty = solid).
    pub fn dash_pattern(self, stroke_width: f64) -> Vec<f64> {
        match self {
            StrokeStyle::Solid => Vec::new(),
            StrokeStyle::Dashed => vec![stroke_width * 4.0, stroke_width * 3.0],
            StrokeStyle::Dotted => vec![stroke_width, stroke_width * 2.0],
        }
    }
}

/// Style properties for elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width.
    pub stroke_width: f64,
    /// Fill color (None = no fill).
    #[serde(default)]
    pub fill_color: Option<SerializableColor>,
    /// Stroke style.
    #[serde(default)]
    pub stroke_style: StrokeStyle,
}

impl ElementStyle {
    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(|c| c.into())
    }
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            fill_color: None,
            stroke_style: StrokeStyle::Solid,
        }
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    (point - (a + seg * t)).hypot()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Common behaviour of all element kinds.
pub trait ElementTrait {
    /// Get the unique identifier.
    fn id(&self) -> ElementId;

    /// Axis-aligned bounds before rotation, if the element has any.
    fn rectangle(&self) -> Option<Rect>;

    /// Rotation in radians around the rectangle center.
    fn angle(&self) -> f64 {
        0.0
    }

    /// Check if a point (in document coordinates) hits this element.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the style.
    fn style(&self) -> &ElementStyle;
}

/// Any element that can live in the board tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Geometry(Geometry),
    Image(Image),
    Line(Line),
    Mind(MindElement),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Element::Geometry($s) => $body,
            Element::Image($s) => $body,
            Element::Line($s) => $body,
            Element::Mind($s) => $body,
        }
    };
}

impl ElementTrait for Element {
    fn id(&self) -> ElementId {
        Element::id(self)
    }

    fn rectangle(&self) -> Option<Rect> {
        Element::rectangle(self)
    }

    fn angle(&self) -> f64 {
        Element::angle(self)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        Element::hit_test(self, point, tolerance)
    }

    fn style(&self) -> &ElementStyle {
        Element::style(self)
    }
}

impl Element {
    pub fn id(&self) -> ElementId {
        dispatch!(self, e => e.id())
    }

    pub fn rectangle(&self) -> Option<Rect> {
        dispatch!(self, e => e.rectangle())
    }

    pub fn angle(&self) -> f64 {
        dispatch!(self, e => e.angle())
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        dispatch!(self, e => e.hit_test(point, tolerance))
    }

    pub fn style(&self) -> &ElementStyle {
        dispatch!(self, e => e.style())
    }

    /// Child elements, for kinds that form a tree.
    pub fn children(&self) -> Option<&[Element]> {
        match self {
            Element::Mind(m) => Some(&m.children),
            _ => None,
        }
    }

    /// Mutable child list, for kinds that form a tree.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Element>> {
        match self {
            Element::Mind(m) => Some(&mut m.children),
            _ => None,
        }
    }

    /// Move the children of `other` into `self` (used when replacing a node's properties).
    pub(crate) fn adopt_children(&mut self, other: &mut Element) {
        if let (Some(mine), Some(theirs)) = (self.children_mut(), other.children_mut()) {
            *mine = std::mem::take(theirs);
        }
    }

    pub fn as_geometry(&self) -> Option<&Geometry> {
        match self {
            Element::Geometry(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            Element::Image(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&Line> {
        match self {
            Element::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_mind(&self) -> Option<&MindElement> {
        match self {
            Element::Mind(m) => Some(m),
            _ => None,
        }
    }

    /// Check if this element is a basic geometry shape.
    pub fn is_geometry(&self) -> bool {
        matches!(self, Element::Geometry(_))
    }

    /// Check if this element is an embedded image.
    pub fn is_image(&self) -> bool {
        matches!(self, Element::Image(_))
    }

    /// Check if this element is a connector.
    pub fn is_line(&self) -> bool {
        matches!(self, Element::Line(_))
    }

    /// Whether resizing must keep the width/height ratio regardless of modifiers.
    pub fn has_fixed_aspect(&self) -> bool {
        self.is_image()
    }

    /// Regenerate the element's ID (children keep theirs).
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Element::Geometry(e) => e.id = new_id,
            Element::Image(e) => e.id = new_id,
            Element::Line(e) => e.id = new_id,
            Element::Mind(e) => e.id = new_id,
        }
    }
}

impl From<Geometry> for Element {
    fn from(value: Geometry) -> Self {
        Element::Geometry(value)
    }
}

impl From<Image> for Element {
    fn from(value: Image) -> Self {
        Element::Image(value)
    }
}

impl From<Line> for Element {
    fn from(value: Line) -> Self {
        Element::Line(value)
    }
}

impl From<MindElement> for Element {
    fn from(value: MindElement) -> Self {
        Element::Mind(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_roundtrip() {
        let color = SerializableColor::new(10, 20, 30, 255);
        let peniko: Color = color.into();
        assert_eq!(SerializableColor::from(peniko), color);
        assert_eq!(color.to_css(), "#0a141e");
        assert_eq!(SerializableColor::new(0, 0, 0, 0).to_css(), "rgba(0,0,0,0.000)");
    }

    #[test]
    fn test_point_to_segment_dist() {
        let d = point_to_segment_dist(Point::new(5.0, 3.0), Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!((d - 3.0).abs() < f64::EPSILON);
        let d = point_to_segment_dist(Point::new(13.0, 4.0), Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!((d - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_element_json_roundtrip() {
        let element: Element = Geometry::new(GeometryShape::Rectangle, [Point::new(0.0, 0.0), Point::new(10.0, 5.0)]).into();
        let json = serde_json::to_string(&element).unwrap();
        assert!(json.contains("\"type\":\"geometry\""));
        let back: Element = serde_json::from_str(&json).unwrap();
        assert_eq!(back, element);
    }

    #[test]
    fn test_children_only_for_mind() {
        let geometry: Element = Geometry::new(GeometryShape::Ellipse, [Point::ZERO, Point::new(1.0, 1.0)]).into();
        assert!(geometry.children().is_none());
        let mind: Element = MindElement::new("root", Point::ZERO, 100.0, 40.0).into();
        assert_eq!(mind.children().map(|c| c.len()), Some(0));
    }
}
