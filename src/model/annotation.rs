//! Committed annotation types.
//!
//! All coordinates are in the rendered page's pixel space at the time the
//! annotation was drawn, with the origin at the page's top-left corner.

use serde::{Deserialize, Serialize};

use crate::color_utils::Color;
use crate::constants::layer;

/// A 2D point in page pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned box. Width and height are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Top-left corner X coordinate
    pub x: f32,
    /// Top-left corner Y coordinate
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    /// Create a normalized box from two opposite corners, in either order.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self {
            x: p1.x.min(p2.x),
            y: p1.y.min(p2.y),
            width: (p1.x - p2.x).abs(),
            height: (p1.y - p2.y).abs(),
        }
    }

    /// A zero-sized box at a point.
    pub fn at(point: Point) -> Self {
        Self::from_corners(point, point)
    }

    /// Check if a point is inside the box (edges included).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// True when both sides strictly exceed `min`.
    pub fn exceeds(&self, min: f32) -> bool {
        self.width > min && self.height > min
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Geometry drawn by the shape tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Ellipse,
    /// Diagonal of the dragged box, from its top-left to its bottom-right corner
    Line,
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Ellipse => "Ellipse",
            ShapeKind::Line => "Line",
        }
    }

    pub fn all() -> &'static [ShapeKind] {
        &[ShapeKind::Rectangle, ShapeKind::Ellipse, ShapeKind::Line]
    }
}

/// Annotation tools available in the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Text,
    Highlight,
    Draw,
    Shape,
}

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Text => "Text",
            Tool::Highlight => "Highlight",
            Tool::Draw => "Draw",
            Tool::Shape => "Shape",
        }
    }

    pub fn all() -> &'static [Tool] {
        &[Tool::Text, Tool::Highlight, Tool::Draw, Tool::Shape]
    }

    /// Parse a toolbar id such as `"highlight"` or `"highlight-tool"`.
    pub fn from_id(id: &str) -> Option<Tool> {
        let id = id.strip_suffix("-tool").unwrap_or(id);
        Tool::all()
            .iter()
            .copied()
            .find(|tool| tool.name().eq_ignore_ascii_case(id))
    }
}

/// A committed text note.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextAnnotation {
    /// Top-left corner of the text box
    pub anchor: Point,
    pub width: f32,
    pub height: f32,
    pub text: String,
    pub color: Color,
    pub font_size: u32,
    pub font_family: String,
}

impl TextAnnotation {
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox {
            x: self.anchor.x,
            y: self.anchor.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// A committed translucent highlight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightAnnotation {
    pub bounds: BoundingBox,
    pub color: Color,
    /// Opacity in `[0, 1]`
    pub opacity: f32,
}

/// A committed freehand stroke.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawAnnotation {
    points: Vec<Point>,
    pub color: Color,
    pub line_width: u8,
}

impl DrawAnnotation {
    /// Returns `None` unless the stroke has at least two points.
    pub fn new(points: Vec<Point>, color: Color, line_width: u8) -> Option<Self> {
        (points.len() > crate::constants::threshold::MIN_STROKE_POINTS).then_some(Self {
            points,
            color,
            line_width,
        })
    }

    /// Points in the order they were recorded.
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

/// A committed rectangle, ellipse or line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeAnnotation {
    pub bounds: BoundingBox,
    pub kind: ShapeKind,
    pub color: Color,
    pub line_width: u8,
    pub fill: bool,
}

/// A committed annotation on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Annotation {
    Text(TextAnnotation),
    Highlight(HighlightAnnotation),
    Draw(DrawAnnotation),
    Shape(ShapeAnnotation),
}

impl Annotation {
    /// Overlay layer this annotation is drawn on.
    pub fn layer(&self) -> u8 {
        match self {
            Annotation::Highlight(_) => layer::HIGHLIGHT,
            Annotation::Draw(_) => layer::DRAW,
            Annotation::Shape(_) => layer::SHAPE,
            Annotation::Text(_) => layer::TEXT,
        }
    }

    /// The tool that creates this kind of annotation.
    pub fn tool(&self) -> Tool {
        match self {
            Annotation::Text(_) => Tool::Text,
            Annotation::Highlight(_) => Tool::Highlight,
            Annotation::Draw(_) => Tool::Draw,
            Annotation::Shape(_) => Tool::Shape,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Annotation::Text(a) => a.color,
            Annotation::Highlight(a) => a.color,
            Annotation::Draw(a) => a.color,
            Annotation::Shape(a) => a.color,
        }
    }

    /// Bounding box of the annotation's geometry.
    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            Annotation::Text(a) => a.bounds(),
            Annotation::Highlight(a) => a.bounds,
            Annotation::Shape(a) => a.bounds,
            Annotation::Draw(a) => {
                let mut points = a.points.iter();
                let Some(first) = points.next() else {
                    return BoundingBox::default();
                };
                let (mut min, mut max) = (*first, *first);
                for p in points {
                    min.x = min.x.min(p.x);
                    min.y = min.y.min(p.y);
                    max.x = max.x.max(p.x);
                    max.y = max.y.max(p.y);
                }
                BoundingBox::from_corners(min, max)
            }
        }
    }

    pub fn as_text(&self) -> Option<&TextAnnotation> {
        match self {
            Annotation::Text(text) => Some(text),
            _ => None,
        }
    }
}
