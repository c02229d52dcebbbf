//! Annotation overlay: the visual elements layered above a rendered page.
//!
//! [`build_overlay`] is a pure function of a page's annotations and the frame
//! the page was rendered into. It is rebuilt wholesale after every commit and
//! every page render; annotation counts per page are small.
//!
//! Coordinates are page-render-relative: an annotation keeps the pixel position
//! it was drawn at, so it does not follow the content across zoom or rotation.

mod svg;

use serde::Serialize;

use crate::color_utils::Color;
use crate::constants::layer;
use crate::model::{Annotation, BoundingBox, Draft, ShapeKind};

/// Where the rendered page sits on screen, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PageFrame {
    /// Left offset of the page inside the scrolled container
    pub left: f32,
    /// Top offset of the page inside the scrolled container
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl PageFrame {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Same offset, new rendered size.
    pub fn resized(self, width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }
}

/// Vector geometry for a shape annotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapePrimitive {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Ellipse { cx: f32, cy: f32, rx: f32, ry: f32 },
    Line { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl ShapePrimitive {
    /// Fit a shape of `kind` into a normalized box.
    pub fn from_box(kind: ShapeKind, b: BoundingBox) -> Self {
        match kind {
            ShapeKind::Rectangle => ShapePrimitive::Rect {
                x: b.x,
                y: b.y,
                width: b.width,
                height: b.height,
            },
            ShapeKind::Ellipse => {
                let center = b.center();
                ShapePrimitive::Ellipse {
                    cx: center.x,
                    cy: center.y,
                    rx: b.width / 2.0,
                    ry: b.height / 2.0,
                }
            }
            ShapeKind::Line => ShapePrimitive::Line {
                x1: b.x,
                y1: b.y,
                x2: b.x + b.width,
                y2: b.y + b.height,
            },
        }
    }
}

/// A single visual element of the overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OverlayElement {
    /// Styled box holding a text note
    TextBox {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        text: String,
        color: Color,
        font_size: u32,
        font_family: String,
    },
    /// Translucent filled rectangle
    HighlightRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
        opacity: f32,
    },
    /// Freehand SVG path
    Stroke {
        path: String,
        color: Color,
        line_width: u8,
    },
    /// Rectangle, ellipse or line
    Shape {
        primitive: ShapePrimitive,
        color: Color,
        line_width: u8,
        /// Fill color, drawn at reduced opacity; `None` means unfilled
        fill: Option<Color>,
    },
}

/// An overlay element with its layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayItem {
    pub layer: u8,
    /// Index of the source annotation on its page; `None` for the draft preview
    pub index: Option<usize>,
    pub element: OverlayElement,
}

/// The elements to draw over one page, back to front.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Overlay {
    pub frame: PageFrame,
    pub items: Vec<OverlayItem>,
    /// In-progress draft, drawn above everything else on its layer's side
    pub preview: Option<OverlayItem>,
}

impl Overlay {
    pub fn new(frame: PageFrame) -> Self {
        Self {
            frame,
            ..Default::default()
        }
    }

    pub fn set_preview(&mut self, preview: Option<OverlayItem>) {
        self.preview = preview;
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.preview.is_none()
    }

    /// Serialize to a standalone SVG document.
    pub fn to_svg(&self) -> String {
        svg::render(self)
    }
}

/// Build the overlay for one page.
///
/// Items are ordered by layer (highlight, draw, shape, text); within a layer
/// they keep insertion order so later annotations draw on top.
pub fn build_overlay(annotations: &[Annotation], frame: PageFrame) -> Overlay {
    let mut items: Vec<OverlayItem> = annotations
        .iter()
        .enumerate()
        .map(|(index, annotation)| OverlayItem {
            layer: annotation.layer(),
            index: Some(index),
            element: element_for(annotation),
        })
        .collect();
    // sort_by_key is stable
    items.sort_by_key(|item| item.layer);

    Overlay {
        frame,
        items,
        preview: None,
    }
}

/// Visual element for a committed annotation.
pub fn element_for(annotation: &Annotation) -> OverlayElement {
    match annotation {
        Annotation::Text(t) => OverlayElement::TextBox {
            x: t.anchor.x,
            y: t.anchor.y,
            width: t.width,
            height: t.height,
            text: t.text.clone(),
            color: t.color,
            font_size: t.font_size,
            font_family: t.font_family.clone(),
        },
        Annotation::Highlight(h) => OverlayElement::HighlightRect {
            x: h.bounds.x,
            y: h.bounds.y,
            width: h.bounds.width,
            height: h.bounds.height,
            color: h.color,
            opacity: h.opacity,
        },
        Annotation::Draw(d) => OverlayElement::Stroke {
            path: stroke_path(d.points().iter().map(|p| (p.x, p.y))),
            color: d.color,
            line_width: d.line_width,
        },
        Annotation::Shape(s) => OverlayElement::Shape {
            primitive: ShapePrimitive::from_box(s.kind, s.bounds),
            color: s.color,
            line_width: s.line_width,
            fill: s.fill.then_some(s.color),
        },
    }
}

/// Preview element for a draft, updated in place while dragging.
pub fn preview_for(draft: &Draft) -> OverlayItem {
    let (layer, element) = match draft {
        Draft::Text(t) => {
            let (width, height) = t.measured.unwrap_or_else(|| t.estimated_size());
            (
                layer::TEXT,
                OverlayElement::TextBox {
                    x: t.anchor.x,
                    y: t.anchor.y,
                    width,
                    height,
                    text: t.content.clone(),
                    color: t.color,
                    font_size: t.font_size,
                    font_family: t.font_family.clone(),
                },
            )
        }
        Draft::Highlight(h) => (
            layer::HIGHLIGHT,
            OverlayElement::HighlightRect {
                x: h.bounds.x,
                y: h.bounds.y,
                width: h.bounds.width,
                height: h.bounds.height,
                color: h.color,
                opacity: h.opacity,
            },
        ),
        Draft::Draw(d) => (
            layer::DRAW,
            OverlayElement::Stroke {
                path: d.path_data().to_string(),
                color: d.color,
                line_width: d.line_width,
            },
        ),
        Draft::Shape(s) => (
            layer::SHAPE,
            OverlayElement::Shape {
                primitive: ShapePrimitive::from_box(s.kind, s.bounds),
                color: s.color,
                line_width: s.line_width,
                fill: s.fill.then_some(s.color),
            },
        ),
    };
    OverlayItem {
        layer,
        index: None,
        element,
    }
}

/// SVG path data through the points in order: `M x0,y0 L x1,y1 ...`.
pub fn stroke_path(points: impl IntoIterator<Item = (f32, f32)>) -> String {
    let mut path = String::new();
    for (i, (x, y)) in points.into_iter().enumerate() {
        if i == 0 {
            path.push_str(&format!("M{x},{y}"));
        } else {
            path.push_str(&format!(" L{x},{y}"));
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        DraftStyle, DrawAnnotation, HighlightAnnotation, Point, ShapeAnnotation, TextAnnotation,
        Tool,
    };

    fn highlight(x: f32) -> Annotation {
        Annotation::Highlight(HighlightAnnotation {
            bounds: BoundingBox {
                x,
                y: 0.0,
                width: 20.0,
                height: 20.0,
            },
            color: Color::RED,
            opacity: 0.3,
        })
    }

    fn shape(kind: ShapeKind, fill: bool) -> Annotation {
        Annotation::Shape(ShapeAnnotation {
            bounds: BoundingBox {
                x: 10.0,
                y: 20.0,
                width: 40.0,
                height: 60.0,
            },
            kind,
            color: Color::rgb(0, 0, 255),
            line_width: 3,
            fill,
        })
    }

    fn text() -> Annotation {
        Annotation::Text(TextAnnotation {
            anchor: Point::new(1.0, 2.0),
            width: 100.0,
            height: 30.0,
            text: "note".into(),
            color: Color::RED,
            font_size: 14,
            font_family: "Arial".into(),
        })
    }

    fn stroke() -> Annotation {
        Annotation::Draw(
            DrawAnnotation::new(vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)], Color::RED, 2)
                .unwrap(),
        )
    }

    #[test]
    fn test_same_type_keeps_insertion_order() {
        let annotations = [highlight(1.0), highlight(2.0), highlight(3.0)];
        let overlay = build_overlay(&annotations, PageFrame::default());
        let order: Vec<_> = overlay.items.iter().map(|i| i.index).collect();
        assert_eq!(order, vec![Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn test_layers_back_to_front() {
        // Inserted front-most first; the overlay must still put highlights at the back.
        let annotations = [text(), shape(ShapeKind::Rectangle, false), stroke(), highlight(0.0)];
        let overlay = build_overlay(&annotations, PageFrame::default());
        let layers: Vec<_> = overlay.items.iter().map(|i| i.layer).collect();
        assert_eq!(layers, vec![layer::HIGHLIGHT, layer::DRAW, layer::SHAPE, layer::TEXT]);
        let order: Vec<_> = overlay.items.iter().map(|i| i.index).collect();
        assert_eq!(order, vec![Some(3), Some(2), Some(1), Some(0)]);
    }

    #[test]
    fn test_shape_primitives() {
        let OverlayElement::Shape {
            primitive, fill, ..
        } = element_for(&shape(ShapeKind::Ellipse, false))
        else {
            panic!("Expected shape element");
        };
        assert_eq!(
            primitive,
            ShapePrimitive::Ellipse {
                cx: 30.0,
                cy: 50.0,
                rx: 20.0,
                ry: 30.0,
            }
        );
        assert_eq!(fill, None);

        let OverlayElement::Shape {
            primitive, fill, ..
        } = element_for(&shape(ShapeKind::Line, true))
        else {
            panic!("Expected shape element");
        };
        assert_eq!(
            primitive,
            ShapePrimitive::Line {
                x1: 10.0,
                y1: 20.0,
                x2: 50.0,
                y2: 80.0,
            }
        );
        assert_eq!(fill, Some(Color::rgb(0, 0, 255)));
    }

    #[test]
    fn test_stroke_path_data() {
        assert_eq!(stroke_path([(1.0, 2.0), (3.5, 4.0), (5.0, 6.0)]), "M1,2 L3.5,4 L5,6");
        assert_eq!(stroke_path(std::iter::empty()), "");
    }

    #[test]
    fn test_preview_matches_draft() {
        let mut draft = Draft::start(
            Tool::Highlight,
            Point::new(10.0, 10.0),
            &DraftStyle::default(),
        );
        draft.update(Point::new(4.0, 30.0));
        let preview = preview_for(&draft);
        assert_eq!(preview.index, None);
        assert_eq!(preview.layer, layer::HIGHLIGHT);
        let OverlayElement::HighlightRect {
            x,
            y,
            width,
            height,
            ..
        } = preview.element
        else {
            panic!("Expected highlight preview");
        };
        assert_eq!((x, y, width, height), (4.0, 10.0, 6.0, 20.0));
    }

    #[test]
    fn test_empty_page_overlay() {
        let overlay = build_overlay(&[], PageFrame::new(20.0, 20.0, 612.0, 792.0));
        assert!(overlay.is_empty());
        assert_eq!(overlay.frame.width, 612.0);
    }
}
