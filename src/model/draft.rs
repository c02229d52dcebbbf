//! Annotations that are still being drawn.
//!
//! A [`Draft`] is a separate type from [`Annotation`] so a half-formed drag can
//! never end up in the store. The only way across is [`Draft::finish`], which
//! applies the persistence thresholds.

use std::fmt::Write as _;

use crate::color_utils::Color;
use crate::constants::{style, text, threshold};
use crate::model::annotation::{
    Annotation, BoundingBox, DrawAnnotation, HighlightAnnotation, Point, ShapeAnnotation,
    ShapeKind, TextAnnotation, Tool,
};

/// Style values a new draft starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftStyle {
    pub color: Color,
    pub font_size: u32,
    pub font_family: String,
    pub highlight_opacity: f32,
    pub draw_line_width: u8,
    pub shape_kind: ShapeKind,
    pub shape_line_width: u8,
    pub shape_fill: bool,
}

impl Default for DraftStyle {
    fn default() -> Self {
        Self {
            color: Color::RED,
            font_size: text::DEFAULT_FONT_SIZE,
            font_family: text::DEFAULT_FONT_FAMILY.to_string(),
            highlight_opacity: style::DEFAULT_HIGHLIGHT_OPACITY,
            draw_line_width: style::DEFAULT_LINE_WIDTH,
            shape_kind: ShapeKind::default(),
            shape_line_width: style::DEFAULT_LINE_WIDTH,
            shape_fill: false,
        }
    }
}

/// Text being typed into an editor box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraft {
    pub anchor: Point,
    pub content: String,
    pub color: Color,
    pub font_size: u32,
    pub font_family: String,
    /// Box size reported by the host once the editor is laid out
    pub measured: Option<(f32, f32)>,
    /// Store index being re-edited, if this editor replaces an existing note
    pub replaces: Option<usize>,
}

impl TextDraft {
    pub fn new(anchor: Point, style: &DraftStyle) -> Self {
        Self {
            anchor,
            content: String::new(),
            color: style.color,
            font_size: style.font_size,
            font_family: style.font_family.clone(),
            measured: None,
            replaces: None,
        }
    }

    /// Reopen a committed note for editing at the same anchor with the same style.
    pub fn reopen(existing: &TextAnnotation, index: usize) -> Self {
        Self {
            anchor: existing.anchor,
            content: existing.text.clone(),
            color: existing.color,
            font_size: existing.font_size,
            font_family: existing.font_family.clone(),
            measured: Some((existing.width, existing.height)),
            replaces: Some(index),
        }
    }

    /// Size used when the host didn't measure the editor.
    pub fn estimated_size(&self) -> (f32, f32) {
        let font = self.font_size as f32;
        let lines = self.content.trim().lines().count().max(1) as f32;
        let longest = self
            .content
            .trim()
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0) as f32;

        let width = longest * font * text::GLYPH_ADVANCE + 2.0 * text::BOX_PADDING;
        let height = lines * font * text::LINE_HEIGHT + 2.0 * text::BOX_PADDING;
        (width.max(text::MIN_BOX_WIDTH), height.max(text::MIN_BOX_HEIGHT))
    }

    fn finish(self) -> Option<TextAnnotation> {
        let trimmed = self.content.trim();
        if trimmed.is_empty() {
            return None;
        }
        let (width, height) = self.measured.unwrap_or_else(|| self.estimated_size());
        Some(TextAnnotation {
            anchor: self.anchor,
            width,
            height,
            text: trimmed.to_string(),
            color: self.color,
            font_size: self.font_size,
            font_family: self.font_family,
        })
    }
}

/// Highlight rectangle being dragged out.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightDraft {
    anchor: Point,
    pub bounds: BoundingBox,
    pub color: Color,
    pub opacity: f32,
}

/// Freehand stroke being drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawDraft {
    points: Vec<Point>,
    path: String,
    pub color: Color,
    pub line_width: u8,
}

impl DrawDraft {
    fn new(start: Point, color: Color, line_width: u8) -> Self {
        Self {
            points: vec![start],
            path: format!("M{},{}", start.x, start.y),
            color,
            line_width,
        }
    }

    fn push(&mut self, point: Point) {
        self.points.push(point);
        let _ = write!(self.path, " L{},{}", point.x, point.y);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// SVG path data accumulated so far (`M x,y L x,y ...`).
    pub fn path_data(&self) -> &str {
        &self.path
    }
}

/// Shape being dragged out.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDraft {
    anchor: Point,
    pub bounds: BoundingBox,
    pub kind: ShapeKind,
    pub color: Color,
    pub line_width: u8,
    pub fill: bool,
}

/// The single in-progress annotation of a draw session.
#[derive(Debug, Clone, PartialEq)]
pub enum Draft {
    Text(TextDraft),
    Highlight(HighlightDraft),
    Draw(DrawDraft),
    Shape(ShapeDraft),
}

impl Draft {
    /// Start a draft for `tool` anchored at `point`.
    pub fn start(tool: Tool, point: Point, style: &DraftStyle) -> Self {
        match tool {
            Tool::Text => Draft::Text(TextDraft::new(point, style)),
            Tool::Highlight => Draft::Highlight(HighlightDraft {
                anchor: point,
                bounds: BoundingBox::at(point),
                color: style.color,
                opacity: style.highlight_opacity,
            }),
            Tool::Draw => Draft::Draw(DrawDraft::new(point, style.color, style.draw_line_width)),
            Tool::Shape => Draft::Shape(ShapeDraft {
                anchor: point,
                bounds: BoundingBox::at(point),
                kind: style.shape_kind,
                color: style.color,
                line_width: style.shape_line_width,
                fill: style.shape_fill,
            }),
        }
    }

    pub fn tool(&self) -> Tool {
        match self {
            Draft::Text(_) => Tool::Text,
            Draft::Highlight(_) => Tool::Highlight,
            Draft::Draw(_) => Tool::Draw,
            Draft::Shape(_) => Tool::Shape,
        }
    }

    /// Track the pointer while dragging.
    ///
    /// Boxes are recomputed from the anchor so the origin flips to whichever
    /// corner is top-left. Strokes append the point. Text ignores movement.
    pub fn update(&mut self, point: Point) {
        match self {
            Draft::Highlight(d) => d.bounds = BoundingBox::from_corners(d.anchor, point),
            Draft::Shape(d) => d.bounds = BoundingBox::from_corners(d.anchor, point),
            Draft::Draw(d) => d.push(point),
            Draft::Text(_) => {}
        }
    }

    pub fn set_color(&mut self, color: Color) {
        match self {
            Draft::Text(d) => d.color = color,
            Draft::Highlight(d) => d.color = color,
            Draft::Draw(d) => d.color = color,
            Draft::Shape(d) => d.color = color,
        }
    }

    /// Convert into a committed annotation if the draft meets its threshold.
    pub fn finish(self) -> Option<Annotation> {
        match self {
            Draft::Text(d) => d.finish().map(Annotation::Text),
            Draft::Highlight(d) => d.bounds.exceeds(threshold::MIN_BOX_SIZE).then(|| {
                Annotation::Highlight(HighlightAnnotation {
                    bounds: d.bounds,
                    color: d.color,
                    opacity: d.opacity,
                })
            }),
            Draft::Draw(d) => {
                DrawAnnotation::new(d.points, d.color, d.line_width).map(Annotation::Draw)
            }
            Draft::Shape(d) => d.bounds.exceeds(threshold::MIN_BOX_SIZE).then(|| {
                Annotation::Shape(ShapeAnnotation {
                    bounds: d.bounds,
                    kind: d.kind,
                    color: d.color,
                    line_width: d.line_width,
                    fill: d.fill,
                })
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(tool: Tool, from: Point, moves: &[Point]) -> Draft {
        let mut draft = Draft::start(tool, from, &DraftStyle::default());
        for p in moves {
            draft.update(*p);
        }
        draft
    }

    #[test]
    fn test_highlight_normalizes_in_every_direction() {
        let start = Point::new(100.0, 100.0);
        for end in [
            Point::new(150.0, 140.0),
            Point::new(50.0, 140.0),
            Point::new(150.0, 60.0),
            Point::new(50.0, 60.0),
        ] {
            let Some(Annotation::Highlight(h)) = drag(Tool::Highlight, start, &[end]).finish()
            else {
                panic!("Expected highlight");
            };
            assert!(h.bounds.width >= 0.0 && h.bounds.height >= 0.0);
            assert_eq!(h.bounds.x, start.x.min(end.x));
            assert_eq!(h.bounds.y, start.y.min(end.y));
        }
    }

    #[test]
    fn test_box_follows_last_pointer_not_flipped_origin() {
        // Crossing back over the anchor must not drift the anchor.
        let draft = drag(
            Tool::Shape,
            Point::new(100.0, 100.0),
            &[Point::new(40.0, 40.0), Point::new(130.0, 120.0)],
        );
        let Some(Annotation::Shape(s)) = draft.finish() else {
            panic!("Expected shape");
        };
        assert_eq!(
            s.bounds,
            BoundingBox {
                x: 100.0,
                y: 100.0,
                width: 30.0,
                height: 20.0,
            }
        );
    }

    #[test]
    fn test_small_boxes_are_discarded() {
        let start = Point::new(10.0, 10.0);
        assert!(drag(Tool::Highlight, start, &[Point::new(15.0, 50.0)]).finish().is_none());
        assert!(drag(Tool::Shape, start, &[Point::new(50.0, 15.0)]).finish().is_none());
        assert!(drag(Tool::Shape, start, &[]).finish().is_none());
        assert!(drag(Tool::Shape, start, &[Point::new(15.1, 15.1)]).finish().is_some());
    }

    #[test]
    fn test_stroke_needs_two_points_and_keeps_order() {
        assert!(drag(Tool::Draw, Point::new(1.0, 1.0), &[]).finish().is_none());

        let moves = [Point::new(2.0, 3.0), Point::new(4.5, 1.0)];
        let draft = drag(Tool::Draw, Point::new(1.0, 1.0), &moves);
        let Draft::Draw(d) = &draft else {
            panic!("Expected draw draft");
        };
        assert_eq!(d.path_data(), "M1,1 L2,3 L4.5,1");

        let Some(Annotation::Draw(stroke)) = draft.finish() else {
            panic!("Expected stroke");
        };
        assert_eq!(
            stroke.points(),
            &[Point::new(1.0, 1.0), Point::new(2.0, 3.0), Point::new(4.5, 1.0)]
        );
    }

    #[test]
    fn test_text_draft_trims_and_discards_empty() {
        let mut text = TextDraft::new(Point::new(5.0, 5.0), &DraftStyle::default());
        text.content = "   \n ".into();
        assert!(Draft::Text(text.clone()).finish().is_none());

        text.content = "  hello  ".into();
        let Some(Annotation::Text(note)) = Draft::Text(text).finish() else {
            panic!("Expected text");
        };
        assert_eq!(note.text, "hello");
        assert_eq!((note.width, note.height), (100.0, 30.0));
    }

    #[test]
    fn test_text_estimate_grows_with_content() {
        let mut text = TextDraft::new(Point::default(), &DraftStyle::default());
        text.content = "a much longer line of text than fits\nsecond\nthird".into();
        let (width, height) = text.estimated_size();
        assert!(width > 100.0);
        assert!(height > 30.0);
    }

    #[test]
    fn test_draft_uses_style() {
        let style = DraftStyle {
            color: Color::rgb(0, 0, 255),
            shape_kind: ShapeKind::Ellipse,
            shape_fill: true,
            ..DraftStyle::default()
        };
        let Draft::Shape(shape) = Draft::start(Tool::Shape, Point::default(), &style) else {
            panic!("Expected shape draft");
        };
        assert_eq!(shape.kind, ShapeKind::Ellipse);
        assert!(shape.fill);
        assert_eq!(shape.color, Color::rgb(0, 0, 255));
    }
}
