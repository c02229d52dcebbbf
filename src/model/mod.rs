//! Annotation data model: committed annotations and in-progress drafts.

mod annotation;
mod draft;

pub use annotation::{
    Annotation, BoundingBox, DrawAnnotation, HighlightAnnotation, Point, ShapeAnnotation,
    ShapeKind, TextAnnotation, Tool,
};
pub use draft::{Draft, DraftStyle, DrawDraft, HighlightDraft, ShapeDraft, TextDraft};
