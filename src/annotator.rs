//! Annotator: the engine-independent half of the viewer.
//!
//! Owns the annotation store, the draw session, the properties panel and the
//! overlay of the page on screen. Pointer coordinates are page-relative pixels.

use crate::model::{Annotation, DraftStyle, Point, Tool};
use crate::overlay::{Overlay, PageFrame, build_overlay};
use crate::properties::{Applied, PropertiesPanel, PropertyChange};
use crate::session::{CursorHint, DragEnd, DrawSession, PointerDown, SessionState, TextCommit};
use crate::store::AnnotationStore;

#[derive(Debug, Clone, Default)]
pub struct Annotator {
    store: AnnotationStore,
    session: DrawSession,
    properties: PropertiesPanel,
    page: u32,
    overlay: Overlay,
}

impl Annotator {
    pub fn new(defaults: DraftStyle) -> Self {
        Self {
            properties: PropertiesPanel::new(defaults),
            page: 1,
            ..Self::default()
        }
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn session(&self) -> &DrawSession {
        &self.session
    }

    pub fn properties(&self) -> &PropertiesPanel {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertiesPanel {
        &mut self.properties
    }

    /// Page the overlay currently shows.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Switch to a freshly rendered page and rebuild its overlay.
    ///
    /// An open editor loses focus and is committed to the page it was typed
    /// on. A drag in progress belongs to the previous render and is dropped.
    pub fn show_page(&mut self, page: u32, frame: PageFrame) {
        self.blur_editor();
        if self.session.draft().is_some() {
            self.session.reset();
        }
        self.page = page;
        self.overlay = build_overlay(self.store.page(page), frame);
        self.store.clear_dirty();
    }

    /// Move the overlay, e.g. after the container scrolled or resized.
    pub fn set_frame(&mut self, frame: PageFrame) {
        self.overlay.frame = frame;
    }

    /// Drop every annotation and draft, for a newly opened document.
    pub fn clear(&mut self) {
        self.store.clear();
        self.session.reset();
        self.page = 1;
        self.refresh();
    }

    pub fn select_tool(&mut self, tool: Option<Tool>) -> CursorHint {
        self.blur_editor();
        let cursor = self.session.select_tool(tool);
        self.properties.show_for_tool(tool);
        self.refresh();
        cursor
    }

    pub fn pointer_down(&mut self, point: Point) -> PointerDown {
        self.blur_editor();
        let result = self.session.pointer_down(point, &self.properties.draft_style());
        self.refresh();
        result
    }

    pub fn pointer_move(&mut self, point: Point) -> bool {
        let moved = self.session.pointer_move(point).is_some();
        if moved {
            self.overlay.set_preview(self.session.preview());
        }
        moved
    }

    pub fn pointer_up(&mut self) -> DragEnd {
        let end = self.session.pointer_up();
        self.store_drag_end(&end);
        end
    }

    pub fn pointer_leave(&mut self) -> DragEnd {
        let end = self.session.pointer_leave();
        self.store_drag_end(&end);
        end
    }

    fn store_drag_end(&mut self, end: &DragEnd) {
        if let DragEnd::Committed(annotation) = end {
            self.store.add(self.page, annotation.clone());
        }
        self.refresh();
    }

    /// Update the open editor as the user types.
    pub fn text_input(&mut self, content: &str) {
        if self.session.set_text(content).is_some() {
            self.overlay.set_preview(self.session.preview());
        }
    }

    /// Close the editor, keeping its content.
    ///
    /// A new note is appended, a re-edited note is replaced in place, and a
    /// re-edited note emptied of text is removed.
    pub fn commit_text(&mut self, measured: Option<(f32, f32)>) -> Option<TextCommit> {
        let commit = self.session.commit_text(measured)?;
        match (&commit.annotation, commit.replaces) {
            (Some(note), None) => {
                self.store.add(self.page, note.clone());
            }
            (Some(note), Some(index)) => {
                if self.store.replace(self.page, index, note.clone()).is_none() {
                    log::warn!("Re-edited note {} is gone, adding it again", index);
                    self.store.add(self.page, note.clone());
                }
            }
            (None, Some(index)) => {
                self.store.remove(self.page, index);
                log::debug!("🗑️ Removed emptied note {}", index);
            }
            (None, None) => {}
        }
        self.refresh();
        Some(commit)
    }

    pub fn cancel_text(&mut self) -> bool {
        let cancelled = self.session.cancel_text();
        self.refresh();
        cancelled
    }

    /// Reopen the text note at `index` on `page` for editing.
    ///
    /// Only notes on the page currently shown can be edited. Any editor that
    /// is already open is committed first.
    pub fn edit_text(&mut self, page: u32, index: usize) -> bool {
        if page != self.page {
            log::debug!("Ignoring edit on page {} while showing {}", page, self.page);
            return false;
        }
        self.blur_editor();
        let Some(note) = self.store.get(page, index).and_then(Annotation::as_text).cloned() else {
            return false;
        };
        self.session.edit_text(&note, index);
        self.refresh();
        true
    }

    /// Reopen the topmost note under `point`, as on double-click.
    pub fn edit_text_at(&mut self, point: Point) -> bool {
        self.blur_editor();
        match self.store.text_at(self.page, point) {
            Some(index) => self.edit_text(self.page, index),
            None => false,
        }
    }

    pub fn apply_property(&mut self, change: PropertyChange) -> Applied {
        let applied = self.properties.apply(change, &mut self.session);
        if applied == Applied::Draft {
            self.overlay.set_preview(self.session.preview());
        }
        applied
    }

    /// Focus moved away from an open editor, which commits it.
    fn blur_editor(&mut self) {
        if self.session.state() == SessionState::Editing {
            self.commit_text(None);
        }
    }

    /// Rebuild the overlay if the store changed, and refresh the preview.
    fn refresh(&mut self) {
        if self.store.is_dirty() {
            self.overlay = build_overlay(self.store.page(self.page), self.overlay.frame);
            self.store.clear_dirty();
        }
        self.overlay.set_preview(self.session.preview());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShapeKind;
    use crate::overlay::OverlayElement;

    fn annotator() -> Annotator {
        let mut annotator = Annotator::new(DraftStyle::default());
        annotator.show_page(1, PageFrame::new(0.0, 0.0, 600.0, 800.0));
        annotator
    }

    fn drag(annotator: &mut Annotator, from: (f32, f32), to: (f32, f32)) -> DragEnd {
        annotator.pointer_down(Point::new(from.0, from.1));
        annotator.pointer_move(Point::new(to.0, to.1));
        annotator.pointer_up()
    }

    fn type_note(annotator: &mut Annotator, at: (f32, f32), text: &str) {
        annotator.pointer_down(Point::new(at.0, at.1));
        annotator.text_input(text);
        annotator.commit_text(Some((120.0, 30.0)));
    }

    #[test]
    fn test_drag_commits_to_current_page() {
        let mut annotator = annotator();
        annotator.select_tool(Some(Tool::Highlight));
        assert!(matches!(drag(&mut annotator, (10.0, 10.0), (60.0, 40.0)), DragEnd::Committed(_)));
        assert_eq!(annotator.store().page(1).len(), 1);
        assert_eq!(annotator.overlay().items.len(), 1);
        assert!(annotator.overlay().preview.is_none());
    }

    #[test]
    fn test_small_drag_is_not_stored() {
        let mut annotator = annotator();
        annotator.select_tool(Some(Tool::Shape));
        assert_eq!(drag(&mut annotator, (10.0, 10.0), (14.0, 90.0)), DragEnd::Discarded);
        assert!(annotator.store().is_empty());
    }

    #[test]
    fn test_preview_follows_drag() {
        let mut annotator = annotator();
        annotator.select_tool(Some(Tool::Draw));
        annotator.pointer_down(Point::new(0.0, 0.0));
        annotator.pointer_move(Point::new(3.0, 4.0));
        let Some(preview) = &annotator.overlay().preview else {
            panic!("Expected preview while drawing");
        };
        let OverlayElement::Stroke { path, .. } = &preview.element else {
            panic!("Expected stroke preview");
        };
        assert_eq!(path, "M0,0 L3,4");
    }

    #[test]
    fn test_text_note_and_reedit_in_place() {
        let mut annotator = annotator();
        annotator.select_tool(Some(Tool::Highlight));
        drag(&mut annotator, (0.0, 0.0), (300.0, 300.0));

        annotator.select_tool(Some(Tool::Text));
        type_note(&mut annotator, (50.0, 50.0), "first");
        assert_eq!(annotator.store().page(1).len(), 2);

        assert!(annotator.edit_text_at(Point::new(60.0, 60.0)));
        annotator.text_input("second");
        annotator.commit_text(None);

        let page = annotator.store().page(1);
        assert_eq!(page.len(), 2);
        assert_eq!(page[1].as_text().unwrap().text, "second");
        assert_eq!(page[1].as_text().unwrap().anchor, Point::new(50.0, 50.0));
    }

    #[test]
    fn test_emptied_reedit_removes_note() {
        let mut annotator = annotator();
        annotator.select_tool(Some(Tool::Text));
        type_note(&mut annotator, (50.0, 50.0), "gone soon");
        assert!(annotator.edit_text(1, 0));
        annotator.text_input("   ");
        annotator.commit_text(None);
        assert!(annotator.store().is_empty());
    }

    #[test]
    fn test_cancelled_reedit_keeps_original() {
        let mut annotator = annotator();
        annotator.select_tool(Some(Tool::Text));
        type_note(&mut annotator, (50.0, 50.0), "keep me");
        assert!(annotator.edit_text(1, 0));
        annotator.text_input("changed");
        assert!(annotator.cancel_text());
        assert_eq!(annotator.store().page(1)[0].as_text().unwrap().text, "keep me");
        assert!(!annotator.edit_text(2, 0));
    }

    #[test]
    fn test_click_elsewhere_commits_open_editor() {
        let mut annotator = annotator();
        annotator.select_tool(Some(Tool::Text));
        annotator.pointer_down(Point::new(10.0, 10.0));
        annotator.text_input("one");
        let down = annotator.pointer_down(Point::new(300.0, 300.0));
        assert!(matches!(down, PointerDown::EditorOpened(_)));
        assert_eq!(annotator.store().page(1).len(), 1);
    }

    #[test]
    fn test_tool_switch_commits_open_editor() {
        let mut annotator = annotator();
        annotator.select_tool(Some(Tool::Text));
        annotator.pointer_down(Point::new(10.0, 10.0));
        annotator.text_input("typed note");
        annotator.select_tool(Some(Tool::Highlight));

        assert_eq!(annotator.store().len(), 1);
        assert_eq!(annotator.store().page(1)[0].as_text().unwrap().text, "typed note");
        assert!(annotator.session().draft().is_none());
    }

    #[test]
    fn test_page_change_commits_open_editor_to_its_page() {
        let mut annotator = annotator();
        annotator.select_tool(Some(Tool::Text));
        annotator.pointer_down(Point::new(10.0, 10.0));
        annotator.text_input("typed note");
        annotator.show_page(2, PageFrame::new(0.0, 0.0, 600.0, 800.0));

        assert_eq!(annotator.store().page(1).len(), 1);
        assert!(annotator.store().page(2).is_empty());
        assert!(annotator.overlay().items.is_empty());
        assert!(annotator.session().draft().is_none());
    }

    #[test]
    fn test_page_change_drops_drag_in_progress() {
        let mut annotator = annotator();
        annotator.select_tool(Some(Tool::Highlight));
        annotator.pointer_down(Point::new(0.0, 0.0));
        annotator.pointer_move(Point::new(50.0, 50.0));
        annotator.show_page(2, PageFrame::new(0.0, 0.0, 600.0, 800.0));
        assert!(annotator.store().is_empty());
        assert!(!annotator.session().is_dragging());
    }

    #[test]
    fn test_property_change_reaches_preview() {
        let mut annotator = annotator();
        annotator.select_tool(Some(Tool::Shape));
        annotator.pointer_down(Point::new(0.0, 0.0));
        annotator.pointer_move(Point::new(40.0, 20.0));
        assert_eq!(
            annotator.apply_property(PropertyChange::ShapeKind(ShapeKind::Line)),
            Applied::Draft
        );
        let Some(preview) = &annotator.overlay().preview else {
            panic!("Expected preview");
        };
        assert!(matches!(
            preview.element,
            OverlayElement::Shape { primitive: crate::overlay::ShapePrimitive::Line { .. }, .. }
        ));
    }

    #[test]
    fn test_annotations_stay_on_their_page() {
        let mut annotator = annotator();
        annotator.select_tool(Some(Tool::Highlight));
        drag(&mut annotator, (0.0, 0.0), (50.0, 50.0));

        annotator.show_page(2, PageFrame::new(0.0, 0.0, 600.0, 800.0));
        assert!(annotator.overlay().items.is_empty());
        drag(&mut annotator, (0.0, 0.0), (50.0, 50.0));
        drag(&mut annotator, (0.0, 0.0), (50.0, 50.0));
        assert_eq!(annotator.store().page(2).len(), 2);

        annotator.show_page(1, PageFrame::new(0.0, 0.0, 600.0, 800.0));
        assert_eq!(annotator.overlay().items.len(), 1);

        annotator.clear();
        assert!(annotator.store().is_empty());
        assert!(annotator.overlay().items.is_empty());
    }
}
