//! The viewer: one context object holding everything about the open document.
//!
//! [`Viewer::update`] applies a [`Message`] and only ever enqueues renders.
//! [`Viewer::process_render`] performs the in-flight render, shows the page's
//! overlay and promotes the pending request. Hosts call it whenever they are
//! ready for the next frame.

use serde::Serialize;

use crate::annotator::Annotator;
use crate::config::AppConfig;
use crate::document::{LoadedDocument, PrintJob, SavedCopy};
use crate::engine::DocumentEngine;
use crate::handlers;
use crate::message::{DocumentMessage, Message};
use crate::overlay::PageFrame;
use crate::render::{RenderQueue, RenderedPage, render_page};
use crate::session::CursorHint;
use crate::thumbnails::ThumbnailStrip;
use crate::viewport::ViewportState;

/// What the main content area shows.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ContentState {
    /// Welcome screen, no document
    #[default]
    Empty,
    Loading {
        file_name: String,
    },
    Ready,
    Failed {
        message: String,
    },
}

pub struct Viewer<E> {
    document: Option<LoadedDocument<E>>,
    viewport: ViewportState,
    queue: RenderQueue,
    annotator: Annotator,
    thumbnails: ThumbnailStrip,
    content: ContentState,
    cursor: CursorHint,
    /// Where rendered pages sit on screen; only the offset is kept between renders
    frame: PageFrame,
    thumbnail_scale: f32,
    last_render: Option<RenderedPage>,
    last_error: Option<String>,
}

impl<E: DocumentEngine> Default for Viewer<E> {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl<E: DocumentEngine> Viewer<E> {
    pub fn new(config: &AppConfig) -> Self {
        let prefs = &config.preferences;
        Self {
            document: None,
            viewport: ViewportState::new(prefs.zoom_step, prefs.fit_padding),
            queue: RenderQueue::new(),
            annotator: Annotator::new(config.draft_style()),
            thumbnails: ThumbnailStrip::default(),
            content: ContentState::Empty,
            cursor: CursorHint::Default,
            frame: PageFrame::default(),
            thumbnail_scale: prefs.thumbnail_scale,
            last_render: None,
            last_error: None,
        }
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::Document(msg) => self.handle_document(msg),
            Message::Navigation(msg) => {
                if self.require_document("navigation")
                    && handlers::handle_navigation(msg, &mut self.viewport)
                {
                    self.request_render();
                }
            }
            Message::View(msg) => {
                let Some(doc) = self.document.as_ref() else {
                    log::debug!("Ignoring {:?}: no document open", msg);
                    return;
                };
                let page_size = match doc.engine().page_size(self.viewport.page()) {
                    Ok(size) => size,
                    Err(e) => {
                        log::error!("Page size unavailable: {}", e);
                        return;
                    }
                };
                if handlers::handle_view(
                    msg,
                    &mut self.viewport,
                    page_size,
                    &mut self.frame,
                    &mut self.annotator,
                ) {
                    self.request_render();
                }
            }
            Message::Tool(msg) => self.cursor = handlers::handle_tool(msg, &mut self.annotator),
            Message::Pointer(msg) => {
                if self.require_document("pointer input") {
                    handlers::handle_pointer(msg, &mut self.annotator);
                }
            }
            Message::Text(msg) => handlers::handle_text(msg, &mut self.annotator),
            Message::Properties(msg) => handlers::handle_properties(msg, &mut self.annotator),
        }
    }

    fn require_document(&self, what: &str) -> bool {
        if self.document.is_none() {
            log::debug!("Ignoring {}: no document open", what);
        }
        self.document.is_some()
    }

    fn handle_document(&mut self, msg: DocumentMessage) {
        match msg {
            DocumentMessage::Open { file_name, bytes } => self.open_document(file_name, bytes),
            DocumentMessage::Close => {
                self.document = None;
                self.reset_document_state();
                self.content = ContentState::Empty;
                log::info!("📕 Document closed");
            }
        }
    }

    fn reset_document_state(&mut self) {
        self.queue.clear();
        self.annotator.clear();
        self.thumbnails = ThumbnailStrip::default();
        self.last_render = None;
        self.last_error = None;
    }

    fn open_document(&mut self, file_name: String, bytes: Vec<u8>) {
        self.content = ContentState::Loading {
            file_name: file_name.clone(),
        };
        self.document = None;
        self.reset_document_state();

        match LoadedDocument::<E>::open(&file_name, bytes) {
            Ok(doc) => {
                self.viewport.reset(doc.page_count());
                self.thumbnails = ThumbnailStrip::generate(doc.engine(), self.thumbnail_scale);
                self.document = Some(doc);
                self.content = ContentState::Ready;
                self.request_render();
            }
            Err(e) => {
                log::error!("❌ Failed to open {}: {}", file_name, e);
                self.viewport.reset(0);
                self.last_error = Some(e.to_string());
                self.content = ContentState::Failed {
                    message: e.to_string(),
                };
            }
        }
    }

    fn request_render(&mut self) {
        self.queue.request(self.viewport.page());
    }

    /// Perform the in-flight render, if any, and promote the pending one.
    ///
    /// Returns the page that was rendered, or attempted. A failed render is
    /// logged and kept as [`last_error`](Self::last_error); the queue still
    /// advances.
    pub fn process_render(&mut self) -> Option<u32> {
        let page = self.queue.in_flight()?;
        let Some(doc) = self.document.as_ref() else {
            self.queue.clear();
            return None;
        };

        match render_page(
            doc.engine(),
            page,
            self.viewport.scale(),
            self.viewport.rotation(),
        ) {
            Ok(rendered) => {
                let frame = self
                    .frame
                    .resized(rendered.viewport.width, rendered.viewport.height);
                self.frame = frame;
                self.annotator.show_page(page, frame);
                self.thumbnails.set_active(page);
                self.last_render = Some(rendered);
                self.last_error = None;
            }
            Err(e) => {
                log::error!("❌ Failed to render page {}: {}", page, e);
                self.last_error = Some(e.to_string());
            }
        }

        self.queue.finish();
        Some(page)
    }

    /// Process renders until the queue is idle. Returns the pages in order.
    pub fn render_all(&mut self) -> Vec<u32> {
        std::iter::from_fn(|| self.process_render()).collect()
    }

    pub fn document(&self) -> Option<&LoadedDocument<E>> {
        self.document.as_ref()
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn queue(&self) -> &RenderQueue {
        &self.queue
    }

    pub fn annotator(&self) -> &Annotator {
        &self.annotator
    }

    pub fn thumbnails(&self) -> &ThumbnailStrip {
        &self.thumbnails
    }

    pub fn content(&self) -> &ContentState {
        &self.content
    }

    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    pub fn last_render(&self) -> Option<&RenderedPage> {
        self.last_render.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn page_info(&self) -> String {
        self.viewport.page_info()
    }

    pub fn zoom_info(&self) -> String {
        self.viewport.zoom_info()
    }

    /// `"File: name (size)"`, if a document is open.
    pub fn file_info(&self) -> Option<String> {
        self.document.as_ref().map(LoadedDocument::file_info)
    }

    pub fn save_copy(&self) -> Option<SavedCopy> {
        self.document.as_ref().map(LoadedDocument::save_copy)
    }

    pub fn print_job(&self) -> Option<PrintJob> {
        self.document.as_ref().map(LoadedDocument::print_job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fake::{FakeEngine, fake_pdf};
    use crate::message::{NavigationMessage, PointerMessage, TextMessage, ToolMessage, ViewMessage};
    use crate::model::{Point, Tool};
    use crate::viewport::Rotation;

    fn open(pages: u32) -> Viewer<FakeEngine> {
        let mut viewer = Viewer::<FakeEngine>::default();
        viewer.update(Message::open("test.pdf", fake_pdf(pages)));
        viewer
    }

    fn rasterized(viewer: &Viewer<FakeEngine>) -> Vec<u32> {
        viewer.document().unwrap().engine().rasterized()
    }

    fn highlight(viewer: &mut Viewer<FakeEngine>) {
        viewer.update(Message::Tool(ToolMessage::Select(Some(Tool::Highlight))));
        viewer.update(PointerMessage::Down(Point::new(10.0, 10.0)).into());
        viewer.update(PointerMessage::Move(Point::new(80.0, 60.0)).into());
        viewer.update(PointerMessage::Up.into());
    }

    #[test]
    fn test_open_renders_first_page() {
        let mut viewer = open(5);
        assert_eq!(viewer.content(), &ContentState::Ready);
        assert_eq!(viewer.page_info(), "1 / 5");
        assert_eq!(viewer.render_all(), vec![1]);
        assert_eq!(viewer.thumbnails().len(), 5);
        assert_eq!(
            viewer.file_info().unwrap(),
            format!("File: test.pdf ({} Bytes)", fake_pdf(5).len())
        );

        let frame = viewer.annotator().overlay().frame;
        assert_eq!((frame.width, frame.height), (600.0, 800.0));
    }

    #[test]
    fn test_rapid_navigation_renders_first_and_last() {
        let mut viewer = open(5);
        viewer.render_all();

        viewer.update(NavigationMessage::NextPage.into());
        viewer.update(NavigationMessage::NextPage.into());
        viewer.update(NavigationMessage::NextPage.into());
        assert_eq!(viewer.queue().in_flight(), Some(2));
        assert_eq!(viewer.queue().pending(), Some(4));

        assert_eq!(viewer.render_all(), vec![2, 4]);
        assert_eq!(rasterized(&viewer)[6..], [2, 4]);
        assert_eq!(viewer.annotator().page(), 4);
        assert_eq!(viewer.thumbnails().active(), Some(4));
    }

    #[test]
    fn test_render_uses_state_at_render_time() {
        let mut viewer = open(2);
        viewer.update(ViewMessage::ZoomIn.into());
        viewer.update(ViewMessage::RotateCw.into());
        viewer.render_all();
        let rendered = viewer.last_render().unwrap();
        assert_eq!(rendered.viewport.rotation, Rotation::Deg90);
        assert_eq!(rendered.bitmap.dimensions(), (960, 720));
        assert_eq!(viewer.zoom_info(), "Zoom: 120%");
    }

    #[test]
    fn test_fit_width() {
        let mut viewer = open(1);
        viewer.update(
            ViewMessage::FitWidth {
                container_width: 1240.0,
            }
            .into(),
        );
        assert!((viewer.viewport().scale() - 2.0).abs() < 1e-6);
        viewer.update(
            ViewMessage::FitPage {
                container_width: 1240.0,
                container_height: 440.0,
            }
            .into(),
        );
        assert!((viewer.viewport().scale() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_reopen_resets_view_and_annotations() {
        let mut viewer = open(3);
        viewer.render_all();
        highlight(&mut viewer);
        assert_eq!(viewer.annotator().store().len(), 1);

        viewer.update(NavigationMessage::GoToPage(3).into());
        viewer.update(ViewMessage::ZoomIn.into());
        viewer.update(ViewMessage::RotateCcw.into());
        viewer.render_all();

        viewer.update(Message::open("other.pdf", fake_pdf(2)));
        assert_eq!(viewer.page_info(), "1 / 2");
        assert_eq!(viewer.viewport().scale(), 1.0);
        assert_eq!(viewer.viewport().rotation(), Rotation::Deg0);
        assert!(viewer.annotator().store().is_empty());
        assert_eq!(viewer.render_all(), vec![1]);
    }

    #[test]
    fn test_failed_open_drops_previous_document() {
        let mut viewer = open(3);
        viewer.update(Message::open("notes.txt", b"plain text".to_vec()));
        assert!(viewer.document().is_none());
        assert!(matches!(viewer.content(), ContentState::Failed { .. }));
        assert!(viewer.last_error().is_some());

        // Viewport operations without a document are ignored
        viewer.update(NavigationMessage::NextPage.into());
        viewer.update(ViewMessage::ZoomIn.into());
        assert_eq!(viewer.process_render(), None);
        assert_eq!(viewer.viewport().scale(), 1.0);
    }

    #[test]
    fn test_render_failure_still_advances_queue() {
        let mut viewer = Viewer::<FakeEngine>::default();
        viewer.update(Message::open("b.pdf", b"%PDF-fake pages=3 broken=2".to_vec()));
        viewer.render_all();

        viewer.update(NavigationMessage::NextPage.into());
        viewer.update(NavigationMessage::NextPage.into());
        assert_eq!(viewer.process_render(), Some(2));
        assert!(viewer.last_error().unwrap().contains("broken"));
        assert_eq!(viewer.process_render(), Some(3));
        assert!(viewer.last_error().is_none());
        assert_eq!(viewer.annotator().page(), 3);
    }

    #[test]
    fn test_annotations_drawn_on_displayed_page() {
        let mut viewer = open(2);
        viewer.render_all();
        highlight(&mut viewer);
        viewer.update(NavigationMessage::NextPage.into());
        viewer.render_all();
        assert!(viewer.annotator().overlay().items.is_empty());

        viewer.update(NavigationMessage::PrevPage.into());
        viewer.render_all();
        assert_eq!(viewer.annotator().overlay().items.len(), 1);
        assert_eq!(viewer.cursor(), CursorHint::Crosshair);
    }

    #[test]
    fn test_empty_text_commit_is_discarded() {
        let mut viewer = open(1);
        viewer.render_all();
        viewer.update(Message::Tool(ToolMessage::Select(Some(Tool::Text))));
        viewer.update(PointerMessage::Down(Point::new(5.0, 5.0)).into());
        viewer.update(TextMessage::Input("  \n ".into()).into());
        viewer.update(TextMessage::Commit { measured: None }.into());
        assert!(viewer.annotator().store().is_empty());
    }

    #[test]
    fn test_navigation_keeps_note_being_typed() {
        let mut viewer = open(2);
        viewer.render_all();
        viewer.update(Message::Tool(ToolMessage::Select(Some(Tool::Text))));
        viewer.update(PointerMessage::Down(Point::new(5.0, 5.0)).into());
        viewer.update(TextMessage::Input("keep me".into()).into());

        viewer.update(NavigationMessage::NextPage.into());
        viewer.render_all();
        assert_eq!(viewer.annotator().store().page(1).len(), 1);
        assert!(viewer.annotator().store().page(2).is_empty());
    }

    #[test]
    fn test_frame_offset_survives_render() {
        let mut viewer = open(2);
        viewer.render_all();
        viewer.update(
            ViewMessage::FrameMoved {
                left: 20.0,
                top: 30.0,
            }
            .into(),
        );
        viewer.update(ViewMessage::ZoomOut.into());
        viewer.render_all();
        let frame = viewer.annotator().overlay().frame;
        assert_eq!((frame.left, frame.top), (20.0, 30.0));
        assert!((frame.width - 500.0).abs() < 1e-3);
    }

    #[test]
    fn test_save_copy_and_close() {
        let mut viewer = open(1);
        let copy = viewer.save_copy().unwrap();
        assert_eq!(copy.file_name, "modified_test.pdf");
        assert_eq!(copy.bytes, fake_pdf(1));

        viewer.update(Message::Document(DocumentMessage::Close));
        assert!(viewer.save_copy().is_none());
        assert_eq!(viewer.content(), &ContentState::Empty);
    }
}
