//! Browser bindings.
//!
//! pdf.js stays in JavaScript and does the parsing and rasterizing. The
//! [`WebViewer`] owns everything else: it decides which page to render next
//! and hands back the annotation overlay as SVG or JSON.
//!
//! Methods that can start a render return the page JavaScript should render
//! now, or `undefined` when a render is already in flight. JavaScript reports
//! back with [`WebViewer::render_finished`] or [`WebViewer::render_failed`].

use wasm_bindgen::prelude::*;

use crate::annotator::Annotator;
use crate::color_utils::Color;
use crate::config::AppConfig;
use crate::engine::PageSize;
use crate::handlers;
use crate::logging;
use crate::message::{
    NavigationMessage, PointerMessage, PropertiesMessage, TextMessage, ToolMessage, ViewMessage,
};
use crate::model::{Point, ShapeKind, Tool};
use crate::overlay::PageFrame;
use crate::properties::{Applied, PropertyChange};
use crate::render::RenderQueue;
use crate::viewport::ViewportState;

#[wasm_bindgen(start)]
pub fn start() {
    let config = AppConfig::load_or_default();
    logging::init(config.preferences.log_level);
    log::info!("pdfmark {} starting", env!("CARGO_PKG_VERSION"));
}

/// `"0 Bytes"`, `"1.5 KB"`, ...
#[wasm_bindgen(js_name = formatFileSize)]
pub fn format_file_size(bytes: f64) -> String {
    crate::document::format_file_size(bytes.max(0.0) as u64)
}

/// True if the file is named like a PDF or starts with the PDF magic bytes.
#[wasm_bindgen(js_name = isPdf)]
pub fn is_pdf(file_name: &str, bytes: &[u8]) -> bool {
    crate::document::is_pdf(file_name, bytes)
}

fn parse_name<T: serde::de::DeserializeOwned>(name: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(name.to_string())).ok()
}

#[wasm_bindgen]
pub struct WebViewer {
    config: AppConfig,
    annotator: Annotator,
    viewport: ViewportState,
    queue: RenderQueue,
    frame: PageFrame,
}

impl Default for WebViewer {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WebViewer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let config = AppConfig::load_or_default();
        let prefs = &config.preferences;
        Self {
            annotator: Annotator::new(config.draft_style()),
            viewport: ViewportState::new(prefs.zoom_step, prefs.fit_padding),
            queue: RenderQueue::new(),
            frame: PageFrame::default(),
            config,
        }
    }

    fn request_render(&mut self) -> Option<u32> {
        self.queue.request(self.viewport.page())
    }

    /// A new document was loaded by pdf.js. Returns the first page to render.
    #[wasm_bindgen(js_name = documentLoaded)]
    pub fn document_loaded(&mut self, page_count: u32) -> Option<u32> {
        self.queue.clear();
        self.annotator.clear();
        self.viewport.reset(page_count);
        log::info!("📂 Document loaded ({} pages)", page_count);
        self.request_render()
    }

    /// The in-flight render completed at the given pixel size.
    ///
    /// Shows the page's overlay and returns the next page to render, if one
    /// was queued meanwhile.
    #[wasm_bindgen(js_name = renderFinished)]
    pub fn render_finished(&mut self, width: f32, height: f32) -> Option<u32> {
        if let Some(page) = self.queue.in_flight() {
            self.frame = self.frame.resized(width, height);
            self.annotator.show_page(page, self.frame);
        }
        self.queue.finish()
    }

    /// The in-flight render failed. Returns the next page to render, if any.
    #[wasm_bindgen(js_name = renderFailed)]
    pub fn render_failed(&mut self, message: &str) -> Option<u32> {
        log::error!("❌ Failed to render page {:?}: {}", self.queue.in_flight(), message);
        self.queue.finish()
    }

    pub fn page(&self) -> u32 {
        self.viewport.page()
    }

    #[wasm_bindgen(js_name = pageCount)]
    pub fn page_count(&self) -> u32 {
        self.viewport.page_count()
    }

    pub fn scale(&self) -> f32 {
        self.viewport.scale()
    }

    /// Rotation in degrees.
    pub fn rotation(&self) -> u16 {
        self.viewport.rotation().degrees()
    }

    #[wasm_bindgen(js_name = pageInfo)]
    pub fn page_info(&self) -> String {
        self.viewport.page_info()
    }

    #[wasm_bindgen(js_name = zoomInfo)]
    pub fn zoom_info(&self) -> String {
        self.viewport.zoom_info()
    }

    fn navigate(&mut self, msg: NavigationMessage) -> Option<u32> {
        if handlers::handle_navigation(msg, &mut self.viewport) {
            self.request_render()
        } else {
            None
        }
    }

    #[wasm_bindgen(js_name = prevPage)]
    pub fn prev_page(&mut self) -> Option<u32> {
        self.navigate(NavigationMessage::PrevPage)
    }

    #[wasm_bindgen(js_name = nextPage)]
    pub fn next_page(&mut self) -> Option<u32> {
        self.navigate(NavigationMessage::NextPage)
    }

    #[wasm_bindgen(js_name = goToPage)]
    pub fn go_to_page(&mut self, page: u32) -> Option<u32> {
        self.navigate(NavigationMessage::GoToPage(page))
    }

    /// `page_width` and `page_height` are the unscaled size of the current
    /// page as reported by pdf.js.
    fn view(&mut self, msg: ViewMessage, page_width: f32, page_height: f32) -> Option<u32> {
        if self.viewport.page_count() == 0 {
            log::debug!("Ignoring {:?}: no document open", msg);
            return None;
        }
        let page_size = PageSize {
            width: page_width,
            height: page_height,
        };
        if handlers::handle_view(
            msg,
            &mut self.viewport,
            page_size,
            &mut self.frame,
            &mut self.annotator,
        ) {
            self.request_render()
        } else {
            None
        }
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self) -> Option<u32> {
        self.view(ViewMessage::ZoomIn, 0.0, 0.0)
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self) -> Option<u32> {
        self.view(ViewMessage::ZoomOut, 0.0, 0.0)
    }

    #[wasm_bindgen(js_name = rotateCw)]
    pub fn rotate_cw(&mut self) -> Option<u32> {
        self.view(ViewMessage::RotateCw, 0.0, 0.0)
    }

    #[wasm_bindgen(js_name = rotateCcw)]
    pub fn rotate_ccw(&mut self) -> Option<u32> {
        self.view(ViewMessage::RotateCcw, 0.0, 0.0)
    }

    #[wasm_bindgen(js_name = fitWidth)]
    pub fn fit_width(
        &mut self,
        page_width: f32,
        page_height: f32,
        container_width: f32,
    ) -> Option<u32> {
        self.view(ViewMessage::FitWidth { container_width }, page_width, page_height)
    }

    #[wasm_bindgen(js_name = fitPage)]
    pub fn fit_page(
        &mut self,
        page_width: f32,
        page_height: f32,
        container_width: f32,
        container_height: f32,
    ) -> Option<u32> {
        self.view(
            ViewMessage::FitPage {
                container_width,
                container_height,
            },
            page_width,
            page_height,
        )
    }

    /// The rendered page moved inside its scrolled container.
    #[wasm_bindgen(js_name = frameMoved)]
    pub fn frame_moved(&mut self, left: f32, top: f32) {
        self.view(ViewMessage::FrameMoved { left, top }, 0.0, 0.0);
    }

    /// Select `"text"`, `"highlight"`, `"draw"`, `"shape"`, or nothing.
    ///
    /// Returns the CSS cursor for the page.
    #[wasm_bindgen(js_name = selectTool)]
    pub fn select_tool(&mut self, name: Option<String>) -> String {
        let tool = name.as_deref().and_then(Tool::from_id);
        if name.is_some() && tool.is_none() {
            log::warn!("Unknown tool {:?}", name);
        }
        handlers::handle_tool(ToolMessage::Select(tool), &mut self.annotator)
            .css()
            .to_string()
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        handlers::handle_pointer(PointerMessage::Down(Point::new(x, y)), &mut self.annotator);
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        handlers::handle_pointer(PointerMessage::Move(Point::new(x, y)), &mut self.annotator);
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) {
        handlers::handle_pointer(PointerMessage::Up, &mut self.annotator);
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) {
        handlers::handle_pointer(PointerMessage::Leave, &mut self.annotator);
    }

    #[wasm_bindgen(js_name = doubleClick)]
    pub fn double_click(&mut self, x: f32, y: f32) {
        handlers::handle_pointer(
            PointerMessage::DoubleClick(Point::new(x, y)),
            &mut self.annotator,
        );
    }

    /// Whether a text editor is open and should have focus.
    #[wasm_bindgen(js_name = isEditing)]
    pub fn is_editing(&self) -> bool {
        self.annotator.session().draft().is_some_and(|d| d.tool() == Tool::Text)
    }

    #[wasm_bindgen(js_name = textInput)]
    pub fn text_input(&mut self, content: String) {
        handlers::handle_text(TextMessage::Input(content), &mut self.annotator);
    }

    /// Editor blurred. Pass its laid-out size when known.
    #[wasm_bindgen(js_name = commitText)]
    pub fn commit_text(&mut self, width: Option<f32>, height: Option<f32>) {
        let measured = width.zip(height);
        handlers::handle_text(TextMessage::Commit { measured }, &mut self.annotator);
    }

    #[wasm_bindgen(js_name = cancelText)]
    pub fn cancel_text(&mut self) {
        handlers::handle_text(TextMessage::Cancel, &mut self.annotator);
    }

    fn change(&mut self, change: PropertyChange) -> bool {
        if self.annotator.apply_property(change) == Applied::Rejected {
            return false;
        }
        self.persist_defaults();
        true
    }

    fn persist_defaults(&mut self) {
        let style = self.annotator.properties().draft_style();
        self.config.set_tool_defaults(&style);
        if let Err(e) = self.config.save() {
            log::warn!("Failed to save tool defaults: {}", e);
        }
    }

    /// `"#rrggbb"`. Returns false if the value is not a color.
    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&mut self, hex: &str) -> bool {
        match hex.parse::<Color>() {
            Ok(color) => self.change(PropertyChange::Color(color)),
            Err(_) => {
                log::warn!("Invalid color {:?}", hex);
                false
            }
        }
    }

    #[wasm_bindgen(js_name = setFontSize)]
    pub fn set_font_size(&mut self, size: u32) -> bool {
        self.change(PropertyChange::FontSize(size))
    }

    #[wasm_bindgen(js_name = setFontFamily)]
    pub fn set_font_family(&mut self, family: String) -> bool {
        self.change(PropertyChange::FontFamily(family))
    }

    /// Percent, 10 to 80.
    #[wasm_bindgen(js_name = setHighlightOpacity)]
    pub fn set_highlight_opacity(&mut self, percent: u8) -> bool {
        self.change(PropertyChange::HighlightOpacity(percent))
    }

    /// Line width for the tool the panel currently shows.
    #[wasm_bindgen(js_name = setLineWidth)]
    pub fn set_line_width(&mut self, width: u8) -> bool {
        match self.annotator.properties().tool() {
            Some(Tool::Draw) => self.change(PropertyChange::DrawLineWidth(width)),
            Some(Tool::Shape) => self.change(PropertyChange::ShapeLineWidth(width)),
            other => {
                log::warn!("No line width for {:?}", other);
                false
            }
        }
    }

    /// `"rectangle"`, `"ellipse"` or `"line"`.
    #[wasm_bindgen(js_name = setShapeKind)]
    pub fn set_shape_kind(&mut self, kind: &str) -> bool {
        match parse_name::<ShapeKind>(kind) {
            Some(kind) => self.change(PropertyChange::ShapeKind(kind)),
            None => {
                log::warn!("Unknown shape {:?}", kind);
                false
            }
        }
    }

    #[wasm_bindgen(js_name = setShapeFill)]
    pub fn set_shape_fill(&mut self, fill: bool) -> bool {
        self.change(PropertyChange::ShapeFill(fill))
    }

    #[wasm_bindgen(js_name = toggleColorPicker)]
    pub fn toggle_color_picker(&mut self) {
        handlers::handle_properties(PropertiesMessage::ToggleColorPicker, &mut self.annotator);
    }

    #[wasm_bindgen(js_name = hideProperties)]
    pub fn hide_properties(&mut self) {
        handlers::handle_properties(PropertiesMessage::Hide, &mut self.annotator);
    }

    /// Panel controls as a JSON array; empty when the panel is hidden.
    #[wasm_bindgen(js_name = controlsJson)]
    pub fn controls_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.annotator.properties().controls())?)
    }

    /// Overlay for the displayed page as a standalone SVG document.
    #[wasm_bindgen(js_name = overlaySvg)]
    pub fn overlay_svg(&self) -> String {
        self.annotator.overlay().to_svg()
    }

    /// Overlay for the displayed page as JSON.
    #[wasm_bindgen(js_name = overlayJson)]
    pub fn overlay_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(self.annotator.overlay())?)
    }

    /// Number of annotations across all pages.
    #[wasm_bindgen(js_name = annotationCount)]
    pub fn annotation_count(&self) -> usize {
        self.annotator.store().len()
    }
}
