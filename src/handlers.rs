//! Message handlers for the viewer.
//!
//! Each handler processes one category of messages, keeping
//! [`Viewer::update`](crate::viewer::Viewer::update) short. Handlers that
//! touch the viewport return whether the current page needs a new render.

use crate::annotator::Annotator;
use crate::engine::PageSize;
use crate::message::{
    NavigationMessage, PointerMessage, PropertiesMessage, TextMessage, ToolMessage, ViewMessage,
};
use crate::overlay::PageFrame;
use crate::session::CursorHint;
use crate::viewport::ViewportState;

/// Handle page navigation.
pub fn handle_navigation(msg: NavigationMessage, viewport: &mut ViewportState) -> bool {
    match msg {
        NavigationMessage::PrevPage => viewport.prev_page(),
        NavigationMessage::NextPage => viewport.next_page(),
        NavigationMessage::GoToPage(page) => viewport.go_to_page(page),
    }
}

/// Handle zoom, fit, rotation and frame moves.
///
/// `page_size` is the unscaled size of the current page, needed to fit it.
pub fn handle_view(
    msg: ViewMessage,
    viewport: &mut ViewportState,
    page_size: PageSize,
    frame: &mut PageFrame,
    annotator: &mut Annotator,
) -> bool {
    match msg {
        ViewMessage::ZoomIn => viewport.zoom_in(),
        ViewMessage::ZoomOut => viewport.zoom_out(),
        ViewMessage::FitWidth { container_width } => {
            viewport.fit_to_width(page_size, container_width)
        }
        ViewMessage::FitPage {
            container_width,
            container_height,
        } => viewport.fit_to_page(page_size, container_width, container_height),
        ViewMessage::RotateCw => viewport.rotate_cw(),
        ViewMessage::RotateCcw => viewport.rotate_ccw(),
        ViewMessage::FrameMoved { left, top } => {
            frame.left = left;
            frame.top = top;
            annotator.set_frame(PageFrame {
                left,
                top,
                ..annotator.overlay().frame
            });
            return false;
        }
    }
    true
}

/// Handle toolbar tool selection.
pub fn handle_tool(msg: ToolMessage, annotator: &mut Annotator) -> CursorHint {
    match msg {
        ToolMessage::Select(tool) => annotator.select_tool(tool),
    }
}

/// Handle pointer events over the page.
pub fn handle_pointer(msg: PointerMessage, annotator: &mut Annotator) {
    match msg {
        PointerMessage::Down(point) => {
            annotator.pointer_down(point);
        }
        PointerMessage::Move(point) => {
            annotator.pointer_move(point);
        }
        PointerMessage::Up => {
            annotator.pointer_up();
        }
        PointerMessage::Leave => {
            annotator.pointer_leave();
        }
        PointerMessage::DoubleClick(point) => {
            if !annotator.edit_text_at(point) {
                log::debug!("No text note at ({:.0}, {:.0})", point.x, point.y);
            }
        }
    }
}

/// Handle the text editor.
pub fn handle_text(msg: TextMessage, annotator: &mut Annotator) {
    match msg {
        TextMessage::Input(content) => annotator.text_input(&content),
        TextMessage::Commit { measured } => {
            annotator.commit_text(measured);
        }
        TextMessage::Cancel => {
            annotator.cancel_text();
        }
    }
}

/// Handle the properties panel.
pub fn handle_properties(msg: PropertiesMessage, annotator: &mut Annotator) {
    match msg {
        PropertiesMessage::Change(change) => {
            annotator.apply_property(change);
        }
        PropertiesMessage::ToggleColorPicker => annotator.properties_mut().toggle_color_picker(),
        PropertiesMessage::Hide => annotator.properties_mut().hide(),
    }
}
