//! Viewer message types.
//!
//! All UI events are represented as messages in the Elm architecture style and
//! handled by [`Viewer::update`](crate::viewer::Viewer::update).

use crate::model::{Point, Tool};
use crate::properties::PropertyChange;

/// Opening documents.
#[derive(Debug, Clone)]
pub enum DocumentMessage {
    /// A file was picked or dropped
    Open { file_name: String, bytes: Vec<u8> },
    /// Close the current document
    Close,
}

/// Moving between pages.
#[derive(Debug, Clone, Copy)]
pub enum NavigationMessage {
    PrevPage,
    NextPage,
    /// Thumbnail click
    GoToPage(u32),
}

/// Zoom, fit and rotation.
#[derive(Debug, Clone, Copy)]
pub enum ViewMessage {
    ZoomIn,
    ZoomOut,
    FitWidth { container_width: f32 },
    FitPage {
        container_width: f32,
        container_height: f32,
    },
    RotateCw,
    RotateCcw,
    /// Rendered page moved on screen (scroll or layout)
    FrameMoved { left: f32, top: f32 },
}

/// Toolbar tool buttons.
#[derive(Debug, Clone, Copy)]
pub enum ToolMessage {
    /// Select a tool, or none
    Select(Option<Tool>),
}

/// Pointer events over the page, in page pixels.
#[derive(Debug, Clone, Copy)]
pub enum PointerMessage {
    Down(Point),
    Move(Point),
    Up,
    Leave,
    /// Reopen the text note under the pointer
    DoubleClick(Point),
}

/// The text editor.
#[derive(Debug, Clone)]
pub enum TextMessage {
    /// Editor content changed
    Input(String),
    /// Editor lost focus; the host passes its laid-out size when known
    Commit { measured: Option<(f32, f32)> },
    /// Escape
    Cancel,
}

/// The properties panel.
#[derive(Debug, Clone)]
pub enum PropertiesMessage {
    Change(PropertyChange),
    ToggleColorPicker,
    Hide,
}

/// Messages that can be sent to update viewer state.
#[derive(Debug, Clone)]
pub enum Message {
    Document(DocumentMessage),
    Navigation(NavigationMessage),
    View(ViewMessage),
    Tool(ToolMessage),
    Pointer(PointerMessage),
    Text(TextMessage),
    Properties(PropertiesMessage),
}

impl Message {
    pub fn open(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Message::Document(DocumentMessage::Open {
            file_name: file_name.into(),
            bytes,
        })
    }
}

impl From<NavigationMessage> for Message {
    fn from(msg: NavigationMessage) -> Self {
        Message::Navigation(msg)
    }
}

impl From<ViewMessage> for Message {
    fn from(msg: ViewMessage) -> Self {
        Message::View(msg)
    }
}

impl From<PointerMessage> for Message {
    fn from(msg: PointerMessage) -> Self {
        Message::Pointer(msg)
    }
}

impl From<TextMessage> for Message {
    fn from(msg: TextMessage) -> Self {
        Message::Text(msg)
    }
}

impl From<PropertiesMessage> for Message {
    fn from(msg: PropertiesMessage) -> Self {
        Message::Properties(msg)
    }
}

