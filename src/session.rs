//! Draw session: the pointer-driven state machine shared by all annotation tools.
//!
//! ```text
//! Idle --select--> ToolArmed --down--> Dragging --up/leave--> ToolArmed
//!                      |
//!                      +--down (text)--> Editing --commit/cancel--> ToolArmed
//! ```
//!
//! The session never touches the store. A finished drag hands back a committed
//! [`Annotation`] and the caller decides where it goes.

use crate::model::{Annotation, Draft, DraftStyle, Point, TextAnnotation, TextDraft, Tool};
use crate::overlay::{OverlayItem, preview_for};

/// Pointer cursor to show over the page for the active tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Default,
    Text,
    Crosshair,
}

impl CursorHint {
    pub fn for_tool(tool: Option<Tool>) -> Self {
        match tool {
            None => CursorHint::Default,
            Some(Tool::Text) => CursorHint::Text,
            Some(Tool::Highlight | Tool::Draw | Tool::Shape) => CursorHint::Crosshair,
        }
    }

    /// CSS `cursor` value.
    pub fn css(&self) -> &'static str {
        match self {
            CursorHint::Default => "default",
            CursorHint::Text => "text",
            CursorHint::Crosshair => "crosshair",
        }
    }
}

/// Observable phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No tool selected
    Idle,
    /// Tool selected, nothing in progress
    ToolArmed,
    /// Pointer held, drag draft in progress
    Dragging,
    /// Text editor open
    Editing,
}

/// Result of a pointer-down.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerDown {
    Ignored,
    /// A drag draft started; show this preview
    DragStarted(OverlayItem),
    /// A text editor opened at the pointer
    EditorOpened(OverlayItem),
}

/// Result of releasing (or leaving) the page while dragging.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEnd {
    /// Not dragging, nothing happened
    Ignored,
    /// Draft met its threshold
    Committed(Annotation),
    /// Draft was too small and has been dropped
    Discarded,
}

/// Result of closing a text editor with commit.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCommit {
    /// Store index of the note being re-edited, if any
    pub replaces: Option<usize>,
    /// The new note, or `None` when the trimmed content was empty
    pub annotation: Option<Annotation>,
}

/// Active tool, the single draft, and the dragging flag.
#[derive(Debug, Clone, Default)]
pub struct DrawSession {
    tool: Option<Tool>,
    draft: Option<Draft>,
    dragging: bool,
}

impl DrawSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(&self) -> Option<Tool> {
        self.tool
    }

    pub fn state(&self) -> SessionState {
        match (&self.draft, self.tool) {
            (Some(Draft::Text(_)), _) => SessionState::Editing,
            (Some(_), _) if self.dragging => SessionState::Dragging,
            (_, None) => SessionState::Idle,
            (_, Some(_)) => SessionState::ToolArmed,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    /// The live draft, for property changes applied while drawing.
    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        self.draft.as_mut()
    }

    /// Preview of the live draft, if any.
    pub fn preview(&self) -> Option<OverlayItem> {
        self.draft.as_ref().map(preview_for)
    }

    /// Select a tool (or none). Any draft or open editor is dropped.
    pub fn select_tool(&mut self, tool: Option<Tool>) -> CursorHint {
        if self.draft.take().is_some() {
            log::debug!("✏️ Dropped in-progress draft on tool change");
        }
        self.dragging = false;
        self.tool = tool;
        log::debug!("🛠️ Tool selected: {}", tool.map_or("none", |t| t.name()));
        CursorHint::for_tool(tool)
    }

    /// Start a draft at `point`.
    ///
    /// Text opens an editor straight away; the other tools start dragging.
    /// Ignored unless a tool is armed and nothing is in progress.
    pub fn pointer_down(&mut self, point: Point, style: &DraftStyle) -> PointerDown {
        if self.state() != SessionState::ToolArmed {
            return PointerDown::Ignored;
        }
        let Some(tool) = self.tool else {
            return PointerDown::Ignored;
        };

        let draft = Draft::start(tool, point, style);
        let preview = preview_for(&draft);
        self.draft = Some(draft);

        if tool == Tool::Text {
            log::debug!("📝 Text editor at ({:.0}, {:.0})", point.x, point.y);
            PointerDown::EditorOpened(preview)
        } else {
            self.dragging = true;
            log::debug!("✏️ {} drag from ({:.0}, {:.0})", tool.name(), point.x, point.y);
            PointerDown::DragStarted(preview)
        }
    }

    /// Track the pointer while dragging. Returns the updated preview.
    pub fn pointer_move(&mut self, point: Point) -> Option<OverlayItem> {
        if !self.dragging {
            return None;
        }
        let draft = self.draft.as_mut()?;
        draft.update(point);
        Some(preview_for(draft))
    }

    /// End the drag and apply the persistence threshold.
    pub fn pointer_up(&mut self) -> DragEnd {
        if !self.dragging {
            return DragEnd::Ignored;
        }
        self.dragging = false;
        let Some(draft) = self.draft.take() else {
            return DragEnd::Ignored;
        };

        let tool = draft.tool();
        match draft.finish() {
            Some(annotation) => {
                log::debug!("✅ {} committed", tool.name());
                DragEnd::Committed(annotation)
            }
            None => {
                log::debug!("❌ {} too small, discarded", tool.name());
                DragEnd::Discarded
            }
        }
    }

    /// Leaving the page ends the drag exactly like releasing the pointer.
    pub fn pointer_leave(&mut self) -> DragEnd {
        self.pointer_up()
    }

    /// Reopen an existing note for editing. Drops any other draft.
    pub fn edit_text(&mut self, existing: &TextAnnotation, index: usize) -> OverlayItem {
        self.dragging = false;
        let draft = Draft::Text(TextDraft::reopen(existing, index));
        let preview = preview_for(&draft);
        self.draft = Some(draft);
        preview
    }

    /// Update the open editor's content as the user types.
    pub fn set_text(&mut self, content: &str) -> Option<OverlayItem> {
        let Some(Draft::Text(editor)) = self.draft.as_mut() else {
            return None;
        };
        editor.content = content.to_string();
        self.draft.as_ref().map(preview_for)
    }

    /// Close the editor and keep its content (focus lost).
    ///
    /// `measured` is the editor's laid-out size if the host knows it.
    pub fn commit_text(&mut self, measured: Option<(f32, f32)>) -> Option<TextCommit> {
        if !matches!(self.draft, Some(Draft::Text(_))) {
            return None;
        }
        let Some(Draft::Text(mut editor)) = self.draft.take() else {
            return None;
        };
        if measured.is_some() {
            editor.measured = measured;
        }
        let replaces = editor.replaces;
        let annotation = Draft::Text(editor).finish();
        if annotation.is_none() {
            log::debug!("📝 Empty text discarded");
        }
        Some(TextCommit {
            replaces,
            annotation,
        })
    }

    /// Close the editor without keeping anything (Escape).
    pub fn cancel_text(&mut self) -> bool {
        if matches!(self.draft, Some(Draft::Text(_))) {
            self.draft = None;
            log::debug!("📝 Text editing cancelled");
            true
        } else {
            false
        }
    }

    /// Drop everything, e.g. when a new document opens.
    pub fn reset(&mut self) {
        self.draft = None;
        self.dragging = false;
    }
}
