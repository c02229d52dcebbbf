//! Properties panel: per-tool style controls feeding the draw session.
//!
//! A change goes to the live draft when one of the matching tool exists, so the
//! preview updates as the user tweaks it. Otherwise it becomes the default for
//! the next draft of that tool.

use serde::Serialize;

use crate::color_utils::Color;
use crate::constants::{style, text};
use crate::model::{Draft, DraftStyle, ShapeKind, Tool};
use crate::session::DrawSession;

/// A single edit made in the panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyChange {
    /// Shared by every tool
    Color(Color),
    FontSize(u32),
    FontFamily(String),
    /// Highlight opacity in percent
    HighlightOpacity(u8),
    DrawLineWidth(u8),
    ShapeKind(ShapeKind),
    ShapeLineWidth(u8),
    ShapeFill(bool),
}

impl PropertyChange {
    /// The tool this change configures; `None` for the shared color.
    pub fn tool(&self) -> Option<Tool> {
        match self {
            PropertyChange::Color(_) => None,
            PropertyChange::FontSize(_) | PropertyChange::FontFamily(_) => Some(Tool::Text),
            PropertyChange::HighlightOpacity(_) => Some(Tool::Highlight),
            PropertyChange::DrawLineWidth(_) => Some(Tool::Draw),
            PropertyChange::ShapeKind(_)
            | PropertyChange::ShapeLineWidth(_)
            | PropertyChange::ShapeFill(_) => Some(Tool::Shape),
        }
    }
}

/// Where a change ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Applied to the in-progress draft
    Draft,
    /// Stored as the default for the next draft
    Default,
    /// Value not allowed, nothing changed
    Rejected,
}

/// Description of one form control, for the host to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum Control {
    Color {
        value: Color,
        picker_open: bool,
    },
    FontSize {
        value: u32,
        options: &'static [u32],
    },
    FontFamily {
        value: String,
        options: &'static [&'static str],
    },
    /// Slider in percent
    Opacity {
        value: u8,
        min: u8,
        max: u8,
    },
    LineWidth {
        value: u8,
        min: u8,
        max: u8,
    },
    ShapeKind {
        value: ShapeKind,
        options: &'static [ShapeKind],
    },
    Fill {
        value: bool,
    },
}

/// Panel visibility, the open color picker, and the per-tool defaults.
#[derive(Debug, Clone, Default)]
pub struct PropertiesPanel {
    visible: bool,
    tool: Option<Tool>,
    color_picker_open: bool,
    defaults: DraftStyle,
}

impl PropertiesPanel {
    pub fn new(defaults: DraftStyle) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn tool(&self) -> Option<Tool> {
        self.tool
    }

    /// Show the form for an annotation tool, or hide the panel for `None`.
    pub fn show_for_tool(&mut self, tool: Option<Tool>) {
        self.tool = tool;
        self.visible = tool.is_some();
        self.color_picker_open = false;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.color_picker_open = false;
    }

    pub fn is_color_picker_open(&self) -> bool {
        self.color_picker_open
    }

    pub fn toggle_color_picker(&mut self) {
        self.color_picker_open = !self.color_picker_open;
    }

    /// The shared selected color.
    pub fn color(&self) -> Color {
        self.defaults.color
    }

    /// Snapshot of the defaults a new draft starts from.
    pub fn draft_style(&self) -> DraftStyle {
        self.defaults.clone()
    }

    /// Controls for the active tool, in display order. Empty when hidden.
    pub fn controls(&self) -> Vec<Control> {
        if !self.visible {
            return Vec::new();
        }
        let d = &self.defaults;
        let color = Control::Color {
            value: d.color,
            picker_open: self.color_picker_open,
        };
        match self.tool {
            None => Vec::new(),
            Some(Tool::Text) => vec![
                color,
                Control::FontSize {
                    value: d.font_size,
                    options: text::FONT_SIZES,
                },
                Control::FontFamily {
                    value: d.font_family.clone(),
                    options: text::FONT_FAMILIES,
                },
            ],
            Some(Tool::Highlight) => vec![
                color,
                Control::Opacity {
                    value: (d.highlight_opacity * 100.0).round() as u8,
                    min: style::OPACITY_PERCENT_MIN,
                    max: style::OPACITY_PERCENT_MAX,
                },
            ],
            Some(Tool::Draw) => vec![color, line_width_control(d.draw_line_width)],
            Some(Tool::Shape) => vec![
                Control::ShapeKind {
                    value: d.shape_kind,
                    options: ShapeKind::all(),
                },
                color,
                line_width_control(d.shape_line_width),
                Control::Fill {
                    value: d.shape_fill,
                },
            ],
        }
    }

    /// Apply a change to the live draft if it matches, otherwise to the defaults.
    ///
    /// Numeric values are clamped to their control's range. The color is the
    /// shared selection, so it always updates the default as well and closes
    /// the picker.
    pub fn apply(&mut self, change: PropertyChange, session: &mut DrawSession) -> Applied {
        let Some(change) = validate(change) else {
            return Applied::Rejected;
        };

        if let PropertyChange::Color(color) = change {
            self.defaults.color = color;
            self.color_picker_open = false;
            log::debug!("🎨 Color: {}", color);
            return match session.draft_mut() {
                Some(draft) => {
                    draft.set_color(color);
                    Applied::Draft
                }
                None => Applied::Default,
            };
        }

        let live = session
            .draft_mut()
            .filter(|draft| Some(draft.tool()) == change.tool());
        match live {
            Some(draft) => {
                apply_to_draft(draft, change);
                Applied::Draft
            }
            None => {
                self.apply_to_defaults(change);
                Applied::Default
            }
        }
    }

    fn apply_to_defaults(&mut self, change: PropertyChange) {
        log::debug!("⚙️ Default updated: {:?}", change);
        let d = &mut self.defaults;
        match change {
            PropertyChange::Color(color) => d.color = color,
            PropertyChange::FontSize(size) => d.font_size = size,
            PropertyChange::FontFamily(family) => d.font_family = family,
            PropertyChange::HighlightOpacity(percent) => {
                d.highlight_opacity = f32::from(percent) / 100.0
            }
            PropertyChange::DrawLineWidth(width) => d.draw_line_width = width,
            PropertyChange::ShapeKind(kind) => d.shape_kind = kind,
            PropertyChange::ShapeLineWidth(width) => d.shape_line_width = width,
            PropertyChange::ShapeFill(fill) => d.shape_fill = fill,
        }
    }
}

fn line_width_control(value: u8) -> Control {
    Control::LineWidth {
        value,
        min: style::LINE_WIDTH_MIN,
        max: style::LINE_WIDTH_MAX,
    }
}

/// Clamp numeric values and reject values outside a fixed option list.
fn validate(change: PropertyChange) -> Option<PropertyChange> {
    match change {
        PropertyChange::FontSize(size) if !text::FONT_SIZES.contains(&size) => {
            log::warn!("Unsupported font size {}, keeping current", size);
            None
        }
        PropertyChange::FontFamily(family)
            if !text::FONT_FAMILIES.contains(&family.as_str()) =>
        {
            log::warn!("Unsupported font family {:?}, keeping current", family);
            None
        }
        PropertyChange::HighlightOpacity(percent) => Some(PropertyChange::HighlightOpacity(
            percent.clamp(style::OPACITY_PERCENT_MIN, style::OPACITY_PERCENT_MAX),
        )),
        PropertyChange::DrawLineWidth(width) => Some(PropertyChange::DrawLineWidth(
            width.clamp(style::LINE_WIDTH_MIN, style::LINE_WIDTH_MAX),
        )),
        PropertyChange::ShapeLineWidth(width) => Some(PropertyChange::ShapeLineWidth(
            width.clamp(style::LINE_WIDTH_MIN, style::LINE_WIDTH_MAX),
        )),
        other => Some(other),
    }
}

fn apply_to_draft(draft: &mut Draft, change: PropertyChange) {
    match (draft, change) {
        (draft, PropertyChange::Color(color)) => draft.set_color(color),
        (Draft::Text(t), PropertyChange::FontSize(size)) => t.font_size = size,
        (Draft::Text(t), PropertyChange::FontFamily(family)) => t.font_family = family,
        (Draft::Highlight(h), PropertyChange::HighlightOpacity(percent)) => {
            h.opacity = f32::from(percent) / 100.0
        }
        (Draft::Draw(d), PropertyChange::DrawLineWidth(width)) => d.line_width = width,
        (Draft::Shape(s), PropertyChange::ShapeKind(kind)) => s.kind = kind,
        (Draft::Shape(s), PropertyChange::ShapeLineWidth(width)) => s.line_width = width,
        (Draft::Shape(s), PropertyChange::ShapeFill(fill)) => s.fill = fill,
        (draft, change) => {
            log::warn!("{:?} doesn't apply to a {} draft", change, draft.tool().name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;
    use crate::session::PointerDown;

    fn panel_for(tool: Tool) -> (PropertiesPanel, DrawSession) {
        let mut panel = PropertiesPanel::default();
        panel.show_for_tool(Some(tool));
        let mut session = DrawSession::new();
        session.select_tool(Some(tool));
        (panel, session)
    }

    #[test]
    fn test_visibility_follows_tool() {
        let mut panel = PropertiesPanel::default();
        assert!(!panel.is_visible());
        panel.show_for_tool(Some(Tool::Draw));
        assert!(panel.is_visible());
        panel.show_for_tool(None);
        assert!(!panel.is_visible());
        assert!(panel.controls().is_empty());

        panel.show_for_tool(Some(Tool::Text));
        panel.hide();
        assert!(!panel.is_visible());
    }

    #[test]
    fn test_controls_per_tool() {
        let (mut panel, _) = panel_for(Tool::Shape);
        let controls = panel.controls();
        assert_eq!(controls.len(), 4);
        assert!(matches!(controls[0], Control::ShapeKind { .. }));
        assert!(matches!(controls[3], Control::Fill { value: false }));

        panel.show_for_tool(Some(Tool::Highlight));
        assert_eq!(
            panel.controls()[1],
            Control::Opacity {
                value: 30,
                min: 10,
                max: 80,
            }
        );

        panel.show_for_tool(Some(Tool::Text));
        let Control::FontSize { value, options } = &panel.controls()[1] else {
            panic!("Expected font size control");
        };
        assert_eq!(*value, 14);
        assert_eq!(*options, &[10, 12, 14, 16, 18, 20, 24]);
    }

    #[test]
    fn test_change_without_draft_sets_default() {
        let (mut panel, mut session) = panel_for(Tool::Draw);
        assert_eq!(
            panel.apply(PropertyChange::DrawLineWidth(6), &mut session),
            Applied::Default
        );
        assert_eq!(panel.draft_style().draw_line_width, 6);
    }

    #[test]
    fn test_change_with_live_draft_updates_draft_only() {
        let (mut panel, mut session) = panel_for(Tool::Shape);
        let down = session.pointer_down(Point::new(0.0, 0.0), &panel.draft_style());
        assert!(matches!(down, PointerDown::DragStarted(_)));

        assert_eq!(
            panel.apply(PropertyChange::ShapeKind(ShapeKind::Ellipse), &mut session),
            Applied::Draft
        );
        let Some(Draft::Shape(shape)) = session.draft() else {
            panic!("Expected shape draft");
        };
        assert_eq!(shape.kind, ShapeKind::Ellipse);
        assert_eq!(panel.draft_style().shape_kind, ShapeKind::Rectangle);

        // A change for another tool goes to that tool's defaults
        assert_eq!(
            panel.apply(PropertyChange::DrawLineWidth(4), &mut session),
            Applied::Default
        );
    }

    #[test]
    fn test_values_are_clamped() {
        let (mut panel, mut session) = panel_for(Tool::Highlight);
        panel.apply(PropertyChange::HighlightOpacity(95), &mut session);
        assert!((panel.draft_style().highlight_opacity - 0.8).abs() < f32::EPSILON);
        panel.apply(PropertyChange::HighlightOpacity(0), &mut session);
        assert!((panel.draft_style().highlight_opacity - 0.1).abs() < f32::EPSILON);
        panel.apply(PropertyChange::ShapeLineWidth(0), &mut session);
        assert_eq!(panel.draft_style().shape_line_width, 1);
    }

    #[test]
    fn test_unknown_font_size_rejected() {
        let (mut panel, mut session) = panel_for(Tool::Text);
        assert_eq!(
            panel.apply(PropertyChange::FontSize(15), &mut session),
            Applied::Rejected
        );
        assert_eq!(panel.draft_style().font_size, 14);
        assert_eq!(
            panel.apply(PropertyChange::FontFamily("Comic Sans".into()), &mut session),
            Applied::Rejected
        );
    }

    #[test]
    fn test_color_closes_picker_and_updates_live_draft() {
        let (mut panel, mut session) = panel_for(Tool::Text);
        session.pointer_down(Point::new(1.0, 1.0), &panel.draft_style());
        panel.toggle_color_picker();
        assert!(panel.is_color_picker_open());

        let blue = Color::rgb(0, 0, 255);
        assert_eq!(panel.apply(PropertyChange::Color(blue), &mut session), Applied::Draft);
        assert!(!panel.is_color_picker_open());
        assert_eq!(panel.color(), blue);
        let Some(Draft::Text(editor)) = session.draft() else {
            panic!("Expected text editor");
        };
        assert_eq!(editor.color, blue);
    }
}
