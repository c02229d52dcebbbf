//! SVG serialization of an [`Overlay`].

use std::fmt::Write as _;

use super::{Overlay, OverlayElement, OverlayItem, ShapePrimitive};
use crate::constants::{style, text};

/// Render the overlay as a standalone `<svg>` sized and positioned like the page.
pub(super) fn render(overlay: &Overlay) -> String {
    let frame = overlay.frame;
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" style="position:absolute;left:{l}px;top:{t}px">"#,
        w = frame.width,
        h = frame.height,
        l = frame.left,
        t = frame.top,
    );
    for item in overlay.items.iter().chain(overlay.preview.as_ref()) {
        write_item(&mut out, item);
    }
    out.push_str("</svg>");
    out
}

fn write_item(out: &mut String, item: &OverlayItem) {
    match &item.element {
        OverlayElement::TextBox {
            x,
            y,
            width,
            height,
            text: content,
            color,
            font_size,
            font_family,
        } => {
            let _ = write!(
                out,
                r#"<g class="text-annotation"><rect x="{x}" y="{y}" width="{width}" height="{height}" rx="3" fill="{bg}" stroke="{color}" stroke-width="1"/>"#,
                bg = style::TEXT_BACKGROUND,
            );
            let _ = write!(
                out,
                r#"<text x="{tx}" y="{ty}" font-family="{family}" font-size="{font_size}" fill="{color}">"#,
                tx = x + text::BOX_PADDING,
                ty = y + text::BOX_PADDING + *font_size as f32,
                family = escape(font_family),
            );
            let line_height = *font_size as f32 * text::LINE_HEIGHT;
            for (i, line) in content.lines().enumerate() {
                let dy = if i == 0 { 0.0 } else { line_height };
                let _ = write!(
                    out,
                    r#"<tspan x="{tx}" dy="{dy}">{line}</tspan>"#,
                    tx = x + text::BOX_PADDING,
                    line = escape(line),
                );
            }
            out.push_str("</text></g>");
        }
        OverlayElement::HighlightRect {
            x,
            y,
            width,
            height,
            color,
            opacity,
        } => {
            let _ = write!(
                out,
                r#"<rect class="highlight-annotation" x="{x}" y="{y}" width="{width}" height="{height}" fill="{color}" opacity="{opacity}"/>"#,
            );
        }
        OverlayElement::Stroke {
            path,
            color,
            line_width,
        } => {
            let _ = write!(
                out,
                r#"<path d="{path}" stroke="{color}" stroke-width="{line_width}" fill="none"/>"#,
            );
        }
        OverlayElement::Shape {
            primitive,
            color,
            line_width,
            fill,
        } => {
            match primitive {
                ShapePrimitive::Rect {
                    x,
                    y,
                    width,
                    height,
                } => {
                    let _ = write!(
                        out,
                        r#"<rect x="{x}" y="{y}" width="{width}" height="{height}""#
                    );
                }
                ShapePrimitive::Ellipse { cx, cy, rx, ry } => {
                    let _ = write!(out, r#"<ellipse cx="{cx}" cy="{cy}" rx="{rx}" ry="{ry}""#);
                }
                ShapePrimitive::Line { x1, y1, x2, y2 } => {
                    let _ = write!(out, r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}""#);
                }
            }
            let _ = write!(out, r#" stroke="{color}" stroke-width="{line_width}""#);
            match fill {
                Some(fill) => {
                    let _ = write!(
                        out,
                        r#" fill="{fill}" fill-opacity="{}"/>"#,
                        style::SHAPE_FILL_OPACITY
                    );
                }
                None => out.push_str(r#" fill="none"/>"#),
            }
        }
    }
}

/// Escape text for use in XML content and attribute values.
fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
