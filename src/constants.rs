//! Global constants for the pdfmark annotation core.

/// Persistence thresholds applied when a drag ends.
pub mod threshold {
    /// A highlight or shape must be strictly wider and taller than this to be kept.
    pub const MIN_BOX_SIZE: f32 = 5.0;
    /// A freehand stroke must have more points than this to be kept.
    pub const MIN_STROKE_POINTS: usize = 1;
}

/// Overlay layers, lower values are further back.
pub mod layer {
    pub const HIGHLIGHT: u8 = 5;
    pub const DRAW: u8 = 6;
    pub const SHAPE: u8 = 7;
    pub const TEXT: u8 = 10;
}

/// Viewport defaults.
pub mod view {
    /// Multiplier applied by zoom in / divided by zoom out
    pub const ZOOM_STEP: f32 = 1.2;
    /// Padding subtracted from the container before fitting
    pub const FIT_PADDING: f32 = 40.0;
    /// Scale used for the thumbnail strip
    pub const THUMBNAIL_SCALE: f32 = 0.2;
    /// Page size used when a page has no readable MediaBox (US Letter, in points)
    pub const FALLBACK_PAGE_WIDTH: f32 = 612.0;
    pub const FALLBACK_PAGE_HEIGHT: f32 = 792.0;
}

/// Text annotation defaults and editor metrics.
pub mod text {
    pub const DEFAULT_FONT_SIZE: u32 = 14;
    pub const DEFAULT_FONT_FAMILY: &str = "Arial";
    pub const FONT_SIZES: &[u32] = &[10, 12, 14, 16, 18, 20, 24];
    pub const FONT_FAMILIES: &[&str] = &[
        "Arial",
        "Times New Roman",
        "Courier New",
        "Georgia",
        "Verdana",
    ];
    /// Minimum editor box, matches the contenteditable min-width/min-height
    pub const MIN_BOX_WIDTH: f32 = 100.0;
    pub const MIN_BOX_HEIGHT: f32 = 30.0;
    /// Inner padding of the text box on every side
    pub const BOX_PADDING: f32 = 5.0;
    /// Rough glyph advance relative to font size, used when the host can't measure
    pub const GLYPH_ADVANCE: f32 = 0.6;
    pub const LINE_HEIGHT: f32 = 1.2;
}

/// Style defaults for drag-created annotations.
pub mod style {
    pub const DEFAULT_HIGHLIGHT_OPACITY: f32 = 0.3;
    /// Opacity slider range, in percent
    pub const OPACITY_PERCENT_MIN: u8 = 10;
    pub const OPACITY_PERCENT_MAX: u8 = 80;
    pub const DEFAULT_LINE_WIDTH: u8 = 2;
    pub const LINE_WIDTH_MIN: u8 = 1;
    pub const LINE_WIDTH_MAX: u8 = 10;
    /// Fill opacity for filled shapes
    pub const SHAPE_FILL_OPACITY: f32 = 0.2;
    /// Text boxes sit on a translucent white background
    pub const TEXT_BACKGROUND: &str = "rgba(255, 255, 255, 0.8)";
}
