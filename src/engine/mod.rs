//! Document engine seam.
//!
//! Parsing and rasterization live behind [`DocumentEngine`]. The core only
//! asks for page geometry, a bitmap and a text layer, so a browser host can
//! keep pdf.js while native builds use [`LopdfEngine`].

mod lopdf_engine;

#[cfg(test)]
pub(crate) mod fake;

use serde::Serialize;

pub use crate::error::EngineError;
use crate::viewport::PageViewport;
pub use lopdf_engine::LopdfEngine;

pub type RgbaImage = image::RgbaImage;

/// Intrinsic page size in PDF points, unscaled and unrotated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

/// A positioned run of text for the selectable text layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub text: String,
    /// Left edge in viewport pixels
    pub x: f32,
    /// Baseline in viewport pixels
    pub y: f32,
    pub font_size: f32,
}

/// A parsed document that can describe and rasterize its pages.
///
/// Page numbers are 1-based throughout.
pub trait DocumentEngine: Sized {
    fn load(bytes: &[u8]) -> Result<Self, EngineError>;

    fn page_count(&self) -> u32;

    fn page_size(&self, page: u32) -> Result<PageSize, EngineError>;

    fn rasterize(&self, page: u32, viewport: &PageViewport) -> Result<RgbaImage, EngineError>;

    fn text_content(&self, page: u32, viewport: &PageViewport)
    -> Result<Vec<TextRun>, EngineError>;

    /// Check a page number against the page count.
    fn check_page(&self, page: u32) -> Result<(), EngineError> {
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(EngineError::PageOutOfRange { page, page_count });
        }
        Ok(())
    }
}
