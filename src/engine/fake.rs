//! In-memory engine for tests.
//!
//! The "document" is a text header such as `%PDF-fake pages=3 broken=2`.
//! Every rasterized page is recorded so render ordering can be asserted.

use std::cell::RefCell;

use image::Rgba;

use super::{DocumentEngine, EngineError, PageSize, RgbaImage, TextRun};
use crate::viewport::PageViewport;

pub(crate) const PAGE: PageSize = PageSize {
    width: 600.0,
    height: 800.0,
};

/// Bytes of a fake document with `pages` pages.
pub(crate) fn fake_pdf(pages: u32) -> Vec<u8> {
    format!("%PDF-fake pages={pages}").into_bytes()
}

#[derive(Debug, Default)]
pub(crate) struct FakeEngine {
    page_count: u32,
    broken: Option<u32>,
    rasterized: RefCell<Vec<u32>>,
}

impl FakeEngine {
    /// Pages rasterized so far, in order.
    pub(crate) fn rasterized(&self) -> Vec<u32> {
        self.rasterized.borrow().clone()
    }
}

fn field(header: &str, key: &str) -> Option<u32> {
    header
        .split_whitespace()
        .find_map(|part| part.strip_prefix(key)?.strip_prefix('=')?.parse().ok())
}

impl DocumentEngine for FakeEngine {
    fn load(bytes: &[u8]) -> Result<Self, EngineError> {
        let header = String::from_utf8_lossy(bytes);
        if header.contains("corrupt") {
            return Err(EngineError::Backend("corrupt fake document".into()));
        }
        let page_count = field(&header, "pages").unwrap_or(1);
        if page_count == 0 {
            return Err(EngineError::NoPages);
        }
        Ok(Self {
            page_count,
            broken: field(&header, "broken"),
            rasterized: RefCell::default(),
        })
    }

    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn page_size(&self, page: u32) -> Result<PageSize, EngineError> {
        self.check_page(page)?;
        Ok(PAGE)
    }

    fn rasterize(&self, page: u32, viewport: &PageViewport) -> Result<RgbaImage, EngineError> {
        self.check_page(page)?;
        self.rasterized.borrow_mut().push(page);
        if self.broken == Some(page) {
            return Err(EngineError::Backend(format!("page {page} is broken")));
        }
        let (width, height) = viewport.pixel_size();
        Ok(RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])))
    }

    fn text_content(
        &self,
        page: u32,
        viewport: &PageViewport,
    ) -> Result<Vec<TextRun>, EngineError> {
        self.check_page(page)?;
        Ok(vec![TextRun {
            text: format!("Page {page}"),
            x: 10.0 * viewport.scale,
            y: 20.0 * viewport.scale,
            font_size: 12.0 * viewport.scale,
        }])
    }
}
