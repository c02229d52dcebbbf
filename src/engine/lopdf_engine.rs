use image::Rgba;
use lopdf::{Dictionary, Document, Object, ObjectId};

use super::{DocumentEngine, EngineError, PageSize, RgbaImage, TextRun};
use crate::constants::view;
use crate::viewport::PageViewport;

/// Left and top margin of the text layer, in points.
const TEXT_MARGIN: f32 = 36.0;
/// Nominal size for text runs; lopdf reports no positions or sizes.
const TEXT_SIZE: f32 = 12.0;
/// Bound on `/Parent` hops when resolving an inherited MediaBox.
const MAX_PARENT_DEPTH: usize = 32;

/// Default engine backed by `lopdf`.
///
/// Reads page geometry and text but does not rasterize page content: pages
/// come back as blank white bitmaps of the right size.
#[derive(Debug)]
pub struct LopdfEngine {
    doc: Document,
    pages: Vec<ObjectId>,
    sizes: Vec<PageSize>,
}

impl LopdfEngine {
    fn media_box(doc: &Document, page: ObjectId) -> Option<PageSize> {
        let mut dict: &Dictionary = doc.get_dictionary(page).ok()?;
        for _ in 0..MAX_PARENT_DEPTH {
            if let Some(size) = dict.get(b"MediaBox").ok().and_then(parse_box) {
                return Some(size);
            }
            let parent = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
            dict = doc.get_dictionary(parent).ok()?;
        }
        None
    }
}

fn parse_box(obj: &Object) -> Option<PageSize> {
    let array = obj.as_array().ok()?;
    if array.len() != 4 {
        return None;
    }
    let x0 = array[0].as_float().ok()?;
    let y0 = array[1].as_float().ok()?;
    let x1 = array[2].as_float().ok()?;
    let y1 = array[3].as_float().ok()?;
    Some(PageSize {
        width: (x1 - x0).abs(),
        height: (y1 - y0).abs(),
    })
}

impl DocumentEngine for LopdfEngine {
    fn load(bytes: &[u8]) -> Result<Self, EngineError> {
        if bytes.windows(b"/Encrypt".len()).any(|window| window == b"/Encrypt") {
            return Err(EngineError::Encrypted);
        }

        let doc = Document::load_mem(bytes)?;
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        if pages.is_empty() {
            return Err(EngineError::NoPages);
        }

        let sizes = pages
            .iter()
            .map(|&id| {
                Self::media_box(&doc, id).unwrap_or(PageSize {
                    width: view::FALLBACK_PAGE_WIDTH,
                    height: view::FALLBACK_PAGE_HEIGHT,
                })
            })
            .collect();

        log::debug!("📄 Parsed PDF with {} pages", pages.len());
        Ok(Self { doc, pages, sizes })
    }

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_size(&self, page: u32) -> Result<PageSize, EngineError> {
        self.check_page(page)?;
        Ok(self.sizes[(page - 1) as usize])
    }

    fn rasterize(&self, page: u32, viewport: &PageViewport) -> Result<RgbaImage, EngineError> {
        self.check_page(page)?;
        let (width, height) = viewport.pixel_size();
        Ok(RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])))
    }

    fn text_content(
        &self,
        page: u32,
        viewport: &PageViewport,
    ) -> Result<Vec<TextRun>, EngineError> {
        self.check_page(page)?;
        let text = self.doc.extract_text(&[page])?;

        // No positions are available, so lines are stacked from the top margin.
        let font_size = TEXT_SIZE * viewport.scale;
        let line_step = font_size * crate::constants::text::LINE_HEIGHT;
        let left = TEXT_MARGIN * viewport.scale;
        let runs = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(i, line)| TextRun {
                text: line.to_string(),
                x: left,
                y: left + font_size + i as f32 * line_step,
                font_size,
            })
            .collect();
        Ok(runs)
    }
}
