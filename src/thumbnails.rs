//! Thumbnail strip for page navigation.

use crate::engine::{DocumentEngine, RgbaImage};
use crate::viewport::{PageViewport, Rotation};

/// A small rendering of one page.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub page: u32,
    pub bitmap: RgbaImage,
}

/// Thumbnails of the open document and the highlighted (current) page.
#[derive(Debug, Clone, Default)]
pub struct ThumbnailStrip {
    thumbnails: Vec<Thumbnail>,
    active: Option<u32>,
}

impl ThumbnailStrip {
    /// Render every page at `scale` with no rotation.
    ///
    /// Pages that fail are logged and left out of the strip.
    pub fn generate<E: DocumentEngine>(engine: &E, scale: f32) -> Self {
        let thumbnails: Vec<Thumbnail> = (1..=engine.page_count())
            .filter_map(|page| {
                let size = engine
                    .page_size(page)
                    .map_err(|e| log::warn!("Thumbnail for page {} skipped: {}", page, e))
                    .ok()?;
                let viewport = PageViewport::new(size, scale, Rotation::Deg0);
                engine
                    .rasterize(page, &viewport)
                    .map(|bitmap| Thumbnail { page, bitmap })
                    .map_err(|e| log::warn!("Thumbnail for page {} skipped: {}", page, e))
                    .ok()
            })
            .collect();

        log::debug!("🖼️ Generated {} thumbnails", thumbnails.len());
        Self {
            thumbnails,
            active: Some(1),
        }
    }

    pub fn thumbnails(&self) -> &[Thumbnail] {
        &self.thumbnails
    }

    pub fn get(&self, page: u32) -> Option<&Thumbnail> {
        self.thumbnails.iter().find(|thumb| thumb.page == page)
    }

    pub fn active(&self) -> Option<u32> {
        self.active
    }

    pub fn set_active(&mut self, page: u32) {
        self.active = Some(page);
    }

    pub fn len(&self) -> usize {
        self.thumbnails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thumbnails.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fake::FakeEngine;

    #[test]
    fn test_generates_every_page_at_scale() {
        let engine = FakeEngine::load(b"%PDF-fake pages=4").unwrap();
        let strip = ThumbnailStrip::generate(&engine, 0.2);
        assert_eq!(strip.len(), 4);
        assert_eq!(strip.get(3).unwrap().bitmap.dimensions(), (120, 160));
        assert_eq!(strip.active(), Some(1));
    }

    #[test]
    fn test_failed_page_is_skipped() {
        let engine = FakeEngine::load(b"%PDF-fake pages=3 broken=2").unwrap();
        let strip = ThumbnailStrip::generate(&engine, 0.2);
        let pages: Vec<u32> = strip.thumbnails().iter().map(|t| t.page).collect();
        assert_eq!(pages, vec![1, 3]);
    }
}
