//! Page rendering and the single-slot render queue.
//!
//! At most one render is in flight and at most one request waits behind it.
//! A newer request overwrites the waiting one, so rapid navigation renders the
//! page that was showing when it started and then the last page asked for.
//! Pages requested in between are skipped.

use std::time::Duration;

use web_time::Instant;

use crate::engine::{DocumentEngine, EngineError, PageSize, RgbaImage, TextRun};
use crate::viewport::{PageViewport, Rotation};

/// In-flight render plus one pending slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderQueue {
    in_flight: Option<u32>,
    pending: Option<u32>,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for `page` to be rendered.
    ///
    /// Returns the page if it should start now. While another render is in
    /// flight the page replaces whatever was pending and `None` is returned.
    pub fn request(&mut self, page: u32) -> Option<u32> {
        if self.in_flight.is_some() {
            if let Some(dropped) = self.pending.replace(page) {
                log::debug!("⏭️ Pending render of page {} superseded by {}", dropped, page);
            }
            return None;
        }
        self.in_flight = Some(page);
        log::debug!("🖌️ Render of page {} started", page);
        Some(page)
    }

    /// Mark the in-flight render done and promote the pending page, if any.
    pub fn finish(&mut self) -> Option<u32> {
        self.in_flight = self.pending.take();
        if let Some(page) = self.in_flight {
            log::debug!("🖌️ Render of page {} started", page);
        }
        self.in_flight
    }

    /// Forget everything, e.g. when another document is opened.
    pub fn clear(&mut self) {
        self.in_flight = None;
        self.pending = None;
    }

    pub fn in_flight(&self) -> Option<u32> {
        self.in_flight
    }

    pub fn pending(&self) -> Option<u32> {
        self.pending
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }
}

/// Output of one page render.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub page: u32,
    pub size: PageSize,
    pub viewport: PageViewport,
    pub bitmap: RgbaImage,
    pub text: Vec<TextRun>,
    pub elapsed: Duration,
}

/// Rasterize a page and fetch its text layer.
///
/// A rasterization failure is returned. A text-layer failure only loses the
/// text layer.
pub fn render_page<E: DocumentEngine>(
    engine: &E,
    page: u32,
    scale: f32,
    rotation: Rotation,
) -> Result<RenderedPage, EngineError> {
    let start = Instant::now();
    let size = engine.page_size(page)?;
    let viewport = PageViewport::new(size, scale, rotation);
    let bitmap = engine.rasterize(page, &viewport)?;
    let text = engine.text_content(page, &viewport).unwrap_or_else(|e| {
        log::warn!("Text layer for page {} unavailable: {}", page, e);
        Vec::new()
    });
    let elapsed = start.elapsed();
    log::debug!(
        "🖼️ Rendered page {} at {:.0}x{:.0} in {:?}",
        page,
        viewport.width,
        viewport.height,
        elapsed
    );

    Ok(RenderedPage {
        page,
        size,
        viewport,
        bitmap,
        text,
        elapsed,
    })
}
