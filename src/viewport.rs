//! Viewport state: current page, zoom scale and rotation.
//!
//! Page navigation returns whether the page changed so the caller knows when to
//! request a render.

use serde::{Deserialize, Serialize};

use crate::constants::view;
use crate::engine::PageSize;

/// Page rotation in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Rotate 90° clockwise.
    pub fn cw(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    /// Rotate 90° counter-clockwise.
    pub fn ccw(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg270,
            Rotation::Deg90 => Rotation::Deg0,
            Rotation::Deg180 => Rotation::Deg90,
            Rotation::Deg270 => Rotation::Deg180,
        }
    }

    /// True when the page lies on its side and width/height swap.
    pub fn is_sideways(&self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees % 360 {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(format!("rotation must be a multiple of 90, got {other}")),
        }
    }
}

/// Pixel geometry of a page at a given scale and rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageViewport {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    pub rotation: Rotation,
}

impl PageViewport {
    pub fn new(size: PageSize, scale: f32, rotation: Rotation) -> Self {
        let (w, h) = if rotation.is_sideways() {
            (size.height, size.width)
        } else {
            (size.width, size.height)
        };
        Self {
            width: w * scale,
            height: h * scale,
            scale,
            rotation,
        }
    }

    /// Bitmap dimensions, at least one pixel each.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            self.width.round().max(1.0) as u32,
            self.height.round().max(1.0) as u32,
        )
    }
}

/// Navigation, zoom and rotation of the open document.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    page: u32,
    page_count: u32,
    scale: f32,
    rotation: Rotation,
    zoom_step: f32,
    fit_padding: f32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(view::ZOOM_STEP, view::FIT_PADDING)
    }
}

impl ViewportState {
    pub fn new(zoom_step: f32, fit_padding: f32) -> Self {
        Self {
            page: 1,
            page_count: 0,
            scale: 1.0,
            rotation: Rotation::Deg0,
            zoom_step,
            fit_padding,
        }
    }

    /// Current page, 1-based.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Back to page 1 at 100% with no rotation, for a freshly opened document.
    pub fn reset(&mut self, page_count: u32) {
        self.page = 1;
        self.page_count = page_count;
        self.scale = 1.0;
        self.rotation = Rotation::Deg0;
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page <= 1 {
            return false;
        }
        self.page -= 1;
        log::debug!("⬅️ Page {}", self.page);
        true
    }

    pub fn next_page(&mut self) -> bool {
        if self.page >= self.page_count {
            return false;
        }
        self.page += 1;
        log::debug!("➡️ Page {}", self.page);
        true
    }

    /// Jump to a page. Out-of-range pages are ignored.
    pub fn go_to_page(&mut self, page: u32) -> bool {
        if page < 1 || page > self.page_count {
            log::debug!("Ignoring jump to page {} of {}", page, self.page_count);
            return false;
        }
        self.page = page;
        true
    }

    pub fn zoom_in(&mut self) {
        self.scale *= self.zoom_step;
        log::debug!("🔍 Zoom in: {:.2}x", self.scale);
    }

    pub fn zoom_out(&mut self) {
        self.scale /= self.zoom_step;
        log::debug!("🔍 Zoom out: {:.2}x", self.scale);
    }

    /// Scale as a rounded percentage.
    pub fn zoom_percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }

    /// `"current / total"`.
    pub fn page_info(&self) -> String {
        format!("{} / {}", self.page, self.page_count)
    }

    /// `"Zoom: N%"`.
    pub fn zoom_info(&self) -> String {
        format!("Zoom: {}%", self.zoom_percent())
    }

    pub fn rotate_cw(&mut self) {
        self.rotation = self.rotation.cw();
        log::debug!("🔄 Rotation: {}°", self.rotation.degrees());
    }

    pub fn rotate_ccw(&mut self) {
        self.rotation = self.rotation.ccw();
        log::debug!("🔄 Rotation: {}°", self.rotation.degrees());
    }

    /// Scale the page so its width fills the container minus padding.
    pub fn fit_to_width(&mut self, page: PageSize, container_width: f32) {
        let unscaled = PageViewport::new(page, 1.0, self.rotation);
        self.scale = (container_width - self.fit_padding) / unscaled.width;
        log::debug!("↔️ Fit width: {:.2}x", self.scale);
    }

    /// Scale the page so it fits entirely in the container minus padding.
    pub fn fit_to_page(&mut self, page: PageSize, container_width: f32, container_height: f32) {
        let unscaled = PageViewport::new(page, 1.0, self.rotation);
        let scale_x = (container_width - self.fit_padding) / unscaled.width;
        let scale_y = (container_height - self.fit_padding) / unscaled.height;
        self.scale = scale_x.min(scale_y);
        log::debug!("⛶ Fit page: {:.2}x", self.scale);
    }
}
