//! pdfmark - annotation core for a browser-based PDF viewer
//!
//! Text notes, highlights, freehand drawing and shapes layered over pages
//! rendered by a pluggable document engine. [`Viewer`] ties a document to the
//! viewport, the render queue and the [`Annotator`]; browser builds expose the
//! same pieces through `WebViewer`.

pub mod annotator;
pub mod color_utils;
pub mod config;
pub mod constants;
pub mod document;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod message;
pub mod model;
pub mod overlay;
pub mod properties;
pub mod render;
pub mod session;
pub mod store;
pub mod thumbnails;
pub mod viewer;
pub mod viewport;

pub use annotator::Annotator;
pub use config::{AppConfig, ConfigError, LogLevel};
pub use document::{LoadedDocument, PrintJob, SavedCopy};
pub use engine::{DocumentEngine, LopdfEngine, PageSize};
pub use error::{EngineError, LoadError};
pub use message::Message;
pub use viewer::{ContentState, Viewer};

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
