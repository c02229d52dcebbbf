//! Error types for document loading and the document engine.

/// Errors reported by a [`DocumentEngine`](crate::engine::DocumentEngine).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("PDF parse error: {0}")]
    Parse(#[from] lopdf::Error),

    #[error("encrypted PDFs are not supported")]
    Encrypted,

    #[error("page {page} out of range (page_count={page_count})")]
    PageOutOfRange { page: u32, page_count: u32 },

    #[error("document has no pages")]
    NoPages,

    #[error("backend error: {0}")]
    Backend(String),
}

/// Errors that can occur when opening a document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Neither the name nor the content looks like a PDF
    #[error("{file_name} is not a PDF file")]
    NotPdf { file_name: String },

    #[error("{file_name} is empty")]
    Empty { file_name: String },

    #[error(transparent)]
    Engine(#[from] EngineError),
}
