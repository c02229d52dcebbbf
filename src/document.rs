//! An opened document: the engine handle plus the original file.

use crate::engine::DocumentEngine;
use crate::error::LoadError;

/// Magic bytes at the start of every PDF file.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Notice shown alongside a saved copy.
pub const SAVE_NOTICE: &str =
    "Annotations are not embedded in the saved file; it is a copy of the original PDF.";

/// A copy of the original file, ready to hand to the browser for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedCopy {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub notice: &'static str,
}

/// The original file, for the host's print dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    pub title: String,
    pub bytes: Vec<u8>,
}

/// True if the file is named like a PDF or starts with the PDF magic bytes.
pub fn is_pdf(file_name: &str, bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
        || file_name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("pdf"))
}

/// Human-readable size: `"0 Bytes"`, `"512 Bytes"`, `"1.5 KB"`, `"2.25 MB"`.
///
/// Two decimals at most, trailing zeros dropped.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    const K: f64 = 1024.0;

    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut exponent = 0;
    while value >= K && exponent < UNITS.len() - 1 {
        value /= K;
        exponent += 1;
    }
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[exponent])
}

/// A successfully parsed document.
#[derive(Debug)]
pub struct LoadedDocument<E> {
    engine: E,
    file_name: String,
    bytes: Vec<u8>,
}

impl<E: DocumentEngine> LoadedDocument<E> {
    /// Check and parse a file.
    pub fn open(file_name: &str, bytes: Vec<u8>) -> Result<Self, LoadError> {
        if bytes.is_empty() {
            return Err(LoadError::Empty {
                file_name: file_name.to_string(),
            });
        }
        if !is_pdf(file_name, &bytes) {
            return Err(LoadError::NotPdf {
                file_name: file_name.to_string(),
            });
        }
        let engine = E::load(&bytes)?;
        log::info!(
            "📂 Opened {} ({}, {} pages)",
            file_name,
            format_file_size(bytes.len() as u64),
            engine.page_count()
        );
        Ok(Self {
            engine,
            file_name: file_name.to_string(),
            bytes,
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn page_count(&self) -> u32 {
        self.engine.page_count()
    }
}

impl<E> LoadedDocument<E> {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The original bytes, unchanged.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Status line, e.g. `"File: report.pdf (1.5 KB)"`.
    pub fn file_info(&self) -> String {
        format!(
            "File: {} ({})",
            self.file_name,
            format_file_size(self.bytes.len() as u64)
        )
    }

    /// Copy of the original file named `modified_<name>`.
    pub fn save_copy(&self) -> SavedCopy {
        log::info!("💾 Saving copy of {}", self.file_name);
        SavedCopy {
            file_name: format!("modified_{}", self.file_name),
            bytes: self.bytes.clone(),
            notice: SAVE_NOTICE,
        }
    }

    pub fn print_job(&self) -> PrintJob {
        PrintJob {
            title: self.file_name.clone(),
            bytes: self.bytes.clone(),
        }
    }
}
