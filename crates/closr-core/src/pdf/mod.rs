//! PDF text-layer reading.
//!
//! Closing packets are usually exported as text PDFs; scanned packets have no
//! text layer and are reported as [`PdfError::NoText`].

use std::path::Path;

use tracing::{debug, warn};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Reads the text layer of a PDF held in memory.
#[derive(Debug, Default)]
pub struct PdfTextReader {
    raw_data: Vec<u8>,
}

impl PdfTextReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a PDF from bytes.
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        if !data.starts_with(PDF_MAGIC) {
            return Err(PdfError::TextExtraction("missing %PDF header".to_string()));
        }
        self.raw_data = data.to_vec();
        debug!("Loaded PDF ({} bytes)", data.len());
        Ok(())
    }

    /// Load a PDF file from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| PdfError::TextExtraction(e.to_string()))?;
        let mut reader = Self::new();
        reader.load(&data)?;
        Ok(reader)
    }

    /// Extract the text of every page.
    pub fn extract_text(&self) -> Result<String> {
        if self.raw_data.is_empty() {
            return Err(PdfError::TextExtraction("no PDF loaded".to_string()));
        }

        let text = pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        if text.trim().is_empty() {
            warn!("PDF has no text layer; scanned packets need OCR first");
            return Err(PdfError::NoText);
        }
        Ok(text)
    }
}

/// Extract the text layer of a PDF in one call.
pub fn extract_text(data: &[u8]) -> Result<String> {
    let mut reader = PdfTextReader::new();
    reader.load(data)?;
    reader.extract_text()
}
