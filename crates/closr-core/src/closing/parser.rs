//! Closing-packet parser: text in, structured document out.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::Result;
use crate::models::config::{ExtractionConfig, VocabularyChoice};
use crate::models::document::StructuredDocument;

use super::assembler::assemble_with_report;
use super::catalog::{Pattern, Vocabulary};
use super::diagnostics::{self, DEFAULT_SAMPLE_CHARS};
use super::extractor::{ExtractedFields, extract};
use super::text::normalize;
use super::ClosingExtractor;

/// Result of parsing one document.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Assembled document.
    pub document: StructuredDocument,
    /// Vocabulary the document was read with.
    pub vocabulary: Vocabulary,
    /// Raw captures before normalization.
    pub extracted: ExtractedFields,
    /// Missing fields and values that failed to normalize.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for closing-packet parsing.
pub trait DocumentParser {
    /// Parse a document from its plain text.
    fn parse(&self, text: &str) -> Result<ExtractionResult>;
}

/// Catalog-driven parser for closing packets.
#[derive(Debug, Clone)]
pub struct ClosingParser {
    vocabulary: VocabularyChoice,
    /// `None` uses the vocabulary default.
    diagnostics: Option<bool>,
    sample_chars: usize,
    warn_on_missing: bool,
}

impl Default for ClosingParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ClosingParser {
    /// Create a parser that detects the vocabulary per document.
    pub fn new() -> Self {
        Self {
            vocabulary: VocabularyChoice::Auto,
            diagnostics: None,
            sample_chars: DEFAULT_SAMPLE_CHARS,
            warn_on_missing: true,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            vocabulary: config.vocabulary,
            diagnostics: config.diagnostics,
            sample_chars: config.debug_sample_chars,
            warn_on_missing: config.warn_on_missing,
        }
    }

    /// Set the vocabulary, or [`VocabularyChoice::Auto`] to detect it.
    pub fn with_vocabulary(mut self, vocabulary: impl Into<VocabularyChoice>) -> Self {
        self.vocabulary = vocabulary.into();
        self
    }

    /// Force `_debug` on or off.
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = Some(enabled);
        self
    }

    /// Set the `_debug.text_sample` length in characters.
    pub fn with_sample_chars(mut self, chars: usize) -> Self {
        self.sample_chars = chars;
        self
    }

    /// Set whether missing fields produce warnings.
    pub fn with_missing_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_missing = enabled;
        self
    }

    fn run(&self, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();

        let vocabulary = self.vocabulary.resolve(text);
        let catalog = vocabulary.catalog()?;
        let normalized = normalize(text);

        info!(
            "Parsing {} characters with the {} vocabulary",
            normalized.chars().count(),
            vocabulary.name()
        );

        // Line labels are anchored to physical lines, so they need the raw text.
        let has_context_fields = catalog
            .fields()
            .iter()
            .any(|f| matches!(f.pattern, Pattern::Context(_)));
        let extracted = if has_context_fields {
            extract(&normalized, catalog)
        } else {
            extract(text, catalog)
        };

        let (mut document, unparsed) = assemble_with_report(&extracted, catalog, &normalized);

        let mut warnings = Vec::new();
        if self.warn_on_missing {
            warnings.extend(extracted.missing().map(|name| format!("{} not found", name)));
        }
        for name in &unparsed {
            if let Some(raw) = extracted.get(name) {
                warnings.push(format!("{} could not be parsed: {:?}", name, raw));
            }
        }

        if self.diagnostics.unwrap_or_else(|| vocabulary.diagnostics_by_default()) {
            diagnostics::attach(&mut document, &normalized, &extracted, self.sample_chars);
        }

        let processing_time_ms = start.elapsed().as_millis() as u64;
        debug!(
            "Extracted {}/{} fields in {}ms",
            extracted.found().count(),
            extracted.len(),
            processing_time_ms
        );

        Ok(ExtractionResult {
            document,
            vocabulary,
            extracted,
            warnings,
            processing_time_ms,
        })
    }
}

impl DocumentParser for ClosingParser {
    fn parse(&self, text: &str) -> Result<ExtractionResult> {
        self.run(text)
    }
}

impl ClosingExtractor for ClosingParser {
    fn extract_document(&self, text: &str) -> Result<StructuredDocument> {
        Ok(self.run(text)?.document)
    }
}
