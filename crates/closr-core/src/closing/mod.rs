//! Closing-packet field extraction.
//!
//! Pipeline: text normalization, catalog-driven extraction, assembly into the
//! vocabulary's schema, optional diagnostics.

mod assembler;
pub mod catalog;
pub mod diagnostics;
mod extractor;
mod parser;
pub mod rules;
pub mod text;

pub use assembler::{assemble, classify_transaction};
pub use catalog::{Catalog, CatalogBuilder, Derivation, FieldDef, FieldSpec, Pattern, Vocabulary};
pub use extractor::{ExtractedFields, extract};
pub use parser::{ClosingParser, DocumentParser, ExtractionResult};
pub use rules::{Normalizer, normalize_value};
pub use text::normalize;

use crate::error::Result;
use crate::models::document::StructuredDocument;

/// Trait for closing-packet extractors.
pub trait ClosingExtractor {
    /// Extract the structured document from plain text.
    fn extract_document(&self, text: &str) -> Result<StructuredDocument>;
}
