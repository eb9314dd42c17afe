//! Core library for real-estate closing-packet extraction.
//!
//! This crate provides:
//! - Text normalization and value normalizers (currency, percentage, dates, addresses)
//! - Declarative field catalogs for prose-style and form-style packets
//! - Catalog-driven extraction into a schema-complete JSON document
//! - PDF text-layer reading (feature `pdf`)

pub mod closing;
pub mod error;
pub mod models;
#[cfg(feature = "pdf")]
pub mod pdf;

pub use closing::{
    Catalog, ClosingExtractor, ClosingParser, DocumentParser, ExtractedFields, ExtractionResult, FieldDef,
    FieldSpec, Normalizer, Vocabulary, assemble, extract, normalize, normalize_value,
};
pub use error::{CatalogError, ClosrError, PdfError, Result};
pub use models::config::{ClosrConfig, VocabularyChoice};
pub use models::document::{NormalizedValue, StructuredDocument};
#[cfg(feature = "pdf")]
pub use pdf::PdfTextReader;
