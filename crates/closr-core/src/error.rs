//! Error types for the closr-core library.
//!
//! Per-field problems (a missing label, a value that does not parse) are not
//! errors: they degrade to `null` in the assembled document. Only structural
//! problems surface here.

use thiserror::Error;

/// Main error type for the closr library.
#[derive(Error, Debug)]
pub enum ClosrError {
    /// Field catalog is misconfigured.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// PDF text-layer error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Structural errors detected while building a field catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A field has an empty name.
    #[error("field with empty name in catalog {catalog}")]
    EmptyName { catalog: String },

    /// Two fields share one name.
    #[error("duplicate field name: {0}")]
    DuplicateName(String),

    /// A destination path has an empty segment.
    #[error("invalid destination path for {field}: {path:?}")]
    InvalidPath { field: String, path: String },

    /// A destination path starts outside the declared sections.
    #[error("destination {path} of {field} is not under a declared section")]
    UnknownSection { field: String, path: String },

    /// Two writers target the same leaf.
    #[error("destination {path} is written by both {first} and {second}")]
    DuplicateDestination {
        path: String,
        first: String,
        second: String,
    },

    /// A leaf path is also the parent of another path.
    #[error("destination {leaf} is both a value and a parent of {child}")]
    PathConflict { leaf: String, child: String },

    /// Two line-style fields share one label.
    #[error("duplicate line label: {0}")]
    DuplicateLabel(String),

    /// A derived rule references a field the catalog does not define.
    #[error("derived rule {rule} references unknown field {field}")]
    UnknownField { rule: String, field: String },

    /// A field pattern failed to compile.
    #[error("invalid pattern for {field}: {reason}")]
    Pattern { field: String, reason: String },
}

/// Errors related to reading the PDF text layer.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to parse the PDF or decode its text layer.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF has no text layer (scanned document).
    #[error("PDF has no extractable text")]
    NoText,
}

/// Result type for the closr library.
pub type Result<T> = std::result::Result<T, ClosrError>;
