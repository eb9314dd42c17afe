//! `_debug` metadata attached to assembled documents.

use serde_json::{Map, Value, json};

use crate::models::document::StructuredDocument;

use super::extractor::ExtractedFields;

/// Key of the diagnostics section.
pub const DEBUG_SECTION: &str = "_debug";

/// Default number of characters kept in `text_sample`.
pub const DEFAULT_SAMPLE_CHARS: usize = 500;

/// Build the `_debug` value: text length, a text sample and the raw captures.
///
/// Lengths and the sample count characters, not bytes.
pub fn debug_section(text: &str, extracted: &ExtractedFields, sample_chars: usize) -> Value {
    let text_length = text.chars().count();
    let mut sample: String = text.chars().take(sample_chars).collect();
    if text_length > sample_chars {
        sample.push_str("...");
    }

    let fields: Map<String, Value> = extracted
        .found()
        .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
        .collect();

    json!({
        "text_length": text_length,
        "text_sample": sample,
        "extracted_fields": fields,
    })
}

/// Attach `_debug` as the last top-level section of `doc`.
pub fn attach(doc: &mut StructuredDocument, text: &str, extracted: &ExtractedFields, sample_chars: usize) {
    doc.set(DEBUG_SECTION, debug_section(text, extracted, sample_chars));
}
