//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::closing::Vocabulary;

/// Main configuration for closr.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosrConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output rendering configuration.
    pub output: OutputConfig,
}

/// Which label vocabulary to apply to a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyChoice {
    /// Detect the vocabulary from the document text.
    #[default]
    Auto,
    /// Prose-style labels ("Loan Amount of $X").
    Context,
    /// One uppercase label per line ("LOAN AMOUNT X").
    Line,
}

impl VocabularyChoice {
    /// Resolve to a concrete vocabulary for the given text.
    pub fn resolve(self, text: &str) -> Vocabulary {
        match self {
            Self::Auto => Vocabulary::detect(text),
            Self::Context => Vocabulary::Context,
            Self::Line => Vocabulary::Line,
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "context" => Some(Self::Context),
            "line" => Some(Self::Line),
            _ => None,
        }
    }
}

impl From<Vocabulary> for VocabularyChoice {
    fn from(vocabulary: Vocabulary) -> Self {
        match vocabulary {
            Vocabulary::Context => Self::Context,
            Vocabulary::Line => Self::Line,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Label vocabulary selection.
    pub vocabulary: VocabularyChoice,

    /// Attach the `_debug` section. `None` uses the vocabulary default.
    pub diagnostics: Option<bool>,

    /// Number of characters kept in the `_debug.text_sample`.
    pub debug_sample_chars: usize,

    /// Report catalog fields that were not found as warnings.
    pub warn_on_missing: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            vocabulary: VocabularyChoice::Auto,
            diagnostics: None,
            debug_sample_chars: 500,
            warn_on_missing: true,
        }
    }
}

/// Output rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: bool,

    /// Escape every non-ASCII character in JSON output.
    pub ascii_only: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            ascii_only: false,
        }
    }
}

impl ClosrConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ClosrConfig =
            serde_json::from_str(r#"{"extraction": {"vocabulary": "line"}}"#).unwrap();

        assert_eq!(config.extraction.vocabulary, VocabularyChoice::Line);
        assert_eq!(config.extraction.debug_sample_chars, 500);
        assert_eq!(config.extraction.diagnostics, None);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_vocabulary_choice_parsing() {
        assert_eq!(VocabularyChoice::from_name("AUTO"), Some(VocabularyChoice::Auto));
        assert_eq!(VocabularyChoice::from_name(" context "), Some(VocabularyChoice::Context));
        assert_eq!(VocabularyChoice::from_name("form"), None);
    }

    #[test]
    fn test_explicit_choice_ignores_text() {
        assert_eq!(VocabularyChoice::Context.resolve("LOAN AMOUNT 1\nOWNER NAME x\nCITY y"), Vocabulary::Context);
        assert_eq!(VocabularyChoice::Line.resolve(""), Vocabulary::Line);
    }
}
