//! Locates raw field values in text.

use tracing::debug;

use super::catalog::{Catalog, Pattern};
use super::text::collapse_whitespace;

/// Raw captures keyed by field name, in catalog order.
///
/// Every catalog field has an entry; `None` means the label was not found
/// or its value was empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    entries: Vec<(String, Option<String>)>,
}

impl ExtractedFields {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(field, _)| field == name)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(field, _)| field == name)
    }

    /// Fields that captured a value.
    pub fn found(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(name, value)| Some((name.as_str(), value.as_deref()?)))
    }

    /// Fields with no capture.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Apply every field pattern of `catalog` to `text`.
///
/// Context fields search `text` as given (callers pass normalized text).
/// Line fields scan physical lines; the first line carrying a field's label
/// wins, even when its value is empty.
pub fn extract(text: &str, catalog: &Catalog) -> ExtractedFields {
    let mut values: Vec<Option<String>> = vec![None; catalog.fields().len()];

    let has_line_fields = catalog
        .fields()
        .iter()
        .any(|f| matches!(f.pattern, Pattern::Line(_)));
    if has_line_fields {
        let mut seen = vec![false; values.len()];
        for line in text.lines() {
            let Some((idx, offset)) = catalog.match_line_label(line, true) else {
                continue;
            };
            if seen[idx] {
                continue;
            }
            seen[idx] = true;
            values[idx] = line_value(&line[offset..]);
        }
    }

    for (idx, field) in catalog.fields().iter().enumerate() {
        if let Pattern::Context(regexes) = &field.pattern {
            values[idx] = regexes.iter().find_map(|regex| {
                let captures = regex.captures(text)?;
                let value = collapse_whitespace(captures.get(1)?.as_str());
                (!value.is_empty()).then_some(value)
            });
        }
    }

    let entries: Vec<(String, Option<String>)> = catalog
        .fields()
        .iter()
        .zip(values)
        .map(|(field, value)| (field.name.clone(), value))
        .collect();

    for (name, value) in &entries {
        debug!("{}: {}", name, value.as_deref().unwrap_or("<absent>"));
    }

    ExtractedFields { entries }
}

/// Rest of a labeled line: trimmed, one leading `:` dropped.
fn line_value(rest: &str) -> Option<String> {
    let rest = rest.trim();
    let rest = rest.strip_prefix(':').unwrap_or(rest).trim();
    (!rest.is_empty()).then(|| rest.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::closing::catalog::{FieldDef, Vocabulary};
    use crate::closing::rules::Normalizer;
    use crate::closing::text::normalize;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_context_extraction() {
        let catalog = Vocabulary::Context.catalog().unwrap();
        let text = normalize("Loan Amount of $350,000.00 and an Interest Rate 5.25% fixed.");
        let fields = extract(&text, catalog);

        assert_eq!(fields.get("loan_amount"), Some("350,000.00"));
        assert_eq!(fields.get("interest_rate"), Some("5.25"));
        assert_eq!(fields.get("borrower_name"), None);
        assert_eq!(fields.len(), catalog.fields().len());
    }

    #[test]
    fn test_context_first_match_wins() {
        let catalog = Vocabulary::Context.catalog().unwrap();
        let fields = extract("Loan Amount: $100 ... Loan Amount: $200", catalog);
        assert_eq!(fields.get("loan_amount"), Some("100"));
    }

    #[test]
    fn test_context_free_text_stops_at_boundary() {
        let catalog = Vocabulary::Context.catalog().unwrap();
        let text = "Property Type: Single Family Residence; Purchase Price $400,000";
        let fields = extract(text, catalog);

        assert_eq!(fields.get("property_type"), Some("Single Family Residence"));
        assert_eq!(fields.get("purchase_price"), Some("400,000"));
    }

    #[test]
    fn test_context_address_stops_at_zip() {
        let catalog = Vocabulary::Context.catalog().unwrap();
        let text = "Property Address: 123 Main St, Springfield, IL 62704 Purchase Price $1";
        let fields = extract(text, catalog);

        assert_eq!(fields.get("property_address"), Some("123 Main St, Springfield, IL 62704"));
    }

    #[test]
    fn test_line_extraction() {
        let catalog = Vocabulary::Line.catalog().unwrap();
        let text = "OWNER NAME Jane Doe and John Doe\n\
                    PROPERTY TYPE Single Family\n\
                    PROPERTY TYPE 2 Rental\n\
                    loan amount: 350,000\n\
                    LOAN AMOUNT 999\n\
                    CITY\n";
        let fields = extract(text, catalog);

        assert_eq!(fields.get("owner_name"), Some("Jane Doe and John Doe"));
        assert_eq!(fields.get("property_type"), Some("Single Family"));
        assert_eq!(fields.get("property_type_2"), Some("Rental"));
        assert_eq!(fields.get("loan_amount"), Some("350,000"));
        assert_eq!(fields.get("city"), None);
        assert!(fields.contains("city"));
    }

    #[test]
    fn test_line_label_mid_line_ignored() {
        let catalog = Vocabulary::Line.catalog().unwrap();
        let fields = extract("Note: LOAN AMOUNT 350,000", catalog);
        assert_eq!(fields.get("loan_amount"), None);
    }

    #[test]
    fn test_line_first_labeled_line_locks_field() {
        let catalog = Vocabulary::Line.catalog().unwrap();
        let fields = extract("CITY\nCITY Springfield\n", catalog);
        assert_eq!(fields.get("city"), None);
    }

    #[test]
    fn test_context_punctuation_only_value_is_absent() {
        let catalog = Vocabulary::Context.catalog().unwrap();
        let fields = extract("Property Type: ; Purchase Price $1", catalog);

        assert_eq!(fields.get("property_type"), None);
        assert_eq!(fields.get("purchase_price"), Some("1"));
    }

    #[test]
    fn test_found_and_missing_partition() {
        let catalog = Catalog::builder("t")
            .sections(&["loan"])
            .field(FieldDef::line("a", "A", Normalizer::Text).to("loan.a"))
            .field(FieldDef::line("b", "B", Normalizer::Text).to("loan.b"))
            .build()
            .unwrap();
        let fields = extract("A x\n", &catalog);

        assert_eq!(fields.found().collect::<Vec<_>>(), vec![("a", "x")]);
        assert_eq!(fields.missing().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_empty_text() {
        let catalog = Vocabulary::Context.catalog().unwrap();
        let fields = extract("", catalog);
        assert_eq!(fields.found().count(), 0);
    }
}
