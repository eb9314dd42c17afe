//! Value normalizers for closing-packet fields.
//!
//! Every normalizer is total: absent input gives absent output (except
//! [`Normalizer::Boolean`], which reads absence as "no"), and a value that
//! cannot be coerced gives `None` instead of an error.

pub mod address;
pub mod amounts;
pub mod dates;
pub mod owners;
pub mod patterns;
pub mod penalty;

pub use address::decompose_address;
pub use amounts::{parse_currency, parse_integer, parse_percentage};
pub use dates::parse_date;
pub use owners::{split_owner_names, split_owners};
pub use penalty::build_schedule;

use crate::closing::text::collapse_whitespace;
use crate::models::document::NormalizedValue;

/// How a captured string becomes a typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalizer {
    /// Whitespace-collapsed text.
    Text,
    /// The capture exactly as extracted.
    Raw,
    /// Currency amount.
    Currency,
    /// Percentage as written.
    Percentage,
    /// Whole number.
    Integer,
    /// `yes` → true, anything else (including absence) → false.
    Boolean,
    /// Calendar date.
    Date,
    /// Street, city, state and ZIP components.
    Address,
}

impl Normalizer {
    /// Apply this normalizer to an optional raw capture.
    pub fn apply(&self, raw: Option<&str>) -> Option<NormalizedValue> {
        if let Self::Boolean = self {
            let yes = raw.is_some_and(|r| r.trim().eq_ignore_ascii_case("yes"));
            return Some(NormalizedValue::Boolean(yes));
        }

        let raw = raw?;
        match self {
            Self::Text => {
                let text = collapse_whitespace(raw);
                (!text.is_empty()).then_some(NormalizedValue::Text(text))
            }
            Self::Raw => (!raw.is_empty()).then(|| NormalizedValue::Text(raw.to_string())),
            Self::Currency => parse_currency(raw).map(NormalizedValue::Amount),
            Self::Percentage => parse_percentage(raw).map(NormalizedValue::Percentage),
            Self::Integer => parse_integer(raw).map(NormalizedValue::Integer),
            Self::Date => parse_date(raw).map(NormalizedValue::Date),
            Self::Address => {
                let parts = decompose_address(raw);
                (!parts.is_empty()).then_some(NormalizedValue::Address(parts))
            }
            Self::Boolean => unreachable!("handled above"),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Raw => "raw",
            Self::Currency => "currency",
            Self::Percentage => "percentage",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Address => "address",
        }
    }
}

/// Normalize `raw` with the normalizer selected by `kind`.
pub fn normalize_value(kind: Normalizer, raw: Option<&str>) -> Option<NormalizedValue> {
    kind.apply(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_absent_input_stays_absent() {
        for kind in [
            Normalizer::Text,
            Normalizer::Raw,
            Normalizer::Currency,
            Normalizer::Percentage,
            Normalizer::Integer,
            Normalizer::Date,
            Normalizer::Address,
        ] {
            assert_eq!(normalize_value(kind, None), None, "{}", kind.name());
        }
    }

    #[test]
    fn test_boolean_reads_absence_as_false() {
        assert_eq!(
            normalize_value(Normalizer::Boolean, None),
            Some(NormalizedValue::Boolean(false))
        );
        assert_eq!(
            normalize_value(Normalizer::Boolean, Some(" YES ")),
            Some(NormalizedValue::Boolean(true))
        );
        assert_eq!(
            normalize_value(Normalizer::Boolean, Some("yes, 3 years")),
            Some(NormalizedValue::Boolean(false))
        );
    }

    #[test]
    fn test_numeric_dispatch() {
        assert_eq!(
            normalize_value(Normalizer::Currency, Some("$1,234.56")),
            Some(NormalizedValue::Amount(1234.56))
        );
        assert_eq!(
            normalize_value(Normalizer::Percentage, Some("5.25%")),
            Some(NormalizedValue::Percentage(5.25))
        );
        assert_eq!(
            normalize_value(Normalizer::Integer, Some("30.0")),
            Some(NormalizedValue::Integer(30))
        );
        assert_eq!(normalize_value(Normalizer::Integer, Some("thirty")), None);
        assert_eq!(normalize_value(Normalizer::Currency, Some("")), None);
    }

    #[test]
    fn test_text_collapses_whitespace() {
        assert_eq!(
            normalize_value(Normalizer::Text, Some("Single   Family\n Residence")),
            Some(NormalizedValue::Text("Single Family Residence".to_string()))
        );
        assert_eq!(normalize_value(Normalizer::Text, Some("  ")), None);
        assert_eq!(
            normalize_value(Normalizer::Raw, Some("A  B")),
            Some(NormalizedValue::Text("A  B".to_string()))
        );
    }
}
