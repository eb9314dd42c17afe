//! The structured closing record and its typed leaf values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A typed value produced by a normalizer.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedValue {
    /// Currency amount.
    Amount(f64),
    /// Percentage as written (5.25% is 5.25).
    Percentage(f64),
    /// Whole number.
    Integer(i64),
    /// Yes/no flag.
    Boolean(bool),
    /// Calendar date.
    Date(NaiveDate),
    /// Free text.
    Text(String),
    /// Decomposed single-line address.
    Address(AddressParts),
}

impl NormalizedValue {
    /// Convert to a JSON value. Non-finite numbers become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Amount(v) | Self::Percentage(v) => float_to_json(*v),
            Self::Integer(v) => Value::from(*v),
            Self::Boolean(v) => Value::Bool(*v),
            Self::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            Self::Text(s) => Value::String(s.clone()),
            Self::Address(parts) => parts.to_json(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Amount(v) | Self::Percentage(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }
}

pub(crate) fn float_to_json(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

/// Components of a `"<street>, <city>, <ST> [ZIP]"` address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressParts {
    /// The address as captured.
    pub full_address: Option<String>,
    /// Street line.
    pub address: Option<String>,
    pub city: Option<String>,
    /// Two-letter state code.
    pub state: Option<String>,
    /// Five-digit or ZIP+4 code.
    pub zip: Option<String>,
}

impl AddressParts {
    /// Leaf keys written by an address value, in output order.
    pub const KEYS: [&'static str; 5] = ["full_address", "address", "city", "state", "zip"];

    pub fn is_empty(&self) -> bool {
        self.full_address.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.zip.is_none()
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (key, value) in Self::KEYS.iter().zip([
            &self.full_address,
            &self.address,
            &self.city,
            &self.state,
            &self.zip,
        ]) {
            map.insert(
                (*key).to_string(),
                value.clone().map(Value::String).unwrap_or(Value::Null),
            );
        }
        Value::Object(map)
    }
}

/// One owner split out of a combined owner-name field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub full_name: String,
    /// Shared owner email captured once in the document.
    pub email: Option<String>,
    /// Shared owner phone captured once in the document.
    pub phone: Option<String>,
}

/// One year of a prepayment-penalty schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyStep {
    pub year: u8,
    pub pct: f64,
}

/// Whether the packet closes a purchase or a refinance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Purchase,
    Refinance,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Refinance => "refinance",
        }
    }
}

/// Nested, schema-complete output record.
///
/// Built by the assembler; read-only for everyone else.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StructuredDocument(Map<String, Value>);

impl StructuredDocument {
    pub(crate) fn new() -> Self {
        Self(Map::new())
    }

    /// Look up a value by dotted path (`loan.amount`).
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Numeric leaf at `path`, if present and not null.
    pub fn get_f64(&self, path: &str) -> Option<f64> {
        self.get(path).and_then(Value::as_f64)
    }

    /// String leaf at `path`, if present and not null.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Top-level section names in output order.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Write `value` at `path`, creating intermediate objects.
    ///
    /// A non-object found on the way is replaced by an object.
    pub(crate) fn set(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = path.split('.').collect();
        let Some((leaf, parents)) = segments.split_last() else {
            return;
        };

        let mut current = &mut self.0;
        for segment in parents {
            let entry = current
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            current = match entry {
                Value::Object(map) => map,
                _ => unreachable!("entry was just made an object"),
            };
        }
        current.insert((*leaf).to_string(), value);
    }

    /// Ensure an (empty) object exists at `path`.
    pub(crate) fn ensure_object(&mut self, path: &str) {
        if self.get(path).is_some_and(Value::is_object) {
            return;
        }
        self.set(path, Value::Object(Map::new()));
    }

    /// Every leaf as `(dotted path, value)`, in output order.
    ///
    /// Arrays are leaves; objects are descended into.
    pub fn leaves(&self) -> Vec<(String, &Value)> {
        let mut out = Vec::new();
        for (key, value) in &self.0 {
            collect_leaves(key.clone(), value, &mut out);
        }
        out
    }

    /// Serialize to JSON text.
    pub fn to_json_string(&self, pretty: bool, ascii_only: bool) -> serde_json::Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(&self.0)?
        } else {
            serde_json::to_string(&self.0)?
        };
        Ok(if ascii_only { escape_non_ascii(&json) } else { json })
    }
}

fn collect_leaves<'a>(path: String, value: &'a Value, out: &mut Vec<(String, &'a Value)>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                collect_leaves(format!("{}.{}", path, key), child, out);
            }
        }
        _ => out.push((path, value)),
    }
}

/// Replace every non-ASCII character with a `\uXXXX` escape.
///
/// Only valid on serialized JSON, where such characters can only occur inside
/// string literals.
pub fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_set_creates_intermediate_objects() {
        let mut doc = StructuredDocument::new();
        doc.set("loan.lender.name", json!("First Bank"));
        doc.set("loan.principal", json!(1000.0));

        assert_eq!(doc.get_str("loan.lender.name"), Some("First Bank"));
        assert_eq!(doc.get_f64("loan.principal"), Some(1000.0));
        assert_eq!(doc.sections().collect::<Vec<_>>(), vec!["loan"]);
    }

    #[test]
    fn test_get_missing_path() {
        let mut doc = StructuredDocument::new();
        doc.set("loan.principal", Value::Null);

        assert_eq!(doc.get("loan.principal"), Some(&Value::Null));
        assert_eq!(doc.get("loan.principal.extra"), None);
        assert_eq!(doc.get("taxes"), None);
        assert_eq!(doc.get_f64("loan.principal"), None);
    }

    #[test]
    fn test_non_finite_amount_is_null() {
        assert_eq!(NormalizedValue::Amount(f64::INFINITY).to_json(), Value::Null);
        assert_eq!(NormalizedValue::Percentage(5.25).to_json(), json!(5.25));
    }

    #[test]
    fn test_date_serializes_as_iso() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(NormalizedValue::Date(date).to_json(), json!("2024-01-15"));
    }

    #[test]
    fn test_address_json_keeps_all_keys() {
        let parts = AddressParts {
            address: Some("123 Main St".to_string()),
            ..Default::default()
        };
        assert_eq!(
            NormalizedValue::Address(parts).to_json(),
            json!({
                "full_address": null,
                "address": "123 Main St",
                "city": null,
                "state": null,
                "zip": null
            })
        );
    }

    #[test]
    fn test_leaves_in_order() {
        let mut doc = StructuredDocument::new();
        doc.set("loan.lender.name", json!("First Bank"));
        doc.set("loan.principal", Value::Null);
        doc.set("owner.individuals", json!([]));

        let leaves: Vec<(String, Value)> = doc.leaves().into_iter().map(|(p, v)| (p, v.clone())).collect();
        assert_eq!(
            leaves,
            vec![
                ("loan.lender.name".to_string(), json!("First Bank")),
                ("loan.principal".to_string(), Value::Null),
                ("owner.individuals".to_string(), json!([])),
            ]
        );
    }

    #[test]
    fn test_ascii_escaping() {
        let mut doc = StructuredDocument::new();
        doc.set("lender.name", json!("Señor Bank 🏦"));

        let out = doc.to_json_string(false, true).unwrap();
        assert_eq!(out, r#"{"lender":{"name":"Se\u00f1or Bank \ud83c\udfe6"}}"#);

        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["lender"]["name"], json!("Señor Bank 🏦"));
    }
}
