//! Builds the nested document from raw captures.

use serde_json::Value;
use tracing::debug;

use crate::models::document::{NormalizedValue, StructuredDocument, TransactionKind};

use super::catalog::{Catalog, Derivation, Slot};
use super::extractor::ExtractedFields;
use super::rules::{build_schedule, split_owners};

/// Classify the packet from its text: any mention of "refinance" wins.
pub fn classify_transaction(text: &str) -> TransactionKind {
    if text.to_lowercase().contains("refinance") {
        TransactionKind::Refinance
    } else {
        TransactionKind::Purchase
    }
}

/// Assemble the schema-complete document for `catalog`.
///
/// `text` is the normalized document text, used by text-level derivations.
pub fn assemble(extracted: &ExtractedFields, catalog: &Catalog, text: &str) -> StructuredDocument {
    assemble_with_report(extracted, catalog, text).0
}

/// Like [`assemble`], also returning the fields whose capture did not
/// normalize.
pub(crate) fn assemble_with_report(
    extracted: &ExtractedFields,
    catalog: &Catalog,
    text: &str,
) -> (StructuredDocument, Vec<String>) {
    let mut doc = skeleton(catalog);
    let mut unparsed = Vec::new();

    for slot in catalog.layout() {
        match *slot {
            Slot::Field(idx) => {
                let field = &catalog.fields()[idx];
                let Some(destination) = &field.destination else {
                    continue;
                };
                let raw = extracted.get(&field.name);
                let value = field.normalizer.apply(raw);
                if raw.is_some() && value.is_none() {
                    debug!("{} did not normalize as {}", field.name, field.normalizer.name());
                    unparsed.push(field.name.clone());
                }
                write_value(&mut doc, destination, value);
            }
            Slot::Derived(idx) => {
                let derivation = &catalog.derived()[idx];
                let value = derive(derivation, extracted, text);
                doc.set(derivation.destination(), value);
            }
        }
    }

    (doc, unparsed)
}

/// Every section and leaf of `catalog`, set to its default.
fn skeleton(catalog: &Catalog) -> StructuredDocument {
    let mut doc = StructuredDocument::new();
    for section in catalog.sections() {
        doc.ensure_object(section);
    }

    for slot in catalog.layout() {
        match *slot {
            Slot::Field(idx) => {
                for leaf in catalog.fields()[idx].leaves() {
                    doc.set(&leaf, Value::Null);
                }
            }
            Slot::Derived(idx) => {
                let derivation = &catalog.derived()[idx];
                let default = match derivation {
                    Derivation::Owners { .. } => Value::Array(Vec::new()),
                    Derivation::TransactionKind { .. } | Derivation::PenaltySchedule { .. } => Value::Null,
                };
                doc.set(derivation.destination(), default);
            }
        }
    }
    doc
}

fn write_value(doc: &mut StructuredDocument, destination: &str, value: Option<NormalizedValue>) {
    match value {
        Some(NormalizedValue::Address(parts)) => {
            if let Value::Object(map) = NormalizedValue::Address(parts).to_json() {
                for (key, leaf) in map {
                    doc.set(&format!("{}.{}", destination, key), leaf);
                }
            }
        }
        Some(value) => doc.set(destination, value.to_json()),
        None => doc.set(destination, Value::Null),
    }
}

fn derive(derivation: &Derivation, extracted: &ExtractedFields, text: &str) -> Value {
    match derivation {
        Derivation::TransactionKind { .. } => Value::String(classify_transaction(text).as_str().to_string()),
        Derivation::Owners { names, email, phone, .. } => {
            let owners = split_owners(
                extracted.get(names),
                email.as_deref().and_then(|f| extracted.get(f)),
                phone.as_deref().and_then(|f| extracted.get(f)),
            );
            serde_json::to_value(owners).unwrap_or_else(|_| Value::Array(Vec::new()))
        }
        Derivation::PenaltySchedule { years, .. } => {
            let schedule = build_schedule(
                years
                    .iter()
                    .enumerate()
                    .map(|(i, name)| ((i + 1) as u8, extracted.get(name))),
            );
            match schedule {
                Some(steps) => serde_json::to_value(steps).unwrap_or(Value::Null),
                None => Value::Null,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::closing::catalog::Vocabulary;
    use crate::closing::extractor::extract;
    use crate::closing::text::normalize;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn line_doc(text: &str) -> StructuredDocument {
        let catalog = Vocabulary::Line.catalog().unwrap();
        assemble(&extract(text, catalog), catalog, &normalize(text))
    }

    fn context_doc(text: &str) -> StructuredDocument {
        let catalog = Vocabulary::Context.catalog().unwrap();
        let normalized = normalize(text);
        assemble(&extract(&normalized, catalog), catalog, &normalized)
    }

    #[test]
    fn test_classify_transaction() {
        assert_eq!(classify_transaction("This REFINANCE agreement"), TransactionKind::Refinance);
        assert_eq!(classify_transaction("Purchase agreement"), TransactionKind::Purchase);
        assert_eq!(classify_transaction(""), TransactionKind::Purchase);
    }

    #[test]
    fn test_context_skeleton_on_empty_text() {
        let doc = context_doc("");

        assert_eq!(
            doc.sections().collect::<Vec<_>>(),
            vec!["loan", "lender", "borrower", "property", "financial", "taxes", "insurance", "lease"]
        );
        assert_eq!(doc.get("loan.amount"), Some(&Value::Null));
        assert_eq!(doc.get("property.zip"), Some(&Value::Null));
        assert_eq!(doc.get_str("financial.transaction_kind"), Some("purchase"));
    }

    #[test]
    fn test_line_skeleton_on_empty_text() {
        let doc = line_doc("");

        assert_eq!(doc.get("owner.individuals"), Some(&json!([])));
        assert_eq!(doc.get("loan.prepay_steps"), Some(&Value::Null));
        assert_eq!(doc.get("loan.prepayment_penalty"), Some(&json!(false)));
        assert_eq!(doc.get("insurance.coverages.dwelling"), Some(&Value::Null));
        assert_eq!(doc.get("lease.net_monthly_income"), Some(&Value::Null));
    }

    #[test]
    fn test_context_values() {
        let doc = context_doc(
            "This Refinance Note: Loan Amount of $350,000.00. Interest Rate 5.25%. \
             Property Address: 123 Main St, Springfield, IL 62704; Closing Date: 01/15/2024",
        );

        assert_eq!(doc.get_f64("loan.amount"), Some(350000.0));
        assert_eq!(doc.get_f64("loan.interest_rate"), Some(5.25));
        assert_eq!(doc.get_str("property.city"), Some("Springfield"));
        assert_eq!(doc.get_str("property.zip"), Some("62704"));
        assert_eq!(doc.get_str("property.full_address"), Some("123 Main St, Springfield, IL 62704"));
        assert_eq!(doc.get_str("financial.closing_date"), Some("2024-01-15"));
        assert_eq!(doc.get_str("financial.transaction_kind"), Some("refinance"));
    }

    #[test]
    fn test_owners_share_contact() {
        let doc = line_doc(
            "OWNER NAME Jane Doe, John Doe, & Jim Doe\n\
             OWNER EMAIL ADDRESS owners@example.com\n",
        );

        assert_eq!(
            doc.get("owner.individuals"),
            Some(&json!([
                {"full_name": "Jane Doe", "email": "owners@example.com", "phone": null},
                {"full_name": "John Doe", "email": "owners@example.com", "phone": null},
                {"full_name": "Jim Doe", "email": "owners@example.com", "phone": null},
            ]))
        );
    }

    #[test]
    fn test_penalty_schedule() {
        let doc = line_doc("PRE-PAYMENT PENALTY Yes\nYEAR 1 5%\nYEAR 3 3%\nYEAR 5 1%\n");

        assert_eq!(doc.get("loan.prepayment_penalty"), Some(&json!(true)));
        assert_eq!(
            doc.get("loan.prepay_steps"),
            Some(&json!([
                {"year": 1, "pct": 5.0},
                {"year": 3, "pct": 3.0},
                {"year": 5, "pct": 1.0},
            ]))
        );
    }

    #[test]
    fn test_unparsed_fields_reported() {
        let catalog = Vocabulary::Line.catalog().unwrap();
        let text = "LOAN AMOUNT TBD\nINTEREST RATE 6.5\n";
        let (doc, unparsed) = assemble_with_report(&extract(text, catalog), catalog, text);

        assert_eq!(doc.get("loan.principal"), Some(&Value::Null));
        assert_eq!(doc.get_f64("loan.interest_rate_apy"), Some(6.5));
        assert_eq!(unparsed, vec!["loan_amount".to_string()]);
    }
}
