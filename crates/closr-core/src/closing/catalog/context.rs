//! Prose-style catalog: "Loan Amount of $350,000.00", "Interest Rate 5.25%".
//!
//! Patterns run over whitespace-normalized text, so a value never spans a
//! line break. Free-text values stop at a structural boundary: a `;` or `|`,
//! the next known label, or the end of the text.

use crate::error::CatalogError;

use super::super::rules::Normalizer;
use super::{Catalog, Derivation, FieldDef};

/// Labels that end a free-text value.
const NEXT_LABEL: &str = r"Loan\s+(?:No|Number|Amount)|Lender|Borrower|Property\s+(?:Address|Location|Type|Tax)|Purchase\s+Price|Closing\s+Date|Interest\s+Rate|Term\b|Monthly\s+(?:Payment|Rent)|Insurance|Rent\b";

/// Amount after a label: optional "of", ":" or "-", optional "$".
const AMOUNT: &str = r"\s*(?:of\s+|[:\-]\s*)?\$?\s*(\d[\d,]*(?:\.\d+)?)";

fn amount_after(label: &str) -> String {
    format!("{}{}", label, AMOUNT)
}

/// Free text up to the next boundary; periods end the value too. The value
/// must start with a word character or `$`.
fn text_after(label: &str) -> String {
    format!(
        r"{}\s*[:\-]?\s*([\w$].*?)(?:\s*[;|]|\.(?:\s|$)|\s+(?:{})|$)",
        label, NEXT_LABEL
    )
}

/// Address up to the next boundary; periods are part of the value ("St.").
fn address_after(label: &str) -> String {
    format!(
        r"{}\s*[:\-]?\s*([\w#].*?)(?:\s*[;|]|\s+(?:{})|$)",
        label, NEXT_LABEL
    )
}

pub(super) fn build() -> Result<Catalog, CatalogError> {
    let property_address = r"Property\s+(?:Address|Location)";

    Catalog::builder("context")
        .sections(&[
            "loan",
            "lender",
            "borrower",
            "property",
            "financial",
            "taxes",
            "insurance",
            "lease",
        ])
        .field(
            FieldDef::context(
                "loan_number",
                &[r"Loan\s+(?:No\.?|Number|#)\s*[:\-#]?\s*(\d[0-9A-Za-z\-]*)"],
                Normalizer::Raw,
            )
            .to("loan.number"),
        )
        .field(
            FieldDef::context("loan_amount", &[amount_after(r"Loan\s+Amount").as_str()], Normalizer::Currency)
                .to("loan.amount"),
        )
        .field(
            FieldDef::context(
                "lender_name",
                &[r#"\bfrom\s+([^(]{1,120}?)\s*\(\s*(?:“|"|â€œ)?\s*Lender"#],
                Normalizer::Text,
            )
            .or(text_after(r"\bLender\s*[:\-]"))
            .to("lender.name"),
        )
        .field(
            FieldDef::context(
                "borrower_name",
                &[r#"\bto\s+([^(]{1,120}?)\s*\(\s*(?:“|"|â€œ)?\s*Borrower"#],
                Normalizer::Text,
            )
            .or(text_after(r"\bBorrower\s*[:\-]"))
            .to("borrower.name"),
        )
        .field(
            FieldDef::context(
                "property_address",
                &[format!(
                    r"{}\s*[:\-]?\s*(.{{1,80}}?,\s*[^,]{{1,40}}?,\s*(?-i:[A-Z]{{2}})\b(?:\s+\d{{5}}(?:-\d{{4}})?)?)",
                    property_address
                )
                .as_str()],
                Normalizer::Address,
            )
            .or(address_after(property_address))
            .to("property"),
        )
        .field(
            FieldDef::context("property_type", &[text_after(r"Property\s+Type").as_str()], Normalizer::Text)
                .to("property.type"),
        )
        .field(
            FieldDef::context("purchase_price", &[amount_after(r"Purchase\s+Price").as_str()], Normalizer::Currency)
                .to("financial.purchase_price"),
        )
        .field(
            FieldDef::context(
                "closing_date",
                &[r"Closing\s+Date\s*(?:of\s+|on\s+|[:\-]\s*)?(\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4})"],
                Normalizer::Date,
            )
            .or(r"Closing\s+Date\s*(?:of\s+|on\s+|[:\-]\s*)?((?-i:[A-Z])[a-z]{2,8}\.?\s+\d{1,2},?\s+\d{4})")
            .to("financial.closing_date"),
        )
        .derive(Derivation::TransactionKind {
            destination: "financial.transaction_kind".to_string(),
        })
        .field(
            FieldDef::context(
                "interest_rate",
                &[r"Interest\s+Rate\s*(?:of\s+|[:\-]\s*)?(\d+(?:\.\d+)?)\s*%?"],
                Normalizer::Percentage,
            )
            .to("loan.interest_rate"),
        )
        .field(
            FieldDef::context(
                "term_years",
                &[r"\bTerm\s*(?:of\s+|[:\-]\s*)?(\d+)\s*(?:years?|yrs?)\b"],
                Normalizer::Integer,
            )
            .to("loan.term_years"),
        )
        .field(
            FieldDef::context("monthly_payment", &[amount_after(r"Monthly\s+Payment").as_str()], Normalizer::Currency)
                .to("loan.monthly_payment"),
        )
        .field(
            FieldDef::context("property_tax", &[amount_after(r"Property\s+Tax(?:es)?").as_str()], Normalizer::Currency)
                .to("taxes.annual_amount"),
        )
        .field(
            FieldDef::context(
                "insurance",
                &[amount_after(r"\bInsurance(?:\s+Premium)?").as_str()],
                Normalizer::Currency,
            )
            .to("insurance.annual_premium"),
        )
        .field(
            FieldDef::context("monthly_rent", &[amount_after(r"\b(?:Monthly\s+)?Rent").as_str()], Normalizer::Currency)
                .to("lease.monthly_rent"),
        )
        .build()
}
