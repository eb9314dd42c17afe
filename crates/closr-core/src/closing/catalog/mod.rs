//! Declarative field catalogs.
//!
//! A catalog is data: a list of field definitions (label pattern, normalizer,
//! destination path) plus the derived rules that combine several fields.
//! Everything structural is checked once in [`CatalogBuilder::build`], so
//! extraction itself never has to fail.

mod context;
mod line;

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

use crate::error::CatalogError;
use crate::models::document::AddressParts;

use super::rules::Normalizer;

/// Label vocabulary: how labels appear and which output schema is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vocabulary {
    /// Prose-style labels searched in whitespace-normalized text.
    Context,
    /// One uppercase label per physical line.
    Line,
}

/// Lines starting with an uppercase form label needed to pick [`Vocabulary::Line`].
const LINE_DETECTION_THRESHOLD: usize = 3;

lazy_static! {
    static ref CONTEXT_CATALOG: Result<Catalog, CatalogError> = context::build();
    static ref LINE_CATALOG: Result<Catalog, CatalogError> = line::build();
}

impl Vocabulary {
    /// The built-in catalog for this vocabulary.
    pub fn catalog(&self) -> Result<&'static Catalog, CatalogError> {
        let catalog = match self {
            Self::Context => &*CONTEXT_CATALOG,
            Self::Line => &*LINE_CATALOG,
        };
        catalog.as_ref().map_err(Clone::clone)
    }

    /// Guess the vocabulary from the text layout.
    ///
    /// Form-style packets put uppercase labels at the start of lines; prose
    /// documents mention labels mid-sentence in mixed case.
    pub fn detect(text: &str) -> Self {
        let Ok(catalog) = Self::Line.catalog() else {
            return Self::Context;
        };

        let labeled_lines = text
            .lines()
            .filter(|line| catalog.match_line_label(line, false).is_some())
            .take(LINE_DETECTION_THRESHOLD)
            .count();

        if labeled_lines >= LINE_DETECTION_THRESHOLD {
            Self::Line
        } else {
            Self::Context
        }
    }

    /// Whether `_debug` diagnostics are attached unless configured otherwise.
    pub fn diagnostics_by_default(&self) -> bool {
        matches!(self, Self::Context)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Context => "context",
            Self::Line => "line",
        }
    }
}

/// Uncompiled label pattern of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternDef {
    /// Regular expressions with one capture group, tried in order.
    Context(Vec<String>),
    /// Literal labels at the start of a line; the rest of the line is the value.
    Line(Vec<String>),
}

/// Compiled label pattern of a field.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Case-insensitive expressions over normalized text; first match wins.
    Context(Vec<Regex>),
    /// Uppercase line labels.
    Line(Vec<String>),
}

/// Definition of one field, before validation.
#[derive(Debug, Clone)]
pub struct FieldDef {
    name: String,
    pattern: PatternDef,
    normalizer: Normalizer,
    destination: Option<String>,
}

impl FieldDef {
    /// A field located by one or more regular expressions.
    pub fn context(name: impl Into<String>, patterns: &[&str], normalizer: Normalizer) -> Self {
        Self {
            name: name.into(),
            pattern: PatternDef::Context(patterns.iter().map(|p| p.to_string()).collect()),
            normalizer,
            destination: None,
        }
    }

    /// A field located by a label at the start of a line.
    pub fn line(name: impl Into<String>, label: impl Into<String>, normalizer: Normalizer) -> Self {
        Self {
            name: name.into(),
            pattern: PatternDef::Line(vec![label.into()]),
            normalizer,
            destination: None,
        }
    }

    /// Add an alternative expression or label, tried after the earlier ones.
    pub fn or(mut self, alternative: impl Into<String>) -> Self {
        match &mut self.pattern {
            PatternDef::Context(patterns) => patterns.push(alternative.into()),
            PatternDef::Line(labels) => labels.push(alternative.into()),
        }
        self
    }

    /// Set the dotted output path. Fields without one only feed derived rules.
    pub fn to(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }
}

/// A validated, compiled field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub pattern: Pattern,
    pub normalizer: Normalizer,
    /// Dotted output path; `None` for inputs of derived rules only.
    pub destination: Option<String>,
}

impl FieldSpec {
    /// Output leaves this field writes.
    pub fn leaves(&self) -> Vec<String> {
        let Some(destination) = &self.destination else {
            return Vec::new();
        };
        match self.normalizer {
            Normalizer::Address => AddressParts::KEYS
                .iter()
                .map(|key| format!("{}.{}", destination, key))
                .collect(),
            _ => vec![destination.clone()],
        }
    }
}

/// Values computed from several fields or from the whole text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derivation {
    /// `purchase` or `refinance`, from the text.
    TransactionKind { destination: String },
    /// Owner list split out of a combined name field.
    Owners {
        names: String,
        email: Option<String>,
        phone: Option<String>,
        destination: String,
    },
    /// Prepayment penalty schedule; the n-th field holds year n + 1.
    PenaltySchedule { years: Vec<String>, destination: String },
}

impl Derivation {
    pub fn destination(&self) -> &str {
        match self {
            Self::TransactionKind { destination }
            | Self::Owners { destination, .. }
            | Self::PenaltySchedule { destination, .. } => destination,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TransactionKind { .. } => "transaction_kind",
            Self::Owners { .. } => "owners",
            Self::PenaltySchedule { .. } => "penalty_schedule",
        }
    }

    fn inputs(&self) -> Vec<&str> {
        match self {
            Self::TransactionKind { .. } => Vec::new(),
            Self::Owners { names, email, phone, .. } => std::iter::once(names.as_str())
                .chain(email.as_deref())
                .chain(phone.as_deref())
                .collect(),
            Self::PenaltySchedule { years, .. } => years.iter().map(String::as_str).collect(),
        }
    }
}

/// Position of an entry in the output layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Field(usize),
    Derived(usize),
}

/// A validated field catalog. Immutable and shareable across threads.
#[derive(Debug, Clone)]
pub struct Catalog {
    name: String,
    sections: Vec<String>,
    fields: Vec<FieldSpec>,
    derived: Vec<Derivation>,
    layout: Vec<Slot>,
    /// Uppercased line labels, longest first.
    line_index: Vec<(String, usize)>,
}

impl Catalog {
    pub fn builder(name: impl Into<String>) -> CatalogBuilder {
        CatalogBuilder {
            name: name.into(),
            sections: Vec::new(),
            fields: Vec::new(),
            derived: Vec::new(),
            layout: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-level sections in output order.
    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn derived(&self) -> &[Derivation] {
        &self.derived
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub(crate) fn layout(&self) -> &[Slot] {
        &self.layout
    }

    /// Find the longest catalog label that starts `line`.
    ///
    /// Returns the field index and the byte offset where the value begins.
    /// With `case_insensitive` off, the line must carry the label in
    /// uppercase exactly as cataloged.
    pub(crate) fn match_line_label(&self, line: &str, case_insensitive: bool) -> Option<(usize, usize)> {
        let body = line.trim_start();
        let indent = line.len() - body.len();

        self.line_index.iter().find_map(|(label, idx)| {
            let head = body.get(..label.len())?;
            let matches = if case_insensitive {
                head.eq_ignore_ascii_case(label)
            } else {
                head == label
            };
            if !matches || !ends_at_word_boundary(label, &body[label.len()..]) {
                return None;
            }
            Some((*idx, indent + label.len()))
        })
    }
}

/// A label ending in a letter or digit must not run into another one
/// (`YEAR 1` must not match `YEAR 10`).
fn ends_at_word_boundary(label: &str, rest: &str) -> bool {
    let label_ends_alnum = label.chars().last().is_some_and(char::is_alphanumeric);
    let rest_starts_alnum = rest.chars().next().is_some_and(char::is_alphanumeric);
    !(label_ends_alnum && rest_starts_alnum)
}

/// Collects field definitions and derived rules, then validates them.
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    name: String,
    sections: Vec<String>,
    fields: Vec<FieldDef>,
    derived: Vec<Derivation>,
    layout: Vec<Slot>,
}

impl CatalogBuilder {
    /// Declare top-level sections, in output order.
    pub fn sections(mut self, sections: &[&str]) -> Self {
        self.sections.extend(sections.iter().map(|s| s.to_string()));
        self
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.layout.push(Slot::Field(self.fields.len()));
        self.fields.push(field);
        self
    }

    pub fn derive(mut self, derivation: Derivation) -> Self {
        self.layout.push(Slot::Derived(self.derived.len()));
        self.derived.push(derivation);
        self
    }

    /// Validate and compile the catalog.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        let mut names = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(CatalogError::EmptyName {
                    catalog: self.name.clone(),
                });
            }
            if !names.insert(field.name.as_str()) {
                return Err(CatalogError::DuplicateName(field.name.clone()));
            }
        }

        for derivation in &self.derived {
            for input in derivation.inputs() {
                if !names.contains(input) {
                    return Err(CatalogError::UnknownField {
                        rule: derivation.name().to_string(),
                        field: input.to_string(),
                    });
                }
            }
        }

        let fields = self
            .fields
            .into_iter()
            .map(compile_field)
            .collect::<Result<Vec<_>, _>>()?;

        let mut writers: Vec<(String, String)> = Vec::new();
        for field in &fields {
            for leaf in field.leaves() {
                writers.push((leaf, field.name.clone()));
            }
        }
        for derivation in &self.derived {
            writers.push((derivation.destination().to_string(), derivation.name().to_string()));
        }
        validate_destinations(&self.sections, &writers)?;

        let mut line_index = Vec::new();
        let mut labels = HashSet::new();
        for (idx, field) in fields.iter().enumerate() {
            if let Pattern::Line(field_labels) = &field.pattern {
                for label in field_labels {
                    if !labels.insert(label.clone()) {
                        return Err(CatalogError::DuplicateLabel(label.clone()));
                    }
                    line_index.push((label.clone(), idx));
                }
            }
        }
        line_index.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        Ok(Catalog {
            name: self.name,
            sections: self.sections,
            fields,
            derived: self.derived,
            layout: self.layout,
            line_index,
        })
    }
}

fn compile_field(def: FieldDef) -> Result<FieldSpec, CatalogError> {
    let pattern = match def.pattern {
        PatternDef::Context(sources) => {
            if sources.is_empty() {
                return Err(CatalogError::Pattern {
                    field: def.name,
                    reason: "no pattern given".to_string(),
                });
            }
            let mut compiled = Vec::with_capacity(sources.len());
            for source in sources {
                let regex = RegexBuilder::new(&source)
                    .case_insensitive(true)
                    .multi_line(true)
                    .dot_matches_new_line(true)
                    .build()
                    .map_err(|e| CatalogError::Pattern {
                        field: def.name.clone(),
                        reason: e.to_string(),
                    })?;
                if regex.captures_len() < 2 {
                    return Err(CatalogError::Pattern {
                        field: def.name,
                        reason: format!("{} has no capture group", source),
                    });
                }
                compiled.push(regex);
            }
            Pattern::Context(compiled)
        }
        PatternDef::Line(labels) => {
            let labels: Vec<String> = labels.iter().map(|l| l.trim().to_uppercase()).collect();
            if labels.is_empty() || labels.iter().any(String::is_empty) {
                return Err(CatalogError::Pattern {
                    field: def.name,
                    reason: "empty line label".to_string(),
                });
            }
            Pattern::Line(labels)
        }
    };

    Ok(FieldSpec {
        name: def.name,
        pattern,
        normalizer: def.normalizer,
        destination: def.destination,
    })
}

fn validate_destinations(sections: &[String], writers: &[(String, String)]) -> Result<(), CatalogError> {
    let mut owners: HashMap<&str, &str> = HashMap::new();

    for (path, writer) in writers {
        if path.split('.').any(|segment| segment.trim().is_empty()) {
            return Err(CatalogError::InvalidPath {
                field: writer.clone(),
                path: path.clone(),
            });
        }

        let section = path.split('.').next().unwrap_or_default();
        if !path.contains('.') || !sections.iter().any(|s| s == section) {
            return Err(CatalogError::UnknownSection {
                field: writer.clone(),
                path: path.clone(),
            });
        }

        if let Some(first) = owners.insert(path.as_str(), writer.as_str()) {
            return Err(CatalogError::DuplicateDestination {
                path: path.clone(),
                first: first.to_string(),
                second: writer.clone(),
            });
        }
    }

    let mut paths: Vec<&str> = owners.keys().copied().collect();
    paths.sort_unstable();
    for leaf in &paths {
        let prefix = format!("{}.", leaf);
        if let Some(child) = paths.iter().find(|p| p.starts_with(&prefix)) {
            return Err(CatalogError::PathConflict {
                leaf: leaf.to_string(),
                child: child.to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn minimal() -> CatalogBuilder {
        Catalog::builder("test").sections(&["loan", "owner"])
    }

    #[test]
    fn test_builtin_catalogs_are_valid() {
        let context = Vocabulary::Context.catalog().unwrap();
        let line = Vocabulary::Line.catalog().unwrap();

        assert_eq!(context.name(), "context");
        assert_eq!(line.name(), "line");
        assert!(context.field("loan_amount").is_some());
        assert!(line.field("owner_name").is_some());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = minimal()
            .field(FieldDef::line("amount", "AMOUNT", Normalizer::Currency).to("loan.a"))
            .field(FieldDef::line("amount", "OTHER", Normalizer::Currency).to("loan.b"))
            .build()
            .unwrap_err();

        assert_eq!(err, CatalogError::DuplicateName("amount".to_string()));
    }

    #[test]
    fn test_duplicate_destination_rejected() {
        let err = minimal()
            .field(FieldDef::line("a", "A", Normalizer::Currency).to("loan.amount"))
            .field(FieldDef::line("b", "B", Normalizer::Currency).to("loan.amount"))
            .build()
            .unwrap_err();

        assert!(matches!(err, CatalogError::DuplicateDestination { .. }));
    }

    #[test]
    fn test_address_leaves_collide_with_plain_field() {
        let err = minimal()
            .sections(&["property"])
            .field(FieldDef::line("addr", "ADDRESS", Normalizer::Address).to("property"))
            .field(FieldDef::line("city", "CITY", Normalizer::Text).to("property.city"))
            .build()
            .unwrap_err();

        assert!(matches!(err, CatalogError::DuplicateDestination { ref path, .. } if path == "property.city"));
    }

    #[test]
    fn test_leaf_and_parent_conflict() {
        let err = minimal()
            .field(FieldDef::line("a", "A", Normalizer::Text).to("loan.lender"))
            .field(FieldDef::line("b", "B", Normalizer::Text).to("loan.lender.name"))
            .build()
            .unwrap_err();

        assert_eq!(
            err,
            CatalogError::PathConflict {
                leaf: "loan.lender".to_string(),
                child: "loan.lender.name".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_paths_rejected() {
        let err = minimal()
            .field(FieldDef::line("a", "A", Normalizer::Text).to("loan..x"))
            .build()
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPath { .. }));

        let err = minimal()
            .field(FieldDef::line("a", "A", Normalizer::Text).to("escrow.x"))
            .build()
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownSection { .. }));
    }

    #[test]
    fn test_unknown_derived_input_rejected() {
        let err = minimal()
            .derive(Derivation::Owners {
                names: "owner_name".to_string(),
                email: None,
                phone: None,
                destination: "owner.individuals".to_string(),
            })
            .build()
            .unwrap_err();

        assert_eq!(
            err,
            CatalogError::UnknownField {
                rule: "owners".to_string(),
                field: "owner_name".to_string(),
            }
        );
    }

    #[test]
    fn test_bad_regex_and_missing_group_rejected() {
        let err = minimal()
            .field(FieldDef::context("a", &[r"Loan\s+("], Normalizer::Text).to("loan.a"))
            .build()
            .unwrap_err();
        assert!(matches!(err, CatalogError::Pattern { .. }));

        let err = minimal()
            .field(FieldDef::context("a", &[r"Loan\s+\d+"], Normalizer::Text).to("loan.a"))
            .build()
            .unwrap_err();
        assert!(matches!(err, CatalogError::Pattern { .. }));
    }

    #[test]
    fn test_duplicate_line_label_rejected() {
        let err = minimal()
            .field(FieldDef::line("a", "Loan Amount", Normalizer::Currency).to("loan.a"))
            .field(FieldDef::line("b", "LOAN AMOUNT", Normalizer::Currency).to("loan.b"))
            .build()
            .unwrap_err();

        assert_eq!(err, CatalogError::DuplicateLabel("LOAN AMOUNT".to_string()));
    }

    #[test]
    fn test_aliases_share_field() {
        let catalog = minimal()
            .field(
                FieldDef::line("term", "TERM -YEARS", Normalizer::Integer)
                    .or("Term - Years")
                    .to("loan.term_years"),
            )
            .build()
            .unwrap();

        let (a, _) = catalog.match_line_label("TERM -YEARS 30", true).unwrap();
        let (b, _) = catalog.match_line_label("TERM - YEARS 30", true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_longest_label_wins() {
        let catalog = minimal()
            .field(FieldDef::line("tax", "PROPERTY TAX", Normalizer::Currency).to("loan.tax"))
            .field(FieldDef::line("tax_pct", "PROPERTY TAX %", Normalizer::Percentage).to("loan.pct"))
            .build()
            .unwrap();

        let (idx, offset) = catalog.match_line_label("  property tax % 1.2", true).unwrap();
        assert_eq!(catalog.fields()[idx].name, "tax_pct");
        assert_eq!(offset, 16);

        let (idx, _) = catalog.match_line_label("PROPERTY TAX 2,400", true).unwrap();
        assert_eq!(catalog.fields()[idx].name, "tax");
    }

    #[test]
    fn test_label_word_boundary() {
        let catalog = minimal()
            .field(FieldDef::line("y1", "YEAR 1", Normalizer::Percentage))
            .build()
            .unwrap();

        assert!(catalog.match_line_label("YEAR 10 1%", true).is_none());
        assert!(catalog.match_line_label("YEAR 1 5%", true).is_some());
        assert!(catalog.match_line_label("YEAR 1:5%", true).is_some());
        assert!(catalog.match_line_label("year 1 5%", false).is_none());
    }

    #[test]
    fn test_detect_vocabulary() {
        let form = "OWNER NAME Jane Doe\nLOAN AMOUNT 350,000\nINTEREST RATE 6.5\n";
        assert_eq!(Vocabulary::detect(form), Vocabulary::Line);

        let prose = "This Note evidences a Loan Amount of $350,000.00 at an Interest Rate 5.25%.";
        assert_eq!(Vocabulary::detect(prose), Vocabulary::Context);
        assert_eq!(Vocabulary::detect(""), Vocabulary::Context);
    }
}
