//! Fields command - list a vocabulary's field catalog.

use clap::Args;
use console::style;

use closr_core::closing::{Derivation, Pattern};
use closr_core::{Catalog, Vocabulary};

/// Arguments for the fields command.
#[derive(Args)]
pub struct FieldsArgs {
    /// Vocabulary to list
    #[arg(long, value_enum, default_value = "context")]
    vocabulary: VocabularyName,

    /// Print the catalog as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum VocabularyName {
    Context,
    Line,
}

impl From<VocabularyName> for Vocabulary {
    fn from(name: VocabularyName) -> Self {
        match name {
            VocabularyName::Context => Self::Context,
            VocabularyName::Line => Self::Line,
        }
    }
}

pub async fn run(args: FieldsArgs) -> anyhow::Result<()> {
    let vocabulary = Vocabulary::from(args.vocabulary);
    let catalog = vocabulary.catalog()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalog_json(catalog))?);
        return Ok(());
    }

    println!(
        "{} {} vocabulary: {} fields, {} derived",
        style("ℹ").blue(),
        vocabulary.name(),
        catalog.fields().len(),
        catalog.derived().len()
    );
    println!();
    println!(
        "{:<40} {:<12} {}",
        style("FIELD").bold(),
        style("NORMALIZER").bold(),
        style("DESTINATION").bold()
    );

    for field in catalog.fields() {
        let destination = field.destination.as_deref().unwrap_or("(derived input)");
        println!("{:<40} {:<12} {}", field.name, field.normalizer.name(), destination);
    }

    if !catalog.derived().is_empty() {
        println!();
        for derivation in catalog.derived() {
            println!(
                "{:<40} {:<12} {}",
                derivation.name(),
                "derived",
                derivation.destination()
            );
        }
    }

    Ok(())
}

fn catalog_json(catalog: &Catalog) -> serde_json::Value {
    let fields: Vec<serde_json::Value> = catalog
        .fields()
        .iter()
        .map(|field| {
            let labels: Vec<String> = match &field.pattern {
                Pattern::Context(regexes) => regexes.iter().map(|r| r.as_str().to_string()).collect(),
                Pattern::Line(labels) => labels.clone(),
            };
            serde_json::json!({
                "name": field.name,
                "normalizer": field.normalizer.name(),
                "destination": field.destination,
                "patterns": labels,
            })
        })
        .collect();

    let derived: Vec<serde_json::Value> = catalog
        .derived()
        .iter()
        .map(|derivation| {
            let inputs: Vec<String> = match derivation {
                Derivation::TransactionKind { .. } => Vec::new(),
                Derivation::Owners { names, email, phone, .. } => std::iter::once(names.clone())
                    .chain(email.clone())
                    .chain(phone.clone())
                    .collect(),
                Derivation::PenaltySchedule { years, .. } => years.clone(),
            };
            serde_json::json!({
                "name": derivation.name(),
                "destination": derivation.destination(),
                "inputs": inputs,
            })
        })
        .collect();

    serde_json::json!({
        "name": catalog.name(),
        "sections": catalog.sections(),
        "fields": fields,
        "derived": derived,
    })
}
