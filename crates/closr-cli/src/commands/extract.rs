//! Extract command - structure a single closing document.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::{debug, info};

use closr_core::models::config::{ClosrConfig, VocabularyChoice};
use closr_core::{ClosingParser, DocumentParser, StructuredDocument};

use super::config::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (text or PDF); reads standard input when omitted or "-"
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Label vocabulary (default: from config, else auto-detect)
    #[arg(long, value_enum)]
    vocabulary: Option<VocabularyArg>,

    /// Leave out the _debug section
    #[arg(long)]
    no_debug: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Single-line JSON output
    #[arg(long)]
    compact: bool,

    /// Print warnings and timing to stderr
    #[arg(long)]
    show_warnings: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON document
    Json,
    /// One row per leaf: path,value
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum VocabularyArg {
    /// Detect from the document layout
    Auto,
    /// Prose-style labels
    Context,
    /// One uppercase label per line
    Line,
}

impl From<VocabularyArg> for VocabularyChoice {
    fn from(arg: VocabularyArg) -> Self {
        match arg {
            VocabularyArg::Auto => Self::Auto,
            VocabularyArg::Context => Self::Context,
            VocabularyArg::Line => Self::Line,
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(vocabulary) = args.vocabulary {
        config.extraction.vocabulary = vocabulary.into();
    }
    if args.no_debug {
        config.extraction.diagnostics = Some(false);
    }
    if args.pretty {
        config.output.pretty = true;
    }
    if args.compact {
        config.output.pretty = false;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );

    let text = match args.input.as_deref() {
        Some(path) if path != Path::new("-") => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            info!("Processing file: {}", path.display());
            pb.set_message("Reading document...");
            read_document(path)?
        }
        _ => {
            info!("Reading document from standard input");
            read_stdin()?
        }
    };

    pb.set_message("Extracting fields...");
    let parser = ClosingParser::from_config(&config.extraction);
    let result = parser.parse(&text)?;
    pb.finish_and_clear();

    if args.show_warnings {
        for warning in &result.warnings {
            eprintln!("{} {}", style("!").yellow(), warning);
        }
        eprintln!(
            "{} {} vocabulary, {}/{} fields in {}ms",
            style("ℹ").blue(),
            result.vocabulary.name(),
            result.extracted.found().count(),
            result.extracted.len(),
            result.processing_time_ms
        );
    }

    let output = render(&result.document, args.format, &config)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Read a document file as text. PDFs go through their text layer.
pub fn read_document(path: &Path) -> anyhow::Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if extension == "pdf" {
        return read_pdf(path);
    }

    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(feature = "pdf")]
fn read_pdf(path: &Path) -> anyhow::Result<String> {
    let reader = closr_core::PdfTextReader::open(path)?;
    Ok(reader.extract_text()?)
}

#[cfg(not(feature = "pdf"))]
fn read_pdf(path: &Path) -> anyhow::Result<String> {
    anyhow::bail!(
        "{} is a PDF but closr was built without the pdf feature",
        path.display()
    )
}

fn read_stdin() -> anyhow::Result<String> {
    let mut bytes = Vec::new();
    std::io::stdin().read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Render a document in the requested format.
pub fn render(document: &StructuredDocument, format: OutputFormat, config: &ClosrConfig) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(document.to_json_string(config.output.pretty, config.output.ascii_only)?),
        OutputFormat::Csv => format_csv(document),
        OutputFormat::Text => Ok(format_text(document)),
    }
}

fn leaf_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_csv(document: &StructuredDocument) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["field", "value"])?;
    for (path, value) in document.leaves() {
        wtr.write_record([path.as_str(), leaf_to_string(value).as_str()])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(document: &StructuredDocument) -> String {
    let mut output = String::new();
    let mut current_section = String::new();

    for (path, value) in document.leaves() {
        let (section, rest) = path.split_once('.').unwrap_or((path.as_str(), ""));
        if section != current_section {
            if !current_section.is_empty() {
                output.push('\n');
            }
            output.push_str(&format!("{}:\n", section));
            current_section = section.to_string();
        }

        let shown = match value {
            Value::Null => "-".to_string(),
            other => leaf_to_string(other),
        };
        output.push_str(&format!("  {}: {}\n", rest, shown));
    }

    output
}
