//! Batch processing command for multiple closing documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use closr_core::{ClosingParser, DocumentParser, ExtractionResult};

use super::config::load_config;
use super::extract::{OutputFormat, read_document, render};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of input files (text or PDF)
    #[arg(required = true)]
    input: String,

    /// Output directory (default: next to each input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    outcome: Result<ExtractionResult, String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "txt" | "text" | "pdf")
        })
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = Arc::new(ClosingParser::from_config(&config.extraction));
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (index, path) in files.iter().cloned().enumerate() {
        let parser = Arc::clone(&parser);
        let permit = Arc::clone(&semaphore).acquire_owned().await?;

        tasks.spawn_blocking(move || {
            let _permit = permit;
            let file_start = Instant::now();
            let outcome = read_document(&path)
                .and_then(|text| Ok(parser.parse(&text)?))
                .map_err(|e| e.to_string());

            let result = ProcessResult {
                path,
                outcome,
                processing_time_ms: file_start.elapsed().as_millis() as u64,
            };
            (index, result)
        });
    }

    let mut slots: Vec<Option<ProcessResult>> = files.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined?;

        if let Err(error_msg) = &result.outcome {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            } else {
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                tasks.abort_all();
                anyhow::bail!("Processing failed: {}", error_msg);
            }
        }

        slots[index] = Some(result);
        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    let results: Vec<ProcessResult> = slots.into_iter().flatten().collect();

    // Write outputs
    for result in &results {
        let Ok(extraction) = &result.outcome else {
            continue;
        };
        let output_path = output_path_for(&result.path, args.output_dir.as_deref(), args.format);
        let content = render(&extraction.document, args.format, &config)?;
        fs::write(&output_path, content)?;
        debug!("Wrote output to {}", output_path.display());
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let successful = results.iter().filter(|r| r.outcome.is_ok()).count();
    let failed: Vec<&ProcessResult> = results.iter().filter(|r| r.outcome.is_err()).collect();

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            if let Err(error_msg) = &result.outcome {
                eprintln!("  - {}: {}", result.path.display(), error_msg);
            }
        }
    }

    Ok(())
}

/// `<stem>.<ext>` in `output_dir`, or next to the input.
///
/// Falls back to `<stem>.closr.<ext>` when the plain name is the input itself.
fn output_path_for(input: &Path, output_dir: Option<&Path>, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let place = |file_name: String| match output_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    };

    let path = place(format!("{}.{}", stem, format.extension()));
    if is_same_file(&path, input) {
        place(format!("{}.closr.{}", stem, format.extension()))
    } else {
        path
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "vocabulary",
        "transaction_kind",
        "fields_found",
        "fields_total",
        "warnings",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name().and_then(|s| s.to_str()).unwrap_or("");

        match &result.outcome {
            Ok(extraction) => {
                let kind = extraction
                    .document
                    .get_str("financial.transaction_kind")
                    .or_else(|| extraction.document.get_str("purchase_or_refi.kind"))
                    .unwrap_or("");
                wtr.write_record([
                    filename,
                    "success",
                    extraction.vocabulary.name(),
                    kind,
                    &extraction.extracted.found().count().to_string(),
                    &extraction.extracted.len().to_string(),
                    &extraction.warnings.len().to_string(),
                    &result.processing_time_ms.to_string(),
                    "",
                ])?;
            }
            Err(error_msg) => {
                wtr.write_record([
                    filename,
                    "error",
                    "",
                    "",
                    "",
                    "",
                    "",
                    &result.processing_time_ms.to_string(),
                    error_msg,
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
