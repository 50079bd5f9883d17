//! Batch processing command for multiple documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use belex_core::{BelexConfig, ExtractionOutcome, ExtractionResult};

use super::extract::{extract_file, format_result, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
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
    extraction: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

impl ProcessResult {
    fn status(&self) -> &'static str {
        match (&self.extraction, &self.error) {
            (_, Some(_)) => "error",
            (Some(result), None) if result.outcome() == ExtractionOutcome::Extracted => "success",
            (Some(result), None) if result.outcome() == ExtractionOutcome::ManualEntryRequired => {
                "manual_entry"
            }
            _ => "unprocessable",
        }
    }

    fn is_success(&self) -> bool {
        self.status() == "success"
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Arc::new(super::load_config(config_path)?);

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt")
        })
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
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

    let jobs = args.jobs.max(1);
    let mut pending = stream::iter(files)
        .map(|path| {
            let config = Arc::clone(&config);
            tokio::task::spawn_blocking(move || process_single_file(path, &config))
        })
        .buffer_unordered(jobs);

    let mut results = Vec::new();
    while let Some(joined) = pending.next().await {
        let result = joined?;

        if let Some(error_msg) = &result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            } else {
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                overall_pb.abandon();
                anyhow::bail!("Processing failed: {}", error_msg);
            }
        }

        overall_pb.inc(1);
        results.push(result);
    }

    overall_pb.finish_with_message("Complete");
    results.sort_by(|a, b| a.path.cmp(&b.path));

    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            let Some(extraction) = &result.extraction else {
                continue;
            };

            let output_name = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("document");
            let output_path =
                output_dir.join(format!("{}.{}", output_name, args.format.extension()));

            let content = format_result(extraction, args.format, &config.output)?;
            fs::write(&output_path, content)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let successful = results.iter().filter(|r| r.is_success()).count();
    let failed: Vec<_> = results.iter().filter(|r| !r.is_success()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} need attention",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Files needing attention:").red());
        for result in &failed {
            println!("  - {}: {}", result.path.display(), failure_reason(result));
        }
    }

    Ok(())
}

fn process_single_file(path: PathBuf, config: &BelexConfig) -> ProcessResult {
    let file_start = Instant::now();
    let outcome = extract_file(&path, config);
    let processing_time_ms = file_start.elapsed().as_millis() as u64;

    match outcome {
        Ok(extraction) => ProcessResult {
            path,
            extraction: Some(extraction),
            error: None,
            processing_time_ms,
        },
        Err(e) => ProcessResult {
            path,
            extraction: None,
            error: Some(format!("{:#}", e)),
            processing_time_ms,
        },
    }
}

fn failure_reason(result: &ProcessResult) -> String {
    if let Some(error) = &result.error {
        return error.clone();
    }
    result
        .extraction
        .as_ref()
        .and_then(|r| r.error_kind)
        .map(|kind| kind.to_string())
        .unwrap_or_else(|| "unknown error".to_string())
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "date",
        "invoice_number",
        "delivery_note_number",
        "total_amount_cents",
        "line_items",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        let time = result.processing_time_ms.to_string();

        match &result.extraction {
            Some(extraction) if result.error.is_none() => {
                wtr.write_record([
                    filename,
                    result.status().to_string(),
                    extraction.date.clone().unwrap_or_default(),
                    extraction.invoice_number.clone().unwrap_or_default(),
                    extraction.delivery_note_number.clone().unwrap_or_default(),
                    extraction
                        .total_amount_cents
                        .map(|c| c.to_string())
                        .unwrap_or_default(),
                    extraction.line_items.len().to_string(),
                    time,
                    extraction
                        .error_kind
                        .map(|k| k.to_string())
                        .unwrap_or_default(),
                ])?;
            }
            _ => {
                wtr.write_record([
                    filename,
                    result.status().to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    time,
                    failure_reason(result),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
