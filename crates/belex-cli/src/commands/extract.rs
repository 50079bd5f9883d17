//! Extract command - recover fields from a single document.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use belex_core::format::{format_cents, format_date};
use belex_core::models::config::OutputConfig;
use belex_core::upload::TEXT_MIME;
use belex_core::{BelexConfig, DocumentExtractor, ExtractionOutcome, ExtractionResult, UploadPolicy};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or UTF-8 text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Extracting fields from {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Reading {}", args.input.display()));

    let result = extract_file(&args.input, &config)?;
    pb.finish_and_clear();

    let output = format_result(&result, args.format, &config.output)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    let outcome = result.outcome();
    let reason = result
        .error_kind
        .map(|kind| kind.to_string())
        .unwrap_or_default();

    match outcome {
        ExtractionOutcome::Extracted => Ok(()),
        ExtractionOutcome::ManualEntryRequired => {
            anyhow::bail!("Manual entry required (status {}): {}", outcome.http_status(), reason)
        }
        ExtractionOutcome::Unprocessable => {
            anyhow::bail!(
                "Document could not be processed (status {}): {}",
                outcome.http_status(),
                reason
            )
        }
    }
}

/// Run one file through the upload policy and the extractor.
///
/// PDFs are decoded into text; UTF-8 text files are taken as already-decoded
/// document text. Rejected uploads are errors, extraction misses are not.
pub fn extract_file(path: &Path, config: &BelexConfig) -> anyhow::Result<ExtractionResult> {
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let policy = UploadPolicy::from_config(&config.upload).allow(TEXT_MIME);
    let result = DocumentExtractor::from_config(&config.extraction)
        .extract_upload(&policy, filename, &data)?;
    debug!("Extracted {} ({} line items)", filename, result.line_items.len());

    Ok(result)
}

pub fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
    output: &OutputConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => format_json(result, output),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_json(result: &ExtractionResult, output: &OutputConfig) -> anyhow::Result<String> {
    let mut value = serde_json::to_value(result)?;
    if !output.include_raw_text {
        if let Some(obj) = value.as_object_mut() {
            obj.remove("rawText");
        }
    }

    if output.pretty {
        Ok(serde_json::to_string_pretty(&value)?)
    } else {
        Ok(serde_json::to_string(&value)?)
    }
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "date",
        "invoice_number",
        "delivery_note_number",
        "total_amount_cents",
        "line_items",
        "error_kind",
    ])?;

    wtr.write_record([
        result.date.clone().unwrap_or_default(),
        result.invoice_number.clone().unwrap_or_default(),
        result.delivery_note_number.clone().unwrap_or_default(),
        result
            .total_amount_cents
            .map(|c| c.to_string())
            .unwrap_or_default(),
        result.line_items.len().to_string(),
        result
            .error_kind
            .map(|k| format!("{:?}", k))
            .unwrap_or_default(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    if let Some(kind) = result.error_kind {
        output.push_str(&format!("Status: {}\n", kind));
        return output;
    }

    let missing = || "-".to_string();
    output.push_str(&format!(
        "Date:           {}\n",
        result
            .date
            .as_deref()
            .map(|iso| format_date(iso).unwrap_or_else(|| iso.to_string()))
            .unwrap_or_else(missing)
    ));
    output.push_str(&format!(
        "Invoice no.:    {}\n",
        result.invoice_number.clone().unwrap_or_else(missing)
    ));
    output.push_str(&format!(
        "Delivery note:  {}\n",
        result.delivery_note_number.clone().unwrap_or_else(missing)
    ));
    output.push_str(&format!(
        "Total:          {}\n",
        result
            .total_amount_cents
            .map(format_cents)
            .unwrap_or_else(missing)
    ));

    if !result.line_items.is_empty() {
        output.push_str("\nLine items:\n");
        for item in &result.line_items {
            match &item.quantity {
                Some(quantity) => output.push_str(&format!(
                    "  {}  {}  {}\n",
                    item.description,
                    quantity,
                    format_cents(item.amount_cents)
                )),
                None => output.push_str(&format!(
                    "  {}  {}\n",
                    item.description,
                    format_cents(item.amount_cents)
                )),
            }
        }
    }

    output
}
