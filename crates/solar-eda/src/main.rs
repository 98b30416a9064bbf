//! CLI entry point for the solar irradiance EDA report.

use std::path::Path;

use anyhow::{Result, anyhow};
use clap::Parser;
use solar_eda::types::{SectionOutput, SectionReport};
use solar_eda::{EdaConfig, EdaPipeline, EdaReport, ReportGenerator, loader};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Exploratory data analysis for solar irradiance sensor logs",
    long_about = "Loads a station log (CSV or spreadsheet) and reports data quality,\n\
                  outliers, time series, cleaning impact and distributions.\n\n\
                  EXAMPLES:\n  \
                  # Human-readable summary\n  \
                  solar-eda -i data/benin-malanville.csv\n\n  \
                  # JSON report on stdout\n  \
                  solar-eda -i data/togo-dapaong.xlsx --json\n\n  \
                  # Wider outlier fences and a written report\n  \
                  solar-eda -i data.csv --iqr-multiplier 3 -r -o results/"
)]
struct Args {
    /// Path to the CSV or spreadsheet file to analyze
    #[arg(short, long)]
    input: String,

    /// Output directory for written reports
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Worksheet to read (spreadsheets only; first sheet by default)
    #[arg(long)]
    sheet: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write the JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_eda_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Fence width in IQRs for outlier detection
    #[arg(long, default_value = "1.5")]
    iqr_multiplier: f64,

    /// Z-score above which a value is flagged
    #[arg(long, default_value = "3.0")]
    zscore_threshold: f64,

    /// Rows shown in previews
    #[arg(long, default_value = "5")]
    preview_rows: usize,

    /// Name of the timestamp column
    #[arg(long, default_value = "timestamp")]
    timestamp_column: String,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let input = Path::new(&args.input);
    if !input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let mut config_builder = EdaConfig::builder()
        .iqr_multiplier(args.iqr_multiplier)
        .zscore_threshold(args.zscore_threshold)
        .preview_rows(args.preview_rows)
        .timestamp_column(&args.timestamp_column);

    if let Some(ref sheet) = args.sheet {
        config_builder = config_builder.sheet(sheet);
    }

    let config = config_builder.build()?;

    info!("Loading dataset from: {}", args.input);
    let dataset = loader::load_path(input, &config)?;

    let quiet = args.quiet || args.json;
    let report = EdaPipeline::builder()
        .config(config.clone())
        .on_progress(move |update| {
            if !quiet {
                info!("[{:>3.0}%] {}", update.progress * 100.0, update.message);
            }
        })
        .build()?
        .run(&dataset)?;

    let saved = ReportGenerator::build_saved_report(&report, &args.input, &config);

    if args.emit_report {
        let base_name = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("dataset");
        let generator = ReportGenerator::new(args.output.clone().into());
        let path = generator.write_report_to_file(&saved, base_name)?;
        if !args.json {
            println!("Report written to {}", path.display());
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&saved)?);
    } else {
        print_summary(&args.input, &report);
    }

    Ok(())
}

/// Print a human-readable summary of the report.
///
/// Uses `println!` rather than logging so the summary is shown regardless of
/// the log level.
fn print_summary(input: &str, report: &EdaReport) {
    println!("\n{}", "=".repeat(80));
    println!("SOLAR EDA SUMMARY");
    println!("{}\n", "=".repeat(80));

    println!("  File: {}", input);
    println!("  Rows: {}", report.rows);
    println!("  Columns: {}", report.columns.join(", "));
    println!("  SHA-256: {}", report.content_hash);
    println!();

    if let Some(quality) = report.quality() {
        println!("DATA QUALITY");
        println!("{}", "-".repeat(40));
        println!(
            "{:<12} {:>10} {:>10} {:>10}",
            "Column", "Negative", "Missing", "Outliers"
        );
        println!("{}", "-".repeat(46));
        for column in quality.iter() {
            println!(
                "{:<12} {:>10} {:>10} {:>10}",
                column.column, column.negative_count, column.missing_count, column.outlier_count
            );
        }
        println!();
    }

    if let Some(zscores) = report.zscores() {
        println!("Z-SCORES");
        println!("{}", "-".repeat(40));
        for series in &zscores.columns {
            let note = if series.zero_variance {
                " (zero variance)"
            } else {
                ""
            };
            println!(
                "  {:<10} {} of {} above {}{}",
                series.column,
                series.flagged_count,
                series.len(),
                series.threshold,
                note
            );
        }
        println!();
    }

    if let Some(time) = report.time_series() {
        let summary = &time.summary;
        println!("TIME INDEX");
        println!("{}", "-".repeat(40));
        println!(
            "  {} parsed, {} missing, {} unparseable",
            summary.parsed, summary.missing, summary.failed
        );
        if let (Some(first), Some(last)) = (summary.first, summary.last) {
            println!("  Range: {} .. {}", first, last);
        }
        println!();
    }

    if let Some(groups) = report.cleaning_impact() {
        println!("CLEANING IMPACT");
        println!("{}", "-".repeat(40));
        for group in groups {
            println!(
                "  {:<10} cleaned: {} readings, not cleaned: {} readings",
                group.sensor,
                group.cleaned.len(),
                group.not_cleaned.len()
            );
        }
        println!();
    }

    println!("SECTIONS");
    println!("{}", "-".repeat(40));
    for section in &report.sections {
        println!("  {:<26} {}", section.kind.display_name(), section_status(section));
    }
    println!();
}

fn section_status(section: &SectionReport) -> String {
    match &section.output {
        None => format!("skipped (missing: {})", section.missing_columns.join(", ")),
        Some(SectionOutput::Scatter(series)) => format!(
            "{} points ({} rows dropped)",
            series.points.len(),
            series.dropped_rows
        ),
        Some(SectionOutput::Histograms(histograms)) => format!("{} columns", histograms.len()),
        Some(SectionOutput::Comments(view)) => format!(
            "{} distinct, {} rows with comments",
            view.counts.len(),
            view.kept_rows
        ),
        Some(_) => "ok".to_string(),
    }
}
