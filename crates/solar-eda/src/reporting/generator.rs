use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::EdaConfig;
use crate::error::Result;
use crate::types::EdaReport;

/// Context about a run that is not part of the analysis itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Name of the analyzed input
    pub source: String,
    /// Configuration the report was produced with
    pub config: EdaConfig,
}

/// The JSON document written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedReport {
    pub metadata: ReportMetadata,
    pub report: EdaReport,
}

/// Writes reports into an output directory.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    /// Pair a report with its generation metadata.
    pub fn build_saved_report(report: &EdaReport, source: &str, config: &EdaConfig) -> SavedReport {
        SavedReport {
            metadata: ReportMetadata {
                generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                source: source.to_string(),
                config: config.clone(),
            },
            report: report.clone(),
        }
    }

    /// Write `<report_base_name>_eda_report.json` into the output directory.
    pub fn write_report_to_file(
        &self,
        report: &SavedReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_eda_report.json", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}
