//! The section pipeline and its builder.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info};

use crate::config::{ConfigValidationError, EdaConfig};
use crate::dataset::Dataset;
use crate::error::{EdaError, Result};
use crate::pipeline::progress::{ClosureProgressReporter, ProgressReporter, ProgressUpdate};
use crate::pipeline::sections::SECTIONS;
use crate::types::{EdaReport, SectionReport};

/// Runs every registered section against a dataset.
///
/// Use [`EdaPipeline::builder()`] to create a pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use solar_eda::{EdaConfig, EdaPipeline};
///
/// let report = EdaPipeline::builder()
///     .config(EdaConfig::builder().iqr_multiplier(3.0).build()?)
///     .on_progress(|update| println!("{}", update.message))
///     .build()?
///     .run(&dataset)?;
///
/// for section in report.skipped_sections() {
///     println!("{:?} skipped, missing {:?}", section.kind, section.missing_columns);
/// }
/// ```
pub struct EdaPipeline {
    config: EdaConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl EdaPipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> EdaPipelineBuilder {
        EdaPipelineBuilder::default()
    }

    pub fn config(&self) -> &EdaConfig {
        &self.config
    }

    /// Build the report for a dataset.
    ///
    /// A section whose columns are absent is recorded as skipped. Any other
    /// failure aborts the run.
    pub fn run(&self, dataset: &Dataset) -> Result<EdaReport> {
        let start_time = Instant::now();
        info!(
            "Analyzing dataset: {} rows x {} columns",
            dataset.height(),
            dataset.width()
        );

        let total = SECTIONS.len();
        let mut sections = Vec::with_capacity(total);

        for (index, entry) in SECTIONS.iter().enumerate() {
            let missing = (entry.requires)(&self.config).missing(dataset);
            if !missing.is_empty() {
                debug!(
                    "Skipping {}: missing {:?}",
                    entry.kind.display_name(),
                    missing
                );
                self.report_progress(ProgressUpdate::skipped(entry.kind, index, total, &missing));
                sections.push(SectionReport::skipped(entry.kind, missing));
                continue;
            }

            let output = (entry.run)(dataset, &self.config).map_err(|e| {
                error!("{} failed: {}", entry.kind.display_name(), e);
                EdaError::AnalysisFailed {
                    section: entry.kind.display_name().to_string(),
                    reason: e.to_string(),
                }
            })?;
            debug!("Computed {}", entry.kind.display_name());
            self.report_progress(ProgressUpdate::computed(entry.kind, index, total));
            sections.push(SectionReport::computed(entry.kind, output));
        }

        let report = EdaReport {
            content_hash: dataset.content_hash().to_string(),
            rows: dataset.height(),
            columns: dataset.column_names(),
            sections,
        };

        info!(
            "Report complete: {} computed, {} skipped in {:.2?}",
            report.computed_sections().count(),
            report.skipped_sections().count(),
            start_time.elapsed()
        );
        Ok(report)
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }
}

/// Builder for [`EdaPipeline`].
#[derive(Default)]
pub struct EdaPipelineBuilder {
    config: Option<EdaConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl EdaPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: EdaConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving one update per section.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<EdaPipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(EdaPipeline {
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SectionKind;
    use polars::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn solar_dataset() -> Dataset {
        let df = df![
            "Timestamp" => ["2021-08-09 00:02", "2021-08-09 00:01", "2021-08-09 00:03", "2021-08-09 00:04"],
            "GHI" => [Some(-1.0), Some(5.0), None, Some(800.0)],
            "DNI" => [0.0, 1.0, 2.0, 3.0],
            "ModA" => [10.0, 20.0, 30.0, 40.0],
            "Cleaning" => [1i64, 0, 1, 0],
        ]
        .unwrap();
        Dataset::from_frame(df, "hash").unwrap()
    }

    #[test]
    fn test_pipeline_builder_default() {
        let pipeline = EdaPipeline::builder().build().unwrap();
        assert_eq!(pipeline.config().iqr_multiplier, 1.5);
    }

    #[test]
    fn test_pipeline_builder_rejects_invalid_config() {
        let config = EdaConfig {
            histogram_bins: 0,
            ..EdaConfig::default()
        };
        assert!(EdaPipeline::builder().config(config).build().is_err());
    }

    #[test]
    fn test_run_records_every_section() {
        let report = EdaPipeline::builder()
            .build()
            .unwrap()
            .run(&solar_dataset())
            .unwrap();

        assert_eq!(report.sections.len(), SECTIONS.len());
        assert_eq!(report.rows, 4);
        assert_eq!(report.content_hash, "hash");

        let correlation = report.section(SectionKind::Correlation).unwrap();
        assert!(correlation.is_skipped());
        assert_eq!(correlation.missing_columns, vec!["dhi", "tmoda", "tmodb"]);

        let comments = report.section(SectionKind::Comments).unwrap();
        assert_eq!(comments.missing_columns, vec!["comments"]);

        assert!(!report.section(SectionKind::CleanedPreview).unwrap().is_skipped());
    }

    #[test]
    fn test_run_computes_core_sections() {
        let report = EdaPipeline::builder()
            .build()
            .unwrap()
            .run(&solar_dataset())
            .unwrap();

        let quality = report.quality().unwrap();
        let names: Vec<&str> = quality.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(names, vec!["ghi", "dni", "moda"]);
        assert_eq!(quality.get("ghi").unwrap().negative_count, 1);
        assert_eq!(quality.get("ghi").unwrap().missing_count, 1);

        let zscores = report.zscores().unwrap();
        assert_eq!(zscores.get("ghi").unwrap().len(), 3);

        let cleaning = report.cleaning_impact().unwrap();
        assert_eq!(cleaning[0].cleaned, vec![10.0, 30.0]);
        assert_eq!(cleaning[0].not_cleaned, vec![20.0, 40.0]);

        let time = report.time_series().unwrap();
        assert_eq!(time.summary.parsed, 4);
        assert_eq!(time.lines.len(), 2);
        assert_eq!(time.lines[0].points[0].value, Some(5.0));
    }

    #[test]
    fn test_progress_called_once_per_section() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        EdaPipeline::builder()
            .on_progress(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap()
            .run(&solar_dataset())
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), SECTIONS.len());
    }
}
