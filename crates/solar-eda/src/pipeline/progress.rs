//! Progress reporting for the section pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use solar_eda::EdaPipeline;
//!
//! let report = EdaPipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run(&dataset)?;
//! ```

use serde::{Deserialize, Serialize};

use crate::types::SectionKind;

/// Emitted once per section, after it has been computed or skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub section: SectionKind,

    /// Zero-based position of the section.
    pub index: usize,

    /// Number of sections in the run.
    pub total: usize,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// The section's required columns were not all present.
    pub skipped: bool,

    /// Human-readable message describing the section outcome
    pub message: String,
}

impl ProgressUpdate {
    pub fn computed(section: SectionKind, index: usize, total: usize) -> Self {
        Self::new(
            section,
            index,
            total,
            false,
            format!("Computed {}", section.display_name()),
        )
    }

    pub fn skipped(section: SectionKind, index: usize, total: usize, missing: &[String]) -> Self {
        Self::new(
            section,
            index,
            total,
            true,
            format!(
                "Skipped {} (missing: {})",
                section.display_name(),
                missing.join(", ")
            ),
        )
    }

    fn new(
        section: SectionKind,
        index: usize,
        total: usize,
        skipped: bool,
        message: String,
    ) -> Self {
        let progress = if total > 0 {
            (index + 1) as f32 / total as f32
        } else {
            1.0
        };
        Self {
            section,
            index,
            total,
            progress: progress.clamp(0.0, 1.0),
            skipped,
            message,
        }
    }
}

/// Trait for receiving progress updates while the report is built.
///
/// Implementations must be `Send + Sync` so a pipeline can be handed to a
/// worker thread while the caller keeps rendering updates.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_progress_fraction() {
        let first = ProgressUpdate::computed(SectionKind::Preview, 0, 4);
        let last = ProgressUpdate::computed(SectionKind::CleanedPreview, 3, 4);
        assert_eq!(first.progress, 0.25);
        assert_eq!(last.progress, 1.0);
        assert!(!first.skipped);
    }

    #[test]
    fn test_skipped_message_lists_columns() {
        let missing = vec!["tmoda".to_string(), "tmodb".to_string()];
        let update = ProgressUpdate::skipped(SectionKind::Correlation, 6, 14, &missing);
        assert!(update.skipped);
        assert!(update.message.contains("tmoda, tmodb"));
    }

    #[test]
    fn test_closure_reporter() {
        let seen = Mutex::new(Vec::new());
        let reporter = ClosureProgressReporter::new(|update: ProgressUpdate| {
            seen.lock().unwrap().push(update.section);
        });
        reporter.report(ProgressUpdate::computed(SectionKind::Quality, 3, 14));
        assert_eq!(*seen.lock().unwrap(), vec![SectionKind::Quality]);
    }
}
