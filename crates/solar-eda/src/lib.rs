//! Solar Irradiance EDA Library
//!
//! Exploratory data analysis for solar-irradiance and weather sensor logs,
//! built with Rust and Polars.
//!
//! # Overview
//!
//! A tabular file (CSV or a spreadsheet sheet) is loaded into a [`Dataset`]
//! and turned into a fixed sequence of structured report sections:
//!
//! - **Profiling**: head-of-table preview, missing values, descriptive statistics
//! - **Data Quality**: negative, missing and IQR outlier counts per sensor column
//! - **Z-Scores**: absolute z-scores with a configurable flag threshold
//! - **Time Series**: measurements re-keyed by the parsed timestamp
//! - **Cleaning Impact**: module readings split by the cleaning indicator
//! - **Relationships**: correlation matrix, wind / humidity / bubble scatter points
//! - **Distributions**: equal-width histograms
//! - **Comments**: value counts and a preview of the commented rows
//!
//! Sections whose columns are absent are recorded as skipped, never as errors.
//! Rendering is left to the caller; every output type is serializable.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use solar_eda::{EdaConfig, EdaPipeline, loader};
//!
//! let config = EdaConfig::default();
//! let dataset = loader::load_path("data/benin-malanville.csv".as_ref(), &config)?;
//!
//! let report = EdaPipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run(&dataset)?;
//!
//! if let Some(quality) = report.quality() {
//!     for column in quality.iter() {
//!         println!("{}: {} outliers", column.column, column.outlier_count);
//!     }
//! }
//! ```
//!
//! # Configuration
//!
//! Use [`EdaConfig`] to customize thresholds and the per-section column lists:
//!
//! ```rust,ignore
//! use solar_eda::config::*;
//!
//! let config = EdaConfig::builder()
//!     .iqr_multiplier(3.0)            // wider Tukey fences
//!     .zscore_threshold(2.5)
//!     .timestamp_column("Time")
//!     .quality_columns(["ghi", "dni", "dhi"])
//!     .build()?;
//! ```

pub mod analysis;
pub mod config;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod profiler;
pub mod quality;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use analysis::{CleaningImpact, ScatterBuilder, TimeIndex, parse_timestamp};
pub use config::{ColumnSets, ConfigValidationError, EdaConfig, EdaConfigBuilder, ScatterColumns};
pub use dataset::Dataset;
pub use error::{EdaError, Result as EdaResult, ResultExt};
pub use loader::{DatasetCache, FileFormat};
pub use pipeline::{
    ClosureProgressReporter, EdaPipeline, EdaPipelineBuilder, ProgressReporter, ProgressUpdate,
    Requirement,
};
pub use profiler::DataProfiler;
pub use quality::DataQualityAnalyzer;
pub use reporting::{ReportGenerator, ReportMetadata, SavedReport};
pub use types::{
    CleaningGroups, ColumnQuality, EdaReport, IqrBounds, QualityReport, SectionKind,
    SectionOutput, SectionReport, ZScoreMap, ZScoreSeries,
};
