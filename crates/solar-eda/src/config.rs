//! Configuration types for the EDA pipeline.
//!
//! This module provides configuration options using the builder pattern.
//! Every column list the pipeline consults lives in [`ColumnSets`] so a
//! station with different sensor names can be analyzed without code changes.

use serde::{Deserialize, Serialize};

use crate::utils::normalize_column_name;

/// Columns checked for negative, missing and IQR outlier counts.
pub const QUALITY_COLUMNS: [&str; 7] = ["ghi", "dni", "dhi", "moda", "modb", "ws", "wsgust"];

/// Columns plotted against the timestamp.
pub const TIME_SERIES_COLUMNS: [&str; 4] = ["ghi", "dni", "dhi", "tamb"];

/// Module sensors compared across cleaning events.
pub const CLEANING_SENSOR_COLUMNS: [&str; 2] = ["moda", "modb"];

/// Columns of the correlation matrix. All of them must be present.
pub const CORRELATION_COLUMNS: [&str; 5] = ["ghi", "dni", "dhi", "tmoda", "tmodb"];

/// Columns with histograms.
pub const HISTOGRAM_COLUMNS: [&str; 5] = ["ghi", "dni", "dhi", "ws", "tamb"];

/// Columns with z-scores.
pub const ZSCORE_COLUMNS: [&str; 5] = ["ghi", "dni", "dhi", "ws", "tamb"];

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Axis assignment for a scatter section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScatterColumns {
    pub x: String,
    pub y: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl ScatterColumns {
    pub fn new(x: &str, y: &str) -> Self {
        Self {
            x: x.to_string(),
            y: y.to_string(),
            size: None,
            color: None,
        }
    }

    pub fn with_size(mut self, column: &str) -> Self {
        self.size = Some(column.to_string());
        self
    }

    pub fn with_color(mut self, column: &str) -> Self {
        self.color = Some(column.to_string());
        self
    }

    /// Every distinct column the scatter needs, in axis order.
    pub fn required(&self) -> Vec<String> {
        let mut cols = vec![self.x.clone(), self.y.clone()];
        for extra in [&self.size, &self.color].into_iter().flatten() {
            if !cols.contains(extra) {
                cols.push(extra.clone());
            }
        }
        cols
    }

    fn normalized(self) -> Self {
        Self {
            x: normalize_column_name(&self.x),
            y: normalize_column_name(&self.y),
            size: self.size.as_deref().map(normalize_column_name),
            color: self.color.as_deref().map(normalize_column_name),
        }
    }
}

/// Column names used by each section of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSets {
    pub quality: Vec<String>,
    pub time_series: Vec<String>,
    pub cleaning_indicator: String,
    pub cleaning_sensors: Vec<String>,
    pub correlation: Vec<String>,
    /// Polar scatter: x is the direction in degrees, y the speed.
    pub wind: ScatterColumns,
    pub humidity_temperature: ScatterColumns,
    pub histogram: Vec<String>,
    pub zscore: Vec<String>,
    pub bubble: ScatterColumns,
    pub comments: String,
}

impl Default for ColumnSets {
    fn default() -> Self {
        Self {
            quality: owned(&QUALITY_COLUMNS),
            time_series: owned(&TIME_SERIES_COLUMNS),
            cleaning_indicator: "cleaning".to_string(),
            cleaning_sensors: owned(&CLEANING_SENSOR_COLUMNS),
            correlation: owned(&CORRELATION_COLUMNS),
            wind: ScatterColumns::new("wd", "ws")
                .with_size("wsgust")
                .with_color("wsgust"),
            humidity_temperature: ScatterColumns::new("rh", "tamb"),
            histogram: owned(&HISTOGRAM_COLUMNS),
            zscore: owned(&ZSCORE_COLUMNS),
            bubble: ScatterColumns::new("ghi", "tamb")
                .with_size("rh")
                .with_color("ws"),
            comments: "comments".to_string(),
        }
    }
}

impl ColumnSets {
    /// Lowercase every name so lookups match the loaded dataset.
    pub fn normalized(self) -> Self {
        let list = |v: Vec<String>| -> Vec<String> {
            v.iter().map(|s| normalize_column_name(s)).collect()
        };
        Self {
            quality: list(self.quality),
            time_series: list(self.time_series),
            cleaning_indicator: normalize_column_name(&self.cleaning_indicator),
            cleaning_sensors: list(self.cleaning_sensors),
            correlation: list(self.correlation),
            wind: self.wind.normalized(),
            humidity_temperature: self.humidity_temperature.normalized(),
            histogram: list(self.histogram),
            zscore: list(self.zscore),
            bubble: self.bubble.normalized(),
            comments: normalize_column_name(&self.comments),
        }
    }
}

/// Configuration for loading and analyzing a sensor log.
///
/// Use [`EdaConfig::builder()`] to create a new configuration with a fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use solar_eda::config::EdaConfig;
///
/// let config = EdaConfig::builder()
///     .iqr_multiplier(3.0)
///     .preview_rows(10)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdaConfig {
    /// Fence width in IQRs for outlier detection.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Scores above this are counted as z-score outliers.
    /// Default: 3.0
    pub zscore_threshold: f64,

    /// Rows shown in head-of-table previews.
    /// Default: 5
    pub preview_rows: usize,

    /// Number of equal-width bins per histogram.
    /// Default: 30
    pub histogram_bins: usize,

    /// Column holding the observation time.
    /// Default: "timestamp"
    pub timestamp_column: String,

    /// Per-section column lists.
    pub columns: ColumnSets,

    /// Rows scanned by the CSV reader to infer column types. Every row when None.
    /// Default: None
    pub infer_schema_length: Option<usize>,

    /// Worksheet to read from spreadsheets. The first sheet when None.
    /// Default: None
    pub sheet: Option<String>,
}

impl Default for EdaConfig {
    fn default() -> Self {
        Self {
            iqr_multiplier: 1.5,
            zscore_threshold: 3.0,
            preview_rows: 5,
            histogram_bins: 30,
            timestamp_column: "timestamp".to_string(),
            columns: ColumnSets::default(),
            infer_schema_length: None,
            sheet: None,
        }
    }
}

impl EdaConfig {
    /// Create a new configuration builder.
    pub fn builder() -> EdaConfigBuilder {
        EdaConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier <= 0.0 {
            return Err(ConfigValidationError::InvalidMultiplier {
                field: "iqr_multiplier".to_string(),
                value: self.iqr_multiplier,
            });
        }

        if !self.zscore_threshold.is_finite() || self.zscore_threshold <= 0.0 {
            return Err(ConfigValidationError::InvalidMultiplier {
                field: "zscore_threshold".to_string(),
                value: self.zscore_threshold,
            });
        }

        if self.preview_rows == 0 {
            return Err(ConfigValidationError::ZeroCount("preview_rows".to_string()));
        }

        if self.histogram_bins == 0 {
            return Err(ConfigValidationError::ZeroCount(
                "histogram_bins".to_string(),
            ));
        }

        if self.infer_schema_length == Some(0) {
            return Err(ConfigValidationError::ZeroCount(
                "infer_schema_length".to_string(),
            ));
        }

        if self.timestamp_column.trim().is_empty() {
            return Err(ConfigValidationError::EmptyColumnName(
                "timestamp_column".to_string(),
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid value for '{field}': {value} (must be a positive finite number)")]
    InvalidMultiplier { field: String, value: f64 },

    #[error("Invalid value for '{0}': must be at least 1")]
    ZeroCount(String),

    #[error("Column name for '{0}' must not be empty")]
    EmptyColumnName(String),
}

/// Builder for [`EdaConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct EdaConfigBuilder {
    iqr_multiplier: Option<f64>,
    zscore_threshold: Option<f64>,
    preview_rows: Option<usize>,
    histogram_bins: Option<usize>,
    timestamp_column: Option<String>,
    columns: Option<ColumnSets>,
    quality_columns: Option<Vec<String>>,
    zscore_columns: Option<Vec<String>>,
    infer_schema_length: Option<usize>,
    sheet: Option<String>,
}

impl EdaConfigBuilder {
    /// Set the IQR fence multiplier (1.5 gives Tukey's fences).
    pub fn iqr_multiplier(mut self, k: f64) -> Self {
        self.iqr_multiplier = Some(k);
        self
    }

    /// Set the z-score above which a value is flagged.
    pub fn zscore_threshold(mut self, threshold: f64) -> Self {
        self.zscore_threshold = Some(threshold);
        self
    }

    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    pub fn timestamp_column(mut self, column: impl Into<String>) -> Self {
        self.timestamp_column = Some(column.into());
        self
    }

    /// Replace every per-section column list at once.
    pub fn columns(mut self, columns: ColumnSets) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Override only the quality-check column list.
    pub fn quality_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.quality_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Override only the z-score column list.
    pub fn zscore_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.zscore_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Read the named worksheet instead of the first one.
    pub fn sheet(mut self, name: impl Into<String>) -> Self {
        self.sheet = Some(name.into());
        self
    }

    /// Build the configuration.
    ///
    /// Column names are lowercased here so they match the loaded dataset.
    pub fn build(self) -> Result<EdaConfig, ConfigValidationError> {
        let mut columns = self.columns.unwrap_or_default();
        if let Some(quality) = self.quality_columns {
            columns.quality = quality;
        }
        if let Some(zscore) = self.zscore_columns {
            columns.zscore = zscore;
        }

        let config = EdaConfig {
            iqr_multiplier: self.iqr_multiplier.unwrap_or(1.5),
            zscore_threshold: self.zscore_threshold.unwrap_or(3.0),
            preview_rows: self.preview_rows.unwrap_or(5),
            histogram_bins: self.histogram_bins.unwrap_or(30),
            timestamp_column: normalize_column_name(
                self.timestamp_column.as_deref().unwrap_or("timestamp"),
            ),
            columns: columns.normalized(),
            infer_schema_length: self.infer_schema_length,
            sheet: self.sheet,
        };

        config.validate()?;
        Ok(config)
    }
}
