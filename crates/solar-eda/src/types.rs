use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::ScatterColumns;

// ============================================================================
// Table Overview Types
// ============================================================================

/// First rows of a table, every cell rendered as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
    /// Row count of the whole table, not just the preview.
    pub total_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingCount {
    pub column: String,
    pub missing: usize,
    /// Share of rows missing, 0.0 - 100.0.
    pub percentage: f64,
}

/// Descriptive statistics of one numeric column.
///
/// `std` is the sample standard deviation (n - 1). Statistics are `None`
/// when the column has no present values (and `std` also for a single value).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescription {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

// ============================================================================
// Quality Types
// ============================================================================

/// Tukey fences of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    /// Strictly outside the fences. A value equal to a bound is not an outlier.
    pub fn is_outlier(&self, value: f64) -> bool {
        value > self.upper || value < self.lower
    }
}

/// Quality counts of one column.
///
/// `outlier_count + within_bounds_count + missing_count == row_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnQuality {
    pub column: String,
    pub row_count: usize,
    pub negative_count: usize,
    pub missing_count: usize,
    pub outlier_count: usize,
    pub within_bounds_count: usize,
    /// `None` when the column has no present values.
    pub bounds: Option<IqrBounds>,
}

/// Per-column quality counts, in the order the columns were requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub columns: Vec<ColumnQuality>,
}

impl QualityReport {
    pub fn get(&self, column: &str) -> Option<&ColumnQuality> {
        self.columns.iter().find(|c| c.column == column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnQuality> {
        self.columns.iter()
    }
}

/// Absolute z-scores of the present values of one column.
///
/// `scores[i]` belongs to dataset row `row_indices[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZScoreSeries {
    pub column: String,
    pub mean: Option<f64>,
    /// Population standard deviation (n).
    pub std_dev: Option<f64>,
    /// All present values are equal (or there is only one); scores are 0.0.
    pub zero_variance: bool,
    pub row_indices: Vec<usize>,
    pub scores: Vec<f64>,
    pub threshold: f64,
    /// Scores strictly above `threshold`.
    pub flagged_count: usize,
}

impl ZScoreSeries {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZScoreMap {
    pub columns: Vec<ZScoreSeries>,
}

impl ZScoreMap {
    pub fn get(&self, column: &str) -> Option<&ZScoreSeries> {
        self.columns.iter().find(|c| c.column == column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Raw value next to its z-score, for the head-of-table view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZScoreRow {
    pub row: usize,
    pub value: f64,
    pub zscore: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZScorePreview {
    pub column: String,
    pub rows: Vec<ZScoreRow>,
}

// ============================================================================
// Time, Group and Chart Data Types
// ============================================================================

/// Outcome of parsing the timestamp column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeParseSummary {
    pub column: String,
    pub parsed: usize,
    pub missing: usize,
    pub failed: usize,
    /// First few rows that did not parse.
    pub failed_rows: Vec<usize>,
    pub first: Option<NaiveDateTime>,
    pub last: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub timestamp: NaiveDateTime,
    pub value: Option<f64>,
}

/// One column re-keyed by timestamp, in time order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesLine {
    pub column: String,
    pub points: Vec<TimePoint>,
}

/// Sensor readings split by the cleaning indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningGroups {
    pub sensor: String,
    /// Present readings on rows where the indicator is 1, in row order.
    pub cleaned: Vec<f64>,
    /// Present readings on rows where the indicator is 0, in row order.
    pub not_cleaned: Vec<f64>,
}

/// Pearson coefficients over pairwise-complete rows. `None` is undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub row: usize,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<f64>,
}

/// Rows with every assigned axis present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSeries {
    pub axes: ScatterColumns,
    pub points: Vec<ScatterPoint>,
    /// Rows dropped for a missing coordinate.
    pub dropped_rows: usize,
}

/// Equal-width bins over the present values of a column.
///
/// `edges.len() == counts.len() + 1`; the last bin is closed on the right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub column: String,
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
    pub missing: usize,
}

// ============================================================================
// Section and Report Types
// ============================================================================

/// The report sections, in the order they are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Preview,
    MissingValues,
    Describe,
    Quality,
    TimeSeries,
    CleaningImpact,
    Correlation,
    WindScatter,
    HumidityTemperature,
    Histograms,
    ZScores,
    Bubble,
    Comments,
    CleanedPreview,
}

impl SectionKind {
    /// Returns a human-readable name for the section.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Preview => "Data Preview",
            Self::MissingValues => "Missing Values",
            Self::Describe => "Summary Statistics",
            Self::Quality => "Data Quality",
            Self::TimeSeries => "Time Series",
            Self::CleaningImpact => "Cleaning Impact",
            Self::Correlation => "Correlation",
            Self::WindScatter => "Wind Analysis",
            Self::HumidityTemperature => "Humidity vs Temperature",
            Self::Histograms => "Histograms",
            Self::ZScores => "Z-Scores",
            Self::Bubble => "Bubble Chart",
            Self::Comments => "Comments",
            Self::CleanedPreview => "Cleaned Data Preview",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesView {
    pub summary: TimeParseSummary,
    pub lines: Vec<TimeSeriesLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZScoreView {
    pub scores: ZScoreMap,
    pub previews: Vec<ZScorePreview>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentsView {
    pub counts: Vec<ValueCount>,
    /// Rows that carry a comment.
    pub kept_rows: usize,
    pub dropped_rows: usize,
}

/// Structured output of one computed section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SectionOutput {
    Table(TablePreview),
    MissingValues(Vec<MissingCount>),
    Describe(Vec<ColumnDescription>),
    Quality(QualityReport),
    TimeSeries(TimeSeriesView),
    CleaningImpact(Vec<CleaningGroups>),
    Correlation(CorrelationMatrix),
    Scatter(ScatterSeries),
    Histograms(Vec<Histogram>),
    ZScores(ZScoreView),
    Comments(CommentsView),
}

/// One section of the report, computed or skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionReport {
    pub kind: SectionKind,
    /// `None` when the section was skipped.
    pub output: Option<SectionOutput>,
    /// Columns whose absence caused the skip.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_columns: Vec<String>,
}

impl SectionReport {
    pub fn computed(kind: SectionKind, output: SectionOutput) -> Self {
        Self {
            kind,
            output: Some(output),
            missing_columns: Vec::new(),
        }
    }

    pub fn skipped(kind: SectionKind, missing_columns: Vec<String>) -> Self {
        Self {
            kind,
            output: None,
            missing_columns,
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.output.is_none()
    }
}

/// Every section for one dataset, in section order.
///
/// Contains nothing time-dependent, so the same input bytes and configuration
/// always give an equal report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdaReport {
    pub content_hash: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub sections: Vec<SectionReport>,
}

impl EdaReport {
    pub fn section(&self, kind: SectionKind) -> Option<&SectionReport> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn computed_sections(&self) -> impl Iterator<Item = &SectionReport> {
        self.sections.iter().filter(|s| !s.is_skipped())
    }

    pub fn skipped_sections(&self) -> impl Iterator<Item = &SectionReport> {
        self.sections.iter().filter(|s| s.is_skipped())
    }

    pub fn quality(&self) -> Option<&QualityReport> {
        match self.section(SectionKind::Quality)?.output.as_ref()? {
            SectionOutput::Quality(report) => Some(report),
            _ => None,
        }
    }

    pub fn zscores(&self) -> Option<&ZScoreMap> {
        match self.section(SectionKind::ZScores)?.output.as_ref()? {
            SectionOutput::ZScores(view) => Some(&view.scores),
            _ => None,
        }
    }

    pub fn cleaning_impact(&self) -> Option<&[CleaningGroups]> {
        match self.section(SectionKind::CleaningImpact)?.output.as_ref()? {
            SectionOutput::CleaningImpact(groups) => Some(groups),
            _ => None,
        }
    }

    pub fn time_series(&self) -> Option<&TimeSeriesView> {
        match self.section(SectionKind::TimeSeries)?.output.as_ref()? {
            SectionOutput::TimeSeries(view) => Some(view),
            _ => None,
        }
    }
}
