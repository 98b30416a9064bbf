//! In-memory sensor log with normalized column names.

use std::collections::HashSet;

use polars::prelude::*;
use tracing::warn;

use crate::error::{EdaError, Result};
use crate::utils::{normalize_column_name, series_to_f64, series_to_strings};

/// A loaded table whose column names are trimmed and lowercased.
///
/// The frame is never mutated by the analyses; derived tables (such as the
/// comment-filtered preview) are new frames.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    content_hash: String,
}

impl Dataset {
    /// Wrap a frame, normalizing its column names.
    ///
    /// Names that collide after normalization ("GHI" and "ghi") keep the first
    /// occurrence as-is and get a numeric suffix on later ones.
    pub fn from_frame(frame: DataFrame, content_hash: impl Into<String>) -> Result<Self> {
        if frame.width() == 0 {
            return Err(EdaError::EmptyDataset("no columns found".to_string()));
        }

        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(frame.width());
        for column in frame.get_columns() {
            let base = normalize_column_name(column.name());
            let mut name = base.clone();
            let mut suffix = 1;
            while !seen.insert(name.clone()) {
                name = format!("{base}_{suffix}");
                suffix += 1;
            }
            if name != base {
                warn!("Duplicate column '{}' renamed to '{}'", column.name(), name);
            }
            columns.push(column.clone().with_name(name.into()));
        }

        Ok(Self {
            frame: DataFrame::new(columns)?,
            content_hash: content_hash.into(),
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// SHA-256 of the bytes this dataset was loaded from, hex encoded.
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Case-insensitive column presence check.
    pub fn has_column(&self, name: &str) -> bool {
        let name = normalize_column_name(name);
        self.frame.column(&name).is_ok()
    }

    /// The subset of `names` absent from this dataset, order preserved.
    pub fn missing_columns<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        names
            .iter()
            .map(|n| normalize_column_name(n.as_ref()))
            .filter(|n| !self.has_column(n))
            .collect()
    }

    /// The subset of `names` present in this dataset, order preserved.
    pub fn present_columns<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        names
            .iter()
            .map(|n| normalize_column_name(n.as_ref()))
            .filter(|n| self.has_column(n))
            .collect()
    }

    pub fn series(&self, name: &str) -> Result<&Series> {
        let name = normalize_column_name(name);
        self.frame
            .column(&name)
            .map(|c| c.as_materialized_series())
            .map_err(|_| EdaError::ColumnNotFound(name))
    }

    /// Column values coerced to f64, `None` where missing or non-numeric.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        Ok(series_to_f64(self.series(name)?)?)
    }

    /// Column values as text, `None` where missing.
    pub fn text_values(&self, name: &str) -> Result<Vec<Option<String>>> {
        Ok(series_to_strings(self.series(name)?)?)
    }

    /// Missing cells in a column, counted the way the numeric analyses see them.
    ///
    /// Numeric columns, and text columns where most present values parse as
    /// numbers, count nulls, NaN, infinities and unparseable text. Other text
    /// columns count nulls only.
    pub fn missing_count(&self, name: &str) -> Result<usize> {
        let series = self.series(name)?;
        let numeric = self.numeric_values(name)?;
        let parsed = numeric.iter().filter(|v| v.is_some()).count();
        let non_null = series.len() - series.null_count();

        if self.is_numeric_column(name) || parsed * 2 > non_null {
            Ok(numeric.len() - parsed)
        } else {
            Ok(series.null_count())
        }
    }

    /// Whether a column holds numbers natively (not text that may parse).
    pub fn is_numeric_column(&self, name: &str) -> bool {
        self.series(name)
            .map(|s| crate::utils::is_numeric_dtype(s.dtype()))
            .unwrap_or(false)
    }
}
