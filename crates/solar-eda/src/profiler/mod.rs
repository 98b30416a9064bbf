//! Table-level profiling: previews, missing counts, descriptive statistics,
//! histograms, correlations and value counts.

pub mod statistics;

use std::collections::HashMap;

use polars::prelude::*;
use tracing::debug;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::types::{
    ColumnDescription, CorrelationMatrix, Histogram, MissingCount, TablePreview, ValueCount,
};
use crate::utils::{present_values, series_to_strings};

/// Stateless profiler over a [`Dataset`].
pub struct DataProfiler;

impl DataProfiler {
    /// First `rows` rows of a frame with every cell rendered as text.
    pub fn preview(frame: &DataFrame, n: usize) -> Result<TablePreview> {
        let head = frame.head(Some(n));
        let columns: Vec<String> = head
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let rendered = head
            .get_columns()
            .iter()
            .map(|c| series_to_strings(c.as_materialized_series()))
            .collect::<PolarsResult<Vec<_>>>()?;

        let rows: Vec<Vec<Option<String>>> = (0..head.height())
            .map(|r| rendered.iter().map(|col| col[r].clone()).collect::<Vec<_>>())
            .collect();

        Ok(TablePreview {
            columns,
            rows,
            total_rows: frame.height(),
        })
    }

    /// Missing values for every column, in column order.
    ///
    /// Uses [`Dataset::missing_count`], so numeric columns agree with the
    /// quality report's missing counts.
    pub fn missing_summary(dataset: &Dataset) -> Result<Vec<MissingCount>> {
        let height = dataset.height();
        dataset
            .column_names()
            .into_iter()
            .map(|column| -> Result<MissingCount> {
                let missing = dataset.missing_count(&column)?;
                Ok(MissingCount {
                    column,
                    missing,
                    percentage: if height > 0 {
                        missing as f64 / height as f64 * 100.0
                    } else {
                        0.0
                    },
                })
            })
            .collect()
    }

    /// count / mean / std / min / quartiles / max for each numeric column.
    pub fn describe(dataset: &Dataset) -> Result<Vec<ColumnDescription>> {
        let mut descriptions = Vec::new();
        for name in dataset.column_names() {
            if !dataset.is_numeric_column(&name) {
                debug!("Skipping non-numeric column '{}' in describe", name);
                continue;
            }
            let values = present_values(&dataset.numeric_values(&name)?);
            let sorted = statistics::sorted(&values);

            descriptions.push(ColumnDescription {
                column: name,
                count: values.len(),
                mean: statistics::mean(&values),
                std: statistics::sample_std(&values),
                min: sorted.first().copied(),
                q25: statistics::quantile_sorted(&sorted, 0.25),
                median: statistics::quantile_sorted(&sorted, 0.5),
                q75: statistics::quantile_sorted(&sorted, 0.75),
                max: sorted.last().copied(),
            });
        }
        Ok(descriptions)
    }

    /// One histogram per requested column that is present.
    pub fn histograms(dataset: &Dataset, columns: &[String], bins: usize) -> Result<Vec<Histogram>> {
        dataset
            .present_columns(columns)
            .into_iter()
            .map(|column| -> Result<Histogram> {
                let values = dataset.numeric_values(&column)?;
                let present = present_values(&values);
                let (edges, counts) = statistics::histogram(&present, bins);
                Ok(Histogram {
                    missing: values.len() - present.len(),
                    column,
                    edges,
                    counts,
                })
            })
            .collect()
    }

    /// Pearson matrix of the requested columns. Callers check presence.
    pub fn correlation_matrix(dataset: &Dataset, columns: &[String]) -> Result<CorrelationMatrix> {
        let series = columns
            .iter()
            .map(|c| dataset.numeric_values(c))
            .collect::<Result<Vec<_>>>()?;

        let values: Vec<Vec<Option<f64>>> = series
            .iter()
            .map(|a| {
                series
                    .iter()
                    .map(|b| statistics::pearson(a, b))
                    .collect::<Vec<_>>()
            })
            .collect();

        Ok(CorrelationMatrix {
            columns: columns.to_vec(),
            values,
        })
    }

    /// Occurrences of each present value, most frequent first, ties by value.
    pub fn value_counts(dataset: &Dataset, column: &str) -> Result<Vec<ValueCount>> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for value in dataset.text_values(column)?.into_iter().flatten() {
            *counts.entry(value).or_insert(0) += 1;
        }

        let mut counts: Vec<ValueCount> = counts
            .into_iter()
            .map(|(value, count)| ValueCount { value, count })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
        Ok(counts)
    }

    /// A new frame without the rows where `column` is missing.
    pub fn drop_missing(dataset: &Dataset, column: &str) -> Result<DataFrame> {
        let mask = dataset.series(column)?.is_not_null();
        Ok(dataset.frame().filter(&mask)?)
    }
}
