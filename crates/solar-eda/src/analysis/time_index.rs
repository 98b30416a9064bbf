//! Timestamp parsing and time-ordered views of measurement columns.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, warn};

use crate::dataset::Dataset;
use crate::error::Result;
use crate::types::{TimeParseSummary, TimePoint, TimeSeriesLine};

/// Maximum number of unparseable row indices kept in the summary.
const FAILED_ROW_SAMPLE: usize = 20;

const DATETIME_FORMATS: [&str; 12] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Parse one timestamp cell.
///
/// RFC 3339 values are converted to UTC and stripped of their offset; a bare
/// date is taken as midnight.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Rows re-keyed by their parsed timestamp.
///
/// Rows with a missing or unparseable timestamp are left out of the index.
/// Rows sharing a timestamp keep their original relative order.
#[derive(Debug, Clone)]
pub struct TimeIndex {
    entries: Vec<(usize, NaiveDateTime)>,
    summary: TimeParseSummary,
}

impl TimeIndex {
    /// Parse the timestamp column of a dataset.
    pub fn parse(dataset: &Dataset, column: &str) -> Result<Self> {
        let cells = dataset.text_values(column)?;

        let mut entries = Vec::with_capacity(cells.len());
        let mut missing = 0;
        let mut failed = 0;
        let mut failed_rows = Vec::new();

        for (row, cell) in cells.iter().enumerate() {
            match cell.as_deref().map(str::trim) {
                None | Some("") => missing += 1,
                Some(text) => match parse_timestamp(text) {
                    Some(ts) => entries.push((row, ts)),
                    None => {
                        failed += 1;
                        if failed_rows.len() < FAILED_ROW_SAMPLE {
                            failed_rows.push(row);
                        }
                    }
                },
            }
        }

        if failed > 0 {
            warn!(
                "{} value(s) in '{}' could not be parsed as timestamps",
                failed, column
            );
        }

        entries.sort_by_key(|(_, ts)| *ts);

        let summary = TimeParseSummary {
            column: column.to_string(),
            parsed: entries.len(),
            missing,
            failed,
            failed_rows,
            first: entries.first().map(|(_, ts)| *ts),
            last: entries.last().map(|(_, ts)| *ts),
        };
        debug!(
            "Time index on '{}': {} parsed, {} missing, {} failed",
            column, summary.parsed, summary.missing, summary.failed
        );

        Ok(Self { entries, summary })
    }

    pub fn summary(&self) -> &TimeParseSummary {
        &self.summary
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dataset row indices in timestamp order.
    pub fn row_order(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|(row, _)| *row)
    }

    /// One column's values keyed by timestamp, missing values kept as gaps.
    pub fn line(&self, dataset: &Dataset, column: &str) -> Result<TimeSeriesLine> {
        let values = dataset.numeric_values(column)?;
        let points = self
            .entries
            .iter()
            .map(|(row, ts)| TimePoint {
                timestamp: *ts,
                value: values[*row],
            })
            .collect();

        Ok(TimeSeriesLine {
            column: column.to_string(),
            points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_parse_timestamp_layouts() {
        let expected = ts("2021-08-09 10:30:00");
        assert_eq!(parse_timestamp("2021-08-09 10:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2021-08-09T10:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2021-08-09 10:30"), Some(expected));
        assert_eq!(parse_timestamp("08/09/2021 10:30"), Some(expected));
        assert_eq!(parse_timestamp("2021-08-09T12:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp(" 2021-08-09 10:30:00 "), Some(expected));
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        assert_eq!(parse_timestamp("2021-08-09"), Some(ts("2021-08-09 00:00:00")));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2021-13-40 10:00"), None);
    }

    #[test]
    fn test_time_index_sorts_and_counts() {
        let df = df![
            "timestamp" => [
                Some("2021-08-09 00:03"),
                None,
                Some("2021-08-09 00:01"),
                Some("garbage"),
                Some("2021-08-09 00:02"),
            ],
            "ghi" => [Some(3.0), Some(9.0), Some(1.0), Some(7.0), None],
        ]
        .unwrap();
        let ds = Dataset::from_frame(df, "test").unwrap();
        let index = TimeIndex::parse(&ds, "timestamp").unwrap();

        let summary = index.summary();
        assert_eq!(summary.parsed, 3);
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failed_rows, vec![3]);
        assert_eq!(summary.first, Some(ts("2021-08-09 00:01:00")));
        assert_eq!(summary.last, Some(ts("2021-08-09 00:03:00")));
        assert_eq!(index.row_order().collect::<Vec<_>>(), vec![2, 4, 0]);

        let line = index.line(&ds, "ghi").unwrap();
        let values: Vec<Option<f64>> = line.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![Some(1.0), None, Some(3.0)]);
    }

    #[test]
    fn test_equal_timestamps_keep_row_order() {
        let df = df![
            "timestamp" => ["2021-08-09 00:05", "2021-08-09 00:01", "2021-08-09 00:05"],
            "ghi" => [1.0, 2.0, 3.0],
        ]
        .unwrap();
        let ds = Dataset::from_frame(df, "test").unwrap();
        let index = TimeIndex::parse(&ds, "timestamp").unwrap();
        assert_eq!(index.row_order().collect::<Vec<_>>(), vec![1, 0, 2]);
    }

    #[test]
    fn test_failed_rows_sample_is_capped() {
        let cells: Vec<&str> = vec!["bad"; 50];
        let df = df!["timestamp" => cells].unwrap();
        let ds = Dataset::from_frame(df, "test").unwrap();
        let index = TimeIndex::parse(&ds, "timestamp").unwrap();

        assert!(index.is_empty());
        assert_eq!(index.summary().failed, 50);
        assert_eq!(index.summary().failed_rows.len(), FAILED_ROW_SAMPLE);
    }
}
