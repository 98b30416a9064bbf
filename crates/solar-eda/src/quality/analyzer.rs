use tracing::{debug, warn};

use crate::dataset::Dataset;
use crate::error::Result;
use crate::profiler::statistics;
use crate::types::{
    ColumnQuality, IqrBounds, QualityReport, ZScoreMap, ZScorePreview, ZScoreRow, ZScoreSeries,
};

/// Quality checks over the recognized measurement columns.
///
/// Nothing here mutates the dataset. Columns that are requested but absent
/// are skipped without an entry.
pub struct DataQualityAnalyzer;

impl DataQualityAnalyzer {
    /// Negative, missing and IQR outlier counts for each requested column.
    ///
    /// `iqr_multiplier` is the fence width (1.5 for Tukey's fences).
    pub fn analyze(
        dataset: &Dataset,
        columns: &[String],
        iqr_multiplier: f64,
    ) -> Result<QualityReport> {
        let mut report = QualityReport::default();

        for column in dataset.present_columns(columns) {
            let values = dataset.numeric_values(&column)?;
            let quality = Self::column_quality(&column, &values, iqr_multiplier);
            debug!(
                "Quality of '{}': {} negative, {} missing, {} outliers",
                quality.column, quality.negative_count, quality.missing_count, quality.outlier_count
            );
            report.columns.push(quality);
        }

        Ok(report)
    }

    /// Quality counts of a single column of values.
    ///
    /// When every present value is equal the fences collapse onto that value:
    /// values equal to it are within bounds, anything else is an outlier.
    pub fn column_quality(column: &str, values: &[Option<f64>], iqr_multiplier: f64) -> ColumnQuality {
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        let bounds = Self::iqr_bounds(&present, iqr_multiplier);

        let negative_count = present.iter().filter(|v| **v < 0.0).count();
        let missing_count = values.len() - present.len();
        let outlier_count = match &bounds {
            Some(b) => present.iter().filter(|v| b.is_outlier(**v)).count(),
            None => 0,
        };

        ColumnQuality {
            column: column.to_string(),
            row_count: values.len(),
            negative_count,
            missing_count,
            outlier_count,
            within_bounds_count: present.len() - outlier_count,
            bounds,
        }
    }

    /// Tukey fences around the linear-interpolated quartiles.
    pub fn iqr_bounds(present: &[f64], iqr_multiplier: f64) -> Option<IqrBounds> {
        let sorted = statistics::sorted(present);
        let q1 = statistics::quantile_sorted(&sorted, 0.25)?;
        let q3 = statistics::quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;

        Some(IqrBounds {
            q1,
            q3,
            iqr,
            lower: q1 - iqr_multiplier * iqr,
            upper: q3 + iqr_multiplier * iqr,
        })
    }

    /// Absolute z-scores for each requested column that is present.
    pub fn zscores(dataset: &Dataset, columns: &[String], threshold: f64) -> Result<ZScoreMap> {
        let mut map = ZScoreMap::default();

        for column in dataset.present_columns(columns) {
            let values = dataset.numeric_values(&column)?;
            let series = Self::column_zscores(&column, &values, threshold);
            if series.zero_variance && !series.is_empty() {
                warn!(
                    "Column '{}' has zero variance; z-scores set to 0",
                    series.column
                );
            }
            map.columns.push(series);
        }

        Ok(map)
    }

    /// `|v - mean| / std` over the present values, using the population std.
    ///
    /// When the std is zero every score is 0.0 and `zero_variance` is set.
    pub fn column_zscores(column: &str, values: &[Option<f64>], threshold: f64) -> ZScoreSeries {
        let (row_indices, present): (Vec<usize>, Vec<f64>) = values
            .iter()
            .enumerate()
            .filter_map(|(row, v)| v.map(|v| (row, v)))
            .unzip();

        let mean = statistics::mean(&present);
        let std_dev = statistics::population_std(&present);

        // equal values can still leave rounding noise in the computed std
        let constant = present.windows(2).all(|w| w[0] == w[1]);

        let (scores, zero_variance) = match (mean, std_dev) {
            (Some(mean), Some(std)) if std > 0.0 && !constant => (
                present.iter().map(|v| (v - mean).abs() / std).collect::<Vec<_>>(),
                false,
            ),
            (Some(_), Some(_)) => (vec![0.0; present.len()], true),
            _ => (Vec::new(), false),
        };

        let flagged_count = scores.iter().filter(|z| **z > threshold).count();

        ZScoreSeries {
            column: column.to_string(),
            mean,
            std_dev,
            zero_variance,
            row_indices,
            scores,
            threshold,
            flagged_count,
        }
    }
    /// The first `rows` scored values of a column next to their raw value.
    pub fn zscore_preview(
        dataset: &Dataset,
        series: &ZScoreSeries,
        rows: usize,
    ) -> Result<ZScorePreview> {
        let values = dataset.numeric_values(&series.column)?;
        let rows = series
            .row_indices
            .iter()
            .zip(series.scores.iter())
            .take(rows)
            .filter_map(|(row, zscore)| {
                values[*row].map(|value| ZScoreRow {
                    row: *row,
                    value,
                    zscore: *zscore,
                })
            })
            .collect();

        Ok(ZScorePreview {
            column: series.column.clone(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn dataset(df: DataFrame) -> Dataset {
        Dataset::from_frame(df, "test").unwrap()
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    // ==================== analyze tests ====================

    #[test]
    fn test_negative_and_missing_counts() {
        let ds = dataset(df!["ghi" => [Some(-5.0), Some(10.0), None]].unwrap());
        let report = DataQualityAnalyzer::analyze(&ds, &cols(&["ghi"]), 1.5).unwrap();

        let ghi = report.get("ghi").unwrap();
        assert_eq!(ghi.negative_count, 1);
        assert_eq!(ghi.missing_count, 1);
        assert_eq!(ghi.row_count, 3);
    }

    #[test]
    fn test_outlier_counts_use_interpolated_quartiles() {
        // Q1 = 3.25, Q3 = 7.75, IQR = 4.5, fences = [-3.5, 14.5]
        let ds = dataset(
            df!["ws" => [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0]].unwrap(),
        );
        let report = DataQualityAnalyzer::analyze(&ds, &cols(&["ws"]), 1.5).unwrap();

        let ws = report.get("ws").unwrap();
        let bounds = ws.bounds.unwrap();
        assert!((bounds.q1 - 3.25).abs() < 1e-12);
        assert!((bounds.q3 - 7.75).abs() < 1e-12);
        assert!((bounds.lower + 3.5).abs() < 1e-12);
        assert!((bounds.upper - 14.5).abs() < 1e-12);
        assert_eq!(ws.outlier_count, 1);
    }

    #[test]
    fn test_nulls_are_not_outliers() {
        let ds = dataset(
            df!["dni" => [Some(1.0), Some(2.0), None, Some(3.0), None, Some(4.0)]].unwrap(),
        );
        let report = DataQualityAnalyzer::analyze(&ds, &cols(&["dni"]), 1.5).unwrap();

        let dni = report.get("dni").unwrap();
        assert_eq!(dni.outlier_count, 0);
        assert_eq!(dni.missing_count, 2);
        assert_eq!(dni.within_bounds_count, 4);
    }

    #[test]
    fn test_counts_partition_rows() {
        let ds = dataset(
            df!["moda" => [Some(-50.0), Some(1.0), None, Some(2.0), Some(3.0), Some(900.0), None]]
                .unwrap(),
        );
        let report = DataQualityAnalyzer::analyze(&ds, &cols(&["moda"]), 1.5).unwrap();

        let moda = report.get("moda").unwrap();
        assert_eq!(
            moda.outlier_count + moda.within_bounds_count + moda.missing_count,
            moda.row_count
        );
        assert!(moda.outlier_count <= moda.row_count);
        assert!(moda.negative_count <= moda.row_count);
    }

    #[test]
    fn test_constant_column_has_no_outliers() {
        let ds = dataset(df!["tamb" => [25.0, 25.0, 25.0, 25.0]].unwrap());
        let report = DataQualityAnalyzer::analyze(&ds, &cols(&["tamb"]), 1.5).unwrap();

        let tamb = report.get("tamb").unwrap();
        assert_eq!(tamb.missing_count, 0);
        assert_eq!(tamb.bounds.unwrap().iqr, 0.0);
        assert_eq!(tamb.outlier_count, 0);
    }

    #[test]
    fn test_degenerate_iqr_flags_any_other_value() {
        // Q1 = Q3 = 5, so the fences collapse to [5, 5]
        let ds = dataset(df!["ghi" => [5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 6.0]].unwrap());
        let report = DataQualityAnalyzer::analyze(&ds, &cols(&["ghi"]), 1.5).unwrap();

        let ghi = report.get("ghi").unwrap();
        assert_eq!(ghi.bounds.unwrap().iqr, 0.0);
        assert_eq!(ghi.outlier_count, 1);
    }

    #[test]
    fn test_all_missing_column() {
        let ds = dataset(df!["dhi" => [None::<f64>, None, None]].unwrap());
        let report = DataQualityAnalyzer::analyze(&ds, &cols(&["dhi"]), 1.5).unwrap();

        let dhi = report.get("dhi").unwrap();
        assert_eq!(dhi.missing_count, 3);
        assert_eq!(dhi.outlier_count, 0);
        assert!(dhi.bounds.is_none());
    }

    #[test]
    fn test_infinite_values_count_as_missing() {
        let ds = dataset(
            df!["dni" => [1.0, 2.0, f64::INFINITY, 3.0, f64::NEG_INFINITY, 4.0]].unwrap(),
        );
        let report = DataQualityAnalyzer::analyze(&ds, &cols(&["dni"]), 1.5).unwrap();

        let dni = report.get("dni").unwrap();
        assert_eq!(dni.missing_count, 2);
        assert_eq!(dni.negative_count, 0);
        assert_eq!(dni.outlier_count, 0);
        let bounds = dni.bounds.unwrap();
        assert!(bounds.lower.is_finite() && bounds.upper.is_finite());
        assert!((bounds.q1 - 1.75).abs() < 1e-12);
    }

    #[test]
    fn test_absent_columns_skipped_in_order() {
        let ds = dataset(
            df![
                "WS" => [1.0, 2.0],
                "GHI" => [3.0, 4.0],
            ]
            .unwrap(),
        );
        let report =
            DataQualityAnalyzer::analyze(&ds, &cols(&["ghi", "dni", "dhi", "ws"]), 1.5).unwrap();

        let names: Vec<&str> = report.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(names, vec!["ghi", "ws"]);
        assert!(report.get("dni").is_none());
    }

    #[test]
    fn test_wider_multiplier_finds_fewer_outliers() {
        let values: Vec<Option<f64>> = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 20.0]
            .into_iter()
            .map(Some)
            .collect();
        let tukey = DataQualityAnalyzer::column_quality("ghi", &values, 1.5);
        let wide = DataQualityAnalyzer::column_quality("ghi", &values, 3.0);
        assert_eq!(tukey.outlier_count, 1);
        assert_eq!(wide.outlier_count, 0);
    }

    // ==================== zscore tests ====================

    #[test]
    fn test_zscores_population_std() {
        // mean 3, population std sqrt(2)
        let values = [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)];
        let z = DataQualityAnalyzer::column_zscores("ghi", &values, 3.0);

        let expected = 2.0 / 2.0f64.sqrt();
        assert!((z.scores[0] - expected).abs() < 1e-12);
        assert!((z.scores[4] - expected).abs() < 1e-12);
        assert_eq!(z.scores[2], 0.0);
        assert!(!z.zero_variance);
        assert_eq!(z.flagged_count, 0);
    }

    #[test]
    fn test_zscores_skip_missing_keep_row_order() {
        let ds = dataset(df!["tamb" => [Some(10.0), None, Some(20.0), None, Some(30.0)]].unwrap());
        let map = DataQualityAnalyzer::zscores(&ds, &cols(&["tamb"]), 3.0).unwrap();

        let tamb = map.get("tamb").unwrap();
        assert_eq!(tamb.len(), 5 - 2);
        assert_eq!(tamb.row_indices, vec![0, 2, 4]);
        assert!(tamb.scores[0] > 0.0 && tamb.scores[1] == 0.0);
    }

    #[test]
    fn test_zscores_zero_variance_yields_zeros() {
        let values = [Some(0.1), Some(0.1), None, Some(0.1)];
        let z = DataQualityAnalyzer::column_zscores("ws", &values, 3.0);

        assert!(z.zero_variance);
        assert_eq!(z.scores, vec![0.0, 0.0, 0.0]);
        assert!(z.scores.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_zscores_empty_column() {
        let z = DataQualityAnalyzer::column_zscores("ws", &[None, None], 3.0);
        assert!(z.is_empty());
        assert!(!z.zero_variance);
        assert_eq!(z.mean, None);
    }

    #[test]
    fn test_zscore_preview_pairs_values() {
        let ds = dataset(df!["ws" => [Some(1.0), None, Some(3.0), Some(5.0)]].unwrap());
        let map = DataQualityAnalyzer::zscores(&ds, &cols(&["ws"]), 3.0).unwrap();
        let preview = DataQualityAnalyzer::zscore_preview(&ds, map.get("ws").unwrap(), 2).unwrap();

        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.rows[0].row, 0);
        assert_eq!(preview.rows[0].value, 1.0);
        assert_eq!(preview.rows[1].row, 2);
        assert_eq!(preview.rows[1].zscore, 0.0);
    }

    #[test]
    fn test_zscores_flag_extreme_values() {
        let mut values: Vec<Option<f64>> = vec![Some(10.0); 20];
        values.push(Some(1000.0));
        let z = DataQualityAnalyzer::column_zscores("ghi", &values, 3.0);
        assert_eq!(z.flagged_count, 1);
    }
}
