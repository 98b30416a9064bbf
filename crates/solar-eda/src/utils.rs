//! Shared utilities for column lookup and value extraction.

use polars::prelude::*;

/// Canonical form of a column name: trimmed and lowercased.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Values of a series coerced to f64.
///
/// Nulls, NaN, infinities and text that does not parse as a number all
/// become `None`, so every downstream count treats them as missing.
pub fn series_to_f64(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let float_series = if series.dtype() == &DataType::String {
        // the csv reader keeps padding around numbers in text columns
        let trimmed: StringChunked = series.str()?.into_iter().map(|v| v.map(str::trim)).collect();
        trimmed.into_series().cast(&DataType::Float64)?
    } else {
        series.cast(&DataType::Float64)?
    };

    Ok(float_series
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect())
}

/// Values of a series rendered as text, nulls preserved.
pub fn series_to_strings(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let str_series = series.cast(&DataType::String)?;
    Ok(str_series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Present values only, in row order.
pub fn present_values(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().flatten().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name("GHI"), "ghi");
        assert_eq!(normalize_column_name("  WSgust "), "wsgust");
        assert_eq!(normalize_column_name("Timestamp"), "timestamp");
    }

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_series_to_f64_treats_nan_as_missing() {
        let series = Series::new("ghi".into(), &[Some(1.0f64), None, Some(f64::NAN), Some(-2.5)]);
        let values = series_to_f64(&series).unwrap();
        assert_eq!(values, vec![Some(1.0), None, None, Some(-2.5)]);
    }

    #[test]
    fn test_series_to_f64_treats_infinity_as_missing() {
        let series = Series::new(
            "dni".into(),
            &[Some(f64::INFINITY), Some(3.0f64), Some(f64::NEG_INFINITY)],
        );
        assert_eq!(series_to_f64(&series).unwrap(), vec![None, Some(3.0), None]);

        let text = Series::new("dni".into(), &[Some("inf"), Some("-inf"), Some("4")]);
        assert_eq!(series_to_f64(&text).unwrap(), vec![None, None, Some(4.0)]);
    }

    #[test]
    fn test_series_to_f64_from_text() {
        let series = Series::new("ws".into(), &[Some("1.5"), Some(" 2 "), Some("n/a"), None]);
        let values = series_to_f64(&series).unwrap();
        assert_eq!(values, vec![Some(1.5), Some(2.0), None, None]);
    }

    #[test]
    fn test_series_to_f64_from_integers() {
        let series = Series::new("cleaning".into(), &[1i64, 0, 1]);
        let values = series_to_f64(&series).unwrap();
        assert_eq!(values, vec![Some(1.0), Some(0.0), Some(1.0)]);
    }

    #[test]
    fn test_series_to_strings() {
        let series = Series::new("comments".into(), &[Some("dusty"), None]);
        let values = series_to_strings(&series).unwrap();
        assert_eq!(values, vec![Some("dusty".to_string()), None]);
    }

    #[test]
    fn test_present_values() {
        assert_eq!(present_values(&[Some(1.0), None, Some(3.0)]), vec![1.0, 3.0]);
    }
}
