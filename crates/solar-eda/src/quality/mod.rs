//! Data quality analysis module.
//!
//! Per-column negative / missing / IQR outlier counts and absolute z-scores.

mod analyzer;

pub use analyzer::DataQualityAnalyzer;
