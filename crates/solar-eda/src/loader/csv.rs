//! Comma-separated text reader with fallback strategies.

use std::io::Cursor;

use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use tracing::debug;

use crate::error::{EdaError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse CSV bytes into a frame.
///
/// Tries a quoted parse, then an unquoted one, then a parse of
/// pre-cleaned content (collapsed doubled quotes, blank lines removed).
/// `infer_schema_length` of None scans every row before fixing column types.
pub(crate) fn read_csv(bytes: &[u8], infer_schema_length: Option<usize>) -> Result<DataFrame> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(EdaError::EmptyDataset("file contains no data".to_string()));
    }

    // Strategy 1: standard loading with quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(infer_schema_length)
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Standard CSV parse failed: {}", e),
    }

    // Strategy 2: without quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(infer_schema_length)
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(None))
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("CSV parse without quotes failed: {}", e),
    }

    // Strategy 3: pre-clean content
    let cleaned = clean_csv_content(&String::from_utf8_lossy(bytes));
    CsvReadOptions::default()
        .with_infer_schema_length(infer_schema_length)
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(cleaned.into_bytes()))
        .finish()
        .map_err(|e| EdaError::Polars(e).with_context("Parsing CSV"))
}

fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
