//! Loading uploaded files into a [`Dataset`].
//!
//! [`load`] is a pure function of the input bytes: the same bytes, format and
//! configuration always produce the same dataset. Repeated uploads can be
//! memoized with [`DatasetCache`], keyed by the SHA-256 of the content.
//!
//! # Example
//!
//! ```rust,ignore
//! use solar_eda::loader::{self, FileFormat};
//! use solar_eda::EdaConfig;
//!
//! let bytes = std::fs::read("sierraleone-bumbuna.csv")?;
//! let dataset = loader::load(&bytes, FileFormat::Csv, &EdaConfig::default())?;
//! println!("{} rows, columns: {:?}", dataset.height(), dataset.column_names());
//! ```

mod cache;
mod csv;
mod spreadsheet;

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::config::EdaConfig;
use crate::dataset::Dataset;
use crate::error::{EdaError, Result, ResultExt};

pub use cache::DatasetCache;

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    /// Comma-separated text with a header row.
    Csv,
    /// A worksheet of an Excel or OpenDocument workbook.
    Spreadsheet,
}

impl FileFormat {
    /// Detect the format from a file extension (case-insensitive, no dot).
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "txt" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Spreadsheet),
            other => Err(EdaError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Detect the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| EdaError::UnsupportedFormat(path.display().to_string()))?;
        Self::from_extension(ext)
    }
}

/// Hex-encoded SHA-256 of the input bytes.
pub fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Parse uploaded bytes into a dataset with lowercased column names.
pub fn load(bytes: &[u8], format: FileFormat, config: &EdaConfig) -> Result<Dataset> {
    let frame = match format {
        FileFormat::Csv => csv::read_csv(bytes, config.infer_schema_length)?,
        FileFormat::Spreadsheet => spreadsheet::read_sheet(bytes, config.sheet.as_deref())?,
    };

    let dataset = Dataset::from_frame(frame, content_hash(bytes))?;
    info!(
        "Loaded {:?} dataset: {} rows x {} columns",
        format,
        dataset.height(),
        dataset.width()
    );
    Ok(dataset)
}

/// Read a file from disk and [`load`] it, detecting the format by extension.
///
/// The extension is checked before the file is read so an unsupported upload
/// never reaches a parser.
pub fn load_path(path: &Path, config: &EdaConfig) -> Result<Dataset> {
    let format = FileFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    load(&bytes, format, config).context(format!("Loading {}", path.display()))
}
