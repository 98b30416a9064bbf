//! Optional memoization of parsed uploads.

use std::collections::HashMap;

use tracing::debug;

use super::{FileFormat, content_hash, load};
use crate::config::EdaConfig;
use crate::dataset::Dataset;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    hash: String,
    format: FileFormat,
    sheet: Option<String>,
    infer_schema_length: Option<usize>,
}

/// Parsed datasets keyed by upload content.
///
/// Uploads are immutable, so entries never need invalidation. The cache is an
/// ordinary owned value; callers decide its lifetime.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<CacheKey, Dataset>,
    hits: usize,
    misses: usize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the dataset for these bytes, parsing them on first sight.
    pub fn get_or_load(
        &mut self,
        bytes: &[u8],
        format: FileFormat,
        config: &EdaConfig,
    ) -> Result<&Dataset> {
        let key = CacheKey {
            hash: content_hash(bytes),
            format,
            sheet: config.sheet.clone(),
            infer_schema_length: config.infer_schema_length,
        };

        if self.entries.contains_key(&key) {
            self.hits += 1;
            debug!("Dataset cache hit for {}", key.hash);
        } else {
            self.misses += 1;
            debug!("Dataset cache miss for {}", key.hash);
            let dataset = load(bytes, format, config)?;
            self.entries.insert(key.clone(), dataset);
        }

        Ok(&self.entries[&key])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
