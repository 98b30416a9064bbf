//! Module sensor readings split by the cleaning indicator.

use tracing::debug;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::types::CleaningGroups;

/// Groups module readings by whether the panel was cleaned on that row.
pub struct CleaningImpact;

impl CleaningImpact {
    /// Partition each present sensor column by `indicator == 1` vs `indicator == 0`.
    ///
    /// Rows whose indicator is missing or any other value fall in neither
    /// group. Missing sensor readings are dropped from both groups.
    pub fn partition(
        dataset: &Dataset,
        indicator: &str,
        sensors: &[String],
    ) -> Result<Vec<CleaningGroups>> {
        let flags = dataset.numeric_values(indicator)?;

        dataset
            .present_columns(sensors)
            .into_iter()
            .map(|sensor| -> Result<CleaningGroups> {
                let readings = dataset.numeric_values(&sensor)?;
                let mut cleaned = Vec::new();
                let mut not_cleaned = Vec::new();

                for (flag, reading) in flags.iter().zip(readings.iter()) {
                    let Some(value) = reading else { continue };
                    match flag {
                        Some(f) if *f == 1.0 => cleaned.push(*value),
                        Some(f) if *f == 0.0 => not_cleaned.push(*value),
                        _ => {}
                    }
                }

                debug!(
                    "Cleaning split of '{}': {} cleaned, {} not cleaned",
                    sensor,
                    cleaned.len(),
                    not_cleaned.len()
                );
                Ok(CleaningGroups {
                    sensor,
                    cleaned,
                    not_cleaned,
                })
            })
            .collect()
    }
}
