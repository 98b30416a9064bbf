//! Point lists for the scatter views (wind polar, humidity vs temperature, bubble).

use crate::config::ScatterColumns;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::types::{ScatterPoint, ScatterSeries};

pub struct ScatterBuilder;

impl ScatterBuilder {
    /// One point per row where every assigned axis has a value.
    pub fn points(dataset: &Dataset, axes: &ScatterColumns) -> Result<ScatterSeries> {
        let xs = dataset.numeric_values(&axes.x)?;
        let ys = dataset.numeric_values(&axes.y)?;
        let sizes = axes
            .size
            .as_deref()
            .map(|c| dataset.numeric_values(c))
            .transpose()?;
        let colors = axes
            .color
            .as_deref()
            .map(|c| dataset.numeric_values(c))
            .transpose()?;

        let mut points = Vec::with_capacity(xs.len());
        let mut dropped_rows = 0;

        for row in 0..xs.len() {
            let size = optional_axis(sizes.as_deref(), row);
            let color = optional_axis(colors.as_deref(), row);
            match (xs[row], ys[row], size, color) {
                (Some(x), Some(y), Some(size), Some(color)) => points.push(ScatterPoint {
                    row,
                    x,
                    y,
                    size,
                    color,
                }),
                _ => dropped_rows += 1,
            }
        }

        Ok(ScatterSeries {
            axes: axes.clone(),
            points,
            dropped_rows,
        })
    }
}

/// `Some(None)` when the axis is unassigned, `None` when assigned but missing.
fn optional_axis(values: Option<&[Option<f64>]>, row: usize) -> Option<Option<f64>> {
    match values {
        None => Some(None),
        Some(values) => values[row].map(Some),
    }
}
