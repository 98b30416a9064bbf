//! The section registry.
//!
//! Each report section is described by the columns it needs and the function
//! that computes it. The pipeline walks [`SECTIONS`] once, in order, and skips
//! any section whose requirement is not met by the dataset.

use polars::prelude::DataFrame;

use crate::analysis::{CleaningImpact, ScatterBuilder, TimeIndex};
use crate::config::EdaConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::profiler::DataProfiler;
use crate::quality::DataQualityAnalyzer;
use crate::types::{CommentsView, SectionKind, SectionOutput, TimeSeriesView, ZScoreView};

/// Columns a section needs: every column of `all_of` and at least one of
/// `any_of` (when non-empty).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirement {
    pub all_of: Vec<String>,
    pub any_of: Vec<String>,
}

impl Requirement {
    /// Always satisfied.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all_of(columns: &[String]) -> Self {
        Self {
            all_of: columns.to_vec(),
            any_of: Vec::new(),
        }
    }

    pub fn any_of(columns: &[String]) -> Self {
        Self {
            all_of: Vec::new(),
            any_of: columns.to_vec(),
        }
    }

    pub fn and_any_of(mut self, columns: &[String]) -> Self {
        self.any_of = columns.to_vec();
        self
    }

    /// Columns whose absence leaves the requirement unmet.
    ///
    /// Absent `all_of` columns are listed individually; when none of the
    /// `any_of` columns is present they are all listed.
    pub fn missing(&self, dataset: &Dataset) -> Vec<String> {
        let mut missing = dataset.missing_columns(&self.all_of);
        if !self.any_of.is_empty() && dataset.present_columns(&self.any_of).is_empty() {
            missing.extend(dataset.missing_columns(&self.any_of));
        }
        missing
    }

    pub fn is_satisfied(&self, dataset: &Dataset) -> bool {
        self.missing(dataset).is_empty()
    }
}

/// One entry of the registry.
pub struct SectionSpec {
    pub kind: SectionKind,
    pub requires: fn(&EdaConfig) -> Requirement,
    pub run: fn(&Dataset, &EdaConfig) -> Result<SectionOutput>,
}

/// Every section, in report order.
pub static SECTIONS: [SectionSpec; 14] = [
    SectionSpec {
        kind: SectionKind::Preview,
        requires: no_requirement,
        run: preview,
    },
    SectionSpec {
        kind: SectionKind::MissingValues,
        requires: no_requirement,
        run: missing_values,
    },
    SectionSpec {
        kind: SectionKind::Describe,
        requires: no_requirement,
        run: describe,
    },
    SectionSpec {
        kind: SectionKind::Quality,
        requires: |c| Requirement::any_of(&c.columns.quality),
        run: quality,
    },
    SectionSpec {
        kind: SectionKind::TimeSeries,
        requires: |c| {
            Requirement::all_of(std::slice::from_ref(&c.timestamp_column))
                .and_any_of(&c.columns.time_series)
        },
        run: time_series,
    },
    SectionSpec {
        kind: SectionKind::CleaningImpact,
        requires: |c| {
            Requirement::all_of(std::slice::from_ref(&c.columns.cleaning_indicator))
                .and_any_of(&c.columns.cleaning_sensors)
        },
        run: cleaning_impact,
    },
    SectionSpec {
        kind: SectionKind::Correlation,
        requires: |c| Requirement::all_of(&c.columns.correlation),
        run: correlation,
    },
    SectionSpec {
        kind: SectionKind::WindScatter,
        requires: |c| Requirement::all_of(&c.columns.wind.required()),
        run: |ds, c| Ok(SectionOutput::Scatter(ScatterBuilder::points(ds, &c.columns.wind)?)),
    },
    SectionSpec {
        kind: SectionKind::HumidityTemperature,
        requires: |c| Requirement::all_of(&c.columns.humidity_temperature.required()),
        run: |ds, c| {
            Ok(SectionOutput::Scatter(ScatterBuilder::points(
                ds,
                &c.columns.humidity_temperature,
            )?))
        },
    },
    SectionSpec {
        kind: SectionKind::Histograms,
        requires: |c| Requirement::any_of(&c.columns.histogram),
        run: histograms,
    },
    SectionSpec {
        kind: SectionKind::ZScores,
        requires: |c| Requirement::any_of(&c.columns.zscore),
        run: zscores,
    },
    SectionSpec {
        kind: SectionKind::Bubble,
        requires: |c| Requirement::all_of(&c.columns.bubble.required()),
        run: |ds, c| Ok(SectionOutput::Scatter(ScatterBuilder::points(ds, &c.columns.bubble)?)),
    },
    SectionSpec {
        kind: SectionKind::Comments,
        requires: |c| Requirement::all_of(std::slice::from_ref(&c.columns.comments)),
        run: comments,
    },
    SectionSpec {
        kind: SectionKind::CleanedPreview,
        requires: no_requirement,
        run: cleaned_preview,
    },
];

fn no_requirement(_: &EdaConfig) -> Requirement {
    Requirement::none()
}

fn preview(dataset: &Dataset, config: &EdaConfig) -> Result<SectionOutput> {
    Ok(SectionOutput::Table(DataProfiler::preview(
        dataset.frame(),
        config.preview_rows,
    )?))
}

fn missing_values(dataset: &Dataset, _: &EdaConfig) -> Result<SectionOutput> {
    Ok(SectionOutput::MissingValues(DataProfiler::missing_summary(
        dataset,
    )?))
}

fn describe(dataset: &Dataset, _: &EdaConfig) -> Result<SectionOutput> {
    Ok(SectionOutput::Describe(DataProfiler::describe(dataset)?))
}

fn quality(dataset: &Dataset, config: &EdaConfig) -> Result<SectionOutput> {
    Ok(SectionOutput::Quality(DataQualityAnalyzer::analyze(
        dataset,
        &config.columns.quality,
        config.iqr_multiplier,
    )?))
}

fn time_series(dataset: &Dataset, config: &EdaConfig) -> Result<SectionOutput> {
    let index = TimeIndex::parse(dataset, &config.timestamp_column)?;
    let lines = dataset
        .present_columns(&config.columns.time_series)
        .iter()
        .map(|column| index.line(dataset, column))
        .collect::<Result<Vec<_>>>()?;

    Ok(SectionOutput::TimeSeries(TimeSeriesView {
        summary: index.summary().clone(),
        lines,
    }))
}

fn cleaning_impact(dataset: &Dataset, config: &EdaConfig) -> Result<SectionOutput> {
    Ok(SectionOutput::CleaningImpact(CleaningImpact::partition(
        dataset,
        &config.columns.cleaning_indicator,
        &config.columns.cleaning_sensors,
    )?))
}

fn correlation(dataset: &Dataset, config: &EdaConfig) -> Result<SectionOutput> {
    Ok(SectionOutput::Correlation(DataProfiler::correlation_matrix(
        dataset,
        &config.columns.correlation,
    )?))
}

fn histograms(dataset: &Dataset, config: &EdaConfig) -> Result<SectionOutput> {
    Ok(SectionOutput::Histograms(DataProfiler::histograms(
        dataset,
        &config.columns.histogram,
        config.histogram_bins,
    )?))
}

fn zscores(dataset: &Dataset, config: &EdaConfig) -> Result<SectionOutput> {
    let scores =
        DataQualityAnalyzer::zscores(dataset, &config.columns.zscore, config.zscore_threshold)?;
    let previews = scores
        .columns
        .iter()
        .map(|series| DataQualityAnalyzer::zscore_preview(dataset, series, config.preview_rows))
        .collect::<Result<Vec<_>>>()?;

    Ok(SectionOutput::ZScores(ZScoreView { scores, previews }))
}

fn comments(dataset: &Dataset, config: &EdaConfig) -> Result<SectionOutput> {
    let column = &config.columns.comments;
    let counts = DataProfiler::value_counts(dataset, column)?;
    let kept_rows = DataProfiler::drop_missing(dataset, column)?.height();

    Ok(SectionOutput::Comments(CommentsView {
        counts,
        kept_rows,
        dropped_rows: dataset.height() - kept_rows,
    }))
}

/// Head of the table after dropping rows without a comment. Without a
/// comments column nothing is dropped.
fn cleaned_preview(dataset: &Dataset, config: &EdaConfig) -> Result<SectionOutput> {
    let frame: DataFrame = if dataset.has_column(&config.columns.comments) {
        DataProfiler::drop_missing(dataset, &config.columns.comments)?
    } else {
        dataset.frame().clone()
    };
    Ok(SectionOutput::Table(DataProfiler::preview(
        &frame,
        config.preview_rows,
    )?))
}
