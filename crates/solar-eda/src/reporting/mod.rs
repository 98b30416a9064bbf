//! Report generation module.
//!
//! The [`EdaReport`](crate::types::EdaReport) itself is built by the pipeline;
//! this module writes it out as JSON together with generation metadata.
//!
//! # Example
//!
//! ```rust,ignore
//! use solar_eda::reporting::ReportGenerator;
//!
//! let generator = ReportGenerator::new(PathBuf::from("outputs"));
//! let path = generator.write_report_to_file(&report, "station_a")?;
//! ```

mod generator;

pub use generator::{ReportGenerator, ReportMetadata, SavedReport};
