//! Pipeline module.
//!
//! This module provides the section registry and the pipeline that evaluates
//! it against a dataset.

mod builder;
pub mod progress;
pub mod sections;

pub use builder::{EdaPipeline, EdaPipelineBuilder};
pub use progress::{ClosureProgressReporter, ProgressReporter, ProgressUpdate};
pub use sections::{Requirement, SECTIONS, SectionSpec};
