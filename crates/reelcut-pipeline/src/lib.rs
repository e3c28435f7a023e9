//! Highlight clip extraction pipeline.
//!
//! Reads a highlight table, cuts one clip per validated row from the source
//! video via the media layer, and writes a batch manifest plus a run report.

pub mod config;
pub mod error;
pub mod report;
pub mod run;
pub mod table;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use report::{ExtractFailure, RowRejection, RunReport};
pub use run::{run, MANIFEST_FILENAME};
pub use table::{load_table, RawRow};
