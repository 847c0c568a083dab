//! Output module for pipeline events and results
//!
//! This module handles:
//! - The observer interface the pipeline reports events to
//! - Rendering per-category statistics
//! - Writing the flat record array as JSON

pub mod observer;
pub mod stats;

pub use observer::{CountingObserver, PipelineObserver, TracingObserver};
pub use stats::{print_statistics, stat_lines, StatLine};

use crate::record::PipelineResult;
use crate::CensusError;
use std::io::Write;

/// Writes the flat record array form of a result as pretty JSON
pub fn write_json<W: Write>(result: &PipelineResult, writer: W) -> Result<(), CensusError> {
    serde_json::to_writer_pretty(writer, &result.to_vec())?;
    Ok(())
}
