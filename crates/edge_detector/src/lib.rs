// top-level library module


pub mod error;
pub mod fleet;
pub mod jobs;
pub mod pipeline;
pub mod ppm;
pub mod timing;

pub use error::{ArgumentError, DecodeError, DetectorError};
pub use fleet::{BatchReport, ImageOutcome, run_batch};
pub use jobs::{ImageJob, select_inputs};
pub use pipeline::{FilterTask, ImageOrchestrator, ImageReport, ImageTask};
pub use timing::ElapsedAccumulator;

use laplacian::ConvolutionEngine;
use std::path::PathBuf;
use std::sync::Arc;

/// Row-slice workers per image unless overridden on the command line.
pub const DEFAULT_WORKERS: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetectorConfig {
    /// Size of the convolution pool shared by every image.
    pub workers: usize,
    /// Directory receiving the `laplacian<i>.ppm` files.
    pub output_dir: PathBuf,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            output_dir: PathBuf::from("."),
        }
    }
}

/// Filters every job with one shared engine and accumulator.
///
/// Only building the engine can fail here; per-image failures are
/// reported in the returned outcomes.
pub fn detect_edges(config: &DetectorConfig, jobs: Vec<ImageJob>) -> Result<BatchReport, DetectorError> {
    let engine = Arc::new(ConvolutionEngine::new(config.workers)?);
    let accumulator = Arc::new(ElapsedAccumulator::new());
    let orchestrator = ImageOrchestrator::new(FilterTask::new(engine.clone()), accumulator);

    log::debug!(
        "processing {} images with {} workers each",
        jobs.len(),
        engine.workers()
    );

    Ok(run_batch(&orchestrator, jobs))
}
