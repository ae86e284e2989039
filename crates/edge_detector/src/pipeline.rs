// Read, filter and write a single image.

use crate::error::DetectorError;
use crate::jobs::ImageJob;
use crate::ppm;
use crate::timing::{ElapsedAccumulator, format_seconds};
use laplacian::ConvolutionEngine;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Timings for one finished image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageReport {
    /// Decode + filter + encode.
    pub elapsed: Duration,
    /// Time spent inside the convolution engine only.
    pub filter_elapsed: Duration,
    pub width: usize,
    pub height: usize,
}

/// The work done for one job, separated from its bookkeeping.
pub trait ImageTask: Sync {
    fn run(&self, job: &ImageJob) -> Result<ImageReport, DetectorError>;
}

/// Decodes the job's input, runs the engine and encodes the result.
pub struct FilterTask {
    engine: Arc<ConvolutionEngine>,
}

impl FilterTask {
    pub fn new(engine: Arc<ConvolutionEngine>) -> Self {
        Self { engine }
    }
}

impl ImageTask for FilterTask {
    fn run(&self, job: &ImageJob) -> Result<ImageReport, DetectorError> {
        let start = Instant::now();

        let image = ppm::read_image(&job.input)?;
        let (width, height) = image.dimensions();
        log::debug!("{}: read {width}x{height} image", job.input.display());

        let filter_start = Instant::now();
        let filtered = self.engine.apply(&image)?;
        let filter_elapsed = filter_start.elapsed();
        drop(image);

        ppm::write_image(&filtered, &job.output)?;
        log::debug!("{}: wrote {}", job.input.display(), job.output.display());
        drop(filtered);

        Ok(ImageReport {
            elapsed: start.elapsed(),
            filter_elapsed,
            width,
            height,
        })
    }
}

/// Runs jobs and feeds each successful image's time into the shared total.
pub struct ImageOrchestrator<T> {
    task: T,
    accumulator: Arc<ElapsedAccumulator>,
}

impl<T: ImageTask> ImageOrchestrator<T> {
    pub fn new(task: T, accumulator: Arc<ElapsedAccumulator>) -> Self {
        Self { task, accumulator }
    }

    pub fn accumulator(&self) -> &Arc<ElapsedAccumulator> {
        &self.accumulator
    }

    pub fn process(&self, job: &ImageJob) -> Result<ImageReport, DetectorError> {
        match self.task.run(job) {
            Ok(report) => {
                self.accumulator.add(report.elapsed);

                println!(
                    "Image {} process time: {} s\nFiltering time: {} s",
                    job.input.display(),
                    format_seconds(report.elapsed),
                    format_seconds(report.filter_elapsed),
                );

                Ok(report)
            }
            Err(err) => {
                log::error!("{err}");
                Err(err)
            }
        }
    }
}
