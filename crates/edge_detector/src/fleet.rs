// One thread per image, joined before reporting.

use crate::error::DetectorError;
use crate::jobs::ImageJob;
use crate::pipeline::{ImageOrchestrator, ImageReport, ImageTask};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct ImageOutcome {
    pub job: ImageJob,
    pub result: Result<ImageReport, DetectorError>,
}

#[derive(Debug)]
pub struct BatchReport {
    /// In job order, regardless of completion order.
    pub outcomes: Vec<ImageOutcome>,
    /// Wall clock time for the whole batch.
    pub wall: Duration,
    /// Accumulated end-to-end time of every successful image.
    pub accumulated: Duration,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn fatal_error(&self) -> Option<&DetectorError> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err())
            .find(|err| err.is_fatal())
    }
}

/// Processes every job on its own thread and waits for all of them.
///
/// A job that can't get a thread, or whose thread panics, fails alone; the
/// other jobs still run to completion.
pub fn run_batch<T: ImageTask>(orchestrator: &ImageOrchestrator<T>, jobs: Vec<ImageJob>) -> BatchReport {
    let start = Instant::now();

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = jobs
            .iter()
            .map(|job| {
                thread::Builder::new()
                    .name(format!("image-{}", job.index))
                    .spawn_scoped(scope, move || orchestrator.process(job))
            })
            .collect();

        handles
            .into_iter()
            .zip(&jobs)
            .map(|(handle, job)| {
                let result = match handle {
                    Ok(handle) => handle.join().unwrap_or_else(|_| {
                        Err(DetectorError::Panicked {
                            path: job.input.clone(),
                        })
                    }),
                    Err(source) => Err(DetectorError::Spawn {
                        path: job.input.clone(),
                        source,
                    }),
                };

                if let Err(err @ (DetectorError::Spawn { .. } | DetectorError::Panicked { .. })) = &result {
                    log::error!("{err}");
                }
                result
            })
            .collect()
    });

    let outcomes = jobs
        .into_iter()
        .zip(results)
        .map(|(job, result)| ImageOutcome { job, result })
        .collect();

    BatchReport {
        outcomes,
        wall: start.elapsed(),
        accumulated: orchestrator.accumulator().total(),
    }
}
