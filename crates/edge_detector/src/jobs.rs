// Turning command line paths into numbered image jobs.

use crate::error::ArgumentError;
use std::path::{Path, PathBuf};

pub const INPUT_EXTENSION: &str = "ppm";
pub const OUTPUT_PREFIX: &str = "laplacian";

/// One accepted input and where its filtered result goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageJob {
    /// 1-based position among accepted inputs.
    pub index: usize,
    pub input: PathBuf,
    pub output: PathBuf,
}

pub fn has_ppm_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == INPUT_EXTENSION)
}

/// `laplacian<index>.ppm` inside `dir`.
pub fn output_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("{OUTPUT_PREFIX}{index}.{INPUT_EXTENSION}"))
}

/// Splits `inputs` into jobs and rejected paths.
///
/// Output numbering only counts accepted inputs, so the first valid file
/// always writes `laplacian1.ppm`.
pub fn select_inputs<I>(inputs: I, output_dir: &Path) -> (Vec<ImageJob>, Vec<ArgumentError>)
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut jobs = Vec::new();
    let mut rejected = Vec::new();

    for input in inputs {
        if has_ppm_extension(&input) {
            let index = jobs.len() + 1;
            jobs.push(ImageJob {
                index,
                output: output_path(output_dir, index),
                input,
            });
        } else {
            rejected.push(ArgumentError::Extension(input));
        }
    }

    (jobs, rejected)
}
