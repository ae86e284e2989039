#[cfg(test)]
mod tests;

// Parallel 3x3 convolution over RGB pixel buffers.

pub mod convolution;
pub mod image;
pub mod kernel;

pub use convolution::{ConvolutionEngine, RowSlice, filter_pixel, partition_rows};
pub use image::{Image, Pixel};
pub use kernel::{Kernel3X3, LAPLACIAN};

use thiserror::Error;

/// Failures raised while building images or running the convolution pool.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("convolution engine needs at least one worker")]
    NoWorkers,

    #[error("unable to allocate memory for {pixels} pixels")]
    Allocation { pixels: usize },

    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("expected {expected} bytes of pixel data, got {actual}")]
    ByteLength { expected: usize, actual: usize },

    #[error("pixel buffer does not match image shape: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("unable to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl FilterError {
    /// Running out of memory leaves no degraded mode to fall back to.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FilterError::Allocation { .. })
    }
}
