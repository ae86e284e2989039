// Error taxonomy for the edge detector.

use laplacian::FilterError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Problems found while parsing a P6 stream.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid image format '{found}' (must be 'P6')")]
    Format { found: String },

    #[error("invalid RGB component {max} (must be 255)")]
    Range { max: u32 },

    #[error("could not read image data: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("unable to allocate {bytes} bytes for image data")]
    Allocation { bytes: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Rejected command line input.
#[derive(Error, Debug)]
pub enum ArgumentError {
    #[error("Invalid file extension for {} (must be .ppm)", .0.display())]
    Extension(PathBuf),

    #[error("no usable input images")]
    NoInputs,
}

/// Failure of one image's read, filter, write pipeline.
#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("unable to open file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("error creating thread for image {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("worker for image {} panicked", path.display())]
    Panicked { path: PathBuf },

    #[error(transparent)]
    Argument(#[from] ArgumentError),
}

impl DetectorError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Allocation failures end the whole process; everything else only
    /// fails the image it happened in.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Decode {
                source: DecodeError::Allocation { .. },
                ..
            } => true,
            Self::Filter(err) => err.is_fatal(),
            _ => false,
        }
    }
}
