// Parallel 3x3 convolution with toroidal borders.
//
// Rows are split into one contiguous slice per worker. Each worker reads the
// whole source image and writes only its own rows of the result, so the
// result buffer needs no locking.

use crate::image::{Image, Pixel, wrap_axis};
use crate::kernel::{Kernel3X3, LAPLACIAN};
use crate::FilterError;
use ndarray::{ArrayViewMut2, Axis};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::ops::Range;

/// Half-open range of rows `[start, start + len)` owned by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowSlice {
    pub start: usize,
    pub len: usize,
}

impl RowSlice {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn rows(&self) -> Range<usize> {
        self.start..self.end()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Splits `height` rows into exactly `workers` slices.
///
/// Every slice gets `height / workers` rows except the last, which also
/// takes the remainder. When `height < workers` the leading slices are
/// empty and the last one holds every row.
pub fn partition_rows(height: usize, workers: usize) -> Vec<RowSlice> {
    if workers == 0 {
        return Vec::new();
    }

    let share = height / workers;

    (0..workers)
        .map(|i| {
            let start = i * share;
            let len = if i == workers - 1 { height - start } else { share };
            RowSlice { start, len }
        })
        .collect()
}

fn clamp_channel(sum: i32) -> u8 {
    sum.clamp(0, 255) as u8
}

/// Filtered value of the pixel at (x, y).
///
/// Neighbours past an edge wrap to the opposite edge, so every pixel has a
/// full 3x3 neighbourhood, including in a 1x1 image.
pub fn filter_pixel(image: &Image, kernel: &Kernel3X3, x: usize, y: usize) -> Pixel {
    let xs = wrap_axis(x, image.width());
    let ys = wrap_axis(y, image.height());

    let (mut red, mut green, mut blue) = (0i32, 0i32, 0i32);

    for (&sy, dy) in ys.iter().zip(-1..=1) {
        for (&sx, dx) in xs.iter().zip(-1..=1) {
            let weight = kernel.weight(dx, dy);
            let sample = image.get(sx, sy);

            red += sample.r as i32 * weight;
            green += sample.g as i32 * weight;
            blue += sample.b as i32 * weight;
        }
    }

    Pixel::new(clamp_channel(red), clamp_channel(green), clamp_channel(blue))
}

// `out` holds exactly the rows of `slice`.
fn filter_slice(image: &Image, kernel: &Kernel3X3, slice: RowSlice, mut out: ArrayViewMut2<'_, Pixel>) {
    for (row, mut out_row) in out.axis_iter_mut(Axis(0)).enumerate() {
        let y = slice.start + row;
        for (x, pixel) in out_row.iter_mut().enumerate() {
            *pixel = filter_pixel(image, kernel, x, y);
        }
    }
}

/// Fixed-size worker pool applying one kernel to whole images.
///
/// A single engine is meant to be shared by every image in a batch, so the
/// worker count is configured once for the process.
pub struct ConvolutionEngine {
    pool: ThreadPool,
    workers: usize,
    kernel: Kernel3X3,
}

impl ConvolutionEngine {
    /// Laplacian engine with `workers` threads.
    pub fn new(workers: usize) -> Result<Self, FilterError> {
        Self::with_kernel(workers, LAPLACIAN)
    }

    pub fn with_kernel(workers: usize, kernel: Kernel3X3) -> Result<Self, FilterError> {
        if workers == 0 {
            return Err(FilterError::NoWorkers);
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("laplacian-{i}"))
            .build()?;

        Ok(Self {
            pool,
            workers,
            kernel,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn kernel(&self) -> &Kernel3X3 {
        &self.kernel
    }

    /// Convolves `image` into a newly allocated result of the same size.
    ///
    /// Returns once every row slice has been written.
    pub fn apply(&self, image: &Image) -> Result<Image, FilterError> {
        let (width, height) = image.dimensions();
        let mut result = Image::new(width, height)?;

        let slices = partition_rows(height, self.workers);
        log::debug!(
            "filtering {width}x{height} image as {} row slices: {:?}",
            slices.len(),
            slices.iter().map(RowSlice::rows).collect::<Vec<_>>()
        );

        // hand each worker a disjoint view onto its own rows
        let mut rest = result.view_mut();
        let mut parts = Vec::with_capacity(slices.len());
        for slice in slices {
            let (rows, tail) = rest.split_at(Axis(0), slice.len);
            parts.push((slice, rows));
            rest = tail;
        }

        let kernel = &self.kernel;
        self.pool.scope(|s| {
            for (slice, rows) in parts {
                s.spawn(move |_| filter_slice(image, kernel, slice, rows));
            }
        });

        Ok(result)
    }
}
