// Row-major RGB pixel buffer.
//
// Pixels live in an `Array2` of shape (height, width), so indexing is
// `[[y, x]]` and logical iteration order is the on-disk scanline order.

use crate::FilterError;
use ndarray::{Array2, ArrayViewMut2};

pub const CHANNELS: usize = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel::new(0, 0, 0);
    pub const WHITE: Pixel = Pixel::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(value: u8) -> Self {
        Self::new(value, value, value)
    }

    pub fn channels(self) -> [u8; CHANNELS] {
        [self.r, self.g, self.b]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pixels: Array2<Pixel>,
}

impl Image {
    /// All-black image; fails instead of aborting when the buffer can't be allocated.
    pub fn new(width: usize, height: usize) -> Result<Self, FilterError> {
        let count = pixel_count(width, height)?;
        Self::from_pixels(width, height, alloc_pixels(count)?)
    }

    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Pixel>) -> Result<Self, FilterError> {
        pixel_count(width, height)?;
        let pixels = Array2::from_shape_vec((height, width), pixels)?;
        Ok(Self { pixels })
    }

    /// Builds an image from packed `r, g, b` triples in scanline order.
    pub fn from_rgb_bytes(width: usize, height: usize, bytes: &[u8]) -> Result<Self, FilterError> {
        let count = pixel_count(width, height)?;
        let expected = count * CHANNELS;
        if bytes.len() != expected {
            return Err(FilterError::ByteLength {
                expected,
                actual: bytes.len(),
            });
        }

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(count)
            .map_err(|_| FilterError::Allocation { pixels: count })?;
        pixels.extend(
            bytes
                .chunks_exact(CHANNELS)
                .map(|p| Pixel::new(p[0], p[1], p[2])),
        );

        Self::from_pixels(width, height, pixels)
    }

    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    pub fn get(&self, x: usize, y: usize) -> Pixel {
        self.pixels[[y, x]]
    }

    pub fn set(&mut self, x: usize, y: usize, pixel: Pixel) {
        self.pixels[[y, x]] = pixel;
    }

    /// Neighbour of (x, y) at offset (dx, dy), wrapping past each edge to the opposite one.
    pub fn wrapped(&self, x: usize, dx: isize, y: usize, dy: isize) -> (usize, usize) {
        (
            wrap(x, dx, self.width()),
            wrap(y, dy, self.height()),
        )
    }

    /// Pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = &Pixel> {
        self.pixels.iter()
    }

    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels().flat_map(|p| p.channels()).collect()
    }

    pub(crate) fn view_mut(&mut self) -> ArrayViewMut2<'_, Pixel> {
        self.pixels.view_mut()
    }
}

/// Coordinates `(c - 1, c, c + 1)` on an axis of length `len`, wrapped.
pub fn wrap_axis(coord: usize, len: usize) -> [usize; 3] {
    [wrap(coord, -1, len), coord, wrap(coord, 1, len)]
}

// (coord + delta + len) mod len
fn wrap(coord: usize, delta: isize, len: usize) -> usize {
    (coord as isize + delta).rem_euclid(len as isize) as usize
}

fn pixel_count(width: usize, height: usize) -> Result<usize, FilterError> {
    if width == 0 || height == 0 {
        return Err(FilterError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .filter(|count| count.checked_mul(CHANNELS).is_some())
        .ok_or(FilterError::Allocation {
            pixels: usize::MAX,
        })
}

fn alloc_pixels(count: usize) -> Result<Vec<Pixel>, FilterError> {
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(count)
        .map_err(|_| FilterError::Allocation { pixels: count })?;
    pixels.resize(count, Pixel::BLACK);
    Ok(pixels)
}
