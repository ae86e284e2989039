// unit tests

use super::*;
use proptest::prelude::*;

// only the top-left weight is set, so out(x, y) == in(x - 1, y - 1) wrapped
const SHIFT_DOWN_RIGHT: Kernel3X3 = Kernel3X3::new([
    [1, 0, 0], //
    [0, 0, 0], //
    [0, 0, 0], //
]);

const IDENTITY: Kernel3X3 = Kernel3X3::new([
    [0, 0, 0], //
    [0, 1, 0], //
    [0, 0, 0], //
]);

// every pixel gets a distinct value so shifted reads are easy to identify
fn gradient_image(width: usize, height: usize) -> Image {
    let pixels = (0..width * height)
        .map(|i| Pixel::new((i % 251) as u8, (i / 251 % 251) as u8, (i * 7 % 256) as u8))
        .collect();
    Image::from_pixels(width, height, pixels).unwrap()
}

fn noise_image(width: usize, height: usize, seed: u32) -> Image {
    let mut state = seed;
    let bytes: Vec<u8> = (0..width * height * 3)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 16) as u8
        })
        .collect();
    Image::from_rgb_bytes(width, height, &bytes).unwrap()
}

fn assert_partition_covers(height: usize, workers: usize) {
    let slices = partition_rows(height, workers);
    assert_eq!(slices.len(), workers);

    let mut next = 0;
    for slice in &slices {
        assert_eq!(slice.start, next, "gap or overlap at {slice:?}");
        next = slice.end();
    }
    assert_eq!(next, height);
}

#[test]
fn partition_even_split() {
    let slices = partition_rows(8, 4);
    let rows: Vec<_> = slices.iter().map(RowSlice::rows).collect();
    assert_eq!(rows, vec![0..2, 2..4, 4..6, 6..8]);
}

#[test]
fn partition_last_slice_takes_remainder() {
    let slices = partition_rows(10, 4);
    let lens: Vec<_> = slices.iter().map(|s| s.len).collect();
    assert_eq!(lens, vec![2, 2, 2, 4]);
    assert_partition_covers(10, 4);
}

#[test]
fn partition_fewer_rows_than_workers() {
    let slices = partition_rows(3, 8);
    assert_eq!(slices.len(), 8);
    assert!(slices[..7].iter().all(RowSlice::is_empty));
    assert_eq!(slices[7].rows(), 0..3);
}

#[test]
fn partition_without_workers_is_empty() {
    assert!(partition_rows(10, 0).is_empty());
}

#[test]
fn engine_rejects_zero_workers() {
    assert!(matches!(
        ConvolutionEngine::new(0),
        Err(FilterError::NoWorkers)
    ));
}

#[test]
fn engine_keeps_its_configuration() {
    let engine = ConvolutionEngine::with_kernel(3, IDENTITY).unwrap();

    assert_eq!(engine.workers(), 3);
    assert_eq!(engine.kernel(), &IDENTITY);
    assert_eq!(ConvolutionEngine::new(2).unwrap().kernel(), &LAPLACIAN);
}

#[test]
fn image_rejects_zero_dimensions() {
    assert!(matches!(
        Image::new(0, 4),
        Err(FilterError::InvalidDimensions { width: 0, height: 4 })
    ));
}

#[test]
fn image_rejects_short_byte_buffer() {
    let result = Image::from_rgb_bytes(2, 2, &[0; 11]);
    assert!(matches!(
        result,
        Err(FilterError::ByteLength {
            expected: 12,
            actual: 11
        })
    ));
}

#[test]
fn rgb_bytes_are_row_major() {
    let bytes: Vec<u8> = (0..18).collect();
    let image = Image::from_rgb_bytes(3, 2, &bytes).unwrap();

    assert_eq!(image.get(0, 0), Pixel::new(0, 1, 2));
    assert_eq!(image.get(2, 0), Pixel::new(6, 7, 8));
    assert_eq!(image.get(0, 1), Pixel::new(9, 10, 11));
    assert_eq!(image.to_rgb_bytes(), bytes);
}

#[test]
fn wrapped_coordinates_cross_every_edge() {
    let image = Image::new(5, 4).unwrap();

    assert_eq!(image.wrapped(0, -1, 0, -1), (4, 3));
    assert_eq!(image.wrapped(4, 1, 3, 1), (0, 0));
    assert_eq!(image.wrapped(2, 1, 1, -1), (3, 0));
    assert_eq!(image::wrap_axis(0, 1), [0, 0, 0]);
}

#[test]
fn laplacian_weights_sum_to_zero() {
    assert_eq!(LAPLACIAN.sum(), 0);
    assert_eq!(LAPLACIAN.weight(0, 0), 8);
    assert_eq!(LAPLACIAN.weight(-1, 1), -1);
}

#[test]
fn black_image_stays_black() {
    let engine = ConvolutionEngine::new(4).unwrap();
    let image = Image::new(4, 4).unwrap();

    let result = engine.apply(&image).unwrap();

    assert_eq!(result, image);
}

#[test]
fn uniform_image_has_no_response() {
    let engine = ConvolutionEngine::new(3).unwrap();
    let image = Image::from_pixels(6, 5, vec![Pixel::new(200, 17, 90); 30]).unwrap();

    let result = engine.apply(&image).unwrap();

    assert!(result.pixels().all(|p| *p == Pixel::BLACK));
}

#[test]
fn bright_dot_on_black() {
    let engine = ConvolutionEngine::new(2).unwrap();
    let mut image = Image::new(5, 5).unwrap();
    image.set(2, 2, Pixel::new(10, 20, 40));

    let result = engine.apply(&image).unwrap();

    // centre: 8 * value, neighbours: -value clamped to 0
    assert_eq!(result.get(2, 2), Pixel::new(80, 160, 255));
    for y in 0..5 {
        for x in 0..5 {
            if (x, y) != (2, 2) {
                assert_eq!(result.get(x, y), Pixel::BLACK, "at ({x}, {y})");
            }
        }
    }
}

#[test]
fn dark_dot_on_white() {
    let engine = ConvolutionEngine::new(4).unwrap();
    let mut image = Image::from_pixels(5, 5, vec![Pixel::WHITE; 25]).unwrap();
    image.set(2, 2, Pixel::BLACK);

    let result = engine.apply(&image).unwrap();

    // centre: -8 * 255 clamped to 0, neighbours: 8 * 255 - 7 * 255 = 255
    assert_eq!(result.get(2, 2), Pixel::BLACK);
    for y in 1..=3 {
        for x in 1..=3 {
            if (x, y) != (2, 2) {
                assert_eq!(result.get(x, y), Pixel::WHITE, "at ({x}, {y})");
            }
        }
    }
    assert_eq!(result.get(0, 0), Pixel::BLACK);
    assert_eq!(result.get(4, 2), Pixel::BLACK);
}

#[test]
fn single_pixel_image_wraps_onto_itself() {
    let engine = ConvolutionEngine::new(4).unwrap();
    let image = Image::from_pixels(1, 1, vec![Pixel::new(255, 3, 77)]).unwrap();

    let result = engine.apply(&image).unwrap();

    // every neighbour is the pixel itself, so the weights cancel
    assert_eq!(result.dimensions(), (1, 1));
    assert_eq!(result.get(0, 0), Pixel::BLACK);
}

#[test]
fn corner_dot_lights_wrapped_neighbours() {
    let engine = ConvolutionEngine::new(2).unwrap();
    let mut image = Image::from_pixels(4, 4, vec![Pixel::WHITE; 16]).unwrap();
    image.set(0, 0, Pixel::BLACK);

    let result = engine.apply(&image).unwrap();

    // the dark corner's neighbourhood spans all four edges
    for (x, y) in [(1, 0), (0, 1), (1, 1), (3, 0), (0, 3), (3, 3), (1, 3), (3, 1)] {
        assert_eq!(result.get(x, y), Pixel::WHITE, "at ({x}, {y})");
    }
    assert_eq!(result.get(0, 0), Pixel::BLACK);
    assert_eq!(result.get(2, 2), Pixel::BLACK);
}

#[test]
fn shift_kernel_wraps_all_boundaries() {
    let (width, height) = (7, 5);
    let engine = ConvolutionEngine::with_kernel(3, SHIFT_DOWN_RIGHT).unwrap();
    let image = gradient_image(width, height);

    let result = engine.apply(&image).unwrap();

    for y in 0..height {
        for x in 0..width {
            let (sx, sy) = image.wrapped(x, -1, y, -1);
            assert_eq!(result.get(x, y), image.get(sx, sy), "at ({x}, {y})");
        }
    }

    // top row reads the bottom row, left column reads the right column
    assert_eq!(result.get(3, 0), image.get(2, height - 1));
    assert_eq!(result.get(0, 2), image.get(width - 1, 1));
    assert_eq!(result.get(0, 0), image.get(width - 1, height - 1));
}

#[test]
fn identity_kernel_copies_image() {
    let engine = ConvolutionEngine::with_kernel(5, IDENTITY).unwrap();
    let image = gradient_image(9, 3);

    assert_eq!(engine.apply(&image).unwrap(), image);
}

#[test]
fn result_independent_of_worker_count() {
    let image = noise_image(13, 11, 7);
    let reference = ConvolutionEngine::new(1).unwrap().apply(&image).unwrap();

    for workers in [2, 3, 4, 11, 16] {
        let engine = ConvolutionEngine::new(workers).unwrap();
        assert_eq!(engine.apply(&image).unwrap(), reference, "workers = {workers}");
    }
}

#[test]
fn repeated_runs_are_identical() {
    let engine = ConvolutionEngine::new(4).unwrap();
    let image = noise_image(32, 17, 42);
    let first = engine.apply(&image).unwrap();

    for _ in 0..8 {
        assert_eq!(engine.apply(&image).unwrap(), first);
    }
}

#[test]
fn matches_single_threaded_reference() {
    let engine = ConvolutionEngine::new(4).unwrap();
    let image = noise_image(10, 9, 3);

    let result = engine.apply(&image).unwrap();

    for y in 0..9 {
        for x in 0..10 {
            assert_eq!(result.get(x, y), filter_pixel(&image, &LAPLACIAN, x, y));
        }
    }
}

proptest! {
    #[test]
    fn partition_covers_all_rows(height in 0usize..500, workers in 1usize..64) {
        let slices = partition_rows(height, workers);
        prop_assert_eq!(slices.len(), workers);

        let mut next = 0;
        for slice in &slices {
            prop_assert_eq!(slice.start, next);
            next = slice.end();
        }
        prop_assert_eq!(next, height);
    }

    #[test]
    fn extreme_kernels_stay_in_range(
        weight in -1000i32..1000,
        value in any::<u8>(),
        x in 0usize..4,
        y in 0usize..3,
    ) {
        let kernel = Kernel3X3::new([[weight; 3]; 3]);
        let image = Image::from_pixels(4, 3, vec![Pixel::gray(value); 12]).unwrap();

        let expected = (9 * weight * value as i32).clamp(0, 255) as u8;
        prop_assert_eq!(filter_pixel(&image, &kernel, x, y), Pixel::gray(expected));
    }
}

#[test]
fn partition_small_grids() {
    for height in 0..20 {
        for workers in 1..10 {
            assert_partition_covers(height, workers);
        }
    }
}
