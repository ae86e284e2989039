//! Times the convolution engine on a synthetic image for a range of worker counts.
//!
//! Run with `RUST_LOG=info` to see the timings.

use clap::Parser;
use laplacian::{ConvolutionEngine, FilterError, Image};
use std::time::Instant;

#[derive(Parser)]
#[command(about, long_about = None)]
struct Args {
    #[arg(long, default_value_t = 4096)]
    width: usize,
    #[arg(long, default_value_t = 4096)]
    height: usize,
    /// Largest worker count to try, starting from 1
    #[arg(long, default_value_t = 8)]
    max_threads: usize,
    /// Runs per worker count; the fastest one is reported
    #[arg(long, default_value_t = 3)]
    repeats: usize,
}

// diagonal stripes give the kernel a non-trivial response everywhere
fn synthetic_image(width: usize, height: usize) -> Result<Image, FilterError> {
    let bytes: Vec<u8> = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .flat_map(|(x, y)| {
            let v = ((x + y) % 64 * 4) as u8;
            [v, v / 2, 255 - v]
        })
        .collect();
    Image::from_rgb_bytes(width, height, &bytes)
}

fn main() -> Result<(), FilterError> {
    env_logger::init();
    let args = Args::parse();

    let image = synthetic_image(args.width, args.height)?;
    log::info!("Synthetic image: {}x{}", args.width, args.height);

    let mut baseline = None;
    for workers in 1..=args.max_threads {
        let engine = ConvolutionEngine::new(workers)?;
        if workers == 1 {
            log::debug!("Kernel: {:?}", engine.kernel());
        }

        let mut best = f64::INFINITY;
        for _ in 0..args.repeats.max(1) {
            let start = Instant::now();
            engine.apply(&image)?;
            best = best.min(start.elapsed().as_secs_f64());
        }

        let speedup = *baseline.get_or_insert(best) / best;
        log::info!("{workers:>2} workers: {best:.4} s ({speedup:.2}x)");
    }

    Ok(())
}
