// CLI applying the Laplacian edge filter to binary PPM images.

use clap::{CommandFactory, Parser};
use edge_detector::timing::format_seconds;
use edge_detector::{ArgumentError, DEFAULT_WORKERS, DetectorConfig, detect_edges, select_inputs};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(about, long_about = None)]
struct CliArgs {
    /// Images to filter; anything not ending in .ppm is skipped
    #[arg(required = true, value_name = "FILENAME")]
    images: Vec<PathBuf>,

    /// Worker threads filtering each image
    #[arg(long, default_value_t = DEFAULT_WORKERS, value_parser = parse_workers)]
    threads: usize,

    /// Where laplacian<i>.ppm results are written
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

fn parse_workers(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(err) => Err(err.to_string()),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = CliArgs::parse();
    let config = DetectorConfig {
        workers: args.threads,
        output_dir: args.output_dir,
    };

    let (jobs, rejected) = select_inputs(args.images, &config.output_dir);
    for err in &rejected {
        log::warn!("{err}");
    }

    if jobs.is_empty() {
        log::error!("{}", ArgumentError::NoInputs);
        eprintln!("{}", CliArgs::command().render_usage());
        return ExitCode::FAILURE;
    }

    let report = match detect_edges(&config, jobs) {
        Ok(report) => report,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    println!("Total elapsed time: {} s", format_seconds(report.wall));
    println!("Accumulated image time: {} s", format_seconds(report.accumulated));

    if report.failed() > 0 {
        log::warn!("{} of {} images failed", report.failed(), report.outcomes.len());
    }

    if let Some(err) = report.fatal_error() {
        log::error!("aborting: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
