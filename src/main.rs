//! Image Slicer - cut a directory of images into grid tiles.
//!
//! This binary wires the configuration, console prompts, and reporting
//! around the library's dispatcher.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_slicer::{
    clear_output_dir, ensure_output_dir, list_inputs, prompt_count, Config, Dispatcher, GridSpec,
    JobReport, Progress, SliceOutcome, SliceReport,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    // Prepare output directory
    if config.keep_output {
        if let Err(e) = ensure_output_dir(&config.output) {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    } else {
        match clear_output_dir(&config.output) {
            Ok(removed) => {
                info!(removed, output = %config.output.display(), "output directory cleared");
                println!("Output directory was cleared!");
                println!();
            }
            Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    let grid = read_grid(&config);
    println!();

    // Fail the batch before launching anything if there is nothing to slice
    let inputs = match list_inputs(&config.input) {
        Ok(inputs) => inputs,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let dispatcher =
        Dispatcher::new(config.slice_options()).with_max_workers(config.max_workers());

    let report = dispatcher
        .run_with(inputs, &config.output, grid, print_report)
        .await;

    print_summary(&report);

    if config.strict && report.has_failures() {
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "image_slicer=debug"
    } else {
        "image_slicer=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Take rows and columns from the config, prompting for whichever is missing.
fn read_grid(config: &Config) -> GridSpec {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();

    let rows = config.rows.unwrap_or_else(|| {
        i64::from(prompt_count(
            "Enter amount of horizontal rows: ",
            &mut input,
            &mut output,
        ))
    });
    let cols = config.cols.unwrap_or_else(|| {
        i64::from(prompt_count(
            "Enter amount of vertical columns: ",
            &mut input,
            &mut output,
        ))
    });

    if rows < 1 || cols < 1 {
        warn!(rows, cols, "grid counts below 1 are raised to 1");
    }

    GridSpec::clamped(rows, cols)
}

// =============================================================================
// Console Reporting
// =============================================================================

fn print_report(report: &SliceReport, progress: &Progress) {
    let name = report.file_name();

    match &report.outcome {
        SliceOutcome::Success(summary) => {
            println!("✓ Image {} was processed successfully!", name);
            println!("  {}", summary);
        }
        SliceOutcome::Failure(err) => {
            println!("✗ Image {} was processed with error!", name);
            println!("  {}", err);
        }
    }

    println!("Overall Progress: {}%", progress.percent());
}

fn print_summary(report: &JobReport) {
    let total = report.total();

    println!();
    if report.has_failures() {
        println!(
            "Sliced {} of {} image(s); {} failed.",
            report.succeeded, total, report.failed
        );
    } else if total > 1 {
        println!("Your images have been successfully sliced!");
    } else {
        println!("Your image has been successfully sliced!");
    }

    println!(
        "Succeeded: {} ({:.0}%)  Failed: {} ({:.0}%)",
        report.succeeded,
        report.success_rate(),
        report.failed,
        if total == 0 { 0.0 } else { 100.0 - report.success_rate() }
    );
    println!(
        "Total processing time: {:.2} seconds",
        report.elapsed.as_secs_f64()
    );
}
