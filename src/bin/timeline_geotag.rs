//! timeline-geotag - add GPS positions to photos from a location history export
//!
//! Usage:
//!   timeline-geotag [-j <jpeg dir>] [-g <location history dir>] [-o <output dir>]
//!                   [-t <tolerance sec>] [--utc-offset <±HH:MM>] [--report <csv>] [-v]
//!
//! Each image under the input directory whose shooting time lies within the tolerance of a
//! location history sample is copied under the output directory, at the same relative path,
//! with the GPS fields filled in. Originals are never modified.

use std::io::Write;

use camino::Utf8PathBuf;
use chrono::FixedOffset;
use clap::Parser;
use log::{error, info};
use timeline_geotag::{
    constants::{
        DEFAULT_DIR_JPEG_INPUT, DEFAULT_DIR_LOCATION_HISTORY, DEFAULT_DIR_OUTPUT,
        DEFAULT_TOLERANCE_SEC,
    },
    events::LogSink,
    geotag::{FileStatus, GeotagConfig, Geotagger},
    geotag_errors::GeotagError,
    metadata::sidecar::JsonSidecarCodec,
    time::{default_utc_offset, parse_utc_offset},
};

#[derive(Parser, Debug)]
#[command(name = "timeline-geotag")]
#[command(about = "Geotag photos from a location history export", long_about = None)]
struct Cli {
    /// Directory of the images to geotag
    #[arg(short, long, default_value = DEFAULT_DIR_JPEG_INPUT)]
    jpeg: Utf8PathBuf,

    /// Directory of the location history JSON files
    #[arg(short, long, default_value = DEFAULT_DIR_LOCATION_HISTORY)]
    google: Utf8PathBuf,

    /// Directory receiving the geotagged copies
    #[arg(short, long, default_value = DEFAULT_DIR_OUTPUT)]
    output: Utf8PathBuf,

    /// Largest accepted time delta between a photo and a location sample, in seconds
    #[arg(short, long, default_value_t = DEFAULT_TOLERANCE_SEC)]
    tolerance: u64,

    /// Civil offset of the camera clock, e.g. +09:00
    #[arg(long, value_parser = parse_utc_offset)]
    utc_offset: Option<FixedOffset>,

    /// Write a CSV report of every processed image
    #[arg(long)]
    report: Option<Utf8PathBuf>,

    /// Enable verbose debug output
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: &Cli) -> Result<(), GeotagError> {
    let config = GeotagConfig::builder()
        .jpeg_input_dir(cli.jpeg.clone())
        .location_history_dir(cli.google.clone())
        .output_dir(cli.output.clone())
        .tolerance_sec(cli.tolerance)
        .utc_offset(cli.utc_offset.unwrap_or_else(default_utc_offset))
        .build()?;

    let geotagger = Geotagger::new(config, JsonSidecarCodec);
    let report = geotagger.run(&mut LogSink)?;

    if report.early_exit.is_none() {
        info!(
            "added: {}, warned: {}, skipped: {}, failed: {}",
            report.count(FileStatus::Added),
            report.count(FileStatus::Warned),
            report.count(FileStatus::Skipped),
            report.count(FileStatus::Failed)
        );
    }
    if let Some(path) = &cli.report {
        report.write_csv(path)?;
        info!("Report written to '{path}'.");
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    info!("[START]\ttimeline-geotag");
    info!(
        "jpeg: '{}', google: '{}', output: '{}', tolerance: {} s",
        cli.jpeg, cli.google, cli.output, cli.tolerance
    );

    if let Err(err) = run(&cli) {
        error!("[ABORT]\t{err}");
        std::process::exit(1);
    }
    info!("[END]\ttimeline-geotag");
}
