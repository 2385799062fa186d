//! mm-capture binary: validate configuration, open the device, run the
//! capture loop until the operator stops it or the device goes away.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mm_capture::capture::{run_capture, CapturePipeline};
use mm_capture::cli::Cli;
use mm_capture::device;
use mm_capture::echo::ConsoleEcho;
use mm_capture::exit_codes::ExitCode;
use mm_common::{Error, Result};

fn main() {
    // Diagnostics on stderr; stdout is reserved for the telemetry echo.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => std::process::exit(ExitCode::Clean.as_i32()),
        Err(err) => {
            error!(code = err.code(), "{err}");
            std::process::exit(ExitCode::from(&err).as_i32());
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    device::validate_baud(cli.baud)?;

    let save_dir = cli.save_dir();
    std::fs::create_dir_all(&save_dir).map_err(|source| Error::OutputDir {
        path: save_dir.clone(),
        source,
    })?;

    let port = device::resolve_port(&cli.port)?;
    let mut handle = device::open_port(&port, cli.baud)?;

    let stop = Arc::new(AtomicBool::new(false));
    let stop_handler = Arc::clone(&stop);
    ctrlc::set_handler(move || stop_handler.store(true, Ordering::Relaxed))
        .map_err(|e| Error::Config(format!("cannot install interrupt handler: {e}")))?;

    info!(port = port.as_str(), baud = cli.baud, save_dir = %save_dir.display(), "capture started");
    info!("press Ctrl+C to stop");

    let mut pipeline = CapturePipeline::new(save_dir.clone(), ConsoleEcho, cli.show_noise);
    let outcome = run_capture(&mut handle, &mut pipeline, &stop);

    info!(summary = pipeline.summary_json().as_str(), "capture finished");
    info!(save_dir = %save_dir.display(), "session files saved");
    outcome
}
