//! Command-line shell for the splitter core.
//!
//! Collects parameters, validates them synchronously (no worker is spawned
//! for a bad request), then polls the worker's event channel every 100 ms to
//! render progress and the terminal outcome.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossbeam_channel::RecvTimeoutError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tablesplit::{
    ErrorPresentation, ProgressEvent, RunState, SplitRequest, SplitSession, SplitWorker,
};

/// Split a tabular data file (CSV/TSV/Excel/JSON) into fixed-size row chunks
#[derive(Parser, Debug)]
#[command(name = "tablesplit")]
#[command(about = "Split a tabular data file into fixed-size row chunks")]
#[command(version)]
struct Cli {
    /// Input file (.csv, .tsv, .xlsx, .xls, or .json)
    input: PathBuf,

    /// Output directory; defaults to the input file's directory
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Rows per chunk
    #[arg(short, long, value_name = "ROWS", default_value_t = 1000)]
    chunk_size: usize,

    /// Digit template for chunk numbering; its length sets the zero-padding
    /// width (e.g. "001" numbers chunks _001, _002, ...)
    #[arg(short, long, value_name = "TEMPLATE", default_value = "001")]
    number_format: String,

    /// Export format: csv, xlsx, xls, tsv, json, or html
    #[arg(short, long, value_name = "FORMAT", default_value = "csv")]
    format: String,
}

/// Polling interval for the progress channel. Progress is a display
/// concern, not a correctness signal.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn setup_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tablesplit=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_failure(presentation: &ErrorPresentation) {
    eprintln!("error: {}: {}", presentation.title, presentation.message);
    if let Some(action) = &presentation.action {
        eprintln!("hint: {}", action);
    }
}

fn main() -> ExitCode {
    setup_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(RunState::Done) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            if let Some(split_err) = err.downcast_ref::<tablesplit::SplitError>() {
                print_failure(&split_err.to_presentation());
            } else {
                eprintln!("error: {:#}", err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<RunState> {
    // The output directory defaults to the input's parent directory.
    let output_dir = match cli.output_dir {
        Some(dir) => dir,
        None => {
            let parent = cli
                .input
                .parent()
                .context("cannot derive an output directory from the input path")?;
            if parent.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                parent.to_path_buf()
            }
        }
    };

    let request = SplitRequest {
        input_path: cli.input,
        output_dir,
        chunk_size: cli.chunk_size,
        number_format: cli.number_format,
        export: cli.format.parse()?,
    };

    // Validation errors surface here, before any worker exists.
    let plan = request.validate()?;

    let session = SplitSession::new();
    if !session.try_begin() {
        anyhow::bail!("a split is already running");
    }

    let worker = SplitWorker::spawn(plan)?;
    let terminal = poll_until_terminal(&worker);
    let state = RunState::from_terminal(&terminal).unwrap_or(RunState::Failed);
    session.finish(state);

    match &terminal {
        ProgressEvent::Done { chunks } => {
            println!("done: wrote {} chunk file(s)", chunks);
        }
        ProgressEvent::Cancelled { chunks } => {
            eprintln!("cancelled after {} chunk file(s)", chunks);
        }
        ProgressEvent::Failed { message } => {
            eprintln!("failed: {}", message);
        }
        ProgressEvent::Progress { .. } => unreachable!("poll loop only returns terminal events"),
    }

    Ok(state)
}

/// Polls the event channel at [`POLL_INTERVAL`], rendering each progress
/// update, until the terminal event arrives.
fn poll_until_terminal(worker: &SplitWorker) -> ProgressEvent {
    loop {
        match worker.events().recv_timeout(POLL_INTERVAL) {
            Ok(ProgressEvent::Progress {
                rows_done,
                rows_total,
            }) => {
                eprintln!("progress: {}/{} rows", rows_done, rows_total);
            }
            Ok(terminal) => return terminal,
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                // Worker thread died without a terminal event.
                return ProgressEvent::Failed {
                    message: "worker stopped unexpectedly".into(),
                };
            }
        }
    }
}
