// pingtail - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Logging initialisation (debug mode support)
// 3. Ctrl-C handler installation
// 4. Classifier run over standard input

use clap::Parser;
use pingtail::app::classifier::{ClassifierConfig, LineClassifier};
use pingtail::app::source;
use pingtail::util;
use pingtail::util::error::{FormatError, PingtailError};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// pingtail - classifies live ping output into append-only logs.
///
/// Pipe a ping-style prober into pingtail; every line is mirrored to
/// the raw log and routed to one of the reply/timeout/unknown logs:
///
///     ping example.com | pingtail --stdout
#[derive(Parser, Debug)]
#[command(name = "pingtail", version, about)]
struct Cli {
    /// Raw mirror of every input line.
    #[arg(long = "raw-log", default_value = util::constants::DEFAULT_RAW_LOG)]
    raw_log: PathBuf,

    /// Combined reply/timeout time series.
    #[arg(long = "ping-log", default_value = util::constants::DEFAULT_PING_LOG)]
    ping_log: PathBuf,

    /// Timeout-only subset.
    #[arg(long = "timeout-log", default_value = util::constants::DEFAULT_TIMEOUT_LOG)]
    timeout_log: PathBuf,

    /// Lines matching neither the reply nor the timeout shape.
    #[arg(long = "unknown-log", default_value = util::constants::DEFAULT_UNKNOWN_LOG)]
    unknown_log: PathBuf,

    /// Also print raw rows to stdout.
    #[arg(long = "stdout")]
    stdout: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    util::logging::init(cli.debug);
    tracing::info!(version = util::constants::APP_VERSION, "pingtail starting");

    // Ctrl-C sets a flag checked at each line boundary, so the current
    // record is always fully flushed before the run winds down.
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        if let Err(e) = ctrlc::set_handler(move || {
            cancel.store(true, Ordering::SeqCst);
        }) {
            tracing::warn!(error = %e, "Could not install Ctrl-C handler");
        }
    }

    let mut classifier = LineClassifier::new(ClassifierConfig {
        raw_log: cli.raw_log,
        ping_log: cli.ping_log,
        timeout_log: cli.timeout_log,
        unknown_log: cli.unknown_log,
        echo_stdout: cli.stdout,
    });

    let lines = source::Interruptible::new(source::stdin_lines(), Arc::clone(&cancel));

    match classifier.run(lines) {
        Ok(summary) => {
            tracing::info!(
                lines = summary.lines,
                replies = summary.replies,
                timeouts = summary.timeouts,
                unknown = summary.unknown,
                interrupted = cancel.load(Ordering::SeqCst),
                "Session complete"
            );
        }
        // Ctrl-C before the banner arrived leaves an empty stream; that
        // is a user interrupt, not a malformed prober.
        Err(PingtailError::Format(FormatError::EmptyStream))
            if cancel.load(Ordering::SeqCst) =>
        {
            tracing::info!("Interrupted before any input; nothing written");
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
