// pingtail - app/classifier.rs
//
// The Line Classifier: consumes an ordered stream of ping output lines
// and fans each one out to the raw sink plus at most one of the
// combined/timeout/unknown category sinks.
//
// Strictly sequential: one line is timestamped, raw-logged, classified,
// and record-logged before the next is read, so per-sink record order
// is always a subsequence of arrival order.

use crate::app::sink::Sink;
use crate::core::model::{ProbeEvent, SessionSummary, Target};
use crate::core::parser::{self, ProbePatterns};
use crate::util::constants::TIMESTAMP_FORMAT;
use crate::util::error::{FormatError, PingtailError};
use chrono::Local;
use std::io::{self, Write};
use std::path::PathBuf;

// =============================================================================
// Configuration
// =============================================================================

/// Output destinations for a classifier run.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Raw mirror of every input line (banner included).
    pub raw_log: PathBuf,

    /// Combined reply/timeout time series.
    pub ping_log: PathBuf,

    /// Timeout-only subset, for fast timeout-specific scanning.
    pub timeout_log: PathBuf,

    /// Lines matching neither the reply nor the timeout shape.
    pub unknown_log: PathBuf,

    /// Also echo raw rows to standard output.
    pub echo_stdout: bool,
}

// =============================================================================
// Classifier
// =============================================================================

/// Target plus compiled patterns; exists only after the banner line has
/// been consumed, which is what makes "host/IP queried before
/// initialization" unrepresentable.
struct Session {
    target: Target,
    patterns: ProbePatterns,
}

pub struct LineClassifier {
    raw: Sink,
    combined: Sink,
    timeout: Sink,
    unknown: Sink,
    echo_stdout: bool,
    session: Option<Session>,
    summary: SessionSummary,
}

impl LineClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            raw: Sink::new(config.raw_log),
            combined: Sink::new(config.ping_log),
            timeout: Sink::new(config.timeout_log),
            unknown: Sink::new(config.unknown_log),
            echo_stdout: config.echo_stdout,
            session: None,
            summary: SessionSummary::default(),
        }
    }

    /// Target host name; `None` until `initialize` has run.
    pub fn host(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.target.host.as_str())
    }

    /// Target IP address; `None` until `initialize` has run.
    pub fn ip(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.target.ip.as_str())
    }

    /// Counters accumulated so far.
    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// Consume the banner line: extract host/IP, compile the session's
    /// reply pattern, and mirror the banner into the raw log.
    ///
    /// Must run exactly once, before any `process_line` call. On a
    /// banner mismatch no sink is touched.
    pub fn initialize(&mut self, first_line: &str) -> Result<(), PingtailError> {
        let target = parser::parse_banner(first_line)?;
        tracing::info!(host = %target.host, ip = %target.ip, "Target identified");

        let patterns = ProbePatterns::for_target(&target);
        self.session = Some(Session { target, patterns });

        let timestamp = now();
        self.log_raw(&timestamp, first_line)
    }

    /// Timestamp, raw-log, classify, and record one probe line.
    pub fn process_line(&mut self, line: &str) -> Result<(), PingtailError> {
        // Classification is pure, so resolving it up front keeps the
        // write order intact: raw row first, then the category row.
        let event = match self.session.as_ref() {
            Some(session) => session.patterns.classify(line),
            None => return Err(FormatError::NotInitialized.into()),
        };

        let timestamp = now();
        self.log_raw(&timestamp, line)?;

        match &event {
            ProbeEvent::Reply { seq, rtt_ms } => {
                self.combined
                    .append(&parser::reply_row(&timestamp, seq, rtt_ms))?;
            }
            ProbeEvent::Timeout { seq } => {
                self.combined
                    .append(&parser::timeout_combined_row(&timestamp, seq))?;
                self.timeout.append(&parser::timeout_row(&timestamp, seq))?;
            }
            ProbeEvent::Unknown => {
                self.unknown.append(&parser::unknown_row(&timestamp, line))?;
            }
        }

        self.summary.record(&event);
        tracing::trace!(kind = event.label(), "Line classified");
        Ok(())
    }

    /// Drive a full session over a fallible line source.
    ///
    /// The first line initialises the session; every subsequent line is
    /// classified, in order, until the source is exhausted. An empty
    /// source fails with `FormatError::EmptyStream` before any sink is
    /// touched.
    pub fn run<I>(&mut self, lines: I) -> Result<SessionSummary, PingtailError>
    where
        I: IntoIterator<Item = io::Result<String>>,
    {
        let mut lines = lines.into_iter();

        let first = match lines.next() {
            Some(first) => first.map_err(|e| PingtailError::Read { source: e })?,
            None => return Err(FormatError::EmptyStream.into()),
        };
        self.initialize(&first)?;

        for line in lines {
            let line = line.map_err(|e| PingtailError::Read { source: e })?;
            self.process_line(&line)?;
        }

        tracing::debug!(lines = self.summary.lines, "Input exhausted");
        Ok(self.summary)
    }

    /// Mirror one line into the raw sink, and to stdout when echo is on.
    fn log_raw(&mut self, timestamp: &str, line: &str) -> Result<(), PingtailError> {
        let row = parser::raw_row(timestamp, line);
        self.raw.append(&row)?;

        if self.echo_stdout {
            let mut out = io::stdout().lock();
            writeln!(out, "{row}").map_err(|e| PingtailError::Io {
                path: PathBuf::from("<stdout>"),
                operation: "echo",
                source: e,
            })?;
        }
        Ok(())
    }
}

/// Current wall-clock timestamp, local time, second resolution.
fn now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
