// pingtail - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every I/O failure carries the
// path and operation that produced it.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all pingtail operations.
#[derive(Debug)]
pub enum PingtailError {
    /// The input stream violated the expected ping output shape.
    Format(FormatError),

    /// Sink I/O failed (open or append). Fatal; no retry policy.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },

    /// Reading the next line from the input stream failed.
    Read { source: io::Error },
}

impl fmt::Display for PingtailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(e) => write!(f, "Format error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
            Self::Read { source } => write!(f, "Input read error: {source}"),
        }
    }
}

impl std::error::Error for PingtailError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Format(e) => Some(e),
            Self::Io { source, .. } => Some(source),
            Self::Read { source } => Some(source),
        }
    }
}

impl From<FormatError> for PingtailError {
    fn from(e: FormatError) -> Self {
        Self::Format(e)
    }
}

// ---------------------------------------------------------------------------
// Format errors
// ---------------------------------------------------------------------------

/// The input stream does not look like ping output.
///
/// Fatal: without the banner there is no target IP to classify replies
/// against, so the run cannot proceed.
#[derive(Debug)]
pub enum FormatError {
    /// The stream ended before a first line was read.
    EmptyStream,

    /// The first line did not match the `PING <host> (<ip>):` banner.
    BannerMismatch { line: String },

    /// A probe line was submitted before the banner was consumed.
    NotInitialized,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyStream => write!(f, "input stream is empty (no banner line)"),
            Self::BannerMismatch { line } => {
                write!(f, "first line is not a PING banner: '{line}'")
            }
            Self::NotInitialized => {
                write!(f, "probe line received before the banner was parsed")
            }
        }
    }
}

impl std::error::Error for FormatError {}
