// pingtail - util/constants.rs
//
// Single source of truth for named constants and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "pingtail";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Default sink paths
// =============================================================================

/// Raw mirror of every input line.
pub const DEFAULT_RAW_LOG: &str = "raw.log";

/// Combined reply/timeout time series.
pub const DEFAULT_PING_LOG: &str = "ping.log";

/// Timeout-only subset.
pub const DEFAULT_TIMEOUT_LOG: &str = "timeout.log";

/// Lines matching neither the reply nor the timeout shape.
pub const DEFAULT_UNKNOWN_LOG: &str = "unknown.log";

// =============================================================================
// Record format
// =============================================================================

/// chrono format string for the per-record timestamp column.
/// Local time, second resolution.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Time-column value recorded for a timeout in the combined log.
///
/// Downstream consumers read the combined log as a uniform time series;
/// the negative sentinel marks probes that never got a reply.
pub const TIMEOUT_SENTINEL: &str = "-1";

// =============================================================================
// Logging
// =============================================================================

/// Default tracing filter when neither RUST_LOG nor --debug is given.
pub const DEFAULT_LOG_LEVEL: &str = "info";
