// pingtail - core/parser.rs
//
// The regex layer: PING banner extraction, per-session reply/timeout
// patterns, and rendering of the tab-separated sink rows.
// Core layer: pure string in, string out — no filesystem access.

use crate::core::model::{ProbeEvent, Target};
use crate::util::constants::TIMEOUT_SENTINEL;
use crate::util::error::FormatError;
use regex::Regex;
use std::sync::OnceLock;

// =============================================================================
// Banner
// =============================================================================

/// `PING <host> (<ip>):` — the first line of ping output.
fn banner_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^PING (?P<host>[\d\w.]+) \((?P<ip>[\d.]+)\):")
            .expect("banner regex")
    })
}

/// Extract the target host and IP from the banner line.
///
/// Returns `FormatError::BannerMismatch` when the line has any other
/// shape; the run cannot proceed without the target IP.
pub fn parse_banner(line: &str) -> Result<Target, FormatError> {
    let caps = banner_regex()
        .captures(line)
        .ok_or_else(|| FormatError::BannerMismatch {
            line: line.to_string(),
        })?;
    Ok(Target {
        host: caps["host"].to_string(),
        ip: caps["ip"].to_string(),
    })
}

// =============================================================================
// Probe line classification
// =============================================================================

/// `Request timeout for icmp_seq <seq>` — identical for every target,
/// so compiled once for the process.
fn timeout_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^Request timeout for icmp_seq (?P<seq>\d+)$")
            .expect("timeout regex")
    })
}

/// Compiled per-session patterns for classifying probe lines.
///
/// The reply pattern embeds the session's target IP, so a value of this
/// type only exists after the banner has been parsed.
#[derive(Debug, Clone)]
pub struct ProbePatterns {
    reply: Regex,
}

impl ProbePatterns {
    /// Compile the reply pattern for `target`.
    ///
    /// The IP is interpolated verbatim, without regex escaping, so the
    /// dots of the dotted quad match any character at those positions.
    /// Looser than a literal comparison, but it is the established
    /// matching behaviour and is kept for output compatibility.
    pub fn for_target(target: &Target) -> Self {
        // The banner constrains ip to digits and dots, both valid in a
        // pattern, so the interpolated regex always compiles.
        let reply = Regex::new(&format!(
            r"^\d+ bytes from {}: icmp_seq=(?P<seq>\d+) ttl=\d+ time=(?P<time>[\d.]+) ms$",
            target.ip
        ))
        .expect("reply regex");
        Self { reply }
    }

    /// Classify one probe line.
    ///
    /// Reply is tried before timeout, timeout before unknown; at most
    /// one category applies. Captures are returned as text, untouched.
    pub fn classify(&self, line: &str) -> ProbeEvent {
        if let Some(caps) = self.reply.captures(line) {
            return ProbeEvent::Reply {
                seq: caps["seq"].to_string(),
                rtt_ms: caps["time"].to_string(),
            };
        }

        if let Some(caps) = timeout_regex().captures(line) {
            return ProbeEvent::Timeout {
                seq: caps["seq"].to_string(),
            };
        }

        ProbeEvent::Unknown
    }
}

// =============================================================================
// Sink row rendering
// =============================================================================
//
// Rows are pure functions of a pre-formatted timestamp string, so tests
// pin the clock by passing a fixed value. None of these append the
// record terminator; the sink layer owns that.

/// Raw-log row, also used for the stdout echo: `<ts>\t<line>`.
pub fn raw_row(timestamp: &str, line: &str) -> String {
    format!("{timestamp}\t{line}")
}

/// Combined-log row for a reply: `<ts>\t<seq>\t<time>`.
pub fn reply_row(timestamp: &str, seq: &str, rtt_ms: &str) -> String {
    format!("{timestamp}\t{seq}\t{rtt_ms}")
}

/// Combined-log row for a timeout: `<ts>\t<seq>\t-1`.
pub fn timeout_combined_row(timestamp: &str, seq: &str) -> String {
    format!("{timestamp}\t{seq}\t{TIMEOUT_SENTINEL}")
}

/// Timeout-log row: `<ts>\t<seq>`.
pub fn timeout_row(timestamp: &str, seq: &str) -> String {
    format!("{timestamp}\t{seq}")
}

/// Unknown-log row: `<ts>\t<line>`, line verbatim.
pub fn unknown_row(timestamp: &str, line: &str) -> String {
    format!("{timestamp}\t{line}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "2026-08-07 12:00:00";

    fn example_patterns() -> ProbePatterns {
        let target = parse_banner("PING example.com (93.184.216.34): 56 data bytes").unwrap();
        ProbePatterns::for_target(&target)
    }

    // -------------------------------------------------------------------------
    // Banner
    // -------------------------------------------------------------------------

    #[test]
    fn test_banner_extracts_host_and_ip() {
        let target = parse_banner("PING example.com (93.184.216.34): 56 data bytes").unwrap();
        assert_eq!(target.host, "example.com");
        assert_eq!(target.ip, "93.184.216.34");
    }

    #[test]
    fn test_banner_without_trailing_payload() {
        let target = parse_banner("PING example.com (93.184.216.34):").unwrap();
        assert_eq!(target.host, "example.com");
        assert_eq!(target.ip, "93.184.216.34");
    }

    #[test]
    fn test_banner_mismatch_is_format_error() {
        let err = parse_banner("64 bytes from 93.184.216.34: icmp_seq=0 ttl=55 time=11.3 ms")
            .unwrap_err();
        assert!(matches!(err, FormatError::BannerMismatch { .. }));
    }

    #[test]
    fn test_banner_must_start_the_line() {
        assert!(parse_banner(" PING example.com (93.184.216.34):").is_err());
    }

    #[test]
    fn test_banner_extraction_is_stable() {
        let a = parse_banner("PING host.example (10.0.0.1):").unwrap();
        let b = parse_banner("PING host.example (10.0.0.1):").unwrap();
        assert_eq!(a, b);
    }

    // -------------------------------------------------------------------------
    // Classification
    // -------------------------------------------------------------------------

    #[test]
    fn test_classify_reply() {
        let patterns = example_patterns();
        let event =
            patterns.classify("64 bytes from 93.184.216.34: icmp_seq=0 ttl=55 time=11.3 ms");
        assert_eq!(
            event,
            ProbeEvent::Reply {
                seq: "0".to_string(),
                rtt_ms: "11.3".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_reply_captures_verbatim() {
        // Leading zeros and integer times must survive untouched.
        let patterns = example_patterns();
        let event =
            patterns.classify("64 bytes from 93.184.216.34: icmp_seq=007 ttl=55 time=11 ms");
        assert_eq!(
            event,
            ProbeEvent::Reply {
                seq: "007".to_string(),
                rtt_ms: "11".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_timeout() {
        let patterns = example_patterns();
        let event = patterns.classify("Request timeout for icmp_seq 3");
        assert_eq!(
            event,
            ProbeEvent::Timeout {
                seq: "3".to_string()
            }
        );
    }

    #[test]
    fn test_classify_unknown() {
        let patterns = example_patterns();
        assert_eq!(patterns.classify("garbage line"), ProbeEvent::Unknown);
        assert_eq!(patterns.classify(""), ProbeEvent::Unknown);
    }

    #[test]
    fn test_timeout_pattern_is_anchored() {
        // Trailing text breaks the match and demotes the line to unknown.
        let patterns = example_patterns();
        assert_eq!(
            patterns.classify("Request timeout for icmp_seq 3 (retrying)"),
            ProbeEvent::Unknown
        );
    }

    #[test]
    fn test_reply_from_other_ip_is_unknown() {
        let patterns = example_patterns();
        assert_eq!(
            patterns.classify("64 bytes from 10.0.0.1: icmp_seq=0 ttl=55 time=11.3 ms"),
            ProbeEvent::Unknown
        );
    }

    #[test]
    fn test_reply_ip_dots_match_any_character_quirk() {
        // The IP is interpolated unescaped, so '.' positions accept any
        // character. Pinned deliberately; see ProbePatterns::for_target.
        let patterns = example_patterns();
        let event =
            patterns.classify("64 bytes from 93x184y216z34: icmp_seq=2 ttl=55 time=9.8 ms");
        assert_eq!(
            event,
            ProbeEvent::Reply {
                seq: "2".to_string(),
                rtt_ms: "9.8".to_string(),
            }
        );
    }

    // -------------------------------------------------------------------------
    // Row rendering
    // -------------------------------------------------------------------------

    #[test]
    fn test_raw_row_shape() {
        assert_eq!(
            raw_row(TS, "some line"),
            "2026-08-07 12:00:00\tsome line"
        );
    }

    #[test]
    fn test_reply_row_shape() {
        assert_eq!(reply_row(TS, "0", "11.3"), "2026-08-07 12:00:00\t0\t11.3");
    }

    #[test]
    fn test_timeout_rows_shape() {
        assert_eq!(
            timeout_combined_row(TS, "1"),
            "2026-08-07 12:00:00\t1\t-1"
        );
        assert_eq!(timeout_row(TS, "1"), "2026-08-07 12:00:00\t1");
    }

    #[test]
    fn test_unknown_row_keeps_line_verbatim() {
        assert_eq!(
            unknown_row(TS, "weird\tstuff"),
            "2026-08-07 12:00:00\tweird\tstuff"
        );
    }
}
