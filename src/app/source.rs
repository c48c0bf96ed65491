// pingtail - app/source.rs
//
// Input line sources. The classifier only needs a lazy sequence of
// lines already stripped of trailing terminators; this module provides
// that for standard input, plus an interrupt-aware wrapper.

use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Lines from standard input, blocking, in arrival order.
///
/// `BufRead::lines` strips the trailing `\n` (and `\r\n`) terminator.
pub fn stdin_lines() -> impl Iterator<Item = io::Result<String>> {
    io::stdin().lock().lines()
}

/// Wraps a line source so it stops yielding once `cancel` is set.
///
/// The flag is checked between lines, never mid-record: a line already
/// handed to the classifier is fully processed and flushed before the
/// stream ends. Used for graceful Ctrl-C shutdown.
pub struct Interruptible<I> {
    inner: I,
    cancel: Arc<AtomicBool>,
}

impl<I> Interruptible<I> {
    pub fn new(inner: I, cancel: Arc<AtomicBool>) -> Self {
        Self { inner, cancel }
    }
}

impl<I> Iterator for Interruptible<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cancel.load(Ordering::SeqCst) {
            tracing::debug!("Cancel flag set; ending input stream");
            return None;
        }
        self.inner.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interruptible_passes_lines_through() {
        let cancel = Arc::new(AtomicBool::new(false));
        let lines = vec![Ok("a".to_string()), Ok("b".to_string())];
        let collected: Vec<String> = Interruptible::new(lines.into_iter(), cancel)
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(collected, vec!["a", "b"]);
    }

    #[test]
    fn test_interruptible_stops_at_line_boundary() {
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);

        let lines = vec![Ok("a".to_string()), Ok("b".to_string()), Ok("c".to_string())];
        let mut source = Interruptible::new(lines.into_iter(), cancel);

        assert_eq!(source.next().unwrap().unwrap(), "a");
        flag.store(true, Ordering::SeqCst);
        assert!(source.next().is_none());
    }
}
