// pingtail - app/sink.rs
//
// Append-only record sink.
//
// Opened lazily on the first write so a run that fails before producing
// any record leaves no file behind, then kept open for the rest of the
// run. Always opened in append mode: pre-existing content is never
// truncated. Each record is written and flushed individually, so every
// row already handed to the sink is durable before the next input line
// is read.

use crate::util::error::PingtailError;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Sink {
    path: PathBuf,
    file: Option<File>,
}

impl Sink {
    pub fn new(path: PathBuf) -> Self {
        Self { path, file: None }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record (a single row without terminator) plus `\n`,
    /// then flush.
    pub fn append(&mut self, row: &str) -> Result<(), PingtailError> {
        if self.file.is_none() {
            let file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(&self.path)
                .map_err(|e| PingtailError::Io {
                    path: self.path.clone(),
                    operation: "open",
                    source: e,
                })?;
            tracing::debug!(sink = %self.path.display(), "Sink opened for append");
            self.file = Some(file);
        }

        if let Some(file) = self.file.as_mut() {
            file.write_all(row.as_bytes())
                .and_then(|()| file.write_all(b"\n"))
                .and_then(|()| file.flush())
                .map_err(|e| PingtailError::Io {
                    path: self.path.clone(),
                    operation: "append",
                    source: e,
                })?;
        }

        Ok(())
    }
}
