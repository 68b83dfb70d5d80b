//! Append-only line logs
//!
//! Status and error logs are plain text files with one comma-separated entry
//! per line, no header. Entries are only ever appended.
//!
//! Concurrent pipelines share one [`AppendLog`] per file. The open handle sits
//! behind an async mutex and every entry is written with a single `write_all`
//! of the complete line, so lines from different records never interleave.

use crate::Result;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// One log line: comma-joined values, newline-terminated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    values: Vec<String>,
}

impl LogEntry {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// `<id>,DONE`
    pub fn done(collection_id: &str) -> Self {
        Self::new([collection_id, "DONE"])
    }

    /// `<context>,<message>`, or just `<message>` when the context is empty
    pub fn error(context: &str, message: &str) -> Self {
        if context.is_empty() {
            Self::new([message])
        } else {
            Self::new([context, message])
        }
    }

    /// Rendered line including the trailing newline
    ///
    /// Embedded line breaks are flattened to spaces so one entry stays one line.
    pub fn to_line(&self) -> String {
        let mut line = self
            .values
            .iter()
            .map(|v| v.replace(['\r', '\n'], " "))
            .collect::<Vec<_>>()
            .join(",");
        line.push('\n');
        line
    }
}

/// Serialized append-only writer for one log file
///
/// The file is opened (created if missing) on first append. A failed write
/// drops the handle so the next append reopens the file.
pub struct AppendLog {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl AppendLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry
    pub async fn append(&self, entry: &LogEntry) -> Result<()> {
        let line = entry.to_line();
        let mut guard = self.file.lock().await;

        if guard.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .await?;
            debug!(path = %self.path.display(), "Opened append log");
            *guard = Some(file);
        }

        let result = match guard.as_mut() {
            Some(file) => write_line(file, line.as_bytes()).await,
            None => Ok(()),
        };

        if result.is_err() {
            *guard = None;
        }

        result
    }
}

async fn write_line(file: &mut File, line: &[u8]) -> Result<()> {
    file.write_all(line).await?;
    file.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_done_entry() {
        assert_eq!(LogEntry::done("SK-A-1505").to_line(), "SK-A-1505,DONE\n");
    }

    #[test]
    fn test_error_entry_with_and_without_context() {
        assert_eq!(
            LogEntry::error("SK-A-1505", "extension error").to_line(),
            "SK-A-1505,extension error\n"
        );
        assert_eq!(
            LogEntry::error("", "input list unreadable").to_line(),
            "input list unreadable\n"
        );
    }

    #[test]
    fn test_embedded_newlines_flattened() {
        let entry = LogEntry::error("RP-P-1", "upload failed: bad\nthing\r\n");
        assert_eq!(entry.to_line(), "RP-P-1,upload failed: bad thing  \n");
    }

    #[tokio::test]
    async fn test_append_creates_file_and_appends() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("status.txt");
        std::fs::write(&path, "OLD,DONE\n").unwrap();

        let log = AppendLog::new(&path);
        log.append(&LogEntry::done("A")).await.unwrap();
        log.append(&LogEntry::done("B")).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "OLD,DONE\nA,DONE\nB,DONE\n");
    }

    #[tokio::test]
    async fn test_append_to_missing_directory_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let log = AppendLog::new(dir.path().join("missing").join("err.txt"));
        assert!(log.append(&LogEntry::done("A")).await.is_err());
    }
}
