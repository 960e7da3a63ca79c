//! Append-only JSONL writer that rolls the file over by size.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

const ROLLOVER_BYTES: u64 = 10 * 1024 * 1024;
const KEPT_BACKUPS: usize = 3;

/// Writes one line per call to `path`, rolling the file to
/// `<stem>.json.<unix-seconds>` once it grows past 10 MB. Only the three
/// newest backups survive a rollover.
///
/// The handle opens lazily on the first write.
#[derive(Debug)]
pub struct FileWriter {
    path: PathBuf,
    handle: Mutex<Option<File>>,
}

impl FileWriter {
    pub const fn new(path: PathBuf) -> Self {
        Self {
            path,
            handle: Mutex::new(None),
        }
    }

    /// Appends `line` plus a newline and flushes.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the rollover, open, or write
    /// fails, or when a previous writer panicked while holding the lock.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut handle = self
            .handle
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("trace writer poisoned: {e}")))?;

        if self.needs_rollover() {
            *handle = None;
            self.roll_over()?;
        }

        if handle.is_none() {
            *handle = Some(OpenOptions::new().create(true).append(true).open(&self.path)?);
        }
        let Some(file) = handle.as_mut() else {
            return Err(io::Error::new(io::ErrorKind::Other, "trace file unavailable"));
        };
        writeln!(file, "{line}")?;
        file.flush()
    }

    fn needs_rollover(&self) -> bool {
        fs::metadata(&self.path).is_ok_and(|meta| meta.len() > ROLLOVER_BYTES)
    }

    fn roll_over(&self) -> io::Result<()> {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        if self.path.exists() {
            fs::rename(&self.path, self.path.with_extension(format!("json.{stamp}")))?;
        }
        self.prune_backups()
    }

    fn prune_backups(&self) -> io::Result<()> {
        let Some(dir) = self.path.parent() else {
            return Ok(());
        };
        let Some(stem) = self.path.file_stem().and_then(|s| s.to_str()) else {
            return Ok(());
        };
        let prefix = format!("{stem}.json.");

        let mut backups: Vec<(Option<SystemTime>, PathBuf)> = fs::read_dir(dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| is_backup(path, &prefix))
            .map(|path| (fs::metadata(&path).and_then(|m| m.modified()).ok(), path))
            .collect();

        // Newest first; ties fall back to the name, which embeds the stamp.
        backups.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
        for (_, stale) in backups.iter().skip(KEPT_BACKUPS) {
            let _ = fs::remove_file(stale);
        }
        Ok(())
    }
}

fn is_backup(path: &Path, prefix: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hypothesizer-otlp.json");
        let writer = FileWriter::new(path.clone());

        writer.write_line(r#"{"a":1}"#).unwrap();
        writer.write_line(r#"{"b":2}"#).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "{\"a\":1}\n{\"b\":2}\n");
    }

    #[test]
    fn pruning_keeps_three_newest_backups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hypothesizer-otlp.json");
        for stamp in 1..=5 {
            fs::write(dir.path().join(format!("hypothesizer-otlp.json.{stamp}")), "x").unwrap();
        }
        fs::write(dir.path().join("unrelated.json.1"), "x").unwrap();

        FileWriter::new(path).prune_backups().unwrap();

        let mut left: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        left.sort();
        assert_eq!(left.len(), 4);
        assert!(left.contains(&"unrelated.json.1".to_string()));
        assert!(!left.contains(&"hypothesizer-otlp.json.1".to_string()));
    }
}
