//! Rotating file sink
//!
//! Two append-only NDJSON files under the configured directory:
//!
//! - `dev.log` receives every record
//! - `error.log` receives only error-class records
//!
//! Rotation is size-based. When a write would push a file past the
//! configured threshold the current file is shifted to `.1` (existing
//! backups shift up, the oldest beyond the backup count is deleted) and a
//! fresh file is started. A threshold of zero or below disables rotation
//! entirely and the sink appends indefinitely. A backup count of zero (or
//! below) keeps no backups: the file is simply started over.
//!
//! Every I/O failure is reported on stderr and swallowed. A caller never
//! learns that persistence failed; logging must not break application
//! flow. A single mutex serializes writers so lines from concurrent
//! threads never interleave within a file.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Main log file name, receives all records
pub const MAIN_LOG: &str = "dev.log";
/// Error log file name, receives ERROR and FATAL records
pub const ERROR_LOG: &str = "error.log";

/// Rotating writer pair for `dev.log` and `error.log`
pub struct FileSink {
    inner: Mutex<SinkSettings>,
}

struct SinkSettings {
    dir: PathBuf,
    max_bytes: i64,
    backups: i64,
}

impl FileSink {
    /// Create a sink rooted at `dir`
    ///
    /// The directory is created recursively on first write, not here, so
    /// constructing a sink can never fail.
    pub fn new(dir: PathBuf, max_bytes: i64, backups: i64) -> Self {
        Self {
            inner: Mutex::new(SinkSettings {
                dir,
                max_bytes,
                backups,
            }),
        }
    }

    /// Append one JSON line, mirroring error-class records into `error.log`
    pub fn write(&self, line: &str, error_class: bool) {
        let settings = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Err(e) = settings.append(MAIN_LOG, line) {
            eprintln!("Sovdev Logger failed to write {MAIN_LOG}: {e}");
        }
        if error_class {
            if let Err(e) = settings.append(ERROR_LOG, line) {
                eprintln!("Sovdev Logger failed to write {ERROR_LOG}: {e}");
            }
        }
    }
}

impl SinkSettings {
    fn append(&self, name: &str, line: &str) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);

        if self.should_rotate(&path, line.len()) {
            self.rotate(name)?;
        }

        let mut file = OpenOptions::new().append(true).create(true).open(path)?;
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }

    /// Rotation triggers only with a positive threshold; zero and negative
    /// thresholds append indefinitely.
    fn should_rotate(&self, path: &Path, line_len: usize) -> bool {
        if self.max_bytes <= 0 {
            return false;
        }
        match fs::metadata(path) {
            Ok(meta) => meta.len() + line_len as u64 + 1 > self.max_bytes as u64,
            Err(_) => false,
        }
    }

    fn rotate(&self, name: &str) -> std::io::Result<()> {
        let current = self.dir.join(name);

        if self.backups <= 0 {
            // No backups kept: start the file over
            fs::remove_file(&current)?;
            return Ok(());
        }

        let numbered = |i: i64| self.dir.join(format!("{name}.{i}"));

        let oldest = numbered(self.backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for i in (1..self.backups).rev() {
            let from = numbered(i);
            if from.exists() {
                fs::rename(from, numbered(i + 1))?;
            }
        }
        fs::rename(current, numbered(1))
    }
}
