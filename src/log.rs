//! Persistence of formatted faults to per-fault log files.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Error raised when a fault log file could not be created or written.
///
/// This is fatal to the logging path and must not be swallowed:
/// a silent logging failure would hide all future diagnostics.
#[derive(Debug)]
pub struct LogWriteError {
    path: PathBuf,
    source: std::io::Error,
}

impl LogWriteError {
    fn new(path: PathBuf, source: std::io::Error) -> Self {
        Self { path, source }
    }

    /// The path that could not be created or written.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for LogWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to write fault log {}", self.path.display())
    }
}

impl std::error::Error for LogWriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Write `body` to a uniquely named log file under `dir`.
///
/// The directory (including parents) is created first when absent. The
/// file name is composed from the triggering line number, a random
/// token and a second-resolution timestamp:
/// `Line-<line>-<token>.<dd-Mon-YYYY-HH.MM.SS>.log`. Uniqueness is
/// best-effort via the token; there is no locking, and a colliding name
/// fails the write rather than overwrite another fault's log.
///
/// Whether logging is enabled at all, and which directory is in effect,
/// are the caller's decisions.
pub fn write_fault_log(dir: &Path, line: u32, body: &str) -> Result<PathBuf, LogWriteError> {
    if let Err(err) = fs::create_dir_all(dir) {
        tracing::error!(
            directory = %dir.display(),
            error = %err,
            "failed to create fault log directory",
        );
        return Err(LogWriteError::new(dir.to_path_buf(), err));
    }

    let stamp = jiff::Zoned::now().strftime("%d-%b-%Y-%H.%M.%S");
    let name = format!("Line-{line}-{}.{stamp}.log", Uuid::new_v4().simple());
    let path = dir.join(name);

    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(err) => {
            tracing::error!(
                file = %path.display(),
                error = %err,
                "failed to open fault log file",
            );
            return Err(LogWriteError::new(path, err));
        }
    };
    if let Err(err) = file.write_all(body.as_bytes()) {
        tracing::error!(
            file = %path.display(),
            error = %err,
            "failed to write fault log file",
        );
        return Err(LogWriteError::new(path, err));
    }

    tracing::debug!(file = %path.display(), "fault log written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_body_to_uniquely_named_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_fault_log(tmp.path(), 42, "boom in app.rs on line 42").unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("Line-42-"), "got: {name}");
        assert!(name.ends_with(".log"), "got: {name}");
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "boom in app.rs on line 42"
        );
    }

    #[test]
    fn creates_missing_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("storage").join("logs");
        let path = write_fault_log(&dir, 1, "x").unwrap();
        assert!(path.starts_with(&dir));
        assert!(dir.is_dir());
    }

    #[test]
    fn two_writes_for_the_same_line_do_not_collide() {
        let tmp = tempfile::tempdir().unwrap();
        let first = write_fault_log(tmp.path(), 7, "first").unwrap();
        let second = write_fault_log(tmp.path(), 7, "second").unwrap();
        assert_ne!(first, second);
        assert_eq!(fs::read_to_string(first).unwrap(), "first");
        assert_eq!(fs::read_to_string(second).unwrap(), "second");
    }

    #[test]
    fn unwritable_directory_surfaces_the_failed_path() {
        let tmp = tempfile::tempdir().unwrap();
        // a file where a directory is expected makes create_dir_all fail
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let dir = blocker.join("logs");

        let err = write_fault_log(&dir, 3, "x").unwrap_err();
        assert_eq!(err.path(), dir.as_path());
        assert!(err.to_string().contains("blocker"), "got: {err}");
    }
}
