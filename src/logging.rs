//! Log setup: a rolling log file at `DEBUG` plus a console stream whose
//! threshold depends on `--verbose` (or `RUST_LOG`).

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::app::{FeedoError, Result};

/// Roll the log over once it grows past this size.
pub const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;
pub const DEFAULT_BACKUPS: usize = 3;

pub fn init(log_file: &Path, verbose: bool) -> Result<()> {
    if let Some(parent) = log_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    rotate(log_file, DEFAULT_MAX_BYTES, DEFAULT_BACKUPS)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    let console_level = if verbose { "debug" } else { "error" };
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,feedo={}", console_level)));
    let file_filter = Targets::new()
        .with_target("feedo", LevelFilter::DEBUG)
        .with_default(LevelFilter::WARN);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(file_filter),
        )
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_filter(console_filter),
        )
        .try_init()
        .map_err(|e| FeedoError::Other(format!("Failed to initialize logging: {}", e)))
}

/// If `path` is larger than `max_bytes`, shift `path.1..path.N` up by one and
/// move `path` to `path.1`. The oldest backup falls off the end.
pub fn rotate(path: &Path, max_bytes: u64, backups: usize) -> io::Result<()> {
    let size = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    if size <= max_bytes {
        return Ok(());
    }
    if backups == 0 {
        return fs::remove_file(path);
    }

    for i in (1..backups).rev() {
        match fs::rename(backup_path(path, i), backup_path(path, i + 1)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
            _ => {}
        }
    }
    fs::rename(path, backup_path(path, 1))
}

fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{}", index));
    PathBuf::from(name)
}
