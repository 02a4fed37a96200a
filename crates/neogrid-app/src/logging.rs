//! Where log lines go.
//!
//! The interactive runner owns the terminal's alternate screen, so stderr is
//! off limits while it draws. Logs then go to a file when one is given and
//! are dropped otherwise.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt::writer::BoxMakeWriter};

/// Destination for the tracing subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard error.
    Stderr,
    /// Discarded.
    Sink,
    /// A plain-text file, truncated on start.
    File(PathBuf),
}

impl LogTarget {
    /// A log file always wins. Without one, headless runs log to stderr and
    /// terminal runs discard logs.
    pub fn select(headless: bool, log_file: Option<&Path>) -> Self {
        match log_file {
            Some(path) => LogTarget::File(path.to_path_buf()),
            None if headless => LogTarget::Stderr,
            None => LogTarget::Sink,
        }
    }

    /// Opens the destination.
    pub fn make_writer(&self) -> Result<BoxMakeWriter> {
        Ok(match self {
            LogTarget::Stderr => BoxMakeWriter::new(io::stderr),
            LogTarget::Sink => BoxMakeWriter::new(io::sink),
            LogTarget::File(path) => {
                let file = File::create(path)
                    .with_context(|| format!("failed to create log file {}", path.display()))?;
                BoxMakeWriter::new(Mutex::new(file))
            }
        })
    }

    fn ansi(&self) -> bool {
        matches!(self, LogTarget::Stderr)
    }
}

/// Installs the global subscriber, filtered by `RUST_LOG`.
///
/// A subscriber installed earlier (by a test harness, say) is left alone.
pub fn init_tracing(target: &LogTarget) -> Result<()> {
    let writer = target.make_writer()?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(target.ansi())
        .with_writer(writer)
        .try_init();
    Ok(())
}
