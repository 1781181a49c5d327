// src/storage/run_log.rs

//! Run-level log file.
//!
//! Workers never write here. The collecting task appends each finished
//! venue's trace as one contiguous group, so the file reads the same no
//! matter how the venues were scheduled.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::utils::log::{LogLevel, TraceEntry, VenueTrace};

/// Append-only log file for one run.
#[derive(Debug)]
pub struct RunLog {
    path: PathBuf,
    file: File,
}

impl RunLog {
    /// Create (or truncate) the log file. The parent directory must exist.
    pub async fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::create(&path)
            .await
            .map_err(|e| AppError::persistence(&path, e))?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a run-level entry and mirror it to the console logger.
    pub async fn write_entry(&mut self, entry: TraceEntry) -> Result<()> {
        let level: log::Level = entry.level.into();
        log::log!(level, "{}", entry.message);
        self.write_text(&format!("{}\n", entry.render())).await
    }

    /// Append a finished venue's trace under a header naming the venue.
    pub async fn append_trace(&mut self, label: &str, trace: &VenueTrace) -> Result<()> {
        let mut block = format!("========== {label} ==========\n");
        for line in trace.lines() {
            block.push_str(&line);
            block.push('\n');
        }
        block.push('\n');
        self.write_text(&block).await
    }

    async fn write_text(&mut self, text: &str) -> Result<()> {
        if let Err(e) = self.file.write_all(text.as_bytes()).await {
            return Err(AppError::persistence(&self.path, e));
        }
        self.file
            .flush()
            .await
            .map_err(|e| AppError::persistence(&self.path, e))
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}
