//! Local filesystem storage for run output.
//!
//! ## Storage Layout
//!
//! ```text
//! {output_dir}/
//! ├── 2025-2024-cluster(20250301_101500).txt    # Match report
//! └── logs/
//!     └── 2025-2024-cluster(20250301_101500).log
//! ```
//!
//! Every I/O failure here is an [`AppError::Persistence`]: a run that cannot
//! store its output has nothing to show for itself.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::MatchRecord;
use crate::storage::RunLog;

/// Metadata about a report write.
#[derive(Debug, Clone)]
pub struct WriteMetadata {
    pub location: PathBuf,
    pub record_count: usize,
}

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    pub fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::persistence(parent, e))?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path(key);
        Self::ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        Self::write_then_rename(&tmp, &path, bytes)
            .await
            .map_err(|e| AppError::persistence(&path, e))?;

        Ok(path)
    }

    async fn write_then_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::File::create(tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);
        tokio::fs::rename(tmp, path).await
    }

    /// Write match records as one line each, in the given order.
    pub async fn write_report(&self, key: &str, records: &[MatchRecord]) -> Result<WriteMetadata> {
        let content = records
            .iter()
            .map(MatchRecord::to_line)
            .collect::<Vec<_>>()
            .join("\n");
        let location = self.write_bytes(key, content.as_bytes()).await?;

        log::debug!("Wrote {} records to {}", records.len(), location.display());

        Ok(WriteMetadata {
            location,
            record_count: records.len(),
        })
    }

    /// Create the run log at `key`, creating directories as needed.
    pub async fn open_log(&self, key: &str) -> Result<RunLog> {
        let path = self.path(key);
        Self::ensure_dir(&path).await?;
        RunLog::create(path).await
    }
}
