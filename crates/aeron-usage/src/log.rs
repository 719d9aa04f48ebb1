use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::{ProviderStats, UsageError, UsageLogEntry};

/// Append-only JSON-lines usage log, one file per provider
///
/// Writers to the same file are serialized through a per-file lock and each
/// entry goes out as a single `O_APPEND` write, so lines from concurrent
/// calls never interleave.
#[derive(Debug)]
pub struct UsageLog {
    dir: PathBuf,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl UsageLog {
    /// Log rooted at `dir`; the directory is created on first append
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: DashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `provider`'s log
    pub fn path_for(&self, provider: &str) -> PathBuf {
        let file_stem: String = provider
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file_stem}-usage.log"))
    }

    fn lock_for(&self, provider: &str) -> Arc<Mutex<()>> {
        self.locks.entry(provider.to_owned()).or_default().clone()
    }

    /// Append one entry to its provider's file
    pub async fn append(&self, entry: &UsageLogEntry) -> Result<(), UsageError> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let path = self.path_for(&entry.provider);
        let lock = self.lock_for(&entry.provider);
        let _guard = lock.lock().await;

        tokio::fs::create_dir_all(&self.dir).await.map_err(|source| UsageError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| UsageError::Io {
                path: path.clone(),
                source,
            })?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|source| UsageError::Io { path, source })?;

        Ok(())
    }

    /// Every entry in `provider`'s file, oldest first
    ///
    /// A missing file reads as empty; lines that fail to parse are skipped.
    pub async fn entries(&self, provider: &str) -> Result<Vec<UsageLogEntry>, UsageError> {
        let path = self.path_for(provider);

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(UsageError::Io { path, source }),
        };

        let entries = raw
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| {
                serde_json::from_str(line)
                    .inspect_err(|e| tracing::debug!(provider, error = %e, "skipping malformed usage log line"))
                    .ok()
            })
            .collect();

        Ok(entries)
    }

    /// The last `limit` entries for `provider`, oldest first
    pub async fn tail(&self, provider: &str, limit: usize) -> Result<Vec<UsageLogEntry>, UsageError> {
        let mut entries = self.entries(provider).await?;
        let skip = entries.len().saturating_sub(limit);
        entries.drain(..skip);
        Ok(entries)
    }

    /// Statistics over `provider`'s whole log
    pub async fn stats(&self, provider: &str) -> Result<ProviderStats, UsageError> {
        let entries = self.entries(provider).await?;
        Ok(ProviderStats::from_entries(provider, &entries))
    }
}
