//! Bounded FIFO of merge batches persisted as one pretty-printed JSON file.
//!
//! Access is read-all, modify, write-all with no locking; the pipeline runs as
//! a single process.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::merge::{MergeBatch, ProcessingSummary};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryFile {
    #[serde(default)]
    pub history: Vec<MergeBatch>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_entries: usize,
    #[serde(default)]
    pub latest_match_count: usize,
    #[serde(default)]
    pub processing_summary: Option<ProcessingSummary>,
}

impl HistoryFile {
    pub fn latest(&self) -> Option<&MergeBatch> {
        self.history.last()
    }

    /// Append and evict from the front until at most `max_entries` remain.
    pub fn push_bounded(&mut self, batch: MergeBatch, max_entries: usize) {
        self.latest_match_count = batch.total_matches;
        self.history.push(batch);
        let excess = self.history.len().saturating_sub(max_entries);
        if excess > 0 {
            self.history.drain(..excess);
        }
        self.total_entries = self.history.len();
        self.last_updated = Some(Utc::now());
    }
}

pub struct HistoryStore {
    path: PathBuf,
    max_entries: usize,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>, max_entries: usize) -> Self {
        Self {
            path: path.into(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current history; empty when the file is missing or unreadable.
    pub fn load(&self) -> HistoryFile {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No history file yet");
                return HistoryFile::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read history, starting fresh");
                return HistoryFile::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(file) => file,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Corrupt history file, starting fresh");
                HistoryFile::default()
            }
        }
    }

    pub fn append(&self, batch: MergeBatch, summary: Option<ProcessingSummary>) -> Result<HistoryFile> {
        let mut file = self.load();
        file.push_bounded(batch, self.max_entries);
        file.processing_summary = summary;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&file).context("Failed to serialize history")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write history file: {}", self.path.display()))?;

        info!(
            path = %self.path.display(),
            entries = file.total_entries,
            latest_matches = file.latest_match_count,
            "History updated"
        );
        Ok(file)
    }

    /// Like [`append`](Self::append), but reports failure as `false`.
    pub fn persist(&self, batch: MergeBatch, summary: Option<ProcessingSummary>) -> bool {
        match self.append(batch, summary) {
            Ok(_) => true,
            Err(e) => {
                error!(path = %self.path.display(), error = %format!("{e:#}"), "Failed to persist merge batch");
                false
            }
        }
    }
}
