//! Stage orchestration: merge, present, and the chained cycle.

use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::counter::DailyCounter;
use crate::feed::FeedDocument;
use crate::merge::{merge_document, HistoryStore, MergeBatch, ProcessingSummary};
use crate::present::{present_batch, MatchLog, PresentReport};

/// Result of one merge stage run.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub batch: MergeBatch,
    pub summary: ProcessingSummary,
    /// Whether the batch reached the history file.
    pub persisted: bool,
    pub daily_fetch: u32,
}

pub struct Pipeline {
    config: AppConfig,
    history: HistoryStore,
    counter: DailyCounter,
    match_log: MatchLog,
}

impl Pipeline {
    pub fn new(config: AppConfig) -> Self {
        let history = HistoryStore::new(
            config.pipeline.output_path.clone(),
            config.merge.max_history_entries,
        );
        let counter = DailyCounter::new(config.pipeline.counter_path.clone());
        let match_log = MatchLog::new(config.presentation.match_log_path.clone());
        Self {
            config,
            history,
            counter,
            match_log,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Feed document → history file. An unreadable feed yields an empty batch.
    pub fn merge(&self) -> MergeOutcome {
        let started = Instant::now();
        let input = &self.config.pipeline.input_path;

        let doc = FeedDocument::load(input).unwrap_or_else(|e| {
            error!(error = %e, "Failed to load feed document, merging an empty batch");
            FeedDocument::default()
        });

        let batch = merge_document(&doc, &self.config.merge);
        let summary =
            ProcessingSummary::from_batch(&batch, input, self.history.path(), started.elapsed());
        let persisted = self.history.persist(batch.clone(), Some(summary.clone()));
        let daily_fetch = self.counter.increment();

        info!(
            total = summary.total_matches,
            in_play = summary.in_play_matches,
            with_odds = summary.matches_with_odds,
            teams = summary.unique_teams,
            competitions = summary.unique_competitions,
            elapsed_ms = summary.processing_time_ms,
            persisted,
            daily_fetch,
            "Merge stage complete"
        );

        MergeOutcome {
            batch,
            summary,
            persisted,
            daily_fetch,
        }
    }

    /// Render the newest batch in the history file, if there is one.
    pub fn present_latest(&self, out: &mut dyn Write) -> Result<Option<PresentReport>> {
        let file = self.history.load();
        let Some(batch) = file.latest() else {
            warn!(path = %self.history.path().display(), "No merge history to present");
            return Ok(None);
        };
        let report = present_batch(batch, &self.match_log, self.counter.current(), out)?;
        Ok(Some(report))
    }

    /// Merge, then present the fresh batch without re-reading it from disk.
    pub fn run_cycle(&self, out: &mut dyn Write) -> Result<PresentReport> {
        let outcome = self.merge();
        present_batch(&outcome.batch, &self.match_log, outcome.daily_fetch, out)
    }

    /// Repeat [`run_cycle`](Self::run_cycle) until Ctrl-C.
    pub async fn run_continuous(&self) -> Result<()> {
        let interval = Duration::from_secs(self.config.pipeline.cycle_interval_seconds);
        info!(interval_s = interval.as_secs(), "Continuous mode started");

        let mut cycle: u64 = 0;
        loop {
            cycle += 1;
            let result = {
                let mut stdout = std::io::stdout().lock();
                self.run_cycle(&mut stdout)
            };
            match result {
                Ok(report) => info!(cycle, in_play = report.in_play, "Cycle complete"),
                Err(e) => error!(cycle, error = %e, "Cycle failed"),
            }

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!(cycles = cycle, "Ctrl-C received, shutting down");
                    break;
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config_in(dir: &Path) -> AppConfig {
        let contents = std::fs::read_to_string("config/default.toml").unwrap();
        let mut config = AppConfig::from_toml(&contents).unwrap();
        config.pipeline.input_path = dir.join("step1.json");
        config.pipeline.output_path = dir.join("step2.json");
        config.pipeline.counter_path = dir.join("counter.json");
        config.presentation.match_log_path = dir.join("matches.log");
        config
    }

    #[test]
    fn test_missing_feed_merges_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(config_in(dir.path()));
        let outcome = pipeline.merge();
        assert_eq!(outcome.batch.total_matches, 0);
        assert!(outcome.persisted);
        assert_eq!(outcome.daily_fetch, 1);
        assert_eq!(pipeline.history().load().total_entries, 1);
    }

    #[test]
    fn test_present_without_history() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(config_in(dir.path()));
        let mut out = Vec::new();
        assert!(pipeline.present_latest(&mut out).unwrap().is_none());
        assert!(out.is_empty());
    }
}
