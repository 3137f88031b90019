//! Merge stage: raw feed document → one batch of match summaries.

pub mod convert;
pub mod history;
pub mod odds;
pub mod resolver;
pub mod summary;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::config::MergeConfig;
use crate::feed::FeedDocument;
use crate::merge::resolver::UNKNOWN;
use crate::status;

pub use history::{HistoryFile, HistoryStore};
pub use summary::{build_summary, MatchSummary};

/// All summaries produced from one feed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeBatch {
    pub batch_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub total_matches: usize,
    pub in_play_count: usize,
    pub summaries: Vec<MatchSummary>,
}

impl MergeBatch {
    pub fn new(summaries: Vec<MatchSummary>) -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            total_matches: summaries.len(),
            in_play_count: summaries.iter().filter(|s| s.is_in_play()).count(),
            summaries,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn matches_with_odds(&self) -> usize {
        self.summaries.iter().filter(|s| s.odds.has_company()).count()
    }

    /// Match count per status code, ascending by code.
    pub fn status_counts(&self) -> BTreeMap<u32, usize> {
        let mut counts = BTreeMap::new();
        for summary in &self.summaries {
            *counts.entry(summary.status_id).or_insert(0) += 1;
        }
        counts
    }
}

/// Merge every live match of `doc`. The document is left untouched.
pub fn merge_document(doc: &FeedDocument, config: &MergeConfig) -> MergeBatch {
    let summaries: Vec<MatchSummary> = doc
        .matches
        .iter()
        .map(|raw| build_summary(raw, doc, config))
        .collect();

    let batch = MergeBatch::new(summaries);
    info!(
        batch_id = %batch.batch_id,
        total = batch.total_matches,
        in_play = batch.in_play_count,
        with_odds = batch.matches_with_odds(),
        "Merged feed document"
    );
    batch
}

/// Footer block written alongside the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingSummary {
    pub processed_at: DateTime<Utc>,
    pub input_file: String,
    pub output_file: String,
    pub total_matches: usize,
    pub in_play_matches: usize,
    pub matches_with_odds: usize,
    pub unique_teams: usize,
    pub unique_competitions: usize,
    pub processing_time_ms: u64,
    pub status_breakdown: Vec<String>,
}

impl ProcessingSummary {
    pub fn from_batch(batch: &MergeBatch, input: &Path, output: &Path, elapsed: Duration) -> Self {
        let known = |name: &String| name != UNKNOWN;

        let unique_teams: BTreeSet<&String> = batch
            .summaries
            .iter()
            .flat_map(|s| [&s.home.name, &s.away.name])
            .filter(|name| known(name))
            .collect();
        let unique_competitions: BTreeSet<&String> = batch
            .summaries
            .iter()
            .map(|s| &s.competition.name)
            .filter(|name| known(name))
            .collect();

        let status_breakdown = batch
            .status_counts()
            .into_iter()
            .map(|(code, count)| {
                let noun = if count == 1 { "match" } else { "matches" };
                format!("{} (ID: {code}): {count} {noun}", status::describe(code))
            })
            .collect();

        Self {
            processed_at: Utc::now(),
            input_file: input.display().to_string(),
            output_file: output.display().to_string(),
            total_matches: batch.total_matches,
            in_play_matches: batch.in_play_count,
            matches_with_odds: batch.matches_with_odds(),
            unique_teams: unique_teams.len(),
            unique_competitions: unique_competitions.len(),
            processing_time_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            status_breakdown,
        }
    }
}

impl fmt::Display for ProcessingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "=== Merge Summary ===\n\
             Processed: {}\n\
             Input: {} | Output: {}\n\
             Matches: {} ({} in play, {} with odds)\n\
             Teams: {} | Competitions: {}\n\
             Processing Time: {} ms",
            self.processed_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.input_file,
            self.output_file,
            self.total_matches,
            self.in_play_matches,
            self.matches_with_odds,
            self.unique_teams,
            self.unique_competitions,
            self.processing_time_ms,
        )?;
        if !self.status_breakdown.is_empty() {
            write!(f, "\nStatus Breakdown:")?;
            for line in &self.status_breakdown {
                write!(f, "\n  {line}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> MergeConfig {
        MergeConfig {
            min_minute: 2,
            max_minute: 6,
            max_history_entries: 5,
            preferred_companies: vec!["2".to_string()],
        }
    }

    fn document() -> FeedDocument {
        FeedDocument::from_value(&json!({
            "live_matches": {"results": [
                {"id": "a", "status_id": 4, "home_team_id": "t1", "away_team_id": "t2", "competition_id": "c1"},
                {"id": "b", "status_id": 4, "home_team_id": "t1", "away_team_id": "t3", "competition_id": "c1"},
                {"id": "c", "status_id": 1, "home_team_id": "t9"}
            ]},
            "team_info": {
                "t1": {"results": [{"name": "Ajax"}]},
                "t2": {"results": [{"name": "PSV"}]},
                "t3": {"results": [{"name": "Feyenoord"}]}
            },
            "competition_info": {"c1": {"results": [{"name": "Eredivisie"}]}}
        }))
    }

    #[test]
    fn test_merge_counts() {
        let batch = merge_document(&document(), &config());
        assert_eq!(batch.total_matches, 3);
        assert_eq!(batch.in_play_count, 2);
        assert_eq!(batch.summaries[2].home.name, UNKNOWN);
    }

    #[test]
    fn test_merge_empty_document() {
        let batch = merge_document(&FeedDocument::default(), &config());
        assert_eq!(batch.total_matches, 0);
        assert!(batch.summaries.is_empty());
    }

    #[test]
    fn test_processing_summary() {
        let batch = merge_document(&document(), &config());
        let summary = ProcessingSummary::from_batch(
            &batch,
            Path::new("step1.json"),
            Path::new("step2.json"),
            Duration::from_millis(12),
        );
        assert_eq!(summary.unique_teams, 3);
        assert_eq!(summary.unique_competitions, 1);
        assert_eq!(summary.matches_with_odds, 0);
        assert_eq!(summary.processing_time_ms, 12);
        assert_eq!(
            summary.status_breakdown,
            vec![
                "Not started (ID: 1): 1 match".to_string(),
                "Second half (ID: 4): 2 matches".to_string(),
            ]
        );
    }
}
