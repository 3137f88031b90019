//! Presentation stage: in-play filter, competition grouping and rendering.

pub mod country;
pub mod grouping;
pub mod render;

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use tracing::{info, warn};

use crate::merge::MergeBatch;

pub use grouping::{filter_in_play, group_by_competition, CompetitionGroup};
pub use render::{MatchLog, RunFooter, RunHeader};

const DISPLAY_TIME_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p %Z";

fn display_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(DISPLAY_TIME_FORMAT).to_string()
}

/// What one presentation run showed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentReport {
    pub in_play: usize,
    pub competitions: usize,
    /// Match ids in display order.
    pub match_ids: Vec<String>,
}

/// Render the in-play part of `batch` to `out` and the match log.
///
/// Match-log write failures are logged and do not stop the run.
pub fn present_batch(
    batch: &MergeBatch,
    log: &MatchLog,
    daily_fetch: u32,
    out: &mut dyn Write,
) -> Result<PresentReport> {
    let in_play = filter_in_play(&batch.summaries);
    let groups = group_by_competition(&in_play);

    let header = RunHeader {
        filter_time: display_time(Utc::now()),
        generated_at: display_time(batch.timestamp),
        daily_fetch,
        total: in_play.len(),
    };
    writeln!(out, "{header}")?;

    let mut match_ids = Vec::with_capacity(in_play.len());
    let mut status_counts = BTreeMap::new();

    for group in &groups {
        let group_header = render::competition_header(group);
        writeln!(out, "{group_header}")?;

        let mut text = group_header;
        for summary in &group.matches {
            text.push('\n');
            text.push_str(&render::match_block(summary));
            match_ids.push(summary.match_id.clone());
            *status_counts.entry(summary.status_id).or_insert(0) += 1;
        }

        if let Err(e) = log.append(&text) {
            warn!(path = %log.path().display(), error = %e, "Failed to write match log");
        }
    }

    let footer = RunFooter {
        summary_time: display_time(Utc::now()),
        daily_fetch,
        total: in_play.len(),
        status_counts,
    };
    writeln!(out, "{footer}")?;

    info!(
        in_play = in_play.len(),
        competitions = groups.len(),
        total = batch.total_matches,
        "Presented in-play matches"
    );

    Ok(PresentReport {
        in_play: in_play.len(),
        competitions: groups.len(),
        match_ids,
    })
}
