//! Per-day run counter shown as "Daily Fetch: #n".

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct CounterState {
    date: NaiveDate,
    count: u32,
}

pub struct DailyCounter {
    path: PathBuf,
}

impl DailyCounter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Option<CounterState> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    fn write(&self, state: CounterState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&state)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    /// Today's count without changing it; 1 if nothing ran yet today.
    pub fn current_on(&self, today: NaiveDate) -> u32 {
        match self.read() {
            Some(state) if state.date == today && state.count > 0 => state.count,
            _ => 1,
        }
    }

    pub fn current(&self) -> u32 {
        self.current_on(Local::now().date_naive())
    }

    /// Bump today's count, starting over at 1 on a new date.
    ///
    /// A failed write is logged; the bumped value is still returned.
    pub fn increment_on(&self, today: NaiveDate) -> u32 {
        let count = match self.read() {
            Some(state) if state.date == today => state.count.saturating_add(1),
            _ => 1,
        };
        if let Err(e) = self.write(CounterState { date: today, count }) {
            warn!(path = %self.path.display(), error = %e, "Failed to save daily counter");
        }
        count
    }

    pub fn increment(&self) -> u32 {
        self.increment_on(Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn test_counts_within_a_day() {
        let dir = tempfile::tempdir().unwrap();
        let counter = DailyCounter::new(dir.path().join("counter.json"));
        assert_eq!(counter.current_on(day(4)), 1);
        assert_eq!(counter.increment_on(day(4)), 1);
        assert_eq!(counter.increment_on(day(4)), 2);
        assert_eq!(counter.current_on(day(4)), 2);
    }

    #[test]
    fn test_resets_on_new_date() {
        let dir = tempfile::tempdir().unwrap();
        let counter = DailyCounter::new(dir.path().join("counter.json"));
        counter.increment_on(day(4));
        counter.increment_on(day(4));
        assert_eq!(counter.current_on(day(5)), 1);
        assert_eq!(counter.increment_on(day(5)), 1);
    }

    #[test]
    fn test_corrupt_file_restarts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counter.json");
        std::fs::write(&path, "garbage").unwrap();
        let counter = DailyCounter::new(&path);
        assert_eq!(counter.increment_on(day(4)), 1);
    }
}
