use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default location of the pipeline config, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub merge: MergeConfig,
    pub presentation: PresentationConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Document written by the external fetcher.
    pub input_path: PathBuf,
    /// Bounded merge history.
    pub output_path: PathBuf,
    /// `{date, count}` file backing the "Daily Fetch" number.
    pub counter_path: PathBuf,
    pub cycle_interval_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MergeConfig {
    pub min_minute: u32,
    pub max_minute: u32,
    pub max_history_entries: usize,
    /// Betting company ids, most preferred first.
    pub preferred_companies: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PresentationConfig {
    pub match_log_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: String,
    #[serde(default)]
    pub json: bool,
}

impl MergeConfig {
    pub fn minute_window(&self) -> std::ops::RangeInclusive<u32> {
        self.min_minute..=self.max_minute
    }
}

impl AppConfig {
    /// Load configuration from `path`, after loading `.env`.
    ///
    /// `PIPELINE_CONFIG` in the environment takes precedence over `path`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = std::env::var("PIPELINE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                path.map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
            });

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        anyhow::ensure!(
            config.merge.min_minute <= config.merge.max_minute,
            "merge.min_minute ({}) exceeds merge.max_minute ({})",
            config.merge.min_minute,
            config.merge.max_minute
        );
        anyhow::ensure!(
            config.merge.max_history_entries > 0,
            "merge.max_history_entries must be at least 1"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_config() {
        let contents = std::fs::read_to_string("config/default.toml")
            .expect("config/default.toml should exist");
        let config = AppConfig::from_toml(&contents).expect("should parse");
        assert_eq!(config.pipeline.cycle_interval_seconds, 60);
        assert_eq!(config.merge.minute_window(), 2..=6);
        assert_eq!(config.merge.max_history_entries, 5);
        assert_eq!(config.merge.preferred_companies.first().map(String::as_str), Some("2"));
        assert_eq!(config.pipeline.input_path, PathBuf::from("step1.json"));
    }

    #[test]
    fn test_inverted_minute_window_rejected() {
        let contents = std::fs::read_to_string("config/default.toml")
            .expect("config/default.toml should exist")
            .replace("min_minute = 2", "min_minute = 9");
        let err = AppConfig::from_toml(&contents).unwrap_err();
        assert!(err.to_string().contains("min_minute"));
    }
}
