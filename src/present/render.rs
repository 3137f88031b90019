//! Text rendering of the in-play view.
//!
//! Run header, competition headers and footer go to the console; every
//! competition header and match block also goes to the append-only match log.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_decimal_macros::dec;
use serde_json::Value;

use crate::feed::models::{text_from_value, Market};
use crate::merge::odds::OddsQuote;
use crate::merge::summary::{split_measure, wind_mph, Environment};
use crate::merge::MatchSummary;
use crate::present::grouping::CompetitionGroup;
use crate::status::{self, MatchStatus};

const RULE: usize = 80;
const WIDE_RULE: usize = 100;

/// Top of a presentation run.
#[derive(Debug, Clone)]
pub struct RunHeader {
    pub filter_time: String,
    pub generated_at: String,
    pub daily_fetch: u32,
    pub total: usize,
}

impl fmt::Display for RunHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE);
        let statuses: Vec<u32> = MatchStatus::IN_PLAY.iter().map(|s| s.code()).collect();
        write!(
            f,
            "\n{rule}\n\
             🔥 LIVE MATCHES: STATUS FILTER (2-7)\n\
             {rule}\n\
             Filter Time: {}\n\
             Data Generated: {}\n\
             Daily Fetch: #{}\n\
             Statuses Filtered: {:?}\n\
             Included Matches Count: {}\n\
             {rule}",
            self.filter_time, self.generated_at, self.daily_fetch, statuses, self.total
        )
    }
}

/// Bottom of a presentation run, with the per-status counts.
#[derive(Debug, Clone)]
pub struct RunFooter {
    pub summary_time: String,
    pub daily_fetch: u32,
    pub total: usize,
    pub status_counts: BTreeMap<u32, usize>,
}

impl fmt::Display for RunFooter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE);
        write!(
            f,
            "\n{rule}\n\
             END OF STATUS FILTER\n\
             {rule}\n\
             Summary Time: {}\n\
             Total Matches (statuses 2-7): {}\n\
             Daily Fetch: #{}\n\
             {rule}",
            self.summary_time, self.total, self.daily_fetch
        )?;

        if !self.status_counts.is_empty() {
            let short_rule = "=".repeat(60);
            write!(f, "\n\nSTATUS SUMMARY\n{short_rule}\n")?;
            for (code, count) in &self.status_counts {
                writeln!(f, "{} (ID: {code}): {count}", status::describe(*code))?;
            }
            write!(f, "Total: {}\n{short_rule}", self.total)?;
        }
        Ok(())
    }
}

pub fn competition_header(group: &CompetitionGroup<'_>) -> String {
    let rule = "=".repeat(WIDE_RULE);
    let title = format!("🏆 {}", group.competition.to_uppercase());
    let info = format!("📍 {} | 📊 {} Matches", group.country, group.matches.len());
    format!("\n{rule}\n{rule}\n{title:^WIDE_RULE$}\n{info:^WIDE_RULE$}\n{rule}\n{rule}")
}

/// One match: score line, odds, environment, separator.
pub fn match_block(summary: &MatchSummary) -> String {
    let minute = summary
        .odds_minute()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut lines = vec![format!(
        "• [{} | {minute}'] {} {} – {} {}",
        summary.status,
        summary.home.name,
        summary.score.home,
        summary.score.away,
        summary.away.name
    )];
    lines.push(odds_lines(summary));
    lines.push(
        summary
            .environment
            .as_ref()
            .map(environment_lines)
            .unwrap_or_else(|| "No environment data available".to_string()),
    );
    lines.push("-".repeat(RULE));
    lines.join("\n")
}

fn slot_text(value: &Value) -> String {
    text_from_value(value).unwrap_or_else(|| "N/A".to_string())
}

fn quote_line(market: Market, quote: &OddsQuote) -> String {
    let [first, middle, last] = &quote.american;
    let (first, middle, last) = (slot_text(first), slot_text(middle), slot_text(last));
    let minute = quote.minute;
    match market {
        Market::MoneyLine => format!(
            "│ ML:      │ Home: {first:>6} │ Draw: {middle:>6} │ Away: {last:>7} │ (@{minute}')"
        ),
        Market::Spread => format!(
            "│ Spread:  │ Home: {first:>6} │ Hcap: {middle:>6} │ Away: {last:>7} │ (@{minute}')"
        ),
        Market::OverUnder => format!(
            "│ O/U:     │ Over: {first:>6} │ Line: {middle:>6} │ Under: {last:>6} │ (@{minute}')"
        ),
        Market::Corners => format!(
            "│ Corners: │ Over: {first:>6} │ Line: {middle:>6} │ Under: {last:>6} │ (@{minute}')"
        ),
    }
}

fn odds_lines(summary: &MatchSummary) -> String {
    let quotes: Vec<String> = Market::ALL
        .iter()
        .filter_map(|m| summary.odds.market(*m).latest().map(|q| quote_line(*m, q)))
        .collect();

    if quotes.is_empty() {
        return "No betting odds available".to_string();
    }
    match &summary.odds.company_name {
        Some(name) => format!("Odds: {name}\n{}", quotes.join("\n")),
        None => quotes.join("\n"),
    }
}

pub fn format_temperature(raw: &str) -> String {
    let fahrenheit = split_measure(raw)
        .filter(|(_, unit)| matches!(*unit, "°C" | "C" | "℃"))
        .and_then(|(celsius, _)| celsius.checked_mul(dec!(9)))
        .and_then(|v| v.checked_div(dec!(5)))
        .and_then(|v| v.checked_add(dec!(32)));
    match fahrenheit {
        Some(f) => format!("{raw} ({:.1}°F)", f.round_dp(1)),
        None => raw.to_string(),
    }
}

pub fn format_wind(raw: &str) -> String {
    match split_measure(raw) {
        Some((_, "m/s")) => match wind_mph(raw) {
            Some(mph) => format!("{raw} ({:.1} mph)", mph.round_dp(1)),
            None => raw.to_string(),
        },
        _ => raw.to_string(),
    }
}

fn with_suffix(value: &str, suffix: &str, sep: &str) -> String {
    if value.trim_end().ends_with(suffix) {
        value.to_string()
    } else {
        format!("{value}{sep}{suffix}")
    }
}

fn environment_lines(env: &Environment) -> String {
    let mut lines = vec![format!("Weather: {}", env.weather_description)];
    if let Some(temperature) = &env.temperature {
        lines.push(format!("Temperature: {}", format_temperature(temperature)));
    }
    if let Some(wind) = &env.wind {
        let label = env
            .wind_description
            .as_ref()
            .map(|d| format!(", {d}"))
            .unwrap_or_default();
        lines.push(format!("Wind: {}{label}", format_wind(wind)));
    }
    if let Some(humidity) = &env.humidity {
        lines.push(format!("Humidity: {}", with_suffix(humidity, "%", "")));
    }
    if let Some(pressure) = &env.pressure {
        lines.push(format!("Pressure: {}", with_suffix(pressure, "hPa", " ")));
    }
    lines.join("\n")
}

/// Append-only text log of rendered matches.
pub struct MatchLog {
    path: PathBuf,
}

impl MatchLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, text: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open match log {}", self.path.display()))?;
        writeln!(file, "{text}")?;
        Ok(())
    }
}
