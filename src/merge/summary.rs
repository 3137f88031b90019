//! Per-match summary assembled from the raw match and its keyed records.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::MergeConfig;
use crate::feed::models::{u32_from_value, DetailRecord, Market, RawEnvironment, RawMatch};
use crate::feed::FeedDocument;
use crate::merge::odds::{select_odds, SelectedOdds};
use crate::merge::resolver::{resolve_competition, resolve_team, CompetitionInfo, TeamSide};
use crate::status;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub match_id: String,
    pub status_id: u32,
    pub status: String,
    pub home: TeamSide,
    pub away: TeamSide,
    pub competition: CompetitionInfo,
    pub score: Score,
    pub kickoff: Option<i64>,
    pub odds: SelectedOdds,
    pub environment: Option<Environment>,
    #[serde(default)]
    pub events: Vec<Value>,
}

impl MatchSummary {
    pub fn is_in_play(&self) -> bool {
        status::is_in_play(self.status_id)
    }

    /// Latest match minute seen in any retained quote.
    pub fn odds_minute(&self) -> Option<u32> {
        Market::ALL
            .iter()
            .filter_map(|m| self.odds.market(*m).latest())
            .map(|q| q.minute)
            .max()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
    pub home_halftime: Option<u32>,
    pub away_halftime: Option<u32>,
}

impl Score {
    /// Index 0 of each sub-score array is the current score, index 1 half-time.
    pub fn from_sub_scores(home: &[Value], away: &[Value]) -> Self {
        let at = |scores: &[Value], i: usize| scores.get(i).and_then(u32_from_value);
        Self {
            home: at(home, 0).unwrap_or(0),
            away: at(away, 0).unwrap_or(0),
            home_halftime: at(home, 1),
            away_halftime: at(away, 1),
        }
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub weather: Option<String>,
    pub weather_description: String,
    pub temperature: Option<String>,
    pub wind: Option<String>,
    #[serde(default)]
    pub wind_description: Option<String>,
    pub humidity: Option<String>,
    pub pressure: Option<String>,
}

impl Environment {
    pub fn from_raw(raw: &RawEnvironment) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        let description = raw
            .weather
            .as_deref()
            .and_then(|w| w.parse::<u32>().ok())
            .map(weather_description)
            .unwrap_or("Unknown");

        Some(Self {
            weather: raw.weather.clone(),
            weather_description: description.to_string(),
            temperature: raw.temperature.clone(),
            wind: raw.wind.clone(),
            wind_description: raw
                .wind
                .as_deref()
                .and_then(wind_mph)
                .map(|mph| wind_description(mph).to_string()),
            humidity: raw.humidity.clone(),
            pressure: raw.pressure.clone(),
        })
    }
}

pub fn weather_description(code: u32) -> &'static str {
    match code {
        1 => "Sunny",
        2 => "Partly Cloudy",
        3 => "Cloudy",
        4 => "Overcast",
        5 => "Foggy",
        6 => "Light Rain",
        7 => "Rain",
        8 => "Heavy Rain",
        9 => "Snow",
        10 => "Thunder",
        _ => "Unknown",
    }
}

/// Split `"18°C"` or `"4.0 m/s"` into a number and its unit.
pub fn split_measure(text: &str) -> Option<(Decimal, &str)> {
    let text = text.trim();
    let end = text
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*c == '-' && *i == 0)))
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let value = Decimal::from_str(&text[..end]).ok()?;
    Some((value, text[end..].trim()))
}

/// Wind speed in mph. A bare number is taken as mph already.
pub fn wind_mph(raw: &str) -> Option<Decimal> {
    match split_measure(raw)? {
        (speed, "m/s") => speed.checked_mul(dec!(2.237)),
        (speed, "" | "mph") => Some(speed),
        _ => None,
    }
}

/// Beaufort-style label for a wind speed in mph.
pub fn wind_description(mph: Decimal) -> &'static str {
    const SCALE: &[(Decimal, &str)] = &[
        (dec!(1), "Calm"),
        (dec!(4), "Light Air"),
        (dec!(8), "Light Breeze"),
        (dec!(13), "Gentle Breeze"),
        (dec!(19), "Moderate Breeze"),
        (dec!(25), "Fresh Breeze"),
        (dec!(32), "Strong Breeze"),
        (dec!(39), "Near Gale"),
        (dec!(47), "Gale"),
        (dec!(55), "Strong Gale"),
        (dec!(64), "Storm"),
        (dec!(73), "Violent Storm"),
    ];
    SCALE
        .iter()
        .find(|(below, _)| mph < *below)
        .map(|(_, label)| *label)
        .unwrap_or("Hurricane")
}

/// Detail record first, then the raw match, then the score array, then 0.
fn resolve_status(raw: &RawMatch, detail: Option<&DetailRecord>) -> u32 {
    detail
        .and_then(|d| d.status_id)
        .or(raw.status_id)
        .or_else(|| raw.score_status())
        .unwrap_or(0)
}

fn resolve_score(raw: &RawMatch, detail: Option<&DetailRecord>) -> Score {
    let (home, away) = (raw.home_sub_scores(), raw.away_sub_scores());
    if !home.is_empty() || !away.is_empty() {
        return Score::from_sub_scores(home, away);
    }
    detail
        .map(|d| Score::from_sub_scores(&d.home_scores, &d.away_scores))
        .unwrap_or_default()
}

/// Foreign key from the detail record, else from the raw match.
fn pick<'a>(from_detail: Option<&'a String>, from_raw: &'a Option<String>) -> Option<&'a str> {
    from_detail.or(from_raw.as_ref()).map(String::as_str)
}

/// Build one summary. The document is only read.
pub fn build_summary(raw: &RawMatch, doc: &FeedDocument, config: &MergeConfig) -> MatchSummary {
    let detail = doc.details.get(&raw.id);

    let home_id = pick(detail.and_then(|d| d.home_team_id.as_ref()), &raw.home_team_id);
    let away_id = pick(detail.and_then(|d| d.away_team_id.as_ref()), &raw.away_team_id);
    let competition_id = pick(
        detail.and_then(|d| d.competition_id.as_ref()),
        &raw.competition_id,
    );

    let status_id = resolve_status(raw, detail);

    MatchSummary {
        match_id: raw.id.clone(),
        status_id,
        status: status::describe(status_id),
        home: resolve_team(home_id, &doc.teams),
        away: resolve_team(away_id, &doc.teams),
        competition: resolve_competition(competition_id, &doc.competitions, &doc.countries),
        score: resolve_score(raw, detail),
        kickoff: raw.kickoff(),
        odds: select_odds(
            doc.odds.get(&raw.id),
            &config.preferred_companies,
            &config.minute_window(),
        ),
        environment: detail
            .and_then(|d| d.environment.as_ref())
            .and_then(Environment::from_raw),
        events: detail.map(|d| d.events.clone()).unwrap_or_default(),
    }
}
