//! Validated parse of the fetcher's document (`step1.json`).
//!
//! Everything downstream works on [`FeedDocument`]; the raw JSON shapes the
//! fetcher has produced over time (wrapped or bare lists, `results` vs
//! `result`, list or id-keyed countries) are normalized here once.

use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::FeedError;
use crate::feed::models::{
    id_from_value, text_from_value, CompanyOdds, CompetitionRecord, CountryRecord, DetailRecord,
    RawMatch, TeamRecord,
};

/// Company id → that company's odds for one match.
pub type OddsByCompany = HashMap<String, CompanyOdds>;

#[derive(Debug, Clone, Default)]
pub struct FeedDocument {
    pub fetched_at: Option<String>,
    /// Set when the fetcher substituted synthetic data for the live list.
    pub is_mock: bool,
    pub matches: Vec<RawMatch>,
    pub details: HashMap<String, DetailRecord>,
    pub odds: HashMap<String, OddsByCompany>,
    pub teams: HashMap<String, TeamRecord>,
    pub competitions: HashMap<String, CompetitionRecord>,
    pub countries: HashMap<String, CountryRecord>,
}

impl FeedDocument {
    pub fn load(path: &Path) -> Result<Self, FeedError> {
        let contents = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                FeedError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                FeedError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let root: Value = serde_json::from_str(&contents).map_err(|source| FeedError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        if !root.is_object() {
            return Err(FeedError::NotAnObject {
                path: path.to_path_buf(),
            });
        }

        Ok(Self::from_value(&root))
    }

    /// Normalize a parsed document. Malformed records are logged and skipped.
    pub fn from_value(root: &Value) -> Self {
        let live = root.get("live_matches").unwrap_or(&Value::Null);
        let is_mock = live.get("_mock").and_then(Value::as_bool).unwrap_or(false);
        if is_mock {
            warn!("Feed live list is synthetic mock data");
        }

        let matches = list_body(live)
            .iter()
            .filter_map(|item| parse_record::<RawMatch>("live_match", "-", item))
            .collect();

        let doc = Self {
            fetched_at: root.get("timestamp").and_then(text_from_value),
            is_mock,
            matches,
            details: keyed_first_records(root.get("match_details"), "match_detail"),
            odds: keyed_odds(root.get("match_odds")),
            teams: keyed_first_records(root.get("team_info"), "team"),
            competitions: keyed_first_records(root.get("competition_info"), "competition"),
            countries: parse_countries(root.get("countries").unwrap_or(&Value::Null)),
        };

        debug!(
            matches = doc.matches.len(),
            details = doc.details.len(),
            odds = doc.odds.len(),
            teams = doc.teams.len(),
            competitions = doc.competitions.len(),
            countries = doc.countries.len(),
            "Feed document normalized"
        );

        doc
    }
}

/// `results` (or legacy `result`) of an API wrapper.
fn results_of(wrapper: &Value) -> Option<&Value> {
    wrapper.get("results").or_else(|| wrapper.get("result"))
}

/// Items of a `{results: [...]}` wrapper or of a bare list.
fn list_body(value: &Value) -> &[Value] {
    let body = results_of(value).unwrap_or(value);
    body.as_array().map(Vec::as_slice).unwrap_or(&[])
}

fn parse_record<T: DeserializeOwned>(kind: &str, key: &str, value: &Value) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(kind, key, error = %e, "Skipping malformed feed record");
            None
        }
    }
}

/// `{id: {results: [record, ...]}}` → `{id: record}` using the first result.
fn keyed_first_records<T: DeserializeOwned>(
    section: Option<&Value>,
    kind: &str,
) -> HashMap<String, T> {
    let Some(map) = section.and_then(Value::as_object) else {
        return HashMap::new();
    };

    map.iter()
        .filter_map(|(key, wrapper)| {
            let first = match results_of(wrapper)? {
                Value::Array(items) => items.first()?,
                obj @ Value::Object(_) => obj,
                _ => return None,
            };
            parse_record::<T>(kind, key, first).map(|record| (key.clone(), record))
        })
        .collect()
}

/// `{match_id: {results: {company_id: {eu, asia, bs, cr}}}}`.
fn keyed_odds(section: Option<&Value>) -> HashMap<String, OddsByCompany> {
    let Some(map) = section.and_then(Value::as_object) else {
        return HashMap::new();
    };

    map.iter()
        .filter_map(|(match_id, wrapper)| {
            let companies = results_of(wrapper)?.as_object()?;
            let parsed: OddsByCompany = companies
                .iter()
                .filter_map(|(company_id, odds)| {
                    parse_record::<CompanyOdds>("odds", company_id, odds)
                        .map(|o| (company_id.clone(), o))
                })
                .collect();
            Some((match_id.clone(), parsed))
        })
        .collect()
}

/// Accepts a wrapped or bare list of `{id, name}`, or an id-keyed map of them.
fn parse_countries(value: &Value) -> HashMap<String, CountryRecord> {
    let body = results_of(value).unwrap_or(value);

    let entries: Vec<(Option<&str>, &Value)> = match body {
        Value::Array(items) => items.iter().map(|item| (None, item)).collect(),
        Value::Object(map) => map.iter().map(|(k, v)| (Some(k.as_str()), v)).collect(),
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|(key, item)| {
            // Non-object members of a wrapper (`code`, `query`) are not countries
            let obj = item.as_object()?;
            let id = obj
                .get("id")
                .and_then(id_from_value)
                .or_else(|| key.map(str::to_string))?;
            let name = obj.get("name").and_then(text_from_value)?;
            Some((id.clone(), CountryRecord { id, name }))
        })
        .collect()
}
