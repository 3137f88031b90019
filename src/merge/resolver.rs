//! Foreign-key resolution of team, competition and country ids.
//!
//! A miss is never an error: names fall back to [`UNKNOWN`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::feed::models::{CompetitionRecord, CountryRecord, TeamRecord};

pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSide {
    pub id: Option<String>,
    pub name: String,
    pub short_name: Option<String>,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionInfo {
    pub id: Option<String>,
    pub name: String,
    pub short_name: Option<String>,
    pub logo: Option<String>,
    pub country_id: Option<String>,
    pub country: String,
}

impl CompetitionInfo {
    /// Whether the country came from structured data rather than a fallback.
    pub fn has_country(&self) -> bool {
        !self.country.is_empty() && self.country != UNKNOWN
    }
}

pub fn resolve_team(id: Option<&str>, teams: &HashMap<String, TeamRecord>) -> TeamSide {
    let record = id.and_then(|id| teams.get(id));
    TeamSide {
        id: id.map(str::to_string),
        name: record
            .and_then(|t| t.name.clone())
            .unwrap_or_else(|| UNKNOWN.to_string()),
        short_name: record.and_then(|t| t.short_name.clone()),
        logo: record.and_then(|t| t.logo.clone()),
    }
}

pub fn resolve_competition(
    id: Option<&str>,
    competitions: &HashMap<String, CompetitionRecord>,
    countries: &HashMap<String, CountryRecord>,
) -> CompetitionInfo {
    let record = id.and_then(|id| competitions.get(id));
    let country_id = record.and_then(|c| c.country_id.clone());
    let country = country_id
        .as_deref()
        .and_then(|cid| countries.get(cid))
        .map(|c| c.name.clone())
        .unwrap_or_else(|| UNKNOWN.to_string());

    CompetitionInfo {
        id: id.map(str::to_string),
        name: record
            .and_then(|c| c.name.clone())
            .unwrap_or_else(|| UNKNOWN.to_string()),
        short_name: record.and_then(|c| c.short_name.clone()),
        logo: record.and_then(|c| c.logo.clone()),
        country_id,
        country,
    }
}
