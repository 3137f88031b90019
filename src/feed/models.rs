//! Record types of the fetcher's document.
//!
//! The upstream API is loose about JSON types: ids and status codes arrive as
//! numbers or strings, optional blocks arrive as `{}`, `[]` or `null`. The
//! deserializers here absorb that so business logic only sees `String` ids and
//! `Option`s.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Normalize a JSON id (number or non-empty string) to its string form.
pub fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a non-negative integer from a JSON number or an integer string.
/// Whole floats such as `4.0` count as integers.
pub fn u32_from_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()).or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(f))
                .map(|f| f as u32)
        }),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// Read a JSON scalar as display text.
pub fn text_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn de_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let value = Value::deserialize(d)?;
    id_from_value(&value).ok_or_else(|| D::Error::custom(format!("invalid id: {value}")))
}

fn de_opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(id_from_value))
}

fn de_opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(u32_from_value))
}

fn de_opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(text_from_value))
}

/// Accept anything; keep it only if it is an object of the expected shape.
fn de_object<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(v @ Value::Object(_)) => serde_json::from_value(v).ok(),
        _ => None,
    })
}

fn de_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Value>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    })
}

fn de_entries<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<RawOddsEntry>, D::Error> {
    Ok(de_list(d)?
        .into_iter()
        .filter_map(|item| match item {
            Value::Array(slots) => Some(RawOddsEntry(slots)),
            _ => None,
        })
        .collect())
}

/// One element of the live-match list.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMatch {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    /// `[match_id, status, home_scores[], away_scores[], kickoff, reserved]`
    #[serde(default, deserialize_with = "de_list")]
    pub score: Vec<Value>,
    #[serde(default, deserialize_with = "de_opt_u32")]
    pub status_id: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub home_team_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub away_team_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub competition_id: Option<String>,
}

impl RawMatch {
    pub fn score_status(&self) -> Option<u32> {
        self.score.get(1).and_then(u32_from_value)
    }

    pub fn home_sub_scores(&self) -> &[Value] {
        sub_scores(self.score.get(2))
    }

    pub fn away_sub_scores(&self) -> &[Value] {
        sub_scores(self.score.get(3))
    }

    pub fn kickoff(&self) -> Option<i64> {
        self.score.get(4).and_then(Value::as_i64)
    }
}

fn sub_scores(slot: Option<&Value>) -> &[Value] {
    slot.and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

/// First element of a match-detail wrapper; authoritative for ids and status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailRecord {
    #[serde(default, deserialize_with = "de_opt_u32")]
    pub status_id: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub home_team_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub away_team_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub competition_id: Option<String>,
    #[serde(default, deserialize_with = "de_list")]
    pub home_scores: Vec<Value>,
    #[serde(default, deserialize_with = "de_list")]
    pub away_scores: Vec<Value>,
    #[serde(default, deserialize_with = "de_object")]
    pub environment: Option<RawEnvironment>,
    #[serde(default, deserialize_with = "de_list")]
    pub events: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEnvironment {
    #[serde(default, deserialize_with = "de_opt_text")]
    pub weather: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub temperature: Option<String>,
    #[serde(default, alias = "wind_speed", deserialize_with = "de_opt_text")]
    pub wind: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub humidity: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub pressure: Option<String>,
}

impl RawEnvironment {
    pub fn is_empty(&self) -> bool {
        self.weather.is_none()
            && self.temperature.is_none()
            && self.wind.is_none()
            && self.humidity.is_none()
            && self.pressure.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamRecord {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub short_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompetitionRecord {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub short_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub country_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRecord {
    pub id: String,
    pub name: String,
}

/// Odds market types, keyed in the feed as `eu`, `asia`, `bs`, `cr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Market {
    MoneyLine,
    Spread,
    OverUnder,
    Corners,
}

impl Market {
    pub const ALL: [Market; 4] = [
        Market::MoneyLine,
        Market::Spread,
        Market::OverUnder,
        Market::Corners,
    ];
}

/// One odds update: `[timestamp, minute, val1, val2, val3, status, sealed, score]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOddsEntry(pub Vec<Value>);

impl RawOddsEntry {
    pub fn timestamp(&self) -> Option<i64> {
        self.0.first().and_then(Value::as_i64)
    }

    /// Match minute; empty or non-numeric values yield `None`.
    pub fn minute(&self) -> Option<u32> {
        self.0.get(1).and_then(u32_from_value)
    }

    pub fn slot(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }
}

/// One company's odds, all four markets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyOdds {
    #[serde(default, deserialize_with = "de_entries")]
    pub eu: Vec<RawOddsEntry>,
    #[serde(default, deserialize_with = "de_entries")]
    pub asia: Vec<RawOddsEntry>,
    #[serde(default, deserialize_with = "de_entries")]
    pub bs: Vec<RawOddsEntry>,
    #[serde(default, deserialize_with = "de_entries")]
    pub cr: Vec<RawOddsEntry>,
}

impl CompanyOdds {
    pub fn market(&self, market: Market) -> &[RawOddsEntry] {
        match market {
            Market::MoneyLine => &self.eu,
            Market::Spread => &self.asia,
            Market::OverUnder => &self.bs,
            Market::Corners => &self.cr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ids_accept_numbers_and_strings() {
        let a: RawMatch = serde_json::from_value(json!({"id": 42, "home_team_id": "7"})).unwrap();
        let b: RawMatch = serde_json::from_value(json!({"id": "42", "home_team_id": 7})).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.home_team_id, b.home_team_id);
        assert_eq!(a.away_team_id, None);
    }

    #[test]
    fn test_match_without_id_is_rejected() {
        assert!(serde_json::from_value::<RawMatch>(json!({"uuid": "match_1"})).is_err());
        assert!(serde_json::from_value::<RawMatch>(json!({"id": ""})).is_err());
    }

    #[test]
    fn test_score_slots() {
        let m: RawMatch = serde_json::from_value(json!({
            "id": 1,
            "score": [1, 4, [2, 1, 0, 0], [0, 0, 1, 0], 1700000000, ""]
        }))
        .unwrap();
        assert_eq!(m.score_status(), Some(4));
        assert_eq!(m.home_sub_scores()[0], json!(2));
        assert_eq!(m.away_sub_scores()[1], json!(0));
        assert_eq!(m.kickoff(), Some(1700000000));
    }

    #[test]
    fn test_empty_environment_array_is_none() {
        let d: DetailRecord = serde_json::from_value(json!({"environment": []})).unwrap();
        assert!(d.environment.is_none());

        let d: DetailRecord = serde_json::from_value(json!({
            "environment": {"weather": 3, "temperature": "18°C"}
        }))
        .unwrap();
        let env = d.environment.unwrap();
        assert_eq!(env.weather.as_deref(), Some("3"));
        assert_eq!(env.temperature.as_deref(), Some("18°C"));
    }

    #[test]
    fn test_odds_entry_minute_parsing() {
        assert_eq!(RawOddsEntry(vec![json!(1), json!("4")]).minute(), Some(4));
        assert_eq!(RawOddsEntry(vec![json!(1), json!(5)]).minute(), Some(5));
        assert_eq!(RawOddsEntry(vec![json!(1), json!("")]).minute(), None);
        assert_eq!(RawOddsEntry(vec![json!(1), json!("HT")]).minute(), None);
        assert_eq!(RawOddsEntry(vec![json!(1), json!(-3)]).minute(), None);
        assert_eq!(RawOddsEntry(vec![json!(1), json!(4.0)]).minute(), Some(4));
        assert_eq!(RawOddsEntry(vec![json!(1), json!(4.5)]).minute(), None);
        assert_eq!(RawOddsEntry(vec![json!(1), json!(-2.0)]).minute(), None);
        assert_eq!(RawOddsEntry(vec![json!(1)]).minute(), None);
    }

    #[test]
    fn test_company_odds_skips_non_array_entries() {
        let odds: CompanyOdds = serde_json::from_value(json!({
            "eu": [[1, "2", 1.5, 3.0, 5.0, 2, 0, "0-0"], "garbage", null],
            "asia": null
        }))
        .unwrap();
        assert_eq!(odds.market(Market::MoneyLine).len(), 1);
        assert!(odds.market(Market::Spread).is_empty());
        assert!(odds.market(Market::Corners).is_empty());
    }
}
