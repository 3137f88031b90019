//! Betting-company selection and early-minute odds filtering.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::feed::models::{CompanyOdds, Market, RawOddsEntry};
use crate::feed::OddsByCompany;
use crate::merge::convert::american_slots;

/// Known betting company ids and display names.
pub const BETTING_COMPANIES: &[(&str, &str)] = &[
    ("2", "BET365"),
    ("3", "Crown"),
    ("4", "10BET"),
    ("5", "Ladbrokes"),
    ("6", "Mansion88"),
    ("7", "Macauslot"),
    ("8", "SNAI"),
    ("9", "William Hill"),
    ("10", "Easybets"),
    ("11", "Vcbet"),
    ("12", "EuroBet"),
    ("13", "Interwetten"),
    ("14", "12bet"),
    ("15", "Sbobet"),
    ("16", "Wewbet"),
    ("17", "18Bet"),
    ("18", "Fun88"),
    ("21", "188bet"),
    ("22", "Pinnacle"),
];

pub fn company_name(company_id: &str) -> String {
    BETTING_COMPANIES
        .iter()
        .find(|(id, _)| *id == company_id)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| format!("Company {company_id}"))
}

/// Corners alone do not qualify a company.
fn has_market_data(odds: &CompanyOdds) -> bool {
    [Market::MoneyLine, Market::Spread, Market::OverUnder]
        .iter()
        .any(|market| !odds.market(*market).is_empty())
}

/// First company in `preference` order with any money-line, spread or
/// over/under data. No scoring; list order is the only tie-break.
pub fn select_company<'a>(
    odds: &'a OddsByCompany,
    preference: &[String],
) -> Option<(&'a str, &'a CompanyOdds)> {
    preference.iter().find_map(|wanted| {
        odds.get_key_value(wanted.as_str())
            .filter(|(_, company)| has_market_data(company))
            .map(|(id, company)| (id.as_str(), company))
    })
}

/// At most one entry per minute inside `window`, the one with the highest
/// timestamp, in ascending minute order.
///
/// Entries whose minute or timestamp is not numeric are dropped. Equal
/// timestamps resolve to the later entry in input order.
pub fn filter_by_minute<'a>(
    entries: &'a [RawOddsEntry],
    window: &RangeInclusive<u32>,
) -> Vec<&'a RawOddsEntry> {
    let mut latest: BTreeMap<u32, (i64, &RawOddsEntry)> = BTreeMap::new();

    for entry in entries {
        let (Some(minute), Some(timestamp)) = (entry.minute(), entry.timestamp()) else {
            continue;
        };
        if !window.contains(&minute) {
            continue;
        }
        match latest.get(&minute) {
            Some((best, _)) if *best > timestamp => {}
            _ => {
                latest.insert(minute, (timestamp, entry));
            }
        }
    }

    latest.into_values().map(|(_, entry)| entry).collect()
}

/// One retained quote with its American rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsQuote {
    pub timestamp: i64,
    pub minute: u32,
    /// Native 8-slot array as received.
    pub raw: Vec<Value>,
    /// Slots 2..=4 in American format; see [`american_slots`].
    pub american: [Value; 3],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketOdds {
    pub entries: Vec<OddsQuote>,
}

impl MarketOdds {
    pub fn from_filtered(entries: &[&RawOddsEntry], market: Market) -> Self {
        let entries = entries
            .iter()
            .filter_map(|entry| {
                Some(OddsQuote {
                    timestamp: entry.timestamp()?,
                    minute: entry.minute()?,
                    raw: entry.0.clone(),
                    american: american_slots(entry, market),
                })
            })
            .collect();
        Self { entries }
    }

    /// Quote from the latest minute in the window.
    pub fn latest(&self) -> Option<&OddsQuote> {
        self.entries.last()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The single company chosen for a match, with its four filtered markets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectedOdds {
    pub company_id: Option<String>,
    pub company_name: Option<String>,
    pub money_line: MarketOdds,
    pub spread: MarketOdds,
    pub over_under: MarketOdds,
    pub corners: MarketOdds,
}

impl SelectedOdds {
    pub fn market(&self, market: Market) -> &MarketOdds {
        match market {
            Market::MoneyLine => &self.money_line,
            Market::Spread => &self.spread,
            Market::OverUnder => &self.over_under,
            Market::Corners => &self.corners,
        }
    }

    pub fn has_company(&self) -> bool {
        self.company_id.is_some()
    }
}

/// Select one company and reduce each of its markets to the minute window.
///
/// A match with no qualifying company gets empty markets and no company.
pub fn select_odds(
    odds: Option<&OddsByCompany>,
    preference: &[String],
    window: &RangeInclusive<u32>,
) -> SelectedOdds {
    let Some((company_id, company)) = odds.and_then(|o| select_company(o, preference)) else {
        return SelectedOdds::default();
    };

    let filtered = |market: Market| {
        MarketOdds::from_filtered(&filter_by_minute(company.market(market), window), market)
    };

    SelectedOdds {
        company_id: Some(company_id.to_string()),
        company_name: Some(company_name(company_id)),
        money_line: filtered(Market::MoneyLine),
        spread: filtered(Market::Spread),
        over_under: filtered(Market::OverUnder),
        corners: filtered(Market::Corners),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(timestamp: i64, minute: Value) -> RawOddsEntry {
        RawOddsEntry(vec![
            json!(timestamp),
            minute,
            json!(1.9),
            json!(3.2),
            json!(4.1),
            json!(2),
            json!(0),
            json!("0-0"),
        ])
    }

    fn preference() -> Vec<String> {
        ["2", "3", "4"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_keeps_window_bounds() {
        let entries: Vec<RawOddsEntry> = (0..=8).map(|m| entry(100 + m, json!(m.to_string()))).collect();
        let kept: Vec<u32> = filter_by_minute(&entries, &(2..=6))
            .iter()
            .filter_map(|e| e.minute())
            .collect();
        assert_eq!(kept, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_filter_latest_timestamp_wins() {
        let entries = vec![
            entry(300, json!("4")),
            entry(500, json!("4")),
            entry(400, json!("4")),
            entry(200, json!("3")),
        ];
        let kept = filter_by_minute(&entries, &(2..=6));
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].timestamp(), Some(200));
        assert_eq!(kept[1].timestamp(), Some(500));
    }

    #[test]
    fn test_filter_drops_unparseable_minutes() {
        let entries = vec![
            entry(100, json!("")),
            entry(101, json!("HT")),
            entry(102, json!(null)),
            entry(103, json!(5)),
        ];
        let kept = filter_by_minute(&entries, &(2..=6));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].minute(), Some(5));
    }

    #[test]
    fn test_filter_unsorted_input_sorted_output() {
        let entries = vec![entry(10, json!("6")), entry(11, json!("2")), entry(12, json!("4"))];
        let minutes: Vec<u32> = filter_by_minute(&entries, &(2..=6))
            .iter()
            .filter_map(|e| e.minute())
            .collect();
        assert_eq!(minutes, vec![2, 4, 6]);
    }

    #[test]
    fn test_select_company_prefers_list_order() {
        let odds: OddsByCompany = serde_json::from_value(json!({
            "4": {"eu": [[1, "3", 1.5, 3.0, 5.0, 2, 0, "0-0"]]},
            "3": {"asia": [[1, "3", 0.9, 0.5, 0.9, 2, 0, "0-0"]]}
        }))
        .unwrap();
        let (id, _) = select_company(&odds, &preference()).unwrap();
        assert_eq!(id, "3");
    }

    #[test]
    fn test_select_company_skips_empty_and_corners_only() {
        let odds: OddsByCompany = serde_json::from_value(json!({
            "2": {"eu": [], "asia": [], "bs": [], "cr": [[1, "3", 0.9, 9.5, 0.9, 2, 0, "1-0"]]},
            "4": {"bs": [[1, "3", 0.9, 2.5, 0.9, 2, 0, "0-0"]]}
        }))
        .unwrap();
        let (id, _) = select_company(&odds, &preference()).unwrap();
        assert_eq!(id, "4");
    }

    #[test]
    fn test_select_company_ignores_unlisted() {
        let odds: OddsByCompany = serde_json::from_value(json!({
            "99": {"eu": [[1, "3", 1.5, 3.0, 5.0, 2, 0, "0-0"]]}
        }))
        .unwrap();
        assert!(select_company(&odds, &preference()).is_none());
    }

    #[test]
    fn test_select_odds_without_data() {
        let selected = select_odds(None, &preference(), &(2..=6));
        assert_eq!(selected, SelectedOdds::default());
        assert!(!selected.has_company());
        assert!(Market::ALL.iter().all(|m| selected.market(*m).is_empty()));
    }

    #[test]
    fn test_select_odds_filters_every_market() {
        let odds: OddsByCompany = serde_json::from_value(json!({
            "2": {
                "eu": [[100, "1", 1.5, 3.0, 5.0, 2, 0, "0-0"], [200, "3", 1.66, 3.4, 6.0, 2, 0, "0-0"]],
                "cr": [[150, "4", 0.9, 9.5, 0.9, 2, 0, "1-0"], [160, "7", 0.9, 9.5, 0.9, 2, 0, "1-0"]]
            }
        }))
        .unwrap();
        let selected = select_odds(Some(&odds), &preference(), &(2..=6));
        assert_eq!(selected.company_name.as_deref(), Some("BET365"));
        assert_eq!(selected.money_line.entries.len(), 1);
        assert_eq!(selected.money_line.entries[0].american[0], json!("-152"));
        assert_eq!(selected.corners.entries.len(), 1);
        assert_eq!(selected.corners.entries[0].minute, 4);
        assert!(selected.spread.is_empty());
    }

    #[test]
    fn test_company_name_fallback() {
        assert_eq!(company_name("22"), "Pinnacle");
        assert_eq!(company_name("77"), "Company 77");
    }
}
