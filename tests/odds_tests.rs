//! Odds filter and conversion properties not covered by the unit tests in
//! src/merge/odds.rs and src/merge/convert.rs.

use std::collections::HashSet;

use live_odds_pipeline::feed::models::RawOddsEntry;
use live_odds_pipeline::merge::convert::{decimal_to_american, hong_kong_to_american};
use live_odds_pipeline::merge::odds::filter_by_minute;

use rust_decimal_macros::dec;
use serde_json::json;

/// Deterministic spread of entries over minutes 0..=11 with colliding minutes.
fn noisy_entries() -> Vec<RawOddsEntry> {
    (0..60i64)
        .map(|i| {
            let minute = (i * 7) % 12;
            let timestamp = 1_700_000_000 + (i * 37) % 23;
            RawOddsEntry(vec![
                json!(timestamp),
                json!(minute.to_string()),
                json!(1.9),
                json!(3.1),
                json!(4.2),
                json!(2),
                json!(0),
                json!("0-0"),
            ])
        })
        .collect()
}

#[test]
fn filtered_minutes_stay_in_window_and_unique() {
    let entries = noisy_entries();
    let kept = filter_by_minute(&entries, &(2..=6));

    let minutes: Vec<u32> = kept.iter().filter_map(|e| e.minute()).collect();
    assert!(minutes.iter().all(|m| (2..=6).contains(m)));
    let unique: HashSet<u32> = minutes.iter().copied().collect();
    assert_eq!(unique.len(), minutes.len());
    assert_eq!(minutes, vec![2, 3, 4, 5, 6]);
}

#[test]
fn retained_entry_has_max_timestamp_of_its_minute() {
    let entries = noisy_entries();
    for kept in filter_by_minute(&entries, &(2..=6)) {
        let minute = kept.minute();
        let max = entries
            .iter()
            .filter(|e| e.minute() == minute)
            .filter_map(|e| e.timestamp())
            .max();
        assert_eq!(kept.timestamp(), max);
    }
}

#[test]
fn filtering_is_idempotent() {
    let entries = noisy_entries();
    let once: Vec<RawOddsEntry> = filter_by_minute(&entries, &(2..=6))
        .into_iter()
        .cloned()
        .collect();
    let twice: Vec<RawOddsEntry> = filter_by_minute(&once, &(2..=6))
        .into_iter()
        .cloned()
        .collect();
    assert_eq!(once, twice);
}

#[test]
fn equal_timestamps_keep_later_entry() {
    let entries = vec![
        RawOddsEntry(vec![json!(100), json!("3"), json!(1.5)]),
        RawOddsEntry(vec![json!(100), json!("3"), json!(2.5)]),
    ];
    let kept = filter_by_minute(&entries, &(2..=6));
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].slot(2), Some(&json!(2.5)));
}

#[test]
fn entries_without_timestamp_are_dropped() {
    let entries = vec![
        RawOddsEntry(vec![json!("soon"), json!("3"), json!(1.5)]),
        RawOddsEntry(vec![json!(null), json!("4"), json!(1.5)]),
    ];
    assert!(filter_by_minute(&entries, &(2..=6)).is_empty());
}

#[test]
fn conversion_boundaries() {
    assert_eq!(decimal_to_american(dec!(2.00)), Some(100));
    assert_eq!(decimal_to_american(dec!(1.50)), Some(-200));
    assert_eq!(decimal_to_american(dec!(1.00)), None);
    assert_eq!(hong_kong_to_american(dec!(1.50)), Some(150));
    assert_eq!(hong_kong_to_american(dec!(0.85)), Some(-118));
}

#[test]
fn conversion_rounds_half_to_even() {
    // (2.125 - 1) * 100 = 112.5
    assert_eq!(decimal_to_american(dec!(2.125)), Some(112));
    // 1.135 * 100 = 113.5
    assert_eq!(hong_kong_to_american(dec!(1.135)), Some(114));
}
