//! Odds-format conversion to American odds.
//!
//! Money-line quotes use decimal odds (stake included, >= 1.00); spread,
//! over/under and corners quotes use Hong Kong odds (profit per unit staked).
//! All arithmetic is done in `Decimal` so that `1.66` stays `1.66`.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use crate::feed::models::{Market, RawOddsEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OddsFormat {
    Decimal,
    HongKong,
}

impl OddsFormat {
    pub fn of(market: Market) -> Self {
        match market {
            Market::MoneyLine => Self::Decimal,
            Market::Spread | Market::OverUnder | Market::Corners => Self::HongKong,
        }
    }

    pub fn to_american(self, odds: Decimal) -> Option<i64> {
        match self {
            Self::Decimal => decimal_to_american(odds),
            Self::HongKong => hong_kong_to_american(odds),
        }
    }
}

/// `d >= 2.00` → `+(d-1)*100`; `1.00 < d < 2.00` → `-100/(d-1)`; otherwise invalid.
pub fn decimal_to_american(d: Decimal) -> Option<i64> {
    if d >= dec!(2) {
        round_whole((d - Decimal::ONE).checked_mul(dec!(100))?)
    } else if d > Decimal::ONE {
        round_whole(dec!(-100).checked_div(d - Decimal::ONE)?)
    } else {
        None
    }
}

/// `h >= 1.00` → `+h*100`; `0 < h < 1.00` → `-100/h`; otherwise invalid.
pub fn hong_kong_to_american(h: Decimal) -> Option<i64> {
    if h >= Decimal::ONE {
        round_whole(h.checked_mul(dec!(100))?)
    } else if h > Decimal::ZERO {
        round_whole(dec!(-100).checked_div(h)?)
    } else {
        None
    }
}

// Half-to-even, same as the rounding the history files were produced with.
fn round_whole(value: Decimal) -> Option<i64> {
    value.round().to_i64()
}

/// Render with an explicit sign: `+240`, `-152`.
pub fn format_american(value: i64) -> String {
    if value > 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

/// Parse an odds slot through its decimal text (JSON number or numeric string).
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// American rendering of slots 2..=4 of one quote.
///
/// For Hong Kong markets the middle slot is the handicap or total line and is
/// passed through untouched. Invalid odds become `null`.
pub fn american_slots(entry: &RawOddsEntry, market: Market) -> [Value; 3] {
    let format = OddsFormat::of(market);
    let convert = |index: usize| -> Value {
        entry
            .slot(index)
            .and_then(decimal_from_value)
            .and_then(|odds| format.to_american(odds))
            .map(|american| Value::String(format_american(american)))
            .unwrap_or(Value::Null)
    };

    let middle = match format {
        OddsFormat::Decimal => convert(3),
        OddsFormat::HongKong => entry.slot(3).cloned().unwrap_or(Value::Null),
    };

    [convert(2), middle, convert(4)]
}
