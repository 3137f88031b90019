//! Match status codes as reported by the feed.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchStatus {
    Abnormal,
    NotStarted,
    FirstHalf,
    HalfTime,
    SecondHalf,
    Overtime,
    OvertimeDeprecated,
    PenaltyShootout,
    End,
    Delay,
    Interrupt,
    CutInHalf,
    Cancel,
    ToBeDetermined,
}

impl MatchStatus {
    /// Statuses shown by the presentation stage, in display priority order.
    pub const IN_PLAY: [MatchStatus; 6] = [
        MatchStatus::FirstHalf,
        MatchStatus::HalfTime,
        MatchStatus::SecondHalf,
        MatchStatus::Overtime,
        MatchStatus::OvertimeDeprecated,
        MatchStatus::PenaltyShootout,
    ];

    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            0 => Self::Abnormal,
            1 => Self::NotStarted,
            2 => Self::FirstHalf,
            3 => Self::HalfTime,
            4 => Self::SecondHalf,
            5 => Self::Overtime,
            6 => Self::OvertimeDeprecated,
            7 => Self::PenaltyShootout,
            8 => Self::End,
            9 => Self::Delay,
            10 => Self::Interrupt,
            11 => Self::CutInHalf,
            12 => Self::Cancel,
            13 => Self::ToBeDetermined,
            _ => return None,
        })
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Abnormal => "Abnormal (suggest hiding)",
            Self::NotStarted => "Not started",
            Self::FirstHalf => "First half",
            Self::HalfTime => "Half-time",
            Self::SecondHalf => "Second half",
            Self::Overtime => "Overtime",
            Self::OvertimeDeprecated => "Overtime (deprecated)",
            Self::PenaltyShootout => "Penalty Shoot-out",
            Self::End => "End",
            Self::Delay => "Delay",
            Self::Interrupt => "Interrupt",
            Self::CutInHalf => "Cut in half",
            Self::Cancel => "Cancel",
            Self::ToBeDetermined => "To be determined",
        }
    }

    pub fn is_in_play(self) -> bool {
        Self::IN_PLAY.contains(&self)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Description for a raw code, `"Unknown (n)"` outside 0..=13.
pub fn describe(code: u32) -> String {
    MatchStatus::from_code(code)
        .map(|s| s.description().to_string())
        .unwrap_or_else(|| format!("Unknown ({code})"))
}

pub fn is_in_play(code: u32) -> bool {
    MatchStatus::from_code(code).is_some_and(MatchStatus::is_in_play)
}

/// Sort key within a competition group; anything outside the in-play set sorts last.
pub fn in_play_priority(code: u32) -> usize {
    MatchStatus::from_code(code)
        .and_then(|s| MatchStatus::IN_PLAY.iter().position(|p| *p == s))
        .unwrap_or(MatchStatus::IN_PLAY.len())
}
