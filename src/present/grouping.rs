use std::collections::BTreeMap;

use crate::merge::MatchSummary;
use crate::present::country::infer_country;
use crate::status;

/// In-play matches of one competition, in display order.
#[derive(Debug, Clone)]
pub struct CompetitionGroup<'a> {
    pub competition: String,
    pub country: String,
    pub matches: Vec<&'a MatchSummary>,
}

pub fn filter_in_play(summaries: &[MatchSummary]) -> Vec<&MatchSummary> {
    summaries.iter().filter(|s| s.is_in_play()).collect()
}

fn country_for(summary: &MatchSummary) -> String {
    if summary.competition.has_country() {
        summary.competition.country.clone()
    } else {
        infer_country(
            &summary.competition.name,
            &summary.home.name,
            &summary.away.name,
        )
    }
}

/// Group by competition name. Groups are ordered by (country, name) and the
/// matches inside by status priority, then match id.
///
/// A group's country is taken from its first match.
pub fn group_by_competition<'a>(matches: &[&'a MatchSummary]) -> Vec<CompetitionGroup<'a>> {
    let mut by_name: BTreeMap<&str, Vec<&'a MatchSummary>> = BTreeMap::new();
    for &summary in matches {
        by_name
            .entry(summary.competition.name.as_str())
            .or_default()
            .push(summary);
    }

    let mut groups: Vec<CompetitionGroup<'a>> = by_name
        .into_iter()
        .map(|(name, mut members)| {
            members.sort_by(|a, b| {
                status::in_play_priority(a.status_id)
                    .cmp(&status::in_play_priority(b.status_id))
                    .then_with(|| a.match_id.cmp(&b.match_id))
            });
            let country = members
                .first()
                .map(|m| country_for(m))
                .unwrap_or_default();
            CompetitionGroup {
                competition: name.to_string(),
                country,
                matches: members,
            }
        })
        .collect();

    groups.sort_by(|a, b| {
        a.country
            .cmp(&b.country)
            .then_with(|| a.competition.cmp(&b.competition))
    });
    groups
}
