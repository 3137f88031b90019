//! Keyword-based country inference for competitions without a resolved country.
//!
//! Best-effort only: the structured country from the feed always wins.

/// Country display name and lowercase keywords found in team names.
const COUNTRY_KEYWORDS: &[(&str, &[&str])] = &[
    ("Australia", &["australia", "aussie", "socceroos", "matildas"]),
    ("Argentina", &["argentina", "boca", "river plate", "racing club"]),
    ("Brazil", &["brazil", "sao paulo", "flamengo", "corinthians", "palmeiras"]),
    ("England", &["england", "manchester", "liverpool", "chelsea", "arsenal", "tottenham"]),
    ("Spain", &["spain", "real madrid", "barcelona", "atletico", "sevilla", "valencia"]),
    ("Germany", &["germany", "bayern", "borussia", "schalke", "hamburg"]),
    ("France", &["france", "psg", "marseille", "lyon", "monaco", "saint-etienne"]),
    ("Italy", &["italy", "juventus", "inter", "milan", "roma", "napoli", "lazio"]),
    ("Netherlands", &["netherlands", "ajax", "psv", "feyenoord"]),
    ("Portugal", &["portugal", "porto", "benfica", "sporting"]),
    ("Mexico", &["mexico", "america", "guadalajara", "cruz azul", "pumas"]),
    ("USA", &["usa", "united states", "la galaxy", "seattle sounders", "new york"]),
    ("South Korea", &["korea", "seoul", "busan", "daegu"]),
    ("Japan", &["japan", "tokyo", "osaka", "yokohama", "kashima"]),
    ("China", &["china", "beijing", "shanghai", "guangzhou"]),
    ("Russia", &["russia", "moscow", "spartak", "cska", "dynamo", "zenit"]),
    ("Norway", &["norway", "oslo", "bergen"]),
    ("Czech Republic", &["czech", "praha", "prague", "brno"]),
    ("Austria", &["austria", "vienna", "salzburg"]),
];

pub const INTERNATIONAL: &str = "International";

/// Infer a country from the competition and team names.
///
/// For international friendlies, two teams from different countries give
/// `"International"`. Otherwise the first table entry matching either team
/// name wins. Falls back to `"Unknown"`.
pub fn infer_country(competition: &str, home: &str, away: &str) -> String {
    let competition = competition.to_lowercase();
    let home = home.to_lowercase();
    let away = away.to_lowercase();

    if competition.contains("international") && competition.contains("friendly") {
        match (country_of(&home), country_of(&away)) {
            (Some(h), Some(a)) if h != a => return INTERNATIONAL.to_string(),
            (Some(c), _) | (None, Some(c)) => return c.to_string(),
            (None, None) => {}
        }
    }

    country_of(&format!("{home} {away}"))
        .unwrap_or(crate::merge::resolver::UNKNOWN)
        .to_string()
}

fn country_of(text: &str) -> Option<&'static str> {
    COUNTRY_KEYWORDS
        .iter()
        .find(|(_, keywords)| contains_any(text, keywords))
        .map(|(country, _)| *country)
}

/// Check if text contains any of the given keywords.
fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}
