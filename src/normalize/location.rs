use std::sync::LazyLock;

use regex::Regex;

use super::places;

static PAREN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^)]+)\)\s*$").unwrap());

pub const CITY_STATE_CONFIDENCE: f64 = 1.0;
pub const STATE_ONLY_CONFIDENCE: f64 = 0.7;

/// Outcome of matching free-text location against the places directory.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationMatch {
    pub city: Option<String>,
    pub state: Option<String>,
    pub confidence: f64,
    pub cost_index: Option<f64>,
}

impl LocationMatch {
    pub fn unmatched() -> Self {
        Self { city: None, state: None, confidence: 0.0, cost_index: None }
    }
}

/// Match location text against the city/state directory.
///
/// Accepts `City, State`, `Something (State)`, `Something (City, State)`,
/// a bare state name or abbreviation, or a trailing abbreviation token
/// (`Ames IA`). Exact city+state beats state-only; anything else is
/// unmatched with confidence 0. Remote postings carry no locality.
pub fn parse_location(text: &str) -> LocationMatch {
    let t = text.trim();
    if t.is_empty() || t.eq_ignore_ascii_case("n/a") || t.to_lowercase().contains("remote") {
        return LocationMatch::unmatched();
    }

    let (city_cand, state_cand) = split_candidates(t);

    let state = state_cand.as_deref().and_then(places::state_by_token);
    let Some((abbrev, state_idx)) = state else {
        return LocationMatch::unmatched();
    };

    if let Some(city) = city_cand {
        if let Some((name, city_idx)) = places::city_in_state(&city, abbrev) {
            return LocationMatch {
                city: Some(name.to_string()),
                state: Some(abbrev.to_string()),
                confidence: CITY_STATE_CONFIDENCE,
                cost_index: Some(city_idx),
            };
        }
    }

    LocationMatch {
        city: None,
        state: Some(abbrev.to_string()),
        confidence: STATE_ONLY_CONFIDENCE,
        cost_index: Some(state_idx),
    }
}

/// Adjust an annual salary to the reference baseline (Lincoln, Nebraska).
pub fn adjust_to_baseline(annual: f64, cost_index: f64) -> f64 {
    annual / cost_index * places::BASELINE_INDEX
}

fn split_candidates(text: &str) -> (Option<String>, Option<String>) {
    // Trailing parenthetical: "Auburn University (Alabama)" or "(Lincoln, Nebraska)"
    if let Some(caps) = PAREN_RE.captures(text) {
        let content = caps[1].trim();
        return match content.split_once(',') {
            Some((city, state)) => (some_trimmed(city), some_trimmed(state)),
            None => (None, some_trimmed(content)),
        };
    }

    let parts: Vec<&str> = text
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty() && !is_country(p))
        .collect();

    match parts.len() {
        0 => (None, None),
        1 => {
            // "Montana", "TX", or "Ames IA"
            let only = parts[0];
            if places::state_by_token(only).is_some() {
                return (None, Some(only.to_string()));
            }
            match only.rsplit_once(' ') {
                Some((city, last)) if last.len() == 2 => (some_trimmed(city), some_trimmed(last)),
                _ => (None, Some(only.to_string())),
            }
        }
        n => (some_trimmed(parts[n - 2]), some_trimmed(parts[n - 1])),
    }
}

fn some_trimmed(s: &str) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}

fn is_country(s: &str) -> bool {
    s.eq_ignore_ascii_case("usa") || s.eq_ignore_ascii_case("united states") || s.eq_ignore_ascii_case("us")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_and_state() {
        let m = parse_location("Lincoln, Nebraska");
        assert_eq!(m.city.as_deref(), Some("Lincoln"));
        assert_eq!(m.state.as_deref(), Some("NE"));
        assert_eq!(m.confidence, CITY_STATE_CONFIDENCE);
        assert_eq!(m.cost_index, Some(1.0));
    }

    #[test]
    fn city_and_abbreviation() {
        let m = parse_location("College Station, TX");
        assert_eq!(m.city.as_deref(), Some("College Station"));
        assert_eq!(m.cost_index, Some(0.93));
    }

    #[test]
    fn state_only() {
        let m = parse_location("Montana");
        assert_eq!(m.city, None);
        assert_eq!(m.state.as_deref(), Some("MT"));
        assert_eq!(m.confidence, STATE_ONLY_CONFIDENCE);
    }

    #[test]
    fn unknown_city_falls_back_to_state() {
        let m = parse_location("Tinytown, Texas");
        assert_eq!(m.city, None);
        assert_eq!(m.state.as_deref(), Some("TX"));
        assert_eq!(m.cost_index, Some(0.95));
    }

    #[test]
    fn parenthetical_state() {
        let m = parse_location("Auburn University (Alabama)");
        assert_eq!(m.state.as_deref(), Some("AL"));
        assert_eq!(m.confidence, STATE_ONLY_CONFIDENCE);
    }

    #[test]
    fn parenthetical_city_state() {
        let m = parse_location("Field Station (Laramie, Wyoming)");
        assert_eq!(m.city.as_deref(), Some("Laramie"));
        assert_eq!(m.state.as_deref(), Some("WY"));
    }

    #[test]
    fn trailing_abbreviation_without_comma() {
        let m = parse_location("Ames IA");
        assert_eq!(m.city.as_deref(), Some("Ames"));
        assert_eq!(m.state.as_deref(), Some("IA"));
    }

    #[test]
    fn trailing_country_ignored() {
        let m = parse_location("Fort Collins, Colorado, USA");
        assert_eq!(m.city.as_deref(), Some("Fort Collins"));
        assert_eq!(m.state.as_deref(), Some("CO"));
    }

    #[test]
    fn no_match_is_zero_confidence() {
        let m = parse_location("somewhere in the mountains");
        assert_eq!(m, LocationMatch::unmatched());
        assert_eq!(parse_location(""), LocationMatch::unmatched());
        assert_eq!(parse_location("Remote work allowed"), LocationMatch::unmatched());
    }

    #[test]
    fn baseline_adjustment() {
        // $30,000 at index 0.85 normalizes to ~$35,294 at the baseline
        let adjusted = adjust_to_baseline(30000.0, 0.85);
        assert!((adjusted - 35294.12).abs() < 0.01);
    }
}
