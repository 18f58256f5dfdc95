//! Fixed directory of U.S. states and cities with cost-of-living indices.
//!
//! Indices are relative to the reference baseline (Lincoln, Nebraska = 1.0),
//! so an adjusted salary is directly comparable across postings.

/// Reference baseline locality: Lincoln, Nebraska.
pub const BASELINE_INDEX: f64 = 1.0;

/// (abbreviation, full name, cost-of-living index)
pub const STATES: &[(&str, &str, f64)] = &[
    ("AL", "Alabama", 0.88),
    ("AK", "Alaska", 1.18),
    ("AZ", "Arizona", 1.05),
    ("AR", "Arkansas", 0.86),
    ("CA", "California", 1.35),
    ("CO", "Colorado", 1.10),
    ("CT", "Connecticut", 1.16),
    ("DE", "Delaware", 1.03),
    ("FL", "Florida", 1.02),
    ("GA", "Georgia", 0.93),
    ("HI", "Hawaii", 1.42),
    ("ID", "Idaho", 0.97),
    ("IL", "Illinois", 1.02),
    ("IN", "Indiana", 0.91),
    ("IA", "Iowa", 0.90),
    ("KS", "Kansas", 0.89),
    ("KY", "Kentucky", 0.90),
    ("LA", "Louisiana", 0.91),
    ("ME", "Maine", 1.04),
    ("MD", "Maryland", 1.16),
    ("MA", "Massachusetts", 1.28),
    ("MI", "Michigan", 0.94),
    ("MN", "Minnesota", 1.00),
    ("MS", "Mississippi", 0.84),
    ("MO", "Missouri", 0.89),
    ("MT", "Montana", 0.98),
    ("NE", "Nebraska", 0.98),
    ("NV", "Nevada", 1.04),
    ("NH", "New Hampshire", 1.09),
    ("NJ", "New Jersey", 1.19),
    ("NM", "New Mexico", 0.93),
    ("NY", "New York", 1.25),
    ("NC", "North Carolina", 0.95),
    ("ND", "North Dakota", 0.92),
    ("OH", "Ohio", 0.91),
    ("OK", "Oklahoma", 0.87),
    ("OR", "Oregon", 1.12),
    ("PA", "Pennsylvania", 1.00),
    ("RI", "Rhode Island", 1.10),
    ("SC", "South Carolina", 0.93),
    ("SD", "South Dakota", 0.90),
    ("TN", "Tennessee", 0.92),
    ("TX", "Texas", 0.95),
    ("UT", "Utah", 1.01),
    ("VT", "Vermont", 1.06),
    ("VA", "Virginia", 1.04),
    ("WA", "Washington", 1.16),
    ("WV", "West Virginia", 0.85),
    ("WI", "Wisconsin", 0.95),
    ("WY", "Wyoming", 0.92),
];

/// (city, state abbreviation, cost-of-living index)
///
/// Weighted toward the college towns and field stations that dominate the
/// board; big metros included for the occasional agency posting.
pub const CITIES: &[(&str, &str, f64)] = &[
    ("Lincoln", "NE", 1.00),
    ("Omaha", "NE", 0.99),
    ("College Station", "TX", 0.93),
    ("Austin", "TX", 1.08),
    ("Houston", "TX", 0.98),
    ("San Antonio", "TX", 0.94),
    ("Lubbock", "TX", 0.88),
    ("El Paso", "TX", 0.87),
    ("Dallas", "TX", 1.02),
    ("Corpus Christi", "TX", 0.91),
    ("Kingsville", "TX", 0.86),
    ("Nacogdoches", "TX", 0.87),
    ("Davis", "CA", 1.28),
    ("Sacramento", "CA", 1.18),
    ("Los Angeles", "CA", 1.45),
    ("San Diego", "CA", 1.40),
    ("San Francisco", "CA", 1.70),
    ("Fresno", "CA", 1.08),
    ("Arcata", "CA", 1.15),
    ("Fort Collins", "CO", 1.12),
    ("Denver", "CO", 1.15),
    ("Gunnison", "CO", 1.05),
    ("Corvallis", "OR", 1.10),
    ("Portland", "OR", 1.18),
    ("Eugene", "OR", 1.08),
    ("Seattle", "WA", 1.32),
    ("Pullman", "WA", 0.97),
    ("Olympia", "WA", 1.12),
    ("Moscow", "ID", 0.95),
    ("Boise", "ID", 1.02),
    ("Pocatello", "ID", 0.90),
    ("Missoula", "MT", 1.00),
    ("Bozeman", "MT", 1.06),
    ("Helena", "MT", 0.96),
    ("Laramie", "WY", 0.92),
    ("Jackson", "WY", 1.20),
    ("Logan", "UT", 0.95),
    ("Salt Lake City", "UT", 1.05),
    ("Reno", "NV", 1.05),
    ("Flagstaff", "AZ", 1.06),
    ("Tucson", "AZ", 0.97),
    ("Las Cruces", "NM", 0.88),
    ("Albuquerque", "NM", 0.93),
    ("Fairbanks", "AK", 1.15),
    ("Anchorage", "AK", 1.22),
    ("Juneau", "AK", 1.20),
    ("Gainesville", "FL", 0.96),
    ("Tallahassee", "FL", 0.94),
    ("Orlando", "FL", 1.02),
    ("Miami", "FL", 1.18),
    ("Athens", "GA", 0.94),
    ("Atlanta", "GA", 1.02),
    ("Auburn", "AL", 0.90),
    ("Tuscaloosa", "AL", 0.89),
    ("Starkville", "MS", 0.84),
    ("Oxford", "MS", 0.86),
    ("Baton Rouge", "LA", 0.92),
    ("Lafayette", "LA", 0.89),
    ("Fayetteville", "AR", 0.88),
    ("Stillwater", "OK", 0.86),
    ("Norman", "OK", 0.88),
    ("Manhattan", "KS", 0.89),
    ("Lawrence", "KS", 0.91),
    ("Columbia", "MO", 0.90),
    ("Ames", "IA", 0.90),
    ("Iowa City", "IA", 0.92),
    ("St. Paul", "MN", 1.02),
    ("Minneapolis", "MN", 1.04),
    ("Duluth", "MN", 0.95),
    ("Madison", "WI", 1.00),
    ("Stevens Point", "WI", 0.91),
    ("East Lansing", "MI", 0.93),
    ("Ann Arbor", "MI", 1.04),
    ("Houghton", "MI", 0.88),
    ("Marquette", "MI", 0.90),
    ("Columbus", "OH", 0.95),
    ("West Lafayette", "IN", 0.90),
    ("Bloomington", "IN", 0.92),
    ("Lexington", "KY", 0.92),
    ("Knoxville", "TN", 0.93),
    ("Nashville", "TN", 1.00),
    ("Raleigh", "NC", 1.00),
    ("Clemson", "SC", 0.92),
    ("Blacksburg", "VA", 0.93),
    ("Morgantown", "WV", 0.86),
    ("State College", "PA", 0.96),
    ("Ithaca", "NY", 1.05),
    ("Syracuse", "NY", 0.96),
    ("Amherst", "MA", 1.15),
    ("Storrs", "CT", 1.10),
    ("New Brunswick", "NJ", 1.15),
    ("Durham", "NH", 1.08),
    ("Burlington", "VT", 1.10),
    ("Orono", "ME", 0.97),
    ("College Park", "MD", 1.15),
    ("Newark", "DE", 1.02),
    ("Brookings", "SD", 0.88),
    ("Fargo", "ND", 0.92),
    ("Honolulu", "HI", 1.50),
];

/// Look up a state by abbreviation or full name (case-insensitive).
/// Returns (abbreviation, cost index).
pub fn state_by_token(token: &str) -> Option<(&'static str, f64)> {
    let t = token.trim();
    if t.is_empty() {
        return None;
    }
    STATES
        .iter()
        .find(|(abbrev, name, _)| t.eq_ignore_ascii_case(abbrev) || t.eq_ignore_ascii_case(name))
        .map(|(abbrev, _, idx)| (*abbrev, *idx))
}

/// Exact city match within a state (case-insensitive).
pub fn city_in_state(city: &str, state_abbrev: &str) -> Option<(&'static str, f64)> {
    let c = city.trim();
    if c.is_empty() {
        return None;
    }
    CITIES
        .iter()
        .find(|(name, st, _)| c.eq_ignore_ascii_case(name) && st.eq_ignore_ascii_case(state_abbrev))
        .map(|(name, _, idx)| (*name, *idx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_fifty_states() {
        assert_eq!(STATES.len(), 50);
    }

    #[test]
    fn directory_covers_enough_cities() {
        assert!(CITIES.len() >= 70);
    }

    #[test]
    fn baseline_city_is_unity() {
        let (_, idx) = city_in_state("Lincoln", "NE").unwrap();
        assert_eq!(idx, BASELINE_INDEX);
    }

    #[test]
    fn state_lookup_by_name_and_abbrev() {
        assert_eq!(state_by_token("Texas"), Some(("TX", 0.95)));
        assert_eq!(state_by_token("tx"), Some(("TX", 0.95)));
        assert_eq!(state_by_token("Narnia"), None);
    }

    #[test]
    fn every_city_references_a_real_state() {
        for (city, st, idx) in CITIES {
            assert!(
                state_by_token(st).is_some(),
                "city {} references unknown state {}",
                city,
                st
            );
            assert!(*idx > 0.5 && *idx < 2.0);
        }
    }
}
