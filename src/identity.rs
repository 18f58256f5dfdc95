use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::classify::ClassifiedPosting;
use crate::db::CanonicalRow;

/// Outcome of matching one posting against the store snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    New,
    Updated,
    Unchanged,
}

/// Deterministic identity of one real-world posting across runs.
///
/// Hashes the lower-cased, whitespace-collapsed title, organization, and
/// location text. Exact-match only; near-duplicates with typo-level drift
/// hash differently and become distinct records.
pub fn fingerprint(title: &str, organization: &str, location_text: &str) -> String {
    let key = format!("{}|{}|{}", canon(title), canon(organization), canon(location_text));
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

fn canon(s: &str) -> String {
    s.to_lowercase()
        .replace(['\u{2013}', '\u{2014}'], "-")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decide New/Updated/Unchanged for a classified posting against the
/// snapshot taken at the start of the run.
pub fn resolve(
    posting: &ClassifiedPosting,
    snapshot: &HashMap<String, CanonicalRow>,
) -> (String, Resolution) {
    let raw = &posting.norm.raw;
    let fp = fingerprint(&raw.title, &raw.organization, &raw.location_text);

    let resolution = match snapshot.get(&fp) {
        None => Resolution::New,
        Some(stored) if differs(raw, stored) => Resolution::Updated,
        Some(_) => Resolution::Unchanged,
    };
    (fp, resolution)
}

// Comparison fields: anything the board may edit in place without changing
// the posting's identity.
fn differs(raw: &crate::ingest::RawPosting, stored: &CanonicalRow) -> bool {
    raw.salary_text != stored.salary_text
        || raw.tags != stored.tags
        || raw.starting_date != stored.starting_date
        || raw.published_date != stored.published_date
        || raw.source_url != stored.source_url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_and_whitespace_invariant() {
        let a = fingerprint("PhD Assistant ", "State University", "Lincoln, Nebraska");
        let b = fingerprint("phd assistant", "state  university", " lincoln, nebraska");
        assert_eq!(a, b);
    }

    #[test]
    fn dash_variants_fold_together() {
        let a = fingerprint("MS Assistantship \u{2013} Deer", "U", "NE");
        let b = fingerprint("MS Assistantship - Deer", "U", "NE");
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_titles_hash_differently() {
        let a = fingerprint("PhD Assistantship", "U", "NE");
        let b = fingerprint("MS Assistantship", "U", "NE");
        assert_ne!(a, b);
    }

    #[test]
    fn organization_and_location_are_part_of_identity() {
        let base = fingerprint("Title", "Org A", "Austin, TX");
        assert_ne!(base, fingerprint("Title", "Org B", "Austin, TX"));
        assert_ne!(base, fingerprint("Title", "Org A", "Laramie, WY"));
    }

    #[test]
    fn fingerprint_is_stable_hex() {
        let fp = fingerprint("Title", "Org", "Loc");
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(fp, fingerprint("Title", "Org", "Loc"));
    }
}
