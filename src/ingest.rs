use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One raw listing as delivered by the external fetcher. Immutable; field
/// aliases match the fetcher's JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPosting {
    pub title: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default, alias = "location")]
    pub location_text: String,
    #[serde(default, alias = "salary")]
    pub salary_text: String,
    #[serde(default)]
    pub starting_date: String,
    #[serde(default)]
    pub published_date: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default, alias = "url")]
    pub source_url: String,
}

pub struct IngestResult {
    pub postings: Vec<RawPosting>,
    pub skipped: usize,
}

/// Read a fetched batch file. An unreadable or malformed file is fatal;
/// the fetcher's output is the run's only input.
pub fn load_batch(path: &Path) -> Result<Vec<RawPosting>> {
    let bytes = fs::read(path).with_context(|| format!("reading batch file {}", path.display()))?;
    let batch: Vec<RawPosting> =
        serde_json::from_slice(&bytes).with_context(|| format!("parsing batch file {}", path.display()))?;
    Ok(batch)
}

/// Scrub placeholder values and drop structurally invalid records. A record
/// without a title cannot be fingerprinted and is skipped, not retried.
pub fn validate(batch: Vec<RawPosting>) -> IngestResult {
    let total = batch.len();
    let postings: Vec<RawPosting> = batch
        .into_iter()
        .map(scrub_posting)
        .filter(|p| {
            if p.title.is_empty() {
                warn!(url = %p.source_url, "skipping record without a title");
                return false;
            }
            true
        })
        .collect();
    let skipped = total - postings.len();
    IngestResult { postings, skipped }
}

fn scrub_posting(mut p: RawPosting) -> RawPosting {
    p.title = scrub(&p.title);
    p.organization = scrub(&p.organization);
    p.location_text = scrub(&p.location_text);
    p.salary_text = scrub(&p.salary_text);
    p.starting_date = scrub(&p.starting_date);
    p.published_date = scrub(&p.published_date);
    p.tags = scrub(&p.tags);
    p.source_url = p.source_url.trim().to_string();
    p
}

// The board renders missing fields as "N/A"; treat them as absent.
fn scrub(s: &str) -> String {
    let t = s.trim();
    if t.eq_ignore_ascii_case("n/a") {
        String::new()
    } else {
        t.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_fetcher_field_names() {
        let json = r#"[{
            "title": "MS Assistantship",
            "organization": "State University",
            "location": "Lincoln, Nebraska",
            "salary": "$30,000",
            "starting_date": "2025-08-01",
            "published_date": "06/20/2025",
            "tags": "Graduate Opportunities",
            "url": "https://jobs.example.org/view/123"
        }]"#;
        let batch: Vec<RawPosting> = serde_json::from_str(json).unwrap();
        assert_eq!(batch[0].location_text, "Lincoln, Nebraska");
        assert_eq!(batch[0].salary_text, "$30,000");
        assert_eq!(batch[0].source_url, "https://jobs.example.org/view/123");
    }

    #[test]
    fn missing_optional_fields_default_empty() {
        let json = r#"[{"title": "Only a title"}]"#;
        let batch: Vec<RawPosting> = serde_json::from_str(json).unwrap();
        assert_eq!(batch[0].organization, "");
        assert_eq!(batch[0].tags, "");
    }

    #[test]
    fn na_placeholders_scrubbed() {
        let result = validate(vec![RawPosting {
            title: "  A title  ".into(),
            organization: "N/A".into(),
            location_text: "n/a".into(),
            salary_text: "N/A".into(),
            starting_date: String::new(),
            published_date: String::new(),
            tags: "N/A".into(),
            source_url: String::new(),
        }]);
        let p = &result.postings[0];
        assert_eq!(p.title, "A title");
        assert_eq!(p.organization, "");
        assert_eq!(p.tags, "");
        assert_eq!(result.skipped, 0);
    }

    #[test]
    fn titleless_records_skipped_and_counted() {
        let ok = RawPosting {
            title: "Real".into(),
            organization: String::new(),
            location_text: String::new(),
            salary_text: String::new(),
            starting_date: String::new(),
            published_date: String::new(),
            tags: String::new(),
            source_url: String::new(),
        };
        let mut bad = ok.clone();
        bad.title = "   ".into();
        let result = validate(vec![ok, bad]);
        assert_eq!(result.postings.len(), 1);
        assert_eq!(result.skipped, 1);
    }
}
