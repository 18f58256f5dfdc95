use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::classify::{self, exemplars::ExemplarSet, ClassifiedPosting};
use crate::db::{self, CanonicalRow, RunRow};
use crate::identity::{self, Resolution};
use crate::ingest::{self, RawPosting};
use crate::normalize::{self, ParseWarnings};
use crate::report;

/// What one run did, for the CLI and the runs table.
pub struct RunReport {
    pub run_id: String,
    pub received: usize,
    pub skipped: usize,
    pub new: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub superseded: usize,
    pub warnings: ParseWarnings,
    pub analytics_path: PathBuf,
    pub snapshot_path: PathBuf,
}

impl RunReport {
    pub fn print(&self) {
        println!(
            "Run {}: {} new, {} updated, {} unchanged ({} received, {} skipped, {} superseded in-batch).",
            self.run_id, self.new, self.updated, self.unchanged,
            self.received, self.skipped, self.superseded,
        );
        if self.warnings.salary + self.warnings.location > 0 {
            println!(
                "Parse warnings: {} salary, {} location.",
                self.warnings.salary, self.warnings.location
            );
        }
        println!("Analytics: {}", self.analytics_path.display());
        println!("Snapshot:  {}", self.snapshot_path.display());
    }
}

/// Execute one pipeline run over a fetched batch.
pub fn execute_run(
    conn: &Connection,
    raw: Vec<RawPosting>,
    exemplars: &ExemplarSet,
    data_dir: &Path,
) -> Result<RunReport> {
    execute_run_at(conn, raw, exemplars, data_dir, Utc::now())
}

/// Like [`execute_run`] with an explicit clock, so tests can replay runs.
///
/// Order matters: the exemplar set and store snapshot are checked before
/// anything else so a fatal condition aborts with the store untouched. All
/// resolution happens against that one snapshot; the store mutates only in
/// the single commit at the end.
pub fn execute_run_at(
    conn: &Connection,
    raw: Vec<RawPosting>,
    exemplars: &ExemplarSet,
    data_dir: &Path,
    now: DateTime<Utc>,
) -> Result<RunReport> {
    exemplars.validate()?;
    let snapshot = db::load_snapshot(conn)?;

    let run_id = now.format("%Y%m%d_%H%M%S").to_string();
    let now_ts = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    let received = raw.len();

    let ingest::IngestResult { postings, skipped } = ingest::validate(raw);
    info!(run_id = %run_id, received, skipped, "starting run");

    let pb = ProgressBar::new(postings.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut warnings = ParseWarnings::default();
    let normalized: Vec<_> = postings
        .into_iter()
        .map(|p| {
            pb.inc(1);
            normalize::normalize(p, &mut warnings)
        })
        .collect();
    pb.finish_and_clear();

    // One vectorizer fit for the whole batch keeps every score in the same
    // feature space.
    let classified = classify::classify_batch(exemplars, normalized);

    let mut resolved: HashMap<String, (CanonicalRow, Resolution)> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    let mut superseded = 0usize;

    for posting in classified {
        let (fp, resolution) = identity::resolve(&posting, &snapshot);
        let row = build_row(posting, &fp, resolution, &snapshot, &run_id, &now_ts);
        if resolved.insert(fp.clone(), (row, resolution)).is_some() {
            superseded += 1;
            warn!(fingerprint = %fp, "duplicate fingerprint in batch; later record supersedes earlier");
        } else {
            order.push(fp);
        }
    }

    let mut new = 0;
    let mut updated = 0;
    let mut unchanged = 0;
    for (_, resolution) in resolved.values() {
        match resolution {
            Resolution::New => new += 1,
            Resolution::Updated => updated += 1,
            Resolution::Unchanged => unchanged += 1,
        }
    }

    let rows: Vec<CanonicalRow> = order
        .iter()
        .map(|fp| resolved[fp].0.clone())
        .collect();

    let run_row = RunRow {
        run_id: run_id.clone(),
        started_at: now_ts.clone(),
        received,
        skipped,
        new_count: new,
        updated_count: updated,
        unchanged_count: unchanged,
        superseded,
        salary_warnings: warnings.salary,
        location_warnings: warnings.location,
    };
    db::commit_run(conn, &rows, &run_row)?;

    let all = db::fetch_all(conn)?;
    let analytics = report::build_analytics(&run_id, &now_ts, &all);
    let analytics_path = report::write_analytics(data_dir, &analytics)?;
    let snapshot_path = report::write_snapshot(data_dir, &run_id, &all)?;

    info!(
        run_id = %run_id,
        new, updated, unchanged, superseded,
        "run committed"
    );

    Ok(RunReport {
        run_id,
        received,
        skipped,
        new,
        updated,
        unchanged,
        superseded,
        warnings,
        analytics_path,
        snapshot_path,
    })
}

fn build_row(
    posting: ClassifiedPosting,
    fingerprint: &str,
    resolution: Resolution,
    snapshot: &HashMap<String, CanonicalRow>,
    run_id: &str,
    now_ts: &str,
) -> CanonicalRow {
    let stored = snapshot.get(fingerprint);
    let first_seen = stored.map_or_else(|| now_ts.to_string(), |s| s.first_seen.clone());
    let last_updated = match resolution {
        Resolution::Unchanged => stored.map_or_else(|| now_ts.to_string(), |s| s.last_updated.clone()),
        Resolution::New | Resolution::Updated => now_ts.to_string(),
    };

    let ClassifiedPosting { norm, discipline, discipline_confidence, is_graduate, position_confidence } =
        posting;
    let raw = norm.raw;

    CanonicalRow {
        fingerprint: fingerprint.to_string(),
        title: raw.title,
        organization: raw.organization,
        location_text: raw.location_text,
        salary_text: raw.salary_text,
        starting_date: raw.starting_date,
        published_date: raw.published_date,
        tags: raw.tags,
        source_url: raw.source_url,
        salary_min: norm.salary.map(|s| s.min),
        salary_max: norm.salary.map(|s| s.max),
        cost_index: norm.location.cost_index,
        salary_adjusted: norm.salary_adjusted,
        city: norm.location.city,
        state: norm.location.state,
        location_confidence: norm.location.confidence,
        discipline,
        discipline_confidence,
        is_graduate,
        position_confidence,
        first_seen,
        last_updated,
        last_run_id: run_id.to_string(),
    }
}
