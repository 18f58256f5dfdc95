use std::collections::HashMap;
use std::fs;

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;

const DATA_DIR: &str = "data";
const DB_PATH: &str = "data/grad_tracker.sqlite";

pub fn connect() -> Result<Connection> {
    fs::create_dir_all(DATA_DIR).context("creating data directory")?;
    let conn = Connection::open(DB_PATH)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

/// In-memory store for tests.
#[cfg(test)]
pub fn connect_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS canonical_postings (
            fingerprint           TEXT PRIMARY KEY,
            title                 TEXT NOT NULL,
            organization          TEXT NOT NULL DEFAULT '',
            location_text         TEXT NOT NULL DEFAULT '',
            salary_text           TEXT NOT NULL DEFAULT '',
            starting_date         TEXT NOT NULL DEFAULT '',
            published_date        TEXT NOT NULL DEFAULT '',
            tags                  TEXT NOT NULL DEFAULT '',
            source_url            TEXT NOT NULL DEFAULT '',
            salary_min            REAL,
            salary_max            REAL,
            cost_index            REAL,
            salary_adjusted       REAL,
            city                  TEXT,
            state                 TEXT,
            location_confidence   REAL NOT NULL DEFAULT 0,
            discipline            TEXT NOT NULL,
            discipline_confidence REAL NOT NULL,
            is_graduate           BOOLEAN NOT NULL,
            position_confidence   REAL NOT NULL,
            first_seen            TEXT NOT NULL,
            last_updated          TEXT NOT NULL,
            last_run_id           TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_postings_discipline ON canonical_postings(discipline);
        CREATE INDEX IF NOT EXISTS idx_postings_state ON canonical_postings(state);
        CREATE INDEX IF NOT EXISTS idx_postings_run ON canonical_postings(last_run_id);

        CREATE TABLE IF NOT EXISTS runs (
            run_id            TEXT PRIMARY KEY,
            started_at        TEXT NOT NULL,
            received          INTEGER NOT NULL,
            skipped           INTEGER NOT NULL,
            new_count         INTEGER NOT NULL,
            updated_count     INTEGER NOT NULL,
            unchanged_count   INTEGER NOT NULL,
            superseded        INTEGER NOT NULL,
            salary_warnings   INTEGER NOT NULL,
            location_warnings INTEGER NOT NULL
        );
        ",
    )?;
    Ok(())
}

/// One stored posting, keyed by fingerprint. Created on first sighting,
/// mutable fields overwritten on later sightings, never deleted.
#[derive(Debug, Clone, Serialize)]
pub struct CanonicalRow {
    pub fingerprint: String,
    pub title: String,
    pub organization: String,
    pub location_text: String,
    pub salary_text: String,
    pub starting_date: String,
    pub published_date: String,
    pub tags: String,
    pub source_url: String,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub cost_index: Option<f64>,
    pub salary_adjusted: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub location_confidence: f64,
    pub discipline: String,
    pub discipline_confidence: f64,
    pub is_graduate: bool,
    pub position_confidence: f64,
    pub first_seen: String,
    pub last_updated: String,
    pub last_run_id: String,
}

const ROW_COLUMNS: &str = "fingerprint, title, organization, location_text, salary_text,
    starting_date, published_date, tags, source_url, salary_min, salary_max,
    cost_index, salary_adjusted, city, state, location_confidence, discipline,
    discipline_confidence, is_graduate, position_confidence, first_seen,
    last_updated, last_run_id";

fn row_from_sql(row: &rusqlite::Row) -> rusqlite::Result<CanonicalRow> {
    Ok(CanonicalRow {
        fingerprint: row.get(0)?,
        title: row.get(1)?,
        organization: row.get(2)?,
        location_text: row.get(3)?,
        salary_text: row.get(4)?,
        starting_date: row.get(5)?,
        published_date: row.get(6)?,
        tags: row.get(7)?,
        source_url: row.get(8)?,
        salary_min: row.get(9)?,
        salary_max: row.get(10)?,
        cost_index: row.get(11)?,
        salary_adjusted: row.get(12)?,
        city: row.get(13)?,
        state: row.get(14)?,
        location_confidence: row.get(15)?,
        discipline: row.get(16)?,
        discipline_confidence: row.get(17)?,
        is_graduate: row.get(18)?,
        position_confidence: row.get(19)?,
        first_seen: row.get(20)?,
        last_updated: row.get(21)?,
        last_run_id: row.get(22)?,
    })
}

/// Read the full store as an immutable snapshot keyed by fingerprint.
/// A run resolves every record against this snapshot before any commit;
/// an unreadable store aborts the run here, before mutation.
pub fn load_snapshot(conn: &Connection) -> Result<HashMap<String, CanonicalRow>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {} FROM canonical_postings", ROW_COLUMNS))
        .context("historical store unreadable")?;
    let rows = stmt
        .query_map([], row_from_sql)
        .context("historical store unreadable")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("historical store unreadable")?;
    Ok(rows.into_iter().map(|r| (r.fingerprint.clone(), r)).collect())
}

#[derive(Debug, Clone)]
pub struct RunRow {
    pub run_id: String,
    pub started_at: String,
    pub received: usize,
    pub skipped: usize,
    pub new_count: usize,
    pub updated_count: usize,
    pub unchanged_count: usize,
    pub superseded: usize,
    pub salary_warnings: usize,
    pub location_warnings: usize,
}

/// Commit an entire run atomically: every resolved posting plus the run's
/// own record in one transaction.
pub fn commit_run(conn: &Connection, rows: &[CanonicalRow], run: &RunRow) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT OR REPLACE INTO canonical_postings ({})
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19,?20,?21,?22,?23)",
            ROW_COLUMNS
        ))?;
        for r in rows {
            stmt.execute(rusqlite::params![
                r.fingerprint,
                r.title,
                r.organization,
                r.location_text,
                r.salary_text,
                r.starting_date,
                r.published_date,
                r.tags,
                r.source_url,
                r.salary_min,
                r.salary_max,
                r.cost_index,
                r.salary_adjusted,
                r.city,
                r.state,
                r.location_confidence,
                r.discipline,
                r.discipline_confidence,
                r.is_graduate,
                r.position_confidence,
                r.first_seen,
                r.last_updated,
                r.last_run_id,
            ])?;
        }

        let mut run_stmt = tx.prepare(
            "INSERT INTO runs
             (run_id, started_at, received, skipped, new_count, updated_count,
              unchanged_count, superseded, salary_warnings, location_warnings)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
        )?;
        run_stmt.execute(rusqlite::params![
            run.run_id,
            run.started_at,
            run.received,
            run.skipped,
            run.new_count,
            run.updated_count,
            run.unchanged_count,
            run.superseded,
            run.salary_warnings,
            run.location_warnings,
        ])?;
    }
    tx.commit()?;
    Ok(())
}

/// Full store ordered by first sighting, for exports and snapshots.
pub fn fetch_all(conn: &Connection) -> Result<Vec<CanonicalRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM canonical_postings ORDER BY first_seen, fingerprint",
        ROW_COLUMNS
    ))?;
    let rows = stmt
        .query_map([], row_from_sql)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

// ── Overview ──

pub struct OverviewRow {
    pub title: String,
    pub organization: String,
    pub state: String,
    pub discipline: String,
    pub is_graduate: bool,
    pub salary_adjusted: Option<f64>,
    pub last_updated: String,
}

pub fn fetch_overview(
    conn: &Connection,
    discipline: Option<&str>,
    limit: usize,
) -> Result<Vec<OverviewRow>> {
    let mut conditions = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    if let Some(d) = discipline {
        conditions.push(format!("discipline = ?{}", params.len() + 1));
        params.push(Box::new(d.to_string()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        "SELECT title, organization, COALESCE(state,''), discipline, is_graduate,
                salary_adjusted, last_updated
         FROM canonical_postings{}
         ORDER BY last_updated DESC, fingerprint
         LIMIT {}",
        where_clause, limit
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt
        .query_map(param_refs.as_slice(), |row| {
            Ok(OverviewRow {
                title: row.get(0)?,
                organization: row.get(1)?,
                state: row.get(2)?,
                discipline: row.get(3)?,
                is_graduate: row.get(4)?,
                salary_adjusted: row.get(5)?,
                last_updated: row.get(6)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub postings: usize,
    pub graduate: usize,
    pub unclassified: usize,
    pub with_salary: usize,
    pub runs: usize,
    pub last_run: Option<String>,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let postings: usize =
        conn.query_row("SELECT COUNT(*) FROM canonical_postings", [], |r| r.get(0))?;
    let graduate: usize = conn.query_row(
        "SELECT COUNT(*) FROM canonical_postings WHERE is_graduate = 1",
        [],
        |r| r.get(0),
    )?;
    let unclassified: usize = conn.query_row(
        "SELECT COUNT(*) FROM canonical_postings WHERE discipline = 'Unclassified'",
        [],
        |r| r.get(0),
    )?;
    let with_salary: usize = conn.query_row(
        "SELECT COUNT(*) FROM canonical_postings WHERE salary_min IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    let runs: usize = conn.query_row("SELECT COUNT(*) FROM runs", [], |r| r.get(0))?;
    let last_run: Option<String> = conn
        .query_row("SELECT run_id FROM runs ORDER BY started_at DESC LIMIT 1", [], |r| r.get(0))
        .ok();
    Ok(Stats { postings, graduate, unclassified, with_salary, runs, last_run })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(fingerprint: &str, run_id: &str) -> CanonicalRow {
        CanonicalRow {
            fingerprint: fingerprint.into(),
            title: "MS Assistantship - Deer Ecology".into(),
            organization: "State University".into(),
            location_text: "Lincoln, Nebraska".into(),
            salary_text: "$30,000".into(),
            starting_date: "2025-08-01".into(),
            published_date: "06/20/2025".into(),
            tags: "Graduate Opportunities".into(),
            source_url: "https://jobs.example.org/view/1".into(),
            salary_min: Some(30000.0),
            salary_max: Some(30000.0),
            cost_index: Some(1.0),
            salary_adjusted: Some(30000.0),
            city: Some("Lincoln".into()),
            state: Some("NE".into()),
            location_confidence: 1.0,
            discipline: "Wildlife Ecology".into(),
            discipline_confidence: 0.4,
            is_graduate: true,
            position_confidence: 0.5,
            first_seen: "2025-06-20T00:00:00Z".into(),
            last_updated: "2025-06-20T00:00:00Z".into(),
            last_run_id: run_id.into(),
        }
    }

    fn sample_run(run_id: &str) -> RunRow {
        RunRow {
            run_id: run_id.into(),
            started_at: "2025-06-20T00:00:00Z".into(),
            received: 1,
            skipped: 0,
            new_count: 1,
            updated_count: 0,
            unchanged_count: 0,
            superseded: 0,
            salary_warnings: 0,
            location_warnings: 0,
        }
    }

    #[test]
    fn commit_then_snapshot_roundtrip() {
        let conn = connect_in_memory().unwrap();
        commit_run(&conn, &[sample_row("fp1", "r1")], &sample_run("r1")).unwrap();

        let snapshot = load_snapshot(&conn).unwrap();
        assert_eq!(snapshot.len(), 1);
        let row = &snapshot["fp1"];
        assert_eq!(row.title, "MS Assistantship - Deer Ecology");
        assert_eq!(row.salary_min, Some(30000.0));
        assert!(row.is_graduate);
    }

    #[test]
    fn replace_keeps_one_row_per_fingerprint() {
        let conn = connect_in_memory().unwrap();
        commit_run(&conn, &[sample_row("fp1", "r1")], &sample_run("r1")).unwrap();

        let mut updated = sample_row("fp1", "r2");
        updated.salary_text = "$31,000".into();
        commit_run(&conn, &[updated], &sample_run("r2")).unwrap();

        let all = fetch_all(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].salary_text, "$31,000");
        assert_eq!(all[0].last_run_id, "r2");
    }

    #[test]
    fn stats_and_overview() {
        let conn = connect_in_memory().unwrap();
        let mut other = sample_row("fp2", "r1");
        other.discipline = "Unclassified".into();
        other.is_graduate = false;
        other.salary_min = None;
        commit_run(&conn, &[sample_row("fp1", "r1"), other], &sample_run("r1")).unwrap();

        let stats = get_stats(&conn).unwrap();
        assert_eq!(stats.postings, 2);
        assert_eq!(stats.graduate, 1);
        assert_eq!(stats.unclassified, 1);
        assert_eq!(stats.with_salary, 1);
        assert_eq!(stats.runs, 1);
        assert_eq!(stats.last_run.as_deref(), Some("r1"));

        let rows = fetch_overview(&conn, Some("Wildlife Ecology"), 10).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].state, "NE");
    }
}
