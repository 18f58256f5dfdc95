use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::db::CanonicalRow;

/// Mean/median over baseline-adjusted salaries of graduate postings.
#[derive(Debug, Serialize)]
pub struct SalarySummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
}

/// Per-run analytics over the full store, keyed by run id. The dashboard
/// reads these files; nothing in the core reads them back.
#[derive(Debug, Serialize)]
pub struct RunAnalytics {
    pub run_id: String,
    pub generated_at: String,
    pub total_postings: usize,
    pub graduate_total: usize,
    pub professional_total: usize,
    pub by_discipline: BTreeMap<String, usize>,
    pub salary_by_discipline: BTreeMap<String, SalarySummary>,
    pub salary_by_state: BTreeMap<String, SalarySummary>,
}

pub fn build_analytics(run_id: &str, generated_at: &str, rows: &[CanonicalRow]) -> RunAnalytics {
    let mut by_discipline: BTreeMap<String, usize> = BTreeMap::new();
    let mut discipline_salaries: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut state_salaries: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut graduate_total = 0;

    for row in rows {
        *by_discipline.entry(row.discipline.clone()).or_insert(0) += 1;
        if row.is_graduate {
            graduate_total += 1;
        }
        // Salary statistics cover graduate postings only; professional
        // salaries would skew the assistantship picture.
        if let (true, Some(adjusted)) = (row.is_graduate, row.salary_adjusted) {
            discipline_salaries.entry(row.discipline.clone()).or_default().push(adjusted);
            if let Some(state) = &row.state {
                state_salaries.entry(state.clone()).or_default().push(adjusted);
            }
        }
    }

    RunAnalytics {
        run_id: run_id.to_string(),
        generated_at: generated_at.to_string(),
        total_postings: rows.len(),
        graduate_total,
        professional_total: rows.len() - graduate_total,
        by_discipline,
        salary_by_discipline: summarize(discipline_salaries),
        salary_by_state: summarize(state_salaries),
    }
}

fn summarize(groups: BTreeMap<String, Vec<f64>>) -> BTreeMap<String, SalarySummary> {
    groups
        .into_iter()
        .map(|(key, mut values)| {
            values.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let count = values.len();
            let mean = values.iter().sum::<f64>() / count as f64;
            let median = if count % 2 == 1 {
                values[count / 2]
            } else {
                (values[count / 2 - 1] + values[count / 2]) / 2.0
            };
            (key, SalarySummary { count, mean, median })
        })
        .collect()
}

/// Write the run's analytics summary to `<data_dir>/analytics/run_<id>.json`.
pub fn write_analytics(data_dir: &Path, analytics: &RunAnalytics) -> Result<PathBuf> {
    let dir = data_dir.join("analytics");
    fs::create_dir_all(&dir).context("creating analytics directory")?;
    let path = dir.join(format!("run_{}.json", analytics.run_id));
    let json = serde_json::to_string_pretty(analytics)?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Write an immutable archive snapshot of the full store to
/// `<data_dir>/archive/snapshot_<run_id>.json`. Existing snapshots are
/// never overwritten.
pub fn write_snapshot(data_dir: &Path, run_id: &str, rows: &[CanonicalRow]) -> Result<PathBuf> {
    let dir = data_dir.join("archive");
    fs::create_dir_all(&dir).context("creating archive directory")?;
    let path = dir.join(format!("snapshot_{}.json", run_id));
    if path.exists() {
        bail!("archive snapshot {} already exists", path.display());
    }
    let json = serde_json::to_string_pretty(rows)?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(discipline: &str, is_graduate: bool, adjusted: Option<f64>, state: Option<&str>) -> CanonicalRow {
        CanonicalRow {
            fingerprint: format!("fp-{}-{}", discipline, adjusted.unwrap_or(0.0)),
            title: "t".into(),
            organization: String::new(),
            location_text: String::new(),
            salary_text: String::new(),
            starting_date: String::new(),
            published_date: String::new(),
            tags: String::new(),
            source_url: String::new(),
            salary_min: adjusted,
            salary_max: adjusted,
            cost_index: None,
            salary_adjusted: adjusted,
            city: None,
            state: state.map(String::from),
            location_confidence: 0.0,
            discipline: discipline.into(),
            discipline_confidence: 0.3,
            is_graduate,
            position_confidence: 0.3,
            first_seen: "2025-06-20T00:00:00Z".into(),
            last_updated: "2025-06-20T00:00:00Z".into(),
            last_run_id: "r1".into(),
        }
    }

    #[test]
    fn counts_and_salary_stats() {
        let rows = vec![
            row("Wildlife Ecology", true, Some(25000.0), Some("NE")),
            row("Wildlife Ecology", true, Some(35000.0), Some("NE")),
            row("Fisheries Science", true, Some(30000.0), Some("TX")),
            row("Wildlife Ecology", false, Some(60000.0), Some("TX")),
            row("Unclassified", true, None, None),
        ];
        let a = build_analytics("r1", "2025-06-20T00:00:00Z", &rows);

        assert_eq!(a.total_postings, 5);
        assert_eq!(a.graduate_total, 4);
        assert_eq!(a.professional_total, 1);
        assert_eq!(a.by_discipline["Wildlife Ecology"], 3);
        assert_eq!(a.by_discipline["Unclassified"], 1);

        let we = &a.salary_by_discipline["Wildlife Ecology"];
        assert_eq!(we.count, 2);
        assert_eq!(we.mean, 30000.0);
        assert_eq!(we.median, 30000.0);
        // The professional $60k posting stays out of the stats
        assert!(!a.salary_by_state.contains_key("TX") || a.salary_by_state["TX"].count == 1);
    }

    #[test]
    fn median_of_odd_sized_group() {
        let rows = vec![
            row("Fisheries Science", true, Some(20000.0), Some("TX")),
            row("Fisheries Science", true, Some(21000.0), Some("TX")),
            row("Fisheries Science", true, Some(40000.0), Some("TX")),
        ];
        let a = build_analytics("r1", "2025-06-20T00:00:00Z", &rows);
        assert_eq!(a.salary_by_discipline["Fisheries Science"].median, 21000.0);
        assert_eq!(a.salary_by_discipline["Fisheries Science"].mean, 27000.0);
    }

    #[test]
    fn snapshot_is_append_only() {
        let tmp = tempfile::tempdir().unwrap();
        let rows = vec![row("Wildlife Ecology", true, Some(25000.0), Some("NE"))];
        let path = write_snapshot(tmp.path(), "20250620_000000", &rows).unwrap();
        assert!(path.exists());
        // Second write for the same run id must refuse
        assert!(write_snapshot(tmp.path(), "20250620_000000", &rows).is_err());
    }

    #[test]
    fn analytics_file_lands_under_run_id() {
        let tmp = tempfile::tempdir().unwrap();
        let a = build_analytics("20250620_000000", "2025-06-20T00:00:00Z", &[]);
        let path = write_analytics(tmp.path(), &a).unwrap();
        assert!(path.ends_with("analytics/run_20250620_000000.json"));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("\"total_postings\": 0"));
    }
}
