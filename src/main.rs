mod classify;
mod db;
mod identity;
mod ingest;
mod normalize;
mod pipeline;
mod report;

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};

use classify::exemplars::ExemplarSet;

#[derive(Parser)]
#[command(name = "grad_tracker", about = "Graduate assistantship enrichment & tracking pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a fetched batch through normalize → classify → resolve → commit
    Run {
        /// Raw batch JSON produced by the fetcher
        #[arg(short, long)]
        input: PathBuf,
        /// Exemplar corpus JSON (default: built-in wildlife/fisheries set)
        #[arg(short, long)]
        exemplars: Option<PathBuf>,
    },
    /// Show historical store statistics
    Stats,
    /// Canonical postings overview table
    Overview {
        /// Filter by discipline (e.g. "Wildlife Ecology")
        #[arg(short, long)]
        discipline: Option<String>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Export the canonical collection as JSON for the dashboard
    Export {
        /// Output file path
        #[arg(short, long, default_value = "data/canonical_postings.json")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { input, exemplars } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let set = match exemplars {
                Some(path) => ExemplarSet::from_file(&path)?,
                None => ExemplarSet::builtin(),
            };
            let raw = ingest::load_batch(&input)?;
            if raw.is_empty() {
                println!("Batch is empty; nothing to process.");
                return Ok(());
            }
            println!("Processing {} raw postings...", raw.len());
            let report = pipeline::execute_run(&conn, raw, &set, Path::new("data"))?;
            report.print();
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Postings:     {}", s.postings);
            println!("Graduate:     {}", s.graduate);
            println!("Unclassified: {}", s.unclassified);
            println!("With salary:  {}", s.with_salary);
            println!("Runs:         {}", s.runs);
            println!("Last run:     {}", s.last_run.as_deref().unwrap_or("-"));
            Ok(())
        }
        Commands::Overview { discipline, limit } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let rows = db::fetch_overview(&conn, discipline.as_deref(), limit)?;
            if rows.is_empty() {
                println!("No postings found.");
                return Ok(());
            }

            println!(
                "{:>3} | {:<40} | {:<24} | {:<2} | {:<20} | {:<4} | {:>9}",
                "#", "Title", "Organization", "St", "Discipline", "Grad", "Adj. $"
            );
            println!("{}", "-".repeat(118));

            for (i, r) in rows.iter().enumerate() {
                let title = truncate(&r.title, 40);
                let org = truncate(&r.organization, 24);
                let disc = truncate(&r.discipline, 20);
                let salary = r
                    .salary_adjusted
                    .map(|s| format!("{:.0}", s))
                    .unwrap_or_else(|| "-".into());

                println!(
                    "{:>3} | {:<40} | {:<24} | {:<2} | {:<20} | {:<4} | {:>9}",
                    i + 1,
                    title,
                    org,
                    r.state,
                    disc,
                    if r.is_graduate { "yes" } else { "no" },
                    salary
                );
            }

            println!("\n{} postings", rows.len());
            Ok(())
        }
        Commands::Export { output } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let rows = db::fetch_all(&conn)?;
            let json = serde_json::to_string_pretty(&rows)?;
            std::fs::write(&output, json)?;
            println!("Exported {} postings to {}", rows.len(), output.display());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
