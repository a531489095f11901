use crate::cli::CommonArgs;
use crate::fetch::fetch_records;
use crate::model::{ContributorRecord, RecordsOutput};
use crate::output::{output_json, output_ndjson, output_table};
use crate::period::Period;
use crate::rank::compute_leaderboard;
use crate::score::{score, ScoringConfig};
use crate::title::classify;
use anyhow::Context;
use console::style;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub fn exec(
    common: CommonArgs,
    period: Period,
    json: bool,
    ndjson: bool,
    limit: Option<usize>,
    input: Option<PathBuf>,
    scoring: ScoringConfig,
) -> anyhow::Result<()> {
    let (repo, records) = match input {
        Some(path) => load_records(&path)?,
        None => {
            let (repo, records) = fetch_records(&common, !(json || ndjson))?;
            (repo.to_string(), records)
        }
    };

    let mut entries = compute_leaderboard(&records, period, &scoring);
    let total = entries.len();
    if let Some(n) = limit {
        entries.truncate(n);
    }

    if json {
        output_json(&entries, &repo, period)?;
    } else if ndjson {
        output_ndjson(&entries)?;
    } else {
        output_table(&entries, &repo, period, total)?;
    }

    Ok(())
}

fn load_records(path: &Path) -> anyhow::Result<(String, Vec<ContributorRecord>)> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed reading records file: {}", path.display()))?;
    let parsed: RecordsOutput = serde_json::from_str(&raw)
        .with_context(|| format!("Failed parsing records file: {}", path.display()))?;
    Ok((parsed.repository, parsed.contributors))
}

#[derive(Serialize)]
struct ScoreReport {
    commits: u64,
    additions: u64,
    deletions: u64,
    score: f64,
    title: &'static str,
    color: &'static str,
}

pub fn exec_score(commits: u64, additions: u64, deletions: u64, json: bool, scoring: ScoringConfig) -> anyhow::Result<()> {
    let title = classify(commits, additions, deletions);
    let report = ScoreReport {
        commits,
        additions,
        deletions,
        score: score(commits, additions, deletions, &scoring),
        title: title.label(),
        color: title.color(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Power: {}", style(format!("{:.1}", report.score)).cyan().bold());
        println!("Title: {} {}", style(report.title).bold(), style(report.color).dim());
    }
    Ok(())
}
