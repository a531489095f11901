use crate::cli::CommonArgs;
use crate::fetch::fetch_records;
use crate::model::ContributorRecord;
use crate::output::{output_ndjson, output_records_json};

pub fn exec(common: CommonArgs, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let (repo, records) = fetch_records(&common, !(json || ndjson))?;

    if json {
        output_records_json(&records, &repo)?;
    } else if ndjson {
        output_ndjson(&records)?;
    } else {
        output_summary(&records, &repo.to_string())?;
    }

    Ok(())
}

fn output_summary(records: &[ContributorRecord], repo: &str) -> anyhow::Result<()> {
    use console::style;

    println!("{} {}", style("Export Summary").bold(), style(repo).cyan());
    println!("{}", "─".repeat(50));

    let total_commits: u64 = records.iter().map(|r| r.total_commits()).sum();
    let total_added: u64 = records.iter().map(|r| r.total_additions()).sum();
    let total_deleted: u64 = records.iter().map(|r| r.total_deletions()).sum();
    let summary_only = records
        .iter()
        .filter(|r| r.weeks.is_empty() && r.fallback_total_commits.is_some())
        .count();

    println!("Contributors: {}", style(records.len()).yellow());
    println!("Total commits: {}", style(total_commits).cyan());
    println!("Total lines added: {}", style(total_added).green());
    println!("Total lines deleted: {}", style(total_deleted).red());
    if summary_only > 0 {
        println!("Without weekly data: {}", style(summary_only).dim());
    }

    let first = records.iter().flat_map(|r| &r.weeks).map(|w| w.week_start).min();
    let last = records.iter().flat_map(|r| &r.weeks).map(|w| w.week_start).max();
    if let (Some(first), Some(last)) = (first, last) {
        let fmt = |ts: i64| {
            chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        };
        println!("Weeks: {} to {}", style(fmt(first)).dim(), style(fmt(last)).dim());
    }

    println!("\nUse --json or --ndjson flags to export the raw data.");
    Ok(())
}
