use crate::model::{ContributorRecord, LeaderboardOutput, RecordsOutput, ScoredEntry, SCHEMA_VERSION};
use crate::period::Period;
use crate::util::RepoSlug;
use anyhow::Result;
use chrono::Utc;
use console::{style, Style};

pub fn output_json(entries: &[ScoredEntry], repo: &str, period: Period) -> Result<()> {
    let output = LeaderboardOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository: repo.to_string(),
        period,
        entries: entries.to_vec(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_ndjson<T: serde::Serialize>(items: &[T]) -> Result<()> {
    for item in items {
        println!("{}", serde_json::to_string(item)?);
    }
    Ok(())
}

pub fn output_records_json(records: &[ContributorRecord], repo: &RepoSlug) -> Result<()> {
    let output = RecordsOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository: repo.to_string(),
        contributors: records.to_vec(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_table(entries: &[ScoredEntry], repo: &str, period: Period, total: usize) -> Result<()> {
    if entries.is_empty() {
        println!("No contributor activity for period '{}'", period);
        return Ok(());
    }

    println!(
        "{} {} {}",
        style("Leaderboard").bold(),
        style(repo).cyan(),
        style(format!("({period})")).dim()
    );
    println!(
        "{:>4} {:<24} {:>7} {:>8} {:>9} {:>9}  {}",
        style("#").bold(),
        style("Login").bold(),
        style("Power").bold(),
        style("Commits").bold(),
        style("Added").bold(),
        style("Deleted").bold(),
        style("Title").bold()
    );
    println!("{}", "─".repeat(82));

    for e in entries {
        println!(
            "{:>4} {:<24} {:>7.1} {:>8} {:>9} {:>9}  {}",
            e.rank,
            e.login,
            e.score,
            e.commits,
            style(format!("+{}", e.additions)).green(),
            style(format!("-{}", e.deletions)).red(),
            title_style(&e.color).apply_to(&e.title)
        );
    }

    if total > entries.len() {
        println!("\n... and {} more contributors", total - entries.len());
    }
    Ok(())
}

/// Nearest xterm-256 color for a `#RRGGBB` badge color.
fn title_style(hex: &str) -> Style {
    let channel = |range: std::ops::Range<usize>| {
        hex.trim_start_matches('#')
            .get(range)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
    };
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => {
            let cube = |c: u8| ((c as u16 * 5 + 127) / 255) as u8;
            Style::new().color256(16 + 36 * cube(r) + 6 * cube(g) + cube(b)).bold()
        }
        _ => Style::new().bold(),
    }
}
