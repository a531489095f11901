use chrono::Utc;

use crate::model::{ContributorRecord, PeriodTotals, ScoredEntry};
use crate::period::{aggregate_at, Period};
use crate::score::{score, ScoringConfig};
use crate::title::classify;

/// Aggregate, score, classify and rank in one pass. Cheap enough to re-run on
/// every period change; nothing here touches the network.
pub fn compute_leaderboard(
    records: &[ContributorRecord],
    period: Period,
    config: &ScoringConfig,
) -> Vec<ScoredEntry> {
    compute_leaderboard_at(records, period, config, Utc::now().timestamp())
}

pub fn compute_leaderboard_at(
    records: &[ContributorRecord],
    period: Period,
    config: &ScoringConfig,
    now: i64,
) -> Vec<ScoredEntry> {
    let entries = aggregate_at(records, period, now)
        .into_iter()
        .map(|totals| score_entry(totals, config))
        .collect();
    rank(entries)
}

fn score_entry(totals: PeriodTotals, config: &ScoringConfig) -> ScoredEntry {
    let PeriodTotals {
        login,
        avatar_url,
        profile_url,
        commits,
        additions,
        deletions,
    } = totals;
    let title = classify(commits, additions, deletions);

    ScoredEntry {
        rank: 0,
        login,
        avatar_url,
        profile_url,
        commits,
        additions,
        deletions,
        score: score(commits, additions, deletions, config),
        title: title.label().to_string(),
        color: title.color().to_string(),
    }
}

/// Sorts by score descending and assigns 1-based ranks by position.
///
/// `sort_by` is stable, so entries with equal scores keep the order they
/// arrived in. No secondary key is applied.
pub fn rank(mut entries: Vec<ScoredEntry>) -> Vec<ScoredEntry> {
    entries.sort_by(|a, b| b.score.total_cmp(&a.score));
    for (idx, entry) in entries.iter_mut().enumerate() {
        entry.rank = idx + 1;
    }
    entries
}
