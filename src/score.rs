use serde::{Deserialize, Serialize};

/// Weights for the power score. Defaults reproduce the published leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub commit_weight: f64,
    pub additions_weight: f64,
    pub deletions_weight: f64,
    /// Average lines per commit that earns the full size bonus.
    pub lines_per_commit_baseline: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            commit_weight: 0.4,
            additions_weight: 0.35,
            deletions_weight: 0.25,
            lines_per_commit_baseline: 50.0,
        }
    }
}

const MAX_SIZE_BONUS: f64 = 10.0;

/// Power score rounded to one decimal place.
///
/// Volume enters logarithmically so a single large import cannot dominate.
/// Commits whose average size sits near the baseline earn up to
/// [`MAX_SIZE_BONUS`] extra points; the bonus fades linearly to zero at 0 and
/// at twice the baseline.
pub fn score(commits: u64, additions: u64, deletions: u64, config: &ScoringConfig) -> f64 {
    let log_commits = (commits as f64 + 1.0).log10() * 100.0;
    let log_additions = (additions as f64 + 1.0).log10() * 10.0;
    let log_deletions = (deletions as f64 + 1.0).log10() * 10.0;

    let weighted = log_commits * config.commit_weight
        + log_additions * config.additions_weight
        + log_deletions * config.deletions_weight;

    let raw = weighted + size_bonus(commits, additions, deletions, config.lines_per_commit_baseline);
    (raw * 10.0).round() / 10.0
}

fn size_bonus(commits: u64, additions: u64, deletions: u64, baseline: f64) -> f64 {
    if commits == 0 || baseline <= 0.0 {
        return 0.0;
    }
    let avg = (additions as f64 + deletions as f64) / commits as f64;
    if avg > 0.0 && avg <= 2.0 * baseline {
        (MAX_SIZE_BONUS * (1.0 - (avg - baseline).abs() / baseline)).min(MAX_SIZE_BONUS)
    } else {
        0.0
    }
}
