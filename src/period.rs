use chrono::Utc;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{ContributorRecord, PeriodTotals};

const DAY_SECS: i64 = 86_400;

/// Reporting window applied to week buckets before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    All,
    Week,
    Month,
}

impl Period {
    /// Earliest week start (Unix seconds) that still counts for this period.
    pub fn cutoff(self, now: i64) -> i64 {
        match self {
            Period::All => 0,
            Period::Week => now - 7 * DAY_SECS,
            Period::Month => now - 28 * DAY_SECS,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Period::All => "all",
            Period::Week => "week",
            Period::Month => "month",
        };
        f.write_str(s)
    }
}

pub fn aggregate(records: &[ContributorRecord], period: Period) -> Vec<PeriodTotals> {
    aggregate_at(records, period, Utc::now().timestamp())
}

/// Sums each contributor's buckets inside the window. Contributors with no
/// activity in the window are left out entirely.
pub fn aggregate_at(records: &[ContributorRecord], period: Period, now: i64) -> Vec<PeriodTotals> {
    let cutoff = period.cutoff(now);

    records
        .iter()
        .filter_map(|record| {
            let mut totals = PeriodTotals {
                login: record.login.clone(),
                avatar_url: record.avatar_url.clone(),
                profile_url: record.profile_url.clone(),
                commits: 0,
                additions: 0,
                deletions: 0,
            };
            for week in record.weeks.iter().filter(|w| w.week_start >= cutoff) {
                totals.commits = totals.commits.saturating_add(week.commits);
                totals.additions = totals.additions.saturating_add(week.additions);
                totals.deletions = totals.deletions.saturating_add(week.deletions);
            }
            (!totals.is_empty()).then_some(totals)
        })
        .collect()
}
