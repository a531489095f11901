use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::period::Period;

pub const SCHEMA_VERSION: u32 = 1;

/// One Sunday-aligned week of activity for a single contributor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekBucket {
    /// Unix seconds, Sunday 00:00 UTC.
    pub week_start: i64,
    pub additions: u64,
    pub deletions: u64,
    pub commits: u64,
}

impl WeekBucket {
    pub fn new(week_start: i64) -> Self {
        Self {
            week_start,
            additions: 0,
            deletions: 0,
            commits: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorRecord {
    pub login: String,
    pub avatar_url: String,
    pub profile_url: String,
    pub weeks: Vec<WeekBucket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_total_commits: Option<u64>,
}

impl ContributorRecord {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            avatar_url: String::new(),
            profile_url: String::new(),
            weeks: Vec::new(),
            fallback_total_commits: None,
        }
    }

    /// Identity key; logins are compared case-insensitively.
    pub fn key(&self) -> String {
        self.login.to_lowercase()
    }

    /// Weekly commit sum, or the summary-list count when the weeks carry none.
    pub fn total_commits(&self) -> u64 {
        let weekly = self.weeks.iter().fold(0u64, |acc, w| acc.saturating_add(w.commits));
        if weekly > 0 {
            weekly
        } else {
            self.fallback_total_commits.unwrap_or(0)
        }
    }

    pub fn total_additions(&self) -> u64 {
        self.weeks.iter().fold(0u64, |acc, w| acc.saturating_add(w.additions))
    }

    pub fn total_deletions(&self) -> u64 {
        self.weeks.iter().fold(0u64, |acc, w| acc.saturating_add(w.deletions))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub login: String,
    pub avatar_url: String,
    pub profile_url: String,
    pub commits: u64,
    pub additions: u64,
    pub deletions: u64,
}

impl PeriodTotals {
    pub fn is_empty(&self) -> bool {
        self.commits == 0 && self.additions == 0 && self.deletions == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEntry {
    pub rank: usize,
    pub login: String,
    pub avatar_url: String,
    pub profile_url: String,
    pub commits: u64,
    pub additions: u64,
    pub deletions: u64,
    pub score: f64,
    pub title: String,
    pub color: String,
}

/// A single commit's diff stat as returned by the commit-detail fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDetail {
    pub sha: String,
    pub additions: Option<u64>,
    pub deletions: Option<u64>,
    pub authored_at: Option<DateTime<Utc>>,
}

impl CommitDetail {
    /// Both diff counts and the authored date are known.
    pub fn is_complete(&self) -> bool {
        self.additions.is_some() && self.deletions.is_some() && self.authored_at.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository: String,
    pub period: Period,
    pub entries: Vec<ScoredEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository: String,
    pub contributors: Vec<ContributorRecord>,
}
