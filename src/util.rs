use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GboardError;

/// Most recent Sunday 00:00 UTC on or before `timestamp`, as whole Unix seconds.
pub fn week_start(timestamp: &DateTime<Utc>) -> i64 {
    let date = timestamp.date_naive();
    let back = date.weekday().num_days_from_sunday() as i64;
    let sunday = date - Duration::days(back);
    sunday.and_time(NaiveTime::MIN).and_utc().timestamp()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoSlug {
    type Err = GboardError;

    /// Accepts `owner/repo` or a repository URL such as
    /// `https://github.com/owner/repo/pulls`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let path = match trimmed.split_once("://") {
            Some((_, rest)) => rest.split_once('/').map(|(_, p)| p).unwrap_or(""),
            None => trimmed,
        };
        let path = path.split(['?', '#']).next().unwrap_or_default();

        let mut parts = path.split('/').filter(|p| !p.is_empty());
        let owner = parts.next();
        let name = parts.next().map(|n| n.trim_end_matches(".git"));

        match (owner, name) {
            (Some(o), Some(n)) if !n.is_empty() => Ok(RepoSlug::new(o, n)),
            _ => Err(GboardError::Parse(format!(
                "Expected owner/repo or a repository URL, got '{input}'"
            ))),
        }
    }
}
