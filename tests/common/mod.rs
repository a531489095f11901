#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use gboard::error::{GboardError, Result};
use gboard::github::HostingApi;
use gboard::model::{CommitDetail, ContributorRecord, WeekBucket};
use gboard::util::RepoSlug;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory hosting API. Missing entries answer with errors so tests can
/// exercise the failure paths.
#[derive(Default)]
pub struct FakeApi {
    /// `None` answers the weekly stats fetch with a 500.
    pub weekly: Option<Value>,
    pub weekly_not_found: bool,
    /// `None` answers the summary fetch with a 500.
    pub summary: Option<Value>,
    /// Number of initial weekly-stats calls that report "still computing".
    pub still_computing_times: usize,
    /// login -> commit shas; a missing login fails the list fetch.
    pub commits: HashMap<String, Vec<String>>,
    /// sha -> detail; a missing sha fails the detail fetch.
    pub details: HashMap<String, CommitDetail>,
    pub weekly_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
}

impl FakeApi {
    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

impl HostingApi for FakeApi {
    async fn contributor_weekly_stats(&self, _repo: &RepoSlug) -> Result<Value> {
        let n = self.weekly_calls.fetch_add(1, Ordering::SeqCst);
        if n < self.still_computing_times {
            return Err(GboardError::StillComputing);
        }
        if self.weekly_not_found {
            return Err(GboardError::NotFound("contributor stats".into()));
        }
        self.weekly.clone().ok_or(GboardError::Api {
            status: 500,
            body: "boom".into(),
        })
    }

    async fn contributors_summary(&self, _repo: &RepoSlug) -> Result<Value> {
        self.summary.clone().ok_or(GboardError::Api {
            status: 500,
            body: "boom".into(),
        })
    }

    async fn commits_by_author(&self, _repo: &RepoSlug, login: &str, limit: usize) -> Result<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let mut shas = self
            .commits
            .get(login)
            .cloned()
            .ok_or_else(|| GboardError::NotFound(format!("commits for {login}")))?;
        shas.truncate(limit);
        Ok(shas)
    }

    async fn commit_detail(&self, _repo: &RepoSlug, sha: &str) -> Result<CommitDetail> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.details
            .get(sha)
            .cloned()
            .ok_or_else(|| GboardError::NotFound(format!("commit {sha}")))
    }
}

pub fn repo() -> RepoSlug {
    RepoSlug::new("acme", "widgets")
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn detail(sha: &str, additions: u64, deletions: u64, authored_at: DateTime<Utc>) -> CommitDetail {
    CommitDetail {
        sha: sha.to_string(),
        additions: Some(additions),
        deletions: Some(deletions),
        authored_at: Some(authored_at),
    }
}

pub fn week(week_start: i64, additions: u64, deletions: u64, commits: u64) -> WeekBucket {
    WeekBucket {
        week_start,
        additions,
        deletions,
        commits,
    }
}

pub fn record(login: &str, weeks: Vec<WeekBucket>) -> ContributorRecord {
    let mut r = ContributorRecord::new(login);
    r.weeks = weeks;
    r
}
