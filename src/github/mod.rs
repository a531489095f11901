pub mod client;
pub mod wire;

pub use client::{error_for_status, GitHubClient, DEFAULT_API_URL};
pub use wire::{parse_commit_detail, parse_commit_shas};

use serde_json::Value;

use crate::error::Result;
use crate::model::CommitDetail;
use crate::util::RepoSlug;

/// The four logical fetches the leaderboard needs from a hosting service.
///
/// The two list fetches hand back raw JSON so the merger can decide what is
/// malformed. A weekly-stats response that is still being computed upstream
/// must surface as [`crate::error::GboardError::StillComputing`].
#[allow(async_fn_in_trait)]
pub trait HostingApi {
    async fn contributor_weekly_stats(&self, repo: &RepoSlug) -> Result<Value>;

    async fn contributors_summary(&self, repo: &RepoSlug) -> Result<Value>;

    /// Most recent commit shas authored by `login`, newest first.
    async fn commits_by_author(&self, repo: &RepoSlug, login: &str, limit: usize) -> Result<Vec<String>>;

    async fn commit_detail(&self, repo: &RepoSlug, sha: &str) -> Result<CommitDetail>;
}
