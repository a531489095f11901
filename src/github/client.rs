use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, trace};

use super::wire::{parse_commit_detail, parse_commit_shas};
use super::HostingApi;
use crate::error::{GboardError, Result};
use crate::model::CommitDetail;
use crate::util::RepoSlug;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("gboard/", env!("CARGO_PKG_VERSION"));
const SUMMARY_PAGE_SIZE: usize = 100;

#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let rb = self
            .http
            .get(url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        match &self.token {
            Some(token) => rb.bearer_auth(token),
            None => rb,
        }
    }

    /// Sends the request and returns the parsed body, `None` for 204.
    async fn fetch(&self, rb: RequestBuilder, what: &str) -> Result<(StatusCode, Option<Value>)> {
        let resp = rb.send().await?;
        let status = resp.status();
        trace!(%status, what, "response");

        if status == StatusCode::NO_CONTENT {
            return Ok((status, None));
        }
        if !status.is_success() {
            let exhausted = rate_limit_exhausted(resp.headers());
            let body = resp.text().await.unwrap_or_default();
            return Err(error_for_status(status.as_u16(), exhausted, body, what));
        }
        if status == StatusCode::ACCEPTED {
            return Ok((status, None));
        }
        let body: Value = resp.json().await?;
        Ok((status, Some(body)))
    }
}

impl HostingApi for GitHubClient {
    async fn contributor_weekly_stats(&self, repo: &RepoSlug) -> Result<Value> {
        let path = format!("/repos/{}/{}/stats/contributors", repo.owner, repo.name);
        let (status, body) = self.fetch(self.get(&path), "contributor stats").await?;
        if status == StatusCode::ACCEPTED {
            debug!(%repo, "contributor stats still computing");
            return Err(GboardError::StillComputing);
        }
        Ok(body.unwrap_or_else(|| Value::Array(Vec::new())))
    }

    async fn contributors_summary(&self, repo: &RepoSlug) -> Result<Value> {
        let path = format!("/repos/{}/{}/contributors", repo.owner, repo.name);
        let rb = self
            .get(&path)
            .query(&[("per_page", SUMMARY_PAGE_SIZE.to_string())]);
        let (_, body) = self.fetch(rb, "contributors").await?;
        Ok(body.unwrap_or_else(|| Value::Array(Vec::new())))
    }

    async fn commits_by_author(&self, repo: &RepoSlug, login: &str, limit: usize) -> Result<Vec<String>> {
        let path = format!("/repos/{}/{}/commits", repo.owner, repo.name);
        let rb = self
            .get(&path)
            .query(&[("author", login.to_string()), ("per_page", limit.to_string())]);
        let (_, body) = self.fetch(rb, "commit list").await?;
        let mut shas = body.as_ref().map(parse_commit_shas).unwrap_or_default();
        shas.truncate(limit);
        Ok(shas)
    }

    async fn commit_detail(&self, repo: &RepoSlug, sha: &str) -> Result<CommitDetail> {
        let path = format!("/repos/{}/{}/commits/{}", repo.owner, repo.name, sha);
        let (_, body) = self.fetch(self.get(&path), "commit detail").await?;
        let body = body.ok_or_else(|| GboardError::NotFound(format!("commit {sha}")))?;
        Ok(parse_commit_detail(sha, &body))
    }
}

fn rate_limit_exhausted(headers: &HeaderMap) -> bool {
    headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim() == "0")
        .unwrap_or(false)
}

/// Maps a non-success status onto the boundary error kinds.
pub fn error_for_status(status: u16, rate_limit_exhausted: bool, body: String, what: &str) -> GboardError {
    match status {
        401 => GboardError::InvalidCredential,
        403 if rate_limit_exhausted => GboardError::RateLimited,
        429 => GboardError::RateLimited,
        403 => GboardError::Forbidden(what.to_string()),
        404 => GboardError::NotFound(what.to_string()),
        _ => GboardError::Api { status, body },
    }
}
