use indicatif::ProgressBar;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::backfill::backfill;
use crate::cache::Cache;
use crate::error::{GboardError, Result};
use crate::github::HostingApi;
use crate::merge::merge_sources;
use crate::model::ContributorRecord;
use crate::util::RepoSlug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    FetchingSources,
    Backfilling,
    Ready,
    RetryScheduled { attempt: u32 },
}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub max_retries: u32,
    pub retry_delay: Duration,
    /// Contributors backfilled at once, `0` for no bound.
    pub backfill_concurrency: usize,
    pub backfill: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_secs(3),
            backfill_concurrency: 0,
            backfill: true,
        }
    }
}

/// Drives one fetch cycle: both sources, merge, backfill.
///
/// A still-computing answer from the weekly stats endpoint restarts the whole
/// cycle after `retry_delay`, up to `max_retries` times. Nothing else retries.
pub struct Pipeline<'a, A> {
    api: &'a A,
    repo: RepoSlug,
    cache: Option<&'a Cache>,
    options: FetchOptions,
    state: PipelineState,
    progress: Option<ProgressBar>,
}

impl<'a, A: HostingApi> Pipeline<'a, A> {
    pub fn new(api: &'a A, repo: RepoSlug, options: FetchOptions) -> Self {
        Self {
            api,
            repo,
            cache: None,
            options,
            state: PipelineState::Idle,
            progress: None,
        }
    }

    pub fn with_cache(mut self, cache: &'a Cache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_progress(mut self, pb: ProgressBar) -> Self {
        self.progress = Some(pb);
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn transition(&mut self, next: PipelineState) {
        debug!(from = ?self.state, to = ?next, repo = %self.repo, "pipeline state");
        self.state = next;
        if let Some(pb) = &self.progress {
            let msg = match next {
                PipelineState::Idle => return,
                PipelineState::FetchingSources => "Fetching contributor stats...".to_string(),
                PipelineState::Backfilling => "Recovering missing line stats...".to_string(),
                PipelineState::Ready => "Contributor stats ready".to_string(),
                PipelineState::RetryScheduled { attempt } => {
                    format!("Stats still computing upstream, retry {attempt}...")
                }
            };
            pb.set_message(msg);
        }
    }

    pub async fn run(&mut self) -> Result<Vec<ContributorRecord>> {
        let mut attempt = 0;
        loop {
            self.transition(PipelineState::FetchingSources);
            match self.fetch_sources().await {
                Ok(records) => return self.finish(records).await,
                Err(e) if e.is_retryable() && attempt < self.options.max_retries => {
                    attempt += 1;
                    self.transition(PipelineState::RetryScheduled { attempt });
                    info!(attempt, delay = ?self.options.retry_delay, "stats still computing, retrying");
                    tokio::time::sleep(self.options.retry_delay).await;
                }
                Err(e) => {
                    self.transition(PipelineState::Idle);
                    return Err(e);
                }
            }
        }
    }

    async fn finish(&mut self, mut records: Vec<ContributorRecord>) -> Result<Vec<ContributorRecord>> {
        if records.is_empty() {
            self.transition(PipelineState::Idle);
            return Err(GboardError::EmptyResult(self.repo.to_string()));
        }

        if self.options.backfill {
            self.transition(PipelineState::Backfilling);
            let report = backfill(
                self.api,
                &self.repo,
                &mut records,
                self.cache,
                self.options.backfill_concurrency,
            )
            .await;
            info!(
                qualified = report.qualified,
                recovered = report.recovered,
                abandoned = report.abandoned,
                "backfill finished"
            );
        }

        self.transition(PipelineState::Ready);
        Ok(records)
    }

    async fn fetch_sources(&self) -> Result<Vec<ContributorRecord>> {
        let (detailed, summary) = tokio::join!(
            self.api.contributor_weekly_stats(&self.repo),
            self.api.contributors_summary(&self.repo),
        );

        if let Err(GboardError::StillComputing) = detailed {
            return Err(GboardError::StillComputing);
        }

        let (detailed, summary) = match (detailed, summary) {
            (Err(e), Err(_)) => return Err(e),
            (detailed, summary) => (
                usable_source(detailed, "contributor stats")?,
                usable_source(summary, "contributors")?,
            ),
        };

        Ok(merge_sources(detailed.as_ref(), summary.as_ref()))
    }
}

/// A source that failed for a reason specific to that endpoint is dropped so
/// the other one can still produce a leaderboard. Credential and access
/// problems apply to both and are returned.
fn usable_source(result: Result<Value>, what: &str) -> Result<Option<Value>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(
            e @ (GboardError::MissingCredential
            | GboardError::InvalidCredential
            | GboardError::RateLimited
            | GboardError::Forbidden(_)
            | GboardError::NotFound(_)),
        ) => Err(e),
        Err(e) => {
            warn!(source = what, error = %e, "source unavailable, continuing without it");
            Ok(None)
        }
    }
}
