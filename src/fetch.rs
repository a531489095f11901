use crate::cache::Cache;
use crate::cli::CommonArgs;
use crate::error::GboardError;
use crate::github::GitHubClient;
use crate::model::ContributorRecord;
use crate::pipeline::Pipeline;
use crate::util::RepoSlug;
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use tracing::warn;

/// Run `fut` to completion on a fresh multi-threaded runtime.
pub fn block_on<F: Future>(fut: F) -> anyhow::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    Ok(runtime.block_on(fut))
}

pub fn resolve_repo(common: &CommonArgs) -> anyhow::Result<RepoSlug> {
    let raw = common
        .repo
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("No repository given (use --repo owner/repo)"))?;
    Ok(raw.parse::<RepoSlug>()?)
}

/// Fetch, merge and backfill the contributor records of one repository.
pub fn fetch_records(common: &CommonArgs, show_progress: bool) -> anyhow::Result<(RepoSlug, Vec<ContributorRecord>)> {
    let repo = resolve_repo(common)?;

    let client = GitHubClient::new(common.api_url.clone(), common.token.clone())
        .context("Failed to build HTTP client")?;
    if !client.has_token() {
        if common.require_token {
            return Err(GboardError::MissingCredential.into());
        }
        warn!("no API token set, requests are unauthenticated and heavily rate limited");
    }

    let cache = if common.no_cache {
        None
    } else {
        match Cache::new(common.cache.as_deref()) {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!(error = %e, "commit detail cache unavailable, continuing without it");
                None
            }
        }
    };

    let mut pipeline = Pipeline::new(&client, repo.clone(), common.fetch_options());
    if let Some(cache) = &cache {
        pipeline = pipeline.with_cache(cache);
    }

    let pb = show_progress.then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    });
    if let Some(pb) = &pb {
        pipeline = pipeline.with_progress(pb.clone());
    }

    let result = block_on(pipeline.run())?;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let records = result.with_context(|| format!("Failed to fetch contributor stats for {repo}"))?;
    Ok((repo, records))
}
