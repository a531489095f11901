use futures_util::future::join_all;
use futures_util::stream::{self, StreamExt};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::cache::Cache;
use crate::github::HostingApi;
use crate::model::{CommitDetail, ContributorRecord, WeekBucket};
use crate::util::{week_start, RepoSlug};

/// Commits requested per author when sampling.
pub const COMMIT_SAMPLE_LIMIT: usize = 30;
/// Commit details fetched per author, taken from the front of the sample.
pub const DETAIL_FETCH_LIMIT: usize = 10;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BackfillReport {
    pub qualified: usize,
    pub recovered: usize,
    pub abandoned: usize,
}

/// A contributor has commits on record but not a single added or deleted line.
pub fn needs_backfill(record: &ContributorRecord) -> bool {
    record.total_commits() > 0 && record.total_additions() == 0 && record.total_deletions() == 0
}

/// Recover approximate line counts for every contributor that needs it.
///
/// Each contributor is handled independently; a failed fetch leaves that
/// record untouched and never affects the others. `concurrency` bounds how
/// many contributors are in flight at once, `0` means no bound.
pub async fn backfill<A: HostingApi>(
    api: &A,
    repo: &RepoSlug,
    records: &mut [ContributorRecord],
    cache: Option<&Cache>,
    concurrency: usize,
) -> BackfillReport {
    let targets: Vec<&mut ContributorRecord> = records.iter_mut().filter(|r| needs_backfill(r)).collect();
    let mut report = BackfillReport {
        qualified: targets.len(),
        ..BackfillReport::default()
    };
    if targets.is_empty() {
        return report;
    }

    let limit = if concurrency == 0 { targets.len() } else { concurrency };
    info!(contributors = report.qualified, limit, "backfilling line stats");

    let outcomes: Vec<bool> = stream::iter(targets)
        .map(move |record| async move {
            let recovered = recover_weeks(api, repo, &record.login, cache).await;
            match recovered {
                Some(weeks) => {
                    merge_backfilled_weeks(record, weeks);
                    true
                }
                None => false,
            }
        })
        .buffer_unordered(limit)
        .collect()
        .await;

    report.recovered = outcomes.iter().filter(|ok| **ok).count();
    report.abandoned = report.qualified - report.recovered;
    report
}

async fn recover_weeks<A: HostingApi>(
    api: &A,
    repo: &RepoSlug,
    login: &str,
    cache: Option<&Cache>,
) -> Option<Vec<WeekBucket>> {
    let shas = match api.commits_by_author(repo, login, COMMIT_SAMPLE_LIMIT).await {
        Ok(shas) if !shas.is_empty() => shas,
        Ok(_) => {
            debug!(login, "no commits found for author, skipping backfill");
            return None;
        }
        Err(e) => {
            warn!(login, error = %e, "commit list fetch failed, skipping backfill");
            return None;
        }
    };

    let fetches = shas
        .iter()
        .take(DETAIL_FETCH_LIMIT)
        .map(|sha| commit_detail(api, repo, sha, cache));
    let details: Vec<CommitDetail> = join_all(fetches).await.into_iter().flatten().collect();

    let weeks = weeks_from_details(&details);
    if weeks.is_empty() {
        debug!(login, "no usable commit details, skipping backfill");
        return None;
    }
    debug!(login, sampled = details.len(), weeks = weeks.len(), "recovered line stats");
    Some(weeks)
}

async fn commit_detail<A: HostingApi>(
    api: &A,
    repo: &RepoSlug,
    sha: &str,
    cache: Option<&Cache>,
) -> Option<CommitDetail> {
    if let Some(cache) = cache {
        match cache.get_commit_detail(repo, sha) {
            Ok(Some(detail)) => return Some(detail),
            Ok(None) => {}
            Err(e) => warn!(sha, error = %e, "cache lookup failed"),
        }
    }

    match api.commit_detail(repo, sha).await {
        Ok(detail) => {
            if let Some(cache) = cache.filter(|_| detail.is_complete()) {
                if let Err(e) = cache.store_commit_detail(repo, &detail) {
                    warn!(sha, error = %e, "failed to cache commit detail");
                }
            }
            Some(detail)
        }
        Err(e) => {
            debug!(sha, error = %e, "commit detail fetch failed");
            None
        }
    }
}

/// Sum sampled commits into Sunday-aligned week buckets, oldest first.
/// Details missing a diff stat or an authored date are ignored.
pub fn weeks_from_details(details: &[CommitDetail]) -> Vec<WeekBucket> {
    let mut by_week: BTreeMap<i64, WeekBucket> = BTreeMap::new();

    for detail in details {
        let (Some(additions), Some(deletions), Some(authored_at)) =
            (detail.additions, detail.deletions, detail.authored_at.as_ref())
        else {
            continue;
        };
        let key = week_start(authored_at);
        let bucket = by_week.entry(key).or_insert_with(|| WeekBucket::new(key));
        bucket.additions = bucket.additions.saturating_add(additions);
        bucket.deletions = bucket.deletions.saturating_add(deletions);
        bucket.commits = bucket.commits.saturating_add(1);
    }

    by_week.into_values().collect()
}

/// Fold recovered buckets into a record.
///
/// A record without weeks takes the recovered set as is. Otherwise a matching
/// week only has its line counts replaced; its commit count comes from the
/// weekly endpoint and stays authoritative. Unmatched weeks are appended.
pub fn merge_backfilled_weeks(record: &mut ContributorRecord, recovered: Vec<WeekBucket>) {
    if record.weeks.is_empty() {
        record.weeks = recovered;
        return;
    }

    for bucket in recovered {
        match record.weeks.iter_mut().find(|w| w.week_start == bucket.week_start) {
            Some(existing) => {
                existing.additions = bucket.additions;
                existing.deletions = bucket.deletions;
            }
            None => record.weeks.push(bucket),
        }
    }
}
