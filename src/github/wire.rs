use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::model::CommitDetail;

/// Shas from a commit list response. Elements without a sha are skipped.
pub fn parse_commit_shas(body: &Value) -> Vec<String> {
    body.as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|c| c.get("sha").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Diff stat and authored date from a single-commit response. Missing pieces
/// stay `None`; the backfiller ignores details that lack either.
pub fn parse_commit_detail(sha: &str, body: &Value) -> CommitDetail {
    let stats = body.get("stats");
    let additions = stats.and_then(|s| s.get("additions")).and_then(Value::as_u64);
    let deletions = stats.and_then(|s| s.get("deletions")).and_then(Value::as_u64);

    let authored_at = body
        .pointer("/commit/author/date")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.with_timezone(&Utc));

    CommitDetail {
        sha: body
            .get("sha")
            .and_then(Value::as_str)
            .unwrap_or(sha)
            .to_string(),
        additions,
        deletions,
        authored_at,
    }
}
