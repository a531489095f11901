use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::model::{ContributorRecord, WeekBucket};

/// Unify the detailed weekly stats list with the summary contributors list.
///
/// The detailed source wins for any login present in both; the summary list
/// only adds contributors the weekly endpoint missed, carrying their total as
/// `fallback_total_commits`. A source that is missing or not an array counts
/// as empty. An empty result means "no data", not an error.
pub fn merge_sources(detailed: Option<&Value>, summary: Option<&Value>) -> Vec<ContributorRecord> {
    let mut records: Vec<ContributorRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in as_list(detailed) {
        let Some(record) = parse_detailed(entry) else {
            continue;
        };
        let key = record.key();
        if index.contains_key(&key) {
            debug!(login = %record.login, "duplicate login in weekly stats, keeping first");
            continue;
        }
        index.insert(key, records.len());
        records.push(record);
    }

    for entry in as_list(summary) {
        let Some(record) = parse_summary(entry) else {
            continue;
        };
        let key = record.key();
        if index.contains_key(&key) {
            continue;
        }
        index.insert(key, records.len());
        records.push(record);
    }

    debug!(contributors = records.len(), "merged contributor sources");
    records
}

fn as_list(source: Option<&Value>) -> &[Value] {
    source
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn parse_detailed(entry: &Value) -> Option<ContributorRecord> {
    let author = entry.get("author")?;
    let mut record = ContributorRecord::new(login_of(author)?);
    record.avatar_url = text(author, "avatar_url");
    record.profile_url = text(author, "html_url");

    let mut weeks: Vec<WeekBucket> = Vec::new();
    let mut by_start: HashMap<i64, usize> = HashMap::new();
    let raw_weeks = entry.get("weeks").and_then(Value::as_array);
    for raw in raw_weeks.into_iter().flatten() {
        let Some(week_start) = raw.get("w").and_then(Value::as_i64) else {
            continue;
        };
        let idx = *by_start.entry(week_start).or_insert_with(|| {
            weeks.push(WeekBucket::new(week_start));
            weeks.len() - 1
        });
        let bucket = &mut weeks[idx];
        bucket.additions = bucket.additions.saturating_add(count(raw, "a"));
        bucket.deletions = bucket.deletions.saturating_add(count(raw, "d"));
        bucket.commits = bucket.commits.saturating_add(count(raw, "c"));
    }
    record.weeks = weeks;
    Some(record)
}

fn parse_summary(entry: &Value) -> Option<ContributorRecord> {
    let mut record = ContributorRecord::new(login_of(entry)?);
    record.avatar_url = text(entry, "avatar_url");
    record.profile_url = text(entry, "html_url");
    record.fallback_total_commits = Some(count(entry, "contributions"));
    Some(record)
}

fn login_of(value: &Value) -> Option<String> {
    value
        .get("login")
        .and_then(Value::as_str)
        .filter(|login| !login.trim().is_empty())
        .map(str::to_string)
}

fn text(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Non-negative counter; anything missing, negative or non-numeric reads as 0.
fn count(value: &Value, key: &str) -> u64 {
    value
        .get(key)
        .and_then(Value::as_i64)
        .map(|n| n.max(0) as u64)
        .unwrap_or(0)
}
