mod common;

use common::{at, detail, record, repo, week, FakeApi};
use gboard::backfill::{backfill, merge_backfilled_weeks, needs_backfill, weeks_from_details, DETAIL_FETCH_LIMIT};
use gboard::cache::Cache;
use gboard::model::{CommitDetail, ContributorRecord};
use gboard::util::week_start;
use pretty_assertions::assert_eq;

fn summary_only(login: &str, commits: u64) -> ContributorRecord {
    let mut r = ContributorRecord::new(login);
    r.fallback_total_commits = Some(commits);
    r
}

#[test]
fn qualification_requires_commits_without_line_changes() {
    assert!(needs_backfill(&summary_only("ada", 10)));
    assert!(needs_backfill(&record("bob", vec![week(0, 0, 0, 4)])));
    assert!(!needs_backfill(&record("cy", vec![week(0, 3, 0, 4)])));
    assert!(!needs_backfill(&record("dee", vec![week(0, 0, 1, 4)])));
    assert!(!needs_backfill(&summary_only("eve", 0)));
    assert!(!needs_backfill(&ContributorRecord::new("fay")));
}

#[test]
fn weekly_commits_take_precedence_over_fallback_total() {
    let mut r = record("ada", vec![week(0, 0, 0, 3)]);
    r.fallback_total_commits = Some(99);
    assert_eq!(r.total_commits(), 3);

    let mut r = record("ada", vec![week(0, 0, 0, 0)]);
    r.fallback_total_commits = Some(7);
    assert_eq!(r.total_commits(), 7);
}

#[tokio::test]
async fn same_week_details_sum_into_one_bucket() {
    let mut api = FakeApi::default();
    api.commits.insert("ada".into(), vec!["c1".into(), "c2".into(), "c3".into()]);
    api.details.insert("c1".into(), detail("c1", 5, 2, at(2024, 3, 11, 9)));
    api.details.insert("c2".into(), detail("c2", 0, 3, at(2024, 3, 13, 14)));
    api.details.insert("c3".into(), detail("c3", 10, 0, at(2024, 3, 16, 23)));

    let mut records = vec![summary_only("ada", 10)];
    let report = backfill(&api, &repo(), &mut records, None, 0).await;

    assert_eq!(report.qualified, 1);
    assert_eq!(report.recovered, 1);
    let sunday = at(2024, 3, 10, 0).timestamp();
    assert_eq!(records[0].weeks, vec![week(sunday, 15, 5, 3)]);
}

#[tokio::test]
async fn existing_week_keeps_its_commit_count() {
    let w1 = at(2024, 3, 10, 0).timestamp();
    let w2 = at(2024, 3, 17, 0).timestamp();

    let mut api = FakeApi::default();
    api.commits.insert("bob".into(), vec!["a".into(), "b".into()]);
    api.details.insert("a".into(), detail("a", 40, 4, at(2024, 3, 12, 8)));
    api.details.insert("b".into(), detail("b", 7, 1, at(2024, 3, 18, 8)));

    let mut records = vec![record("bob", vec![week(w1, 0, 0, 12)])];
    backfill(&api, &repo(), &mut records, None, 0).await;

    assert_eq!(records[0].weeks, vec![week(w1, 40, 4, 12), week(w2, 7, 1, 1)]);
}

#[tokio::test]
async fn failed_commit_list_leaves_record_untouched() {
    let api = FakeApi::default();
    let mut records = vec![summary_only("ghost", 5), record("ok", vec![week(0, 1, 1, 1)])];
    let before = records.clone();

    let report = backfill(&api, &repo(), &mut records, None, 0).await;

    assert_eq!(report.qualified, 1);
    assert_eq!(report.abandoned, 1);
    assert_eq!(records, before);
}

#[tokio::test]
async fn empty_commit_list_abandons_only_that_contributor() {
    let mut api = FakeApi::default();
    api.commits.insert("quiet".into(), Vec::new());
    api.commits.insert("busy".into(), vec!["x".into()]);
    api.details.insert("x".into(), detail("x", 3, 3, at(2024, 1, 3, 12)));

    let mut records = vec![summary_only("quiet", 2), summary_only("busy", 2)];
    let report = backfill(&api, &repo(), &mut records, None, 2).await;

    assert_eq!(report.recovered, 1);
    assert_eq!(report.abandoned, 1);
    assert!(records[0].weeks.is_empty());
    assert_eq!(records[1].total_additions(), 3);
}

#[tokio::test]
async fn failed_details_are_skipped_not_fatal() {
    let mut api = FakeApi::default();
    api.commits.insert("ada".into(), vec!["good".into(), "missing".into()]);
    api.details.insert("good".into(), detail("good", 9, 1, at(2024, 5, 1, 0)));

    let mut records = vec![summary_only("ada", 2)];
    backfill(&api, &repo(), &mut records, None, 0).await;

    assert_eq!(records[0].total_additions(), 9);
    assert_eq!(records[0].weeks[0].commits, 1);
}

#[tokio::test]
async fn at_most_ten_details_are_fetched_per_author() {
    let mut api = FakeApi::default();
    let shas: Vec<String> = (0..30).map(|i| format!("s{i}")).collect();
    for sha in &shas {
        api.details.insert(sha.clone(), detail(sha, 1, 0, at(2024, 2, 7, 0)));
    }
    api.commits.insert("ada".into(), shas);

    let mut records = vec![summary_only("ada", 30)];
    backfill(&api, &repo(), &mut records, None, 0).await;

    assert_eq!(FakeApi::calls(&api.detail_calls), DETAIL_FETCH_LIMIT);
    assert_eq!(records[0].total_additions(), DETAIL_FETCH_LIMIT as u64);
}

#[tokio::test]
async fn cached_details_skip_the_network() {
    let mut api = FakeApi::default();
    api.commits.insert("ada".into(), vec!["c1".into()]);
    api.details.insert("c1".into(), detail("c1", 2, 2, at(2024, 4, 2, 0)));
    let cache = Cache::in_memory().unwrap();

    let mut first = vec![summary_only("ada", 1)];
    backfill(&api, &repo(), &mut first, Some(&cache), 1).await;
    let mut second = vec![summary_only("ada", 1)];
    backfill(&api, &repo(), &mut second, Some(&cache), 1).await;

    assert_eq!(FakeApi::calls(&api.detail_calls), 1);
    assert_eq!(first, second);
}

#[tokio::test]
async fn incomplete_details_are_not_cached() {
    let mut api = FakeApi::default();
    api.commits.insert("ada".into(), vec!["c1".into(), "c2".into()]);
    api.details.insert("c1".into(), detail("c1", 2, 2, at(2024, 4, 2, 0)));
    api.details.insert(
        "c2".into(),
        CommitDetail {
            additions: None,
            deletions: None,
            ..detail("c2", 0, 0, at(2024, 4, 2, 0))
        },
    );
    let cache = Cache::in_memory().unwrap();

    let mut records = vec![summary_only("ada", 2)];
    backfill(&api, &repo(), &mut records, Some(&cache), 1).await;

    assert_eq!(cache.count_commit_details(&repo()).unwrap(), 1);
    assert!(cache.get_commit_detail(&repo(), "c2").unwrap().is_none());
}

#[test]
fn details_without_stats_or_date_are_ignored() {
    let dated = detail("a", 4, 0, at(2024, 6, 5, 0));
    let undated = CommitDetail {
        authored_at: None,
        ..detail("b", 100, 0, at(2024, 6, 5, 0))
    };
    let no_stats = CommitDetail {
        additions: None,
        deletions: None,
        ..detail("c", 0, 0, at(2024, 6, 5, 0))
    };

    let weeks = weeks_from_details(&[dated, undated, no_stats]);
    assert_eq!(weeks, vec![week(week_start(&at(2024, 6, 5, 0)), 4, 0, 1)]);
}

#[test]
fn recovered_weeks_replace_an_empty_set() {
    let mut r = summary_only("ada", 3);
    merge_backfilled_weeks(&mut r, vec![week(100, 1, 2, 3)]);
    assert_eq!(r.weeks, vec![week(100, 1, 2, 3)]);
}
