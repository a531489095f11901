mod common;

use common::{record, week};
use gboard::model::ScoredEntry;
use gboard::period::{aggregate_at, Period};
use gboard::rank::{compute_leaderboard_at, rank};
use gboard::score::ScoringConfig;
use pretty_assertions::assert_eq;

const DAY: i64 = 86_400;
const NOW: i64 = 1_717_200_000;

fn entry(login: &str, score: f64) -> ScoredEntry {
    ScoredEntry {
        rank: 0,
        login: login.to_string(),
        avatar_url: String::new(),
        profile_url: String::new(),
        commits: 1,
        additions: 0,
        deletions: 0,
        score,
        title: "Fresh Blood".into(),
        color: "#32CD32".into(),
    }
}

#[test]
fn cutoffs_per_period() {
    assert_eq!(Period::All.cutoff(NOW), 0);
    assert_eq!(Period::Week.cutoff(NOW), NOW - 7 * DAY);
    assert_eq!(Period::Month.cutoff(NOW), NOW - 28 * DAY);
}

#[test]
fn week_period_only_counts_recent_buckets() {
    let records = vec![record(
        "ada",
        vec![
            week(0, 100, 10, 5),
            week(NOW - 10 * DAY, 20, 2, 3),
            week(NOW - DAY, 7, 1, 2),
        ],
    )];

    let totals = aggregate_at(&records, Period::Week, NOW);
    assert_eq!(totals.len(), 1);
    assert_eq!((totals[0].commits, totals[0].additions, totals[0].deletions), (2, 7, 1));

    let month = aggregate_at(&records, Period::Month, NOW);
    assert_eq!((month[0].commits, month[0].additions, month[0].deletions), (5, 27, 3));

    let all = aggregate_at(&records, Period::All, NOW);
    assert_eq!((all[0].commits, all[0].additions, all[0].deletions), (10, 127, 13));
}

#[test]
fn bucket_exactly_at_cutoff_is_counted() {
    let records = vec![record(
        "ada",
        vec![week(NOW - 7 * DAY, 3, 1, 2), week(NOW - 7 * DAY - 1, 50, 50, 9)],
    )];

    let totals = aggregate_at(&records, Period::Week, NOW);
    assert_eq!((totals[0].commits, totals[0].additions, totals[0].deletions), (2, 3, 1));
}

#[test]
fn inactive_contributors_are_dropped_from_the_window() {
    let records = vec![
        record("old", vec![week(NOW - 60 * DAY, 5, 5, 1)]),
        record("new", vec![week(NOW - 2 * DAY, 1, 0, 1)]),
        record("zeros", vec![week(NOW - DAY, 0, 0, 0)]),
    ];

    let logins: Vec<String> = aggregate_at(&records, Period::Week, NOW)
        .into_iter()
        .map(|t| t.login)
        .collect();
    assert_eq!(logins, vec!["new".to_string()]);
}

#[test]
fn equal_scores_keep_their_input_order() {
    let ranked = rank(vec![
        entry("low", 1.0),
        entry("tie-a", 5.0),
        entry("top", 9.5),
        entry("tie-b", 5.0),
    ]);

    let order: Vec<(usize, &str)> = ranked.iter().map(|e| (e.rank, e.login.as_str())).collect();
    assert_eq!(order, vec![(1, "top"), (2, "tie-a"), (3, "tie-b"), (4, "low")]);
}

#[test]
fn leaderboard_scores_classifies_and_ranks() {
    let records = vec![
        record("casual", vec![week(NOW - DAY, 30, 5, 2)]),
        record("machine", vec![week(NOW - DAY, 20_000, 9_000, 520)]),
        record("sleeper", vec![week(0, 1, 1, 1)]),
    ];

    let board = compute_leaderboard_at(&records, Period::Month, &ScoringConfig::default(), NOW);

    assert_eq!(board.len(), 2);
    assert_eq!(board[0].login, "machine");
    assert_eq!(board[0].rank, 1);
    assert_eq!(board[0].title, "Code Architect");
    assert_eq!(board[0].color, "#FFD700");
    assert_eq!(board[1].login, "casual");
    assert_eq!(board[1].rank, 2);
    assert_eq!(board[1].title, "Fresh Blood");
    assert!(board[0].score > board[1].score);
}

#[test]
fn switching_period_reuses_the_same_records() {
    let records = vec![
        record("steady", vec![week(0, 5_000, 1_000, 200), week(NOW - DAY, 10, 0, 1)]),
        record("burst", vec![week(NOW - 3 * DAY, 900, 100, 30)]),
    ];
    let config = ScoringConfig::default();

    let all = compute_leaderboard_at(&records, Period::All, &config, NOW);
    let weekly = compute_leaderboard_at(&records, Period::Week, &config, NOW);

    assert_eq!(all[0].login, "steady");
    assert_eq!(weekly[0].login, "burst");
    assert_eq!(records[0].weeks.len(), 2);
}

#[test]
fn period_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Period::Month).unwrap(), "\"month\"");
    assert_eq!(Period::Week.to_string(), "week");
}
