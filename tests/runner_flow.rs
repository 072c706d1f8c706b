// tests/runner_flow.rs
mod common;

use strava_scrape::{
    config::{consts::{activity_url, athlete_url}, ScrapeOptions},
    progress::{NullProgress, Progress},
    run, ScrapeError, ShardAssignment,
};

use common::{activity_page, athlete_page, FakeSession, RecordingStore};

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[derive(Default)]
struct Tally {
    begun: Option<usize>,
    done: Vec<String>,
    failed: Vec<String>,
    finished: bool,
}

impl Progress for Tally {
    fn begin(&mut self, total: usize) { self.begun = Some(total); }
    fn item_done(&mut self, id: &str) { self.done.push(id.to_string()); }
    fn item_failed(&mut self, id: &str) { self.failed.push(id.to_string()); }
    fn finish(&mut self) { self.finished = true; }
}

#[test]
fn saves_newest_activity_per_athlete() {
    let mut session = FakeSession::new()
        .page(athlete_url("123"), athlete_page(&["1000001", "1000003", "1000002"]))
        .page(activity_url("1000003"), activity_page("123", 5000.0));
    let mut store = RecordingStore::default();
    let mut tally = Tally::default();

    let summary = run(
        &ScrapeOptions::offline(), ShardAssignment::whole(), &ids(&["123"]),
        &mut session, &mut store, Some(&mut tally),
    ).unwrap();

    assert_eq!(summary.activities_saved, 1);
    assert_eq!(summary.athletes_processed, 1);
    assert_eq!(store.saved.len(), 1);
    assert_eq!(store.saved[0].activity_id, "1000003");
    assert_eq!(store.saved[0].strava_athlete_id, "123");
    assert_eq!(store.saved[0].distance_m, Some(5000));
    assert_eq!(tally.begun, Some(1));
    assert_eq!(tally.done, vec!["123"]);
    assert!(tally.finished);
}

#[test]
fn mismatched_athlete_is_never_persisted() {
    let mut session = FakeSession::new()
        .page(athlete_url("123"), athlete_page(&["2000001"]))
        .page(activity_url("2000001"), activity_page("999", 5000.0));
    let mut store = RecordingStore::default();

    let summary = run(
        &ScrapeOptions::offline(), ShardAssignment::whole(), &ids(&["123"]),
        &mut session, &mut store, Some(&mut NullProgress),
    ).unwrap();

    assert!(store.saved.is_empty());
    assert_eq!(summary.activities_skipped, 1);
    assert_eq!(summary.activities_saved, 0);
}

#[test]
fn private_profile_skips_only_that_athlete() {
    let mut session = FakeSession::new()
        .page(athlete_url("1"), r#"<div class="limited_profile">private</div>"#)
        .page(athlete_url("2"), athlete_page(&["3000001"]))
        .page(activity_url("3000001"), activity_page("2", 1200.0));
    let mut store = RecordingStore::default();
    let mut tally = Tally::default();

    let summary = run(
        &ScrapeOptions::offline(), ShardAssignment::whole(), &ids(&["1", "2"]),
        &mut session, &mut store, Some(&mut tally),
    ).unwrap();

    assert_eq!(summary.athletes_skipped, 1);
    assert_eq!(summary.athletes_processed, 1);
    assert_eq!(store.saved.len(), 1);
    assert_eq!(tally.failed, vec!["1"]);
    assert_eq!(tally.done, vec!["2"]);
}

#[test]
fn athlete_without_activities_and_empty_pages_are_skipped() {
    let mut session = FakeSession::new()
        .page(athlete_url("1"), "<html><body><h1>Nobody</h1></body></html>")
        .page(athlete_url("2"), athlete_page(&["4000001"]))
        .page(activity_url("4000001"), "<html><body><p>blank</p></body></html>");
    let mut store = RecordingStore::default();

    let summary = run(
        &ScrapeOptions::offline(), ShardAssignment::whole(), &ids(&["1", "2"]),
        &mut session, &mut store, None,
    ).unwrap();

    assert_eq!(summary.athletes_skipped, 1);
    assert_eq!(summary.activities_skipped, 1);
    assert!(store.saved.is_empty());
}

#[test]
fn redirect_away_from_profile_times_out() {
    let mut session = FakeSession::new()
        .page(athlete_url("5"), athlete_page(&["5000001"]))
        .redirect(&athlete_url("5"), "https://www.strava.com/login");
    let mut store = RecordingStore::default();

    let summary = run(
        &ScrapeOptions::offline(), ShardAssignment::whole(), &ids(&["5"]),
        &mut session, &mut store, None,
    ).unwrap();

    assert_eq!(summary.athletes_skipped, 1);
    assert!(session.visited.iter().all(|u| !u.contains("/activities/")));
}

#[test]
fn store_failure_ends_the_run() {
    let mut session = FakeSession::new()
        .page(athlete_url("1"), athlete_page(&["6000001"]))
        .page(activity_url("6000001"), activity_page("1", 1000.0))
        .page(athlete_url("2"), athlete_page(&["6000002"]))
        .page(activity_url("6000002"), activity_page("2", 1000.0));
    let mut store = RecordingStore { broken: true, ..RecordingStore::default() };
    let mut tally = Tally::default();

    let err = run(
        &ScrapeOptions::offline(), ShardAssignment::whole(), &ids(&["1", "2"]),
        &mut session, &mut store, Some(&mut tally),
    ).unwrap_err();

    assert!(matches!(err, ScrapeError::Persistence(_)));
    assert!(!session.visited.contains(&athlete_url("2")));
    assert!(tally.finished);
}

#[test]
fn shard_limits_the_athletes_visited() {
    let mut session = FakeSession::new();
    for a in ["10", "11", "12", "13", "14"] {
        session = session.page(athlete_url(a), "<div>This profile is private</div>");
    }
    let mut store = RecordingStore::default();
    let shard = ShardAssignment::new(2, 2).unwrap();

    let summary = run(
        &ScrapeOptions::offline(), shard, &ids(&["10", "11", "12", "13", "14"]),
        &mut session, &mut store, None,
    ).unwrap();

    assert_eq!(summary.athletes_skipped, 2);
    assert_eq!(session.visited, vec![athlete_url("13"), athlete_url("14")]);
}

#[test]
fn empty_shard_is_an_error() {
    let mut session = FakeSession::new();
    let mut store = RecordingStore::default();
    let shard = ShardAssignment::new(3, 3).unwrap();
    let err = run(
        &ScrapeOptions::offline(), shard, &ids(&["1", "2"]),
        &mut session, &mut store, None,
    ).unwrap_err();
    assert!(matches!(err, ScrapeError::NoAthletes));
}
