use std::time::{Duration, Instant};

use super::common::*;
use crate::workflows::onboarding::directory::{run_search, SearchDebouncer, SearchSession};

const DELAY: Duration = Duration::from_millis(500);

#[test]
fn rapid_keystrokes_coalesce_into_one_query() {
    let mut debouncer = SearchDebouncer::new(DELAY);
    let start = Instant::now();

    debouncer.input("a", start);
    debouncer.input("ay", start + Duration::from_millis(100));
    debouncer.input("aye", start + Duration::from_millis(200));

    assert!(debouncer.due(start + Duration::from_millis(400)).is_none());

    let ticket = debouncer
        .due(start + Duration::from_millis(701))
        .expect("query fires after the pause");
    assert_eq!(ticket.query, "aye");
    assert_eq!(ticket.generation, 1);

    assert!(debouncer.due(start + Duration::from_secs(5)).is_none());
}

#[test]
fn keystroke_restarts_the_window() {
    let mut debouncer = SearchDebouncer::new(DELAY);
    let start = Instant::now();

    debouncer.input("kha", start);
    // A keystroke late in the window pushes the deadline out.
    debouncer.input("khan", start + Duration::from_millis(450));

    assert!(debouncer.due(start + Duration::from_millis(600)).is_none());
    let ticket = debouncer
        .due(start + Duration::from_millis(951))
        .expect("restarted window elapses");
    assert_eq!(ticket.query, "khan");
}

#[test]
fn cancel_drops_the_pending_query() {
    let mut debouncer = SearchDebouncer::new(DELAY);
    let start = Instant::now();

    debouncer.input("ayesha", start);
    assert!(debouncer.is_pending());
    debouncer.cancel();
    assert!(!debouncer.is_pending());
    assert!(debouncer.due(start + Duration::from_secs(2)).is_none());
}

#[test]
fn generations_order_successive_queries() {
    let mut debouncer = SearchDebouncer::new(DELAY);
    let start = Instant::now();

    debouncer.input("first", start);
    let first = debouncer.due(start + DELAY).expect("first fires");

    debouncer.input("second", start + Duration::from_secs(2));
    let second = debouncer
        .due(start + Duration::from_secs(3))
        .expect("second fires");

    assert!(second.generation > first.generation);
}

#[test]
fn session_applies_last_write_and_clears() {
    let mut session = SearchSession::new(DELAY);
    let start = Instant::now();

    session.input("ayesha", start);
    let ticket = session.due(start + DELAY).expect("query fires");

    let directory = MemoryDirectory {
        records: vec![identity_record()],
    };
    session.apply(run_search(&directory, &ticket, crate::workflows::onboarding::DirectoryRole::Guest));
    assert_eq!(session.results().len(), 1);

    // A later (even stale) response overwrites wholesale.
    session.apply(Vec::new());
    assert!(session.results().is_empty());

    session.input("kh", start + Duration::from_secs(5));
    session.clear();
    assert!(!session.is_pending());
    assert!(session.results().is_empty());
}

#[test]
fn failed_lookups_degrade_to_no_results() {
    let mut session = SearchSession::new(DELAY);
    let start = Instant::now();

    session.input("ayesha", start);
    let ticket = session.due(start + DELAY).expect("query fires");

    let results = run_search(
        &FailingDirectory,
        &ticket,
        crate::workflows::onboarding::DirectoryRole::Guest,
    );
    assert!(results.is_empty());
}
