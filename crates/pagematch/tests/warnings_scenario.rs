//! End-to-end scenarios for a CI server publishing compiler warnings.
//!
//! A job and its build pages are scripted on a `MockSession`; the tests
//! drive them only through the public matcher API.

#![allow(clippy::unwrap_used)]

use pagematch::prelude::*;
use pagematch::{AssertionMode, MockSession};
use serde_json::json;

const JOB: &str = "http://localhost:8080/job/warnings/";
const BUILD: &str = "http://localhost:8080/job/warnings/1/";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn ci_session(warnings: usize) -> MockSession {
    init_tracing();
    let session = MockSession::new();
    session.set_structured_state(
        format!("{JOB}api/json"),
        json!({ "name": "warnings", "lastBuild": { "number": 1 } }),
    );
    session.set_root_text_at(BUILD, format!("Build #1\nJava Warnings: {warnings}"));
    if warnings > 0 {
        session.add_element_at(
            BUILD,
            &by::action("Java Warnings"),
            ElementHandle::new("a-1", "a").with_text("Java Warnings"),
        );
    }
    session
}

// ============================================================================
// Clean build
// ============================================================================

#[test]
fn clean_build_has_no_warnings_action() {
    let session = ci_session(0);
    let config = PageConfig::default();
    let job = config.container_page(&session, "job/warnings/").unwrap();
    let build = config.page(&session, "job/warnings/1/").unwrap();

    assert_that(&job, &page_object_exists()).unwrap();
    assert_that(&build, &not(has_action("Java Warnings"))).unwrap();

    build.open().unwrap();
    assert_that(&session, &has_content("Java Warnings: 0")).unwrap();
}

#[test]
fn clean_build_report_mentions_action_on_failure() {
    let session = ci_session(0);
    let build = PageConfig::default()
        .page(&session, "job/warnings/1/")
        .unwrap();

    let err = assert_that(&build, &has_action("Java Warnings")).unwrap_err();
    let PagematchError::AssertionFailed { message } = err else {
        panic!("expected assertion failure, got {err:?}");
    };
    assert!(message.contains("Expected: contains action titled \"Java Warnings\""));
    assert!(message.contains(&format!("\"{BUILD}\" does not have action: \"Java Warnings\"")));
}

// ============================================================================
// Build with warnings
// ============================================================================

#[test]
fn build_with_warnings_shows_action_and_count() {
    let session = ci_session(3);
    let build = PageConfig::default()
        .page(&session, "job/warnings/1/")
        .unwrap();

    assert_that(&build, &has_action("Java Warnings")).unwrap();
    assert_that(&session, &has_content("Java Warnings: 3")).unwrap();

    let count = contains_regexp(r"Java Warnings: [1-9]\d*").unwrap();
    let text = session.root_text().unwrap();
    assert_that(text.as_str(), &count).unwrap();
}

#[test]
fn action_is_only_on_its_build_page() {
    let session = ci_session(3);
    let config = PageConfig::default();
    let job = config.container_page(&session, "job/warnings/").unwrap();

    assert_that(&job, &not(has_action("Java Warnings"))).unwrap();
    assert_eq!(session.current_address().unwrap(), JOB);
}

// ============================================================================
// Missing objects and soft assertions
// ============================================================================

#[test]
fn deleted_job_does_not_exist() {
    let session = ci_session(0);
    let gone = PageConfig::default()
        .container_page(&session, "job/deleted/")
        .unwrap();

    assert_that(&gone, &not(page_object_exists())).unwrap();
    let err = assert_that(&gone, &page_object_exists()).unwrap_err();
    assert!(err
        .to_string()
        .contains("http://localhost:8080/job/deleted/ does not exist"));
}

#[test]
fn soft_assertions_report_every_mismatch() {
    let session = ci_session(2);
    let config = PageConfig::default();
    let build = config.page(&session, "job/warnings/1/").unwrap();
    let gone = config.container_page(&session, "job/deleted/").unwrap();

    let mut soft = SoftAssertions::new();
    assert!(soft.check_that(&build, &has_action("Java Warnings")).unwrap());
    assert!(!soft.check_that(&session, &has_content("Java Warnings: 0")).unwrap());
    assert!(!soft.check_that(&gone, &page_object_exists()).unwrap());

    let err = soft.verify().unwrap_err();
    assert!(matches!(
        err,
        PagematchError::SoftAssertionsFailed { count: 2, .. }
    ));
}

#[test]
fn fail_fast_stops_at_first_mismatch() {
    let session = ci_session(2);
    let mut soft = SoftAssertions::with_mode(AssertionMode::FailFast);
    let err = soft
        .check_that(&session, &has_content("Java Warnings: 0"))
        .unwrap_err();
    assert!(matches!(err, PagematchError::AssertionFailed { .. }));
}

#[test]
fn session_failure_is_not_reported_as_mismatch() {
    let session = ci_session(0);
    session.fail_navigation(BUILD, "connection reset");
    let build = PageConfig::default()
        .page(&session, "job/warnings/1/")
        .unwrap();

    let err = assert_that(&build, &not(has_action("Java Warnings"))).unwrap_err();
    assert!(matches!(err, PagematchError::NavigationFailed { .. }));
}
