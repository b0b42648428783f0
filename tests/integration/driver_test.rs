//! Harness Driver Integration Tests
//!
//! End-to-end runs through the state machine with fake service, registry
//! and build adapter.

use std::fs;

use ruling_baseline::DifferenceKind;
use ruling_harness::services::driver::HarnessState;
use ruling_harness::utils::error::HarnessError;

use super::support::{events_of, Harness};

const BASELINE: &[(&str, &str)] = &[("Calc.java.xml", "<rules/>")];

#[tokio::test]
async fn test_identical_snapshot_passes_with_empty_differences_file() {
    let harness = Harness::new().with_baseline(BASELINE);
    let mut driver = harness.driver(
        harness.control(false),
        harness.registry(false),
        harness.adapter(&[("Calc.java.xml", "<rules/>")], true),
    );

    let report = driver.run(&harness.plan()).await;

    assert!(report.passed(), "{:?}", report.result);
    assert_eq!(
        report.states,
        vec![
            HarnessState::Init,
            HarnessState::EnvironmentUp,
            HarnessState::ProjectReady,
            HarnessState::BuildRan,
            HarnessState::Compared,
            HarnessState::Done,
        ]
    );
    let differences = fs::read_to_string(harness.layout().differences_path("calc")).unwrap();
    assert!(differences.is_empty());
    assert!(report.diagnostics.is_none());
    assert_eq!(
        events_of(&harness.events),
        vec![
            "launch",
            "provision checkstyle-test-project",
            "profile checkstyle-test-project rules",
            "build",
            "shutdown",
        ]
    );
}

#[tokio::test]
async fn test_content_mismatch_fails_without_diagnostics() {
    let harness = Harness::new().with_baseline(BASELINE).with_service_logs(5);
    let mut driver = harness.driver(
        harness.control(false),
        harness.registry(false),
        harness.adapter(&[("Calc.java.xml", "<rules><r/></rules>")], true),
    );

    let report = driver.run(&harness.plan()).await;

    assert_eq!(report.final_state(), HarnessState::Aborted);
    assert!(report.diagnostics.is_none());
    assert!(report.comparator_invoked);
    assert_eq!(events_of(&harness.events).last().unwrap(), "shutdown");

    let differences = report.differences.clone().unwrap();
    assert_eq!(differences.len(), 1);
    let entry = &differences.entries()[0];
    assert_eq!(entry.path, "Calc.java.xml");
    assert_eq!(entry.kind, DifferenceKind::ContentMismatch);
    assert_eq!(entry.expected.as_deref(), Some("<rules/>"));
    assert_eq!(entry.actual.as_deref(), Some("<rules><r/></rules>"));

    match report.into_result() {
        Err(HarnessError::ComparisonMismatch(report)) => assert_eq!(report.len(), 1),
        other => panic!("expected comparison mismatch, got {:?}", other),
    }

    let persisted = fs::read_to_string(harness.layout().differences_path("calc")).unwrap();
    assert!(persisted.contains("CONTENT_MISMATCH Calc.java.xml"));
}

#[tokio::test]
async fn test_build_failure_dumps_all_streams_and_skips_comparison() {
    let harness = Harness::new().with_baseline(BASELINE).with_service_logs(300);
    let mut driver = harness.driver(
        harness.control(false),
        harness.registry(false),
        harness.adapter(&[], false),
    );

    let report = driver.run(&harness.plan()).await;

    assert!(!report.comparator_invoked);
    assert!(report.differences.is_none());
    assert!(!harness.layout().differences_path("calc").exists());
    assert_eq!(
        &report.states[report.states.len() - 2..],
        &[HarnessState::BuildRan, HarnessState::Aborted]
    );
    assert!(!report.build.as_ref().unwrap().success);

    let dump = report.diagnostics.as_ref().unwrap();
    assert_eq!(
        dump.stream_names(),
        vec!["sonar.log", "ce.log", "es.log", "web.log"]
    );
    assert!(dump.streams.iter().all(|s| s.lines.len() == 200));

    let rendered = dump.render();
    for name in ["sonar.log", "ce.log", "es.log", "web.log"] {
        assert!(rendered.contains(&format!("START {}", name)));
        assert!(rendered.contains(&format!("END {}", name)));
    }
    let starts: Vec<usize> = ["sonar.log", "ce.log", "es.log", "web.log"]
        .iter()
        .map(|n| rendered.find(&format!("START {}", n)).unwrap())
        .collect();
    assert!(starts.windows(2).all(|w| w[0] < w[1]));

    assert_eq!(events_of(&harness.events).last().unwrap(), "shutdown");
    assert!(matches!(report.into_result(), Err(HarnessError::Build(_))));
}

#[tokio::test]
async fn test_start_failure_submits_nothing() {
    let harness = Harness::new().with_baseline(BASELINE);
    let adapter = harness.adapter(&[("Calc.java.xml", "<rules/>")], true);
    let mut driver = harness.driver(
        harness.control(true),
        harness.registry(false),
        adapter.clone(),
    );

    let report = driver.run(&harness.plan()).await;

    assert_eq!(report.states, vec![HarnessState::Init, HarnessState::Aborted]);
    assert!(report.build.is_none());
    assert!(adapter.seen.lock().unwrap().is_empty());
    assert_eq!(events_of(&harness.events), vec!["launch"]);
    assert!(matches!(
        report.into_result(),
        Err(HarnessError::EnvironmentStartup(_))
    ));
}

#[tokio::test]
async fn test_missing_plugin_is_startup_failure() {
    let harness = Harness::new().with_baseline(BASELINE);
    fs::remove_file(harness.root().join("plugin/ruling-plugin-1.0.jar")).unwrap();
    let mut driver = harness.driver(
        harness.control(false),
        harness.registry(false),
        harness.adapter(&[], true),
    );

    let report = driver.run(&harness.plan()).await;

    assert!(events_of(&harness.events).is_empty());
    assert!(matches!(
        report.into_result(),
        Err(HarnessError::EnvironmentStartup(_))
    ));
}

#[tokio::test]
async fn test_provisioning_rejection_dumps_diagnostics_and_stops() {
    let harness = Harness::new().with_baseline(BASELINE).with_service_logs(3);
    let mut driver = harness.driver(
        harness.control(false),
        harness.registry(true),
        harness.adapter(&[], true),
    );

    let report = driver.run(&harness.plan()).await;

    assert_eq!(
        report.states,
        vec![
            HarnessState::Init,
            HarnessState::EnvironmentUp,
            HarnessState::Aborted
        ]
    );
    assert_eq!(report.diagnostics.as_ref().unwrap().streams.len(), 4);
    assert_eq!(
        events_of(&harness.events),
        vec!["launch", "provision checkstyle-test-project", "shutdown"]
    );
    assert!(matches!(
        report.into_result(),
        Err(HarnessError::Provisioning(_))
    ));
}

#[tokio::test]
async fn test_missing_fixture_aborts_as_provisioning_failure() {
    let harness = Harness::new().with_baseline(BASELINE).with_service_logs(3);
    fs::remove_dir_all(harness.root().join("fixtures/calc")).unwrap();
    let adapter = harness.adapter(&[], true);
    let mut driver = harness.driver(
        harness.control(false),
        harness.registry(false),
        adapter.clone(),
    );

    let report = driver.run(&harness.plan()).await;

    assert_eq!(
        report.states,
        vec![
            HarnessState::Init,
            HarnessState::EnvironmentUp,
            HarnessState::Aborted
        ]
    );
    assert!(adapter.seen.lock().unwrap().is_empty());
    assert_eq!(report.diagnostics.as_ref().unwrap().streams.len(), 4);
    assert_eq!(events_of(&harness.events), vec!["launch", "shutdown"]);
    assert!(matches!(
        report.into_result(),
        Err(HarnessError::Provisioning(_))
    ));
}

#[tokio::test]
async fn test_missing_baseline_is_configuration_error() {
    let harness = Harness::new();
    let mut driver = harness.driver(
        harness.control(false),
        harness.registry(false),
        harness.adapter(&[("Calc.java.xml", "<rules/>")], true),
    );

    let report = driver.run(&harness.plan()).await;

    assert!(report.diagnostics.is_none());
    assert_eq!(events_of(&harness.events).last().unwrap(), "shutdown");
    assert!(matches!(report.into_result(), Err(HarnessError::Config(_))));
}

#[tokio::test]
async fn test_stale_outputs_do_not_leak_into_next_run() {
    let harness = Harness::new().with_baseline(BASELINE);
    let layout = harness.layout();
    super::support::write_tree(
        &layout.actual_root("calc"),
        &[("Leftover.java.xml", "<rules><old/></rules>")],
    );
    fs::write(layout.differences_path("calc"), "EXTRA Leftover.java.xml\n").unwrap();

    let mut driver = harness.driver(
        harness.control(false),
        harness.registry(false),
        harness.adapter(&[("Calc.java.xml", "<rules/>")], true),
    );
    let report = driver.run(&harness.plan()).await;

    assert!(report.passed(), "{:?}", report.result);
    assert!(!layout.actual_root("calc").join("Leftover.java.xml").exists());
}

#[tokio::test]
async fn test_build_log_is_kept_next_to_outputs() {
    let harness = Harness::new().with_baseline(BASELINE);
    let mut driver = harness.driver(
        harness.control(false),
        harness.registry(false),
        harness.adapter(&[("Calc.java.xml", "<rules/>")], true),
    );

    let report = driver.run(&harness.plan()).await;

    let build = report.build.unwrap();
    assert_eq!(
        build.build_log.as_deref(),
        Some(harness.layout().build_log_path("calc").as_path())
    );
    assert_eq!(
        fs::read_to_string(harness.layout().build_log_path("calc")).unwrap(),
        "ANALYSIS SUCCESSFUL"
    );
}
