//! Build Job Executor Integration Tests
//!
//! Property injection against a prepared workspace.

use std::sync::Arc;

use ruling_harness::models::{BuildJob, BuildSettings};
use ruling_harness::services::build::properties::{
    CPD_EXCLUSIONS, DIFFERENCES, DUMP_NEW, DUMP_OLD, FAIL_ON_EXCEPTION, IMPORT_UNKNOWN_FILES,
    JAVA_BINARIES, JAVA_XFILE, SKIP_PACKAGE_DESIGN,
};
use ruling_harness::services::build::BuildJobExecutor;
use ruling_harness::services::environment::ServiceHandle;
use ruling_harness::services::workspace::WorkspacePreparer;

use super::support::{FakeAdapter, Harness};

#[tokio::test]
async fn test_property_injection_order_does_not_change_outcome() {
    let harness = Harness::new().with_baseline(&[("Calc.java.xml", "<rules/>")]);
    let plan = harness.plan();
    let handle = ServiceHandle::new("http://localhost:9000", harness.root().join("service"), "7.9");
    let workspace = WorkspacePreparer::new(harness.registry(false))
        .materialize(&plan.fixture_root, &plan.descriptor)
        .unwrap();
    let adapter = harness.adapter(&[("Calc.java.xml", "<rules/>")], true);
    let executor = BuildJobExecutor::new(adapter.clone(), harness.layout());

    let base = executor.job_for(&handle, &workspace, &plan.descriptor, &BuildSettings::default());
    let forward: Vec<(String, String)> = base
        .properties()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let mut backward = forward.clone();
    backward.reverse();

    let job_a = BuildJob::builder(base.target().clone())
        .properties(forward)
        .build();
    let job_b = BuildJob::builder(base.target().clone())
        .properties(backward)
        .build();
    assert_eq!(job_a, job_b);

    let outcome_a = executor.execute(&handle, &workspace, &job_a).await;
    let outcome_b = executor.execute(&handle, &workspace, &job_b).await;

    assert_eq!(outcome_a.success, outcome_b.success);
    assert_eq!(outcome_a.exit_code, outcome_b.exit_code);
    let seen = adapter.seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);
}

#[tokio::test]
async fn test_job_carries_every_ruling_property() {
    let harness = Harness::new();
    let plan = harness.plan();
    let handle = ServiceHandle::new("http://localhost:9000", harness.root().join("service"), "7.9");
    let workspace = WorkspacePreparer::new(harness.registry(false))
        .materialize(&plan.fixture_root, &plan.descriptor)
        .unwrap();
    let adapter = Arc::new(FakeAdapter::new(harness.events.clone(), &[], true));
    let executor = BuildJobExecutor::new(adapter, harness.layout());

    let job = executor.job_for(&handle, &workspace, &plan.descriptor, &plan.build);
    let layout = harness.layout();

    assert_eq!(job.property(CPD_EXCLUSIONS), Some("**/*"));
    assert_eq!(job.property(IMPORT_UNKNOWN_FILES), Some("true"));
    assert_eq!(job.property(SKIP_PACKAGE_DESIGN), Some("true"));
    assert_eq!(job.property(JAVA_BINARIES), Some("."));
    assert_eq!(job.property(JAVA_XFILE), Some("true"));
    assert_eq!(job.property(FAIL_ON_EXCEPTION), Some("true"));
    assert_eq!(
        job.property(DUMP_OLD).unwrap(),
        layout.expected_root("calc").to_string_lossy()
    );
    assert_eq!(
        job.property(DUMP_NEW).unwrap(),
        layout.actual_root("calc").to_string_lossy()
    );
    assert_eq!(
        job.property(DIFFERENCES).unwrap(),
        layout.differences_path("calc").to_string_lossy()
    );
    assert!(job.debug_logs());
}
