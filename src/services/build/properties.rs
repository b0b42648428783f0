//! Ruling Properties
//!
//! The analysis properties every ruling run injects. Together they make the
//! analyzer dump its findings into a fresh actual-output root, point it at
//! the baseline, and make it fail loudly instead of degrading silently.

use std::collections::BTreeMap;

use ruling_core::{ProjectDescriptor, RunLayout};

pub const PROJECT_KEY: &str = "sonar.projectKey";
pub const PROJECT_NAME: &str = "sonar.projectName";
pub const SOURCES: &str = "sonar.sources";
pub const TESTS: &str = "sonar.tests";
pub const HOST_URL: &str = "sonar.host.url";
pub const CPD_EXCLUSIONS: &str = "sonar.cpd.exclusions";
pub const IMPORT_UNKNOWN_FILES: &str = "sonar.import_unknown_files";
pub const SKIP_PACKAGE_DESIGN: &str = "sonar.skipPackageDesign";
pub const JAVA_BINARIES: &str = "sonar.java.binaries";
pub const DUMP_OLD: &str = "dump.old";
pub const DUMP_NEW: &str = "dump.new";
pub const DIFFERENCES: &str = "lits.differences";
pub const JAVA_XFILE: &str = "sonar.java.xfile";
pub const FAIL_ON_EXCEPTION: &str = "sonar.java.failOnException";

/// Property set for one project run against the service at `host_url`.
pub fn ruling_properties(
    descriptor: &ProjectDescriptor,
    layout: &RunLayout,
    host_url: &str,
) -> BTreeMap<String, String> {
    let name = descriptor.name();
    let mut props = BTreeMap::new();
    let mut set = |k: &str, v: String| {
        props.insert(k.to_string(), v);
    };

    set(PROJECT_KEY, descriptor.key().to_string());
    set(PROJECT_NAME, name.to_string());
    if !descriptor.source_dirs().is_empty() {
        set(SOURCES, descriptor.joined_source_dirs());
    }
    if !descriptor.test_dirs().is_empty() {
        set(TESTS, descriptor.joined_test_dirs());
    }
    set(HOST_URL, host_url.to_string());
    set(CPD_EXCLUSIONS, "**/*".to_string());
    set(IMPORT_UNKNOWN_FILES, "true".to_string());
    set(SKIP_PACKAGE_DESIGN, "true".to_string());
    set(
        JAVA_BINARIES,
        descriptor.binaries_path().to_string_lossy().into_owned(),
    );
    set(DUMP_OLD, path_string(&layout.expected_root(name)));
    set(DUMP_NEW, path_string(&layout.actual_root(name)));
    set(DIFFERENCES, path_string(&layout.differences_path(name)));
    set(JAVA_XFILE, "true".to_string());
    set(FAIL_ON_EXCEPTION, "true".to_string());

    props
}

fn path_string(path: &std::path::Path) -> String {
    path.to_string_lossy().into_owned()
}
