//! Baseline Comparator Integration Tests
//!
//! Tree comparison through the public baseline API, with trees laid out the
//! way a ruling run lays them out on disk.

use std::fs;

use ruling_baseline::{BaselineComparator, BaselineStore, DifferenceKind};
use ruling_core::RunLayout;

use super::support::write_tree;

#[test]
fn test_byte_identical_trees_produce_empty_differences_file() {
    let temp = tempfile::tempdir().unwrap();
    let layout = RunLayout::new(temp.path().join("target"), temp.path().join("expected"));
    let files = [
        ("Calc.java.xml", "<rules/>"),
        ("squid-S1144.json", "{\"calc:Calc.java\":[12]}"),
        ("nested/dir/Other.java.xml", "<rules><r line=\"3\"/></rules>"),
    ];
    write_tree(&layout.expected_root("calc"), &files);
    write_tree(&layout.actual_root("calc"), &files);

    let report = BaselineComparator::new()
        .compare_and_persist(
            "checkstyle-test-project",
            &layout.expected_root("calc"),
            &layout.actual_root("calc"),
            &layout.differences_path("calc"),
        )
        .unwrap();

    assert!(report.is_empty());
    assert_eq!(
        fs::read_to_string(layout.differences_path("calc")).unwrap(),
        ""
    );
}

#[test]
fn test_exactly_one_missing_file() {
    let temp = tempfile::tempdir().unwrap();
    let expected = temp.path().join("expected/calc");
    let actual = temp.path().join("actual/calc");
    write_tree(
        &expected,
        &[("a.json", "1"), ("b.json", "2"), ("c/d.json", "3")],
    );
    write_tree(&actual, &[("a.json", "1"), ("c/d.json", "3")]);

    let report = BaselineComparator::new()
        .compare("calc", &expected, &actual)
        .unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(report.entries()[0].path, "b.json");
    assert_eq!(report.entries()[0].kind, DifferenceKind::Missing);
}

#[test]
fn test_report_is_ordered_by_path() {
    let temp = tempfile::tempdir().unwrap();
    let expected = temp.path().join("e");
    let actual = temp.path().join("a");
    write_tree(&expected, &[("z.json", "1"), ("m.json", "1"), ("b/a.json", "1")]);
    write_tree(&actual, &[("a.json", "1"), ("m.json", "2")]);

    let report = BaselineComparator::new()
        .compare("calc", &expected, &actual)
        .unwrap();

    let paths: Vec<&str> = report.entries().iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["a.json", "b/a.json", "m.json", "z.json"]);
    assert_eq!(report.count(DifferenceKind::Extra), 1);
    assert_eq!(report.count(DifferenceKind::Missing), 2);
    assert_eq!(report.count(DifferenceKind::ContentMismatch), 1);
}

#[test]
fn test_repeated_comparison_is_idempotent() {
    let temp = tempfile::tempdir().unwrap();
    let expected = temp.path().join("e");
    let actual = temp.path().join("a");
    let out = temp.path().join("calc_differences");
    write_tree(&expected, &[("Calc.java.xml", "<rules/>")]);
    write_tree(&actual, &[("Calc.java.xml", "<rules><r/></rules>")]);

    let comparator = BaselineComparator::new();
    let first = comparator
        .compare_and_persist("calc", &expected, &actual, &out)
        .unwrap();
    let first_text = fs::read_to_string(&out).unwrap();
    let second = comparator
        .compare_and_persist("calc", &expected, &actual, &out)
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first_text, fs::read_to_string(&out).unwrap());
    assert!(first_text.contains("-<rules/>"));
    assert!(first_text.contains("+<rules><r/></rules>"));
}

#[test]
fn test_store_lists_projects_and_rejects_unknown() {
    let temp = tempfile::tempdir().unwrap();
    write_tree(temp.path(), &[("calc/Calc.java.xml", "<rules/>"), ("jdk/x.json", "{}")]);

    let store = BaselineStore::new(temp.path());
    assert_eq!(store.projects().unwrap(), vec!["calc", "jdk"]);
    assert!(store.has_project("calc"));
    assert!(store.expected_root("guava").is_err());
    assert_eq!(store.load("calc").unwrap().len(), 1);
}
