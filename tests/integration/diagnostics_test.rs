//! Diagnostics Collector Integration Tests

use std::fs;

use ruling_core::{LogCategory, LogStreamRef};
use ruling_harness::services::diagnostics::{DiagnosticsCollector, LOGS_NUMBER_LINES};

#[test]
fn test_never_more_than_200_lines_per_stream() {
    let temp = tempfile::tempdir().unwrap();
    let logs = temp.path().join("logs");
    fs::create_dir_all(&logs).unwrap();
    for (file, lines) in [("sonar.log", 10), ("ce.log", 200), ("es.log", 201), ("web.log", 5000)] {
        let content: String = (0..lines).map(|i| format!("{} line {}\n", file, i)).collect();
        fs::write(logs.join(file), content).unwrap();
    }

    let dump = DiagnosticsCollector::new().dump(&LogStreamRef::standard_set(temp.path()));

    let sizes: Vec<usize> = dump.streams.iter().map(|s| s.lines.len()).collect();
    assert_eq!(sizes, vec![10, 200, 200, 200]);
    assert!(dump.streams.iter().all(|s| s.lines.len() <= LOGS_NUMBER_LINES));
    assert_eq!(dump.streams[3].lines.last().unwrap(), "web.log line 4999");
}

#[test]
fn test_absent_subsystems_are_skipped() {
    let temp = tempfile::tempdir().unwrap();
    let logs = temp.path().join("logs");
    fs::create_dir_all(&logs).unwrap();
    fs::write(logs.join("web.log"), "started\n").unwrap();

    let dump = DiagnosticsCollector::new().dump(&LogStreamRef::standard_set(temp.path()));

    assert_eq!(dump.stream_names(), vec!["web.log"]);
    assert_eq!(dump.skipped, vec!["sonar.log", "ce.log", "es.log"]);
    assert!(dump.warnings.is_empty());
}

#[test]
fn test_non_utf8_content_is_read_lossily() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("es.log");
    fs::write(&path, b"ok\n\xff\xfe broken\n").unwrap();

    let dump = DiagnosticsCollector::new().dump(&[LogStreamRef::new(LogCategory::Indexing, &path)]);

    assert_eq!(dump.streams[0].lines.len(), 2);
    assert!(dump.streams[0].lines[1].ends_with("broken"));
}
