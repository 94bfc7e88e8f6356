use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const SYSTEM_INFO: &str =
    r#"{"version":"1.2.3","buildTime":"2025-09-02T08:10:26.000","revision":"abcDEF"}"#;

const CORE_SUITE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuite name="com.example.CoreTest" time="1.5" tests="2" errors="0" skipped="0" failures="0">
  <properties>
    <property name="java.version" value="17"/>
  </properties>
  <testcase name="a" classname="com.example.CoreTest" time="0.7"/>
  <testcase name="b" classname="com.example.CoreTest" time="0.8"/>
</testsuite>
"#;

const EDGE_SUITE: &str = r#"<testsuite name="com.example.EdgeTest" time="0.5" tests="1" errors="0" skipped="0" failures="1">
  <testcase name="c" classname="com.example.EdgeTest" time="0.5">
    <failure message="expected true" type="AssertionError">trace</failure>
  </testcase>
</testsuite>
"#;

fn tally() -> Command {
    Command::cargo_bin("tally").unwrap()
}

fn write_reports(dir: &Path) {
    fs::write(dir.join("system_info.json"), SYSTEM_INFO).unwrap();
    fs::write(dir.join("TEST-com.example.CoreTest.xml"), CORE_SUITE).unwrap();
    fs::write(dir.join("TEST-com.example.EdgeTest.xml"), EDGE_SUITE).unwrap();
}

fn read_json(path: &Path) -> Value {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|_| panic!("missing output file: {}", path.display()));
    serde_json::from_str(&content).expect("invalid JSON output")
}

#[test]
fn missing_reports_directory_exits_one() {
    let tmp = tempdir().unwrap();
    tally()
        .current_dir(tmp.path())
        .args(["process", "postgres"])
        .arg("--reports-dir")
        .arg(tmp.path().join("nope"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Reports directory not found"));
}

#[test]
fn missing_descriptor_exits_one() {
    let tmp = tempdir().unwrap();
    let reports = tmp.path().join("reports");
    fs::create_dir(&reports).unwrap();
    fs::write(reports.join("TEST-com.example.CoreTest.xml"), CORE_SUITE).unwrap();

    tally()
        .current_dir(tmp.path())
        .arg("process")
        .arg("--reports-dir")
        .arg(&reports)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("system_info.json not found"));
}

#[test]
fn consolidates_into_slugged_version_path() {
    let tmp = tempdir().unwrap();
    let reports = tmp.path().join("reports");
    fs::create_dir(&reports).unwrap();
    write_reports(&reports);
    let output = tmp.path().join("results");

    tally()
        .current_dir(tmp.path())
        .args(["process", "postgres"])
        .arg("--reports-dir")
        .arg(&reports)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processing complete!"));

    let consolidated = output.join("123/2025-09-02_08-10-26_abcdef/postgres.json");
    let v = read_json(&consolidated);
    assert_eq!(v["system_info"]["version"], "1.2.3");
    assert_eq!(v["results"]["com.example.CoreTest"]["tests"], 2);
    assert_eq!(
        v["results"]["com.example.CoreTest"]["properties"]["java.version"],
        "17"
    );
    let failure = &v["results"]["com.example.EdgeTest"]["testcases"][0]["failure"];
    assert_eq!(failure["message"], "expected true");
    assert_eq!(failure["type"], "AssertionError");
    assert_eq!(failure["text"], "trace");
}

#[test]
fn unparseable_document_is_skipped_not_fatal() {
    let tmp = tempdir().unwrap();
    let reports = tmp.path().join("reports");
    fs::create_dir(&reports).unwrap();
    write_reports(&reports);
    fs::write(reports.join("TEST-com.example.Broken.xml"), "<not xml").unwrap();
    let output = tmp.path().join("results");

    tally()
        .current_dir(tmp.path())
        .arg("process")
        .arg("--reports-dir")
        .arg(&reports)
        .arg("--output-dir")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("TEST-com.example.Broken.xml"));

    let v = read_json(&output.join("123/2025-09-02_08-10-26_abcdef/postgres.json"));
    let results = v["results"].as_object().unwrap();
    assert_eq!(results.len(), 2);
    assert!(!results.contains_key("com.example.Broken"));
}

#[test]
fn summary_accumulates_db_types_for_one_build() {
    let tmp = tempdir().unwrap();
    let reports = tmp.path().join("reports");
    fs::create_dir(&reports).unwrap();
    write_reports(&reports);
    let output = tmp.path().join("results");

    for db_type in ["postgres", "mysql"] {
        tally()
            .current_dir(tmp.path())
            .args(["process", db_type])
            .arg("--reports-dir")
            .arg(&reports)
            .arg("-o")
            .arg(&output)
            .assert()
            .success();
    }

    let v = read_json(&output.join("123/summary.json"));
    assert_eq!(v["version"], "1.2.3");
    let builds = v["builds"].as_object().unwrap();
    assert_eq!(builds.len(), 1);
    let build = &builds["2025-09-02_08-10-26_abcdef"];
    assert_eq!(build["buildTime"], "2025-09-02T08:10:26.000");
    assert_eq!(build["revision"], "abcDEF");
    for db_type in ["postgres", "mysql"] {
        let stats = &build["dbTypes"][db_type];
        assert_eq!(stats["testSuites"], 2);
        assert_eq!(stats["totalTests"], 3);
        assert_eq!(stats["totalFailures"], 1);
        assert_eq!(stats["totalErrors"], 0);
        assert_eq!(stats["outputFile"], format!("{db_type}.json"));
        assert!(stats["timestamp"].is_string());
    }
}

#[test]
fn empty_reports_directory_still_writes_outputs() {
    let tmp = tempdir().unwrap();
    let reports = tmp.path().join("reports");
    fs::create_dir(&reports).unwrap();
    fs::write(reports.join("system_info.json"), SYSTEM_INFO).unwrap();
    let output = tmp.path().join("results");

    tally()
        .current_dir(tmp.path())
        .arg("process")
        .arg("--reports-dir")
        .arg(&reports)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let v = read_json(&output.join("123/2025-09-02_08-10-26_abcdef/postgres.json"));
    assert_eq!(v["results"], serde_json::json!({}));

    let summary = read_json(&output.join("123/summary.json"));
    let stats = &summary["builds"]["2025-09-02_08-10-26_abcdef"]["dbTypes"]["postgres"];
    assert_eq!(stats["testSuites"], 0);
    assert_eq!(stats["totalTests"], 0);
    assert_eq!(stats["totalTime"], 0.0);
}

#[test]
fn corrupt_summary_is_replaced() {
    let tmp = tempdir().unwrap();
    let reports = tmp.path().join("reports");
    fs::create_dir(&reports).unwrap();
    write_reports(&reports);
    let output = tmp.path().join("results");
    fs::create_dir_all(output.join("123")).unwrap();
    fs::write(output.join("123/summary.json"), "{ not json").unwrap();

    tally()
        .current_dir(tmp.path())
        .arg("process")
        .arg("--reports-dir")
        .arg(&reports)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let v = read_json(&output.join("123/summary.json"));
    assert_eq!(v["builds"].as_object().unwrap().len(), 1);
}
