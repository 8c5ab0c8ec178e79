//! Tests for the fsmc command-line interface

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const DETECTOR: &str = r#"{
    "type": "moore",
    "states": [
        {"id": "idle", "name": "Idle", "output": "0", "initial": true},
        {"id": "one", "name": "SeenOne", "output": "0"},
        {"id": "hit", "name": "Hit", "output": "1"}
    ],
    "transitions": [
        {"from": "idle", "to": "one", "input": "1"},
        {"from": "idle", "to": "idle", "input": "0"},
        {"from": "one", "to": "hit", "input": "1"},
        {"from": "one", "to": "idle", "input": "0"},
        {"from": "hit", "to": "hit", "input": "1"},
        {"from": "hit", "to": "idle", "input": "0"}
    ]
}"#;

const INCOMPLETE: &str = r#"{
    "states": [
        {"id": "a", "name": "A", "output": "0", "initial": true},
        {"id": "b", "name": "B", "output": "1"}
    ],
    "transitions": [{"from": "a", "to": "b", "input": "go"}]
}"#;

const SINGLE_STATE: &str = r#"{
    "states": [{"id": "a", "name": "A", "output": "0", "initial": true}],
    "transitions": []
}"#;

fn fsmc(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fsmc"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to run fsmc")
}

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn test_validate_clean_machine() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "detector.json", DETECTOR);

    let out = fsmc(dir.path(), &["validate", "detector.json"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("3 states, 6 transitions, 0 warning(s)"));
}

#[test]
fn test_validate_reports_errors() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "single.json", SINGLE_STATE);

    let out = fsmc(dir.path(), &["validate", "single.json"]);
    assert!(!out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("error: Need at least 2 states"));
    assert!(stdout.contains("error: Need at least 1 transition"));
}

#[test]
fn test_encode_and_table() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "detector.json", DETECTOR);

    let out = fsmc(dir.path(), &["encode", "detector.json"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("States (2 bits):"));
    assert!(stdout.contains("  10  Hit"));
    assert!(stdout.contains("Inputs (1 bits):"));

    let out = fsmc(dir.path(), &["table", "detector.json"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.lines().count(), 1 + 3 * 2);
}

#[test]
fn test_synth_writes_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "detector.json", DETECTOR);
    write(
        dir.path(),
        "fsmc.toml",
        "[synthesis]\nmodule_name = \"detector\"\n",
    );

    let out = fsmc(dir.path(), &["synth", "detector.json", "-o", "out"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let build = dir.path().join("out");
    for file in [
        "detector.report.txt",
        "detector.netlist.json",
        "detector.report.json",
        "detector.v",
    ] {
        assert!(build.join(file).exists(), "missing {}", file);
    }
    let verilog = fs::read_to_string(build.join("detector.v")).unwrap();
    assert!(verilog.contains("module detector ("));
    assert!(verilog.contains("always @(posedge clk)"));
}

#[test]
fn test_synth_single_format() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "detector.json", DETECTOR);

    let out = fsmc(
        dir.path(),
        &["synth", "detector.json", "-f", "verilog", "--skeleton"],
    );
    assert!(out.status.success());
    let build = dir.path().join("build");
    assert!(build.join("fsm.v").exists());
    assert!(!build.join("fsm.report.txt").exists());

    let verilog = fs::read_to_string(build.join("fsm.v")).unwrap();
    assert!(verilog.contains("wire tie_lo = 1'b0;"));
}

#[test]
fn test_deny_warnings() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "partial.json", INCOMPLETE);

    let out = fsmc(dir.path(), &["synth", "partial.json"]);
    assert!(out.status.success());

    let out = fsmc(dir.path(), &["synth", "partial.json", "--deny-warnings"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("missing transitions for inputs: go"));
}

#[test]
fn test_init_writes_default_config() {
    let dir = tempfile::tempdir().unwrap();

    let out = fsmc(dir.path(), &["init", "project"]);
    assert!(out.status.success());
    let toml = fs::read_to_string(dir.path().join("project").join("fsmc.toml")).unwrap();
    assert!(toml.contains("[synthesis]"));
    assert!(toml.contains("[naming]"));

    let out = fsmc(dir.path(), &["init", "project"]);
    assert!(!out.status.success());
    let out = fsmc(dir.path(), &["init", "project", "--force"]);
    assert!(out.status.success());
}
