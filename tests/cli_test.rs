// tests/cli_test.rs
//
// Runs the bellsplit binary: generate a recording, then detect and analyze it.

mod test_utils;

use serde_json::Value;
use std::fs;
use test_utils::*;

fn generate_round(dir: &std::path::Path) -> std::path::PathBuf {
    let wav = dir.join("round.wav");
    let output = bellsplit()
        .arg("generate")
        .arg(&wav)
        .args(["--sample-rate", "8000", "--duration", "130"])
        .args(["--tone", "2050@1", "--tone", "2050@121"])
        .output()
        .expect("Failed to run generate");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(wav.exists());
    wav
}

#[test]
fn test_detect_writes_plan_and_dump() {
    let dir = tempfile::tempdir().unwrap();
    let wav = generate_round(dir.path());
    let plan = dir.path().join("plan.json");
    let dump = dir.path().join("events.txt");

    let output = bellsplit()
        .arg("detect")
        .arg(&wav)
        .arg("--plan")
        .arg(&plan)
        .arg("--debug-file")
        .arg(&dump)
        .output()
        .expect("Failed to run detect");

    let stdout = String::from_utf8_lossy(&output.stdout);
    println!("{}", stdout);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Round 01"));

    let plan: Value = serde_json::from_str(&fs::read_to_string(&plan).unwrap()).unwrap();
    let rounds = plan.as_array().unwrap();
    assert_eq!(rounds.len(), 1);
    assert_eq!(rounds[0]["round"], 1);
    assert_close(rounds[0]["duration_secs"].as_f64().unwrap(), 121.5, 0.05, "plan duration");

    let dump = fs::read_to_string(&dump).unwrap();
    assert!(dump.starts_with("Bell Ringing Detection Debug Info\n"));
    // Zero-phase filtering lets the first peak land a few ms before the strike
    assert!(dump.contains("Event 1: ['00:00:0"));
    assert!(dump.contains("Event 2: ['00:02:0"));
    assert!(!dump.contains("Event 3"));
}

#[test]
fn test_detect_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let wav = generate_round(dir.path());

    let output = bellsplit()
        .arg("detect")
        .arg(&wav)
        .arg("--json")
        .output()
        .expect("Failed to run detect");
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["report"]["sample_rate"], 8000);
    assert_eq!(value["report"]["rounds"]["outcomes"][0]["outcome"], "matched");
    assert_eq!(value["report"]["rounds"]["outcomes"][1]["outcome"], "last_event");
}

#[test]
fn test_analyze_sweep_report() {
    let dir = tempfile::tempdir().unwrap();
    let wav = generate_round(dir.path());
    let report = dir.path().join("report.json");
    let debug_dir = dir.path().join("candidates");

    let output = bellsplit()
        .arg("analyze")
        .arg(&wav)
        .args(["--band", "2000", "2100", "--step", "50"])
        .arg("-o")
        .arg(&report)
        .arg("--debug-dir")
        .arg(&debug_dir)
        .output()
        .expect("Failed to run analyze");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report: Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(report["recommended_frequency_hz"], 2050.0);
    assert_eq!(report["candidates"].as_array().unwrap().len(), 3);
    assert!(debug_dir.join("events_2050.0Hz.txt").exists());
}

#[test]
fn test_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = bellsplit()
        .arg("detect")
        .arg(dir.path().join("missing.wav"))
        .output()
        .expect("Failed to run detect");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Input not found"));
}

#[test]
fn test_peaks_conflicts_with_step() {
    let output = bellsplit()
        .args(["analyze", "x.wav", "--peaks", "3", "--step", "25"])
        .output()
        .expect("Failed to run analyze");

    assert!(!output.status.success());
}
