//! CLI integration tests

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Write a two-hour series with one spike and return its path
fn write_series(dir: &Path) -> PathBuf {
    let mut csv = String::from("timestamp,value\n");
    for i in 0..24 {
        let value = if i == 20 { 92.0 } else { 30.0 + (i % 4) as f64 };
        csv.push_str(&format!(
            "2014-02-14 {:02}:{:02}:00,{}\n",
            14 + i / 12,
            (i % 12) * 5,
            value
        ));
    }

    let path = dir.join("cpu.csv");
    std::fs::write(&path, csv).expect("Failed to write series");
    path
}

fn smartalert(args: &[&str], envs: &[(&str, &str)]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_smartalert"))
        .args(args)
        .env("SMARTALERT_CHART_WIDTH", "480")
        .env("SMARTALERT_CHART_HEIGHT", "240")
        .envs(envs.iter().copied())
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = smartalert(&["--help"], &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("--source"), "Should show source option");
    assert!(stdout.contains("--output"), "Should show output option");
    assert!(
        stdout.contains("--static-threshold"),
        "Should show static threshold option"
    );
    assert!(stdout.contains("--metrics-path"), "Should show metrics option");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = smartalert(&["--version"], &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("smartalert"), "Should show binary name");
}

/// Test a full run against a local CSV file
#[test]
fn test_report_from_local_file() {
    let temp_dir = TempDir::new().unwrap();
    let source = write_series(temp_dir.path());
    let report = temp_dir.path().join("reports").join("impact.png");

    let output = smartalert(
        &[
            "--source",
            source.to_str().unwrap(),
            "--output",
            report.to_str().unwrap(),
        ],
        &[],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        output.status.success(),
        "Run should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Legacy Alerts (Static)"));
    assert!(stdout.contains("Report saved to:"));
    assert!(report.exists(), "Report image should be written");
}

/// Test JSON summary output with configuration from file and environment
#[test]
fn test_json_summary_with_layered_config() {
    let temp_dir = TempDir::new().unwrap();
    let source = write_series(temp_dir.path());
    let report = temp_dir.path().join("impact.svg");
    let metrics = temp_dir.path().join("metrics").join("run.prom");

    let config_path = temp_dir.path().join("smartalert.toml");
    std::fs::write(
        &config_path,
        format!(
            "source = {:?}\noutput_path = {:?}\nstatic_threshold = 90.0\n",
            source.to_str().unwrap(),
            report.to_str().unwrap()
        ),
    )
    .unwrap();

    let output = smartalert(
        &[
            "--config",
            config_path.to_str().unwrap(),
            "--metrics-path",
            metrics.to_str().unwrap(),
            "--format",
            "json",
        ],
        &[("SMARTALERT_STATIC_THRESHOLD", "10")],
    );

    assert!(
        output.status.success(),
        "Run should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(summary["observations"], 24);
    // Environment wins over the file: every sample exceeds 10
    assert_eq!(summary["legacy_alerts"], 24);
    assert!(summary["optimized_alerts"].as_u64().unwrap() >= 1);

    assert!(report.exists());
    let exposition = std::fs::read_to_string(&metrics).unwrap();
    assert!(exposition.contains("smartalert_static_alerts 24"));
}

/// Test that a missing source aborts the run
#[test]
fn test_missing_source_fails() {
    let temp_dir = TempDir::new().unwrap();
    let report = temp_dir.path().join("impact.png");

    let output = smartalert(
        &[
            "--source",
            temp_dir.path().join("absent.csv").to_str().unwrap(),
            "--output",
            report.to_str().unwrap(),
        ],
        &[],
    );
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "Run should fail");
    assert!(stderr.contains("Threshold analysis failed"));
    assert!(!report.exists());
}

/// Test that an invalid window is rejected before any work
#[test]
fn test_zero_window_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let source = write_series(temp_dir.path());

    let output = smartalert(
        &["--source", source.to_str().unwrap(), "--window", "0"],
        &[],
    );
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "Run should fail");
    assert!(stderr.contains("window size must be at least 1"));
}
