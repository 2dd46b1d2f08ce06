//! Integration tests for the CLI application
//!
//! These tests run the compiled binary against temporary CSV files.

use std::io::Write;
use std::process::{Command, Output};
use tempfile::{Builder, NamedTempFile};

/// Two well separated clusters whose coordinates move together
fn cluster_csv() -> std::io::Result<NamedTempFile> {
    let mut file = Builder::new().suffix(".csv").tempfile()?;
    writeln!(file, "a,b,label")?;
    for k in 0..50 {
        let k = k as f64;
        writeln!(file, "{},{},-1", (k * 0.7).sin(), (k * 1.3).cos())?;
        writeln!(file, "{},{},1", 10.0 + (k * 1.1).sin(), 10.0 + (k * 0.9).cos())?;
    }
    file.flush()?;
    Ok(file)
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sgd-svm"))
        .args(args)
        .output()
        .expect("Failed to run CLI binary")
}

#[test]
fn test_cli_help() {
    let output = run(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("train"));
    assert!(stdout.contains("select"));
}

#[test]
fn test_cli_train_text_output() {
    let data = cluster_csv().expect("Failed to create test data");
    let path = data.path().to_str().unwrap();

    let output = run(&["train", "--data", path, "--seed", "3"]);
    assert!(
        output.status.success(),
        "train failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("=== Training Results ==="));
    assert!(stdout.contains("Converged at epoch"));
    assert!(stdout.contains("Accuracy:"));
    assert!(stdout.contains(r#"Dropped (correlated): ["b"]"#));
}

#[test]
fn test_cli_train_json_report() {
    let data = cluster_csv().expect("Failed to create test data");
    let path = data.path().to_str().unwrap();

    let output = run(&["train", "--data", path, "--seed", "3", "--json"]);
    assert!(output.status.success());

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(report["samples"], 100);
    assert_eq!(report["features"], serde_json::json!(["a"]));
    assert_eq!(report["selection"]["correlated"], serde_json::json!(["b"]));
    assert_eq!(report["termination"]["status"], "converged");
    assert!(report["accuracy"].as_f64().unwrap() >= 0.95);
    assert!(report["trained_at"].is_string());
}

#[test]
fn test_cli_skip_selection_keeps_all_columns() {
    let data = cluster_csv().expect("Failed to create test data");
    let path = data.path().to_str().unwrap();

    let output = run(&["train", "--data", path, "--seed", "4", "--skip-selection", "--json"]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["features"], serde_json::json!(["a", "b"]));
}

#[test]
fn test_cli_select() {
    let data = cluster_csv().expect("Failed to create test data");
    let path = data.path().to_str().unwrap();

    let output = run(&["select", "--data", path]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(r#"Dropped (correlated): ["b"]"#));
    assert!(stdout.contains(r#"Remaining: ["a"]"#));
}

#[test]
fn test_cli_config_file() {
    let data = cluster_csv().expect("Failed to create test data");
    let mut config = NamedTempFile::new().expect("Failed to create config");
    writeln!(config, r#"{{"max_epochs": 3, "seed": 1}}"#).unwrap();
    config.flush().unwrap();

    let output = run(&[
        "train",
        "--data",
        data.path().to_str().unwrap(),
        "--config",
        config.path().to_str().unwrap(),
        "--json",
    ]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["termination"]["status"], "max_epochs_reached");
    assert_eq!(report["epochs"], 2);
}

#[test]
fn test_cli_error_handling() {
    // Nonexistent file
    let output = run(&["train", "--data", "nonexistent.csv"]);
    assert!(!output.status.success());

    // Labels outside -1/+1
    let mut bad = Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(bad, "a,label\n1.0,1\n2.0,3").unwrap();
    bad.flush().unwrap();
    let output = run(&["train", "--data", bad.path().to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid label encoding"));

    // Invalid hyperparameter
    let data = cluster_csv().unwrap();
    let output = run(&[
        "train",
        "--data",
        data.path().to_str().unwrap(),
        "--learning-rate=-1",
    ]);
    assert!(!output.status.success());
}

#[test]
fn test_cli_zero_one_labels() {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "a,label").unwrap();
    for k in 0..20 {
        writeln!(file, "{},0", (k as f64 * 0.3).sin()).unwrap();
        writeln!(file, "{},1", 10.0 + (k as f64 * 0.7).cos()).unwrap();
    }
    file.flush().unwrap();
    let path = file.path().to_str().unwrap();

    assert!(!run(&["select", "--data", path]).status.success());
    assert!(run(&["select", "--data", path, "--zero-one-labels"]).status.success());
}
