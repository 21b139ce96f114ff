//! Integration tests for the bmi binary.
//!
//! These tests verify end-to-end behavior including:
//! - Calculation, classification and logging
//! - History display, deletion and export
//! - CSV import
//! - Trend output and the interactive session

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI binary, isolated from the user's config
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bmi"));
    cmd.env("XDG_CONFIG_HOME", dir.join("config"))
        .arg("--data-dir")
        .arg(dir.join("data"));
    cmd
}

fn history_path(dir: &Path) -> std::path::PathBuf {
    dir.join("data").join("bmi_history.csv")
}

fn calc(dir: &Path, height: &str, weight: &str) {
    cli(dir).args(["calc", height, weight]).assert().success();
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Body mass index calculator and tracker",
        ));
}

#[test]
fn test_calc_normal_weight() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["calc", "1.8", "70"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BMI: 21.6 (m/kg) | Normal weight"))
        .stdout(predicate::str::contains(
            "Excellent! Maintain balance with diet and regular exercise.",
        ));

    let contents = fs::read_to_string(history_path(temp_dir.path())).unwrap();
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.trim_end().ends_with(",1.80,70.0,21.6,Normal weight"));
}

#[test]
fn test_calc_imperial() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["calc", "70.87", "154.3", "--imperial"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BMI: 21.6 (inches/lb) | Normal weight"));

    // Stored in metric
    let contents = fs::read_to_string(history_path(temp_dir.path())).unwrap();
    assert!(contents.contains(",1.80,70.0,21.6,Normal weight"));
}

#[test]
fn test_calc_obese() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["calc", "1.6", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BMI: 39.1 (m/kg) | Obese"));
}

#[test]
fn test_calc_out_of_range_is_input_error() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["calc", "4", "70"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input Error"));

    assert!(!history_path(temp_dir.path()).exists());
}

#[test]
fn test_calc_non_numeric_is_input_error() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["calc", "tall", "70"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input Error"))
        .stderr(predicate::str::contains("height must be a number"));
}

#[test]
fn test_calc_shows_trend_after_second_entry() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["calc", "1.8", "70"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Your BMI Progress").not());

    cli(temp_dir.path())
        .args(["calc", "1.8", "75"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Your BMI Progress"));
}

#[test]
fn test_history_newest_first() {
    let temp_dir = setup_test_dir();
    calc(temp_dir.path(), "1.8", "70");
    calc(temp_dir.path(), "1.6", "100");

    let output = cli(temp_dir.path())
        .arg("history")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8_lossy(&output);

    let obese = stdout.find("Obese").expect("Obese row missing");
    let normal = stdout.find("Normal weight").expect("Normal row missing");
    assert!(obese < normal);
}

#[test]
fn test_history_shows_advice_for_latest_entry() {
    let temp_dir = setup_test_dir();
    calc(temp_dir.path(), "1.8", "70");
    calc(temp_dir.path(), "1.6", "100");

    cli(temp_dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Latest: Professional guidance recommended for sustainable weight management.",
        ));
}

#[test]
fn test_history_empty() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries yet"));
}

#[test]
fn test_delete_rewrites_history() {
    let temp_dir = setup_test_dir();
    calc(temp_dir.path(), "1.8", "70");
    calc(temp_dir.path(), "1.6", "100");

    // Row 1 is the newest entry
    cli(temp_dir.path())
        .args(["delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 entries"));

    let contents = fs::read_to_string(history_path(temp_dir.path())).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "Date,Height,Weight,BMI,Status");
    assert_eq!(lines.len(), 2);
    assert!(lines[1].ends_with("Normal weight"));
}

#[test]
fn test_delete_unknown_row_fails() {
    let temp_dir = setup_test_dir();
    calc(temp_dir.path(), "1.8", "70");

    cli(temp_dir.path())
        .args(["delete", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No row 5"));
}

#[test]
fn test_export_then_import_roundtrip() {
    let temp_dir = setup_test_dir();
    calc(temp_dir.path(), "1.8", "70");
    calc(temp_dir.path(), "1.6", "100");
    calc(temp_dir.path(), "1.7", "50");

    let export_path = temp_dir.path().join("export.csv");
    cli(temp_dir.path())
        .arg("export")
        .arg("--output")
        .arg(&export_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 entries"));

    let exported = fs::read_to_string(&export_path).unwrap();
    assert!(exported.starts_with("Date,Height,Weight,BMI,Status\n"));

    let other_dir = setup_test_dir();
    cli(other_dir.path())
        .arg("import")
        .arg(&export_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 3 entries"));

    let original = fs::read_to_string(history_path(temp_dir.path())).unwrap();
    let imported = fs::read_to_string(history_path(other_dir.path())).unwrap();
    assert_eq!(original, imported);
}

#[test]
fn test_import_validate_skips_bad_rows() {
    let temp_dir = setup_test_dir();
    let import_path = temp_dir.path().join("in.csv");
    fs::write(
        &import_path,
        "Date,Height,Weight,BMI,Status\n\
         2024-01-01 08:00,1.80,70.0,21.6,Normal weight\n\
         2024-01-02 08:00,9.00,70.0,0.9,Underweight\n",
    )
    .unwrap();

    cli(temp_dir.path())
        .arg("import")
        .arg(&import_path)
        .arg("--validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 entries"))
        .stdout(predicate::str::contains("Skipped 1 invalid entries"));
}

#[test]
fn test_trend_needs_two_entries() {
    let temp_dir = setup_test_dir();
    calc(temp_dir.path(), "1.8", "70");

    cli(temp_dir.path())
        .arg("trend")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not enough entries"));

    calc(temp_dir.path(), "1.8", "80");

    cli(temp_dir.path())
        .arg("trend")
        .assert()
        .success()
        .stdout(predicate::str::contains("21.6"))
        .stdout(predicate::str::contains("24.7"));
}

#[test]
fn test_shell_session() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("shell")
        .write_stdin("units\n70.87 154.3\nunits\n1.6 100\nhistory\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Units: Imperial (inches/lb)"))
        .stdout(predicate::str::contains("BMI: 21.6 (inches/lb) | Normal weight"))
        .stdout(predicate::str::contains("BMI: 39.1 (m/kg) | Obese"));

    let contents = fs::read_to_string(history_path(temp_dir.path())).unwrap();
    assert_eq!(contents.lines().count(), 2);
}

#[test]
fn test_shell_units_by_name() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("shell")
        .write_stdin("units imperial\nunits imperial\n70.87 154.3\nunits furlongs\nunits metric\n1.8 70\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("BMI: 21.6 (inches/lb) | Normal weight"))
        .stdout(predicate::str::contains("Unknown unit system: furlongs"))
        .stdout(predicate::str::contains("BMI: 21.6 (m/kg) | Normal weight"));
}

#[test]
fn test_shell_reports_input_errors_and_continues() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .write_stdin("calc 4 70\ncalc 1.8 70\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Input Error"))
        .stdout(predicate::str::contains("Normal weight"));
}

#[test]
fn test_config_default_units() {
    let temp_dir = setup_test_dir();
    let config_dir = temp_dir.path().join("config").join("bmi");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[display]\ndefault_units = \"imperial\"\n",
    )
    .unwrap();

    cli(temp_dir.path())
        .args(["calc", "70.87", "154.3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(inches/lb)"));

    // Explicit flag wins over config
    cli(temp_dir.path())
        .args(["calc", "1.8", "70", "--metric"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BMI: 21.6 (m/kg)"));
}
