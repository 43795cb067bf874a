//! Integration tests for the mh CLI.
//!
//! Every command runs in a scratch directory with its own config file so the
//! user's real configuration and any `.env` are never touched.
//!
//! Run with: `cargo test --package meihua-cli --test cli_integration`

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

/// Helper to run mh in an isolated directory with a private config file.
fn run_mh(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mh"))
        .current_dir(dir)
        .env("MH_CONFIG_FILE", dir.join("config.json"))
        .env_remove("DEEPSEEK_API_KEY")
        .env_remove("DEEPSEEK_BASE_URL")
        .env_remove("MEIHUA_MODEL")
        .args(args)
        .output()
        .expect("Failed to execute mh command")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

// =============================================================================
// Cast Command Tests
// =============================================================================

#[test]
fn test_cast_text_output() {
    let temp = TempDir::new().unwrap();
    let output = run_mh(temp.path(), &["cast", "3", "8"]);
    let stdout = stdout_of(&output);

    assert!(output.status.success(), "mh cast should succeed: {}", stderr_of(&output));
    assert!(stdout.contains("数字起卦：上卦数 3 · 下卦数 8"));
    assert!(stdout.contains("本卦 离坤"), "should show primary hexagram");
    assert!(stdout.contains("互卦 坎艮"), "should show mutual hexagram");
    assert!(stdout.contains("变卦 乾坤"), "should show changed hexagram");
    assert!(stdout.contains("第5爻"));
    assert!(stdout.contains("体卦：    坤(土)"));
    assert!(stdout.contains("变卦结果：乾(金)"));
}

#[test]
fn test_cast_json_output() {
    let temp = TempDir::new().unwrap();
    let output = run_mh(temp.path(), &["cast", "1", "1", "--format", "json"]);

    assert!(output.status.success(), "mh cast --format json should succeed");
    let json: Value = serde_json::from_str(&stdout_of(&output)).expect("stdout should be JSON");
    assert_eq!(json["changing_line"], 2);
    assert_eq!(json["primary"]["name"], "乾乾");
    assert_eq!(json["subject"]["name"], "乾");
    assert_eq!(json["changed_result"]["name"], "离");
    assert_eq!(json["method"]["kind"], "numbers");
}

#[test]
fn test_cast_rejects_zero() {
    let temp = TempDir::new().unwrap();
    let output = run_mh(temp.path(), &["cast", "0", "8"]);

    assert!(!output.status.success(), "zero input must fail");
    assert!(stderr_of(&output).contains("must be a positive integer"));
}

#[test]
fn test_cast_rejects_unknown_format() {
    let temp = TempDir::new().unwrap();
    let output = run_mh(temp.path(), &["cast", "3", "8", "--format", "md"]);

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Unknown format"));
}

#[test]
fn test_interpret_without_key_fails_before_output() {
    let temp = TempDir::new().unwrap();
    let output = run_mh(temp.path(), &["cast", "3", "8", "--interpret"]);

    assert!(!output.status.success(), "interpretation needs an API key");
    assert!(stderr_of(&output).contains("no API key configured"));
    assert!(stdout_of(&output).is_empty(), "nothing should be printed");
}

// =============================================================================
// Time Command Tests
// =============================================================================

#[test]
fn test_time_with_explicit_branches() {
    let temp = TempDir::new().unwrap();
    let output = run_mh(
        temp.path(),
        &[
            "time",
            "--year-branch",
            "午",
            "--month",
            "3",
            "--day",
            "15",
            "--hour-branch",
            "shen",
            "--format",
            "json",
        ],
    );

    assert!(output.status.success(), "mh time should succeed: {}", stderr_of(&output));
    let json: Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(json["upper_number"], 25);
    assert_eq!(json["lower_number"], 34);
    assert_eq!(json["changing_line"], 4);
    assert_eq!(json["method"]["kind"], "calendar");
    assert_eq!(json["method"]["point"]["year_branch"], "午");
}

#[test]
fn test_time_with_lunar_year_and_leap_month() {
    let temp = TempDir::new().unwrap();
    let output = run_mh(
        temp.path(),
        &[
            "time",
            "--lunar-year",
            "2026",
            "--month",
            "-6",
            "--day",
            "9",
            "--hour",
            "0",
        ],
    );

    assert!(output.status.success(), "mh time should succeed: {}", stderr_of(&output));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("时间起卦：午年 闰6月 9日 子时"));
}

#[test]
fn test_time_requires_a_year() {
    let temp = TempDir::new().unwrap();
    let output = run_mh(temp.path(), &["time", "--month", "3", "--day", "15"]);
    assert!(!output.status.success(), "year branch or lunar year is required");
}

#[test]
fn test_time_rejects_impossible_day() {
    let temp = TempDir::new().unwrap();
    let output = run_mh(
        temp.path(),
        &["time", "--year-branch", "1", "--month", "3", "--day", "31", "--hour", "5"],
    );
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("lunar day"));
}

// =============================================================================
// Config Command Tests
// =============================================================================

#[test]
fn test_config_set_get_and_mask() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    let output = run_mh(dir, &["config", "set", "model", "deepseek-reasoner"]);
    assert!(output.status.success());
    let output = run_mh(dir, &["config", "set", "api-key", "sk-abcdefghijkl"]);
    assert!(output.status.success());

    let saved = fs::read_to_string(dir.join("config.json")).unwrap();
    let saved: Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved["model"], "deepseek-reasoner");

    let output = run_mh(dir, &["config", "get", "model"]);
    assert_eq!(stdout_of(&output).trim(), "deepseek-reasoner");

    let output = run_mh(dir, &["config", "get", "api-key"]);
    let shown = stdout_of(&output);
    assert!(shown.starts_with("sk-abc"));
    assert!(!shown.contains("ghijkl"), "key must be masked");
}

#[test]
fn test_config_environment_overrides_file() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    run_mh(dir, &["config", "set", "model", "from-file"]);

    let output = Command::new(env!("CARGO_BIN_EXE_mh"))
        .current_dir(dir)
        .env("MH_CONFIG_FILE", dir.join("config.json"))
        .env("MEIHUA_MODEL", "from-env")
        .args(["config", "get", "model"])
        .output()
        .unwrap();
    assert_eq!(stdout_of(&output).trim(), "from-env");

    // Editing the file must not persist the environment value.
    run_mh(dir, &["config", "set", "base-url", "http://localhost:11434/v1"]);
    let saved: Value =
        serde_json::from_str(&fs::read_to_string(dir.join("config.json")).unwrap()).unwrap();
    assert_eq!(saved["model"], "from-file");
}

#[test]
fn test_config_unknown_key() {
    let temp = TempDir::new().unwrap();
    let output = run_mh(temp.path(), &["config", "set", "colour", "red"]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Unknown config key"));
}

#[test]
fn test_config_reset_and_path() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    run_mh(dir, &["config", "set", "model", "custom"]);

    let output = run_mh(dir, &["config", "reset"]);
    assert!(output.status.success());
    let output = run_mh(dir, &["config", "get", "model"]);
    assert_eq!(stdout_of(&output).trim(), "deepseek-chat");

    let output = run_mh(dir, &["config", "path"]);
    assert!(stdout_of(&output).trim().ends_with("config.json"));
}

#[test]
fn test_config_blank_environment_keeps_file_values() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    run_mh(dir, &["config", "set", "api-key", "sk-fromfile"]);
    run_mh(dir, &["config", "set", "model", "from-file"]);

    let get = |key: &str| {
        let output = Command::new(env!("CARGO_BIN_EXE_mh"))
            .current_dir(dir)
            .env("MH_CONFIG_FILE", dir.join("config.json"))
            .env("DEEPSEEK_API_KEY", "")
            .env("MEIHUA_MODEL", "   ")
            .args(["config", "get", key])
            .output()
            .unwrap();
        stdout_of(&output).trim().to_string()
    };

    assert_eq!(get("model"), "from-file");
    assert!(get("api-key").starts_with("sk-fro"));
}

#[test]
fn test_corrupt_config_can_be_reset() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    fs::write(dir.join("config.json"), "{ not json").unwrap();

    let output = run_mh(dir, &["config", "show"]);
    assert!(!output.status.success(), "a corrupt file is reported");
    assert!(stderr_of(&output).contains("Failed to parse config file"));

    let output = run_mh(dir, &["config", "path"]);
    assert!(output.status.success(), "path works on a corrupt file");
    assert!(stdout_of(&output).trim().ends_with("config.json"));

    let output = run_mh(dir, &["config", "reset"]);
    assert!(output.status.success(), "reset recovers: {}", stderr_of(&output));
    let output = run_mh(dir, &["config", "get", "model"]);
    assert_eq!(stdout_of(&output).trim(), "deepseek-chat");
}
