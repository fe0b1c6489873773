//! Coverage for config parsing and resolution.

use std::fs;

use coroner::config::{load_config, resolve_config, CoronerConfig, OutputFormat};

fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("coroner.toml");
    fs::write(&path, contents).expect("should write config");
    (dir, path)
}

#[test]
fn defaults_are_valid() {
    let config = CoronerConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.scan.max_line_bytes, 1024);
    assert_eq!(config.output.format, OutputFormat::Text);
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn full_config_parses() {
    let (_dir, path) = write_config(
        r#"
[scan]
max_line_bytes = 4096

[output]
format = "json"

[logging]
level = "debug"
"#,
    );
    let config = load_config(&path).expect("should load");
    assert_eq!(config.scan.options().max_line_bytes, 4096);
    assert_eq!(config.output.format, OutputFormat::Json);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn partial_config_keeps_other_defaults() {
    let (_dir, path) = write_config("[output]\nformat = \"json\"\n");
    let config = load_config(&path).expect("should load");
    assert_eq!(config.output.format, OutputFormat::Json);
    assert_eq!(config.scan.max_line_bytes, 1024);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let err = load_config(&dir.path().join("absent.toml")).expect_err("should fail");
    assert!(err.to_string().contains("failed to read config"));
}

#[test]
fn unknown_log_level_is_rejected() {
    let (_dir, path) = write_config("[logging]\nlevel = \"loud\"\n");
    let err = load_config(&path).expect_err("should fail");
    assert!(err.to_string().contains("logging.level"));
}

#[test]
fn oversized_line_bound_is_rejected() {
    let (_dir, path) = write_config("[scan]\nmax_line_bytes = 2000000\n");
    assert!(load_config(&path).is_err());
}

#[test]
fn unknown_format_fails_to_parse() {
    let (_dir, path) = write_config("[output]\nformat = \"xml\"\n");
    let err = load_config(&path).expect_err("should fail");
    assert!(err.to_string().contains("failed to parse config"));
}

#[test]
fn resolve_prefers_explicit_path() {
    let (_dir, path) = write_config("[scan]\nmax_line_bytes = 64\n");
    let config = resolve_config(Some(&path)).expect("should resolve");
    assert_eq!(config.scan.max_line_bytes, 64);
}
