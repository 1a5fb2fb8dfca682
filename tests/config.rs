//! Tests for TOML config loading and `Logger::from_config_with`.

use rotolog::{Config, Error, Level, Logger, format_size, parse_size};
use std::fs;
use tempfile::TempDir;

#[test]
fn defaults_when_empty() {
    let config = Config::parse("").unwrap();
    assert_eq!(config.general.name, "app");
    assert_eq!(config.level().unwrap(), Level::Info);
    assert_eq!(config.internal_level(), Level::Warn);
    assert!(!config.caller.enabled);
    assert!(!config.file.enabled);
    assert_eq!(config.file.backups, 5);
    assert_eq!(config.max_size_bytes().unwrap(), 10 * 1024 * 1024);
    assert!(config.json.keys.is_empty());
}

#[test]
fn missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
    assert_eq!(config.general.level, "info");
}

#[test]
fn syntax_errors_are_reported() {
    let err = Config::parse("[general\nlevel = ").unwrap_err();
    assert!(matches!(err, Error::ConfigParse(_)));
}

#[test]
fn full_config_builds_a_file_logger() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("out/app.log");
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            r#"
[general]
name = "svc"
level = "debug"
time_format = "%Y"
internal_level = "error"

[caller]
enabled = true
levels = ["warn"]

[file]
enabled = true
path = "{}"
max_size = "1K"
backups = 2

[json]
full = true
keys = {{ message = "msg" }}
"#,
            log_path.display()
        ),
    )
    .unwrap();

    let config = Config::load_from(&config_path).unwrap();
    assert_eq!(config.internal_level(), Level::Error);
    assert_eq!(config.caller_levels().unwrap(), vec![Level::Warn]);

    let logger = Logger::from_config_with(&config).unwrap();
    assert_eq!(logger.name(), "svc");
    assert_eq!(logger.level(), Level::Debug);

    logger.trace("dropped").unwrap();
    logger.debug("kept").unwrap();
    logger.warn("with caller").unwrap();
    logger.flush().unwrap();

    let content = fs::read_to_string(&log_path).unwrap();
    let lines: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["msg"], "kept");
    assert_eq!(lines[0]["name"], "svc");
    assert_eq!(lines[0]["caller"], "");
    assert_eq!(lines[0]["fields"], serde_json::json!({}));
    assert_eq!(lines[0]["time"].as_str().unwrap().len(), 4);
    assert!(lines[1]["caller"].as_str().unwrap().starts_with("config.rs:"));
}

#[test]
fn invalid_level_is_rejected() {
    let config = Config::parse("[general]\nlevel = \"loud\"").unwrap();
    let err = Logger::from_config_with(&config).unwrap_err();
    assert!(matches!(err, Error::InvalidLevel(l) if l == "loud"));
}

#[test]
fn invalid_formatter_key_is_rejected() {
    let config = Config::parse("[json]\nkeys = { msg = \"message\" }").unwrap();
    let err = Logger::from_config_with(&config).unwrap_err();
    assert!(matches!(err, Error::InvalidFormatterKey(_)));
}

#[test]
fn invalid_size_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = Config::parse(&format!(
        "[file]\nenabled = true\npath = \"{}\"\nmax_size = \"huge\"",
        dir.path().join("app.log").display()
    ))
    .unwrap();
    let err = Logger::from_config_with(&config).unwrap_err();
    assert!(matches!(err, Error::InvalidSize(s) if s == "huge"));
}

#[test]
fn caller_level_names_are_checked() {
    let config = Config::parse("[caller]\nenabled = true\nlevels = [\"nope\"]").unwrap();
    assert!(matches!(config.caller_levels(), Err(Error::InvalidLevel(_))));
}

#[test]
fn unknown_internal_level_falls_back_to_warn() {
    let config = Config::parse("[general]\ninternal_level = \"chatty\"").unwrap();
    assert_eq!(config.internal_level(), Level::Warn);
}

#[test]
fn tilde_in_file_path_is_expanded() {
    let config = Config::parse("[file]\npath = \"~/logs/app.log\"").unwrap();
    assert!(!config.file_path().to_string_lossy().starts_with('~'));
}

#[test]
fn size_strings() {
    assert_eq!(parse_size("100"), Some(100));
    assert_eq!(parse_size("1K"), Some(1024));
    assert_eq!(parse_size("1kb"), Some(1024));
    assert_eq!(parse_size("10M"), Some(10 * 1024 * 1024));
    assert_eq!(parse_size("1.5G"), Some(1024 * 1024 * 1024 * 3 / 2));
    assert_eq!(parse_size("nope"), None);

    assert_eq!(format_size(512), "512 B");
    assert_eq!(format_size(1536), "1.50 KB");
    assert_eq!(format_size(10 * 1024 * 1024), "10.00 MB");
}
