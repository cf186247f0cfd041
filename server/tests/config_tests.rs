//! Integration tests for CLI parsing and config file merging.

use std::path::PathBuf;

use clap::Parser;
use vibe_compiler::ValidatorKind;
use vibe_server::{CliArgs, ServerConfig, ServerError, DEFAULT_LOG_FILTER};

fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("vibe.toml");
    std::fs::write(&path, contents).expect("write config");
    (dir, path)
}

fn parse(argv: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("vibe-server").chain(argv.iter().copied()))
        .expect("valid args")
}

#[test]
fn test_cli_defaults() {
    let args = parse(&["--config", "definitely-missing.toml"]);
    assert_eq!(args.port, None);
    assert!(!args.no_cors);

    let config = ServerConfig::load(&args).expect("load");
    assert_eq!(config, ServerConfig::default());
    assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
}

#[test]
fn test_cli_flags_parse() {
    let args = parse(&[
        "--port", "8080",
        "--validator", "node-check",
        "--cors-origins", "https://a.example,https://b.example",
        "--swagger", "false",
        "--no-cors",
    ]);

    assert_eq!(args.port, Some(8080));
    assert_eq!(args.validator.map(ValidatorKind::from), Some(ValidatorKind::NodeCheck));
    assert_eq!(
        args.cors_origins,
        Some(vec!["https://a.example".to_string(), "https://b.example".to_string()])
    );
    assert_eq!(args.swagger, Some(false));
    assert!(args.no_cors);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let (_dir, path) = write_config(
        r#"
[http]
port = 4100

[compiler]
validator = "node-check"
"#,
    );

    let config = ServerConfig::from_file(&path).expect("parse");
    assert_eq!(config.http.port, 4100);
    assert_eq!(config.http.host, "0.0.0.0");
    assert_eq!(config.compiler.validator, ValidatorKind::NodeCheck);
    assert_eq!(config.compiler.timeout_secs, 60);
    assert_eq!(config.apps.public_dir, PathBuf::from("public/apps"));
}

#[test]
fn test_cli_beats_file_beats_defaults() {
    let (_dir, path) = write_config(
        r#"
[http]
port = 4100
host = "127.0.0.1"

[apps]
public_dir = "/srv/vibe/public/apps"

[logging]
level = "info"
"#,
    );
    let path = path.to_str().expect("utf-8 path");
    let args = parse(&["--config", path, "--port", "5000"]);

    let config = ServerConfig::load(&args).expect("load");
    assert_eq!(config.http.port, 5000);
    assert_eq!(config.http.host, "127.0.0.1");
    assert_eq!(config.apps.public_dir, PathBuf::from("/srv/vibe/public/apps"));
    assert_eq!(config.apps.source_dir, PathBuf::from("apps"));
    assert!(config.log_filter().contains("vibe_api=info"));

    let api = config.to_api_config();
    assert_eq!(api.bind_address(), "127.0.0.1:5000");
    assert_eq!(api.layout.public_apps_dir, PathBuf::from("/srv/vibe/public/apps"));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let (_dir, path) = write_config("[http]\nport = \"not a number\"\n");

    let err = ServerConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, ServerError::ParseConfig { .. }));
    assert!(err.to_string().contains("vibe.toml"));

    let args = parse(&["--config", path.to_str().expect("utf-8 path")]);
    let err = ServerConfig::load(&args).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse config file"));
}

#[test]
fn test_invalid_merged_config_rejected() {
    let args = parse(&[
        "--config", "definitely-missing.toml",
        "--public-dir", "apps",
        "--source-dir", "apps",
    ]);

    let err = ServerConfig::load(&args).unwrap_err();
    assert!(format!("{err:#}").contains("apps.public_dir and apps.source_dir"));
}
