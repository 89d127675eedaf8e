// tests/unit_config.rs
use anyhow::Result;
use collabnet_core::config::Config;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_load_explicit_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("collabnet.toml");
    fs::write(
        &path,
        r#"
[store]
path = "hits.db"

[analysis]
seed = 1234
resolution = 0.8
min_complete_rows = 30

[output]
events = false
"#,
    )?;

    let config = Config::load(Some(&path))?;
    assert_eq!(config.store.path, PathBuf::from("hits.db"));
    assert_eq!(config.analysis.seed, 1234);
    assert_eq!(config.analysis.resolution, 0.8);
    assert_eq!(config.analysis.min_complete_rows, 30);
    assert_eq!(config.analysis.significance, 0.05);
    assert!(config.event_logger().path().is_none());
    Ok(())
}

#[test]
fn test_invalid_file_names_path() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[analysis]\nsignificance = 2.0\n")?;

    let err = Config::load(Some(&path)).expect_err("significance out of range");
    let msg = err.to_string();
    assert!(msg.contains("bad.toml"), "{msg}");
    assert!(msg.contains("significance"), "{msg}");
    Ok(())
}

#[test]
fn test_defaults_enable_events() {
    let config = Config::default();
    let logger = config.event_logger();
    assert_eq!(
        logger.path(),
        Some(PathBuf::from(".collabnet").join("events.jsonl").as_path())
    );
}
