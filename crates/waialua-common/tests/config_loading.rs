//! ---
//! ems_section: "15-testing-qa-runbook"
//! ems_subsection: "integration-tests"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Configuration loading against files on disk."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::NamedTempFile;
use waialua_common::config::{AppConfig, ConfigError};

#[test]
fn first_existing_candidate_wins() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(
        file,
        r#"
[node]
id = "node-7"

[mission]
decay_rate = 0.05

[run]
max_ticks = 12
seed = 42
"#
    )?;
    file.flush()?;

    let missing = PathBuf::from("does/not/exist.toml");
    let loaded = AppConfig::load_candidates(&[missing, file.path().to_path_buf()])?;
    assert_eq!(loaded.source.as_deref(), Some(file.path()));
    assert_eq!(loaded.config.node.id, "node-7");
    assert_eq!(loaded.config.mission.decay_rate, 0.05);
    assert_eq!(loaded.config.mission.nominal_voltage, 3.7);
    assert_eq!(loaded.config.run.max_ticks, 12);
    assert_eq!(loaded.config.run.seed, Some(42));
    Ok(())
}

#[test]
fn no_candidates_falls_back_to_defaults() -> Result<()> {
    let loaded = AppConfig::load_candidates(&[PathBuf::from("nope/waialua.toml")])?;
    assert!(loaded.source.is_none());
    assert_eq!(loaded.config, AppConfig::default());
    Ok(())
}

#[test]
fn invalid_constants_fail_before_any_tick() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "[mission]\nnominal_voltage = 3.0\nsafe_voltage = 3.4")?;
    file.flush()?;

    let err = AppConfig::from_path(file.path()).expect_err("inverted thresholds");
    let typed = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<ConfigError>())
        .expect("config error in chain");
    assert!(matches!(typed, ConfigError::VoltageThresholds { .. }));
    Ok(())
}

#[test]
fn malformed_toml_reports_path() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "[mission\nmax_temperature = ")?;
    file.flush()?;

    let err = AppConfig::from_path(file.path()).expect_err("malformed toml");
    assert!(err.to_string().contains("failed to parse config file"));
    Ok(())
}

#[test]
fn reference_config_matches_defaults() -> Result<()> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../configs/waialua.example.toml");
    let config = AppConfig::from_path(&path)?;
    assert_eq!(config, AppConfig::default());
    Ok(())
}
