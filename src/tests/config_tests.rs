//! Tests for the configuration module.
//!
//! This module contains tests for configuration loading, layering and validation.

use crate::config::{CatalogConfig, ConfigLoader, IngestConfig, LogConfig, StoreConfig, Validate};
use crate::error::config::ConfigError;
use std::fs;
use tempfile::tempdir;

/// Test that default configuration can be created and is valid.
#[test]
fn test_default_config_is_valid() {
    let config = CatalogConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.store.initial_capacity, 100);
    assert_eq!(config.store.load_factor_threshold, 0.7);
    assert_eq!(config.ingest.default_tags, vec!["Pokémon"]);
}

/// Test that configuration validation catches invalid values.
#[test]
fn test_config_validation() {
    let mut config = CatalogConfig::default();

    config.store.initial_capacity = 1;
    assert!(config.validate().is_err());

    config.store.initial_capacity = 10;
    config.store.load_factor_threshold = 1.5;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValueOutOfRange { .. })
    ));

    config.store.load_factor_threshold = 0.5;
    config.ingest.min_rating = 11.0;
    assert!(config.validate().is_err());

    config.ingest.min_rating = 0.0;
    config.log.level = "loud".to_string();
    assert!(config.validate().is_err());
}

/// Test that validation fails for each section's own rules.
#[test]
fn test_specific_validation_rules() {
    let store = StoreConfig {
        top_k: 0,
        ..StoreConfig::default()
    };
    assert!(store.validate().is_err());

    let ingest = IngestConfig {
        tag_delimiter: ',',
        ..IngestConfig::default()
    };
    assert!(ingest.validate().is_err());

    let ingest = IngestConfig {
        delimiter: '§',
        ..IngestConfig::default()
    };
    assert!(ingest.validate().is_err());

    let log = LogConfig {
        level: "debug".to_string(),
        ..LogConfig::default()
    };
    assert!(log.validate().is_ok());
}

/// Test loading configuration from a TOML file.
#[test]
fn test_load_config_from_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("catalog.toml");

    let config_content = r#"
    [store]
    initial_capacity = 16
    load_factor_threshold = 0.5

    [ingest]
    delimiter = ";"
    default_tags = ["Trainer"]
    "#;
    fs::write(&config_path, config_content).unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_CATALOG_FILE");
    let config = loader.load().unwrap();

    assert_eq!(config.store.initial_capacity, 16);
    assert_eq!(config.store.load_factor_threshold, 0.5);
    assert_eq!(config.ingest.delimiter, ';');
    assert_eq!(config.ingest.default_tags, vec!["Trainer"]);

    // Other values should be defaults
    assert_eq!(config.store.top_k, 20);
    assert_eq!(config.log, LogConfig::default());
}

/// Test loading configuration from a JSON file.
#[test]
fn test_load_config_from_json() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("catalog.json");
    fs::write(&config_path, r#"{ "store": { "top_k": 5 } }"#).unwrap();

    let config = ConfigLoader::new(Some(&config_path), "TEST_CATALOG_JSON")
        .load()
        .unwrap();
    assert_eq!(config.store.top_k, 5);
    assert_eq!(config.store.initial_capacity, 100);
}

/// Test loading configuration with environment variable overrides.
#[test]
fn test_env_var_override() {
    std::env::set_var("TEST_CATALOG_ENV__STORE__INITIAL_CAPACITY", "64");
    std::env::set_var("TEST_CATALOG_ENV__LOG__LEVEL", "warn");

    let loader = ConfigLoader::new(None::<&str>, "TEST_CATALOG_ENV");
    let config = loader.load().unwrap();

    assert_eq!(config.store.initial_capacity, 64);
    assert_eq!(config.log.level, "warn");

    std::env::remove_var("TEST_CATALOG_ENV__STORE__INITIAL_CAPACITY");
    std::env::remove_var("TEST_CATALOG_ENV__LOG__LEVEL");
}

/// Test that a missing or malformed file is reported.
#[test]
fn test_load_invalid_config() {
    let dir = tempdir().unwrap();

    let missing = dir.path().join("missing.toml");
    assert!(matches!(
        ConfigLoader::new(Some(&missing), "TEST_CATALOG_MISSING").load(),
        Err(ConfigError::FileNotFound(_))
    ));

    let config_path = dir.path().join("invalid.toml");
    fs::write(&config_path, "[store\ninitial_capacity = ").unwrap();
    assert!(ConfigLoader::new(Some(&config_path), "TEST_CATALOG_INVALID")
        .load()
        .is_err());

    let yaml_path = dir.path().join("catalog.yaml");
    fs::write(&yaml_path, "store: {}").unwrap();
    assert!(matches!(
        ConfigLoader::new(Some(&yaml_path), "TEST_CATALOG_YAML").load(),
        Err(ConfigError::ParseError(_))
    ));
}

/// Test that values failing validation are rejected after layering.
#[test]
fn test_loaded_config_is_validated() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("bad_threshold.toml");
    fs::write(&config_path, "[store]\nload_factor_threshold = 0.0\n").unwrap();

    assert!(matches!(
        ConfigLoader::new(Some(&config_path), "TEST_CATALOG_BAD").load(),
        Err(ConfigError::ValueOutOfRange { .. })
    ));
}

/// Test that generated defaults survive a TOML round trip.
#[test]
fn test_default_config_toml_round_trip() {
    let text = toml::to_string_pretty(&CatalogConfig::default()).unwrap();
    let parsed: CatalogConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, CatalogConfig::default());
}
