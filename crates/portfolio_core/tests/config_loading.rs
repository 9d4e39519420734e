use portfolio_core::{ConfigError, ContentBlock, PortfolioConfig, TrackerOptions};
use std::io::Write;

#[test]
fn default_config_survives_json_file_round_trip() {
    let config = PortfolioConfig::default_portfolio();
    let json = config.to_json_pretty().expect("serialize config");

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(json.as_bytes()).expect("write config");

    let loaded = PortfolioConfig::load(file.path()).expect("load config");
    assert_eq!(loaded, config);
}

#[test]
fn minimal_json_uses_default_tracking_and_empty_contacts() {
    let raw = r#"{
        "title": "Jane",
        "brand": "J",
        "sections": [
            { "id": "home", "title": "Home" },
            { "id": "work", "title": "Work" }
        ],
        "content": {
            "home": [{ "kind": "hero", "lines": ["Jane"] }],
            "work": [
                { "kind": "heading", "text": "Work" },
                { "kind": "entry", "title": "Acme", "caption": "2024" }
            ]
        }
    }"#;

    let config = PortfolioConfig::from_json_str(raw).expect("parse config");
    assert_eq!(config.tracking, TrackerOptions::default());
    assert!(config.contacts.is_empty());
    assert_eq!(config.content_for("work")[0], ContentBlock::heading("Work"));
}

#[test]
fn strict_tracking_is_configurable() {
    let raw = r#"{
        "title": "Jane",
        "brand": "J",
        "sections": [{ "id": "home", "title": "Home" }],
        "content": { "home": [] },
        "tracking": { "active_threshold": 0.8 }
    }"#;

    let config = PortfolioConfig::from_json_str(raw).expect("parse config");
    assert_eq!(config.tracking, TrackerOptions::strict());
}

#[test]
fn invalid_section_id_is_a_parse_error() {
    let raw = r#"{
        "title": "Jane",
        "brand": "J",
        "sections": [{ "id": "Home Page", "title": "Home" }],
        "content": {}
    }"#;

    let err = PortfolioConfig::from_json_str(raw).expect_err("bad id must fail");
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().contains("section id is invalid"));
}

#[test]
fn padded_section_id_is_rejected() {
    let raw = r#"{
        "title": "Jane",
        "brand": "J",
        "sections": [{ "id": " home ", "title": "Home" }],
        "content": { "home": [] }
    }"#;

    let err = PortfolioConfig::from_json_str(raw).expect_err("padded id must fail");
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().contains("section id is invalid"));
}

#[test]
fn validation_runs_after_parse() {
    let raw = r#"{
        "title": "Jane",
        "brand": "J",
        "sections": [{ "id": "home", "title": "Home" }],
        "content": {}
    }"#;

    let err = PortfolioConfig::from_json_str(raw).expect_err("missing content must fail");
    assert!(matches!(err, ConfigError::MissingContent(ref id) if id == "home"));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = PortfolioConfig::load(&dir.path().join("absent.json")).expect_err("must fail");
    assert!(matches!(err, ConfigError::Io(_)));
}
