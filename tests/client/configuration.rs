//! Tier 4: Configuration

use crate::test_utils::*;
use faunadb::{CONFIG_FILE_NAME, DEFAULT_API_VERSION, DEFAULT_ENDPOINT};
use std::time::Duration;

/// The shipped template needs only a real secret
#[test]
fn test_default_template_parses() {
    let config = ClientConfig::from_toml_str(ClientConfig::default_toml()).unwrap();
    assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(config.api_version, DEFAULT_API_VERSION);
    assert_eq!(config.timeout(), Duration::from_secs(60));
    assert_eq!(config.user_agent, None);
}

/// Omitted settings take their defaults
#[test]
fn test_minimal_file() {
    let config = ClientConfig::from_toml_str(r#"secret = "s3cr3t""#).unwrap();
    assert_eq!(config, ClientConfig::new("s3cr3t"));
}

/// Invalid settings are rejected on load
#[test]
fn test_invalid_settings_rejected() {
    for text in [
        r#"secret = """#,
        "endpoint = \"https://db.fauna.com\"",
        "secret = \"k\"\nendpoint = \"db.fauna.com\"",
        "secret = \"k\"\ntimeout_ms = 0",
        "secret = 12",
    ] {
        let err = ClientConfig::from_toml_str(text).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)), "{}: {:?}", text, err);
    }
}

/// A written file reads back identically
#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);

    let mut config = ClientConfig::new("k")
        .with_endpoint("http://localhost:8443")
        .with_timeout(Duration::from_millis(2_500));
    config.user_agent = Some("spellbook/1.0".to_string());
    config.write_to_file(&path).unwrap();

    assert_eq!(ClientConfig::from_file(&path).unwrap(), config);
}

/// Unreadable files name the path
#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let err = ClientConfig::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("absent.toml"), "{}", err);
}

/// The secret becomes a basic-auth user name
#[test]
fn test_authorization_header() {
    assert_eq!(ClientConfig::new("abc").authorization(), "Basic YWJjOg==");
}
