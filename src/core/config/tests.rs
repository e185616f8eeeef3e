use super::data::{Config, ConfigKey, DEFAULT_BASE_URL};
use super::io::ConfigError;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config
        .set(ConfigKey::BaseUrl, "https://router.example.com/")
        .expect("valid url");
    config
        .set(ConfigKey::LogFile, "chat.log")
        .expect("valid path");
    config.save_to_path(&config_path).expect("save");

    let loaded = Config::load_from_path(&config_path).expect("load");
    assert_eq!(loaded.base_url.as_deref(), Some("https://router.example.com"));
    assert_eq!(loaded.log_file.as_deref(), Some("chat.log"));

    let mut loaded = loaded;
    loaded.unset(ConfigKey::LogFile);
    loaded.save_to_path(&config_path).expect("save again");

    let reloaded = Config::load_from_path(&config_path).expect("reload");
    assert_eq!(reloaded.log_file, None);
    assert_eq!(
        reloaded.base_url.as_deref(),
        Some("https://router.example.com")
    );
}

#[test]
fn malformed_toml_reports_parse_error_with_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "base_url = [unclosed").expect("write");

    let err = Config::load_from_path(&config_path).expect_err("parse should fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("Failed to parse config at "));
}

#[test]
fn base_url_resolution_order() {
    let config = Config {
        base_url: Some("http://from-config:8000".into()),
        log_file: None,
    };

    assert_eq!(
        config.resolve_base_url(Some("http://from-flag:1/"), Some("http://from-env:2")),
        "http://from-flag:1"
    );
    assert_eq!(
        config.resolve_base_url(None, Some("http://from-env:2")),
        "http://from-env:2"
    );
    assert_eq!(
        config.resolve_base_url(Some("  "), None),
        "http://from-config:8000"
    );
    assert_eq!(
        Config::default().resolve_base_url(None, None),
        DEFAULT_BASE_URL
    );
}

#[test]
fn log_file_flag_overrides_config() {
    let config = Config {
        base_url: None,
        log_file: Some("default.log".into()),
    };
    assert_eq!(
        config.resolve_log_file(Some("flag.log".into())).as_deref(),
        Some("flag.log")
    );
    assert_eq!(config.resolve_log_file(None).as_deref(), Some("default.log"));
}

#[test]
fn set_rejects_unknown_keys_and_bad_urls() {
    assert!(matches!(
        ConfigKey::parse("theme"),
        Err(ConfigError::UnknownKey { .. })
    ));
    assert_eq!(ConfigKey::parse("BASE-URL").expect("key"), ConfigKey::BaseUrl);

    let mut config = Config::default();
    let err = config
        .set(ConfigKey::BaseUrl, "localhost:8000")
        .expect_err("scheme required");
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
    assert!(config.set(ConfigKey::LogFile, "   ").is_err());
    assert_eq!(config, Config::default());
}

#[test]
fn describe_lists_every_key() {
    let config = Config {
        base_url: Some("http://127.0.0.1:9000".into()),
        log_file: None,
    };
    assert_eq!(
        config.describe(),
        vec![
            "base-url: http://127.0.0.1:9000".to_string(),
            "log-file: (unset)".to_string(),
        ]
    );
}
