use messaging_menu_core::config::{self, Config, ConfigError, ConfigFormat};
use pretty_assertions::assert_eq;

#[test]
fn accepts_default_config() {
    let cfg = Config::default();
    assert_eq!(cfg.icon_size, 22);
    assert!(cfg.notify_special_clients);
    assert!(cfg.compatible_emails.contains("thunderbird"));
    assert!(cfg.config_path.to_string_lossy().contains("messaging-menu"));
    assert!(config::validate(&cfg).is_ok());
}

#[test]
fn rejects_icon_size_out_of_range() {
    let cfg = Config {
        icon_size: 200,
        ..Default::default()
    };
    assert!(matches!(config::validate(&cfg), Err(ConfigError::Invalid(_))));
}

#[test]
fn rejects_unparsable_color() {
    let cfg = Config {
        color_rgba: "reddish".to_string(),
        ..Default::default()
    };
    assert!(config::validate(&cfg).is_err());
}

#[test]
fn missing_file_yields_defaults_bound_to_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let cfg = config::load(Some(&path)).unwrap();
    assert_eq!(cfg.config_path, path);
    assert_eq!(cfg.compatible_chats, Config::default().compatible_chats);
}

#[test]
fn partial_toml_keeps_defaults_for_missing_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "compatible-chats = \"pidgin\"\nnotify-chat = false\nicon-size = 16\n",
    )
    .unwrap();

    let cfg = config::load(Some(&path)).unwrap();
    assert_eq!(cfg.compatible_chats, "pidgin");
    assert!(!cfg.notify_chat);
    assert_eq!(cfg.icon_size, 16);
    assert!(cfg.notify_email);
}

#[test]
fn json5_files_are_parsed_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json5");
    std::fs::write(
        &path,
        "{\n  // trailing commas and comments are fine\n  'wiggle-indicator': false,\n  'color-rgba': '#3584e4',\n}\n",
    )
    .unwrap();

    assert_eq!(ConfigFormat::for_path(&path), ConfigFormat::Json5);
    let cfg = config::load(Some(&path)).unwrap();
    assert!(!cfg.wiggle_indicator);
    assert_eq!(cfg.color_rgba, "#3584e4");
}

#[test]
fn invalid_values_in_file_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "icon-size = 4\n").unwrap();
    assert!(matches!(config::load(Some(&path)), Err(ConfigError::Invalid(_))));

    std::fs::write(&path, "icon-size = \"large\"\n").unwrap();
    assert!(matches!(config::load(Some(&path)), Err(ConfigError::Parse { .. })));
}

#[test]
fn save_then_load_preserves_values() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config {
        compatible_emails: "geary;mailspring".to_string(),
        notify_mblogging: false,
        config_path: dir.path().join("nested").join("config.toml"),
        ..Config::default()
    };

    config::save(&cfg).unwrap();
    let loaded = config::load(Some(&cfg.config_path)).unwrap();
    assert_eq!(loaded, cfg);
}
