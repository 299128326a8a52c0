use std::sync::{Arc, Mutex};

use messaging_menu_core::config::Config;
use messaging_menu_core::notifier::SpecialNotifierPolicy;
use messaging_menu_core::settings::{
    parse_id_list, validate_color_rgba, validate_icon_size, MemorySettings, SettingKey,
    SettingKind, SettingValue, Settings, SettingsStore,
};
use pretty_assertions::assert_eq;

#[test]
fn id_lists_drop_blanks_and_duplicates() {
    assert_eq!(
        parse_id_list(" pidgin ;;Slack;hexchat;PIDGIN; "),
        vec!["hexchat", "pidgin", "Slack"]
    );
    assert!(parse_id_list("").is_empty());
    assert!(parse_id_list(" ; ;").is_empty());
}

#[test]
fn setting_keys_use_schema_names() {
    assert_eq!(SettingKey::CompatibleHiddenMblogNotifiers.as_str(), "compatible-hidden-mblog-notifiers");
    assert_eq!("notify-mblogging".parse::<SettingKey>().unwrap(), SettingKey::NotifyMblogging);
    assert_eq!(SettingKey::IconSize.kind(), SettingKind::Int);
    assert_eq!(SettingKey::WiggleIndicator.kind(), SettingKind::Boolean);
    assert!("notify-everything".parse::<SettingKey>().is_err());
}

#[test]
fn validates_icon_size_range() {
    assert_eq!(validate_icon_size(22), Ok(22));
    assert!(validate_icon_size(11).is_err());
    assert!(validate_icon_size(65).is_err());
}

#[test]
fn validates_color_formats() {
    for color in ["#fff", "#ffff", "#3584e4", "#3584e4cc", "rgb(1, 2, 3)", "rgba(237,51,59,1)"] {
        assert!(validate_color_rgba(color).is_ok(), "{color} should be accepted");
    }
    for color in ["", "red", "#12", "#zzzzzz", "rgba(1,2)", "rgb(300,0,0)"] {
        assert!(validate_color_rgba(color).is_err(), "{color} should be rejected");
    }
}

#[test]
fn memory_settings_notify_only_on_change() {
    let mut settings = MemorySettings::from_config(&Config::default());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let id = settings.connect(SettingKey::NotifyChat, move |key| sink.lock().unwrap().push(key));

    assert_eq!(settings.set_boolean(SettingKey::NotifyChat, true), Ok(false));
    assert_eq!(settings.set_boolean(SettingKey::NotifyChat, false), Ok(true));
    assert_eq!(settings.set_boolean(SettingKey::NotifyEmail, false), Ok(true));
    assert_eq!(*seen.lock().unwrap(), vec![SettingKey::NotifyChat]);

    assert!(settings.disconnect(id));
    settings.set_boolean(SettingKey::NotifyChat, true).unwrap();
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn memory_settings_reject_wrong_value_kind() {
    let mut settings = MemorySettings::new();
    assert!(settings
        .set(SettingKey::IconSize, SettingValue::String("big".into()))
        .is_err());
    assert_eq!(settings.get_int(SettingKey::IconSize), None);
}

#[test]
fn settings_snapshot_falls_back_to_defaults() {
    let mut store = MemorySettings::new();
    store.set_string(SettingKey::CompatibleChats, "pidgin").unwrap();
    store.set_boolean(SettingKey::NotifySpecialClients, false).unwrap();
    store.set_string(SettingKey::ColorRgba, "not a colour").unwrap();

    let settings = Settings::from_store(&store);
    let defaults = Settings::from_store(&Config::default());

    assert_eq!(settings.lists.chat, vec!["pidgin"]);
    assert_eq!(settings.lists.email, defaults.lists.email);
    assert_eq!(settings.special_policy, SpecialNotifierPolicy::Exclude);
    assert_eq!(settings.color_rgba, defaults.color_rgba);
    assert_eq!(settings.icon_size, 22);
    assert!(settings.flags.notify_email);
}
