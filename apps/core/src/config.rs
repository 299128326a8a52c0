use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::{validate_color_rgba, validate_icon_size, SettingKey, SettingsStore};

pub const APP_DIR_NAME: &str = "messaging-menu";
pub const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_EMAILS: &str = "claws-mail;evolution;geary;icedove;kmail;\
mailspring;mozilla-thunderbird;org.gnome.Evolution;org.gnome.Geary;\
org.kde.kmail2;org.mozilla.Thunderbird;thunderbird";
const DEFAULT_CHATS: &str = "discord;element-desktop;empathy;hexchat;\
org.gnome.Fractal;org.gnome.Polari;org.telegram.desktop;pidgin;\
signal-desktop;slack;telegramdesktop";
const DEFAULT_MBLOGS: &str = "corebird;dev.geopjr.Tuba;gwibber;hotot;\
org.gnome.gitlab.BrainBlasted.Tootle";
const DEFAULT_HIDDEN_EMAIL: &str = "Mail Notification;Mailnag;gmail-notify;\
Evolution Alarm Notify";
const DEFAULT_HIDDEN_MBLOG: &str = "Friends;Tuba";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config in {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("failed to serialize config: {0}")]
    Serialize(String),
    #[error("{0}")]
    Invalid(String),
    #[error("could not resolve a user config directory")]
    NoConfigDir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json5,
}

impl ConfigFormat {
    pub fn for_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") | Some("json5") => Self::Json5,
            _ => Self::Toml,
        }
    }
}

/// On-disk settings. Keys use the same kebab-case names as the settings schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub compatible_chats: String,
    pub compatible_mblogs: String,
    pub compatible_emails: String,
    pub compatible_hidden_email_notifiers: String,
    pub compatible_hidden_mblog_notifiers: String,
    pub notify_email: bool,
    pub notify_chat: bool,
    pub notify_mblogging: bool,
    pub notify_special_clients: bool,
    pub icon_size: u16,
    pub color_rgba: String,
    pub wiggle_indicator: bool,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let config_path = default_config_path().unwrap_or_else(|_| {
            std::env::temp_dir()
                .join(APP_DIR_NAME)
                .join(CONFIG_FILE_NAME)
        });
        Self {
            compatible_chats: DEFAULT_CHATS.to_string(),
            compatible_mblogs: DEFAULT_MBLOGS.to_string(),
            compatible_emails: DEFAULT_EMAILS.to_string(),
            compatible_hidden_email_notifiers: DEFAULT_HIDDEN_EMAIL.to_string(),
            compatible_hidden_mblog_notifiers: DEFAULT_HIDDEN_MBLOG.to_string(),
            notify_email: true,
            notify_chat: true,
            notify_mblogging: true,
            notify_special_clients: true,
            icon_size: 22,
            color_rgba: "rgba(237,51,59,1)".to_string(),
            wiggle_indicator: true,
            config_path,
        }
    }
}

impl SettingsStore for Config {
    fn get_string(&self, key: SettingKey) -> Option<String> {
        let value = match key {
            SettingKey::CompatibleChats => &self.compatible_chats,
            SettingKey::CompatibleMblogs => &self.compatible_mblogs,
            SettingKey::CompatibleEmails => &self.compatible_emails,
            SettingKey::CompatibleHiddenEmailNotifiers => &self.compatible_hidden_email_notifiers,
            SettingKey::CompatibleHiddenMblogNotifiers => &self.compatible_hidden_mblog_notifiers,
            SettingKey::ColorRgba => &self.color_rgba,
            _ => return None,
        };
        Some(value.clone())
    }

    fn get_boolean(&self, key: SettingKey) -> Option<bool> {
        match key {
            SettingKey::NotifyEmail => Some(self.notify_email),
            SettingKey::NotifyChat => Some(self.notify_chat),
            SettingKey::NotifyMblogging => Some(self.notify_mblogging),
            SettingKey::NotifySpecialClients => Some(self.notify_special_clients),
            SettingKey::WiggleIndicator => Some(self.wiggle_indicator),
            _ => None,
        }
    }

    fn get_int(&self, key: SettingKey) -> Option<i64> {
        match key {
            SettingKey::IconSize => Some(i64::from(self.icon_size)),
            _ => None,
        }
    }
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    validate_icon_size(i64::from(cfg.icon_size)).map_err(ConfigError::Invalid)?;
    validate_color_rgba(&cfg.color_rgba).map_err(ConfigError::Invalid)?;

    if cfg.config_path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid("config_path is required".into()));
    }

    Ok(())
}

pub fn parse_str(raw: &str, format: ConfigFormat) -> Result<Config, String> {
    match format {
        ConfigFormat::Toml => toml::from_str(raw).map_err(|e| e.to_string()),
        ConfigFormat::Json5 => json5::from_str(raw).map_err(|e| e.to_string()),
    }
}

/// Loads the config file at `path` (or the default location). A missing file is
/// not an error and yields the defaults bound to that path.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        return Ok(Config {
            config_path: path,
            ..Config::default()
        });
    }

    let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    let mut cfg = parse_str(&raw, ConfigFormat::for_path(&path)).map_err(|message| {
        ConfigError::Parse {
            path: path.clone(),
            message,
        }
    })?;
    cfg.config_path = path;
    validate(&cfg)?;
    Ok(cfg)
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    validate(cfg)?;

    let encoded = match ConfigFormat::for_path(&cfg.config_path) {
        ConfigFormat::Toml => {
            toml::to_string_pretty(cfg).map_err(|e| ConfigError::Serialize(e.to_string()))?
        }
        ConfigFormat::Json5 => serde_json::to_string_pretty(cfg)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?,
    };

    if let Some(parent) = cfg.config_path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(&cfg.config_path, encoded).map_err(|source| ConfigError::Io {
        path: cfg.config_path.clone(),
        source,
    })
}
