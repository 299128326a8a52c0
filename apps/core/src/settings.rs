use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::catalog::CategoryLists;
use crate::config::Config;
use crate::notifier::{NotifyFlags, SpecialNotifierPolicy};

pub const MIN_ICON_SIZE: i64 = 12;
pub const MAX_ICON_SIZE: i64 = 64;

/// Every setting the indicator reads. The string form is the settings key.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum SettingKey {
    CompatibleChats,
    CompatibleMblogs,
    CompatibleEmails,
    CompatibleHiddenEmailNotifiers,
    CompatibleHiddenMblogNotifiers,
    NotifyEmail,
    NotifyChat,
    NotifyMblogging,
    NotifySpecialClients,
    IconSize,
    ColorRgba,
    WiggleIndicator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    String,
    Boolean,
    Int,
}

impl SettingKey {
    pub fn kind(self) -> SettingKind {
        match self {
            Self::CompatibleChats
            | Self::CompatibleMblogs
            | Self::CompatibleEmails
            | Self::CompatibleHiddenEmailNotifiers
            | Self::CompatibleHiddenMblogNotifiers
            | Self::ColorRgba => SettingKind::String,
            Self::NotifyEmail
            | Self::NotifyChat
            | Self::NotifyMblogging
            | Self::NotifySpecialClients
            | Self::WiggleIndicator => SettingKind::Boolean,
            Self::IconSize => SettingKind::Int,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Boolean(bool),
    Int(i64),
    String(String),
}

impl SettingValue {
    pub fn kind(&self) -> SettingKind {
        match self {
            Self::Boolean(_) => SettingKind::Boolean,
            Self::Int(_) => SettingKind::Int,
            Self::String(_) => SettingKind::String,
        }
    }
}

/// Read side of a settings backend. `None` means the backend has no value for the
/// key and the built-in default applies.
pub trait SettingsStore {
    fn get_string(&self, key: SettingKey) -> Option<String>;
    fn get_boolean(&self, key: SettingKey) -> Option<bool>;
    fn get_int(&self, key: SettingKey) -> Option<i64>;
}

/// Typed snapshot of the settings taken when the indicator is (re)built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub lists: CategoryLists,
    pub hidden_email: Vec<String>,
    pub hidden_microblog: Vec<String>,
    pub flags: NotifyFlags,
    pub special_policy: SpecialNotifierPolicy,
    pub icon_size: u16,
    pub color_rgba: String,
    pub wiggle_indicator: bool,
}

impl Settings {
    pub fn from_store(store: &dyn SettingsStore) -> Self {
        let defaults = Config::default();
        let string = |key: SettingKey| {
            store
                .get_string(key)
                .or_else(|| defaults.get_string(key))
                .unwrap_or_default()
        };
        let boolean = |key: SettingKey| {
            store
                .get_boolean(key)
                .or_else(|| defaults.get_boolean(key))
                .unwrap_or(false)
        };

        let icon_size = store
            .get_int(SettingKey::IconSize)
            .and_then(|value| validate_icon_size(value).ok())
            .unwrap_or(defaults.icon_size);

        let color_rgba = store
            .get_string(SettingKey::ColorRgba)
            .filter(|value| validate_color_rgba(value).is_ok())
            .unwrap_or_else(|| defaults.color_rgba.clone());

        Self {
            lists: CategoryLists::parse(
                &string(SettingKey::CompatibleEmails),
                &string(SettingKey::CompatibleChats),
                &string(SettingKey::CompatibleMblogs),
            ),
            hidden_email: parse_id_list(&string(SettingKey::CompatibleHiddenEmailNotifiers)),
            hidden_microblog: parse_id_list(&string(SettingKey::CompatibleHiddenMblogNotifiers)),
            flags: NotifyFlags {
                notify_email: boolean(SettingKey::NotifyEmail),
                notify_chat: boolean(SettingKey::NotifyChat),
                notify_mblog: boolean(SettingKey::NotifyMblogging),
            },
            special_policy: SpecialNotifierPolicy::from_flag(boolean(
                SettingKey::NotifySpecialClients,
            )),
            icon_size,
            color_rgba,
            wiggle_indicator: boolean(SettingKey::WiggleIndicator),
        }
    }
}

/// Splits a `;`-joined list. Never fails: blank segments are dropped, duplicates
/// are removed case-insensitively keeping the first spelling, and the result is
/// ordered for display.
pub fn parse_id_list(raw: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out: Vec<String> = raw
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter(|part| seen.insert(part.to_lowercase()))
        .map(str::to_string)
        .collect();

    out.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    out
}

pub fn validate_icon_size(value: i64) -> Result<u16, String> {
    if (MIN_ICON_SIZE..=MAX_ICON_SIZE).contains(&value) {
        Ok(value as u16)
    } else {
        Err(format!(
            "Icon size must be between {MIN_ICON_SIZE} and {MAX_ICON_SIZE}."
        ))
    }
}

pub fn validate_color_rgba(input: &str) -> Result<(), String> {
    let value = input.trim();
    if value.is_empty() {
        return Err("Color is required.".to_string());
    }

    if let Some(hex) = value.strip_prefix('#') {
        let valid_len = matches!(hex.len(), 3 | 4 | 6 | 8);
        if valid_len && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(());
        }
        return Err(format!("'{value}' is not a valid hex color."));
    }

    let lower = value.to_ascii_lowercase();
    let (body, expected) = if let Some(rest) = lower.strip_prefix("rgba(") {
        (rest, 4)
    } else if let Some(rest) = lower.strip_prefix("rgb(") {
        (rest, 3)
    } else {
        return Err(format!("'{value}' is not a hex, rgb() or rgba() color."));
    };

    let Some(body) = body.strip_suffix(')') else {
        return Err(format!("'{value}' is missing a closing parenthesis."));
    };

    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != expected {
        return Err(format!(
            "'{value}' must have {expected} comma-separated components."
        ));
    }

    for channel in &parts[..3] {
        match channel.parse::<u16>() {
            Ok(v) if v <= 255 => {}
            _ => return Err(format!("Color channel '{channel}' must be 0-255.")),
        }
    }
    if expected == 4 {
        match parts[3].parse::<f64>() {
            Ok(alpha) if (0.0..=1.0).contains(&alpha) => {}
            _ => return Err(format!("Alpha '{}' must be between 0 and 1.", parts[3])),
        }
    }

    Ok(())
}

pub type SignalId = u64;

type ChangeHandler = Box<dyn FnMut(SettingKey) + Send>;

/// In-memory settings backend with per-key change notification.
#[derive(Default)]
pub struct MemorySettings {
    values: BTreeMap<SettingKey, SettingValue>,
    handlers: Vec<(SignalId, SettingKey, ChangeHandler)>,
    next_signal: SignalId,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(cfg: &Config) -> Self {
        use strum::IntoEnumIterator;

        let mut settings = Self::new();
        for key in SettingKey::iter() {
            let value = match key.kind() {
                SettingKind::String => cfg.get_string(key).map(SettingValue::String),
                SettingKind::Boolean => cfg.get_boolean(key).map(SettingValue::Boolean),
                SettingKind::Int => cfg.get_int(key).map(SettingValue::Int),
            };
            if let Some(value) = value {
                settings.values.insert(key, value);
            }
        }
        settings
    }

    pub fn connect(
        &mut self,
        key: SettingKey,
        handler: impl FnMut(SettingKey) + Send + 'static,
    ) -> SignalId {
        self.next_signal += 1;
        let id = self.next_signal;
        self.handlers.push((id, key, Box::new(handler)));
        id
    }

    pub fn disconnect(&mut self, id: SignalId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(signal, _, _)| *signal != id);
        self.handlers.len() != before
    }

    /// Stores `value` and notifies handlers connected to `key`. Returns whether the
    /// stored value changed.
    pub fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<bool, String> {
        if value.kind() != key.kind() {
            return Err(format!(
                "Setting '{key}' expects a {:?} value.",
                key.kind()
            ));
        }
        if self.values.get(&key) == Some(&value) {
            return Ok(false);
        }

        self.values.insert(key, value);
        for (_, watched, handler) in self.handlers.iter_mut() {
            if *watched == key {
                handler(key);
            }
        }
        Ok(true)
    }

    pub fn set_string(&mut self, key: SettingKey, value: &str) -> Result<bool, String> {
        self.set(key, SettingValue::String(value.to_string()))
    }

    pub fn set_boolean(&mut self, key: SettingKey, value: bool) -> Result<bool, String> {
        self.set(key, SettingValue::Boolean(value))
    }

    pub fn set_int(&mut self, key: SettingKey, value: i64) -> Result<bool, String> {
        self.set(key, SettingValue::Int(value))
    }
}

impl SettingsStore for MemorySettings {
    fn get_string(&self, key: SettingKey) -> Option<String> {
        match self.values.get(&key) {
            Some(SettingValue::String(value)) => Some(value.clone()),
            _ => None,
        }
    }

    fn get_boolean(&self, key: SettingKey) -> Option<bool> {
        match self.values.get(&key) {
            Some(SettingValue::Boolean(value)) => Some(*value),
            _ => None,
        }
    }

    fn get_int(&self, key: SettingKey) -> Option<i64> {
        match self.values.get(&key) {
            Some(SettingValue::Int(value)) => Some(*value),
            _ => None,
        }
    }
}
