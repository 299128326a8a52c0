use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::indicator::{MessageIndicator, UnseenStateChanged};
use crate::menu::{Activation, MenuEntry};
use crate::settings::SettingValue;
use crate::source::NotificationSource;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueChangedRequest {
    pub sources: Vec<NotificationSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigurationChangedRequest {
    /// Setting name (e.g. `notify-chat`) to new value.
    pub settings: BTreeMap<String, SettingValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivateRequest {
    pub index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateResponse {
    pub has_unseen: bool,
    pub changed: bool,
    pub color: Option<String>,
    pub wiggle: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MenuResponse {
    pub entries: Vec<MenuEntry>,
    /// Pixel size the renderer should load entry icons at.
    pub icon_size: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivateResponse {
    pub activation: Activation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReconfiguredResponse {
    pub notifiers: usize,
    pub menu_entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload")]
pub enum CoreRequest {
    QueueChanged(QueueChangedRequest),
    ConfigurationChanged(ConfigurationChangedRequest),
    CurrentState,
    Menu,
    Activate(ActivateRequest),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload")]
pub enum CoreResponse {
    State(StateResponse),
    Menu(MenuResponse),
    Activated(ActivateResponse),
    Reconfigured(ReconfiguredResponse),
}

impl StateResponse {
    pub fn from_event(event: &UnseenStateChanged) -> Self {
        Self {
            has_unseen: event.has_unseen,
            changed: true,
            color: event.color.clone(),
            wiggle: event.wiggle,
        }
    }

    pub fn unchanged(has_unseen: bool, color: Option<String>) -> Self {
        Self {
            has_unseen,
            changed: false,
            color,
            wiggle: false,
        }
    }
}

impl MenuResponse {
    pub fn from_indicator(indicator: &MessageIndicator) -> Self {
        Self {
            entries: indicator.menu().to_vec(),
            icon_size: indicator.settings().icon_size,
        }
    }
}
