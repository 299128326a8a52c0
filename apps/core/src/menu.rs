use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, SpecialActionKind, SpecialClient};
use crate::inventory::KnownApplication;
use crate::launcher::{try_spawn, ProcessLauncher};

pub const COMPOSE_LABEL: &str = "Compose New Message...";
pub const CONTACTS_LABEL: &str = "Contacts";
pub const SETTINGS_LABEL: &str = "Settings";
pub const COMPOSE_ICON: &str = "mail-message-new-symbolic";
pub const CONTACTS_ICON: &str = "contact-new-symbolic";

/// Special clients appear at the top of the menu in this order.
const SPECIAL_MENU_ORDER: [SpecialClient; 6] = [
    SpecialClient::Evolution,
    SpecialClient::Thunderbird,
    SpecialClient::Icedove,
    SpecialClient::Kmail,
    SpecialClient::Claws,
    SpecialClient::Geary,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MenuAction {
    LaunchApp { app_id: String, command_line: String },
    Spawn { command_line: String },
    OpenSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MenuEntry {
    Item {
        label: String,
        icon: Option<String>,
        special: bool,
        action: MenuAction,
    },
    Separator,
}

impl MenuEntry {
    fn launcher(app: &KnownApplication) -> Self {
        Self::Item {
            label: app.name.clone(),
            icon: app.icon.clone(),
            special: false,
            action: MenuAction::LaunchApp {
                app_id: app.id.clone(),
                command_line: app.launch_command(&[]),
            },
        }
    }

    fn special_action(kind: SpecialActionKind, command_line: &str) -> Self {
        let (label, icon) = match kind {
            SpecialActionKind::Compose => (COMPOSE_LABEL, COMPOSE_ICON),
            SpecialActionKind::Contacts => (CONTACTS_LABEL, CONTACTS_ICON),
        };
        Self::Item {
            label: label.to_string(),
            icon: Some(icon.to_string()),
            special: true,
            action: MenuAction::Spawn {
                command_line: command_line.to_string(),
            },
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Item { label, .. } => Some(label),
            Self::Separator => None,
        }
    }

    pub fn action(&self) -> Option<&MenuAction> {
        match self {
            Self::Item { action, .. } => Some(action),
            Self::Separator => None,
        }
    }
}

pub fn build_menu(catalog: &Catalog) -> Vec<MenuEntry> {
    let mut entries = Vec::new();

    for client in SPECIAL_MENU_ORDER {
        let Some(app) = catalog.special.get(client) else {
            continue;
        };
        entries.push(MenuEntry::launcher(app));
        for action in client.spec().actions {
            entries.push(MenuEntry::special_action(action.kind, action.command_line));
        }
    }

    entries.extend(catalog.generic_email.iter().map(MenuEntry::launcher));
    entries.push(MenuEntry::Separator);
    entries.extend(catalog.generic_chat.iter().map(MenuEntry::launcher));
    entries.push(MenuEntry::Separator);
    entries.extend(catalog.generic_microblog.iter().map(MenuEntry::launcher));
    entries.push(MenuEntry::Separator);
    entries.push(MenuEntry::Item {
        label: SETTINGS_LABEL.to_string(),
        icon: None,
        special: false,
        action: MenuAction::OpenSettings,
    });

    entries
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Spawned { command_line: String },
    SpawnFailed { command_line: String },
    /// The host opens its preferences dialog.
    OpenSettings,
    Ignored,
}

pub fn activate(entry: &MenuEntry, launcher: &dyn ProcessLauncher) -> Activation {
    let command_line = match entry.action() {
        Some(MenuAction::LaunchApp { command_line, .. }) => command_line,
        Some(MenuAction::Spawn { command_line }) => command_line,
        Some(MenuAction::OpenSettings) => return Activation::OpenSettings,
        None => return Activation::Ignored,
    };

    if try_spawn(launcher, command_line) {
        Activation::Spawned {
            command_line: command_line.clone(),
        }
    } else {
        Activation::SpawnFailed {
            command_line: command_line.clone(),
        }
    }
}
