use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use walkdir::WalkDir;

use crate::launcher::strip_field_codes;

pub const DESKTOP_SUFFIX: &str = ".desktop";

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to walk application directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// An installed application resolved from the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownApplication {
    /// Desktop-file id, e.g. `thunderbird.desktop`.
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub exec: String,
}

impl KnownApplication {
    pub fn new(id: &str, name: &str, exec: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: None,
            exec: exec.to_string(),
        }
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    /// Command line that starts the application with `args` appended.
    pub fn launch_command(&self, args: &[&str]) -> String {
        let mut line = strip_field_codes(&self.exec);
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

pub trait ApplicationInventory {
    fn lookup(&self, desktop_id: &str) -> Option<KnownApplication>;
}

/// Maps a configured identifier to the desktop id the inventory is keyed by.
pub fn desktop_id_for(identifier: &str) -> String {
    if identifier.ends_with(DESKTOP_SUFFIX) {
        identifier.to_string()
    } else {
        format!("{identifier}{DESKTOP_SUFFIX}")
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticInventory {
    apps: HashMap<String, KnownApplication>,
}

impl StaticInventory {
    pub fn from_apps(apps: Vec<KnownApplication>) -> Self {
        Self {
            apps: apps.into_iter().map(|app| (app.id.clone(), app)).collect(),
        }
    }

    pub fn deterministic_fixture() -> Self {
        Self::from_apps(vec![
            KnownApplication::new("thunderbird.desktop", "Thunderbird Mail", "thunderbird %u")
                .with_icon("thunderbird"),
            KnownApplication::new(
                "org.gnome.Evolution.desktop",
                "Evolution",
                "evolution %U",
            )
            .with_icon("org.gnome.Evolution"),
            KnownApplication::new("mailspring.desktop", "Mailspring", "mailspring %U"),
            KnownApplication::new("org.gnome.Polari.desktop", "Polari", "polari"),
            KnownApplication::new("signal-desktop.desktop", "Signal", "signal-desktop %U"),
            KnownApplication::new("dev.geopjr.Tuba.desktop", "Tuba", "dev.geopjr.Tuba %u"),
        ])
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

impl ApplicationInventory for StaticInventory {
    fn lookup(&self, desktop_id: &str) -> Option<KnownApplication> {
        self.apps.get(desktop_id).cloned()
    }
}

/// Inventory built from freedesktop `.desktop` files.
#[derive(Debug, Default)]
pub struct DesktopEntryInventory {
    entries: HashMap<String, KnownApplication>,
    load_warnings: Vec<String>,
}

impl DesktopEntryInventory {
    /// Scans each directory recursively. Earlier directories take precedence when
    /// two of them provide the same desktop id.
    pub fn from_dirs(dirs: &[PathBuf]) -> Self {
        let mut inventory = Self::default();
        for root in dirs {
            if !root.is_dir() {
                continue;
            }
            for entry in WalkDir::new(root).follow_links(true) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(error) => {
                        inventory
                            .load_warnings
                            .push(InventoryError::from(error).to_string());
                        continue;
                    }
                };
                let path = entry.path();
                if !entry.file_type().is_file() || !is_desktop_file(path) {
                    continue;
                }
                let Some(desktop_id) = desktop_id_from_path(root, path) else {
                    continue;
                };
                if inventory.entries.contains_key(&desktop_id) {
                    continue;
                }
                match load_entry(path) {
                    Ok(Some(parsed)) => {
                        let app = KnownApplication {
                            id: desktop_id.clone(),
                            name: parsed.name,
                            icon: parsed.icon,
                            exec: parsed.exec,
                        };
                        inventory.entries.insert(desktop_id, app);
                    }
                    Ok(None) => {
                        log::debug!("skipping incomplete desktop entry {}", path.display());
                    }
                    Err(error) => inventory.load_warnings.push(error.to_string()),
                }
            }
        }
        log::debug!(
            "desktop inventory loaded {} entries ({} warnings)",
            inventory.entries.len(),
            inventory.load_warnings.len()
        );
        inventory
    }

    pub fn from_xdg() -> Self {
        Self::from_dirs(&xdg_application_dirs())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }
}

impl ApplicationInventory for DesktopEntryInventory {
    fn lookup(&self, desktop_id: &str) -> Option<KnownApplication> {
        self.entries.get(desktop_id).cloned()
    }
}

/// `$XDG_DATA_HOME/applications` followed by `applications` under each
/// `$XDG_DATA_DIRS` entry.
pub fn xdg_application_dirs() -> Vec<PathBuf> {
    let mut out = Vec::new();

    let data_home = std::env::var_os("XDG_DATA_HOME")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::data_dir);
    if let Some(home) = data_home {
        out.push(home.join("applications"));
    }

    let data_dirs = std::env::var("XDG_DATA_DIRS")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());
    for dir in data_dirs.split(':').filter(|dir| !dir.is_empty()) {
        let candidate = PathBuf::from(dir).join("applications");
        if !out.contains(&candidate) {
            out.push(candidate);
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
    pub name: String,
    pub exec: String,
    pub icon: Option<String>,
}

/// Reads the `[Desktop Entry]` group. Returns `None` when `Name` or `Exec` is
/// missing or the entry is not an application.
pub fn parse_desktop_entry(content: &str) -> Option<DesktopEntry> {
    let mut name = None;
    let mut exec = None;
    let mut icon = None;
    let mut entry_type = None;
    let mut in_main_group = false;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if trimmed.starts_with('[') {
            in_main_group = trimmed == "[Desktop Entry]";
            continue;
        }
        if !in_main_group {
            continue;
        }

        let Some((key, value)) = trimmed.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "Name" if name.is_none() => name = Some(value.to_string()),
            "Exec" if exec.is_none() => exec = Some(value.to_string()),
            "Icon" if icon.is_none() && !value.is_empty() => icon = Some(value.to_string()),
            "Type" => entry_type = Some(value.to_string()),
            _ => {}
        }
    }

    if entry_type.as_deref().is_some_and(|t| t != "Application") {
        return None;
    }

    let name = name.filter(|n| !n.is_empty())?;
    let exec = exec.filter(|e| !e.is_empty())?;
    Some(DesktopEntry { name, exec, icon })
}

fn load_entry(path: &Path) -> Result<Option<DesktopEntry>, InventoryError> {
    let raw = std::fs::read_to_string(path).map_err(|source| InventoryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_desktop_entry(&raw))
}

fn is_desktop_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == "desktop")
}

/// Subdirectories become `-` separated prefixes, so `kde4/KMail2.desktop` is
/// `kde4-KMail2.desktop`.
fn desktop_id_from_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("-"))
}
