use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrayError {
    #[error("notification tray unavailable: {0}")]
    Unavailable(String),
    #[error("malformed notification source: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundApplication {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// One tray entry as reported by the host. Field names follow the host's JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationSource {
    pub is_chat: bool,
    pub is_muted: bool,
    #[serde(rename = "app", skip_serializing_if = "Option::is_none")]
    pub bound_application: Option<BoundApplication>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub unseen_count: u32,
    /// Newer trays report this instead of `unseen_count`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count_visible: Option<u32>,
}

impl NotificationSource {
    pub fn chat(unseen_count: u32) -> Self {
        Self {
            is_chat: true,
            unseen_count,
            ..Self::default()
        }
    }

    pub fn for_app(id: &str, name: &str) -> Self {
        Self {
            bound_application: Some(BoundApplication {
                id: id.to_string(),
                name: name.to_string(),
            }),
            ..Self::default()
        }
    }

    pub fn titled(title: &str) -> Self {
        Self::default().with_title(title)
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_count_visible(mut self, count: u32) -> Self {
        self.count_visible = Some(count);
        self
    }

    pub fn muted(mut self) -> Self {
        self.is_muted = true;
        self
    }

    /// `count_visible` wins whenever it is present, including when it is zero.
    pub fn unseen_count_of(&self) -> u32 {
        self.count_visible.unwrap_or(self.unseen_count)
    }
}

pub trait NotificationTray {
    fn sources(&self) -> Result<Vec<NotificationSource>, TrayError>;
}

/// A tray backed by a fixed list, e.g. the sources carried by a host request.
#[derive(Debug, Clone, Default)]
pub struct SnapshotTray {
    sources: Vec<NotificationSource>,
}

impl SnapshotTray {
    pub fn new(sources: Vec<NotificationSource>) -> Self {
        Self { sources }
    }
}

impl NotificationTray for SnapshotTray {
    fn sources(&self) -> Result<Vec<NotificationSource>, TrayError> {
        Ok(self.sources.clone())
    }
}

/// Reads a JSON array of sources from a file on every query.
#[derive(Debug, Clone)]
pub struct FileTray {
    path: std::path::PathBuf,
}

impl FileTray {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl NotificationTray for FileTray {
    fn sources(&self) -> Result<Vec<NotificationSource>, TrayError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|error| {
            TrayError::Unavailable(format!("{}: {error}", self.path.display()))
        })?;
        serde_json::from_str(&raw)
            .map_err(|error| TrayError::Malformed(format!("{}: {error}", self.path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::NotificationSource;

    #[test]
    fn decodes_host_json_with_either_count_field() {
        let legacy: NotificationSource =
            serde_json::from_str(r#"{"isChat":true,"unseenCount":2}"#).unwrap();
        assert_eq!(legacy.count_visible, None);
        assert_eq!(legacy.unseen_count_of(), 2);

        let current: NotificationSource =
            serde_json::from_str(r#"{"isChat":true,"unseenCount":2,"countVisible":0}"#).unwrap();
        assert_eq!(current.count_visible, Some(0));
        assert_eq!(current.unseen_count_of(), 0);
    }

    #[test]
    fn decodes_bound_application() {
        let source: NotificationSource = serde_json::from_str(
            r#"{"app":{"id":"thunderbird.desktop","name":"Thunderbird"},"title":"Inbox"}"#,
        )
        .unwrap();
        assert_eq!(source.bound_application.unwrap().id, "thunderbird.desktop");
        assert_eq!(source.title.as_deref(), Some("Inbox"));
    }
}
