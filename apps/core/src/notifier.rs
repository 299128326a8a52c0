use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::inventory::KnownApplication;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyFlags {
    pub notify_email: bool,
    pub notify_chat: bool,
    pub notify_mblog: bool,
}

impl NotifyFlags {
    pub fn all() -> Self {
        Self {
            notify_email: true,
            notify_chat: true,
            notify_mblog: true,
        }
    }
}

/// Whether email clients bound to a special slot (thunderbird, evolution, ...)
/// also act as notifiers. `Include` is the default; `Exclude` keeps only the
/// generic lists, matching older releases of the indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialNotifierPolicy {
    #[default]
    Include,
    Exclude,
}

impl SpecialNotifierPolicy {
    pub fn from_flag(include: bool) -> Self {
        if include {
            Self::Include
        } else {
            Self::Exclude
        }
    }
}

/// Applications and hidden title patterns a notification source is matched
/// against. Hidden pattern lists are kept regardless of the notify flags; the
/// classifier gates them when it reads them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifierRegistry {
    notifiers: Vec<KnownApplication>,
    hidden_email: Vec<String>,
    hidden_microblog: Vec<String>,
}

impl NotifierRegistry {
    pub fn build(
        catalog: &Catalog,
        flags: NotifyFlags,
        policy: SpecialNotifierPolicy,
        hidden_email: Vec<String>,
        hidden_microblog: Vec<String>,
    ) -> Self {
        let mut notifiers = Vec::new();

        if flags.notify_email {
            notifiers.extend(catalog.generic_email.iter().cloned());
            if policy == SpecialNotifierPolicy::Include {
                notifiers.extend(catalog.special.iter().map(|(_, app)| app.clone()));
            }
        }
        if flags.notify_chat {
            notifiers.extend(catalog.generic_chat.iter().cloned());
        }
        if flags.notify_mblog {
            notifiers.extend(catalog.generic_microblog.iter().cloned());
        }

        Self {
            notifiers,
            hidden_email,
            hidden_microblog,
        }
    }

    pub fn notifiers(&self) -> &[KnownApplication] {
        &self.notifiers
    }

    pub fn hidden_email(&self) -> &[String] {
        &self.hidden_email
    }

    pub fn hidden_microblog(&self) -> &[String] {
        &self.hidden_microblog
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty() && self.hidden_email.is_empty() && self.hidden_microblog.is_empty()
    }
}
