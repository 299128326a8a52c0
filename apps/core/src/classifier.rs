use crate::notifier::{NotifierRegistry, NotifyFlags};
use crate::source::NotificationSource;

/// Decides whether one tray source currently signals an unseen message.
///
/// Chat sources are judged by their unread count, app-bound sources by their
/// application id, and everything else by its title. Every text match checks
/// that the configured value contains the value reported by the source, so a
/// blank application id or title matches nothing.
pub fn is_unseen(
    source: &NotificationSource,
    registry: &NotifierRegistry,
    flags: NotifyFlags,
) -> bool {
    if flags.notify_chat && source.is_chat && !source.is_muted {
        return source.unseen_count_of() > 0;
    }

    let title = source.title.as_deref();

    if let Some(app) = &source.bound_application {
        if !flags.notify_email {
            return false;
        }
        let app_id = app.id.trim();
        let by_id = registry
            .notifiers()
            .iter()
            .any(|notifier| contains_ignore_case(&notifier.id, app_id));
        return by_id || matches_any(registry.hidden_email(), title);
    }

    let mut unseen = false;
    if flags.notify_email {
        let by_name = title.is_some_and(|title| {
            registry
                .notifiers()
                .iter()
                .any(|notifier| contains_ignore_case(&notifier.name, title))
        });
        unseen = by_name || matches_any(registry.hidden_email(), title);
    }
    if flags.notify_mblog {
        unseen = unseen || matches_any(registry.hidden_microblog(), title);
    }
    unseen
}

/// True when `haystack` contains `needle`, ignoring case. An empty needle
/// never matches.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_any(patterns: &[String], title: Option<&str>) -> bool {
    let Some(title) = title else {
        return false;
    };
    patterns
        .iter()
        .any(|pattern| contains_ignore_case(pattern, title))
}

#[cfg(test)]
mod tests {
    use super::contains_ignore_case;

    #[test]
    fn containment_is_directional() {
        assert!(contains_ignore_case("org.mozilla.Thunderbird", "thunderbird"));
        assert!(!contains_ignore_case("thunderbird", "org.mozilla.Thunderbird"));
    }

    #[test]
    fn empty_needle_never_matches() {
        assert!(!contains_ignore_case("Mailnag", ""));
    }
}
