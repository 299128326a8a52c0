use serde::{Deserialize, Serialize};

use crate::classifier::is_unseen;
use crate::notifier::{NotifierRegistry, NotifyFlags};
use crate::source::{NotificationSource, NotificationTray, TrayError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorState {
    #[default]
    Quiet,
    Flagged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    pub changed: bool,
    pub value: bool,
}

/// The aggregate "has unseen messages" flag. Only `scan` mutates it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationState {
    has_unseen: bool,
}

impl AggregationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_unseen(&self) -> bool {
        self.has_unseen
    }

    pub fn state(&self) -> IndicatorState {
        if self.has_unseen {
            IndicatorState::Flagged
        } else {
            IndicatorState::Quiet
        }
    }

    /// Stores the OR of the per-source results and reports whether it flipped.
    pub fn scan(
        &mut self,
        sources: &[NotificationSource],
        registry: &NotifierRegistry,
        flags: NotifyFlags,
    ) -> ScanOutcome {
        let value = sources
            .iter()
            .any(|source| is_unseen(source, registry, flags));

        let changed = value != self.has_unseen;
        self.has_unseen = value;
        ScanOutcome { changed, value }
    }

    pub fn scan_tray(
        &mut self,
        tray: &dyn NotificationTray,
        registry: &NotifierRegistry,
        flags: NotifyFlags,
    ) -> Result<ScanOutcome, TrayError> {
        let sources = tray.sources()?;
        Ok(self.scan(&sources, registry, flags))
    }
}

#[cfg(test)]
mod tests {
    use super::{AggregationState, IndicatorState};
    use crate::notifier::{NotifierRegistry, NotifyFlags};
    use crate::source::{NotificationSource, NotificationTray, TrayError};

    struct DeadTray;

    impl NotificationTray for DeadTray {
        fn sources(&self) -> Result<Vec<NotificationSource>, TrayError> {
            Err(TrayError::Unavailable("gone".into()))
        }
    }

    #[test]
    fn tray_failure_keeps_previous_value() {
        let registry = NotifierRegistry::default();
        let mut state = AggregationState::new();
        state.scan(&[NotificationSource::chat(1)], &registry, NotifyFlags::all());
        assert_eq!(state.state(), IndicatorState::Flagged);

        let result = state.scan_tray(&DeadTray, &registry, NotifyFlags::all());
        assert!(matches!(result, Err(TrayError::Unavailable(_))));
        assert!(state.has_unseen());
    }

    #[test]
    fn blank_bound_id_does_not_mask_other_sources() {
        let registry = NotifierRegistry::default();
        let mut state = AggregationState::new();
        let sources = [
            NotificationSource::for_app("", "Background service"),
            NotificationSource::chat(3),
        ];

        let outcome = state.scan(&sources, &registry, NotifyFlags::all());
        assert!(outcome.changed && outcome.value);
    }
}
