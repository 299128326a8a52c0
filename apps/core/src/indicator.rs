use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::aggregation::{AggregationState, IndicatorState, ScanOutcome};
use crate::catalog::Catalog;
use crate::inventory::ApplicationInventory;
use crate::launcher::ProcessLauncher;
use crate::menu::{self, Activation, MenuEntry};
use crate::notifier::NotifierRegistry;
use crate::settings::{Settings, SettingsStore};
use crate::source::{NotificationSource, NotificationTray, SnapshotTray, TrayError};

/// Emitted on every Quiet/Flagged transition and never otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnseenStateChanged {
    pub has_unseen: bool,
    /// Highlight colour for the panel icon while flagged.
    pub color: Option<String>,
    /// Whether the icon should wiggle once.
    pub wiggle: bool,
}

pub type ListenerId = u64;

type Listener = Box<dyn FnMut(&UnseenStateChanged) + Send>;

/// Everything derived from settings. Replaced as a whole on reconfiguration.
struct IndicatorContext {
    settings: Settings,
    catalog: Catalog,
    registry: NotifierRegistry,
    menu: Vec<MenuEntry>,
}

impl IndicatorContext {
    fn build(store: &dyn SettingsStore, inventory: &dyn ApplicationInventory) -> Self {
        let settings = Settings::from_store(store);
        let catalog = Catalog::build(&settings.lists, inventory);
        let registry = NotifierRegistry::build(
            &catalog,
            settings.flags,
            settings.special_policy,
            settings.hidden_email.clone(),
            settings.hidden_microblog.clone(),
        );
        let menu = menu::build_menu(&catalog);
        Self {
            settings,
            catalog,
            registry,
            menu,
        }
    }
}

/// The messaging indicator: created on enable, dropped on disable.
pub struct MessageIndicator {
    inventory: Box<dyn ApplicationInventory + Send>,
    context: IndicatorContext,
    state: AggregationState,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: ListenerId,
}

impl MessageIndicator {
    pub fn enable(
        store: &dyn SettingsStore,
        inventory: Box<dyn ApplicationInventory + Send>,
    ) -> Self {
        let context = IndicatorContext::build(store, &*inventory);
        log::info!(
            "indicator enabled with {} notifiers",
            context.registry.notifiers().len()
        );
        Self {
            inventory,
            context,
            state: AggregationState::new(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn disable(self) {
        log::info!("indicator disabled");
    }

    /// Wraps the indicator for hosts that deliver events from several threads.
    pub fn shared(self) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(self))
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&UnseenStateChanged) + Send + 'static,
    ) -> ListenerId {
        self.next_listener += 1;
        let id = self.next_listener;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }

    pub fn current_state(&self) -> bool {
        self.state.has_unseen()
    }

    pub fn indicator_state(&self) -> IndicatorState {
        self.state.state()
    }

    pub fn settings(&self) -> &Settings {
        &self.context.settings
    }

    pub fn catalog(&self) -> &Catalog {
        &self.context.catalog
    }

    pub fn registry(&self) -> &NotifierRegistry {
        &self.context.registry
    }

    pub fn menu(&self) -> &[MenuEntry] {
        &self.context.menu
    }

    /// Handles the tray's queue-changed event. Scan failures are logged and the
    /// previous state is kept. Returns the event when a transition happened.
    pub fn on_queue_changed(&mut self, tray: &dyn NotificationTray) -> Option<UnseenStateChanged> {
        let result = self.state.scan_tray(
            tray,
            &self.context.registry,
            self.context.settings.flags,
        );
        self.finish_scan(result)
    }

    pub fn on_sources(&mut self, sources: Vec<NotificationSource>) -> Option<UnseenStateChanged> {
        self.on_queue_changed(&SnapshotTray::new(sources))
    }

    /// Re-reads settings and swaps in a freshly built catalog, registry and menu.
    /// The aggregate state survives the swap.
    pub fn on_configuration_changed(&mut self, store: &dyn SettingsStore) {
        self.context = IndicatorContext::build(store, &*self.inventory);
        log::info!(
            "configuration reloaded: {} notifiers, {} menu entries",
            self.context.registry.notifiers().len(),
            self.context.menu.len()
        );
    }

    pub fn activate(&self, index: usize, launcher: &dyn ProcessLauncher) -> Option<Activation> {
        self.context
            .menu
            .get(index)
            .map(|entry| menu::activate(entry, launcher))
    }

    fn finish_scan(&mut self, result: Result<ScanOutcome, TrayError>) -> Option<UnseenStateChanged> {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(error) => {
                log::error!("message scan failed, keeping previous state: {error}");
                return None;
            }
        };
        if !outcome.changed {
            return None;
        }

        let settings = &self.context.settings;
        let event = UnseenStateChanged {
            has_unseen: outcome.value,
            color: outcome.value.then(|| settings.color_rgba.clone()),
            wiggle: outcome.value && settings.wiggle_indicator,
        };
        log::info!(
            "unseen state changed to {}",
            if event.has_unseen { "flagged" } else { "quiet" }
        );
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
        Some(event)
    }
}
