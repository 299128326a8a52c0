use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use strum::IntoEnumIterator;
use thiserror::Error;

use crate::config::{validate, Config};
use crate::contract::{
    ActivateResponse, ConfigurationChangedRequest, CoreRequest, CoreResponse, MenuResponse,
    ReconfiguredResponse, StateResponse,
};
use crate::indicator::MessageIndicator;
use crate::inventory::ApplicationInventory;
use crate::launcher::{ProcessLauncher, SystemLauncher};
use crate::settings::{
    validate_color_rgba, validate_icon_size, MemorySettings, SettingKey, SettingValue,
};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("config error: {0}")]
    Config(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("unknown setting: {0}")]
    UnknownSetting(String),
    #[error("menu entry not found: {0}")]
    EntryNotFound(usize),
}

/// Owns the settings backend, the indicator and the launcher used for menu
/// activation; answers host requests one at a time.
pub struct CoreService {
    settings: MemorySettings,
    settings_dirty: Arc<AtomicBool>,
    indicator: MessageIndicator,
    launcher: Box<dyn ProcessLauncher + Send>,
}

impl CoreService {
    pub fn new(
        config: &Config,
        inventory: Box<dyn ApplicationInventory + Send>,
    ) -> Result<Self, ServiceError> {
        validate(config).map_err(|error| ServiceError::Config(error.to_string()))?;

        let mut settings = MemorySettings::from_config(config);
        let settings_dirty = Arc::new(AtomicBool::new(false));
        for key in SettingKey::iter() {
            let dirty = Arc::clone(&settings_dirty);
            settings.connect(key, move |_| dirty.store(true, Ordering::SeqCst));
        }

        let indicator = MessageIndicator::enable(&settings, inventory);
        Ok(Self {
            settings,
            settings_dirty,
            indicator,
            launcher: Box::new(SystemLauncher),
        })
    }

    pub fn with_launcher(mut self, launcher: Box<dyn ProcessLauncher + Send>) -> Self {
        self.launcher = launcher;
        self
    }

    pub fn indicator(&self) -> &MessageIndicator {
        &self.indicator
    }

    pub fn indicator_mut(&mut self) -> &mut MessageIndicator {
        &mut self.indicator
    }

    pub fn handle_command(&mut self, request: CoreRequest) -> Result<CoreResponse, ServiceError> {
        match request {
            CoreRequest::QueueChanged(request) => {
                let response = match self.indicator.on_sources(request.sources) {
                    Some(event) => StateResponse::from_event(&event),
                    None => self.current_state(),
                };
                Ok(CoreResponse::State(response))
            }
            CoreRequest::CurrentState => Ok(CoreResponse::State(self.current_state())),
            CoreRequest::Menu => Ok(CoreResponse::Menu(MenuResponse::from_indicator(
                &self.indicator,
            ))),
            CoreRequest::Activate(request) => {
                let activation = self
                    .indicator
                    .activate(request.index, &*self.launcher)
                    .ok_or(ServiceError::EntryNotFound(request.index))?;
                Ok(CoreResponse::Activated(ActivateResponse { activation }))
            }
            CoreRequest::ConfigurationChanged(request) => {
                self.apply_settings(request)?;
                Ok(CoreResponse::Reconfigured(ReconfiguredResponse {
                    notifiers: self.indicator.registry().notifiers().len(),
                    menu_entries: self.indicator.menu().len(),
                }))
            }
        }
    }

    fn current_state(&self) -> StateResponse {
        let has_unseen = self.indicator.current_state();
        let color = has_unseen.then(|| self.indicator.settings().color_rgba.clone());
        StateResponse::unchanged(has_unseen, color)
    }

    /// Validates the whole batch before storing any of it, then rebuilds the
    /// indicator once if anything changed.
    fn apply_settings(&mut self, request: ConfigurationChangedRequest) -> Result<(), ServiceError> {
        let mut updates = Vec::with_capacity(request.settings.len());
        for (name, value) in request.settings {
            let key = SettingKey::from_str(&name)
                .map_err(|_| ServiceError::UnknownSetting(name.clone()))?;
            validate_setting(key, &value).map_err(ServiceError::InvalidRequest)?;
            updates.push((key, value));
        }

        for (key, value) in updates {
            self.settings
                .set(key, value)
                .map_err(ServiceError::InvalidRequest)?;
        }

        if self.settings_dirty.swap(false, Ordering::SeqCst) {
            self.indicator.on_configuration_changed(&self.settings);
        }
        Ok(())
    }
}

fn validate_setting(key: SettingKey, value: &SettingValue) -> Result<(), String> {
    if value.kind() != key.kind() {
        return Err(format!("Setting '{key}' expects a {:?} value.", key.kind()));
    }
    match (key, value) {
        (SettingKey::IconSize, SettingValue::Int(size)) => validate_icon_size(*size).map(drop),
        (SettingKey::ColorRgba, SettingValue::String(color)) => validate_color_rgba(color),
        _ => Ok(()),
    }
}
