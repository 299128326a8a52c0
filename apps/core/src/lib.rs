pub mod aggregation;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod contract;
pub mod core_service;
pub mod indicator;
pub mod inventory;
pub mod launcher;
pub mod logging;
pub mod menu;
pub mod notifier;
pub mod runtime;
pub mod settings;
pub mod source;
pub mod transport;
