pub mod aggregator;
pub mod browser;
pub mod calendar;
pub mod channel;
pub mod commands;
pub mod config;
pub mod contract;
pub mod controller;
pub mod display;
pub mod heartbeat;
pub mod hotkey;
pub mod logging;
pub mod model;
pub mod overlay_state;
pub mod runtime;
pub mod search;
pub mod selection;
pub mod settings;
pub mod snapshot_store;
pub mod transport;
