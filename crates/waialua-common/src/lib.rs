//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Shared primitives and utilities for the node runtime."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Shared primitives for the Waialua edge node workspace.
//! This crate exposes configuration loading, tracing setup, and the
//! clock abstraction consumed by the mission engine and its drivers.

pub mod config;
pub mod logging;
pub mod time;

pub use config::{
    AppConfig, ConfigError, GovernorConfig, LoadedAppConfig, LoggingConfig, MissionConfig,
    NodeConfig, RunConfig, SamplerConfig,
};
pub use logging::{init_tracing, LogFormat};
pub use time::{Clock, SteppingClock, SystemClock};
