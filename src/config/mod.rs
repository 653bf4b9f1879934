//! Startup configuration: backend credentials, allow-list and display locale.
//!
//! Resolution runs once at startup and yields an immutable [`Config`]. The
//! aggregator never reads configuration.

pub mod manager;
pub mod model;

pub use manager::ConfigManager;
pub use model::{BackendSettings, Config, ENV_PREFIX};
