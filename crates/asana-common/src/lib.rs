pub mod config;
pub mod logging;

pub const APP_NAME: &str = "asana";

pub use config::{AsanaConfig, ConfigError, ConfigKey, ConfigStore, ConfigUpdate, DefaultWorkspace};
