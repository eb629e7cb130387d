//! Application configuration.
//!
//! Settings are loaded from a TOML file (`config/default.toml` unless another
//! path is given) and can be overridden through environment variables with
//! the `SSA` prefix, e.g. `SSA_CONNECTION__TIMEOUT_MS=2000`.
//!
//! ```toml
//! log_level = "info"
//!
//! [connection]
//! device_description = "SSA5PGCD6R0697"
//! resource_pattern = "?*INSTR"
//! timeout_ms = 5000
//! line_terminator = "\n"
//! ```

use serde::{Deserialize, Serialize};

/// Connection parameters for bus discovery and session setup.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Substring matched against VISA resource identities during discovery.
    pub device_description: String,

    /// VISA search expression used to enumerate candidate resources.
    pub resource_pattern: String,

    /// Read/write timeout in milliseconds.
    pub timeout_ms: u64,

    /// Line terminator appended to every outgoing command.
    pub line_terminator: String,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            device_description: "SSA5PGCD6R0697".to_string(),
            resource_pattern: "?*INSTR".to_string(),
            timeout_ms: 5000,
            line_terminator: "\n".to_string(),
        }
    }
}

/// Top-level application settings.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Log filter passed to the logger at startup ("error".."trace").
    pub log_level: String,

    /// Instrument connection parameters.
    pub connection: ConnectionSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            connection: ConnectionSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from the given TOML file (default `config/default`),
    /// then apply `SSA`-prefixed environment overrides. A missing file is not
    /// an error; defaults fill everything the sources leave out.
    pub fn new(config_path: Option<&str>) -> Result<Self, config::ConfigError> {
        let path = config_path.unwrap_or("config/default");

        config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("SSA").separator("__"))
            .build()?
            .try_deserialize()
    }
}
