//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files and
//! environment variables via the `config` crate. Every field carries a
//! serde default, so the server runs with no configuration files at all.

pub mod app;
pub mod logging;
pub mod realtime;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::logging::LoggingConfig;
pub use self::realtime::RealtimeConfig;
pub use self::session::SessionConfig;

use crate::error::AppError;
use crate::result::AppResult;

/// Environment variable that overrides `server.port` when set.
pub const PORT_ENV: &str = "PORT";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Real-time fanout settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Session and identity settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Merges `config/default`, an environment-specific overlay
    /// `config/{env}`, and environment variables prefixed with
    /// `INITIATIVE__`. A plain `PORT` variable wins over everything for the
    /// listening port.
    pub fn load(env: &str) -> AppResult<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("INITIATIVE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let mut app: AppConfig = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        if let Ok(port) = std::env::var(PORT_ENV) {
            app.server.apply_port_override(&port)?;
        }

        Ok(app)
    }
}
