//! Server configuration
//!
//! Configuration is loaded from environment variables.

use crate::capabilities::Capabilities;
use std::env;

/// Main server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Whether server is behind a reverse proxy
    pub behind_proxy: bool,

    /// Session configuration
    pub session: SessionConfig,
}

/// Session-related configuration
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Capabilities the validator merges in when the client omits them,
    /// supplied as a JSON object via `DEFAULT_CAPABILITIES`
    pub default_capabilities: Capabilities,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4723,
            behind_proxy: false,
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("PORT")
            && let Ok(p) = port.parse()
        {
            config.port = p;
        }
        if let Ok(val) = env::var("BEHIND_PROXY") {
            config.behind_proxy = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = env::var("DEFAULT_CAPABILITIES")
            && !val.is_empty()
        {
            match serde_json::from_str::<Capabilities>(&val) {
                Ok(caps) => config.session.default_capabilities = caps,
                Err(e) => {
                    tracing::warn!("Ignoring malformed DEFAULT_CAPABILITIES: {}", e);
                }
            }
        }

        config
    }
}
