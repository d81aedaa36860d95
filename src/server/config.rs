//! Server configuration
//!
//! Manages server configuration settings and validation. The defaults
//! reproduce the fixed reference behavior (one host:port, 5 second sweeps,
//! 120 second idle threshold); an optional `config.toml` or `CHAT_RELAY_*`
//! environment variables can override them.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Server configuration structure
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// IP address to bind the listener to
    pub bind_address: String,

    /// TCP port to listen on
    pub port: u16,

    /// Seconds between idle-reaper sweeps
    pub sweep_interval_secs: u64,

    /// Seconds of inactivity after which a client is evicted
    pub idle_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 55614,
            sweep_interval_secs: 5,
            idle_timeout_secs: 120,
        }
    }
}

impl ServerConfig {
    /// Load configuration from an optional config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("CHAT_RELAY"))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Get bind address and port as a socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Get the reaper sweep interval as a Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Get the idle threshold as a Duration
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.is_empty() {
            return Err(ConfigError::Message("bind_address cannot be empty".into()));
        }

        if self.port == 0 {
            return Err(ConfigError::Message("port cannot be 0".into()));
        }

        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::Message(
                "sweep_interval_secs must be greater than 0".into(),
            ));
        }

        if self.idle_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "idle_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.port, 55614);
        assert_eq!(config.sweep_interval_secs, 5);
        assert_eq!(config.idle_timeout_secs, 120);
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr(), "127.0.0.1:55614");
    }

    #[test]
    fn test_duration_accessors() {
        let config = ServerConfig::default();
        assert_eq!(config.sweep_interval(), Duration::from_secs(5));
        assert_eq!(config.idle_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let config = ServerConfig {
            port: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_intervals() {
        let config = ServerConfig {
            sweep_interval_secs: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            idle_timeout_secs: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
