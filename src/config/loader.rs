//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::RelayConfig;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    InvalidPort(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::InvalidPort(value) => write!(f, "Invalid PORT value: {}", value),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load the relay configuration.
///
/// Reads the TOML file when a path is given, otherwise starts from defaults.
/// The listening port then resolves as CLI flag > `PORT` env var > file value.
pub fn load(path: Option<&Path>, cli_port: Option<u16>) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => RelayConfig::default(),
    };

    let env_port = match std::env::var("PORT") {
        Ok(value) => Some(
            value
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(value))?,
        ),
        Err(_) => None,
    };

    if let Some(port) = cli_port.or(env_port) {
        config.listener.bind_address = with_port(&config.listener.bind_address, port);
    }

    Ok(config)
}

/// Replace the port portion of a `host:port` bind address.
fn with_port(bind_address: &str, port: u16) -> String {
    match bind_address.rsplit_once(':') {
        Some((host, _)) => format!("{}:{}", host, port),
        None => format!("{}:{}", bind_address, port),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_port_replaces_existing() {
        assert_eq!(with_port("0.0.0.0:3000", 8080), "0.0.0.0:8080");
        assert_eq!(with_port("127.0.0.1:80", 3000), "127.0.0.1:3000");
    }

    #[test]
    fn test_with_port_appends_when_missing() {
        assert_eq!(with_port("0.0.0.0", 3000), "0.0.0.0:3000");
    }

    #[test]
    fn test_load_defaults_without_file() {
        let config = load(None, None).unwrap();
        // PORT may leak in from the test environment; only the host is fixed.
        assert!(config.listener.bind_address.starts_with("0.0.0.0:"));
    }

    #[test]
    fn test_cli_port_override() {
        let config = load(None, Some(4100)).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:4100");
    }
}
