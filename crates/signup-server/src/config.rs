//! Server Configuration

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid BIND_ADDR {value:?}: {reason}")]
    BindAddr { value: String, reason: String },
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory holding `index.html` and the compiled WASM bundle
    pub static_dir: PathBuf,
}

impl ServerConfig {
    /// Load from `BIND_ADDR` and `STATIC_DIR`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var("BIND_ADDR").ok().as_deref(),
            std::env::var("STATIC_DIR").ok().as_deref(),
        )
    }

    fn from_vars(bind_addr: Option<&str>, static_dir: Option<&str>) -> Result<Self, ConfigError> {
        let raw = bind_addr
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr = raw.trim().parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::BindAddr {
                value: raw.to_string(),
                reason: e.to_string(),
            }
        })?;

        let static_dir = static_dir
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_STATIC_DIR)
            .into();

        Ok(Self {
            bind_addr,
            static_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_vars(None, None).unwrap();
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.static_dir, PathBuf::from("static"));
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_vars(Some("127.0.0.1:8080"), Some("dist")).unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.static_dir, PathBuf::from("dist"));
    }

    #[test]
    fn test_invalid_bind_addr() {
        let err = ServerConfig::from_vars(Some("localhost"), None).unwrap_err();
        assert!(err.to_string().contains("localhost"));
    }
}
