//! Process configuration, loaded once at start-up

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;

pub const PORT_VAR: &str = "PORT";
pub const BIND_ADDR_VAR: &str = "BIND_ADDR";
pub const API_KEY_VAR: &str = "CLAWDBOT_API_KEY";
pub const REPLY_BACKEND_VAR: &str = "CHAT_REPLY_BACKEND";
pub const REPLY_URL_VAR: &str = "CHAT_REPLY_URL";
pub const REPLY_TIMEOUT_VAR: &str = "CHAT_REPLY_TIMEOUT_SECS";

pub const DEFAULT_PORT: u16 = 3000;

/// Errors that can occur while reading configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} is required when {1}=remote")]
    Missing(&'static str, &'static str),
}

/// Where replies come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyBackend {
    /// Echo the normalized body back
    Echo,
    /// Forward the context to an upstream HTTP service
    Remote { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Shared secret for `POST /chat`. `None` leaves the endpoint open.
    pub api_key: Option<String>,
    pub reply_backend: ReplyBackend,
    /// Upper bound on a single reply generation. `None` waits indefinitely.
    pub reply_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            api_key: None,
            reply_backend: ReplyBackend::Echo,
            reply_timeout: None,
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Config::default();

        let port = match var(PORT_VAR) {
            Some(raw) => raw.parse::<u16>().map_err(|e| invalid(PORT_VAR, &raw, e))?,
            None => defaults.port,
        };

        let bind_addr = match var(BIND_ADDR_VAR) {
            Some(raw) => raw
                .parse::<IpAddr>()
                .map_err(|e| invalid(BIND_ADDR_VAR, &raw, e))?,
            None => defaults.bind_addr,
        };

        let reply_backend = match var(REPLY_BACKEND_VAR).as_deref() {
            None | Some("echo") => ReplyBackend::Echo,
            Some("remote") => {
                let url = var(REPLY_URL_VAR)
                    .ok_or(ConfigError::Missing(REPLY_URL_VAR, REPLY_BACKEND_VAR))?;
                reqwest::Url::parse(&url).map_err(|e| invalid(REPLY_URL_VAR, &url, e))?;
                ReplyBackend::Remote { url }
            }
            Some(other) => {
                return Err(invalid(
                    REPLY_BACKEND_VAR,
                    other,
                    "expected \"echo\" or \"remote\"",
                ))
            }
        };

        let reply_timeout = match var(REPLY_TIMEOUT_VAR) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(0) => return Err(invalid(REPLY_TIMEOUT_VAR, &raw, "must be positive")),
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(e) => return Err(invalid(REPLY_TIMEOUT_VAR, &raw, e)),
            },
            None => None,
        };

        Ok(Self {
            bind_addr,
            port,
            api_key: var(API_KEY_VAR),
            reply_backend,
            reply_timeout,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn invalid(key: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_api_key_is_trimmed() {
        let config = load(&[(API_KEY_VAR, "  s3cret \n")]).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_blank_api_key_disables_auth() {
        let config = load(&[(API_KEY_VAR, "   ")]).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_port_and_bind() {
        let config = load(&[(PORT_VAR, "8080"), (BIND_ADDR_VAR, "127.0.0.1")]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[(PORT_VAR, "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: PORT_VAR, .. }));
    }

    #[test]
    fn test_remote_backend() {
        let config = load(&[
            (REPLY_BACKEND_VAR, "remote"),
            (REPLY_URL_VAR, "http://localhost:9000/reply"),
            (REPLY_TIMEOUT_VAR, "30"),
        ])
        .unwrap();
        assert_eq!(
            config.reply_backend,
            ReplyBackend::Remote {
                url: "http://localhost:9000/reply".to_string()
            }
        );
        assert_eq!(config.reply_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_remote_backend_requires_url() {
        let err = load(&[(REPLY_BACKEND_VAR, "remote")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing(REPLY_URL_VAR, REPLY_BACKEND_VAR));

        let err = load(&[(REPLY_BACKEND_VAR, "remote"), (REPLY_URL_VAR, "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: REPLY_URL_VAR, .. }));
    }

    #[test]
    fn test_unknown_backend() {
        let err = load(&[(REPLY_BACKEND_VAR, "magic")]).unwrap_err();
        assert!(err.to_string().contains("magic"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = load(&[(REPLY_TIMEOUT_VAR, "0")]).unwrap_err();
        assert!(err.to_string().contains("must be positive"));
    }
}
