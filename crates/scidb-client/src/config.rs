//! Connection settings for the HTTP shim.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the shim transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShimConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Use HTTPS.
    pub ssl: bool,
    /// Log in and pass a token with every request. Follows `ssl` unless set.
    pub auth: bool,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl Default for ShimConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8083,
            user: "scidb".to_string(),
            password: "scidb".to_string(),
            ssl: true,
            auth: true,
            connect_timeout_secs: 5,
            read_timeout_secs: 10,
        }
    }
}

impl ShimConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SCIDB_HOST") {
            config.host = val;
        }

        if let Ok(val) = std::env::var("SCIDB_SHIM_PORT") {
            if let Ok(port) = val.parse() {
                config.port = port;
            }
        }

        if let Ok(val) = std::env::var("SCIDB_USER") {
            config.user = val;
        }

        if let Ok(val) = std::env::var("SCIDB_PASSWORD") {
            config.password = val;
        }

        if let Ok(val) = std::env::var("SCIDB_SSL") {
            config.ssl = parse_bool(&val);
        }
        config.auth = match std::env::var("SCIDB_AUTH") {
            Ok(val) => parse_bool(&val),
            Err(_) => config.ssl,
        };

        if let Ok(val) = std::env::var("SCIDB_CONNECT_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.connect_timeout_secs = secs;
            }
        }

        if let Ok(val) = std::env::var("SCIDB_READ_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.read_timeout_secs = secs;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("host must not be empty".to_string());
        }
        if self.port == 0 {
            return Err("port must be > 0".to_string());
        }
        if self.connect_timeout_secs == 0 || self.read_timeout_secs == 0 {
            return Err("timeouts must be > 0".to_string());
        }
        Ok(())
    }

    /// `http(s)://host:port`
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme(), self.host, self.port)
    }

    pub fn scheme(&self) -> &'static str {
        if self.ssl {
            "https"
        } else {
            "http"
        }
    }

    /// The shim runs on this machine.
    pub fn is_local(&self) -> bool {
        self.host.eq_ignore_ascii_case("localhost") || self.host == "127.0.0.1"
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

fn parse_bool(val: &str) -> bool {
    val.eq_ignore_ascii_case("true") || val == "1"
}
