//! Configuration management for the FX gateway.
//!
//! All settings come from environment variables (optionally seeded from a
//! `.env` file by `main`). The upstream credential is mandatory; everything
//! else has a default.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port)
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream exchange-rate provider settings
    pub upstream: UpstreamConfig,

    /// Whether to verify SSL certificates for upstream requests
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,

    /// Request timeout in seconds for upstream calls
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Server-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Resolve `host:port` to a bindable address.
    ///
    /// `host` may be a literal IP or a hostname such as `localhost`; the first
    /// resolved address is used.
    pub async fn bind_addr(&self) -> Result<SocketAddr> {
        tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("Failed to resolve HOST {}", self.host))?
            .next()
            .with_context(|| format!("HOST {} resolved to no addresses", self.host))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Upstream exchange-rate provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// `app_id` credential sent with authenticated upstream calls
    pub app_id: String,
}

// Keep the credential out of `{:?}` output.
impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("app_id", &"<redacted>")
            .finish()
    }
}

impl UpstreamConfig {
    pub fn new(base_url: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            app_id: app_id.into(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_base_url() -> String {
    "https://openexchangerates.org".to_string()
}

fn default_verify_ssl() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    30
}

impl AppConfig {
    /// Build a config with defaults for everything except the credential.
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::new(default_base_url(), app_id),
            verify_ssl: default_verify_ssl(),
            request_timeout_secs: default_request_timeout(),
        }
    }

    /// Load configuration from process environment variables.
    ///
    /// Fails if `APP_ID` is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unparseable optional values are ignored and the default is kept.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_id = match lookup("APP_ID") {
            Some(id) if !id.trim().is_empty() => id,
            _ => bail!("APP_ID is missing from the environment variables."),
        };

        let mut config = AppConfig::new(app_id);

        if let Some(host) = lookup("HOST").filter(|h| !h.is_empty()) {
            config.server.host = host;
        }

        if let Some(port_str) = lookup("PORT") {
            match port_str.parse::<u16>() {
                Ok(port) => config.server.port = port,
                Err(_) => tracing::warn!(value = %port_str, "Ignoring invalid PORT"),
            }
        }

        if let Some(base_url) = lookup("UPSTREAM_BASE_URL").filter(|u| !u.is_empty()) {
            config.upstream.base_url = base_url.trim_end_matches('/').to_string();
        }

        if let Some(verify_ssl_str) = lookup("VERIFY_SSL") {
            config.verify_ssl = str_to_bool(&verify_ssl_str);
        }

        // A zero timeout would fail every upstream call immediately.
        if let Some(timeout_str) = lookup("REQUEST_TIMEOUT_SECS") {
            match timeout_str.parse::<u64>() {
                Ok(timeout) if timeout > 0 => config.request_timeout_secs = timeout,
                _ => tracing::warn!(value = %timeout_str, "Ignoring invalid REQUEST_TIMEOUT_SECS"),
            }
        }

        Ok(config)
    }
}

/// Convert string to boolean.
///
/// Accepts: "true", "1", "yes", "on" (case-insensitive)
fn str_to_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
