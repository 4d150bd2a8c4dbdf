use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Password used when none is configured. Development only.
const DEMO_ADMIN_PASSWORD: &str = "srds2026";

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Admin dashboard password
    #[serde(default)]
    pub admin_password: String,

    /// Lifetime of an admin session in seconds
    #[serde(default = "default_admin_session_ttl_secs")]
    pub admin_session_ttl_secs: u64,

    /// Path to the pipeline YAML (store backend, matcher tuning)
    #[serde(default)]
    pub pipeline_config: Option<String>,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Metrics endpoint enabled
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            admin_password: DEMO_ADMIN_PASSWORD.to_string(),
            admin_session_ttl_secs: default_admin_session_ttl_secs(),
            pipeline_config: None,
            enable_cors: default_true(),
            log_level: default_log_level(),
            metrics_enabled: default_true(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables and config files
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("server").required(false))
            // Override with environment variables
            .add_source(config::Environment::with_prefix("LOSTFOUND_SERVER").separator("__"));

        let mut config: ServerConfig = builder.build()?.try_deserialize()?;

        if config.admin_password.is_empty() {
            tracing::warn!("No admin password configured, using the demo password");
            config.admin_password = DEMO_ADMIN_PASSWORD.to_string();
        }

        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }

    pub fn admin_session_ttl(&self) -> Duration {
        Duration::from_secs(self.admin_session_ttl_secs)
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_mb() -> usize {
    10
}

fn default_admin_session_ttl_secs() -> u64 {
    8 * 60 * 60
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.max_body_size(), 10 * 1024 * 1024);
        assert_eq!(cfg.admin_session_ttl(), Duration::from_secs(28_800));
        assert!(cfg.pipeline_config.is_none());
        assert!(cfg.enable_cors);
        assert!(cfg.metrics_enabled);
    }

    #[test]
    fn test_socket_addr() {
        let cfg = ServerConfig::default();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_invalid_bind_addr() {
        let cfg = ServerConfig {
            bind_addr: "not an address".into(),
            ..ServerConfig::default()
        };
        assert!(cfg.socket_addr().is_err());
    }
}
