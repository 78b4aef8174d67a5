//! Gateway configuration.

use std::env;

use common::{RemoteConfig, ServiceConfig, SessionConfig};

/// Gateway configuration.
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    /// Bind address and logging defaults
    pub service: ServiceConfig,
    /// REST collaborator holding projects, tasks and users
    pub remote: RemoteConfig,
    /// Session persistence
    pub session: SessionConfig,
    /// Allowed CORS origin, `*` for any
    pub cors_origin: String,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = RemoteConfig::default();

        Self {
            service: ServiceConfig {
                service_name: "gateway".to_string(),
                host: env::var("GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("GATEWAY_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(3000),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            remote: RemoteConfig {
                timeout_ms: env::var("REMOTE_TIMEOUT_MS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(defaults.timeout_ms),
                ..RemoteConfig::new(env::var("API_URL").unwrap_or(defaults.base_url))
            },
            session: SessionConfig {
                redis_url: env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty()),
            },
            cors_origin: env::var("CORS_ORIGIN").unwrap_or_else(|_| "*".to_string()),
        }
    }

    /// Override the bind address, e.g. from command line flags.
    pub fn with_address(mut self, host: impl Into<String>, port: u16) -> Self {
        self.service.host = host.into();
        self.service.port = port;
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.service.host, self.service.port)
    }
}
