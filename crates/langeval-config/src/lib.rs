//! Configuration schema for the LangEval trace viewer.
//!
//! A [`ViewerConfig`] is read from an optional JSON file and then overridden
//! from environment variables:
//!
//! | Variable                          | Field                     |
//! |-----------------------------------|---------------------------|
//! | `LANGEVAL_CONFIG`                 | path of the JSON file     |
//! | `LANGEVAL_BACKEND_URL`            | `upstream.backend_url`    |
//! | `NEXT_PUBLIC_BACKEND_URL`         | `upstream.backend_url`    |
//! | `LANGEVAL_API_BASE_URL`           | `upstream.api_base_url`   |
//! | `LANGEVAL_UPSTREAM_TIMEOUT_SECS`  | `upstream.timeout_secs`   |
//! | `LANGEVAL_BIND_ADDR`              | `server.bind_addr`        |

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Error
// ─────────────────────────────────────────────────────────────────────────────

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: String, value: String },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Layout
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_NODE_WIDTH: f64 = 240.0;
pub const DEFAULT_ROW_HEIGHT: f64 = 180.0;

/// Spacing constants of the trace graph layout, in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal slot taken by each leaf.
    pub node_width: f64,
    /// Vertical distance between tree depths.
    pub row_height: f64,
    /// Extra horizontal padding after each root subtree.
    pub root_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: DEFAULT_NODE_WIDTH,
            row_height: DEFAULT_ROW_HEIGHT,
            root_gap: DEFAULT_NODE_WIDTH,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("layout.{name} must be positive, got {v}")))
            }
        };
        positive("node_width", self.node_width)?;
        positive("row_height", self.row_height)?;
        if !self.root_gap.is_finite() || self.root_gap < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "layout.root_gap must be non-negative, got {}",
                self.root_gap
            )));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Upstream services
// ─────────────────────────────────────────────────────────────────────────────

/// Backend microservices reachable from the BFF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    Identity,
    Resource,
    Orchestrator,
    GenAi,
}

impl ServiceKind {
    /// Direct address of the service in a local deployment.
    pub fn local_url(&self) -> &'static str {
        match self {
            ServiceKind::Identity => "http://127.0.0.1:8002/api/v1",
            ServiceKind::Resource => "http://127.0.0.1:8003",
            ServiceKind::Orchestrator => "http://127.0.0.1:8001",
            ServiceKind::GenAi => "http://127.0.0.1:8006",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Public API base. When absolute, every service is reached through it.
    pub api_base_url: String,
    /// Resource service base used by the trace routes.
    pub backend_url: String,
    /// Per-request timeout for upstream calls.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_base_url: "/api/v1".to_string(),
            backend_url: "http://localhost:8003".to_string(),
            timeout_secs: 10,
        }
    }
}

impl UpstreamConfig {
    /// Base URL for a backend service.
    ///
    /// An absolute `api_base_url` routes everything through the gateway;
    /// a relative one means local development with per-service ports.
    pub fn service_url(&self, service: ServiceKind) -> String {
        if self.api_base_url.starts_with("http") {
            return self.api_base_url.trim_end_matches('/').to_string();
        }
        service.local_url().to_string()
    }

    pub fn backend_url(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Server
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Root config
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub layout: LayoutConfig,
    pub upstream: UpstreamConfig,
    pub server: ServerConfig,
}

impl ViewerConfig {
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Loads the file named by `LANGEVAL_CONFIG` (if any), then applies
    /// environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load_with(|var| std::env::var(var).ok())
    }

    /// Same as [`ViewerConfig::from_env`] with an injectable variable lookup.
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup("LANGEVAL_CONFIG") {
            Some(path) => {
                tracing::info!("Loading viewer config from {}", path);
                Self::load_from_file(Path::new(&path))?
            }
            None => Self::default(),
        };
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let backend = lookup("LANGEVAL_BACKEND_URL").or_else(|| lookup("NEXT_PUBLIC_BACKEND_URL"));
        if let Some(url) = backend {
            self.upstream.backend_url = url;
        }
        if let Some(base) = lookup("LANGEVAL_API_BASE_URL") {
            self.upstream.api_base_url = base;
        }
        if let Some(raw) = lookup("LANGEVAL_UPSTREAM_TIMEOUT_SECS") {
            self.upstream.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "LANGEVAL_UPSTREAM_TIMEOUT_SECS".to_string(),
                value: raw.clone(),
            })?;
        }
        if let Some(addr) = lookup("LANGEVAL_BIND_ADDR") {
            self.server.bind_addr = addr;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        if self.upstream.timeout_secs == 0 {
            return Err(ConfigError::Invalid("upstream.timeout_secs must be at least 1".into()));
        }
        if self.upstream.backend_url.trim().is_empty() {
            return Err(ConfigError::Invalid("upstream.backend_url is empty".into()));
        }
        Ok(())
    }
}
