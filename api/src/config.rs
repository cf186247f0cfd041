//! API configuration.

use common::AppLayout;
use serde::{Deserialize, Serialize};
use vibe_compiler::CompilerConfig;

/// Configuration for the HTTP API server.
///
/// # Example
///
/// ```rust
/// use vibe_api::ApiConfig;
///
/// let config = ApiConfig {
///     port: 3000,
///     enable_swagger: false,
///     ..Default::default()
/// };
/// assert_eq!(config.bind_address(), "0.0.0.0:3000");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Interface to bind to.
    ///
    /// Default: `0.0.0.0`
    pub host: String,

    /// Port to bind the HTTP server to.
    ///
    /// Default: 3000
    pub port: u16,

    /// Enable Cross-Origin Resource Sharing (CORS).
    ///
    /// Default: true
    pub enable_cors: bool,

    /// Allowed origins for CORS requests.
    ///
    /// Use `["*"]` to allow all origins (development only).
    ///
    /// Default: `["*"]`
    pub cors_origins: Vec<String>,

    /// Serve Swagger UI at `/swagger-ui` and the OpenAPI document at `/api-doc/openapi.json`.
    ///
    /// Default: true
    pub enable_swagger: bool,

    /// Where apps live on disk.
    pub layout: AppLayout,

    /// TSX compiler settings.
    pub compiler: CompilerConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
            enable_swagger: true,
            layout: AppLayout::default(),
            compiler: CompilerConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Stricter defaults: CORS limited to `allowed_origins`, no Swagger UI.
    pub fn production(allowed_origins: Vec<String>) -> Self {
        Self {
            enable_swagger: false,
            cors_origins: allowed_origins,
            ..Default::default()
        }
    }

    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 3000);
        assert!(config.enable_cors);
        assert_eq!(config.layout, AppLayout::default());
    }

    #[test]
    fn test_production() {
        let config = ApiConfig::production(vec!["https://vibe.example".to_string()]);
        assert!(!config.enable_swagger);
        assert_eq!(config.cors_origins, vec!["https://vibe.example"]);
    }
}
