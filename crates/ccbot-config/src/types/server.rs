//! HTTP server configuration

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> crate::error::Result<SocketAddr> {
        self.bind
            .parse()
            .map_err(|e| crate::error::ConfigError::ValidationError {
                field: "server.bind".to_string(),
                message: format!("'{}' is not a socket address: {}", self.bind, e),
            })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl crate::validation::Validate for ServerConfig {
    fn validate(&self) -> crate::error::Result<()> {
        self.socket_addr().map(|_| ())
    }
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}
