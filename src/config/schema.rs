//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the chaincode gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Blockchain network the gateway transacts on.
    pub network: NetworkConfig,

    /// Fabric SDK gateway connection.
    pub sdk: SdkConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Blockchain network settings, read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Organisation the gateway acts for.
    pub org: String,

    /// Channel all requests run on.
    pub channel_name: String,

    /// Endorsing peers every proposal is sent to.
    pub targets: Vec<String>,

    /// Chaincode invoked by every request.
    pub chaincode_name: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            org: "org1".to_string(),
            channel_name: "mychannel".to_string(),
            targets: vec!["peer0.org1.example.com".to_string()],
            chaincode_name: "mycc".to_string(),
        }
    }
}

/// Fabric SDK gateway connection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SdkConfig {
    /// Base URL of the SDK REST gateway.
    pub endpoint: String,

    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4000".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Timeout configuration for the HTTP surface.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
