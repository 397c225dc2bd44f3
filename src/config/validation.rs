//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the network section names a channel, chaincode and peers
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("duplicate endorsing target '{0}'")]
    DuplicateTarget(String),

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("sdk.endpoint '{value}' is not a valid URL: {reason}")]
    InvalidEndpoint { value: String, reason: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let network = &config.network;
    if network.org.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "network.org" });
    }
    if network.channel_name.trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: "network.channel_name",
        });
    }
    if network.chaincode_name.trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: "network.chaincode_name",
        });
    }
    if network.targets.is_empty() {
        errors.push(ValidationError::Empty {
            field: "network.targets",
        });
    }

    let mut seen = HashSet::new();
    for target in &network.targets {
        if target.trim().is_empty() {
            errors.push(ValidationError::Empty {
                field: "network.targets[]",
            });
        } else if !seen.insert(target.as_str()) {
            errors.push(ValidationError::DuplicateTarget(target.clone()));
        }
    }

    match url::Url::parse(&config.sdk.endpoint) {
        Ok(url) if url.cannot_be_a_base() => errors.push(ValidationError::InvalidEndpoint {
            value: config.sdk.endpoint.clone(),
            reason: "cannot be a base URL".to_string(),
        }),
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::InvalidEndpoint {
            value: config.sdk.endpoint.clone(),
            reason: e.to_string(),
        }),
    }

    if config.sdk.timeout_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "sdk.timeout_secs",
        });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "timeouts.request_secs",
        });
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = GatewayConfig::default();
        config.network.channel_name = String::new();
        config.network.targets.clear();
        config.sdk.timeout_secs = 0;
        config.sdk.endpoint = "nope".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::Empty {
            field: "network.channel_name"
        }));
        assert!(errors.contains(&ValidationError::Zero {
            field: "sdk.timeout_secs"
        }));
    }

    #[test]
    fn test_duplicate_targets() {
        let mut config = GatewayConfig::default();
        config.network.targets = vec!["peer0".into(), "peer1".into(), "peer0".into()];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::DuplicateTarget("peer0".into())]);
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = GatewayConfig::default();
        config.observability.metrics_address = "garbage".to_string();
        assert!(validate_config(&config).is_err());

        config.observability.metrics_enabled = false;
        assert!(validate_config(&config).is_ok());
    }
}
