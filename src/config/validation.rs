//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Detect service ports that collapse onto the same routing key
//! - Validate value ranges (intervals > 0, ports non-zero, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure: input → Result<(), Vec<ValidationError>>
//! - The builder itself never rejects input; callers decide what to do

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::CompilerConfig;
use crate::model::{RoutingKey, ServiceDescription};

/// A single semantic problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("ports[{index}] maps to routing key {key} already used by an earlier port")]
    DuplicateRoutingKey { key: String, index: usize },

    #[error("ports[{index}].{field} must be non-zero")]
    ZeroPort { field: &'static str, index: usize },

    #[error("service declares ports but no IP families")]
    NoIpFamilies,

    #[error("{setting}: {reason}")]
    InvalidSetting { setting: &'static str, reason: String },
}

/// Render a list of errors as one comma-separated line.
pub fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate a service description before compilation.
pub fn validate_service(service: &ServiceDescription) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !service.ports.is_empty() && service.ip_families.is_empty() {
        errors.push(ValidationError::NoIpFamilies);
    }

    for (index, port) in service.ports.iter().enumerate() {
        if port.listen_port == 0 {
            errors.push(ValidationError::ZeroPort { field: "listenPort", index });
        }
        if port.target_port == 0 {
            errors.push(ValidationError::ZeroPort { field: "targetPort", index });
        }
    }

    let mut seen = HashSet::new();
    for &family in &service.ip_families {
        for (index, port) in service.ports.iter().enumerate() {
            if !port.protocol.is_proxyable() {
                continue;
            }
            let key = RoutingKey::new(family, port.listen_port, port.protocol);
            if !seen.insert(key) {
                errors.push(ValidationError::DuplicateRoutingKey {
                    key: key.to_string(),
                    index,
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate compiler settings.
pub fn validate_config(config: &CompilerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.watch.poll_interval_secs == 0 {
        errors.push(ValidationError::InvalidSetting {
            setting: "watch.poll_interval_secs",
            reason: "must be greater than zero".to_string(),
        });
    }

    if config.observability.metrics_enabled {
        if let Err(e) = config.observability.metrics_address.parse::<SocketAddr>() {
            errors.push(ValidationError::InvalidSetting {
                setting: "observability.metrics_address",
                reason: e.to_string(),
            });
        }
    }

    if config.output.path.as_os_str().is_empty() {
        errors.push(ValidationError::InvalidSetting {
            setting: "output.path",
            reason: "must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
