//! Configuration and description loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::CompilerConfig;
use crate::config::validation::{join_errors, validate_config, ValidationError};
use crate::model::LoadBalancerDescription;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseToml(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// Encoding of a description file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionFormat {
    Toml,
    Json,
}

impl DescriptionFormat {
    /// `.json` files are JSON, everything else is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DescriptionFormat::Json,
            _ => DescriptionFormat::Toml,
        }
    }
}

/// Load and validate compiler configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<CompilerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: CompilerConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load a load-balancer description.
///
/// Only syntax is checked here; see `validation::validate_service`.
pub fn load_description(path: &Path) -> Result<LoadBalancerDescription, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_description(&content, DescriptionFormat::from_path(path))
}

pub fn parse_description(
    content: &str,
    format: DescriptionFormat,
) -> Result<LoadBalancerDescription, ConfigError> {
    let description: LoadBalancerDescription = match format {
        DescriptionFormat::Toml => toml::from_str(content)?,
        DescriptionFormat::Json => serde_json::from_str(content)?,
    };
    Ok(description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IpFamily, Protocol};

    #[test]
    fn test_format_from_path() {
        assert_eq!(DescriptionFormat::from_path(Path::new("lb.json")), DescriptionFormat::Json);
        assert_eq!(DescriptionFormat::from_path(Path::new("lb.JSON")), DescriptionFormat::Json);
        assert_eq!(DescriptionFormat::from_path(Path::new("lb.toml")), DescriptionFormat::Toml);
        assert_eq!(DescriptionFormat::from_path(Path::new("lb")), DescriptionFormat::Toml);
    }

    #[test]
    fn test_parse_toml_description() {
        let content = r#"
            [service]
            ipFamilies = ["IPv4"]
            healthCheckPort = 32000

            [[service.ports]]
            listenPort = 80
            targetPort = 30000
            protocol = "TCP"

            [[nodes]]
            name = "a"
            addresses = { IPv4 = "10.0.0.1" }

            [[nodes]]
            name = "b"
            nodeAddresses = [{ type = "InternalIP", address = "10.0.0.2" }]
        "#;
        let description = parse_description(content, DescriptionFormat::Toml).unwrap();

        let service = description.service.unwrap();
        assert_eq!(service.health_check_port, 32000);
        assert_eq!(service.ports[0].protocol, Protocol::Tcp);
        assert_eq!(description.nodes.len(), 2);
        assert_eq!(description.nodes[1].address(IpFamily::IPv4), Some("10.0.0.2"));
    }

    #[test]
    fn test_parse_empty_description() {
        let description = parse_description("", DescriptionFormat::Toml).unwrap();
        assert!(description.service.is_none());
        assert!(description.nodes.is_empty());

        let description = parse_description("{}", DescriptionFormat::Json).unwrap();
        assert_eq!(description, LoadBalancerDescription::default());
    }

    #[test]
    fn test_parse_error_surfaces() {
        let err = parse_description("{ not json", DescriptionFormat::Json).unwrap_err();
        assert!(matches!(err, ConfigError::ParseJson(_)));

        let err = parse_description("[service\n", DescriptionFormat::Toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml(_)));
    }
}
