//! Configuration schema definitions.
//!
//! This module defines the runtime settings of the compiler binary.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the compiler.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CompilerConfig {
    /// Where the load-balancer description is read from.
    pub input: InputConfig,

    /// Where the rendered proxy document is delivered.
    pub output: OutputConfig,

    /// Description validation policy.
    pub validation: ValidationConfig,

    /// Watch mode settings.
    pub watch: WatchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Input configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    /// Path to the description (`.json` is JSON, anything else TOML).
    pub path: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("lb.toml"),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the rendered document (`-` for stdout).
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("envoy.yaml"),
        }
    }
}

/// Validation configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ValidationConfig {
    /// Abort compilation when the description has validation errors.
    /// When false, errors are logged and later duplicates overwrite earlier ones.
    pub strict: bool,
}

/// Watch mode configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Poll interval for the file watcher backend, in seconds.
    pub poll_interval_secs: u64,

    /// Quiet period after a change before recompiling, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 2,
            debounce_ms: 250,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable the metrics endpoint (watch mode only).
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9902".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: CompilerConfig = toml::from_str("").unwrap();
        assert_eq!(config.input.path, PathBuf::from("lb.toml"));
        assert_eq!(config.output.path, PathBuf::from("envoy.yaml"));
        assert!(!config.validation.strict);
        assert_eq!(config.watch.poll_interval_secs, 2);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_sections() {
        let config: CompilerConfig = toml::from_str(
            r#"
            [validation]
            strict = true

            [observability]
            log_format = "compact"
            "#,
        )
        .unwrap();
        assert!(config.validation.strict);
        assert_eq!(config.observability.log_format, LogFormat::Compact);
        assert_eq!(config.observability.log_level, "info");
    }
}
