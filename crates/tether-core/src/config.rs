//! Trust layer configuration

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TetherError};

/// Complete trust layer configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrustConfig {
    /// Security domain under which the local network's own membership is stored
    #[serde(default = "default_local_security_domain")]
    pub local_security_domain: String,

    /// Confidential payload settings
    #[serde(default)]
    pub confidentiality: ConfidentialityConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_local_security_domain() -> String {
    "local-security-domain".to_string()
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            local_security_domain: default_local_security_domain(),
            confidentiality: ConfidentialityConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TrustConfig {
    /// Parse from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| TetherError::Config(e.to_string()))
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| TetherError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&text)?;
        info!(
            path = %path.display(),
            domain = %config.local_security_domain,
            "Loaded trust configuration"
        );
        Ok(config)
    }
}

/// Confidential payload settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfidentialityConfig {
    /// Length in bytes of the random HMAC key sealed with each payload
    #[serde(default = "default_random_key_len")]
    pub random_key_len: usize,
}

fn default_random_key_len() -> usize {
    16
}

impl Default for ConfidentialityConfig {
    fn default() -> Self {
        Self {
            random_key_len: default_random_key_len(),
        }
    }
}

/// Log output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format
    #[serde(default)]
    pub format: LogFormat,

    /// Color output
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            color: true,
        }
    }
}
