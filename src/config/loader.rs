//! Configuration loader

use config::{Config, Environment, File, FileFormat};
use std::path::Path;

use super::types::AppConfig;
use crate::common::errors::{FundingError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with FUNDING__)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("FUNDING")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| FundingError::Configuration(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| FundingError::Configuration(e.to_string()))
}

/// Load configuration from a TOML string
pub fn load_from_str(toml: &str) -> Result<AppConfig> {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()
        .map_err(|e| FundingError::Configuration(e.to_string()))?
        .try_deserialize()
        .map_err(|e| FundingError::Configuration(e.to_string()))
}
