//! Configuration system for odatapath.
//!
//! This module provides the configuration structure for odatapath with sensible
//! defaults and support for serialization/deserialization via serde.
//! Configuration can be loaded from TOML files and merged with command-line
//! arguments.
//!
//! # Example
//!
//! ```
//! use odatapath::config::{Config, OutputFormat};
//! use odatapath::segment::ReverseStrategy;
//!
//! // Use default configuration
//! let config = Config::default();
//! assert_eq!(config.strategy, ReverseStrategy::Recursive);
//! assert_eq!(config.recursion_limit, 256);
//!
//! // Create custom configuration
//! let custom = Config {
//!     output: OutputFormat::Json,
//!     ..Config::default()
//! };
//! ```

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::segment::{
    ReverseOptions, ReverseStrategy, DEFAULT_RECURSION_LIMIT, MAX_RECURSION_LIMIT,
};

/// How reversed paths are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Segment syntax, e.g. `$count/Orders(Id=5)/Customers`
    #[default]
    Text,
    /// JSON array of segment records
    Json,
}

/// Configuration for odatapath.
///
/// All fields have sensible defaults via `Config::default()`.
///
/// # Fields
///
/// * `strategy` - Reversal strategy: "recursive" or "iterative" (default: "recursive")
/// * `recursion_limit` - Longest chain reversed recursively, at most 1024 (default: 256)
/// * `log_filter` - Tracing filter directive (default: "odatapath=warn")
/// * `output` - Output format: "text" or "json" (default: "text")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Reversal strategy
    #[serde(default)]
    pub strategy: ReverseStrategy,

    /// Chains longer than this are reversed iteratively
    #[serde(default = "default_recursion_limit")]
    pub recursion_limit: usize,

    /// Tracing filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Output format
    #[serde(default)]
    pub output: OutputFormat,
}

/// Returns the default recursion limit.
fn default_recursion_limit() -> usize {
    DEFAULT_RECURSION_LIMIT
}

/// Returns the default log filter.
fn default_log_filter() -> String {
    "odatapath=warn".to_string()
}

impl Default for Config {
    /// Creates a new configuration with default values.
    ///
    /// # Default Values
    ///
    /// * `strategy`: recursive
    /// * `recursion_limit`: 256
    /// * `log_filter`: "odatapath=warn"
    /// * `output`: text
    fn default() -> Self {
        Self {
            strategy: ReverseStrategy::default(),
            recursion_limit: default_recursion_limit(),
            log_filter: default_log_filter(),
            output: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/odatapath/config.toml` on all platforms.
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("odatapath");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        let config_path = match Self::config_path() {
            Some(path) => path,
            None => return Self::default(),
        };

        if !config_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|_| Self::default()),
            Err(_) => Self::default(),
        }
    }

    /// Loads configuration from an explicit file.
    ///
    /// Unlike [`Config::load`], a missing, malformed or invalid file is an
    /// error.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Checks values that deserialize fine but cannot be honoured.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.recursion_limit > MAX_RECURSION_LIMIT {
            anyhow::bail!(
                "recursion_limit {} exceeds the maximum of {}",
                self.recursion_limit,
                MAX_RECURSION_LIMIT
            );
        }
        Ok(())
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }

    /// Saves configuration to an explicit file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// The reversal settings of this configuration, with the recursion limit
    /// capped at [`MAX_RECURSION_LIMIT`].
    pub fn reverse_options(&self) -> ReverseOptions {
        ReverseOptions {
            strategy: self.strategy,
            recursion_limit: self.recursion_limit.min(MAX_RECURSION_LIMIT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_options_default() {
        let options = Config::default().reverse_options();
        assert_eq!(options, ReverseOptions::default());
    }

    #[test]
    fn test_reverse_options_follow_config() {
        let config = Config {
            strategy: ReverseStrategy::Iterative,
            recursion_limit: 8,
            ..Default::default()
        };
        let options = config.reverse_options();
        assert_eq!(options.strategy, ReverseStrategy::Iterative);
        assert_eq!(options.recursion_limit, 8);
    }

    #[test]
    fn test_reverse_options_cap_recursion_limit() {
        let config = Config {
            recursion_limit: 1_000_000,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert_eq!(config.reverse_options().recursion_limit, MAX_RECURSION_LIMIT);
    }
}
