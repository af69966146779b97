//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following
//! precedence (highest to lowest):
//!
//! 1. Environment variables
//! 2. `.query-advisor.toml` in current directory
//! 3. `~/.config/query-advisor/config.toml`
//! 4. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! # Row estimate above which an unbounded select is flagged
//! row_count_threshold = 10000
//!
//! [rules]
//! # Allow-list; omit to enable every rule
//! enabled = ["ADV001", "ADV002", "ADV007"]
//! # Deny-list, applied after the allow-list
//! disabled = ["ADV008"]
//!
//! [rules.severity]
//! ADV002 = "critical"
//! ADV004 = "info"
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `QUERY_ADVISOR_ROW_THRESHOLD` | Overrides `row_count_threshold` |

use std::{collections::HashMap, env, fs, path::{Path, PathBuf}};

use serde::Deserialize;

use crate::error::{AppResult, config_error};

/// Default row estimate above which [`MissingLimit`](crate::rules::MissingLimit) fires
pub const DEFAULT_ROW_COUNT_THRESHOLD: u64 = 10_000;

/// Advisor configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AdvisorConfig {
    /// Row estimate above which an unbounded select is flagged
    #[serde(default = "default_row_count_threshold")]
    pub row_count_threshold: u64,
    #[serde(default)]
    pub rules:               RulesConfig
}

fn default_row_count_threshold() -> u64 {
    DEFAULT_ROW_COUNT_THRESHOLD
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            row_count_threshold: DEFAULT_ROW_COUNT_THRESHOLD,
            rules:               RulesConfig::default()
        }
    }
}

/// Rule selection and severity overrides
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RulesConfig {
    /// Enabled rule ids (allow-list); `None` enables every rule
    #[serde(default)]
    pub enabled:  Option<Vec<String>>,
    /// Disabled rule ids, applied after the allow-list
    #[serde(default)]
    pub disabled: Vec<String>,
    /// Severity overrides (rule id -> "info" | "warning" | "critical")
    #[serde(default)]
    pub severity: HashMap<String, String>
}

impl AdvisorConfig {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file in current directory (.query-advisor.toml)
    /// 3. Config file in home directory (~/.config/query-advisor/config.toml)
    /// 4. Default values
    ///
    /// # Errors
    ///
    /// Returns error if a config file exists but cannot be read or parsed.
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("query-advisor")
                .join("config.toml");
            if home_config.exists() {
                config = Self::load_from(&home_config)?;
            }
        }

        let local_config = PathBuf::from(".query-advisor.toml");
        if local_config.exists() {
            config = Self::load_from(&local_config)?;
        }

        if let Ok(threshold) = env::var("QUERY_ADVISOR_ROW_THRESHOLD") {
            config.row_count_threshold = threshold
                .parse()
                .map_err(|_| config_error("QUERY_ADVISOR_ROW_THRESHOLD must be an integer"))?;
        }

        Ok(config)
    }

    /// Load configuration from a specific TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
        toml::from_str(&content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }
}
