//! Configuration module for Hummingbird.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.
//!
//! Credentials are never read from this file; the bearer token is supplied at
//! runtime through [`crate::ports::ITokenProvider`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::page::DEFAULT_PAGE_SIZE;
use crate::domain::sort::SortSpec;

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for Hummingbird.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

/// Remote API endpoints and transport settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Scheme and host shared by every API, e.g. `https://example.com`.
    pub base_url: String,
    /// Path prefix of the ownership (filer) API.
    pub ownership_path: String,
    /// Path prefix of the security master API.
    pub securities_path: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

/// Listing engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Records requested per page.
    pub page_size: u32,
    /// Quiet period before a search query is executed, in milliseconds.
    pub search_debounce_ms: u64,
    /// Ordering applied before the user picks one.
    pub default_sort: SortSpec,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/hummingbird/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("hummingbird")
            .join("config.yaml")
    }
}

impl ApiConfig {
    /// Base URL of the ownership API (`base_url` + `ownership_path`).
    pub fn ownership_url(&self) -> String {
        join_url(&self.base_url, &self.ownership_path)
    }

    /// Base URL of the security master API (`base_url` + `securities_path`).
    pub fn securities_url(&self) -> String {
        join_url(&self.base_url, &self.securities_path)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl SyncConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://production.hds.kiskisoftware.com".to_string(),
            ownership_path: "/ownership-api".to_string(),
            securities_path: "/secmaster-api/api/v2".to_string(),
            request_timeout_secs: 15,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: 300,
            default_sort: SortSpec::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"sync.page_size"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Largest page the remote APIs accept.
const MAX_PAGE_SIZE: u32 = 100;

/// Longer debounce windows make search feel broken.
const MAX_SEARCH_DEBOUNCE_MS: u64 = 5_000;

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- api ---
        let base = self.api.base_url.trim();
        if base.is_empty() {
            errors.push(ValidationError {
                field: "api.base_url".into(),
                message: "must not be empty".into(),
            });
        } else if !(base.starts_with("https://") || base.starts_with("http://")) {
            errors.push(ValidationError {
                field: "api.base_url".into(),
                message: format!("must start with http:// or https://, got '{base}'"),
            });
        }
        if self.api.request_timeout_secs == 0 {
            errors.push(ValidationError {
                field: "api.request_timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- sync ---
        if self.sync.page_size == 0 || self.sync.page_size > MAX_PAGE_SIZE {
            errors.push(ValidationError {
                field: "sync.page_size".into(),
                message: format!("must be in range 1..={MAX_PAGE_SIZE}"),
            });
        }
        if self.sync.search_debounce_ms > MAX_SEARCH_DEBOUNCE_MS {
            errors.push(ValidationError {
                field: "sync.search_debounce_ms".into(),
                message: format!("must not exceed {MAX_SEARCH_DEBOUNCE_MS}"),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use hummingbird_core::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .api_base_url("http://localhost:8080")
///     .sync_page_size(50)
///     .logging_level("debug")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- api ---

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api.base_url = url.into();
        self
    }

    pub fn api_ownership_path(mut self, path: impl Into<String>) -> Self {
        self.config.api.ownership_path = path.into();
        self
    }

    pub fn api_securities_path(mut self, path: impl Into<String>) -> Self {
        self.config.api.securities_path = path.into();
        self
    }

    pub fn api_request_timeout_secs(mut self, seconds: u64) -> Self {
        self.config.api.request_timeout_secs = seconds;
        self
    }

    // --- sync ---

    pub fn sync_page_size(mut self, page_size: u32) -> Self {
        self.config.sync.page_size = page_size;
        self
    }

    pub fn sync_search_debounce_ms(mut self, ms: u64) -> Self {
        self.config.sync.search_debounce_ms = ms;
        self
    }

    pub fn sync_default_sort(mut self, sort: SortSpec) -> Self {
        self.config.sync.default_sort = sort;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
