//! Config command - View and manage Hummingbird configuration
//!
//! Provides the `hummingbird config` CLI command which:
//! 1. Shows the effective configuration (YAML or JSON)
//! 2. Prints the configuration file path
//! 3. Sets individual values via dot-notation keys
//! 4. Validates the configuration file and reports errors

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;
use hummingbird_core::config::Config;
use hummingbird_core::domain::{SortDirection, SortField, SortSpec};
use tracing::info;

use crate::output::{get_formatter, OutputFormat};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "sync.page_size")
        key: String,
        /// New value
        value: String,
    },
    /// Validate the configuration file
    Validate,
}

impl ConfigCommand {
    /// Execute the config command against the file at `config_path`
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        match self {
            ConfigCommand::Show => execute_show(config_path, format),
            ConfigCommand::Path => execute_path(config_path, format),
            ConfigCommand::Set { key, value } => execute_set(config_path, key, value, format),
            ConfigCommand::Validate => execute_validate(config_path, format),
        }
    }
}

fn execute_show(config_path: &Path, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);
    let config = Config::load_or_default(config_path);

    info!(config_path = %config_path.display(), "Showing configuration");

    if format.is_json() {
        let json =
            serde_json::to_value(&config).context("Failed to serialize configuration to JSON")?;
        formatter.print_json(&json);
    } else {
        formatter.heading(&format!("Configuration ({})", config_path.display()));
        formatter.line("");
        let yaml =
            serde_yaml::to_string(&config).context("Failed to serialize configuration to YAML")?;
        for line in yaml.lines() {
            formatter.line(line);
        }
    }

    Ok(())
}

fn execute_path(config_path: &Path, format: OutputFormat) -> Result<()> {
    if format.is_json() {
        get_formatter(format).print_json(&serde_json::json!({
            "config_path": config_path.display().to_string(),
            "exists": config_path.exists(),
        }));
    } else {
        println!("{}", config_path.display());
    }
    Ok(())
}

fn execute_set(config_path: &Path, key: &str, value: &str, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);
    let mut config = Config::load_or_default(config_path);

    info!(key = %key, value = %value, "Setting configuration value");

    if let Err(e) = apply_config_value(&mut config, key, value) {
        if format.is_json() {
            formatter.print_json(&serde_json::json!({
                "success": false,
                "key": key,
                "value": value,
                "error": e.to_string(),
            }));
        } else {
            formatter.error(&format!("Failed to set '{}': {}", key, e));
            formatter.line("");
            formatter.line("Supported keys:");
            for (name, help) in SUPPORTED_KEYS {
                formatter.line(&format!("  {name:<26} - {help}"));
            }
        }
        return Ok(());
    }

    let errors: Vec<String> = config.validate().iter().map(|e| e.to_string()).collect();
    if !errors.is_empty() {
        if format.is_json() {
            formatter.print_json(&serde_json::json!({
                "success": false,
                "key": key,
                "value": value,
                "errors": errors,
            }));
        } else {
            formatter.error(&format!(
                "Invalid value for '{}': {}",
                key,
                errors.join("; ")
            ));
        }
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create configuration directory")?;
    }
    let yaml = serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
    std::fs::write(config_path, yaml).context("Failed to write configuration file")?;

    if format.is_json() {
        formatter.print_json(&serde_json::json!({
            "success": true,
            "key": key,
            "value": value,
            "config_path": config_path.display().to_string(),
        }));
    } else {
        formatter.heading(&format!("Set {} = {}", key, value));
        formatter.line(&format!("Saved to {}", config_path.display()));
    }
    Ok(())
}

fn execute_validate(config_path: &Path, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);

    if !config_path.exists() {
        if format.is_json() {
            formatter.print_json(&serde_json::json!({
                "valid": true,
                "config_path": config_path.display().to_string(),
                "errors": [],
                "note": "Configuration file not found. Using defaults.",
            }));
        } else {
            formatter.notice(&format!(
                "Configuration file not found at {}",
                config_path.display()
            ));
            formatter.line("Using default configuration.");
        }
        return Ok(());
    }

    let config = match Config::load(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            if format.is_json() {
                formatter.print_json(&serde_json::json!({
                    "valid": false,
                    "config_path": config_path.display().to_string(),
                    "errors": [format!("Failed to parse configuration: {}", e)],
                }));
            } else {
                formatter.error(&format!("Failed to parse configuration: {}", e));
                formatter.line(&format!("File: {}", config_path.display()));
            }
            return Ok(());
        }
    };

    info!(config_path = %config_path.display(), "Validating configuration");
    let errors = config.validate();

    if format.is_json() {
        let error_strings: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        formatter.print_json(&serde_json::json!({
            "valid": errors.is_empty(),
            "config_path": config_path.display().to_string(),
            "errors": error_strings,
        }));
    } else if errors.is_empty() {
        formatter.heading("Configuration is valid");
        formatter.line(&format!("File: {}", config_path.display()));
    } else {
        formatter.error(&format!(
            "Configuration has {} error{}:",
            errors.len(),
            if errors.len() == 1 { "" } else { "s" }
        ));
        formatter.line(&format!("File: {}", config_path.display()));
        formatter.line("");
        for error in &errors {
            formatter.line(&format!("  {} - {}", error.field, error.message));
        }
    }

    Ok(())
}

const SUPPORTED_KEYS: &[(&str, &str)] = &[
    ("api.base_url", "Scheme and host of the API"),
    ("api.ownership_path", "Path prefix of the ownership API"),
    ("api.securities_path", "Path prefix of the security master API"),
    ("api.request_timeout_secs", "Per-request timeout in seconds"),
    ("sync.page_size", "Records per page (1-100)"),
    ("sync.search_debounce_ms", "Search quiet period in milliseconds"),
    ("sync.default_sort", "metric|name|date, optionally :asc or :desc"),
    ("logging.level", "trace|debug|info|warn|error"),
];

/// Parses `field` or `field:direction`; a bare field sorts descending
fn parse_sort(value: &str) -> Result<SortSpec> {
    let (field, direction) = match value.split_once(':') {
        Some((field, direction)) => (field, Some(direction)),
        None => (value, None),
    };
    let field: SortField = field.parse()?;
    let direction = match direction.map(|d| d.trim().to_ascii_lowercase()) {
        None => SortDirection::Descending,
        Some(d) if d == "desc" => SortDirection::Descending,
        Some(d) if d == "asc" => SortDirection::Ascending,
        Some(other) => anyhow::bail!("Unknown sort direction '{}' (expected asc or desc)", other),
    };
    Ok(SortSpec::new(field, direction))
}

/// Apply a dot-notation key/value pair to a Config struct
fn apply_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        // --- api ---
        "api.base_url" => {
            config.api.base_url = value.to_string();
        }
        "api.ownership_path" => {
            config.api.ownership_path = value.to_string();
        }
        "api.securities_path" => {
            config.api.securities_path = value.to_string();
        }
        "api.request_timeout_secs" => {
            config.api.request_timeout_secs = value
                .parse::<u64>()
                .context("Expected a positive integer for api.request_timeout_secs")?;
        }

        // --- sync ---
        "sync.page_size" => {
            config.sync.page_size = value
                .parse::<u32>()
                .context("Expected a positive integer for sync.page_size")?;
        }
        "sync.search_debounce_ms" => {
            config.sync.search_debounce_ms = value
                .parse::<u64>()
                .context("Expected a positive integer for sync.search_debounce_ms")?;
        }
        "sync.default_sort" => {
            config.sync.default_sort = parse_sort(value)?;
        }

        // --- logging ---
        "logging.level" => {
            config.logging.level = value.to_string();
        }

        _ => {
            anyhow::bail!("Unknown configuration key: '{}'", key);
        }
    }

    Ok(())
}
