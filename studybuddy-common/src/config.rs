//! Configuration loading and resolution
//!
//! Settings are resolved with the following priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is not an error: a warning is logged and the
//! remaining tiers are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable for the processing service base URL
pub const ENV_SERVICE_URL: &str = "STUDYBUDDY_SERVICE_URL";
/// Environment variable for the processing service API key
pub const ENV_API_KEY: &str = "STUDYBUDDY_API_KEY";
/// Environment variable for the remote function name
pub const ENV_FUNCTION: &str = "STUDYBUDDY_FUNCTION";
/// Environment variable for the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "STUDYBUDDY_TIMEOUT_SECS";

/// Logging section of the TOML config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Contents of `config.toml`
///
/// Every field is optional so a partial file still loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Base URL of the processing service (e.g. `https://xyz.supabase.co`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,
    /// API key sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Remote function name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    /// HTTP request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Compiled-in defaults used when no other tier supplies a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub function_name: String,
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub event_bus_capacity: usize,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            function_name: "process-files".to_string(),
            request_timeout_secs: 120,
            log_level: default_log_level(),
            event_bus_capacity: 100,
        }
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub service_url: Option<String>,
    pub api_key: Option<String>,
    pub function_name: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

/// Fully resolved settings for the processing service client
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSettings {
    pub service_url: Option<String>,
    pub api_key: Option<String>,
    pub function_name: String,
    pub request_timeout_secs: u64,
    pub log_level: String,
    /// Log file; logs go to stderr when unset
    pub log_file: Option<PathBuf>,
}

impl ServiceSettings {
    /// Service URL, or a configuration error explaining how to set one
    pub fn require_service_url(&self) -> Result<&str> {
        self.service_url.as_deref().ok_or_else(|| {
            Error::Config(format!(
                "Processing service URL not configured. Please configure using one of:\n\
                 1. Command line: --service-url https://your-project.supabase.co\n\
                 2. Environment: {}=https://your-project.supabase.co\n\
                 3. TOML config: service_url = \"https://your-project.supabase.co\"",
                ENV_SERVICE_URL
            ))
        })
    }
}

/// Resolves [`ServiceSettings`] from all configuration tiers
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    overrides: CliOverrides,
    config_path: Option<PathBuf>,
    defaults: CompiledDefaults,
}

impl ConfigResolver {
    /// Create a resolver reading the platform default config file
    pub fn new(overrides: CliOverrides) -> Self {
        Self {
            overrides,
            config_path: default_config_path(),
            defaults: CompiledDefaults::default(),
        }
    }

    /// Read the TOML tier from `path` instead of the platform default
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Path of the TOML file this resolver reads, if one could be determined
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Resolve all settings
    pub fn resolve(&self) -> Result<ServiceSettings> {
        let toml_config = match &self.config_path {
            Some(path) => load_toml_config(path)?.unwrap_or_default(),
            None => {
                warn!("Could not determine config directory, using defaults");
                TomlConfig::default()
            }
        };

        let service_url = pick(
            "service_url",
            self.overrides.service_url.clone(),
            env_string(ENV_SERVICE_URL),
            toml_config.service_url.clone(),
        )
        .map(|url| url.trim_end_matches('/').to_string());

        let api_key = pick(
            "api_key",
            self.overrides.api_key.clone(),
            env_string(ENV_API_KEY),
            toml_config.api_key.clone(),
        );

        let function_name = pick(
            "function_name",
            self.overrides.function_name.clone(),
            env_string(ENV_FUNCTION),
            toml_config.function_name.clone(),
        )
        .unwrap_or_else(|| self.defaults.function_name.clone());

        let request_timeout_secs = pick(
            "request_timeout_secs",
            self.overrides.request_timeout_secs,
            env_timeout()?,
            toml_config.request_timeout_secs,
        )
        .unwrap_or(self.defaults.request_timeout_secs);

        if request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(ServiceSettings {
            service_url,
            api_key,
            function_name,
            request_timeout_secs,
            log_level: toml_config.logging.level,
            log_file: toml_config.logging.file,
        })
    }
}

/// Apply CLI → ENV → TOML priority to a single setting
fn pick<T>(name: &str, cli: Option<T>, env: Option<T>, toml: Option<T>) -> Option<T> {
    if cli.is_some() {
        debug!(setting = name, "Using value from command line");
        return cli;
    }
    if env.is_some() {
        debug!(setting = name, "Using value from environment");
        return env;
    }
    if toml.is_some() {
        debug!(setting = name, "Using value from TOML config");
    }
    toml
}

/// Read a non-empty, non-whitespace environment variable
fn env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_timeout() -> Result<Option<u64>> {
    match env_string(ENV_TIMEOUT_SECS) {
        Some(raw) => raw.parse::<u64>().map(Some).map_err(|e| {
            Error::Config(format!("{} must be a whole number of seconds: {}", ENV_TIMEOUT_SECS, e))
        }),
        None => Ok(None),
    }
}

/// Platform default config file: `{config_dir}/studybuddy/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("studybuddy").join("config.toml"))
}

/// Load a TOML config file
///
/// Returns `Ok(None)` if the file does not exist; a file that exists but
/// cannot be parsed is an error.
pub fn load_toml_config(path: &Path) -> Result<Option<TomlConfig>> {
    if !path.exists() {
        warn!("Config file not found: {}, using defaults", path.display());
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;
    info!("Loaded config from {}", path.display());
    Ok(Some(config))
}

/// Write a TOML config file atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;

    info!("Wrote config to {}", path.display());
    Ok(())
}
