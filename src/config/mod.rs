//! Configuration management for mongo-mcp
//!
//! Configuration is assembled from several sources:
//! - Configuration file (TOML format)
//! - Environment variables (`MONGO_URI`)
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Environment variable holding the MongoDB connection string
pub const MONGO_URI_ENV: &str = "MONGO_URI";

/// Excel limits worksheet names to 31 characters
const MAX_SHEET_NAME_LEN: usize = 31;

/// Characters Excel does not allow in worksheet names
const INVALID_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Connection configuration
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Spreadsheet export configuration
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// MongoDB connection URI
    #[serde(default = "default_uri")]
    pub uri: String,

    /// Application name reported to the server
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Server selection timeout in seconds
    #[serde(default = "default_timeout")]
    pub server_selection_timeout: u64,

    /// Ping the server once at startup
    #[serde(default = "default_ping_on_startup")]
    pub ping_on_startup: bool,
}

/// Spreadsheet export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Worksheet name used for xlsx output
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    /// Output format selection
    #[serde(default)]
    pub format: ExportFormat,

    /// Create missing parent directories of the output target
    #[serde(default)]
    pub create_dirs: bool,
}

/// Output file format for the export operation
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Choose by output file extension (`.csv` → CSV, anything else → xlsx)
    #[default]
    Auto,

    /// Excel workbook
    Xlsx,

    /// Comma-separated values
    Csv,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Path to log file (None for stderr)
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_uri() -> String {
    "mongodb://localhost:27018/".to_string()
}

fn default_app_name() -> String {
    "mongo-mcp".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_ping_on_startup() -> bool {
    true
}

fn default_sheet_name() -> String {
    "Sheet 1".to_string()
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            app_name: default_app_name(),
            server_selection_timeout: default_timeout(),
            ping_on_startup: default_ping_on_startup(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sheet_name: default_sheet_name(),
            format: ExportFormat::default(),
            create_dirs: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_path: None,
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Explicit config path; `None` means the default location
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigError::FileNotFound(path.display().to_string()).into());
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Apply environment variable overrides
    ///
    /// `MONGO_URI` replaces the connection URI when set and non-empty.
    pub fn apply_env(&mut self) {
        self.apply_env_value(std::env::var(MONGO_URI_ENV).ok());
    }

    fn apply_env_value(&mut self, uri: Option<String>) {
        if let Some(uri) = uri.filter(|u| !u.trim().is_empty()) {
            self.connection.uri = uri;
        }
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mongo-mcp")
            .join("config.toml")
    }

    /// Serialize the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.connection.validate_uri()?;

        if self.connection.server_selection_timeout == 0 {
            return Err(ConfigError::InvalidValue {
                field: "connection.server_selection_timeout".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        self.export.validate_sheet_name()?;

        Ok(())
    }
}

impl ExportConfig {
    /// Check the worksheet name exactly as the xlsx writer will use it
    ///
    /// Excel rejects empty names, names over 31 characters, the characters
    /// `[ ] : * ? / \`, a leading or trailing apostrophe and the reserved
    /// name `History`.
    pub fn validate_sheet_name(&self) -> Result<()> {
        let name = self.sheet_name.as_str();
        let invalid = name.is_empty()
            || name.chars().count() > MAX_SHEET_NAME_LEN
            || name.contains(INVALID_SHEET_CHARS)
            || name.starts_with('\'')
            || name.ends_with('\'')
            || name.eq_ignore_ascii_case("History")
            || rust_xlsxwriter::Worksheet::new().set_name(name).is_err();

        if invalid {
            return Err(ConfigError::InvalidValue {
                field: "export.sheet_name".to_string(),
                value: self.sheet_name.clone(),
            }
            .into());
        }
        Ok(())
    }
}

impl ConnectionConfig {
    /// Get server selection timeout as Duration
    pub fn server_selection_timeout(&self) -> Duration {
        Duration::from_secs(self.server_selection_timeout)
    }

    /// Check the connection URI has a MongoDB scheme and a host part
    pub fn validate_uri(&self) -> Result<()> {
        let uri = self.uri.trim();
        let rest = uri
            .strip_prefix("mongodb://")
            .or_else(|| uri.strip_prefix("mongodb+srv://"));

        match rest {
            Some(rest) if !rest.is_empty() => Ok(()),
            _ => Err(ConfigError::InvalidValue {
                field: "connection.uri".to_string(),
                value: self.uri.clone(),
            }
            .into()),
        }
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
