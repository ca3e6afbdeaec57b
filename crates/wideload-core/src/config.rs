//! Process-wide WideLoad configuration
//!
//! Read once at startup and shared immutably between every accumulator
//! created afterwards. Sources, in order of precedence: environment
//! overrides, a TOML document, built-in defaults.

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::errors::{Result, WideLoadError};

pub const ENV_ENABLED: &str = "WIDE_LOAD_ENABLED";
pub const ENV_AUTO_REPORT: &str = "WIDE_LOAD_AUTO_REPORT";
pub const ENV_LOG_LEVEL: &str = "WIDE_LOAD_LOG_LEVEL";
pub const ENV_LOG_MESSAGE: &str = "WIDE_LOAD_LOG_MESSAGE";
pub const ENV_SERIALIZABLE: &str = "WIDE_LOAD_SERIALIZABLE";

pub const DEFAULT_LOG_MESSAGE: &str = "Request completed.";

/// Severity used by the default log sink, named after the PSR-3 levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Notice => "notice",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
            LogLevel::Alert => "alert",
            LogLevel::Emergency => "emergency",
        }
    }

    /// Closest `tracing` level; tracing has no notice/critical/alert/emergency.
    pub fn tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info | LogLevel::Notice => tracing::Level::INFO,
            LogLevel::Warning => tracing::Level::WARN,
            LogLevel::Error | LogLevel::Critical | LogLevel::Alert | LogLevel::Emergency => {
                tracing::Level::ERROR
            }
        }
    }
}

impl FromStr for LogLevel {
    type Err = WideLoadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "notice" => Ok(LogLevel::Notice),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            "alert" => Ok(LogLevel::Alert),
            "emergency" => Ok(LogLevel::Emergency),
            _ => Err(WideLoadError::UnknownLogLevel {
                level: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable WideLoad settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideLoadConfig {
    /// Master switch; a disabled accumulator's `report()` does nothing.
    pub enabled: bool,
    /// Whether end-of-lifecycle signals report and flush automatically.
    pub auto_report: bool,
    pub log_level: LogLevel,
    pub log_message: String,
    /// Whether entries are carried into queued jobs via the side-channel.
    pub serializable: bool,
}

impl Default for WideLoadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_report: true,
            log_level: LogLevel::Info,
            log_message: DEFAULT_LOG_MESSAGE.to_string(),
            serializable: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlWideLoad {
    enabled: Option<bool>,
    auto_report: Option<bool>,
    log_level: Option<String>,
    log_message: Option<String>,
    serializable: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TomlDocument {
    Sectioned { wide_load: TomlWideLoad },
    Flat(TomlWideLoad),
}

impl WideLoadConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| WideLoadError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// Accepts either a `[wide_load]` table or the keys at top level.
    /// Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let document: TomlDocument =
            toml::from_str(content).map_err(|e| WideLoadError::InvalidConfig {
                field: "toml".to_string(),
                reason: e.to_string(),
            })?;
        let file = match document {
            TomlDocument::Sectioned { wide_load } => wide_load,
            TomlDocument::Flat(flat) => flat,
        };

        let mut config = Self::default();
        if let Some(enabled) = file.enabled {
            config.enabled = enabled;
        }
        if let Some(auto_report) = file.auto_report {
            config.auto_report = auto_report;
        }
        if let Some(level) = file.log_level {
            config.log_level = level.parse()?;
        }
        if let Some(message) = file.log_message {
            config.log_message = message;
        }
        if let Some(serializable) = file.serializable {
            config.serializable = serializable;
        }
        Ok(config)
    }

    /// Apply `WIDE_LOAD_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary lookup, keyed by the `WIDE_LOAD_*` names.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_ENABLED) {
            self.enabled = parse_bool(ENV_ENABLED, &v)?;
        }
        if let Some(v) = lookup(ENV_AUTO_REPORT) {
            self.auto_report = parse_bool(ENV_AUTO_REPORT, &v)?;
        }
        if let Some(v) = lookup(ENV_LOG_LEVEL) {
            self.log_level = v.parse()?;
        }
        if let Some(v) = lookup(ENV_LOG_MESSAGE) {
            self.log_message = v;
        }
        if let Some(v) = lookup(ENV_SERIALIZABLE) {
            self.serializable = parse_bool(ENV_SERIALIZABLE, &v)?;
        }
        Ok(())
    }
}

fn parse_bool(field: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(WideLoadError::InvalidConfig {
            field: field.to_string(),
            reason: format!("expected a boolean, got '{}'", raw),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = WideLoadConfig::default();
        assert!(config.enabled);
        assert!(config.auto_report);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.log_message, "Request completed.");
        assert!(config.serializable);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!(" notice ".parse::<LogLevel>().unwrap(), LogLevel::Notice);
        assert!(matches!(
            "loud".parse::<LogLevel>(),
            Err(WideLoadError::UnknownLogLevel { .. })
        ));
    }

    #[test]
    fn test_tracing_level_mapping() {
        assert_eq!(LogLevel::Notice.tracing_level(), tracing::Level::INFO);
        assert_eq!(LogLevel::Warning.tracing_level(), tracing::Level::WARN);
        assert_eq!(LogLevel::Emergency.tracing_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_from_toml_sectioned() {
        let config = WideLoadConfig::from_toml_str(
            r#"
            [wide_load]
            log_level = "debug"
            log_message = "Done."
            serializable = false
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.log_message, "Done.");
        assert!(!config.serializable);
        assert!(config.enabled);
    }

    #[test]
    fn test_from_toml_flat() {
        let config = WideLoadConfig::from_toml_str("auto_report = false\n").unwrap();
        assert!(!config.auto_report);
        assert_eq!(config.log_message, DEFAULT_LOG_MESSAGE);
    }

    #[test]
    fn test_from_toml_rejects_bad_level() {
        let err = WideLoadConfig::from_toml_str("log_level = \"shout\"\n").unwrap_err();
        assert!(matches!(err, WideLoadError::UnknownLogLevel { .. }));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_ENABLED, "false"),
            (ENV_LOG_LEVEL, "error"),
            (ENV_LOG_MESSAGE, "Job done."),
        ]
        .into_iter()
        .collect();

        let mut config = WideLoadConfig::default();
        config
            .apply_overrides(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();

        assert!(!config.enabled);
        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(config.log_message, "Job done.");
        assert!(config.auto_report);
    }

    #[test]
    fn test_override_rejects_non_boolean() {
        let mut config = WideLoadConfig::default();
        let err = config
            .apply_overrides(|name| (name == ENV_SERIALIZABLE).then(|| "maybe".to_string()))
            .unwrap_err();
        assert_eq!(
            err,
            WideLoadError::InvalidConfig {
                field: ENV_SERIALIZABLE.to_string(),
                reason: "expected a boolean, got 'maybe'".to_string(),
            }
        );
    }
}
