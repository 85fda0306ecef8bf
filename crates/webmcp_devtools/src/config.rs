//! Configuration loading from an optional TOML file.

use crate::renderer::RenderConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Devtools configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DevtoolsConfig {
    /// UI poll interval in milliseconds
    pub tick_rate_ms: u64,
    /// Start with the body hidden
    pub start_minimized: bool,
    /// Ask a human when handlers request interaction
    pub interactive: bool,
    /// Where tracing output goes in TUI mode; suppressed when unset
    pub log_file: Option<PathBuf>,
    /// Register the demo tool set at startup
    pub demo_tools: bool,
    /// Colors and borders
    pub render: RenderConfig,
}

impl Default for DevtoolsConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            start_minimized: false,
            interactive: true,
            log_file: None,
            demo_tools: true,
            render: RenderConfig::default(),
        }
    }
}

impl DevtoolsConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Poll interval
    #[must_use]
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick_rate_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid TOML for this shape
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// Parsed but out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{BorderStyle, StatusColor};
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DevtoolsConfig::default();
        assert_eq!(config.tick_rate_ms, 250);
        assert!(config.interactive);
        assert!(config.demo_tools);
        assert!(!config.start_minimized);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(DevtoolsConfig::parse("").unwrap(), DevtoolsConfig::default());
    }

    #[test]
    fn test_parse_partial() {
        let config = DevtoolsConfig::parse(
            r#"
            tick_rate_ms = 100
            interactive = false
            log_file = "/tmp/webmcp.log"

            [render]
            border_style = "double"
            status_color = "yellow"
            "#,
        )
        .unwrap();
        assert_eq!(config.tick_rate(), Duration::from_millis(100));
        assert!(!config.interactive);
        assert!(config.demo_tools);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/webmcp.log")));
        assert_eq!(config.render.border_style, BorderStyle::Double);
        assert_eq!(config.render.status_color, StatusColor::Yellow);
        assert!(config.render.enable_colors);
    }

    #[test]
    fn test_zero_tick_rejected() {
        let err = DevtoolsConfig::parse("tick_rate_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let err = DevtoolsConfig::parse("tick_rate_ms = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "start_minimized = true").unwrap();
        let config = DevtoolsConfig::load_or_default(Some(file.path())).unwrap();
        assert!(config.start_minimized);

        let missing = DevtoolsConfig::load("/nonexistent/webmcp.toml").unwrap_err();
        assert!(matches!(missing, ConfigError::Io(_)));
    }
}
