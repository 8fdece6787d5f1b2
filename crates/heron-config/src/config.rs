//! The root configuration type.

use heron_telemetry::create_env_filter;
use serde::{Deserialize, Serialize};

use crate::{BindingConfig, ConfigError, LogFormat, LoggingSection};

/// Complete Heron engine configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use heron_config::HeronConfig;
///
/// let config = HeronConfig::default();
/// assert_eq!(config.binding.max_body_bytes, 1024 * 1024);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct HeronConfig {
    /// Argument binding settings.
    #[serde(default)]
    pub binding: BindingConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl HeronConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if:
    /// - `binding.max_body_bytes` is zero
    /// - `logging.level` is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.binding.max_body_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "binding.max_body_bytes",
                "must be greater than 0",
            ));
        }

        if let Err(e) = create_env_filter(&self.logging.level) {
            return Err(ConfigError::invalid_value("logging.level", e.to_string()));
        }

        Ok(())
    }

    /// Local development preset: pretty debug logs with source locations.
    #[must_use]
    pub fn development() -> Self {
        Self {
            binding: BindingConfig::default(),
            logging: LoggingSection {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                include_location: true,
                span_events: true,
                ..LoggingSection::default()
            },
        }
    }

    /// Production preset: JSON logs at `info`.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(HeronConfig::default().validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(HeronConfig::development().validate().is_ok());
        assert!(HeronConfig::production().validate().is_ok());
        assert_eq!(HeronConfig::development().logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_zero_body_limit_rejected() {
        let mut config = HeronConfig::default();
        config.binding.max_body_bytes = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("binding.max_body_bytes"));
    }

    #[test]
    fn test_bad_level_rejected() {
        let mut config = HeronConfig::default();
        config.logging.level = "heron=loud".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "logging.level"));
    }

    #[test]
    fn test_unknown_section_rejected() {
        let result: Result<HeronConfig, _> = toml::from_str("[server]\nport = 1");
        assert!(result.is_err());
    }
}
