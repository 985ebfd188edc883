/// Configuration for the signup form
use crate::error::FormError;
use crate::operations::SaveFormat;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Simplified email shape: lowercase local part, `@`, lowercase domain
pub const DEFAULT_EMAIL_PATTERN: &str = "[a-z0-9._%+-]+@[a-z0-9.-]+";

/// What `save` does when the form still has faults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavePolicy {
    /// Save anyway and log the outstanding faults
    #[default]
    Advisory,
    /// Refuse with `FormError::SaveBlocked`
    BlockOnInvalid,
}

/// Form configuration
///
/// Every field has a default, so partial JSON files only override what they
/// name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Lowest accepted rating (inclusive)
    pub min_rating: f64,

    /// Highest accepted rating (inclusive)
    pub max_rating: f64,

    /// Quiet period before the email message is recomputed
    pub email_debounce_ms: u64,

    /// Pattern the whole email value must match
    pub email_pattern: String,

    pub save_policy: SavePolicy,

    pub save_format: SaveFormat,

    /// Buffer size of the outbound event broadcast
    pub event_capacity: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            min_rating: 1.0,
            max_rating: 10.0,
            email_debounce_ms: 1000,
            email_pattern: DEFAULT_EMAIL_PATTERN.to_string(),
            save_policy: SavePolicy::Advisory,
            save_format: SaveFormat::Json,
            event_capacity: 256,
        }
    }
}

impl FormConfig {
    pub fn email_debounce(&self) -> Duration {
        Duration::from_millis(self.email_debounce_ms)
    }

    /// Parse a (possibly partial) JSON config and validate it
    pub fn from_json_str(json: &str) -> Result<Self, FormError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate().map_err(FormError::invalid_config)?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FormError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.min_rating.is_finite() || !self.max_rating.is_finite() {
            return Err("rating bounds must be finite numbers".to_string());
        }

        if self.min_rating > self.max_rating {
            return Err(format!(
                "min_rating ({}) cannot exceed max_rating ({})",
                self.min_rating, self.max_rating
            ));
        }

        if self.email_debounce_ms == 0 {
            return Err("email_debounce_ms must be greater than 0".to_string());
        }

        if self.email_pattern.is_empty() {
            return Err("email_pattern cannot be empty".to_string());
        }

        if let Err(e) = Regex::new(&self.email_pattern) {
            return Err(format!("email_pattern does not compile: {}", e));
        }

        if self.event_capacity == 0 {
            return Err("event_capacity must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = FormConfig::default();
        assert_eq!(config.min_rating, 1.0);
        assert_eq!(config.max_rating, 10.0);
        assert_eq!(config.email_debounce(), Duration::from_millis(1000));
        assert_eq!(config.save_policy, SavePolicy::Advisory);
        assert_eq!(config.save_format, SaveFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = FormConfig::default();

        // Invalid: inverted bounds
        config.min_rating = 11.0;
        assert!(config.validate().is_err());

        // Invalid: zero debounce
        config.min_rating = 1.0;
        config.email_debounce_ms = 0;
        assert!(config.validate().is_err());

        // Invalid: pattern does not compile
        config.email_debounce_ms = 1000;
        config.email_pattern = "([a-z".to_string();
        assert!(config.validate().is_err());

        // Invalid: empty pattern
        config.email_pattern = String::new();
        assert!(config.validate().is_err());

        // Invalid: zero event capacity
        config.email_pattern = DEFAULT_EMAIL_PATTERN.to_string();
        config.event_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_overrides_defaults() {
        let config =
            FormConfig::from_json_str(r#"{ "max_rating": 5, "save_policy": "block_on_invalid" }"#)
                .unwrap();
        assert_eq!(config.max_rating, 5.0);
        assert_eq!(config.min_rating, 1.0);
        assert_eq!(config.save_policy, SavePolicy::BlockOnInvalid);
        assert_eq!(config.email_pattern, DEFAULT_EMAIL_PATTERN);
    }

    #[test]
    fn test_invalid_json_config_is_rejected() {
        let err = FormConfig::from_json_str(r#"{ "min_rating": 9, "max_rating": 2 }"#).unwrap_err();
        assert!(matches!(err, FormError::InvalidConfig(_)));

        let err = FormConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, FormError::Serialization(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "email_debounce_ms": 250, "save_format": "key_value" }}"#).unwrap();

        let config = FormConfig::from_file(file.path()).unwrap();
        assert_eq!(config.email_debounce(), Duration::from_millis(250));
        assert_eq!(config.save_format, SaveFormat::KeyValue);

        assert!(matches!(
            FormConfig::from_file(file.path().with_extension("missing")),
            Err(FormError::Io(_))
        ));
    }
}
