//! Configuration value objects for Parlor.
//!
//! Deserialized from `config.toml` in the data directory. Every field has
//! a default so a missing or partial file still yields a working config.

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Hosted model provider settings.
    pub provider: ProviderSettings,
}

/// Settings for the hosted model provider.
///
/// The provider/model identity is configuration, not part of the core
/// contract; swapping the model requires no code change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Model identifier sent to the provider.
    pub model: String,
    /// Base URL of the provider API.
    pub base_url: String,
    /// Maximum automatic retries on transient provider failure.
    pub max_retries: u32,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-pro-latest".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            max_retries: 2,
            api_key_env: "GEMINI_API_KEY".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_settings_defaults() {
        let settings = ProviderSettings::default();
        assert_eq!(settings.model, "gemini-1.5-pro-latest");
        assert_eq!(settings.max_retries, 2);
        assert_eq!(settings.api_key_env, "GEMINI_API_KEY");
        assert!(settings.base_url.starts_with("https://"));
    }

    #[test]
    fn test_app_config_from_empty_toml() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.provider.max_retries, 2);
    }

    #[test]
    fn test_app_config_partial_override() {
        let config: AppConfig = toml::from_str(
            r#"
[provider]
model = "gemini-1.5-flash-latest"
max_retries = 0
"#,
        )
        .unwrap();
        assert_eq!(config.provider.model, "gemini-1.5-flash-latest");
        assert_eq!(config.provider.max_retries, 0);
        // Untouched fields keep their defaults
        assert_eq!(config.provider.api_key_env, "GEMINI_API_KEY");
    }
}
