//! Shared application state for the server.

use std::sync::Arc;

use anyhow::Context;
use secrecy::SecretString;

use parlor_core::llm::provider::ChatProvider;
use parlor_core::llm::retry::RetryPolicy;
use parlor_infra::config::{load_config, resolve_data_dir};
use parlor_infra::llm::gemini::GeminiProvider;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ChatProvider>,
    pub retry: RetryPolicy,
}

impl AppState {
    /// Initialize application state: load config and build the provider.
    ///
    /// The API key comes from the environment variable named in the
    /// config (`GEMINI_API_KEY` by default) and never from the config
    /// file itself.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir().context("could not determine home directory")?;
        let config = load_config(&data_dir).await;

        let key_env = &config.provider.api_key_env;
        let api_key = std::env::var(key_env)
            .with_context(|| format!("{key_env} is not set"))?;

        let provider = GeminiProvider::new(
            SecretString::from(api_key),
            config.provider.model.clone(),
        )
        .with_base_url(config.provider.base_url.clone());

        tracing::info!(model = %config.provider.model, "provider configured");

        Ok(Self {
            provider: Arc::new(provider),
            retry: RetryPolicy {
                max_retries: config.provider.max_retries,
            },
        })
    }

    /// Build state around an existing provider (used by tests).
    #[cfg(test)]
    pub fn with_provider(provider: Arc<dyn ChatProvider>, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }
}
