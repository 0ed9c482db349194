use crate::config::{AppConfig, ModelConfig};
use providers::gemini::{self, GeminiConfig, GeminiProvider};
use providers::noop::NoopProvider;
use providers::openai::{self, OpenAiConfig, OpenAiProvider};
use providers::{MultimodalProvider, ProviderError, ProviderRegistry};
use std::sync::Arc;
use tracing::warn;

/// Builds the provider named by `model.provider`. Remote providers need the
/// key named by `model.api_key_env`.
pub fn build_provider(model: &ModelConfig) -> Result<Arc<dyn MultimodalProvider>, ProviderError> {
    let api_key = || {
        std::env::var_os(&model.api_key_env)
            .map(|key| key.to_string_lossy().into_owned())
            .ok_or_else(|| ProviderError::MissingApiKey(model.api_key_env.clone()))
    };
    let base_url = |default: &str| model.base_url.clone().unwrap_or_else(|| default.to_string());

    match model.provider.as_str() {
        "noop" => Ok(Arc::new(NoopProvider)),
        "gemini" => Ok(Arc::new(GeminiProvider::new(GeminiConfig {
            api_key: api_key()?,
            base_url: base_url(gemini::DEFAULT_BASE_URL),
        }))),
        "openai" => Ok(Arc::new(OpenAiProvider::new(OpenAiConfig {
            api_key: api_key()?,
            base_url: base_url(openai::DEFAULT_BASE_URL),
        }))),
        other => Err(ProviderError::UnknownProvider(other.to_string())),
    }
}

pub fn build_registry(config: &AppConfig) -> ProviderRegistry {
    let model = &config.model;
    let mut reg = ProviderRegistry::new().with_provider("noop", Arc::new(NoopProvider));

    match build_provider(model) {
        Ok(provider) => reg = reg.with_provider(&model.provider, provider),
        Err(e) => warn!(error = %e, "answers will report the error"),
    }

    reg.set_preferred(&model.provider)
}

/// The configured provider, or `noop` when it could not be built.
pub fn resolve_provider(config: &AppConfig) -> Arc<dyn MultimodalProvider> {
    let reg = build_registry(config);
    reg.get(None).unwrap_or_else(|e| {
        warn!(error = %e, "falling back to noop provider");
        Arc::new(NoopProvider)
    })
}
