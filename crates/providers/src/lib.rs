//! Provider abstractions for remote multimodal models.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub mod gemini;
pub mod noop;
pub mod openai;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("not implemented")]
    NotImplemented,
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("missing API key: {0} is not set")]
    MissingApiKey(String),
    #[error("model returned no text")]
    EmptyResponse,
}

/// One element of a request payload, in the order the model should see it.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    InlineData { mime_type: String, data: Vec<u8> },
}

impl ContentPart {
    pub fn text(s: impl Into<String>) -> Self {
        ContentPart::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text(t) => Some(t),
            ContentPart::InlineData { .. } => None,
        }
    }
}

/// Error for a non-2xx reply, carrying the status line and the raw body.
pub(crate) fn status_error(status: reqwest::StatusCode, body: &[u8]) -> ProviderError {
    ProviderError::RequestFailed(format!(
        "status {} body {}",
        status,
        String::from_utf8_lossy(body)
    ))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub text: String,
}

#[async_trait::async_trait]
pub trait MultimodalProvider: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        parts: &[ContentPart],
    ) -> Result<GenerateResponse, ProviderError>;
}

#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn MultimodalProvider>>,
    pub preferred: Option<String>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, name: &str, provider: Arc<dyn MultimodalProvider>) -> Self {
        self.providers.insert(name.to_string(), provider);
        self
    }

    pub fn set_preferred(mut self, name: &str) -> Self {
        self.preferred = Some(name.to_string());
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    pub fn get(&self, name: Option<&str>) -> Result<Arc<dyn MultimodalProvider>, ProviderError> {
        let key = name
            .map(str::to_string)
            .or_else(|| self.preferred.clone())
            .ok_or_else(|| ProviderError::UnknownProvider("no provider configured".into()))?;
        self.providers
            .get(&key)
            .cloned()
            .ok_or(ProviderError::UnknownProvider(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noop::NoopProvider;

    #[test]
    fn registry_resolves_preferred_then_explicit() {
        let reg = ProviderRegistry::new()
            .with_provider("noop", Arc::new(NoopProvider))
            .set_preferred("noop");
        assert!(reg.get(None).is_ok());
        assert!(reg.get(Some("noop")).is_ok());
        match reg.get(Some("gemini")) {
            Err(ProviderError::UnknownProvider(name)) => assert_eq!(name, "gemini"),
            _ => panic!("expected unknown provider"),
        }
    }

    #[test]
    fn status_error_keeps_status_and_body() {
        let err = status_error(reqwest::StatusCode::TOO_MANY_REQUESTS, b"{\"error\":\"quota\"}");
        assert_eq!(
            err.to_string(),
            "request failed: status 429 Too Many Requests body {\"error\":\"quota\"}"
        );
    }

    #[test]
    fn registry_without_preference_errors() {
        let reg = ProviderRegistry::new().with_provider("noop", Arc::new(NoopProvider));
        assert!(matches!(
            reg.get(None),
            Err(ProviderError::UnknownProvider(_))
        ));
    }
}
