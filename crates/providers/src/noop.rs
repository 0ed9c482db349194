use crate::{ContentPart, GenerateResponse, MultimodalProvider, ProviderError};

#[derive(Debug, Default)]
pub struct NoopProvider;

#[async_trait::async_trait]
impl MultimodalProvider for NoopProvider {
    async fn generate(
        &self,
        _model: &str,
        _parts: &[ContentPart],
    ) -> Result<GenerateResponse, ProviderError> {
        Err(ProviderError::NotImplemented)
    }
}
