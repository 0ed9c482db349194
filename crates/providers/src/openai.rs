use crate::{status_error, ContentPart, GenerateResponse, MultimodalProvider, ProviderError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
}

/// Client for OpenAI-compatible chat completion endpoints that accept image parts.
#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    cfg: Arc<OpenAiConfig>,
}

impl OpenAiProvider {
    pub fn new(cfg: OpenAiConfig) -> Self {
        Self {
            client: Client::new(),
            cfg: Arc::new(cfg),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<MessagePart>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum MessagePart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessageResp,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResp {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

fn build_request<'a>(model: &'a str, parts: &[ContentPart]) -> ChatRequest<'a> {
    let content = parts
        .iter()
        .map(|p| match p {
            ContentPart::Text(text) => MessagePart::Text { text: text.clone() },
            ContentPart::InlineData { mime_type, data } => MessagePart::ImageUrl {
                image_url: ImageUrl {
                    url: format!("data:{};base64,{}", mime_type, STANDARD.encode(data)),
                },
            },
        })
        .collect();
    ChatRequest {
        model,
        messages: vec![ChatMessage {
            role: "user",
            content,
        }],
    }
}

/// First choice's content; `null` content reads as an empty answer.
fn response_text(parsed: ChatApiResponse) -> Result<String, ProviderError> {
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or(ProviderError::EmptyResponse)?;
    Ok(choice.message.content.unwrap_or_default())
}

#[async_trait::async_trait]
impl MultimodalProvider for OpenAiProvider {
    async fn generate(
        &self,
        model: &str,
        parts: &[ContentPart],
    ) -> Result<GenerateResponse, ProviderError> {
        let body = build_request(model, parts);

        let resp = self
            .client
            .post(format!(
                "{}/v1/chat/completions",
                self.cfg.base_url.trim_end_matches('/')
            ))
            .bearer_auth(&self.cfg.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.bytes().await.unwrap_or(Bytes::from_static(b""));
            return Err(status_error(status, &body));
        }

        let parsed: ChatApiResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        Ok(GenerateResponse {
            text: response_text(parsed)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn images_become_data_urls() {
        let parts = vec![
            ContentPart::text("q"),
            ContentPart::InlineData {
                mime_type: "image/png".into(),
                data: vec![0xff],
            },
        ];
        let body = serde_json::to_value(build_request("gpt-4o-mini", &parts)).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "gpt-4o-mini",
                "messages": [{
                    "role": "user",
                    "content": [
                        {"type": "text", "text": "q"},
                        {"type": "image_url", "image_url": {"url": "data:image/png;base64,/w=="}}
                    ]
                }]
            })
        );
    }

    #[test]
    fn response_text_takes_first_choice() {
        let parsed: ChatApiResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Paris."}},
                {"index": 1, "message": {"role": "assistant", "content": "Lyon."}}
            ]
        }))
        .unwrap();
        assert_eq!(response_text(parsed).unwrap(), "Paris.");
    }

    #[test]
    fn null_content_is_empty_text() {
        let parsed: ChatApiResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }))
        .unwrap();
        assert_eq!(response_text(parsed).unwrap(), "");
    }

    #[test]
    fn no_choices_is_empty_response() {
        let parsed: ChatApiResponse =
            serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(
            response_text(parsed),
            Err(ProviderError::EmptyResponse)
        ));
        let parsed: ChatApiResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            response_text(parsed),
            Err(ProviderError::EmptyResponse)
        ));
    }
}
