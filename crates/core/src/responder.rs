//! Packages a question and the gathered context into one model request.

use crate::models::{Context, Fragment};
use image::ImageFormat;
use providers::{ContentPart, MultimodalProvider, ProviderError};
use std::io::Cursor;
use thiserror::Error;
use tracing::{info, warn};

pub const INSTRUCTION: &str = "\
You are an expert Multimodal Data Processing System. Your task is to answer a user's question
based on the provided context, which includes documents, images, and other file content.

RULES:
1. Use ONLY the provided context and images to formulate your answer.
2. If the answer is not in the context, state clearly: \"I cannot find the answer in the provided documents.\"
3. Maintain a helpful and professional tone.
";

pub const QUESTION_HEADER: &str = "USER QUESTION:";

pub const NOT_FOUND_PHRASE: &str = "I cannot find the answer in the provided documents.";

#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("failed to encode image fragment {index}: {source}")]
    ImageEncode {
        index: usize,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

fn image_part(index: usize, img: &image::DynamicImage) -> Result<ContentPart, AssembleError> {
    let mut data = Vec::new();
    img.write_to(&mut Cursor::new(&mut data), ImageFormat::Png)
        .map_err(|source| AssembleError::ImageEncode { index, source })?;
    Ok(ContentPart::InlineData {
        mime_type: "image/png".to_string(),
        data,
    })
}

/// `[instruction, "USER QUESTION:", query, *context]`, in that order.
pub fn build_payload(query: &str, context: &Context) -> Result<Vec<ContentPart>, AssembleError> {
    let mut parts = Vec::with_capacity(context.len() + 3);
    parts.push(ContentPart::text(INSTRUCTION));
    parts.push(ContentPart::text(QUESTION_HEADER));
    parts.push(ContentPart::text(query));
    for (index, fragment) in context.iter().enumerate() {
        parts.push(match fragment {
            Fragment::Text(text) => ContentPart::Text(text.clone()),
            Fragment::Image(img) => image_part(index, img)?,
        });
    }
    Ok(parts)
}

async fn try_answer(
    provider: &dyn MultimodalProvider,
    model: &str,
    query: &str,
    context: &Context,
) -> Result<String, AssembleError> {
    let parts = build_payload(query, context)?;
    let resp = provider.generate(model, &parts).await?;
    Ok(resp.text)
}

/// Asks the model once. Failures are returned as a diagnostic string.
pub async fn answer(
    provider: &dyn MultimodalProvider,
    model: &str,
    query: &str,
    context: &Context,
) -> String {
    info!(model, fragments = context.len(), "answering query");
    match try_answer(provider, model, query, context).await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "generation failed");
            format!(
                "An error occurred during generation. Check API key and context size: {}",
                e
            )
        }
    }
}
