//! OpenAI-compatible chat completions client.

use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::receipt::ReceiptFields;

use super::prompt::{extraction_prompt, parse_reply};
use super::{ReceiptExtractor, Result};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    seed: i64,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageOut,
}

#[derive(Debug, Deserialize)]
struct MessageOut {
    content: Option<String>,
}

impl ChatResponse {
    fn into_content(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(ExtractionError::EmptyResponse)
    }
}

/// Extractor backed by a chat completions endpoint with image input.
pub struct OpenAiExtractor {
    client: reqwest::Client,
    config: ExtractionConfig,
    prompt: String,
}

impl OpenAiExtractor {
    /// Create an extractor. The API key is read from the environment per request.
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            prompt: extraction_prompt(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn api_key(&self) -> Result<String> {
        std::env::var(&self.config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ExtractionError::MissingApiKey(self.config.api_key_env.clone()))
    }

    fn request_body<'a>(&'a self, image_b64: &str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            seed: self.config.seed,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text { text: &self.prompt },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: format!("data:{};base64,{}", self.config.image_mime, image_b64),
                        },
                    },
                ],
            }],
        }
    }
}

/// Build the error for a non-success reply. A body that cannot be read is
/// reported in place of the body text.
fn status_error<E: std::fmt::Display>(
    status: StatusCode,
    body: std::result::Result<String, E>,
) -> ExtractionError {
    let body = body.unwrap_or_else(|e| {
        debug!("Could not read error body for status {}: {}", status, e);
        format!("<unreadable body: {e}>")
    });
    ExtractionError::Status {
        status: status.as_u16(),
        body,
    }
}

impl ReceiptExtractor for OpenAiExtractor {
    async fn extract(&self, image_b64: &str) -> Result<ReceiptFields> {
        let key = self.api_key()?;
        let body = self.request_body(image_b64);

        debug!(
            "Requesting extraction from {} ({} base64 bytes)",
            self.config.model,
            image_b64.len()
        );

        let resp = self
            .client
            .post(self.endpoint())
            .header(AUTHORIZATION, format!("Bearer {key}"))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(status_error(status, resp.text().await));
        }

        let out: ChatResponse = resp.json().await?;
        let content = out.into_content()?;
        debug!("Model reply: {}", content);

        parse_reply(&content)
    }
}
