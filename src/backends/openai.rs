use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{fetch_bytes, ImageGenerator, TextGenerator};
use crate::Result;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const CHAT_MODEL: &str = "gpt-3.5-turbo";
const IMAGE_SIZE: &str = "1024x1024";

/// OpenAI client covering chat completions (slide script) and image
/// generation (slide backgrounds)
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL (used to point at a stand-in server)
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<reqwest::Response> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI request to {} failed: HTTP {} {}", path, status, detail);
        }

        Ok(response)
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageResult>,
}

#[derive(Debug, Deserialize)]
struct ImageResult {
    url: String,
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        tracing::debug!("Requesting chat completion ({} chars of prompt)", prompt.len());

        let body = json!({
            "model": CHAT_MODEL,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt },
            ],
        });

        let response: ChatResponse = self
            .post("chat/completions", body)
            .await?
            .json()
            .await
            .context("Failed to decode chat completion response")?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .context("Chat completion response contained no choices")?;

        Ok(choice.message.content)
    }
}

#[async_trait]
impl ImageGenerator for OpenAiClient {
    async fn generate(&self, description: &str) -> Result<Vec<u8>> {
        tracing::debug!("Requesting image for: {}", description);

        let body = json!({
            "prompt": description,
            "n": 1,
            "size": IMAGE_SIZE,
        });

        let response: ImageResponse = self
            .post("images/generations", body)
            .await?
            .json()
            .await
            .context("Failed to decode image generation response")?;

        let image = response
            .data
            .into_iter()
            .next()
            .context("Image generation response contained no results")?;

        fetch_bytes(&self.http, &image.url).await
    }
}
