use async_trait::async_trait;

pub mod fakeyou;
pub mod openai;

use crate::Result;

/// Trait for the generative text backend that scripts the presentation
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send a two-message chat request (system instructions + user prompt)
    /// and return the single textual response
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

/// Trait for the image generation backend
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate one fixed-resolution image for the description and return
    /// its raw bytes
    async fn generate(&self, description: &str) -> Result<Vec<u8>>;
}

/// Trait for the speech synthesis backend
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize speech audio for the text using the given voice identifier
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>>;
}

/// Download a URL as raw bytes, failing on non-success status codes
pub(crate) async fn fetch_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        anyhow::bail!("Failed to download {}: HTTP {}", url, response.status());
    }

    Ok(response.bytes().await?.to_vec())
}
