use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{fetch_bytes, SpeechSynthesizer};
use crate::catalog::VoiceCatalog;
use crate::Result;

const DEFAULT_BASE_URL: &str = "https://api.fakeyou.com";
const AUDIO_BASE_URL: &str = "https://storage.googleapis.com/vocodes-public";
const POLL_INTERVAL: Duration = Duration::from_secs(2);
const MAX_POLLS: usize = 90;

/// FakeYou text-to-speech client
///
/// Synthesis is a job-based API: enqueue an inference request, poll the job
/// until it reaches a terminal state, then download the rendered WAV.
#[derive(Clone)]
pub struct FakeYouClient {
    http: reqwest::Client,
    base_url: String,
}

impl FakeYouClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL (used to point at a stand-in server)
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Fetch the full voice catalog (speaker title to model token)
    pub async fn fetch_voice_catalog(&self) -> Result<VoiceCatalog> {
        let url = format!("{}/tts/list", self.base_url);
        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to fetch voice catalog: HTTP {}", response.status());
        }

        let list: VoiceListResponse = response
            .json()
            .await
            .context("Failed to decode voice catalog response")?;

        Ok(VoiceCatalog::from_entries(
            list.models
                .into_iter()
                .map(|model| (model.title, model.model_token)),
        ))
    }

    async fn enqueue(&self, text: &str, voice_id: &str) -> Result<String> {
        let url = format!("{}/tts/inference", self.base_url);
        let body = json!({
            "uuid_idempotency_token": Uuid::new_v4().to_string(),
            "tts_model_token": voice_id,
            "inference_text": text,
        });

        let response = self.http.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to enqueue TTS job: HTTP {}", response.status());
        }

        let enqueued: InferenceResponse = response
            .json()
            .await
            .context("Failed to decode TTS inference response")?;

        if !enqueued.success {
            anyhow::bail!("TTS backend rejected the inference request");
        }

        Ok(enqueued.inference_job_token)
    }

    async fn poll_job(&self, job_token: &str) -> Result<String> {
        let url = format!("{}/tts/job/{}", self.base_url, job_token);

        for _ in 0..MAX_POLLS {
            let response = self.http.get(&url).send().await?;

            if !response.status().is_success() {
                anyhow::bail!("Failed to poll TTS job: HTTP {}", response.status());
            }

            let job: JobResponse = response
                .json()
                .await
                .context("Failed to decode TTS job response")?;

            match job.state.status.as_str() {
                "complete_success" => {
                    return job
                        .state
                        .maybe_public_bucket_wav_audio_path
                        .context("TTS job completed without an audio path");
                }
                "complete_failure" | "dead" => {
                    anyhow::bail!("TTS job {} failed with status '{}'", job_token, job.state.status);
                }
                // pending, started, attempt_failed: keep waiting
                _ => tokio::time::sleep(POLL_INTERVAL).await,
            }
        }

        anyhow::bail!("TTS job {} did not complete in time", job_token)
    }
}

impl Default for FakeYouClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct VoiceListResponse {
    models: Vec<VoiceModel>,
}

#[derive(Debug, Deserialize)]
struct VoiceModel {
    model_token: String,
    title: String,
}

#[derive(Debug, Deserialize)]
struct InferenceResponse {
    success: bool,
    inference_job_token: String,
}

#[derive(Debug, Deserialize)]
struct JobResponse {
    state: JobState,
}

#[derive(Debug, Deserialize)]
struct JobState {
    status: String,
    maybe_public_bucket_wav_audio_path: Option<String>,
}

#[async_trait]
impl SpeechSynthesizer for FakeYouClient {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>> {
        tracing::debug!("Synthesizing speech with voice {}", voice_id);

        let job_token = self.enqueue(text, voice_id).await?;
        let audio_path = self.poll_job(&job_token).await?;
        let audio_url = format!("{}{}", AUDIO_BASE_URL, audio_path);

        fetch_bytes(&self.http, &audio_url).await
    }
}
