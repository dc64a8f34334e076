//! Speech-to-text collaborator.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("speech-to-text is not configured")]
    Disabled,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("speech-to-text service returned status {0}")]
    Status(u16),
}

/// Turns recorded audio into text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: Vec<u8>, content_type: Option<&str>) -> Result<String, TranscribeError>;
}

/// Used when no speech-to-text service is configured.
pub struct DisabledTranscriber;

#[async_trait]
impl Transcriber for DisabledTranscriber {
    async fn transcribe(&self, _audio: Vec<u8>, _content_type: Option<&str>) -> Result<String, TranscribeError> {
        Err(TranscribeError::Disabled)
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Client for an HTTP speech-to-text service.
///
/// Posts the audio as multipart field `audio_file` and expects
/// `{"text": "..."}` back.
#[derive(Debug, Clone)]
pub struct HttpTranscriber {
    client: Client,
    url: String,
}

impl HttpTranscriber {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, TranscribeError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, audio: Vec<u8>, content_type: Option<&str>) -> Result<String, TranscribeError> {
        let size = audio.len();
        let mut part = Part::bytes(audio).file_name("attempt");
        if let Some(ct) = content_type {
            part = part.mime_str(ct)?;
        }

        let response = self
            .client
            .post(&self.url)
            .multipart(Form::new().part("audio_file", part))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TranscribeError::Status(response.status().as_u16()));
        }

        let body: TranscriptionResponse = response.json().await?;
        tracing::debug!(bytes = size, chars = body.text.len(), "Transcribed attempt audio");
        Ok(body.text)
    }
}
