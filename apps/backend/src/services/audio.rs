//! Phrase audio: text-to-speech output cached in object storage.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use swiftspeak_core::Phrase;
use thiserror::Error;

use super::storage::{BlobStore, StorageError};

#[derive(Debug, Error)]
pub enum AudioError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("speech synthesis returned status {0}")]
    Status(u16),

    #[error("invalid audio payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// Resolves a playable URL for a phrase.
#[async_trait]
pub trait AudioCache: Send + Sync {
    async fn audio_url(&self, phrase: &Phrase) -> Result<Option<String>, AudioError>;
}

/// Used when no audio bucket is configured.
pub struct NoAudioCache;

#[async_trait]
impl AudioCache for NoAudioCache {
    async fn audio_url(&self, _phrase: &Phrase) -> Result<Option<String>, AudioError> {
        Ok(None)
    }
}

/// Produces MP3 audio for a phrase.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, phrase: &Phrase) -> Result<Vec<u8>, AudioError>;
}

/// Object key for a phrase's audio.
///
/// The digest covers voice and text, so editing either produces a new key
/// instead of serving stale audio.
pub fn cache_key(phrase: &Phrase) -> String {
    let mut hasher = Sha256::new();
    hasher.update(phrase.voice.as_bytes());
    hasher.update([0u8]);
    hasher.update(phrase.text_native.as_bytes());
    let digest = hasher.finalize();
    let short: String = digest.iter().take(8).map(|b| format!("{:02x}", b)).collect();

    format!("audio/{}-{}.mp3", phrase.id, short)
}

/// Audio cache backed by a blob store, synthesizing on miss.
pub struct BlobAudioCache {
    store: Arc<dyn BlobStore>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl BlobAudioCache {
    pub fn new(store: Arc<dyn BlobStore>, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self { store, synthesizer }
    }
}

#[async_trait]
impl AudioCache for BlobAudioCache {
    async fn audio_url(&self, phrase: &Phrase) -> Result<Option<String>, AudioError> {
        let key = cache_key(phrase);

        if self.store.file_exists(&key).await? {
            tracing::debug!("Audio cache HIT for {}", key);
            return Ok(Some(self.store.public_url(&key)));
        }

        tracing::info!("Audio cache MISS for {}, synthesizing", key);
        let audio = self.synthesizer.synthesize(phrase).await?;
        self.store
            .upload_file(&key, &audio, Some("audio/mpeg"))
            .await?;

        Ok(Some(self.store.public_url(&key)))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

/// Google Cloud Text-to-Speech REST client.
#[derive(Debug, Clone)]
pub struct GoogleTtsSynthesizer {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GoogleTtsSynthesizer {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, AudioError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: "https://texttospeech.googleapis.com/v1/text:synthesize".to_string(),
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsSynthesizer {
    async fn synthesize(&self, phrase: &Phrase) -> Result<Vec<u8>, AudioError> {
        let request = SynthesizeRequest {
            input: SynthesisInput {
                text: &phrase.text_native,
            },
            voice: VoiceSelection {
                language_code: phrase.lang.as_str(),
                name: &phrase.voice,
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AudioError::Status(response.status().as_u16()));
        }

        let body: SynthesizeResponse = response.json().await?;
        Ok(base64::engine::general_purpose::STANDARD.decode(body.audio_content)?)
    }
}
