//! Common test utilities for integration tests.
//!
//! Tests run against the in-memory store seeded with the built-in catalog.
//! External collaborators (speech-to-text, hints, audio) are replaced by
//! the fakes below so responses are deterministic.

pub mod fixtures;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;

use swiftspeak_backend::build_router;
use swiftspeak_backend::config::Config;
use swiftspeak_backend::models::Phrase;
use swiftspeak_backend::services::audio::{AudioCache, AudioError};
use swiftspeak_backend::services::hints::{HintError, HintGenerator};
use swiftspeak_backend::services::transcriber::{TranscribeError, Transcriber};
use swiftspeak_backend::AppState;

pub const CANNED_HINT: &str = "Stretch the vowels a little more.";

/// Transcriber that always "hears" the same text.
pub struct FixedTranscriber(pub String);

#[async_trait]
impl Transcriber for FixedTranscriber {
    async fn transcribe(&self, _audio: Vec<u8>, _content_type: Option<&str>) -> Result<String, TranscribeError> {
        Ok(self.0.clone())
    }
}

/// Hint generator with a fixed answer.
pub struct CannedHints;

#[async_trait]
impl HintGenerator for CannedHints {
    async fn hint(&self, _reference: &str, _answer: &str, _score: f64) -> Result<String, HintError> {
        Ok(CANNED_HINT.to_string())
    }
}

/// Audio cache that derives a URL from the phrase id.
pub struct FixedAudio;

#[async_trait]
impl AudioCache for FixedAudio {
    async fn audio_url(&self, phrase: &Phrase) -> Result<Option<String>, AudioError> {
        Ok(Some(fixtures::audio_url(&phrase.id)))
    }
}

/// Test context holding the application state and router.
pub struct TestContext {
    pub state: AppState,
    app: Router,
}

impl TestContext {
    /// In-memory state with canned hints and every other collaborator disabled.
    pub fn new() -> Self {
        let mut state = AppState::in_memory(Config::default());
        state.hints = Arc::new(CannedHints);
        Self::from_state(state)
    }

    /// Like `new`, but audio attempts are transcribed as `heard`.
    pub fn with_transcription(heard: &str) -> Self {
        let mut state = AppState::in_memory(Config::default());
        state.hints = Arc::new(CannedHints);
        state.transcriber = Arc::new(FixedTranscriber(heard.to_string()));
        Self::from_state(state)
    }

    /// Like `new`, with phrase audio URLs and a custom session size.
    pub fn with_audio(session_size: usize) -> Self {
        let config = Config {
            session_size,
            ..Config::default()
        };
        let mut state = AppState::in_memory(config);
        state.audio = Arc::new(FixedAudio);
        Self::from_state(state)
    }

    pub fn from_state(state: AppState) -> Self {
        let app = build_router(state.clone());
        Self { state, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }
}
