//! AI-generated pronunciation hints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::fallback::with_fallback;

/// Scores above this skip the generator entirely.
pub const PERFECT_SCORE: f64 = 0.95;

pub const PERFECT_HINT: &str = "Perfect!";
pub const DISABLED_HINT: &str = "Check your spelling or pronunciation.";
pub const FALLBACK_HINT: &str = "Keep practicing!";

#[derive(Debug, Error)]
pub enum HintError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("hint service returned status {0}")]
    Status(u16),

    #[error("hint service returned no text")]
    EmptyResponse,
}

/// Produces a one-sentence hint for an attempt.
#[async_trait]
pub trait HintGenerator: Send + Sync {
    async fn hint(&self, reference: &str, answer: &str, score: f64) -> Result<String, HintError>;
}

/// Used when no hint service is configured.
pub struct StaticHintGenerator;

#[async_trait]
impl HintGenerator for StaticHintGenerator {
    async fn hint(&self, _reference: &str, _answer: &str, _score: f64) -> Result<String, HintError> {
        Ok(DISABLED_HINT.to_string())
    }
}

/// Hint for an attempt, never failing.
///
/// Near-perfect scores get a fixed compliment; generator errors and
/// timeouts fall back to a generic encouragement.
pub async fn hint_for(
    generator: &dyn HintGenerator,
    reference: &str,
    answer: &str,
    score: f64,
    timeout: Duration,
) -> String {
    // Checked before the generator, so disabled hints still praise a perfect answer.
    if score > PERFECT_SCORE {
        return PERFECT_HINT.to_string();
    }

    with_fallback(
        "hints",
        timeout,
        generator.hint(reference, answer, score),
        FALLBACK_HINT.to_string(),
    )
    .await
}

/// Prompt sent to the language model.
pub fn build_prompt(reference: &str, answer: &str, score: f64) -> String {
    format!(
        "The user was trying to say this phrase: \"{}\"\n\
         They actually said: \"{}\"\n\
         Their score was {}/100.\n\
         Please provide a very short, one-sentence hint. Be encouraging.",
        reference,
        answer,
        (score * 100.0) as u32
    )
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

impl GeminiResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

/// Gemini `generateContent` client.
#[derive(Debug, Clone)]
pub struct GeminiHintGenerator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiHintGenerator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self, HintError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
        })
    }
}

#[async_trait]
impl HintGenerator for GeminiHintGenerator {
    async fn hint(&self, reference: &str, answer: &str, score: f64) -> Result<String, HintError> {
        let url = format!("{}/{}:generateContent", self.base_url, self.model);
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: build_prompt(reference, answer, score),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(HintError::Status(response.status().as_u16()));
        }

        let body: GeminiResponse = response.json().await?;
        body.first_text().ok_or(HintError::EmptyResponse)
    }
}
