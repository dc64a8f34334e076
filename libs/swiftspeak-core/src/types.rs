//! Core record types shared by the scorer, the scheduler, and the stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Ease assigned to an item on its first attempt.
pub const INITIAL_EASE: f64 = 2.5;

/// Ease never drops below this floor.
pub const MINIMUM_EASE: f64 = 1.3;

/// Supported practice languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Yo,
    Ig,
    Ha,
}

impl Lang {
    /// Get the language code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Yo => "yo",
            Self::Ig => "ig",
            Self::Ha => "ha",
        }
    }

    /// Parse from a language code.
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Self::En),
            "yo" => Some(Self::Yo),
            "ig" => Some(Self::Ig),
            "ha" => Some(Self::Ha),
            _ => None,
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recall quality for one review event, 0 (blackout) to 5 (perfect).
///
/// Anything below 2 counts as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Grade(u8);

impl Grade {
    pub const MAX: u8 = 5;

    /// Grade produced by a passing attempt.
    pub const PASS: Grade = Grade(4);

    /// Grade produced by a low-but-passing attempt.
    pub const WEAK: Grade = Grade(2);

    /// Validate a raw grade.
    pub fn new(value: i64) -> Result<Self> {
        if (0..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(CoreError::InvalidGrade { grade: value })
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_failure(self) -> bool {
        self.0 < 2
    }
}

impl TryFrom<i64> for Grade {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.0
    }
}

/// Reference phrase from the content catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phrase {
    pub id: String,
    pub lang: Lang,
    pub topic: String,
    /// The canonical utterance learners are scored against.
    pub text_native: String,
    pub gloss_en: String,
    /// Synthesis voice identifier.
    pub voice: String,
}

impl Phrase {
    /// Reject records the scorer could not work with.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(CoreError::malformed("phrase", "empty id"));
        }
        if self.text_native.trim().is_empty() {
            return Err(CoreError::malformed(
                "phrase",
                format!("{} has no text_native", self.id),
            ));
        }
        Ok(())
    }
}

/// Scheduling state of one item for one learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
    #[serde(alias = "ef")]
    pub ease: f64,
    pub interval_days: u32,
    pub due_at: DateTime<Utc>,
    pub lang: Lang,
    #[serde(rename = "text_native")]
    pub text_native: String,
    #[serde(rename = "gloss_en")]
    pub gloss_en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
}

impl ReviewState {
    /// State created lazily on a learner's first attempt at `phrase`.
    pub fn new_for(phrase: &Phrase, now: DateTime<Utc>) -> Self {
        Self {
            ease: INITIAL_EASE,
            interval_days: 0,
            due_at: now,
            lang: phrase.lang,
            text_native: phrase.text_native.clone(),
            gloss_en: phrase.gloss_en.clone(),
            last_reviewed: None,
        }
    }

    /// Check the ease floor.
    pub fn validate(&self) -> Result<()> {
        if !self.ease.is_finite() || self.ease < MINIMUM_EASE {
            return Err(CoreError::malformed(
                "review state",
                format!("ease {} below floor {}", self.ease, MINIMUM_EASE),
            ));
        }
        Ok(())
    }
}
