//! SM-2 review scheduler.
//!
//! Based on SuperMemo 2: two fixed onboarding intervals, then geometric
//! growth by the item's ease. The ease update is
//! `EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02))`, which shrinks ease
//! for grades 2 and 3, leaves it unchanged at 4, and grows it only at 5.
//! Any grade below 2 demotes the item to a one-day relearning interval.
//! No interval exceeds `maximum_interval` (100 years by default).

use chrono::{DateTime, Duration, Utc};

use crate::error::Result;
use crate::types::{Grade, ReviewState, MINIMUM_EASE};

/// SM-2 scheduler with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub minimum_ease: f64,
    pub failure_penalty: f64,
    pub first_interval: u32,
    pub second_interval: u32,
    pub relearning_interval: u32,
    /// Upper bound on any interval, in days.
    pub maximum_interval: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            minimum_ease: MINIMUM_EASE,
            failure_penalty: 0.2,
            first_interval: 1,
            second_interval: 3,
            relearning_interval: 1,
            maximum_interval: 36500,
        }
    }
}

impl Sm2 {
    /// Apply one review event with a raw grade.
    ///
    /// Returns `InvalidGrade` for grades outside 0..=5.
    pub fn advance(&self, state: &ReviewState, grade: i64, now: DateTime<Utc>) -> Result<ReviewState> {
        let grade = Grade::new(grade)?;
        Ok(self.advance_graded(state, grade, now))
    }

    /// Apply one review event with an already validated grade.
    pub fn advance_graded(&self, state: &ReviewState, grade: Grade, now: DateTime<Utc>) -> ReviewState {
        let (interval_days, ease) = if grade.is_failure() {
            self.schedule_failure(state)
        } else {
            self.schedule_success(state, grade)
        };

        ReviewState {
            ease: round_ease(ease),
            interval_days,
            due_at: now + Duration::days(i64::from(interval_days)),
            last_reviewed: Some(now),
            ..state.clone()
        }
    }

    fn schedule_failure(&self, state: &ReviewState) -> (u32, f64) {
        let ease = (state.ease - self.failure_penalty).max(self.minimum_ease);
        (self.relearning_interval.min(self.maximum_interval), ease)
    }

    fn schedule_success(&self, state: &ReviewState, grade: Grade) -> (u32, f64) {
        let q = f64::from(Grade::MAX - grade.value());
        let ease = (state.ease + (0.1 - q * (0.08 + q * 0.02))).max(self.minimum_ease);

        // Growth uses the unrounded ease; ties round to even.
        let interval = match state.interval_days {
            0 => self.first_interval,
            1 => self.second_interval,
            n => (f64::from(n) * ease)
                .round_ties_even()
                .min(f64::from(self.maximum_interval)) as u32,
        };
        (interval.min(self.maximum_interval), ease)
    }
}

/// Advance `state` with the default SM-2 parameters.
pub fn advance(state: &ReviewState, grade: i64, now: DateTime<Utc>) -> Result<ReviewState> {
    Sm2::default().advance(state, grade, now)
}

fn round_ease(ease: f64) -> f64 {
    (ease * 100.0).round() / 100.0
}
