//! Attempt scoring: compares a learner's answer to the reference phrase.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::types::Grade;

/// Scores strictly above this pass with [`Grade::PASS`].
pub const PASS_THRESHOLD: f64 = 0.8;

/// Outcome of scoring one attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Similarity between 0.0 and 1.0.
    pub score: f64,
    /// Coarse grade fed to the scheduler.
    pub grade: Grade,
    /// Normalized reference (for hints and display).
    pub reference_normalized: String,
    /// Normalized answer, echoed back as the transcription.
    pub candidate_normalized: String,
}

/// Case-fold and trim surrounding whitespace.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Score `candidate` against `reference` after normalizing both.
pub fn score(reference: &str, candidate: &str) -> Result<f64> {
    let reference = normalize(reference);
    if reference.is_empty() {
        return Err(CoreError::InvalidReference);
    }
    Ok(similarity(&reference, &normalize(candidate)))
}

/// Map a continuous score onto the scheduler's grade scale.
///
/// Only two grades come out of this path: 4 above the threshold, 2 otherwise.
pub fn pass_grade(score: f64) -> Grade {
    if score > PASS_THRESHOLD {
        Grade::PASS
    } else {
        Grade::WEAK
    }
}

/// Score an attempt and derive its grade.
pub fn evaluate(reference: &str, candidate: &str) -> Result<ScoreResult> {
    let reference_normalized = normalize(reference);
    if reference_normalized.is_empty() {
        return Err(CoreError::InvalidReference);
    }
    let candidate_normalized = normalize(candidate);
    let score = similarity(&reference_normalized, &candidate_normalized);

    Ok(ScoreResult {
        score,
        grade: pass_grade(score),
        reference_normalized,
        candidate_normalized,
    })
}

/// Number of single-character insertions and deletions turning `a` into `b`.
pub fn indel_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    a_chars.len() + b_chars.len() - 2 * lcs_len(&a_chars, &b_chars)
}

/// Normalized similarity (0.0 to 1.0) based on InDel distance.
///
/// Lengths are counted in chars so combining diacritics weigh the same as
/// any other character.
pub fn similarity(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 1.0;
    }

    let distance = indel_distance(a, b);
    1.0 - (distance as f64 / total as f64)
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    // Rows are sized by the shorter input.
    let (a, b) = if a.len() < b.len() { (b, a) } else { (a, b) };
    if b.is_empty() {
        return 0;
    }

    // Two rows instead of the full table
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = 0;

        for j in 1..=b.len() {
            curr[j] = if a[i - 1] == b[j - 1] {
                prev[j - 1] + 1
            } else {
                prev[j].max(curr[j - 1])
            };
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_indel_distance() {
        assert_eq!(indel_distance("", ""), 0);
        assert_eq!(indel_distance("abc", "abc"), 0);
        assert_eq!(indel_distance("abc", ""), 3);
        assert_eq!(indel_distance("", "abc"), 3);
        // substitution costs a delete plus an insert
        assert_eq!(indel_distance("cat", "cut"), 2);
        assert_eq!(indel_distance("kitten", "sitting"), 5);
    }

    #[test]
    fn long_candidate_is_scored_against_short_reference() {
        let long = "a".repeat(100_000);
        assert_eq!(lcs_len(&['a', 'b'], &long.chars().collect::<Vec<_>>()), 1);

        let forward = similarity("how are you", &long);
        let backward = similarity(&long, "how are you");
        assert_eq!(forward, backward);
        assert!((forward - 2.0 / 100_011.0).abs() < 1e-12);
    }

    #[test]
    fn test_similarity() {
        assert_eq!(similarity("abc", "abc"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert!((similarity("helo", "hello") - 8.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn identical_answers_score_one() {
        for phrase in ["How are you today?", "Ẹ káàrọ̀", "Ụtụtụ ọma", "a", "Nagode"] {
            assert_eq!(score(phrase, phrase).unwrap(), 1.0);
        }
    }

    #[test]
    fn score_is_symmetric() {
        let pairs = [
            ("Where is the airport?", "where is airport"),
            ("Báwo ni?", "bawo ni"),
            ("I need a taxi", "I need taxis now"),
            ("x", ""),
        ];
        for (a, b) in pairs {
            assert_eq!(score(a, b).unwrap(), score(b, a).unwrap());
        }
    }

    #[test]
    fn score_ignores_case_and_surrounding_whitespace() {
        assert_eq!(score("Nice to meet you", "  NICE TO MEET YOU \n").unwrap(), 1.0);
    }

    #[test]
    fn internal_whitespace_still_counts() {
        assert!(score("the check, please", "the  check, please").unwrap() < 1.0);
    }

    #[test]
    fn diacritics_are_counted_per_char() {
        // one combining mark missing out of 8 + 7 chars
        let s = similarity("ẹ káàrọ̀", "ẹ káàrọ");
        assert!(s > 0.9 && s < 1.0);
    }

    #[test]
    fn empty_reference_is_rejected() {
        assert_eq!(score("", "anything"), Err(CoreError::InvalidReference));
        assert_eq!(score("   ", "anything"), Err(CoreError::InvalidReference));
        assert!(evaluate("\t", "x").is_err());
    }

    #[test]
    fn empty_answer_scores_zero() {
        assert_eq!(score("Kedu?", "").unwrap(), 0.0);
    }

    #[test]
    fn threshold_is_exclusive() {
        assert_eq!(pass_grade(0.81), Grade::PASS);
        assert_eq!(pass_grade(0.80), Grade::WEAK);
        assert_eq!(pass_grade(1.0).value(), 4);
        assert_eq!(pass_grade(0.0).value(), 2);
    }

    #[test]
    fn evaluate_bundles_grade_and_normalized_text() {
        let result = evaluate("I have a headache", " i have a headache ").unwrap();
        assert_eq!(result.score, 1.0);
        assert_eq!(result.grade, Grade::PASS);
        assert_eq!(result.candidate_normalized, "i have a headache");
        assert_eq!(result.reference_normalized, "i have a headache");

        let result = evaluate("I have a headache", "hello").unwrap();
        assert_eq!(result.grade, Grade::WEAK);
    }
}
