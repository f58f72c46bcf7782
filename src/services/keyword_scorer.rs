use crate::models::interview::{Assessment, ScoringMethod};
use crate::services::feedback::{keyword_feedback, rejected};
use std::collections::HashSet;

/// Lowercased word runs (letters, digits, underscore).
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Share of the ideal answer's words (duplicates counted) that also appear
/// in the user's answer, as a rounded percentage.
pub fn keyword_overlap_score(user_answer: &str, ideal_answer: &str) -> Option<u8> {
    let ideal = tokenize(ideal_answer);
    if ideal.is_empty() {
        return None;
    }
    let user: HashSet<String> = tokenize(user_answer).into_iter().collect();
    let matched = ideal.iter().filter(|w| user.contains(*w)).count();
    let score = (100.0 * matched as f64 / ideal.len() as f64).round();
    Some(score.clamp(0.0, 100.0) as u8)
}

/// Degraded-mode scorer used when the embedding model is unavailable.
pub fn fallback_evaluation(user_answer: &str, ideal_answer: &str) -> Assessment {
    match keyword_overlap_score(user_answer, ideal_answer) {
        Some(score) => Assessment {
            feedback: keyword_feedback(score),
            score,
            method: ScoringMethod::Keyword,
        },
        None => rejected(),
    }
}
