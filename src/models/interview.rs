use serde::{Deserialize, Serialize};

pub const DEFAULT_DIFFICULTY: &str = "intermediate";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub topic: String,
    #[serde(rename = "subTopic")]
    pub sub_topic: String,
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl GenerationRequest {
    pub fn new(topic: impl Into<String>, sub_topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            sub_topic: sub_topic.into(),
            difficulty: None,
        }
    }

    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }

    pub fn difficulty_label(&self) -> &str {
        self.difficulty
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_DIFFICULTY)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question: String,
    pub ideal_answer: String,
}

impl QuestionResult {
    pub fn new(question: impl Into<String>, ideal_answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ideal_answer: ideal_answer.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationRequest {
    #[serde(rename = "userAnswer", default)]
    pub user_answer: String,
    #[serde(rename = "idealAnswer", default)]
    pub ideal_answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub feedback: String,
    pub score: u8,
    #[serde(rename = "idealAnswer")]
    pub ideal_answer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMethod {
    /// Inputs were empty or the reference answer was a sentinel.
    Rejected,
    Semantic,
    Keyword,
}

/// Score and feedback produced by one of the scoring strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub feedback: String,
    pub score: u8,
    pub method: ScoringMethod,
}

impl Assessment {
    pub fn into_result(self, ideal_answer: impl Into<String>) -> EvaluationResult {
        EvaluationResult {
            feedback: self.feedback,
            score: self.score,
            ideal_answer: ideal_answer.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_defaults_when_missing_or_blank() {
        let req = GenerationRequest::new("Rust", "Ownership");
        assert_eq!(req.difficulty_label(), DEFAULT_DIFFICULTY);

        let req = req.with_difficulty("  ");
        assert_eq!(req.difficulty_label(), DEFAULT_DIFFICULTY);

        let req = GenerationRequest::new("Rust", "Ownership").with_difficulty("hard");
        assert_eq!(req.difficulty_label(), "hard");
    }

    #[test]
    fn evaluation_result_uses_camel_case_ideal_answer() {
        let result = EvaluationResult {
            feedback: "ok".into(),
            score: 50,
            ideal_answer: "ref".into(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["idealAnswer"], "ref");
        assert_eq!(json["score"], 50);
    }

    #[test]
    fn evaluation_request_tolerates_missing_fields() {
        let req: EvaluationRequest = serde_json::from_str(r#"{"userAnswer":"x"}"#).unwrap();
        assert_eq!(req.user_answer, "x");
        assert!(req.ideal_answer.is_empty());
    }
}
