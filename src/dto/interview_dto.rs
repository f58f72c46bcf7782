use crate::models::interview::{EvaluationRequest, GenerationRequest};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StartInterviewPayload {
    #[serde(default, deserialize_with = "trim_string")]
    #[validate(length(min = 1, message = "topic is required"))]
    pub topic: String,
    #[serde(rename = "subTopic", default, deserialize_with = "trim_string")]
    #[validate(length(min = 1, message = "subTopic is required"))]
    pub sub_topic: String,
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl From<StartInterviewPayload> for GenerationRequest {
    fn from(payload: StartInterviewPayload) -> Self {
        GenerationRequest {
            topic: payload.topic,
            sub_topic: payload.sub_topic,
            difficulty: payload.difficulty,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluateAnswerPayload {
    #[serde(rename = "userAnswer", default)]
    pub user_answer: Option<String>,
    #[serde(rename = "idealAnswer", default)]
    pub ideal_answer: Option<String>,
}

impl From<EvaluateAnswerPayload> for EvaluationRequest {
    fn from(payload: EvaluateAnswerPayload) -> Self {
        EvaluationRequest {
            user_answer: payload.user_answer.unwrap_or_default(),
            ideal_answer: payload.ideal_answer.unwrap_or_default(),
        }
    }
}

fn trim_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.map(|s| s.trim().to_string()).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_topic_fails_validation() {
        let payload: StartInterviewPayload =
            serde_json::from_str(r#"{"topic":"   ","subTopic":"Closures"}"#).unwrap();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn missing_sub_topic_fails_validation() {
        let payload: StartInterviewPayload = serde_json::from_str(r#"{"topic":"Rust"}"#).unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("sub_topic"));
    }

    #[test]
    fn null_answers_become_empty_strings() {
        let payload: EvaluateAnswerPayload =
            serde_json::from_str(r#"{"userAnswer":null,"idealAnswer":"ref"}"#).unwrap();
        let req = EvaluationRequest::from(payload);
        assert_eq!(req.user_answer, "");
        assert_eq!(req.ideal_answer, "ref");
    }
}
