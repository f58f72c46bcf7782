use crate::error::EngineError;
use crate::models::interview::QuestionResult;
use serde_json::Value as JsonValue;

pub const MISSING_QUESTION: &str = "Question could not be generated. Please try again.";
pub const MISSING_IDEAL_ANSWER: &str = "No ideal answer was provided for this question.";
pub const GENERIC_IDEAL_ANSWER: &str = "A strong answer explains the key concepts clearly, \
gives a concrete example, and discusses trade-offs or limitations.";

/// Span from the first `{` to the last `}` in `text`, if any.
///
/// Only the delimiters are inspected; whether the span decodes as JSON is
/// decided by the caller.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Turns raw model output into a question/answer pair.
///
/// * a decodable `{...}` span supplies `question` / `ideal_answer`, with
///   placeholders for missing or blank fields
/// * no `{...}` span: the trimmed text is the question and a generic ideal
///   answer is attached
/// * an undecodable span, or text that is blank, is a `MalformedResponse`
pub fn parse_generated(text: &str) -> Result<QuestionResult, EngineError> {
    match extract_json_object(text) {
        Some(span) => {
            let value: JsonValue = serde_json::from_str(span)
                .map_err(|e| EngineError::MalformedResponse(format!("undecodable JSON: {}", e)))?;
            if !value.is_object() {
                return Err(EngineError::MalformedResponse(
                    "JSON span is not an object".to_string(),
                ));
            }
            Ok(QuestionResult {
                question: string_field(&value, "question")
                    .unwrap_or_else(|| MISSING_QUESTION.to_string()),
                ideal_answer: string_field(&value, "ideal_answer")
                    .unwrap_or_else(|| MISSING_IDEAL_ANSWER.to_string()),
            })
        }
        None => {
            let raw = text.trim();
            if raw.is_empty() {
                return Err(EngineError::MalformedResponse("empty response".to_string()));
            }
            Ok(QuestionResult::new(raw, GENERIC_IDEAL_ANSWER))
        }
    }
}

fn string_field(value: &JsonValue, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_outermost_braces_inside_chatter() {
        let text = r#"Sure! {"question": "Q?", "ideal_answer": "A {nested}"} Hope it helps."#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"question": "Q?", "ideal_answer": "A {nested}"}"#)
        );
        assert_eq!(extract_json_object("no braces"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn structured_response_is_used_verbatim() {
        let parsed = parse_generated(
            "```json\n{\"question\": \"What is a trait object?\", \"ideal_answer\": \"A dyn pointer.\"}\n```",
        )
        .unwrap();
        assert_eq!(parsed.question, "What is a trait object?");
        assert_eq!(parsed.ideal_answer, "A dyn pointer.");
    }

    #[test]
    fn missing_fields_get_placeholders() {
        let parsed = parse_generated(r#"{"question": "Only a question?"}"#).unwrap();
        assert_eq!(parsed.question, "Only a question?");
        assert_eq!(parsed.ideal_answer, MISSING_IDEAL_ANSWER);

        let parsed = parse_generated(r#"{"ideal_answer": "  "}"#).unwrap();
        assert_eq!(parsed.question, MISSING_QUESTION);
        assert_eq!(parsed.ideal_answer, MISSING_IDEAL_ANSWER);
    }

    #[test]
    fn raw_text_becomes_the_question() {
        let parsed =
            parse_generated("  Sure! Here's a question: What is a hash table?\n").unwrap();
        assert_eq!(parsed.question, "Sure! Here's a question: What is a hash table?");
        assert_eq!(parsed.ideal_answer, GENERIC_IDEAL_ANSWER);
    }

    #[test]
    fn undecodable_or_empty_output_is_malformed() {
        assert!(matches!(
            parse_generated("{question: unquoted}"),
            Err(EngineError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_generated("   \n "),
            Err(EngineError::MalformedResponse(_))
        ));
    }
}
