use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::question::QuestionOption;

fn default_num_questions() -> usize {
    50
}

fn default_time_limit() -> i64 {
    30
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConfigureQuizRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    pub subject: Option<String>,
    #[serde(default = "default_num_questions")]
    #[validate(range(min = 1, max = 500))]
    pub num_questions: usize,
    #[serde(default = "default_time_limit")]
    #[validate(range(min = 1, max = 480))]
    pub time_limit: i64,
    #[serde(default)]
    pub shuffle_options: bool,
}

/// One submitted value: either a plain string or a full option object.
/// Clients that echo back image options post the `{type, content}` shape.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AnswerEntry {
    Text(String),
    Option(QuestionOption),
}

impl AnswerEntry {
    pub fn content(&self) -> &str {
        match self {
            AnswerEntry::Text(text) => text,
            AnswerEntry::Option(option) => &option.content,
        }
    }
}

/// The value submitted for one question: a single entry for single-select,
/// a list for multi-select.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Many(Vec<AnswerEntry>),
    One(AnswerEntry),
}

impl AnswerValue {
    pub fn entries(&self) -> Vec<&AnswerEntry> {
        match self {
            AnswerValue::Many(entries) => entries.iter().collect(),
            AnswerValue::One(entry) => vec![entry],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitQuizRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    pub subject: Option<String>,
    pub quiz_token: String,
    /// Keyed by 1-based question position, as a string.
    #[serde(default)]
    pub answers: HashMap<String, AnswerValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_value_accepts_string_list_and_option_object() {
        let single: AnswerValue = serde_json::from_str("\"Paris\"").unwrap();
        assert_eq!(single.entries()[0].content(), "Paris");

        let many: AnswerValue = serde_json::from_str("[\"A\", \"B\"]").unwrap();
        let contents: Vec<&str> = many.entries().iter().map(|e| e.content()).collect();
        assert_eq!(contents, vec!["A", "B"]);

        let object: AnswerValue =
            serde_json::from_str("{\"type\": \"image\", \"content\": \"/static/img/a.png\"}")
                .unwrap();
        assert_eq!(object.entries()[0].content(), "/static/img/a.png");
    }

    #[test]
    fn configure_request_applies_defaults() {
        let request: ConfigureQuizRequest =
            serde_json::from_str("{\"username\": \"alice\"}").unwrap();

        assert_eq!(request.num_questions, 50);
        assert_eq!(request.time_limit, 30);
        assert!(!request.shuffle_options);
        assert!(request.subject.is_none());
    }

    #[test]
    fn configure_request_rejects_zero_questions() {
        let request: ConfigureQuizRequest =
            serde_json::from_str("{\"username\": \"alice\", \"num_questions\": 0}").unwrap();

        assert!(request.validate().is_err());
    }
}
