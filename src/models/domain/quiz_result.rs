use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::active_quiz::SubjectInfo;

/// How long a pending result stays retrievable.
pub const RESULT_TTL_MINUTES: i64 = 30;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionResult {
    pub question: String,
    pub submitted: Vec<String>,
    pub correct: Vec<String>,
    pub is_correct: bool,
    pub is_unanswered: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ResultDocument {
    pub score: f64,
    pub correct_count: usize,
    pub total_questions: usize,
    pub question_results: Vec<QuestionResult>,
    pub time_taken: f64,
    pub subject: SubjectInfo,
}

/// Ephemeral graded-result row, keyed by `(username, result_token)`.
/// A row past `expires_at` is logically gone even before it is physically
/// purged.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizResultState {
    pub username: String,
    pub result_token: String,
    pub results: ResultDocument,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl QuizResultState {
    pub fn new(username: &str, result_token: &str, results: ResultDocument) -> Self {
        let now = Utc::now();
        Self {
            username: username.to_string(),
            result_token: result_token.to_string(),
            results,
            created_at: now,
            expires_at: now + Duration::minutes(RESULT_TTL_MINUTES),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
