use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::question::QuestionRecord;
use crate::models::domain::subject::Subject;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubjectInfo {
    pub code: String,
    pub name: String,
}

impl From<&Subject> for SubjectInfo {
    fn from(subject: &Subject) -> Self {
        Self {
            code: subject.code.clone(),
            name: subject.name.clone(),
        }
    }
}

/// The quiz a user is currently taking: an ordered question subset with a
/// start timestamp. `time_limit` (minutes) is advisory only; the server
/// never rejects a late submission based on it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizDocument {
    pub questions: Vec<QuestionRecord>,
    pub num_questions: usize,
    pub start_time: DateTime<Utc>,
    pub time_limit: i64,
    pub subject: SubjectInfo,
}

/// Ephemeral active-quiz row. At most one per user (unique index on
/// `username`); configuring a new quiz overwrites the old row.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ActiveQuizState {
    pub username: String,
    pub quiz_token: String,
    pub quiz: QuizDocument,
    pub created_at: DateTime<Utc>,
}

impl ActiveQuizState {
    pub fn new(username: &str, quiz_token: &str, quiz: QuizDocument) -> Self {
        Self {
            username: username.to_string(),
            quiz_token: quiz_token.to_string(),
            quiz,
            created_at: Utc::now(),
        }
    }
}
