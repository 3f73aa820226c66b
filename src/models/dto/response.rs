use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::active_quiz::QuizDocument;
use crate::models::domain::test_history::TestHistoryRecord;

#[derive(Debug, Serialize)]
pub struct ConfigureQuizResponse {
    pub quiz_token: String,
    pub quiz: QuizDocument,
}

#[derive(Debug, Serialize)]
pub struct SubmitQuizResponse {
    pub result_token: String,
    pub score: f64,
    pub correct_count: usize,
    pub total_questions: usize,
}

#[derive(Debug, Serialize)]
pub struct HistorySummary {
    pub subject_code: String,
    pub score: f64,
    pub time_taken: f64,
    pub completed_at: DateTime<Utc>,
}

impl From<&TestHistoryRecord> for HistorySummary {
    fn from(record: &TestHistoryRecord) -> Self {
        Self {
            subject_code: record.subject_code.clone(),
            score: record.score,
            time_taken: record.time_taken,
            completed_at: record.completed_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserProgressResponse {
    pub username: String,
    pub question_bag_count: usize,
    pub penalty_count: usize,
    pub penalty_questions: std::collections::HashMap<String, u32>,
    pub has_active_quiz: bool,
    pub test_history: Vec<HistorySummary>,
}
