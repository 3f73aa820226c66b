use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::question::QuestionRecord;
use crate::models::domain::quiz_result::QuestionResult;

/// Durable, append-only audit record of one completed quiz. Never mutated
/// or deleted.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TestHistoryRecord {
    pub username: String,
    pub subject_code: String,
    pub score: f64,
    pub time_taken: f64,
    pub questions: HistorySnapshot,
    pub completed_at: DateTime<Utc>,
}

/// Full snapshot of the graded quiz: the questions as presented, the raw
/// submitted answers, and the per-question breakdown.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct HistorySnapshot {
    pub questions: Vec<QuestionRecord>,
    pub answers: serde_json::Value,
    pub results: Vec<QuestionResult>,
}
