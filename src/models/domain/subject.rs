use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog entry for one question-bank context. Read-only from the quiz
/// engine's point of view; seeding is a bootstrap concern.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Subject {
    pub code: String,
    pub name: String,
    pub data_file: String,
    pub created_at: DateTime<Utc>,
}

impl Subject {
    pub fn new(code: &str, name: &str, data_file: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            data_file: data_file.to_string(),
            created_at: Utc::now(),
        }
    }
}
