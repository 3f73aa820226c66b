use std::sync::Arc;

use chrono::Utc;

use crate::{
    errors::AppResult,
    models::domain::{QuizResultState, ResultDocument},
    repositories::QuizResultRepository,
};

pub struct ResultService {
    repository: Arc<dyn QuizResultRepository>,
}

impl ResultService {
    pub fn new(repository: Arc<dyn QuizResultRepository>) -> Self {
        Self { repository }
    }

    pub async fn save_results(
        &self,
        username: &str,
        result_token: &str,
        results: ResultDocument,
    ) -> AppResult<()> {
        self.repository
            .insert(QuizResultState::new(username, result_token, results))
            .await
    }

    /// Expired rows present as never-existed: callers cannot tell the two
    /// apart, and physical deletion timing is irrelevant.
    pub async fn get_results(
        &self,
        username: &str,
        result_token: &str,
    ) -> AppResult<Option<ResultDocument>> {
        let state = self
            .repository
            .find_by_user_and_token(username, result_token)
            .await?;
        Ok(state
            .filter(|s| !s.is_expired(Utc::now()))
            .map(|s| s.results))
    }

    /// Idempotent: clearing an absent or expired result is a no-op.
    pub async fn clear_results(&self, username: &str, result_token: &str) -> AppResult<()> {
        self.repository
            .delete_by_user_and_token(username, result_token)
            .await
    }
}
