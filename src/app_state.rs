use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoActiveQuizRepository, MongoQuizResultRepository, MongoSubjectRepository,
        MongoTestHistoryRepository, MongoUserProgressRepository,
    },
    services::{
        grading::GradingService, quiz_session::QuizSessionService, results::ResultService,
        subjects::SubjectService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub subjects: Arc<SubjectService>,
    pub sessions: Arc<QuizSessionService>,
    pub grading: Arc<GradingService>,
    pub results: Arc<ResultService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let subject_repository = Arc::new(MongoSubjectRepository::new(&db));
        subject_repository.ensure_indexes().await?;

        let progress_repository = Arc::new(MongoUserProgressRepository::new(&db));
        progress_repository.ensure_indexes().await?;

        let active_quiz_repository = Arc::new(MongoActiveQuizRepository::new(&db));
        active_quiz_repository.ensure_indexes().await?;

        let result_repository = Arc::new(MongoQuizResultRepository::new(&db));
        result_repository.ensure_indexes().await?;

        let history_repository = Arc::new(MongoTestHistoryRepository::new(&db));
        history_repository.ensure_indexes().await?;

        let subjects = Arc::new(SubjectService::new(
            subject_repository.clone(),
            &config.data_dir,
        ));
        subjects
            .seed_default(
                &config.default_subject_code,
                "Artificial Intelligence",
                "quiz_data.csv",
            )
            .await?;

        let sessions = Arc::new(QuizSessionService::new(
            progress_repository.clone(),
            active_quiz_repository.clone(),
        ));
        let grading = Arc::new(GradingService::new(
            progress_repository,
            history_repository,
            active_quiz_repository,
        ));
        let results = Arc::new(ResultService::new(result_repository));

        Ok(Self {
            subjects,
            sessions,
            grading,
            results,
            config: Arc::new(config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
