use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::QuizResultState};

#[async_trait]
pub trait QuizResultRepository: Send + Sync {
    async fn insert(&self, state: QuizResultState) -> AppResult<()>;
    async fn find_by_user_and_token(
        &self,
        username: &str,
        result_token: &str,
    ) -> AppResult<Option<QuizResultState>>;
    /// Idempotent: deleting an absent row is a no-op.
    async fn delete_by_user_and_token(&self, username: &str, result_token: &str)
        -> AppResult<()>;
}

pub struct MongoQuizResultRepository {
    collection: Collection<QuizResultState>,
}

impl MongoQuizResultRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quiz_results");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let token_index = IndexModel::builder()
            .keys(doc! { "result_token": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("result_token_unique".to_string())
                    .build(),
            )
            .build();

        let user_token_index = IndexModel::builder()
            .keys(doc! { "username": 1, "result_token": 1 })
            .options(
                IndexOptions::builder()
                    .name("user_token".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(token_index).await?;
        self.collection.create_index(user_token_index).await?;
        log::info!("Created indexes for quiz_results collection");

        Ok(())
    }
}

#[async_trait]
impl QuizResultRepository for MongoQuizResultRepository {
    async fn insert(&self, state: QuizResultState) -> AppResult<()> {
        self.collection.insert_one(&state).await?;
        Ok(())
    }

    async fn find_by_user_and_token(
        &self,
        username: &str,
        result_token: &str,
    ) -> AppResult<Option<QuizResultState>> {
        let state = self
            .collection
            .find_one(doc! { "username": username, "result_token": result_token })
            .await?;
        Ok(state)
    }

    async fn delete_by_user_and_token(
        &self,
        username: &str,
        result_token: &str,
    ) -> AppResult<()> {
        self.collection
            .delete_one(doc! { "username": username, "result_token": result_token })
            .await?;
        Ok(())
    }
}
