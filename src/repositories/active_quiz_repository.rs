use async_trait::async_trait;
use mongodb::{
    bson::doc,
    options::{IndexOptions, ReplaceOptions},
    Collection, IndexModel,
};

use crate::{db::Database, errors::AppResult, models::domain::ActiveQuizState};

#[async_trait]
pub trait ActiveQuizRepository: Send + Sync {
    /// Saves the active quiz for a user, overwriting any existing row.
    /// The unique index on `username` enforces at most one per user.
    async fn upsert(&self, state: ActiveQuizState) -> AppResult<()>;
    async fn find_by_username(&self, username: &str) -> AppResult<Option<ActiveQuizState>>;
    /// Returns whether a row was actually deleted, so a caller could use
    /// this as a compare-and-delete claim step.
    async fn delete_by_username(&self, username: &str) -> AppResult<bool>;
}

pub struct MongoActiveQuizRepository {
    collection: Collection<ActiveQuizState>,
}

impl MongoActiveQuizRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("active_quizzes");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let options = IndexOptions::builder()
            .unique(true)
            .name("username_unique".to_string())
            .build();
        let model = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(options)
            .build();

        self.collection.create_index(model).await?;
        log::info!("Created unique index on active_quizzes.username");

        Ok(())
    }
}

#[async_trait]
impl ActiveQuizRepository for MongoActiveQuizRepository {
    async fn upsert(&self, state: ActiveQuizState) -> AppResult<()> {
        let filter = doc! { "username": &state.username };
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(filter, &state)
            .with_options(options)
            .await?;

        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<ActiveQuizState>> {
        let state = self
            .collection
            .find_one(doc! { "username": username })
            .await?;
        Ok(state)
    }

    async fn delete_by_username(&self, username: &str) -> AppResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "username": username })
            .await?;
        Ok(result.deleted_count > 0)
    }
}
