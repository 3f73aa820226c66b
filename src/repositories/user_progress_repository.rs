use async_trait::async_trait;
use mongodb::{
    bson::doc,
    options::{IndexOptions, ReplaceOptions},
    Collection, IndexModel,
};

use crate::{db::Database, errors::AppResult, models::domain::UserProgress};

#[async_trait]
pub trait UserProgressRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserProgress>>;
    async fn insert(&self, progress: UserProgress) -> AppResult<UserProgress>;
    /// Replace-or-insert by username. Progress rows are never deleted, so
    /// upsert keeps the lazy-creation path and the write-back path on one
    /// code path.
    async fn upsert(&self, progress: &UserProgress) -> AppResult<()>;
}

pub struct MongoUserProgressRepository {
    collection: Collection<UserProgress>,
}

impl MongoUserProgressRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("users");
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
        log::info!("Created unique index on users.username");

        Ok(())
    }
}

#[async_trait]
impl UserProgressRepository for MongoUserProgressRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserProgress>> {
        let progress = self
            .collection
            .find_one(doc! { "username": username })
            .await?;
        Ok(progress)
    }

    async fn insert(&self, progress: UserProgress) -> AppResult<UserProgress> {
        self.collection.insert_one(&progress).await?;
        Ok(progress)
    }

    async fn upsert(&self, progress: &UserProgress) -> AppResult<()> {
        let filter = doc! { "username": &progress.username };
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(filter, progress)
            .with_options(options)
            .await?;

        Ok(())
    }
}
