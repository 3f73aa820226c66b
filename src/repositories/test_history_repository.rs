use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions},
    Collection, IndexModel,
};

use crate::{db::Database, errors::AppResult, models::domain::TestHistoryRecord};

/// Append-only store. There is deliberately no update or delete here: the
/// history is the audit trail.
#[async_trait]
pub trait TestHistoryRepository: Send + Sync {
    async fn insert(&self, record: TestHistoryRecord) -> AppResult<()>;
    /// Most recent first.
    async fn find_by_username(&self, username: &str) -> AppResult<Vec<TestHistoryRecord>>;
}

pub struct MongoTestHistoryRepository {
    collection: Collection<TestHistoryRecord>,
}

impl MongoTestHistoryRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("test_history");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let model = IndexModel::builder()
            .keys(doc! { "username": 1, "completed_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("user_completed".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(model).await?;
        log::info!("Created index on test_history (username, completed_at)");

        Ok(())
    }
}

#[async_trait]
impl TestHistoryRepository for MongoTestHistoryRepository {
    async fn insert(&self, record: TestHistoryRecord) -> AppResult<()> {
        self.collection.insert_one(&record).await?;
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Vec<TestHistoryRecord>> {
        let options = FindOptions::builder()
            .sort(doc! { "completed_at": -1 })
            .build();

        let cursor = self
            .collection
            .find(doc! { "username": username })
            .with_options(options)
            .await?;
        let records: Vec<TestHistoryRecord> = cursor.try_collect().await?;
        Ok(records)
    }
}
