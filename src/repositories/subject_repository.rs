use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Subject};

#[async_trait]
pub trait SubjectRepository: Send + Sync {
    async fn find_by_code(&self, code: &str) -> AppResult<Option<Subject>>;
    async fn find_all(&self) -> AppResult<Vec<Subject>>;
    async fn insert(&self, subject: Subject) -> AppResult<Subject>;
}

pub struct MongoSubjectRepository {
    collection: Collection<Subject>,
}

impl MongoSubjectRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("subjects");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let options = IndexOptions::builder()
            .unique(true)
            .name("code_unique".to_string())
            .build();
        let model = IndexModel::builder()
            .keys(doc! { "code": 1 })
            .options(options)
            .build();

        self.collection.create_index(model).await?;
        log::info!("Created unique index on subjects.code");

        Ok(())
    }
}

#[async_trait]
impl SubjectRepository for MongoSubjectRepository {
    async fn find_by_code(&self, code: &str) -> AppResult<Option<Subject>> {
        let subject = self.collection.find_one(doc! { "code": code }).await?;
        Ok(subject)
    }

    async fn find_all(&self) -> AppResult<Vec<Subject>> {
        let cursor = self.collection.find(doc! {}).await?;
        let subjects: Vec<Subject> = cursor.try_collect().await?;
        Ok(subjects)
    }

    async fn insert(&self, subject: Subject) -> AppResult<Subject> {
        self.collection.insert_one(&subject).await?;
        Ok(subject)
    }
}
