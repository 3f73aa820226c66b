use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{QuestionRecord, Subject},
    repositories::SubjectRepository,
    services::question_bank,
};

/// One subject's loaded question bank. Immutable after construction and
/// shared across requests, so the CSV is parsed once per subject rather
/// than per request.
#[derive(Debug)]
pub struct SubjectContext {
    pub subject: Subject,
    pub questions: Vec<QuestionRecord>,
}

pub struct SubjectService {
    repository: Arc<dyn SubjectRepository>,
    data_dir: PathBuf,
    contexts: RwLock<HashMap<String, Arc<SubjectContext>>>,
}

impl SubjectService {
    pub fn new(repository: Arc<dyn SubjectRepository>, data_dir: &str) -> Self {
        Self {
            repository,
            data_dir: PathBuf::from(data_dir),
            contexts: RwLock::new(HashMap::new()),
        }
    }

    pub async fn list_subjects(&self) -> AppResult<Vec<Subject>> {
        self.repository.find_all().await
    }

    /// Resolves a subject context. An unknown code is an error; a question
    /// file that fails to load degrades to an empty bank (no quiz possible
    /// for that subject, but the handler stays up).
    pub async fn context_for(&self, code: &str) -> AppResult<Arc<SubjectContext>> {
        if let Some(context) = self.contexts.read().await.get(code) {
            return Ok(context.clone());
        }

        let subject = self
            .repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::SubjectNotFound(code.to_string()))?;

        let path = self.data_dir.join(&subject.data_file);
        let questions = match question_bank::load_questions(&path) {
            Ok(questions) => questions,
            Err(e) => {
                log::error!("Failed to load questions for {}: {}", code, e);
                Vec::new()
            }
        };
        log::info!("Loaded {} questions for subject {}", questions.len(), code);

        let context = Arc::new(SubjectContext { subject, questions });
        self.contexts
            .write()
            .await
            .insert(code.to_string(), context.clone());
        Ok(context)
    }

    /// Seeds the catalog with a default subject when it is empty, so a
    /// fresh deployment has something to quiz on.
    pub async fn seed_default(&self, code: &str, name: &str, data_file: &str) -> AppResult<()> {
        if self.repository.find_all().await?.is_empty() {
            self.repository
                .insert(Subject::new(code, name, data_file))
                .await?;
            log::info!("Seeded default subject {}", code);
        }
        Ok(())
    }
}
