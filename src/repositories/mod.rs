pub mod active_quiz_repository;
pub mod quiz_result_repository;
pub mod subject_repository;
pub mod test_history_repository;
pub mod user_progress_repository;

pub use active_quiz_repository::{ActiveQuizRepository, MongoActiveQuizRepository};
pub use quiz_result_repository::{MongoQuizResultRepository, QuizResultRepository};
pub use subject_repository::{MongoSubjectRepository, SubjectRepository};
pub use test_history_repository::{MongoTestHistoryRepository, TestHistoryRepository};
pub use user_progress_repository::{MongoUserProgressRepository, UserProgressRepository};
