pub mod active_quiz;
pub mod question;
pub mod quiz_result;
pub mod subject;
pub mod test_history;
pub mod user_progress;

pub use active_quiz::{ActiveQuizState, QuizDocument, SubjectInfo};
pub use question::{OptionKind, QuestionOption, QuestionRecord};
pub use quiz_result::{QuestionResult, QuizResultState, ResultDocument};
pub use subject::Subject;
pub use test_history::TestHistoryRecord;
pub use user_progress::UserProgress;
