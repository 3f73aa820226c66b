pub mod grading;
pub mod question_bank;
pub mod quiz_session;
pub mod results;
pub mod subjects;
