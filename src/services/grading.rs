use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{
            question::normalize_content,
            test_history::{HistorySnapshot, TestHistoryRecord},
            user_progress::apply_grading,
            QuestionResult, QuizDocument, ResultDocument, UserProgress,
        },
        dto::request::AnswerValue,
    },
    repositories::{ActiveQuizRepository, TestHistoryRepository, UserProgressRepository},
};

/// Sentinel recorded for a question the user left blank.
pub const NO_ANSWER: &str = "No answer";

pub struct GradingService {
    progress_repository: Arc<dyn UserProgressRepository>,
    history_repository: Arc<dyn TestHistoryRepository>,
    active_quiz_repository: Arc<dyn ActiveQuizRepository>,
}

impl GradingService {
    pub fn new(
        progress_repository: Arc<dyn UserProgressRepository>,
        history_repository: Arc<dyn TestHistoryRepository>,
        active_quiz_repository: Arc<dyn ActiveQuizRepository>,
    ) -> Self {
        Self {
            progress_repository,
            history_repository,
            active_quiz_repository,
        }
    }

    /// Grades a submitted quiz, persists progress and history, and clears
    /// the active quiz. Failures are logged and propagated; a failed grade
    /// is never a completed submission.
    pub async fn grade_quiz(
        &self,
        username: &str,
        quiz: &QuizDocument,
        submitted_answers: &HashMap<String, AnswerValue>,
    ) -> AppResult<ResultDocument> {
        match self.grade_inner(username, quiz, submitted_answers).await {
            Ok(results) => {
                log::info!(
                    "Quiz graded for user {}. Score: {:.1}/10",
                    username,
                    results.score
                );
                Ok(results)
            }
            Err(e) => {
                log::error!("Error grading quiz for {}: {}", username, e);
                Err(e)
            }
        }
    }

    async fn grade_inner(
        &self,
        username: &str,
        quiz: &QuizDocument,
        submitted_answers: &HashMap<String, AnswerValue>,
    ) -> AppResult<ResultDocument> {
        if quiz.num_questions == 0 {
            return Err(AppError::GradingFailure(
                "quiz document has no questions".to_string(),
            ));
        }

        let now = Utc::now();
        let time_taken = (now - quiz.start_time).num_milliseconds() as f64 / 1000.0;

        let (correct_count, question_results) = grade_questions(quiz, submitted_answers);

        // Reload rather than trust whatever the caller read earlier; the
        // mutation sequence must start from the stored state.
        let progress = self
            .progress_repository
            .find_by_username(username)
            .await?
            .unwrap_or_else(|| UserProgress::new(username));
        let updated = apply_grading(&progress, &question_results);
        self.progress_repository.upsert(&updated).await?;

        let score = round_score(correct_count as f64 / quiz.num_questions as f64 * 10.0);

        self.history_repository
            .insert(TestHistoryRecord {
                username: username.to_string(),
                subject_code: quiz.subject.code.clone(),
                score,
                time_taken,
                questions: HistorySnapshot {
                    questions: quiz.questions.clone(),
                    answers: serde_json::to_value(submitted_answers)
                        .map_err(|e| AppError::GradingFailure(e.to_string()))?,
                    results: question_results.clone(),
                },
                completed_at: now,
            })
            .await?;

        self.active_quiz_repository
            .delete_by_username(username)
            .await?;

        Ok(ResultDocument {
            score,
            correct_count,
            total_questions: quiz.num_questions,
            question_results,
            time_taken,
            subject: quiz.subject.clone(),
        })
    }

    pub async fn user_history(&self, username: &str) -> AppResult<Vec<TestHistoryRecord>> {
        self.history_repository.find_by_username(username).await
    }
}

/// Pure grading pass over the quiz in document order. Answers are keyed by
/// 1-based position strings; a missing or empty submission becomes the
/// "No answer" sentinel.
pub fn grade_questions(
    quiz: &QuizDocument,
    submitted_answers: &HashMap<String, AnswerValue>,
) -> (usize, Vec<QuestionResult>) {
    let mut correct_count = 0;
    let mut question_results = Vec::with_capacity(quiz.questions.len());

    for (i, question) in quiz.questions.iter().enumerate() {
        let key = (i + 1).to_string();

        let submitted: Vec<String> = match submitted_answers.get(&key) {
            Some(value) => {
                let entries = value.entries();
                if entries.is_empty() {
                    vec![NO_ANSWER.to_string()]
                } else {
                    entries
                        .iter()
                        .map(|entry| normalize_content(entry.content()).to_string())
                        .collect()
                }
            }
            None => vec![NO_ANSWER.to_string()],
        };
        let correct: Vec<String> = question
            .correct_answers
            .iter()
            .map(|answer| normalize_content(answer).to_string())
            .collect();

        let submitted_set: HashSet<&str> = submitted.iter().map(String::as_str).collect();
        let correct_set: HashSet<&str> = correct.iter().map(String::as_str).collect();
        let no_answer_set: HashSet<&str> = HashSet::from([NO_ANSWER]);

        let is_unanswered = submitted_set == no_answer_set;
        let is_correct = !is_unanswered && submitted_set == correct_set;
        if is_correct {
            correct_count += 1;
        }

        question_results.push(QuestionResult {
            question: question.text.clone(),
            submitted,
            correct,
            is_correct,
            is_unanswered,
        });
    }

    (correct_count, question_results)
}

/// 0–10 scale, one decimal place.
pub fn round_score(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dto::request::AnswerEntry;
    use crate::test_utils::fixtures;

    fn answers(pairs: &[(&str, Vec<&str>)]) -> HashMap<String, AnswerValue> {
        pairs
            .iter()
            .map(|(key, values)| {
                (
                    key.to_string(),
                    AnswerValue::Many(
                        values
                            .iter()
                            .map(|v| AnswerEntry::Text(v.to_string()))
                            .collect(),
                    ),
                )
            })
            .collect()
    }

    #[test]
    fn exact_answer_set_is_correct_in_any_order() {
        let quiz = fixtures::quiz_document(vec![fixtures::multi_select_question()]);

        let (correct, results) = grade_questions(&quiz, &answers(&[("1", vec!["D", "B"])]));

        assert_eq!(correct, 1);
        assert!(results[0].is_correct);
        assert!(!results[0].is_unanswered);
    }

    #[test]
    fn duplicate_submissions_collapse_before_comparison() {
        let quiz = fixtures::quiz_document(vec![fixtures::multi_select_question()]);

        let (correct, _) = grade_questions(&quiz, &answers(&[("1", vec!["B", "D", "B"])]));

        assert_eq!(correct, 1);
    }

    #[test]
    fn subset_and_superset_are_both_incorrect() {
        let quiz = fixtures::quiz_document(vec![
            fixtures::multi_select_question(),
            fixtures::multi_select_question(),
        ]);

        let (correct, results) = grade_questions(
            &quiz,
            &answers(&[("1", vec!["B"]), ("2", vec!["A", "B", "D"])]),
        );

        assert_eq!(correct, 0);
        assert!(!results[0].is_correct);
        assert!(!results[1].is_correct);
        assert!(!results[0].is_unanswered);
    }

    #[test]
    fn empty_submission_is_unanswered_not_correct() {
        let quiz = fixtures::quiz_document(vec![fixtures::multi_select_question()]);

        let (correct, results) = grade_questions(&quiz, &answers(&[("1", vec![])]));

        assert_eq!(correct, 0);
        assert!(results[0].is_unanswered);
        assert!(!results[0].is_correct);
        assert_eq!(results[0].submitted, vec![NO_ANSWER.to_string()]);
    }

    #[test]
    fn missing_submission_is_unanswered() {
        let quiz = fixtures::quiz_document(vec![fixtures::multi_select_question()]);

        let (_, results) = grade_questions(&quiz, &HashMap::new());

        assert!(results[0].is_unanswered);
    }

    #[test]
    fn leading_slash_differences_do_not_fail_an_image_answer() {
        let quiz = fixtures::quiz_document(vec![fixtures::image_question()]);

        let (correct, _) = grade_questions(&quiz, &answers(&[("1", vec!["/static/img/a.png"])]));

        assert_eq!(correct, 1);
    }

    #[test]
    fn option_objects_are_unwrapped_to_their_content() {
        let quiz = fixtures::quiz_document(vec![fixtures::image_question()]);
        let submitted = HashMap::from([(
            "1".to_string(),
            AnswerValue::Many(vec![AnswerEntry::Option(
                quiz.questions[0].options[0].clone(),
            )]),
        )]);

        let (correct, _) = grade_questions(&quiz, &submitted);

        assert_eq!(correct, 1);
    }

    #[test]
    fn score_is_on_a_ten_point_scale_with_one_decimal() {
        assert_eq!(round_score(7.0 / 20.0 * 10.0), 3.5);
        assert_eq!(round_score(20.0 / 20.0 * 10.0), 10.0);
        assert_eq!(round_score(1.0 / 3.0 * 10.0), 3.3);
        assert_eq!(round_score(0.0), 0.0);
    }
}
