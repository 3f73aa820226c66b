use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::quiz_result::QuestionResult;

/// Per-user spaced-repetition state for a subject. Created lazily on first
/// reference and never deleted. `question_bag` is the rotation of
/// not-yet-attempted question texts; `penalty_questions` counts incorrect
/// attempts per question text and biases selection until correct answers
/// drain the counter.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserProgress {
    pub username: String,
    pub question_bag: Vec<String>,
    pub penalty_questions: HashMap<String, u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProgress {
    pub fn new(username: &str) -> Self {
        let now = Utc::now();
        Self {
            username: username.to_string(),
            question_bag: Vec::new(),
            penalty_questions: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refills the bag with every loaded question text that is not
    /// currently under penalty.
    pub fn refill_bag<'a>(&mut self, all_texts: impl Iterator<Item = &'a str>) {
        self.question_bag = all_texts
            .filter(|text| !self.penalty_questions.contains_key(*text))
            .map(|text| text.to_string())
            .collect();
        self.updated_at = Utc::now();
    }
}

/// Applies one graded quiz to a progress value and returns the updated
/// value; the caller persists it. A question leaves the bag once attempted,
/// correct or not. A correct answer drains its penalty counter (entry
/// removed at zero); an incorrect answer increments it, starting at 1.
pub fn apply_grading(progress: &UserProgress, results: &[QuestionResult]) -> UserProgress {
    let mut updated = progress.clone();

    for result in results {
        updated.question_bag.retain(|text| text != &result.question);

        if result.is_correct {
            if let Some(attempts) = updated.penalty_questions.get_mut(&result.question) {
                *attempts = attempts.saturating_sub(1);
                if *attempts == 0 {
                    updated.penalty_questions.remove(&result.question);
                }
            }
        } else {
            *updated
                .penalty_questions
                .entry(result.question.clone())
                .or_insert(0) += 1;
        }
    }

    updated.updated_at = Utc::now();
    updated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(question: &str, is_correct: bool) -> QuestionResult {
        QuestionResult {
            question: question.to_string(),
            submitted: vec!["A".to_string()],
            correct: vec!["A".to_string()],
            is_correct,
            is_unanswered: false,
        }
    }

    #[test]
    fn attempted_questions_leave_the_bag_whether_correct_or_not() {
        let mut progress = UserProgress::new("alice");
        progress.question_bag = vec!["q1".to_string(), "q2".to_string(), "q3".to_string()];

        let updated = apply_grading(&progress, &[result("q1", true), result("q2", false)]);

        assert_eq!(updated.question_bag, vec!["q3".to_string()]);
    }

    #[test]
    fn incorrect_answers_increment_penalties_from_one() {
        let progress = UserProgress::new("alice");

        let updated = apply_grading(&progress, &[result("q1", false)]);
        assert_eq!(updated.penalty_questions.get("q1"), Some(&1));

        let updated = apply_grading(&updated, &[result("q1", false)]);
        assert_eq!(updated.penalty_questions.get("q1"), Some(&2));
    }

    #[test]
    fn correct_answers_drain_penalties_and_remove_at_zero() {
        let mut progress = UserProgress::new("alice");
        progress.penalty_questions.insert("q1".to_string(), 2);

        let updated = apply_grading(&progress, &[result("q1", true)]);
        assert_eq!(updated.penalty_questions.get("q1"), Some(&1));

        let updated = apply_grading(&updated, &[result("q1", true)]);
        assert!(!updated.penalty_questions.contains_key("q1"));
    }

    #[test]
    fn correct_answer_without_penalty_entry_never_creates_a_negative_one() {
        let progress = UserProgress::new("alice");

        let updated = apply_grading(&progress, &[result("q1", true)]);

        assert!(updated.penalty_questions.is_empty());
    }

    #[test]
    fn refill_bag_excludes_penalized_questions() {
        let mut progress = UserProgress::new("alice");
        progress.penalty_questions.insert("q2".to_string(), 1);

        progress.refill_bag(["q1", "q2", "q3"].into_iter());

        assert_eq!(
            progress.question_bag,
            vec!["q1".to_string(), "q3".to_string()]
        );
    }
}
