use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};

use crate::{
    errors::AppResult,
    models::domain::{
        question::normalize_content, ActiveQuizState, QuestionRecord, QuizDocument, SubjectInfo,
        UserProgress,
    },
    repositories::{ActiveQuizRepository, UserProgressRepository},
    services::subjects::SubjectContext,
};

pub struct QuizSessionService {
    progress_repository: Arc<dyn UserProgressRepository>,
    active_quiz_repository: Arc<dyn ActiveQuizRepository>,
}

impl QuizSessionService {
    pub fn new(
        progress_repository: Arc<dyn UserProgressRepository>,
        active_quiz_repository: Arc<dyn ActiveQuizRepository>,
    ) -> Self {
        Self {
            progress_repository,
            active_quiz_repository,
        }
    }

    /// Lazy upsert: the first reference to a username creates its progress
    /// row.
    pub async fn get_or_create_progress(&self, username: &str) -> AppResult<UserProgress> {
        if let Some(progress) = self.progress_repository.find_by_username(username).await? {
            return Ok(progress);
        }
        self.progress_repository
            .insert(UserProgress::new(username))
            .await
    }

    /// Builds a quiz for a user: penalty questions first, then the bag
    /// rotation (refilled if exhausted), then the remaining bank. The only
    /// side effect on progress is persisting a bag refill.
    pub async fn initialize_quiz(
        &self,
        context: &SubjectContext,
        username: &str,
        requested_count: usize,
        shuffle_options: bool,
        time_limit: i64,
    ) -> AppResult<QuizDocument> {
        let mut progress = self.get_or_create_progress(username).await?;
        let mut rng = thread_rng();

        let (mut selected, bag_refilled) =
            select_questions(&context.questions, &mut progress, requested_count, &mut rng);
        if bag_refilled {
            self.progress_repository.upsert(&progress).await?;
        }

        if shuffle_options {
            for question in &mut selected {
                shuffle_question_options(question, &mut rng);
            }
        }

        log::info!(
            "Initialized quiz for {}: {} questions, {} under penalty",
            username,
            selected.len(),
            progress.penalty_questions.len()
        );

        Ok(QuizDocument {
            num_questions: selected.len(),
            questions: selected,
            start_time: Utc::now(),
            time_limit,
            subject: SubjectInfo::from(&context.subject),
        })
    }

    pub async fn save_quiz_state(
        &self,
        username: &str,
        quiz_token: &str,
        quiz: QuizDocument,
    ) -> AppResult<()> {
        self.active_quiz_repository
            .upsert(ActiveQuizState::new(username, quiz_token, quiz))
            .await
    }

    /// Returns the stored quiz only on an exact token match.
    pub async fn get_quiz_state(
        &self,
        username: &str,
        quiz_token: &str,
    ) -> AppResult<Option<QuizDocument>> {
        let state = self
            .active_quiz_repository
            .find_by_username(username)
            .await?;
        Ok(state
            .filter(|s| s.quiz_token == quiz_token)
            .map(|s| s.quiz))
    }

    /// Idempotent: clearing an absent quiz is a no-op.
    pub async fn clear_quiz_state(&self, username: &str) -> AppResult<()> {
        self.active_quiz_repository
            .delete_by_username(username)
            .await?;
        Ok(())
    }

    pub async fn active_quiz(&self, username: &str) -> AppResult<Option<ActiveQuizState>> {
        self.active_quiz_repository.find_by_username(username).await
    }
}

/// Tiered selection (strict-priority policy): penalty matches, then a
/// random sample of the bag, then a random sample of the untouched rest.
/// Mutates `progress` only to refill an empty bag; returns whether it did.
pub(crate) fn select_questions(
    all: &[QuestionRecord],
    progress: &mut UserProgress,
    requested_count: usize,
    rng: &mut impl Rng,
) -> (Vec<QuestionRecord>, bool) {
    let mut selected: Vec<QuestionRecord> = Vec::new();

    for text in progress.penalty_questions.keys() {
        if selected.len() >= requested_count {
            break;
        }
        if let Some(question) = all.iter().find(|q| &q.text == text) {
            if !selected.iter().any(|s| s.text == question.text) {
                selected.push(question.clone());
            }
        }
    }

    let mut bag_refilled = false;
    if selected.len() < requested_count {
        if progress.question_bag.is_empty() {
            progress.refill_bag(all.iter().map(|q| q.text.as_str()));
            bag_refilled = true;
        }

        let bag: Vec<&QuestionRecord> = all
            .iter()
            .filter(|q| progress.question_bag.contains(&q.text))
            .filter(|q| !selected.iter().any(|s| s.text == q.text))
            .collect();
        let need = requested_count - selected.len();
        for question in bag.choose_multiple(rng, need.min(bag.len())) {
            selected.push((*question).clone());
        }
    }

    if selected.len() < requested_count {
        let available: Vec<&QuestionRecord> = all
            .iter()
            .filter(|q| !progress.penalty_questions.contains_key(&q.text))
            .filter(|q| !selected.iter().any(|s| s.text == q.text))
            .collect();
        let need = requested_count - selected.len();
        for question in available.choose_multiple(rng, need.min(available.len())) {
            selected.push((*question).clone());
        }
    }

    selected.truncate(requested_count);
    (selected, bag_refilled)
}

/// Permutes options and their correctness labels together (one shuffle of
/// paired values, not two independent ones), then rebuilds the displayed
/// correct-answer order. Correct answers with no matching option are kept.
pub(crate) fn shuffle_question_options(question: &mut QuestionRecord, rng: &mut impl Rng) {
    let correct: HashSet<String> = question
        .correct_answers
        .iter()
        .map(|a| normalize_content(a).to_string())
        .collect();

    let mut paired: Vec<(crate::models::domain::QuestionOption, bool)> = question
        .options
        .drain(..)
        .map(|option| {
            let is_correct = correct.contains(normalize_content(&option.content));
            (option, is_correct)
        })
        .collect();
    paired.shuffle(rng);

    let mut new_correct: Vec<String> = paired
        .iter()
        .filter(|(_, is_correct)| *is_correct)
        .map(|(option, _)| option.content.clone())
        .collect();
    for answer in &question.correct_answers {
        let matches_option = paired
            .iter()
            .any(|(option, _)| normalize_content(&option.content) == normalize_content(answer));
        if !matches_option {
            new_correct.push(answer.clone());
        }
    }

    question.options = paired.into_iter().map(|(option, _)| option).collect();
    question.correct_answers = new_correct;
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::test_utils::fixtures;

    #[test]
    fn selection_returns_exactly_the_requested_count_without_duplicates() {
        let bank = fixtures::question_bank(10);
        let mut progress = UserProgress::new("alice");
        let mut rng = StdRng::seed_from_u64(7);

        let (selected, _) = select_questions(&bank, &mut progress, 6, &mut rng);

        assert_eq!(selected.len(), 6);
        let texts: HashSet<&str> = selected.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts.len(), 6);
    }

    #[test]
    fn selection_caps_at_the_distinct_question_count() {
        let bank = fixtures::question_bank(4);
        let mut progress = UserProgress::new("alice");
        let mut rng = StdRng::seed_from_u64(7);

        let (selected, _) = select_questions(&bank, &mut progress, 50, &mut rng);

        assert_eq!(selected.len(), 4);
    }

    #[test]
    fn penalty_questions_come_before_fresh_ones() {
        let bank = fixtures::question_bank(10);
        let mut progress = UserProgress::new("alice");
        progress.penalty_questions.insert(bank[3].text.clone(), 2);
        progress.penalty_questions.insert(bank[8].text.clone(), 1);
        let mut rng = StdRng::seed_from_u64(7);

        let (selected, _) = select_questions(&bank, &mut progress, 5, &mut rng);

        assert_eq!(selected.len(), 5);
        let first_two: HashSet<&str> = selected[..2].iter().map(|q| q.text.as_str()).collect();
        assert!(first_two.contains(bank[3].text.as_str()));
        assert!(first_two.contains(bank[8].text.as_str()));
    }

    #[test]
    fn empty_bag_is_refilled_without_penalized_questions() {
        let bank = fixtures::question_bank(5);
        let mut progress = UserProgress::new("alice");
        progress.penalty_questions.insert(bank[0].text.clone(), 1);
        let mut rng = StdRng::seed_from_u64(7);

        let (_, bag_refilled) = select_questions(&bank, &mut progress, 3, &mut rng);

        assert!(bag_refilled);
        assert_eq!(progress.question_bag.len(), 4);
        assert!(!progress.question_bag.contains(&bank[0].text));
    }

    #[test]
    fn non_empty_bag_is_left_alone() {
        let bank = fixtures::question_bank(5);
        let mut progress = UserProgress::new("alice");
        progress.question_bag = vec![bank[1].text.clone(), bank[2].text.clone()];
        let mut rng = StdRng::seed_from_u64(7);

        let (selected, bag_refilled) = select_questions(&bank, &mut progress, 5, &mut rng);

        assert!(!bag_refilled);
        assert_eq!(selected.len(), 5);
    }

    #[test]
    fn option_shuffle_moves_correctness_labels_with_their_options() {
        let mut question = fixtures::multi_select_question();
        let before: HashSet<String> = question
            .correct_answers
            .iter()
            .map(|a| normalize_content(a).to_string())
            .collect();
        let option_count = question.options.len();
        let mut rng = StdRng::seed_from_u64(42);

        shuffle_question_options(&mut question, &mut rng);

        let after: HashSet<String> = question
            .correct_answers
            .iter()
            .map(|a| normalize_content(a).to_string())
            .collect();
        assert_eq!(before, after);
        assert_eq!(question.options.len(), option_count);
    }
}
