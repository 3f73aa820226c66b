#[cfg(test)]
pub mod fixtures {
    use chrono::Utc;

    use crate::models::domain::{
        OptionKind, QuestionOption, QuestionRecord, QuizDocument, SubjectInfo,
    };

    pub fn text_option(content: &str) -> QuestionOption {
        QuestionOption {
            kind: OptionKind::Text,
            content: content.to_string(),
        }
    }

    /// A bank of `count` distinct four-option questions.
    pub fn question_bank(count: usize) -> Vec<QuestionRecord> {
        (0..count)
            .map(|i| QuestionRecord {
                text: format!("Question {}", i),
                image_url: None,
                options: vec![
                    text_option("A"),
                    text_option("B"),
                    text_option("C"),
                    text_option("D"),
                ],
                correct_answers: vec!["A".to_string()],
                option_count: 4,
                has_image_options: false,
            })
            .collect()
    }

    /// A multi-select question whose correct set is {B, D}.
    pub fn multi_select_question() -> QuestionRecord {
        QuestionRecord {
            text: "Which of these are regularizers?".to_string(),
            image_url: None,
            options: vec![
                text_option("A"),
                text_option("B"),
                text_option("C"),
                text_option("D"),
            ],
            correct_answers: vec!["B".to_string(), "D".to_string()],
            option_count: 4,
            has_image_options: false,
        }
    }

    /// An image question whose stored correct answer has no leading slash
    /// while its option content does.
    pub fn image_question() -> QuestionRecord {
        QuestionRecord {
            text: "Which plot shows overfitting?".to_string(),
            image_url: None,
            options: vec![
                QuestionOption {
                    kind: OptionKind::Image,
                    content: "/static/img/a.png".to_string(),
                },
                QuestionOption {
                    kind: OptionKind::Image,
                    content: "/static/img/b.png".to_string(),
                },
            ],
            correct_answers: vec!["static/img/a.png".to_string()],
            option_count: 2,
            has_image_options: true,
        }
    }

    pub fn quiz_document(questions: Vec<QuestionRecord>) -> QuizDocument {
        QuizDocument {
            num_questions: questions.len(),
            questions,
            start_time: Utc::now(),
            time_limit: 30,
            subject: SubjectInfo {
                code: "AIL303m".to_string(),
                name: "Artificial Intelligence".to_string(),
            },
        }
    }
}
