use serde::{Deserialize, Serialize};

/// Root under which question-bank image assets live. Options or question
/// text pointing below this root are rendered as images, not text.
pub const IMAGE_ROOT: &str = "static/img/";

const IMAGE_EXTENSIONS: [&str; 4] = [".png", ".jpg", ".jpeg", ".gif"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Text,
    Image,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionOption {
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub content: String,
}

/// A single loaded question. Identity is the raw `text` field: two rows
/// with the same text are indistinguishable everywhere downstream (bag,
/// penalties, selection).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionRecord {
    pub text: String,
    pub image_url: Option<String>,
    pub options: Vec<QuestionOption>,
    pub correct_answers: Vec<String>,
    pub option_count: usize,
    pub has_image_options: bool,
}

/// Strips leading path separators so `/static/img/x.png` and
/// `static/img/x.png` compare equal during grading.
pub fn normalize_content(value: &str) -> &str {
    value.trim_start_matches('/')
}

pub fn is_image_path(value: &str) -> bool {
    let lower = value.to_lowercase();
    value.starts_with(IMAGE_ROOT) && IMAGE_EXTENSIONS.iter().any(|ext| lower.contains(ext))
}
