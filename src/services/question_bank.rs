//! Question-bank ingestion: a three-column CSV (question, choices, answer)
//! where the choices and answer fields carry a bracketed list-like syntax
//! with inconsistent quoting. Parsing is two-phase: a strict list-literal
//! parse first, then a bracket/quote-aware scanner that tolerates the
//! malformed rows real exports contain.

use std::collections::HashMap;
use std::path::Path;

use crate::errors::{AppError, AppResult};
use crate::models::domain::question::{self, OptionKind, QuestionOption, QuestionRecord};

const IMAGE_MARKER: &str = "[Image:";

/// Outcome of parsing one list-like field, tagged by which phase produced
/// it so tests can target each branch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldParse {
    /// Strict structural parse (or a bare unbracketed value, which is a
    /// one-element list by definition).
    Parsed(Vec<String>),
    /// The lenient scanner had to take over.
    Fallback(Vec<String>),
    /// Nothing usable in the field.
    Failed,
}

impl FieldParse {
    pub fn into_items(self) -> Vec<String> {
        match self {
            FieldParse::Parsed(items) | FieldParse::Fallback(items) => items,
            FieldParse::Failed => Vec::new(),
        }
    }
}

pub fn parse_list_field(raw: &str) -> FieldParse {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return FieldParse::Failed;
    }

    if !trimmed.starts_with('[') {
        let item = unescape_newlines(trimmed).trim().to_string();
        return FieldParse::Parsed(vec![item]);
    }

    let cleaned = unescape_newlines(trimmed)
        .replace('\r', "")
        .replace("'''", "'")
        .replace("\"\"\"", "\"");

    match parse_list_literal(&cleaned) {
        Some(items) => FieldParse::Parsed(items),
        None => FieldParse::Fallback(scan_list_fallback(&cleaned)),
    }
}

/// Serializes a parsed list back to the bracketed single-quoted form the
/// strict parser accepts.
pub fn serialize_list(items: &[String]) -> String {
    let quoted: Vec<String> = items
        .iter()
        .map(|item| format!("'{}'", item.replace('\\', "\\\\").replace('\'', "\\'")))
        .collect();
    format!("[{}]", quoted.join(", "))
}

fn unescape_newlines(value: &str) -> String {
    value.replace("\\n", "\n")
}

/// Strict phase: the field must be a well-formed bracketed list of quoted
/// strings. Any structural deviation rejects the whole field.
fn parse_list_literal(value: &str) -> Option<Vec<String>> {
    let inner = value.strip_prefix('[')?.strip_suffix(']')?;
    let chars: Vec<char> = inner.chars().collect();
    let len = chars.len();

    let mut items = Vec::new();
    let mut i = 0;
    loop {
        while i < len && chars[i].is_whitespace() {
            i += 1;
        }
        if i >= len {
            break;
        }

        let quote = chars[i];
        if quote != '\'' && quote != '"' {
            return None;
        }
        i += 1;

        let mut item = String::new();
        loop {
            if i >= len {
                // unterminated string
                return None;
            }
            let c = chars[i];
            if c == '\\' {
                i += 1;
                if i >= len {
                    return None;
                }
                match chars[i] {
                    'n' => item.push('\n'),
                    't' => item.push('\t'),
                    escaped @ ('\\' | '\'' | '"') => item.push(escaped),
                    other => {
                        item.push('\\');
                        item.push(other);
                    }
                }
                i += 1;
            } else if c == quote {
                i += 1;
                break;
            } else {
                item.push(c);
                i += 1;
            }
        }
        items.push(item);

        while i < len && chars[i].is_whitespace() {
            i += 1;
        }
        if i < len {
            if chars[i] != ',' {
                return None;
            }
            i += 1;
        }
    }

    Some(items)
}

/// Lenient phase: walk the bracket interior splitting on top-level commas,
/// tracking quote state, backslash escapes and bracket nesting, then strip
/// stray quote characters from each piece.
fn scan_list_fallback(value: &str) -> Vec<String> {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 2 {
        return Vec::new();
    }
    let inner = &chars[1..chars.len() - 1];

    let mut items = Vec::new();
    let mut current = String::new();
    let mut in_string = false;
    let mut escape = false;
    let mut brackets = 0i32;

    for &c in inner {
        if escape {
            current.push(c);
            escape = false;
            continue;
        }

        if c == '\\' {
            escape = true;
            current.push(c);
            continue;
        }

        if c == '"' || c == '\'' {
            in_string = !in_string;
            current.push(c);
            continue;
        }

        if !in_string {
            if c == '[' {
                brackets += 1;
            } else if c == ']' {
                brackets -= 1;
            } else if c == ',' && brackets == 0 {
                items.push(trim_stray_quotes(&current));
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        items.push(trim_stray_quotes(&current));
    }

    items.into_iter().filter(|item| !item.is_empty()).collect()
}

fn trim_stray_quotes(value: &str) -> String {
    value
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .to_string()
}

/// Loads a subject's question bank. A file that cannot be opened or read
/// is an error; individual bad rows are logged and skipped.
pub fn load_questions(path: &Path) -> AppResult<Vec<QuestionRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| AppError::QuestionLoad(format!("{}: {}", path.display(), e)))?;

    // Raw field strings repeat a lot across rows (shared option sets);
    // memoize per load so the cache cannot leak across subjects.
    let mut cache: HashMap<String, Vec<String>> = HashMap::new();
    let mut questions = Vec::new();

    for (index, row) in reader.records().enumerate() {
        let record = match row {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Skipping row {}: {}", index, e);
                continue;
            }
        };

        if record.len() < 3 {
            log::warn!("Skipping row {}: insufficient columns", index);
            continue;
        }

        let options = parse_field_cached(&mut cache, record.get(1).unwrap_or(""));
        let correct_answers = parse_field_cached(&mut cache, record.get(2).unwrap_or(""));

        if options.is_empty() || correct_answers.is_empty() {
            log::warn!("Skipping row {}: no usable options or correct answers", index);
            continue;
        }

        let mut text = unescape_newlines(record.get(0).unwrap_or("").trim());
        let mut image_url = None;
        if let Some(start) = text.find(IMAGE_MARKER) {
            let path_start = start + IMAGE_MARKER.len();
            if let Some(close) = text[path_start..].find(']') {
                let marker_path = text[path_start..path_start + close].trim().to_string();
                image_url = Some(format!("/{}", marker_path));
                // only text before the marker's opening bracket survives
                text = text[..start].trim().to_string();
            }
        }

        let options: Vec<QuestionOption> = options
            .iter()
            .map(|opt| {
                let trimmed = opt.trim();
                if question::is_image_path(trimmed) {
                    QuestionOption {
                        kind: OptionKind::Image,
                        content: format!("/{}", trimmed),
                    }
                } else {
                    QuestionOption {
                        kind: OptionKind::Text,
                        content: trimmed.to_string(),
                    }
                }
            })
            .collect();

        let has_image_options = options.iter().any(|o| o.kind == OptionKind::Image);

        questions.push(QuestionRecord {
            text,
            image_url,
            option_count: options.len(),
            options,
            correct_answers,
            has_image_options,
        });
    }

    Ok(questions)
}

fn parse_field_cached(cache: &mut HashMap<String, Vec<String>>, raw: &str) -> Vec<String> {
    if let Some(items) = cache.get(raw) {
        return items.clone();
    }
    let items = parse_list_field(raw).into_items();
    cache.insert(raw.to_string(), items.clone());
    items
}
