// src/models/submission.rs

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::models::field_error::FieldErrors;
use crate::models::form::{Question, QuestionType};

pub const REQUIRED_ANSWERS_MISSING: &str = "Please answer all required questions.";

/// Date inputs submit ISO calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Reference to an uploaded file. Only metadata is kept, never the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// A stored answer. The variant follows the question type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// rating
    Rating(u8),
    /// text, date, dropdown, multipleChoice
    Text(String),
    /// checkboxes
    Choices(Vec<String>),
    /// fileUpload
    File(FileRef),
}

/// One respondent's accepted answers. Append-only once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub form_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respondent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respondent_roll_no: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub answers: BTreeMap<String, AnswerValue>,
}

/// Answers as captured by the response view, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmissionDraft {
    #[validate(length(max = 100, message = "Name must be at most 100 characters."))]
    pub respondent_name: Option<String>,

    #[validate(length(max = 50, message = "Roll number must be at most 50 characters."))]
    pub respondent_roll_no: Option<String>,

    pub answers: BTreeMap<String, Value>,
}

impl SubmissionDraft {
    pub fn answer(mut self, question_id: impl Into<String>, value: Value) -> Self {
        self.answers.insert(question_id.into(), value);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionError {
    /// A required question has no usable answer.
    MissingRequired { question_id: String },

    /// The answer does not fit the question (wrong shape, unknown option, bad date...).
    InvalidAnswer {
        question_id: String,
        question_text: String,
    },

    /// Respondent identity fields failed their length checks.
    Respondent(FieldErrors),
}

impl SubmissionError {
    /// Field-level view used by the HTTP layer.
    pub fn to_field_errors(&self) -> FieldErrors {
        match self {
            SubmissionError::Respondent(errors) => errors.clone(),
            SubmissionError::MissingRequired { question_id }
            | SubmissionError::InvalidAnswer { question_id, .. } => {
                let mut errors = FieldErrors::new();
                errors.push(format!("answers.{}", question_id), self.to_string());
                errors
            }
        }
    }
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionError::MissingRequired { .. } => f.write_str(REQUIRED_ANSWERS_MISSING),
            SubmissionError::InvalidAnswer { question_text, .. } => {
                write!(f, "Answer to '{}' is not valid.", question_text)
            }
            SubmissionError::Respondent(errors) => write!(f, "{}", errors),
        }
    }
}

impl std::error::Error for SubmissionError {}

/// Marker for an answer that cannot be stored for its question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Misshapen;

/// Converts a raw answer into the stored shape for `question`.
///
/// `Ok(None)` means "not answered": null, blank text, an empty selection, or a zero rating.
pub(crate) fn shape_answer(question: &Question, raw: &Value) -> Result<Option<AnswerValue>, Misshapen> {
    if raw.is_null() {
        return Ok(None);
    }

    match question.question_type {
        QuestionType::Text => match raw {
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => Ok(Some(AnswerValue::Text(s.clone()))),
            _ => Err(Misshapen),
        },
        QuestionType::MultipleChoice | QuestionType::Dropdown => match raw {
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) if question.has_option(s) => {
                Ok(Some(AnswerValue::Text(s.trim().to_string())))
            }
            _ => Err(Misshapen),
        },
        QuestionType::Checkboxes => {
            let Value::Array(items) = raw else {
                return Err(Misshapen);
            };
            let mut selected: Vec<String> = Vec::with_capacity(items.len());
            for item in items {
                let label = item.as_str().ok_or(Misshapen)?.trim();
                if !question.has_option(label) {
                    return Err(Misshapen);
                }
                if !selected.iter().any(|s| s == label) {
                    selected.push(label.to_string());
                }
            }
            Ok((!selected.is_empty()).then_some(AnswerValue::Choices(selected)))
        }
        QuestionType::Date => match raw {
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
                .map(|d| Some(AnswerValue::Text(d.format(DATE_FORMAT).to_string())))
                .map_err(|_| Misshapen),
            _ => Err(Misshapen),
        },
        QuestionType::Rating => {
            let n = raw.as_u64().ok_or(Misshapen)?;
            match n {
                0 => Ok(None),
                n if (MIN_RATING as u64..=MAX_RATING as u64).contains(&n) => {
                    Ok(Some(AnswerValue::Rating(n as u8)))
                }
                _ => Err(Misshapen),
            }
        }
        QuestionType::FileUpload => {
            let file = match raw {
                Value::String(name) => FileRef {
                    name: name.clone(),
                    size: None,
                    content_type: None,
                },
                Value::Object(_) => {
                    serde_json::from_value::<FileRef>(raw.clone()).map_err(|_| Misshapen)?
                }
                _ => return Err(Misshapen),
            };
            if file.name.trim().is_empty() {
                Ok(None)
            } else {
                Ok(Some(AnswerValue::File(FileRef {
                    name: file.name.trim().to_string(),
                    ..file
                })))
            }
        }
    }
}

/// Trims an optional identity field; blank becomes absent.
pub(crate) fn normalize_identity(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
