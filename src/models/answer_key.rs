// src/models/answer_key.rs

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::field_error::FieldErrors;
use crate::models::form::{Form, QuestionType};
use crate::models::submission::{DATE_FORMAT, MAX_RATING, MIN_RATING};

pub const DUPLICATE_KEY_ENTRY: &str = "Each question can only have one correct answer.";
pub const FILE_UPLOAD_NOT_GRADABLE: &str = "File upload questions cannot have a correct answer.";
pub const KEY_NOT_AN_OPTION: &str = "Correct answers must be options of the question.";
pub const KEY_NEEDS_LIST: &str = "Checkbox questions take a list of correct answers.";
pub const KEY_NEEDS_SINGLE: &str = "This question takes a single correct answer.";
pub const KEY_INVALID_DATE: &str = "Correct date must be formatted as YYYY-MM-DD.";
pub const KEY_INVALID_RATING: &str = "Correct rating must be between 1 and 5.";

/// The correct answer for one question: a list for checkboxes, a string otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyAnswer {
    Many(Vec<String>),
    One(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerKeyEntry {
    pub question_id: String,
    pub answer: KeyAnswer,
}

impl AnswerKeyEntry {
    pub fn one(question_id: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            answer: KeyAnswer::One(answer.into()),
        }
    }

    pub fn many<I, S>(question_id: impl Into<String>, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            question_id: question_id.into(),
            answer: KeyAnswer::Many(answers.into_iter().map(Into::into).collect()),
        }
    }
}

/// Correct answers for one form. There is at most one key per form id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerKey {
    pub form_id: String,
    pub answers: Vec<AnswerKeyEntry>,
    pub saved_at: DateTime<Utc>,
}

impl AnswerKey {
    pub fn entry(&self, question_id: &str) -> Option<&KeyAnswer> {
        self.answers
            .iter()
            .find(|e| e.question_id == question_id)
            .map(|e| &e.answer)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerKeyDraft {
    pub answers: Vec<AnswerKeyEntry>,
}

/// Checks a draft key against `form` and returns its entries in question order.
///
/// Blank single answers and empty lists count as "no key for this question" and are dropped.
pub(crate) fn check_answer_key(
    form: &Form,
    draft: &AnswerKeyDraft,
) -> Result<Vec<AnswerKeyEntry>, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut seen = HashSet::new();
    let mut accepted: Vec<AnswerKeyEntry> = Vec::new();

    for (index, entry) in draft.answers.iter().enumerate() {
        let path = format!("answers[{}]", index);

        let Some(question) = form.question(&entry.question_id) else {
            errors.push(
                format!("{}.questionId", path),
                format!("Unknown question '{}'.", entry.question_id),
            );
            continue;
        };
        if !seen.insert(question.id.as_str()) {
            errors.push(format!("{}.questionId", path), DUPLICATE_KEY_ENTRY);
            continue;
        }

        let answer = match (question.question_type, &entry.answer) {
            (QuestionType::FileUpload, _) => {
                errors.push(format!("{}.answer", path), FILE_UPLOAD_NOT_GRADABLE);
                continue;
            }
            (QuestionType::Checkboxes, KeyAnswer::Many(labels)) => {
                let mut kept: Vec<String> = Vec::new();
                for label in labels.iter().map(|l| l.trim()) {
                    if !question.has_option(label) {
                        errors.push(format!("{}.answer", path), KEY_NOT_AN_OPTION);
                        break;
                    }
                    if !kept.iter().any(|k| k == label) {
                        kept.push(label.to_string());
                    }
                }
                if kept.is_empty() {
                    continue;
                }
                KeyAnswer::Many(kept)
            }
            (QuestionType::Checkboxes, KeyAnswer::One(_)) => {
                errors.push(format!("{}.answer", path), KEY_NEEDS_LIST);
                continue;
            }
            (_, KeyAnswer::Many(_)) => {
                errors.push(format!("{}.answer", path), KEY_NEEDS_SINGLE);
                continue;
            }
            (question_type, KeyAnswer::One(value)) => {
                let value = value.trim();
                if value.is_empty() {
                    continue;
                }
                let problem = match question_type {
                    QuestionType::MultipleChoice | QuestionType::Dropdown
                        if !question.has_option(value) =>
                    {
                        Some(KEY_NOT_AN_OPTION)
                    }
                    QuestionType::Rating
                        if !value
                            .parse::<u8>()
                            .is_ok_and(|n| (MIN_RATING..=MAX_RATING).contains(&n)) =>
                    {
                        Some(KEY_INVALID_RATING)
                    }
                    _ => None,
                };
                if let Some(message) = problem {
                    errors.push(format!("{}.answer", path), message);
                    continue;
                }
                if question_type == QuestionType::Date {
                    // Stored in the same form submitted dates are shaped into.
                    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
                        Ok(date) => KeyAnswer::One(date.format(DATE_FORMAT).to_string()),
                        Err(_) => {
                            errors.push(format!("{}.answer", path), KEY_INVALID_DATE);
                            continue;
                        }
                    }
                } else {
                    KeyAnswer::One(value.to_string())
                }
            }
        };

        accepted.push(AnswerKeyEntry {
            question_id: question.id.clone(),
            answer,
        });
    }

    // Store entries in the order the form shows its questions.
    accepted.sort_by_key(|entry| {
        form.questions
            .iter()
            .position(|q| q.id == entry.question_id)
            .unwrap_or(usize::MAX)
    });

    errors.into_result(accepted)
}
