// src/models/form.rs

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::models::field_error::FieldErrors;

pub const TITLE_REQUIRED: &str = "Form title is required.";
pub const QUESTIONS_REQUIRED: &str = "Please add at least one question.";
pub const QUESTION_TEXT_REQUIRED: &str = "All questions must have text.";
pub const QUESTION_TYPE_REQUIRED: &str = "Please select a question type for each question.";
pub const OPTIONS_REQUIRED: &str = "Options cannot be empty.";
pub const QUESTION_IDS_UNIQUE: &str = "Question ids must be unique.";

/// The input affordance a question renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionType {
    Text,
    MultipleChoice,
    Checkboxes,
    Dropdown,
    Date,
    FileUpload,
    Rating,
}

impl QuestionType {
    pub const ALL: [QuestionType; 7] = [
        QuestionType::Text,
        QuestionType::MultipleChoice,
        QuestionType::Checkboxes,
        QuestionType::Dropdown,
        QuestionType::Date,
        QuestionType::FileUpload,
        QuestionType::Rating,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Text => "text",
            QuestionType::MultipleChoice => "multipleChoice",
            QuestionType::Checkboxes => "checkboxes",
            QuestionType::Dropdown => "dropdown",
            QuestionType::Date => "date",
            QuestionType::FileUpload => "fileUpload",
            QuestionType::Rating => "rating",
        }
    }

    /// Choice questions carry a list of options; every other type must not.
    pub fn has_options(self) -> bool {
        matches!(
            self,
            QuestionType::MultipleChoice | QuestionType::Checkboxes | QuestionType::Dropdown
        )
    }

    /// Checkboxes are the only type answered with a list.
    pub fn is_multi_answer(self) -> bool {
        self == QuestionType::Checkboxes
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown question type '{}'.", s))
    }
}

/// One selectable choice. Doubles as the draft shape, hence the length rule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Validate)]
pub struct QuestionOption {
    #[serde(default)]
    #[validate(length(max = 500, message = "Options must be at most 500 characters."))]
    pub label: String,
}

impl QuestionOption {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// A validated question as stored inside a `Form`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Serialized as `type`, which is reserved in Rust.
    #[serde(rename = "type")]
    pub question_type: QuestionType,

    pub text: String,

    #[serde(default)]
    pub options: Vec<QuestionOption>,

    #[serde(default)]
    pub required: bool,
}

impl Question {
    pub fn option_labels(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|o| o.label.as_str())
    }

    pub fn has_option(&self, label: &str) -> bool {
        self.option_labels().any(|l| l == label.trim())
    }
}

/// A finished form. Never edited in place; revisions replace the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<Question>,
}

impl Form {
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// What the editor holds while the user is typing. Nothing here is trusted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct FormDraft {
    #[validate(length(max = 200, message = "Form title must be at most 200 characters."))]
    pub title: String,

    #[validate(length(max = 2000, message = "Form description must be at most 2000 characters."))]
    pub description: String,

    pub questions: Vec<QuestionDraft>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestionDraft {
    /// Blank until FormModel assigns one.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Raw select value; empty means no type was picked yet.
    #[serde(rename = "type")]
    pub question_type: String,

    #[validate(length(max = 1000, message = "Questions must be at most 1000 characters."))]
    pub text: String,

    pub options: Vec<QuestionOption>,

    pub required: bool,
}

impl QuestionDraft {
    pub fn new(question_type: QuestionType, text: impl Into<String>) -> Self {
        Self {
            question_type: question_type.as_str().to_string(),
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_options<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = labels.into_iter().map(QuestionOption::new).collect();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

impl From<&Form> for FormDraft {
    fn from(form: &Form) -> Self {
        Self {
            title: form.title.clone(),
            description: form.description.clone(),
            questions: form
                .questions
                .iter()
                .map(|q| QuestionDraft {
                    id: q.id.clone(),
                    question_type: q.question_type.as_str().to_string(),
                    text: q.text.clone(),
                    options: q.options.clone(),
                    required: q.required,
                })
                .collect(),
        }
    }
}

/// The checked, trimmed content of a draft, still waiting for ids.
#[derive(Debug)]
pub(crate) struct CheckedForm {
    pub title: String,
    pub description: String,
    pub questions: Vec<CheckedQuestion>,
}

#[derive(Debug)]
pub(crate) struct CheckedQuestion {
    pub id: Option<String>,
    pub question_type: QuestionType,
    pub text: String,
    pub options: Vec<QuestionOption>,
    pub required: bool,
}

impl FormDraft {
    /// Applies every form rule, collecting all violations instead of stopping at the first.
    ///
    /// Errors come out in rule order: title, question count, then each question in turn
    /// (text, type, options, id).
    pub(crate) fn check(&self) -> Result<CheckedForm, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push("title", TITLE_REQUIRED);
        }
        if let Err(e) = self.validate() {
            errors.extend_from_validator("", &e);
        }

        if self.questions.is_empty() {
            errors.push("questions", QUESTIONS_REQUIRED);
        }

        let mut seen_ids = HashSet::new();
        let mut questions = Vec::with_capacity(self.questions.len());

        for (index, draft) in self.questions.iter().enumerate() {
            let path = format!("questions[{}]", index);

            let text = draft.text.trim();
            if text.is_empty() {
                errors.push(format!("{}.text", path), QUESTION_TEXT_REQUIRED);
            }
            if let Err(e) = draft.validate() {
                errors.extend_from_validator(&path, &e);
            }

            let raw_type = draft.question_type.trim();
            let question_type = if raw_type.is_empty() {
                errors.push(format!("{}.type", path), QUESTION_TYPE_REQUIRED);
                None
            } else {
                match raw_type.parse::<QuestionType>() {
                    Ok(t) => Some(t),
                    Err(message) => {
                        errors.push(format!("{}.type", path), message);
                        None
                    }
                }
            };

            let options = match question_type {
                Some(t) if t.has_options() => {
                    if draft.options.is_empty() {
                        errors.push(format!("{}.options", path), OPTIONS_REQUIRED);
                    }
                    for (opt_index, option) in draft.options.iter().enumerate() {
                        let opt_path = format!("{}.options[{}]", path, opt_index);
                        if option.label.trim().is_empty() {
                            errors.push(format!("{}.label", opt_path), OPTIONS_REQUIRED);
                        }
                        if let Err(e) = option.validate() {
                            errors.extend_from_validator(&opt_path, &e);
                        }
                    }
                    draft
                        .options
                        .iter()
                        .map(|o| QuestionOption::new(o.label.trim()))
                        .collect()
                }
                // Leftover options from an earlier type selection are dropped.
                _ => Vec::new(),
            };

            let id = draft.id.trim();
            if !id.is_empty() && !seen_ids.insert(id.to_string()) {
                errors.push(format!("{}.id", path), QUESTION_IDS_UNIQUE);
            }

            if let Some(question_type) = question_type {
                questions.push(CheckedQuestion {
                    id: (!id.is_empty()).then(|| id.to_string()),
                    question_type,
                    text: text.to_string(),
                    options,
                    required: draft.required,
                });
            }
        }

        errors.into_result(CheckedForm {
            title: title.to_string(),
            description: self.description.clone(),
            questions,
        })
    }
}

/// Accepts ids persisted either as strings or as bare millisecond timestamps.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Float(n) => n.to_string(),
    })
}
