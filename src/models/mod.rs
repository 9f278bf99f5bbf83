// src/models/mod.rs

pub mod answer_key;
pub mod field_error;
pub mod form;
pub mod form_model;
pub mod submission;

pub use answer_key::{AnswerKey, AnswerKeyDraft, AnswerKeyEntry, KeyAnswer};
pub use field_error::{FieldError, FieldErrors};
pub use form::{Form, FormDraft, Question, QuestionDraft, QuestionOption, QuestionType};
pub use form_model::FormModel;
pub use submission::{AnswerValue, FileRef, Submission, SubmissionDraft, SubmissionError};
