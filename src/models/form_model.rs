// src/models/form_model.rs

use std::collections::HashSet;

use chrono::Utc;
use validator::Validate;

use crate::models::{
    answer_key::{AnswerKey, AnswerKeyDraft, check_answer_key},
    field_error::FieldErrors,
    form::{CheckedForm, Form, FormDraft, Question},
    submission::{
        Submission, SubmissionDraft, SubmissionError, normalize_identity, shape_answer,
    },
};
use crate::utils::id::IdGenerator;

/// Turns drafts into validated aggregates and owns id assignment.
///
/// Nothing here touches storage; callers persist what comes back.
#[derive(Debug, Default)]
pub struct FormModel {
    ids: IdGenerator,
}

impl FormModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids(ids: IdGenerator) -> Self {
        Self { ids }
    }

    /// Validates a new form and gives it a fresh id.
    pub fn validate_form_draft(&self, draft: &FormDraft) -> Result<Form, FieldErrors> {
        let checked = draft.check()?;
        Ok(self.finish(self.ids.form_id(), checked))
    }

    /// Validates an edited form. The result replaces the old snapshot under the same id.
    pub fn revise_form(&self, id: &str, draft: &FormDraft) -> Result<Form, FieldErrors> {
        let checked = draft.check()?;
        Ok(self.finish(id.to_string(), checked))
    }

    fn finish(&self, id: String, checked: CheckedForm) -> Form {
        let mut taken: HashSet<String> =
            checked.questions.iter().filter_map(|q| q.id.clone()).collect();

        let questions = checked
            .questions
            .into_iter()
            .map(|q| Question {
                id: q.id.unwrap_or_else(|| self.fresh_question_id(&mut taken)),
                question_type: q.question_type,
                text: q.text,
                options: q.options,
                required: q.required,
            })
            .collect();

        Form {
            id,
            title: checked.title,
            description: checked.description,
            questions,
        }
    }

    /// Mints a question id that no other question of the form already uses.
    fn fresh_question_id(&self, taken: &mut HashSet<String>) -> String {
        loop {
            let id = self.ids.question_id();
            if taken.insert(id.clone()) {
                return id;
            }
        }
    }

    /// Checks a respondent's answers against `form`.
    ///
    /// Questions are visited in form order and the first problem aborts the whole
    /// submission. Answers to unknown questions and blank optional answers are dropped.
    pub fn validate_submission(
        &self,
        form: &Form,
        draft: &SubmissionDraft,
    ) -> Result<Submission, SubmissionError> {
        if let Err(e) = draft.validate() {
            let mut errors = FieldErrors::new();
            errors.extend_from_validator("", &e);
            return Err(SubmissionError::Respondent(errors));
        }

        let mut answers = std::collections::BTreeMap::new();
        for question in &form.questions {
            let shaped = match draft.answers.get(&question.id) {
                Some(raw) => shape_answer(question, raw).map_err(|_| {
                    SubmissionError::InvalidAnswer {
                        question_id: question.id.clone(),
                        question_text: question.text.clone(),
                    }
                })?,
                None => None,
            };

            match shaped {
                Some(value) => {
                    answers.insert(question.id.clone(), value);
                }
                None if question.required => {
                    return Err(SubmissionError::MissingRequired {
                        question_id: question.id.clone(),
                    });
                }
                None => {}
            }
        }

        Ok(Submission {
            id: self.ids.response_id(),
            form_id: form.id.clone(),
            respondent_name: normalize_identity(&draft.respondent_name),
            respondent_roll_no: normalize_identity(&draft.respondent_roll_no),
            submitted_at: Utc::now(),
            answers,
        })
    }

    /// Checks a draft answer key against the questions of `form`.
    pub fn validate_answer_key(
        &self,
        form: &Form,
        draft: &AnswerKeyDraft,
    ) -> Result<AnswerKey, FieldErrors> {
        let answers = check_answer_key(form, draft)?;
        Ok(AnswerKey {
            form_id: form.id.clone(),
            answers,
            saved_at: Utc::now(),
        })
    }
}
