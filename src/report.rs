// src/report.rs

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::models::{AnswerKey, AnswerValue, Form, KeyAnswer, QuestionType, Submission};

/// Responses bucketed by the form they answer, ordered by form id.
pub fn group_by_form(submissions: Vec<Submission>) -> BTreeMap<String, Vec<Submission>> {
    let mut grouped: BTreeMap<String, Vec<Submission>> = BTreeMap::new();
    for submission in submissions {
        grouped
            .entry(submission.form_id.clone())
            .or_default()
            .push(submission);
    }
    grouped
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSummary {
    pub question_id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub text: String,
    /// How many responses answered this question at all.
    pub answered: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub option_counts: Vec<OptionCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    pub form_id: String,
    pub total_responses: usize,
    pub questions: Vec<QuestionSummary>,
}

/// Aggregates the responses to `form`, one entry per question in form order.
///
/// Submissions for other forms are ignored. Each checkbox selection counts toward
/// its option.
pub fn summarize(form: &Form, submissions: &[Submission]) -> FormSummary {
    let relevant: Vec<&Submission> = submissions
        .iter()
        .filter(|s| s.form_id == form.id)
        .collect();

    let questions = form
        .questions
        .iter()
        .map(|question| {
            let answers: Vec<&AnswerValue> = relevant
                .iter()
                .filter_map(|s| s.answers.get(&question.id))
                .collect();

            let option_counts = if question.question_type.has_options() {
                question
                    .options
                    .iter()
                    .map(|option| OptionCount {
                        label: option.label.clone(),
                        count: answers
                            .iter()
                            .filter(|a| match a {
                                AnswerValue::Text(s) => *s == option.label,
                                AnswerValue::Choices(c) => c.contains(&option.label),
                                _ => false,
                            })
                            .count(),
                    })
                    .collect()
            } else {
                Vec::new()
            };

            let average_rating = if question.question_type == QuestionType::Rating {
                let ratings: Vec<f64> = answers
                    .iter()
                    .filter_map(|a| match a {
                        AnswerValue::Rating(n) => Some(f64::from(*n)),
                        _ => None,
                    })
                    .collect();
                (!ratings.is_empty()).then(|| ratings.iter().sum::<f64>() / ratings.len() as f64)
            } else {
                None
            };

            QuestionSummary {
                question_id: question.id.clone(),
                question_type: question.question_type,
                text: question.text.clone(),
                answered: answers.len(),
                option_counts,
                average_rating,
            }
        })
        .collect();

    FormSummary {
        form_id: form.id.clone(),
        total_responses: relevant.len(),
        questions,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedQuestion {
    pub question_id: String,
    pub correct: bool,
    pub expected: KeyAnswer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given: Option<AnswerValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeReport {
    pub submission_id: String,
    pub correct_count: usize,
    /// Questions that have an entry in the key.
    pub total_questions: usize,
    /// Percentage of keyed questions answered correctly, 0 when nothing is keyed.
    pub score: f64,
    pub results: Vec<GradedQuestion>,
}

/// Compares one submission with the form's answer key.
///
/// Matching is strict after trimming; checkbox answers compare as sets.
pub fn grade(form: &Form, key: &AnswerKey, submission: &Submission) -> GradeReport {
    let results: Vec<GradedQuestion> = form
        .questions
        .iter()
        .filter_map(|question| {
            let expected = key.entry(&question.id)?;
            let given = submission.answers.get(&question.id);
            Some(GradedQuestion {
                question_id: question.id.clone(),
                correct: given.is_some_and(|g| matches_key(g, expected)),
                expected: expected.clone(),
                given: given.cloned(),
            })
        })
        .collect();

    let total_questions = results.len();
    let correct_count = results.iter().filter(|r| r.correct).count();
    let score = if total_questions == 0 {
        0.0
    } else {
        (correct_count as f64 / total_questions as f64) * 100.0
    };

    GradeReport {
        submission_id: submission.id.clone(),
        correct_count,
        total_questions,
        score,
        results,
    }
}

fn matches_key(given: &AnswerValue, expected: &KeyAnswer) -> bool {
    match (given, expected) {
        (AnswerValue::Text(g), KeyAnswer::One(e)) => g.trim() == e.trim(),
        (AnswerValue::Rating(g), KeyAnswer::One(e)) => e.trim().parse::<u8>() == Ok(*g),
        (AnswerValue::Choices(g), KeyAnswer::Many(e)) => {
            let given: HashSet<&str> = g.iter().map(|s| s.trim()).collect();
            let expected: HashSet<&str> = e.iter().map(|s| s.trim()).collect();
            given == expected
        }
        _ => false,
    }
}
