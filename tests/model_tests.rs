// tests/model_tests.rs

use formkit::models::{
    FormDraft, FormModel, QuestionDraft, QuestionOption, QuestionType, SubmissionDraft,
    SubmissionError,
    answer_key::{AnswerKeyDraft, AnswerKeyEntry, KeyAnswer},
    form::{
        OPTIONS_REQUIRED, QUESTION_IDS_UNIQUE, QUESTION_TEXT_REQUIRED, QUESTION_TYPE_REQUIRED,
        QUESTIONS_REQUIRED, TITLE_REQUIRED,
    },
    submission::{AnswerValue, REQUIRED_ANSWERS_MISSING},
};
use formkit::utils::id::IdGenerator;
use serde_json::json;

fn draft(title: &str, questions: Vec<QuestionDraft>) -> FormDraft {
    FormDraft {
        title: title.to_string(),
        description: String::new(),
        questions,
    }
}

fn quiz_draft() -> FormDraft {
    draft(
        "Quiz",
        vec![QuestionDraft::new(QuestionType::Text, "Capital of France?").required()],
    )
}

#[test]
fn blank_title_is_rejected() {
    let model = FormModel::new();

    for title in ["", "   ", "\t\n"] {
        let mut d = quiz_draft();
        d.title = title.to_string();

        let errors = model.validate_form_draft(&d).unwrap_err();
        assert_eq!(errors.first_message(), Some(TITLE_REQUIRED));
        assert_eq!(errors.for_field("title"), vec![TITLE_REQUIRED]);
    }
}

#[test]
fn form_without_questions_is_rejected() {
    let model = FormModel::new();

    let errors = model.validate_form_draft(&draft("Quiz", vec![])).unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first_message(), Some(QUESTIONS_REQUIRED));
}

#[test]
fn all_question_problems_are_collected_in_order() {
    let model = FormModel::new();
    let d = draft(
        "",
        vec![
            QuestionDraft::new(QuestionType::Text, "  "),
            QuestionDraft {
                text: "Pick one".into(),
                ..Default::default()
            },
            QuestionDraft::new(QuestionType::Dropdown, "Colour").with_options(["Red", " "]),
        ],
    );

    let errors = model.validate_form_draft(&d).unwrap_err();
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();

    assert_eq!(
        fields,
        vec![
            "title",
            "questions[0].text",
            "questions[1].type",
            "questions[2].options[1].label"
        ]
    );
    assert!(errors.has_message(QUESTION_TEXT_REQUIRED));
    assert!(errors.has_message(QUESTION_TYPE_REQUIRED));
    assert!(errors.has_message(OPTIONS_REQUIRED));
}

#[test]
fn choice_questions_need_non_empty_options() {
    let model = FormModel::new();

    for question_type in [
        QuestionType::Checkboxes,
        QuestionType::MultipleChoice,
        QuestionType::Dropdown,
    ] {
        let bad = draft(
            "Survey",
            vec![QuestionDraft::new(question_type, "Which?").with_options(["A", ""])],
        );
        let errors = model.validate_form_draft(&bad).unwrap_err();
        assert_eq!(errors.first_message(), Some(OPTIONS_REQUIRED));

        let none = draft("Survey", vec![QuestionDraft::new(question_type, "Which?")]);
        let errors = model.validate_form_draft(&none).unwrap_err();
        assert_eq!(errors.for_field("questions[0].options"), vec![OPTIONS_REQUIRED]);

        let good = draft(
            "Survey",
            vec![QuestionDraft::new(question_type, "Which?").with_options(["A", "B"])],
        );
        let form = model.validate_form_draft(&good).unwrap();
        assert_eq!(form.questions[0].options.len(), 2);
    }
}

#[test]
fn unknown_question_type_is_reported() {
    let model = FormModel::new();
    let d = draft(
        "Survey",
        vec![QuestionDraft {
            question_type: "slider".into(),
            text: "How much?".into(),
            ..Default::default()
        }],
    );

    let errors = model.validate_form_draft(&d).unwrap_err();

    assert_eq!(errors.first_message(), Some("Unknown question type 'slider'."));
}

#[test]
fn duplicate_question_ids_are_rejected() {
    let model = FormModel::new();
    let d = draft(
        "Survey",
        vec![
            QuestionDraft::new(QuestionType::Text, "One").with_id("q1"),
            QuestionDraft::new(QuestionType::Date, "Two").with_id("q1"),
        ],
    );

    let errors = model.validate_form_draft(&d).unwrap_err();

    assert_eq!(errors.for_field("questions[1].id"), vec![QUESTION_IDS_UNIQUE]);
}

#[test]
fn overlong_title_is_rejected() {
    let model = FormModel::new();
    let mut d = quiz_draft();
    d.title = "x".repeat(201);

    let errors = model.validate_form_draft(&d).unwrap_err();

    assert_eq!(
        errors.for_field("title"),
        vec!["Form title must be at most 200 characters."]
    );
}

#[test]
fn valid_draft_is_normalized() {
    let model = FormModel::new();
    let mut question = QuestionDraft::new(QuestionType::Text, "  Why?  ").with_id("q-why");
    // Leftovers from switching the type away from a choice type.
    question.options = vec![QuestionOption::new("stale")];
    let d = draft(
        "  Feedback ",
        vec![
            question,
            QuestionDraft::new(QuestionType::Checkboxes, "Pick").with_options([" A ", "B"]),
        ],
    );

    let form = model.validate_form_draft(&d).unwrap();

    assert!(form.id.starts_with("form-"));
    assert_eq!(form.title, "Feedback");
    assert_eq!(form.questions[0].id, "q-why");
    assert_eq!(form.questions[0].text, "Why?");
    assert!(form.questions[0].options.is_empty());
    assert!(form.questions[1].id.starts_with("question-"));
    let labels: Vec<&str> = form.questions[1].option_labels().collect();
    assert_eq!(labels, vec!["A", "B"]);
}

#[test]
fn form_ids_are_unique_within_a_session() {
    let model = FormModel::new();
    let d = quiz_draft();

    let ids: std::collections::HashSet<String> = (0..200)
        .map(|_| model.validate_form_draft(&d).unwrap().id)
        .collect();

    assert_eq!(ids.len(), 200);
}

#[test]
fn minted_question_ids_skip_ids_already_in_the_draft() {
    // Far enough ahead that the clock never overtakes the generator.
    let stamp = 9_000_000_000_000;
    let model = FormModel::with_ids(IdGenerator::starting_after(stamp));
    // The form id takes `stamp + 1`, so the first question id minted would be `stamp + 2`.
    let clashing = format!("question-{}", stamp + 2);
    let d = draft(
        "Clash",
        vec![
            QuestionDraft::new(QuestionType::Text, "Supplied").with_id(clashing.as_str()),
            QuestionDraft::new(QuestionType::Text, "Minted"),
        ],
    );

    let form = model.validate_form_draft(&d).unwrap();

    assert_eq!(form.id, format!("form-{}", stamp + 1));
    assert_eq!(form.questions[0].id, clashing);
    assert_eq!(form.questions[1].id, format!("question-{}", stamp + 3));
    let again = model.revise_form(&form.id, &FormDraft::from(&form)).unwrap();
    assert_eq!(again, form);
}

#[test]
fn revalidating_a_form_never_fails() {
    let model = FormModel::new();
    let d = draft(
        "Mixed",
        vec![
            QuestionDraft::new(QuestionType::Text, "Name").required(),
            QuestionDraft::new(QuestionType::MultipleChoice, "Pick").with_options(["X", "Y"]),
            QuestionDraft::new(QuestionType::Rating, "Rate us"),
            QuestionDraft::new(QuestionType::FileUpload, "CV"),
        ],
    );

    let form = model.validate_form_draft(&d).unwrap();
    let again = model.revise_form(&form.id, &FormDraft::from(&form)).unwrap();

    assert_eq!(again, form);
}

#[test]
fn question_ids_may_be_numeric_in_stored_drafts() {
    let d: FormDraft = serde_json::from_value(json!({
        "title": "Old survey",
        "questions": [{ "id": 1718000000000i64, "type": "text", "text": "Hi" }]
    }))
    .unwrap();

    let form = FormModel::new().validate_form_draft(&d).unwrap();

    assert_eq!(form.questions[0].id, "1718000000000");
}

#[test]
fn quiz_scenario() {
    let model = FormModel::new();
    let form = model.validate_form_draft(&quiz_draft()).unwrap();
    assert_eq!(form.questions.len(), 1);
    let qid = form.questions[0].id.clone();

    let err = model
        .validate_submission(&form, &SubmissionDraft::default())
        .unwrap_err();
    assert!(matches!(err, SubmissionError::MissingRequired { .. }));
    assert_eq!(err.to_string(), REQUIRED_ANSWERS_MISSING);

    let submission = model
        .validate_submission(&form, &SubmissionDraft::default().answer(&qid, json!("Paris")))
        .unwrap();
    assert_eq!(submission.form_id, form.id);
    assert_eq!(
        submission.answers.get(&qid),
        Some(&AnswerValue::Text("Paris".into()))
    );
}

#[test]
fn required_answers_must_be_non_empty() {
    let model = FormModel::new();
    let form = model
        .validate_form_draft(&draft(
            "Quiz",
            vec![QuestionDraft::new(QuestionType::Text, "Name").with_id("name").required()],
        ))
        .unwrap();

    for empty in [json!(""), json!("   "), json!(null)] {
        let result = model.validate_submission(&form, &SubmissionDraft::default().answer("name", empty));
        assert!(matches!(result, Err(SubmissionError::MissingRequired { .. })));
    }
}

#[test]
fn checkbox_scenario() {
    let model = FormModel::new();
    let form = model
        .validate_form_draft(&draft(
            "Letters",
            vec![
                QuestionDraft::new(QuestionType::Checkboxes, "Pick letters")
                    .with_id("letters")
                    .with_options(["A", "B"])
                    .required(),
            ],
        ))
        .unwrap();

    let err = model
        .validate_submission(&form, &SubmissionDraft::default().answer("letters", json!([])))
        .unwrap_err();
    assert_eq!(err.to_string(), REQUIRED_ANSWERS_MISSING);

    let ok = model
        .validate_submission(&form, &SubmissionDraft::default().answer("letters", json!(["A"])))
        .unwrap();
    assert_eq!(
        ok.answers.get("letters"),
        Some(&AnswerValue::Choices(vec!["A".into()]))
    );
}

#[test]
fn answers_are_shaped_by_question_type() {
    let model = FormModel::new();
    let form = model
        .validate_form_draft(&draft(
            "Everything",
            vec![
                QuestionDraft::new(QuestionType::Date, "When").with_id("when"),
                QuestionDraft::new(QuestionType::Rating, "Stars").with_id("stars"),
                QuestionDraft::new(QuestionType::FileUpload, "CV").with_id("cv"),
                QuestionDraft::new(QuestionType::Dropdown, "Size")
                    .with_id("size")
                    .with_options(["S", "M"]),
                QuestionDraft::new(QuestionType::Text, "Optional").with_id("opt"),
            ],
        ))
        .unwrap();

    let submission = model
        .validate_submission(
            &form,
            &SubmissionDraft::default()
                .answer("when", json!("2024-09-19"))
                .answer("stars", json!(4))
                .answer("cv", json!({ "name": "cv.pdf", "size": 2048 }))
                .answer("size", json!("M"))
                .answer("opt", json!(""))
                .answer("not-a-question", json!("ignored")),
        )
        .unwrap();

    assert_eq!(submission.answers.len(), 4);
    assert_eq!(submission.answers["stars"], AnswerValue::Rating(4));
    assert!(matches!(&submission.answers["cv"], AnswerValue::File(f) if f.name == "cv.pdf"));
    assert!(!submission.answers.contains_key("opt"));
    assert!(!submission.answers.contains_key("not-a-question"));
}

#[test]
fn misshapen_answers_are_rejected() {
    let model = FormModel::new();
    let form = model
        .validate_form_draft(&draft(
            "Checks",
            vec![
                QuestionDraft::new(QuestionType::Date, "When").with_id("when"),
                QuestionDraft::new(QuestionType::Rating, "Stars").with_id("stars"),
                QuestionDraft::new(QuestionType::MultipleChoice, "Pick")
                    .with_id("pick")
                    .with_options(["Yes", "No"]),
            ],
        ))
        .unwrap();

    for (id, value) in [
        ("when", json!("19/09/2024")),
        ("stars", json!(6)),
        ("stars", json!("five")),
        ("pick", json!("Maybe")),
        ("pick", json!(["Yes"])),
    ] {
        let err = model
            .validate_submission(&form, &SubmissionDraft::default().answer(id, value))
            .unwrap_err();
        assert!(
            matches!(&err, SubmissionError::InvalidAnswer { question_id, .. } if question_id == id),
            "expected invalid answer for {id}, got {err:?}"
        );
    }
}

#[test]
fn respondent_fields_are_trimmed() {
    let model = FormModel::new();
    let form = model.validate_form_draft(&quiz_draft()).unwrap();
    let qid = form.questions[0].id.clone();

    let mut d = SubmissionDraft::default().answer(&qid, json!("Paris"));
    d.respondent_name = Some("  Ada ".into());
    d.respondent_roll_no = Some("   ".into());

    let submission = model.validate_submission(&form, &d).unwrap();

    assert_eq!(submission.respondent_name.as_deref(), Some("Ada"));
    assert_eq!(submission.respondent_roll_no, None);
}

#[test]
fn answer_key_follows_question_types() {
    let model = FormModel::new();
    let form = model
        .validate_form_draft(&draft(
            "Quiz",
            vec![
                QuestionDraft::new(QuestionType::Text, "Capital").with_id("capital"),
                QuestionDraft::new(QuestionType::Checkboxes, "Primes")
                    .with_id("primes")
                    .with_options(["2", "3", "4"]),
                QuestionDraft::new(QuestionType::FileUpload, "Essay").with_id("essay"),
            ],
        ))
        .unwrap();

    let key = model
        .validate_answer_key(
            &form,
            &AnswerKeyDraft {
                answers: vec![
                    AnswerKeyEntry::many("primes", ["3", "2", "3"]),
                    AnswerKeyEntry::one("capital", " Paris "),
                ],
            },
        )
        .unwrap();
    assert_eq!(key.form_id, form.id);
    assert_eq!(key.answers[0], AnswerKeyEntry::one("capital", "Paris"));
    assert_eq!(key.answers[1].answer, KeyAnswer::Many(vec!["3".into(), "2".into()]));

    let errors = model
        .validate_answer_key(
            &form,
            &AnswerKeyDraft {
                answers: vec![
                    AnswerKeyEntry::one("primes", "2"),
                    AnswerKeyEntry::one("essay", "anything"),
                    AnswerKeyEntry::one("missing", "x"),
                ],
            },
        )
        .unwrap_err();
    assert_eq!(errors.len(), 3);
    assert_eq!(errors.for_field("answers[2].questionId"), vec!["Unknown question 'missing'."]);
}
