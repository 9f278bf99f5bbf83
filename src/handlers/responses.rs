// src/handlers/responses.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    handlers::load_form,
    models::{FormModel, SubmissionDraft},
    report,
    store::{Collection, Repository},
};

/// Validates a respondent's answers and appends the submission.
///
/// The first missing required answer rejects the whole submission; nothing is stored.
pub async fn submit_response(
    State(repo): State<Repository>,
    State(model): State<Arc<FormModel>>,
    Extension(collection): Extension<Collection>,
    Path(form_id): Path<String>,
    payload: Result<Json<SubmissionDraft>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(draft) = payload?;
    let form = load_form(&repo, collection, &form_id).await?;

    let submission = model.validate_submission(&form, &draft)?;
    repo.append_submission(collection, &submission).await?;
    tracing::info!("Recorded response {} for {}", submission.id, form.id);

    Ok((StatusCode::CREATED, Json(submission)))
}

pub async fn list_responses(
    State(repo): State<Repository>,
    Extension(collection): Extension<Collection>,
    Path(form_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    load_form(&repo, collection, &form_id).await?;
    let submissions = repo.submissions_for(collection, &form_id).await?;
    Ok(Json(submissions))
}

pub async fn get_response(
    State(repo): State<Repository>,
    Extension(collection): Extension<Collection>,
    Path((form_id, response_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let submission = repo
        .find_submission(collection, &response_id)
        .await?
        .filter(|s| s.form_id == form_id)
        .ok_or(AppError::NotFound("Response not found".to_string()))?;
    Ok(Json(submission))
}

/// All responses of the collection, grouped by form id.
pub async fn grouped_responses(
    State(repo): State<Repository>,
    Extension(collection): Extension<Collection>,
) -> Result<impl IntoResponse, AppError> {
    let submissions = repo.list_submissions(collection).await?;
    Ok(Json(report::group_by_form(submissions)))
}

/// Bulk-clears every response of the collection.
pub async fn clear_responses(
    State(repo): State<Repository>,
    Extension(collection): Extension<Collection>,
) -> Result<impl IntoResponse, AppError> {
    repo.clear_submissions(collection).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Per-question aggregate of a form's responses.
pub async fn summarize_responses(
    State(repo): State<Repository>,
    Extension(collection): Extension<Collection>,
    Path(form_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let form = load_form(&repo, collection, &form_id).await?;
    let submissions = repo.submissions_for(collection, &form_id).await?;
    Ok(Json(report::summarize(&form, &submissions)))
}

/// Scores one response against the form's answer key.
pub async fn grade_response(
    State(repo): State<Repository>,
    Extension(collection): Extension<Collection>,
    Path((form_id, response_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let form = load_form(&repo, collection, &form_id).await?;

    let submission = repo
        .find_submission(collection, &response_id)
        .await?
        .filter(|s| s.form_id == form_id)
        .ok_or(AppError::NotFound("Response not found".to_string()))?;

    let key = repo
        .find_answer_key(&form_id)
        .await?
        .ok_or(AppError::NotFound("No answer key saved for this form".to_string()))?;

    Ok(Json(report::grade(&form, &key, &submission)))
}
