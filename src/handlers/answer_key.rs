// src/handlers/answer_key.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    handlers::load_form,
    models::{AnswerKeyDraft, FormModel},
    store::{Collection, Repository},
};

pub async fn get_answer_key(
    State(repo): State<Repository>,
    Extension(collection): Extension<Collection>,
    Path(form_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    load_form(&repo, collection, &form_id).await?;
    let key = repo
        .find_answer_key(&form_id)
        .await?
        .ok_or(AppError::NotFound("No answer key saved for this form".to_string()))?;
    Ok(Json(key))
}

/// Validates and stores the answer key of a form, replacing the previous one.
pub async fn save_answer_key(
    State(repo): State<Repository>,
    State(model): State<Arc<FormModel>>,
    Extension(collection): Extension<Collection>,
    Path(form_id): Path<String>,
    payload: Result<Json<AnswerKeyDraft>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(draft) = payload?;
    let form = load_form(&repo, collection, &form_id).await?;

    let key = model.validate_answer_key(&form, &draft)?;
    repo.save_answer_key(&key).await?;
    tracing::info!("Saved answer key for {} ({} entries)", form.id, key.answers.len());

    Ok(Json(key))
}
