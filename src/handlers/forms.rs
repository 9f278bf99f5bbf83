// src/handlers/forms.rs

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
    models::{FormDraft, FormModel},
    store::{Collection, Repository},
};

/// Lists every form of the collection in creation order.
pub async fn list_forms(
    State(repo): State<Repository>,
    Extension(collection): Extension<Collection>,
) -> Result<impl IntoResponse, AppError> {
    let forms = repo.list_forms(collection).await?;
    Ok(Json(forms))
}

/// Validates the editor's draft and stores the resulting form.
///
/// * Every rule violation is reported at once (400).
/// * On success the saved draft is discarded, as the editor is cleared.
///   A failure to discard it is only logged.
pub async fn create_form(
    State(repo): State<Repository>,
    State(model): State<Arc<FormModel>>,
    Extension(collection): Extension<Collection>,
    payload: Result<Json<FormDraft>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(draft) = payload?;
    let form = model.validate_form_draft(&draft).map_err(|errors| {
        tracing::debug!("Rejected {} draft: {}", collection.noun(), errors);
        AppError::Validation(errors)
    })?;

    if !repo.insert_form(collection, &form).await? {
        return Err(AppError::Conflict(format!(
            "{} '{}' already exists",
            collection.noun(),
            form.id
        )));
    }
    // Best-effort: the form is already stored.
    if let Err(err) = repo.clear_draft(collection).await {
        tracing::warn!(
            "Saved {} {} but could not clear its draft: {}",
            collection.noun(),
            form.id,
            err
        );
    }

    Ok((StatusCode::CREATED, Json(form)))
}

pub async fn get_form(
    State(repo): State<Repository>,
    Extension(collection): Extension<Collection>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let form = load_form(&repo, collection, &id).await?;
    Ok(Json(form))
}

/// Replaces a stored form with a re-validated edit. The id does not change.
pub async fn revise_form(
    State(repo): State<Repository>,
    State(model): State<Arc<FormModel>>,
    Extension(collection): Extension<Collection>,
    Path(id): Path<String>,
    payload: Result<Json<FormDraft>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(draft) = payload?;
    // 404 takes precedence over validation errors.
    load_form(&repo, collection, &id).await?;

    let form = model.revise_form(&id, &draft)?;
    if !repo.replace_form(collection, &form).await? {
        return Err(AppError::NotFound(format!("{} not found", collection.noun())));
    }

    Ok(Json(form))
}

/// Returns the saved in-progress draft, or an empty one.
pub async fn get_draft(
    State(repo): State<Repository>,
    Extension(collection): Extension<Collection>,
) -> Result<impl IntoResponse, AppError> {
    let draft = repo.load_draft(collection).await?.unwrap_or_default();
    Ok(Json(draft))
}

/// Saves the editor state as-is. Drafts are not validated.
pub async fn save_draft(
    State(repo): State<Repository>,
    Extension(collection): Extension<Collection>,
    payload: Result<Json<FormDraft>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(draft) = payload?;
    repo.save_draft(collection, &draft).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_draft(
    State(repo): State<Repository>,
    Extension(collection): Extension<Collection>,
) -> Result<impl IntoResponse, AppError> {
    repo.clear_draft(collection).await?;
    Ok(StatusCode::NO_CONTENT)
}
