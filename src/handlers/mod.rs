// src/handlers/mod.rs

pub mod answer_key;
pub mod forms;
pub mod responses;

use crate::{
    error::AppError,
    models::Form,
    store::{Collection, Repository},
};

pub async fn health() -> &'static str {
    "ok"
}

/// Fetches a form or maps its absence to 404.
pub(crate) async fn load_form(
    repo: &Repository,
    collection: Collection,
    id: &str,
) -> Result<Form, AppError> {
    repo.find_form(collection, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} not found", collection.noun())))
}
