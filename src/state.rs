use std::sync::Arc;

use crate::config::Config;
use crate::models::FormModel;
use crate::store::{KvStore, Repository};
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub repo: Repository,
    pub model: Arc<FormModel>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn KvStore>, config: Config) -> Self {
        Self {
            repo: Repository::new(store),
            model: Arc::new(FormModel::new()),
            config,
        }
    }
}

impl FromRef<AppState> for Repository {
    fn from_ref(state: &AppState) -> Self {
        state.repo.clone()
    }
}

impl FromRef<AppState> for Arc<FormModel> {
    fn from_ref(state: &AppState) -> Self {
        state.model.clone()
    }
}
