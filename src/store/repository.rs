// src/store/repository.rs

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::sync::Mutex;

use super::{ANSWER_KEYS_KEY, Collection, KvStore, StorageError};
use crate::models::{AnswerKey, Form, FormDraft, Submission};

/// Typed access to every persisted collection.
///
/// Each collection is a whole JSON array under one key, so writes are
/// read-modify-write. `write_lock` keeps concurrent requests in this process
/// from losing each other's changes.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn KvStore>,
    write_lock: Arc<Mutex<()>>,
}

impl Repository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn load_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StorageError> {
        match self.store.load(key).await? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value).map_err(|e| StorageError::corrupt(key, e)),
        }
    }

    async fn save_list<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StorageError> {
        let value = serde_json::to_value(items).map_err(|e| StorageError::corrupt(key, e))?;
        self.store.save(key, &value).await
    }

    // Forms

    pub async fn list_forms(&self, collection: Collection) -> Result<Vec<Form>, StorageError> {
        self.load_list(collection.forms_key()).await
    }

    pub async fn find_form(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Form>, StorageError> {
        Ok(self
            .list_forms(collection)
            .await?
            .into_iter()
            .find(|f| f.id == id))
    }

    /// Appends a new form. Returns `false` without writing if the id is taken.
    pub async fn insert_form(&self, collection: Collection, form: &Form) -> Result<bool, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut forms: Vec<Form> = self.load_list(collection.forms_key()).await?;
        if forms.iter().any(|f| f.id == form.id) {
            tracing::warn!("Refusing to insert duplicate form id {}", form.id);
            return Ok(false);
        }
        forms.push(form.clone());
        self.save_list(collection.forms_key(), &forms).await?;
        tracing::info!("Stored {} {}", collection.noun().to_lowercase(), form.id);
        Ok(true)
    }

    /// Swaps the stored snapshot with the same id, keeping its position.
    /// Returns `false` if there was nothing to replace.
    pub async fn replace_form(&self, collection: Collection, form: &Form) -> Result<bool, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut forms: Vec<Form> = self.load_list(collection.forms_key()).await?;
        let Some(slot) = forms.iter_mut().find(|f| f.id == form.id) else {
            return Ok(false);
        };
        *slot = form.clone();
        self.save_list(collection.forms_key(), &forms).await?;
        tracing::info!("Replaced {} {}", collection.noun().to_lowercase(), form.id);
        Ok(true)
    }

    // Submissions

    pub async fn list_submissions(
        &self,
        collection: Collection,
    ) -> Result<Vec<Submission>, StorageError> {
        self.load_list(collection.responses_key()).await
    }

    pub async fn submissions_for(
        &self,
        collection: Collection,
        form_id: &str,
    ) -> Result<Vec<Submission>, StorageError> {
        let mut submissions = self.list_submissions(collection).await?;
        submissions.retain(|s| s.form_id == form_id);
        Ok(submissions)
    }

    pub async fn find_submission(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Submission>, StorageError> {
        Ok(self
            .list_submissions(collection)
            .await?
            .into_iter()
            .find(|s| s.id == id))
    }

    pub async fn append_submission(
        &self,
        collection: Collection,
        submission: &Submission,
    ) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut submissions: Vec<Submission> = self.load_list(collection.responses_key()).await?;
        submissions.push(submission.clone());
        self.save_list(collection.responses_key(), &submissions).await
    }

    /// Drops every response of the collection. The only way responses are deleted.
    pub async fn clear_submissions(&self, collection: Collection) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        self.store.remove(collection.responses_key()).await?;
        tracing::info!("Cleared {} responses", collection.noun().to_lowercase());
        Ok(())
    }

    // Drafts

    pub async fn load_draft(&self, collection: Collection) -> Result<Option<FormDraft>, StorageError> {
        let key = collection.draft_key();
        match self.store.load(key).await? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| StorageError::corrupt(key, e)),
        }
    }

    pub async fn save_draft(&self, collection: Collection, draft: &FormDraft) -> Result<(), StorageError> {
        let key = collection.draft_key();
        let value = serde_json::to_value(draft).map_err(|e| StorageError::corrupt(key, e))?;
        self.store.save(key, &value).await
    }

    pub async fn clear_draft(&self, collection: Collection) -> Result<(), StorageError> {
        self.store.remove(collection.draft_key()).await
    }

    // Answer keys

    pub async fn list_answer_keys(&self) -> Result<Vec<AnswerKey>, StorageError> {
        self.load_list(ANSWER_KEYS_KEY).await
    }

    pub async fn find_answer_key(&self, form_id: &str) -> Result<Option<AnswerKey>, StorageError> {
        Ok(self
            .list_answer_keys()
            .await?
            .into_iter()
            .find(|k| k.form_id == form_id))
    }

    /// Stores `key` as the one answer key of its form, replacing any earlier one.
    pub async fn save_answer_key(&self, key: &AnswerKey) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut keys: Vec<AnswerKey> = self.load_list(ANSWER_KEYS_KEY).await?;
        match keys.iter_mut().find(|k| k.form_id == key.form_id) {
            Some(existing) => *existing = key.clone(),
            None => keys.push(key.clone()),
        }
        self.save_list(ANSWER_KEYS_KEY, &keys).await
    }
}
