// src/store/mod.rs

pub mod memory;
pub mod repository;
pub mod sqlite;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

pub use memory::MemoryStore;
pub use repository::Repository;
pub use sqlite::SqliteStore;

/// Key holding the answer keys shared by both collection families.
pub const ANSWER_KEYS_KEY: &str = "answerKeys";

/// Flat JSON key-value persistence, the only storage the app has.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns `None` when nothing was ever saved under `key`.
    async fn load(&self, key: &str) -> Result<Option<Value>, StorageError>;

    async fn save(&self, key: &str, value: &Value) -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// The two parallel families of forms. Same model, separate storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Forms,
    Surveys,
}

impl Collection {
    pub fn forms_key(self) -> &'static str {
        match self {
            Collection::Forms => "forms",
            Collection::Surveys => "surveyForms",
        }
    }

    pub fn responses_key(self) -> &'static str {
        match self {
            Collection::Forms => "formResponses",
            Collection::Surveys => "surveyResponses",
        }
    }

    pub fn draft_key(self) -> &'static str {
        match self {
            Collection::Forms => "savedFormData",
            Collection::Surveys => "savedSurveyFormData",
        }
    }

    /// Singular noun for messages.
    pub fn noun(self) -> &'static str {
        match self {
            Collection::Forms => "Form",
            Collection::Surveys => "Survey",
        }
    }
}

/// Persistence failure. There is no recovery path; the operation is abandoned.
#[derive(Debug)]
pub enum StorageError {
    /// The backend could not read or write.
    Backend(String),

    /// A stored value is not the JSON shape its key promises.
    Corrupt { key: String, reason: String },
}

impl StorageError {
    pub fn corrupt(key: &str, err: impl fmt::Display) -> Self {
        StorageError::Corrupt {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Backend(msg) => write!(f, "storage backend error: {}", msg),
            StorageError::Corrupt { key, reason } => {
                write!(f, "stored value under '{}' is corrupt: {}", key, reason)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for StorageError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StorageError::Backend(err.to_string())
    }
}
