//! Datastore access for the `todos` table.
//!
//! The datastore is the sole source of truth for task records. Two
//! backends implement the [`TodoStore`] trait:
//!
//! - [`rest::RestTodos`]: the hosted relational datastore, reached through
//!   its PostgREST-style HTTP interface with endpoint/key credentials
//! - [`memory::MemoryTodos`]: an in-process store with auto-assigned ids,
//!   used by the test suite and available via `tudu serve --memory`
//!
//! Every operation is a single round trip; no transaction spans more than
//! one record.

pub mod memory;
pub mod rest;

use crate::libs::config::ConfigModule;
use crate::libs::messages::Message;
use crate::libs::todo::{NewTodo, Todo, TodoPatch};
use crate::{msg_bail_anyhow, msg_print};
use anyhow::Result;
use async_trait::async_trait;
use dialoguer::{theme::ColorfulTheme, Input};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Errors surfaced by datastore backends.
///
/// `NotFound` is distinguished from other failures so the item endpoint
/// can answer 404 instead of a blanket 500.
#[derive(Debug, thiserror::Error)]
pub enum DatastoreError {
    #[error("todo with id {0} not found")]
    NotFound(i64),
    #[error("datastore request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("datastore returned {status}: {body}")]
    Unexpected {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Table-level CRUD operations against the single `todos` table.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn select_all(&self) -> Result<Vec<Todo>, DatastoreError>;
    async fn select_one(&self, id: i64) -> Result<Todo, DatastoreError>;
    async fn insert(&self, new: NewTodo) -> Result<Todo, DatastoreError>;
    async fn update(&self, id: i64, patch: TodoPatch) -> Result<Todo, DatastoreError>;
    /// Removes a record by id. The deleted row is returned when the
    /// backend is configured to report it, `None` otherwise.
    async fn delete(&self, id: i64) -> Result<Option<Todo>, DatastoreError>;
}

/// Which backend `tudu serve` should run against.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    #[default]
    Rest,
    Memory,
}

/// Hosted datastore credentials and backend selection.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DatastoreConfig {
    /// Base URL of the hosted datastore, e.g. `https://xyz.supabase.co`.
    pub api_url: String,
    /// API key sent as both `apikey` and bearer token.
    pub api_key: String,
    /// Backend selection, `rest` by default.
    #[serde(default)]
    pub mode: StoreMode,
}

impl DatastoreConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "datastore".to_string(),
            name: "Datastore".to_string(),
        }
    }

    pub fn init(config: &Option<Self>) -> Result<Self> {
        let config = config.clone().unwrap_or_default();
        msg_print!(Message::ConfigModuleDatastore);
        Ok(Self {
            api_url: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptDatastoreUrl.to_string())
                .default(config.api_url)
                .interact_text()?,
            api_key: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptDatastoreKey.to_string())
                .default(config.api_key)
                .interact_text()?,
            mode: config.mode,
        })
    }
}

/// Builds the store selected by the configuration.
pub fn from_config(config: &Option<DatastoreConfig>) -> Result<Arc<dyn TodoStore>> {
    match config {
        Some(config) if config.mode == StoreMode::Memory => {
            Ok(Arc::new(memory::MemoryTodos::new()))
        }
        Some(config) if !config.api_url.is_empty() && !config.api_key.is_empty() => {
            Ok(Arc::new(rest::RestTodos::new(config)))
        }
        _ => msg_bail_anyhow!(Message::DatastoreNotConfigured),
    }
}
