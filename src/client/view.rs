//! View-model for the todo list.
//!
//! Holds the draft input, the inline-edit state and the connection to the
//! query cache, and applies the optimistic-update protocol for every
//! mutation: snapshot the cache and cancel the in-flight refetch (one
//! atomic step), apply the expected effect locally, then either reconcile
//! with the server payload or restore the snapshot. User-visible outcomes
//! are queued as notices for whatever front-end drains them.

use super::api::TodoApi;
use super::query::{QueryCache, STALE_TIME, TODOS_KEY};
use crate::libs::messages::Message;
use crate::libs::todo::{NewTodo, Todo, TodoPatch, TodoStats};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A queued toast-style notification.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: Message,
}

pub struct TodoApp {
    api: Arc<dyn TodoApi>,
    cache: QueryCache,
    /// Draft text of the new-task input.
    pub input_value: String,
    /// Row currently in inline-edit mode, if any.
    pub editing_id: Option<i64>,
    /// Staged text of the row being edited.
    pub editing_text: String,
    /// Whether an add request is pending. Not consulted internally;
    /// exposed for bindings that poll the view-model between turns and
    /// want to disable the input meanwhile.
    pub adding: bool,
    notices: Vec<Notice>,
}

impl TodoApp {
    /// Creates the view-model, seeding the cache from server-rendered
    /// initial data.
    pub fn new(api: Arc<dyn TodoApi>, initial: Vec<Todo>) -> Self {
        let cache = QueryCache::new();
        cache.hydrate(TODOS_KEY, initial);
        Self {
            api,
            cache,
            input_value: String::new(),
            editing_id: None,
            editing_text: String::new(),
            adding: false,
            notices: Vec::new(),
        }
    }

    /// The currently displayed collection.
    pub fn todos(&self) -> Vec<Todo> {
        self.cache.get(TODOS_KEY).unwrap_or_default()
    }

    /// Derived counts, recomputed from the cache on every call.
    pub fn stats(&self) -> TodoStats {
        TodoStats::of(&self.todos())
    }

    /// Handle to the shared query cache, for bindings that render from
    /// it directly. Clones share the same state.
    pub fn cache(&self) -> QueryCache {
        self.cache.clone()
    }

    pub fn set_input(&mut self, value: &str) {
        self.input_value = value.to_string();
    }

    /// Enters inline-edit mode for a row, staging its current text.
    pub fn start_edit(&mut self, id: i64) {
        if let Some(todo) = self.todos().into_iter().find(|t| t.id == id) {
            self.editing_id = Some(todo.id);
            self.editing_text = todo.text;
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing_id = None;
        self.editing_text.clear();
    }

    /// Drains the queued notices for display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Adds a todo from the draft input.
    ///
    /// The input is cleared immediately; on failure the collection is
    /// restored from the pre-mutation snapshot, on success the canonical
    /// record with its server-assigned id is appended once.
    pub async fn add(&mut self) {
        let text = self.input_value.trim().to_string();
        if text.is_empty() {
            return;
        }
        let snapshot = self.cache.prepare_mutation(TODOS_KEY);
        self.input_value.clear();
        self.adding = true;

        match self.api.create(NewTodo::new(&text)).await {
            Ok(created) => {
                let mut todos = self.todos();
                todos.push(created);
                self.cache.set(TODOS_KEY, todos);
                self.success(Message::TodoAdded);
            }
            Err(error) => {
                self.cache.set(TODOS_KEY, snapshot);
                self.error(Message::TodoAddFailed(error.to_string()));
            }
        }
        self.adding = false;
    }

    /// Flips `completed` optimistically and issues the update.
    pub async fn toggle(&mut self, id: i64) {
        let Some(mut todo) = self.todos().into_iter().find(|t| t.id == id) else {
            return;
        };
        todo.completed = !todo.completed;
        self.mutate_update(todo).await;
    }

    /// Saves the staged edit. Requires non-empty trimmed text and leaves
    /// edit mode only when the update succeeded.
    pub async fn save_edit(&mut self) {
        let Some(id) = self.editing_id else {
            return;
        };
        let text = self.editing_text.trim().to_string();
        if text.is_empty() {
            return;
        }
        let Some(mut todo) = self.todos().into_iter().find(|t| t.id == id) else {
            return;
        };
        todo.text = text;
        if self.mutate_update(todo).await {
            self.cancel_edit();
        }
    }

    /// Removes the row optimistically and issues the delete.
    pub async fn delete(&mut self, id: i64) {
        let snapshot = self.cache.prepare_mutation(TODOS_KEY);
        let todos = snapshot.iter().filter(|t| t.id != id).cloned().collect();
        self.cache.set(TODOS_KEY, todos);

        match self.api.delete(id).await {
            Ok(_) => self.success(Message::TodoDeleted),
            Err(error) => {
                self.cache.set(TODOS_KEY, snapshot);
                self.error(Message::TodoDeleteFailed(error.to_string()));
            }
        }
    }

    /// Marks the cached collection stale; the next [`Self::spawn_revalidate`]
    /// call will refetch.
    pub fn invalidate(&self) {
        self.cache.invalidate(TODOS_KEY);
    }

    /// Kicks off a background refetch when the cache is past its staleness
    /// window. The refetch is registered with the cache so that a mutation
    /// starting meanwhile cancels it and its response is discarded.
    pub fn spawn_revalidate(&self) {
        if !self.cache.is_stale(TODOS_KEY, STALE_TIME) {
            return;
        }
        let api = Arc::clone(&self.api);
        let cache = self.cache.clone();
        let epoch = cache.begin_refetch(TODOS_KEY);
        let task = tokio::spawn({
            let cache = cache.clone();
            async move {
                match api.list().await {
                    Ok(todos) => {
                        cache.complete_refetch(TODOS_KEY, epoch, todos);
                    }
                    Err(error) => {
                        tracing::debug!(%error, "background refetch failed");
                    }
                }
            }
        });
        cache.register_inflight(TODOS_KEY, epoch, task.abort_handle());
    }

    /// Foreground refresh used by the terminal client.
    pub async fn refresh(&mut self) {
        match self.api.list().await {
            Ok(todos) => self.cache.hydrate(TODOS_KEY, todos),
            Err(error) => self.error(Message::RefreshFailed(error.to_string())),
        }
    }

    /// Shared update path for toggle and edit: optimistic replace, then
    /// reconcile with the server payload or roll back. Returns whether the
    /// update succeeded.
    async fn mutate_update(&mut self, updated: Todo) -> bool {
        let snapshot = self.cache.prepare_mutation(TODOS_KEY);
        let optimistic = replace_by_id(&snapshot, &updated);
        self.cache.set(TODOS_KEY, optimistic);

        match self.api.update(updated.id, TodoPatch::from_todo(&updated)).await {
            Ok(envelope) => {
                if let Some(canonical) = envelope.data {
                    let reconciled = replace_by_id(&self.todos(), &canonical);
                    self.cache.set(TODOS_KEY, reconciled);
                }
                self.success(Message::TodoUpdated);
                true
            }
            Err(error) => {
                self.cache.set(TODOS_KEY, snapshot);
                self.error(Message::TodoUpdateFailed(error.to_string()));
                false
            }
        }
    }

    fn success(&mut self, message: Message) {
        self.notices.push(Notice {
            kind: NoticeKind::Success,
            message,
        });
    }

    fn error(&mut self, message: Message) {
        self.notices.push(Notice {
            kind: NoticeKind::Error,
            message,
        });
    }
}

fn replace_by_id(todos: &[Todo], updated: &Todo) -> Vec<Todo> {
    todos
        .iter()
        .map(|t| if t.id == updated.id { updated.clone() } else { t.clone() })
        .collect()
}
