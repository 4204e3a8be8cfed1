use serde::{Deserialize, Serialize};

/// A single task record as stored in the `todos` table.
///
/// The `id` is assigned by the datastore on insert and never changes
/// afterwards. `text` must be non-empty; this is enforced both by the
/// create endpoint and by the client view before a mutation is issued.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub text: String,
    pub completed: bool,
}

/// Payload for creating a todo. `completed` defaults to `false` when absent.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewTodo {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl NewTodo {
    pub fn new(text: &str) -> Self {
        NewTodo {
            text: text.to_string(),
            completed: false,
        }
    }
}

/// Partial update of a todo. Absent fields are left untouched.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Full-record patch, used by the client for toggle and edit so the
    /// update path is identical for both operations.
    pub fn from_todo(todo: &Todo) -> Self {
        TodoPatch {
            text: Some(todo.text.clone()),
            completed: Some(todo.completed),
        }
    }
}

/// Success envelope returned by the update and delete endpoints.
///
/// `data` is optional: depending on backend configuration a delete may not
/// return the removed row.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Todo>,
}

/// Derived display values for the task list, recomputed on every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
}

impl TodoStats {
    pub fn of(todos: &[Todo]) -> Self {
        let completed = todos.iter().filter(|t| t.completed).count();
        TodoStats {
            total: todos.len(),
            completed,
            remaining: todos.len() - completed,
        }
    }
}
