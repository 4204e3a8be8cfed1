use super::{DatastoreError, TodoStore};
use crate::libs::todo::{NewTodo, Todo, TodoPatch};
use async_trait::async_trait;
use parking_lot::Mutex;

/// In-process datastore backend.
///
/// Ids are assigned sequentially starting at 1, mirroring the hosted
/// store's identity column. Insertion order is preserved.
pub struct MemoryTodos {
    inner: Mutex<Inner>,
}

struct Inner {
    todos: Vec<Todo>,
    next_id: i64,
}

impl MemoryTodos {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                todos: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryTodos {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TodoStore for MemoryTodos {
    async fn select_all(&self) -> Result<Vec<Todo>, DatastoreError> {
        Ok(self.inner.lock().todos.clone())
    }

    async fn select_one(&self, id: i64) -> Result<Todo, DatastoreError> {
        self.inner
            .lock()
            .todos
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(DatastoreError::NotFound(id))
    }

    async fn insert(&self, new: NewTodo) -> Result<Todo, DatastoreError> {
        let mut inner = self.inner.lock();
        let todo = Todo {
            id: inner.next_id,
            text: new.text,
            completed: new.completed,
        };
        inner.next_id += 1;
        inner.todos.push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: i64, patch: TodoPatch) -> Result<Todo, DatastoreError> {
        let mut inner = self.inner.lock();
        let todo = inner
            .todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(DatastoreError::NotFound(id))?;
        if let Some(text) = patch.text {
            todo.text = text;
        }
        if let Some(completed) = patch.completed {
            todo.completed = completed;
        }
        Ok(todo.clone())
    }

    async fn delete(&self, id: i64) -> Result<Option<Todo>, DatastoreError> {
        let mut inner = self.inner.lock();
        let position = inner.todos.iter().position(|t| t.id == id);
        // Deleting a missing id is not an error; the hosted backend answers
        // success with an empty row set in that case.
        Ok(position.map(|index| inner.todos.remove(index)))
    }
}
