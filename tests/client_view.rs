//! View-model tests for the optimistic-update protocol, run against a
//! fake API with failure and delay injection.

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tudu::client::{ClientError, NoticeKind, TodoApi, TodoApp, TODOS_KEY};
use tudu::libs::todo::{Envelope, NewTodo, Todo, TodoPatch};

fn todo(id: i64, text: &str, completed: bool) -> Todo {
    Todo {
        id,
        text: text.to_string(),
        completed,
    }
}

/// Fake server with switchable failures and a configurable list delay.
#[derive(Default)]
struct FakeApi {
    todos: Mutex<Vec<Todo>>,
    next_id: Mutex<i64>,
    fail_create: AtomicBool,
    fail_update: AtomicBool,
    fail_delete: AtomicBool,
    list_delay: Mutex<Option<Duration>>,
    delete_delay: Mutex<Option<Duration>>,
}

impl FakeApi {
    fn with_todos(todos: Vec<Todo>) -> Arc<Self> {
        let next_id = todos.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        Arc::new(Self {
            todos: Mutex::new(todos),
            next_id: Mutex::new(next_id),
            ..Self::default()
        })
    }

    fn server_error() -> ClientError {
        ClientError::Status(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

#[async_trait]
impl TodoApi for FakeApi {
    async fn list(&self) -> Result<Vec<Todo>, ClientError> {
        // Snapshot before the delay: the response carries the state from
        // when the request started, like a real in-flight response would.
        let snapshot = self.todos.lock().clone();
        let delay = *self.list_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(snapshot)
    }

    async fn get(&self, id: i64) -> Result<Todo, ClientError> {
        self.todos
            .lock()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(ClientError::Status(StatusCode::NOT_FOUND))
    }

    async fn create(&self, new: NewTodo) -> Result<Todo, ClientError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Self::server_error());
        }
        let mut next_id = self.next_id.lock();
        let created = todo(*next_id, &new.text, new.completed);
        *next_id += 1;
        self.todos.lock().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, patch: TodoPatch) -> Result<Envelope, ClientError> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(Self::server_error());
        }
        let mut todos = self.todos.lock();
        let record = todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ClientError::Status(StatusCode::NOT_FOUND))?;
        if let Some(text) = patch.text {
            record.text = text;
        }
        if let Some(completed) = patch.completed {
            record.completed = completed;
        }
        Ok(Envelope {
            success: true,
            data: Some(record.clone()),
        })
    }

    async fn delete(&self, id: i64) -> Result<Envelope, ClientError> {
        let delay = *self.delete_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Self::server_error());
        }
        let mut todos = self.todos.lock();
        let position = todos.iter().position(|t| t.id == id);
        Ok(Envelope {
            success: true,
            data: position.map(|index| todos.remove(index)),
        })
    }
}

fn has_error_notice(app: &mut TodoApp) -> bool {
    app.take_notices()
        .iter()
        .any(|n| n.kind == NoticeKind::Error)
}

#[tokio::test]
async fn add_clears_input_and_appends_canonical_record() {
    let api = FakeApi::with_todos(vec![todo(1, "existing", false)]);
    let mut app = TodoApp::new(api, vec![todo(1, "existing", false)]);

    app.set_input("  Buy milk  ");
    app.add().await;

    assert_eq!(app.input_value, "");
    let todos = app.todos();
    assert_eq!(todos.len(), 2);
    // Canonical record, appended exactly once, with the trimmed text and
    // the server-assigned id.
    assert_eq!(todos[1].text, "Buy milk");
    assert_eq!(todos[1].id, 2);
    assert!(!has_error_notice(&mut app));
}

#[tokio::test]
async fn add_failure_restores_the_previous_list() {
    let initial = vec![todo(1, "existing", false)];
    let api = FakeApi::with_todos(initial.clone());
    api.fail_create.store(true, Ordering::SeqCst);
    let mut app = TodoApp::new(api, initial.clone());

    app.set_input("Buy milk");
    app.add().await;

    // Input is still cleared (optimistic feedback), but the displayed
    // list is fully restored with no partial entry.
    assert_eq!(app.input_value, "");
    assert_eq!(app.todos(), initial);
    assert!(has_error_notice(&mut app));
}

#[tokio::test]
async fn adding_flag_resets_after_the_request_settles() {
    let api = FakeApi::with_todos(vec![]);
    api.fail_create.store(true, Ordering::SeqCst);
    let mut app = TodoApp::new(Arc::clone(&api) as Arc<dyn TodoApi>, vec![]);

    app.set_input("first");
    app.add().await;
    assert!(!app.adding);

    api.fail_create.store(false, Ordering::SeqCst);
    app.set_input("second");
    app.add().await;
    assert!(!app.adding);
}

#[tokio::test]
async fn add_ignores_blank_input() {
    let api = FakeApi::with_todos(vec![]);
    let mut app = TodoApp::new(api, vec![]);

    app.set_input("   ");
    app.add().await;

    assert!(app.todos().is_empty());
    assert!(app.take_notices().is_empty());
}

#[tokio::test]
async fn toggle_reconciles_with_server_payload() {
    let api = FakeApi::with_todos(vec![todo(1, "task", false)]);
    let mut app = TodoApp::new(api, vec![todo(1, "task", false)]);

    app.toggle(1).await;

    let todos = app.todos();
    assert!(todos[0].completed);
    assert_eq!(todos[0].text, "task");
}

#[tokio::test]
async fn toggle_failure_rolls_back_the_flip() {
    let api = FakeApi::with_todos(vec![todo(1, "task", false)]);
    api.fail_update.store(true, Ordering::SeqCst);
    let mut app = TodoApp::new(api, vec![todo(1, "task", false)]);

    app.toggle(1).await;

    assert!(!app.todos()[0].completed);
    assert!(has_error_notice(&mut app));
}

#[tokio::test]
async fn save_edit_exits_edit_mode_only_on_success() {
    let api = FakeApi::with_todos(vec![todo(1, "old text", false)]);
    api.fail_update.store(true, Ordering::SeqCst);
    let mut app = TodoApp::new(Arc::clone(&api) as Arc<dyn TodoApi>, vec![todo(1, "old text", false)]);

    app.start_edit(1);
    assert_eq!(app.editing_text, "old text");
    app.editing_text = "new text".to_string();
    app.save_edit().await;

    // Failure: still in edit mode, text rolled back.
    assert_eq!(app.editing_id, Some(1));
    assert_eq!(app.todos()[0].text, "old text");
    assert!(has_error_notice(&mut app));

    api.fail_update.store(false, Ordering::SeqCst);
    app.save_edit().await;

    assert_eq!(app.editing_id, None);
    assert_eq!(app.todos()[0].text, "new text");
}

#[tokio::test]
async fn save_edit_requires_non_empty_trimmed_text() {
    let api = FakeApi::with_todos(vec![todo(1, "keep", false)]);
    let mut app = TodoApp::new(api, vec![todo(1, "keep", false)]);

    app.start_edit(1);
    app.editing_text = "   ".to_string();
    app.save_edit().await;

    assert_eq!(app.editing_id, Some(1));
    assert_eq!(app.todos()[0].text, "keep");
}

#[tokio::test]
async fn delete_is_optimistic_and_rolls_back_on_failure() {
    let initial = vec![todo(1, "a", false), todo(2, "b", false)];
    let api = FakeApi::with_todos(initial.clone());
    api.fail_delete.store(true, Ordering::SeqCst);
    let mut app = TodoApp::new(api, initial.clone());

    app.delete(2).await;

    // The row reappears and an error notice is queued.
    assert_eq!(app.todos(), initial);
    assert!(has_error_notice(&mut app));
}

#[tokio::test]
async fn delete_removes_the_row_before_the_request_resolves() {
    let api = FakeApi::with_todos(vec![todo(1, "a", false), todo(2, "b", false)]);
    *api.delete_delay.lock() = Some(Duration::from_millis(100));
    let mut app = TodoApp::new(
        Arc::clone(&api) as Arc<dyn TodoApi>,
        vec![todo(1, "a", false), todo(2, "b", false)],
    );
    let cache = app.cache();

    {
        let delete = app.delete(2);
        tokio::pin!(delete);

        // While the request is still in flight the row is already gone from
        // the rendered collection.
        tokio::select! {
            _ = &mut delete => panic!("delete resolved before the injected delay"),
            _ = tokio::time::sleep(Duration::from_millis(10)) => {}
        }
        let pending = cache.get(TODOS_KEY).unwrap();
        assert!(pending.iter().all(|t| t.id != 2));

        delete.await;
    }
    assert_eq!(app.todos().len(), 1);
    assert!(!has_error_notice(&mut app));
}

#[tokio::test]
async fn delete_succeeds_and_row_stays_gone() {
    let api = FakeApi::with_todos(vec![todo(1, "a", false), todo(2, "b", false)]);
    let mut app = TodoApp::new(api, vec![todo(1, "a", false), todo(2, "b", false)]);

    app.delete(2).await;

    assert_eq!(app.todos().len(), 1);
    assert_eq!(app.todos()[0].id, 1);
    assert!(!has_error_notice(&mut app));
}

#[tokio::test]
async fn stats_follow_the_cached_collection() {
    let api = FakeApi::with_todos(vec![]);
    let mut app = TodoApp::new(
        api,
        vec![todo(1, "a", true), todo(2, "b", false), todo(3, "c", false)],
    );

    let stats = app.stats();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.remaining, 2);

    app.delete(3).await;
    assert_eq!(app.stats().total, 2);
}

#[tokio::test]
async fn inflight_refetch_cannot_resurrect_a_deleted_row() {
    let server_side = vec![todo(1, "a", false), todo(2, "b", false), todo(3, "c", false)];
    let api = FakeApi::with_todos(server_side.clone());
    *api.list_delay.lock() = Some(Duration::from_millis(100));
    let mut app = TodoApp::new(Arc::clone(&api) as Arc<dyn TodoApi>, server_side);

    // A background refetch is in flight...
    app.invalidate();
    app.spawn_revalidate();
    tokio::time::sleep(Duration::from_millis(10)).await;

    // ...when a delete for id 3 is issued. The snapshot-and-cancel step
    // must discard the refetch so its stale payload cannot clobber the
    // optimistic removal.
    app.delete(3).await;
    assert!(app.todos().iter().all(|t| t.id != 3));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(
        app.todos().iter().all(|t| t.id != 3),
        "stale refetch resurrected a deleted row"
    );
}
