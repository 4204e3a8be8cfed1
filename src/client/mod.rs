//! Client-side data layer for the todo list.
//!
//! This is the UI-toolkit-agnostic half of the browser view: an explicit
//! query cache with staleness tracking and refetch cancellation, an API
//! client matching the server's REST surface and a view-model that applies
//! the optimistic-update protocol (snapshot, optimistic write, reconcile
//! or roll back) for every mutation.

pub mod api;
pub mod query;
pub mod view;

pub use api::{ClientError, HttpTodoApi, TodoApi};
pub use query::{QueryCache, STALE_TIME, TODOS_KEY};
pub use view::{Notice, NoticeKind, TodoApp};
