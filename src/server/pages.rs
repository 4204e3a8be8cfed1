//! Server-rendered pages.
//!
//! Both pages fetch through the app's own REST API via the public base
//! URL, exactly like a browser client would, and degrade gracefully: the
//! list page falls back to an empty collection, the detail page renders a
//! "not found" card instead of propagating the error. The list page embeds
//! the fetched collection as JSON so a client view can hydrate without an
//! immediate refetch.

use super::AppState;
use crate::client::TodoApi;
use crate::libs::todo::{Todo, TodoStats};
use axum::{
    extract::{Path, State},
    response::Html,
};

/// `GET /` - the task list.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let todos = match state.api.list().await {
        Ok(todos) => todos,
        Err(error) => {
            tracing::warn!(%error, "failed to fetch todos for the list page");
            Vec::new()
        }
    };
    Html(render_index(&todos))
}

/// `GET /todo/{id}` - read-only detail card for one task.
pub async fn todo_detail(State(state): State<AppState>, Path(id): Path<String>) -> Html<String> {
    let todo = match id.parse::<i64>() {
        Ok(id) => state.api.get(id).await.ok(),
        Err(_) => None,
    };
    match todo {
        Some(todo) => Html(render_detail(&todo)),
        None => Html(render_not_found()),
    }
}

fn render_index(todos: &[Todo]) -> String {
    let stats = TodoStats::of(todos);
    let rows = if todos.is_empty() {
        "<li class=\"empty\">no todos yet!</li>".to_string()
    } else {
        todos.iter().map(render_row).collect::<Vec<_>>().join("\n")
    };
    let initial_state = serde_json::to_string(todos)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/");

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>todos</title>
</head>
<body>
<main>
<h1>todos</h1>
<p>get things done, no cap</p>
<section class="stats">
<span>{total} total tasks</span>
<span>{completed} completed</span>
<span>{remaining} remaining</span>
</section>
<ul class="todos">
{rows}
</ul>
</main>
<script id="__TUDU_STATE__" type="application/json">{initial_state}</script>
</body>
</html>
"#,
        total = stats.total,
        completed = stats.completed,
        remaining = stats.remaining,
        rows = rows,
        initial_state = initial_state,
    )
}

fn render_row(todo: &Todo) -> String {
    let class = if todo.completed { "todo done" } else { "todo" };
    let mark = if todo.completed { "✔" } else { "○" };
    format!(
        r#"<li class="{class}"><span class="mark">{mark}</span> <span class="text">{text}</span> <a href="/todo/{id}">View</a></li>"#,
        class = class,
        mark = mark,
        text = escape(&todo.text),
        id = todo.id,
    )
}

fn render_detail(todo: &Todo) -> String {
    let status = if todo.completed { "Completed" } else { "Pending" };
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Todo Details</title>
</head>
<body>
<main>
<h1>Todo Details</h1>
<p>See your task in detail</p>
<article class="card">
<p class="text">{text}</p>
<p><span class="badge">{status}</span> <span class="badge">ID: {id}</span></p>
</article>
</main>
</body>
</html>
"#,
        text = escape(&todo.text),
        status = status,
        id = todo.id,
    )
}

fn render_not_found() -> String {
    r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Todo Details</title>
</head>
<body>
<main>
<p>Todo not found</p>
</main>
</body>
</html>
"#
    .to_string()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
