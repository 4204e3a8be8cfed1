//! REST handlers for the `todos` resource.
//!
//! Collection endpoint: `GET`/`POST /api/todos`. Item endpoint:
//! `GET`/`PATCH`/`DELETE /api/todos/{id}`. Unsupported methods fall
//! through to axum's method fallback, which answers 405 with an `Allow`
//! header listing the supported verbs.

use super::{error::ApiError, AppState};
use crate::libs::todo::{Envelope, NewTodo, Todo, TodoPatch};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// `GET /api/todos` - returns the whole collection, unordered.
pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state.store.select_all().await?;
    Ok(Json(todos))
}

/// `POST /api/todos` - inserts a record and returns it with its
/// server-assigned id. Missing or empty `text` is a validation error.
pub async fn create_todo(
    State(state): State<AppState>,
    Json(new): Json<NewTodo>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    if new.text.trim().is_empty() {
        return Err(ApiError::bad_request("'text' is required."));
    }
    let created = state.store.insert(new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/todos/{id}` - fetches one record by id.
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    let todo = state.store.select_one(id).await?;
    Ok(Json(todo))
}

/// `PATCH /api/todos/{id}` - partial update of `text`/`completed`,
/// answered with the updated record in a success envelope.
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<TodoPatch>,
) -> Result<Json<Envelope>, ApiError> {
    let id = parse_id(&id)?;
    if let Some(text) = &patch.text {
        if text.trim().is_empty() {
            return Err(ApiError::bad_request("'text' is required."));
        }
    }
    let updated = state.store.update(id, patch).await?;
    Ok(Json(Envelope {
        success: true,
        data: Some(updated),
    }))
}

/// `DELETE /api/todos/{id}` - removes the record. The `data` field of the
/// envelope is present only when the backend reports the deleted row.
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let id = parse_id(&id)?;
    let deleted = state.store.delete(id).await?;
    Ok(Json(Envelope {
        success: true,
        data: deleted,
    }))
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request("Todo 'id' is required."))
}
