//! Error responses for the REST endpoints.
//!
//! Bodies follow the `{"error": "..."}` shape. Validation problems answer
//! with a client error status, a missing record answers 404 and datastore
//! failures answer 500 with the datastore message passed through.

use crate::datastore::DatastoreError;
use crate::libs::messages::Message;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// API error carrying the HTTP status and the response body.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: message.into(),
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<DatastoreError> for ApiError {
    fn from(error: DatastoreError) -> Self {
        match error {
            DatastoreError::NotFound(id) => {
                Self::not_found(Message::TodoNotFoundWithId(id).to_string())
            }
            DatastoreError::Transport(_) | DatastoreError::Unexpected { .. } => {
                tracing::error!(%error, "datastore request failed");
                Self::internal(error.to_string())
            }
        }
    }
}
