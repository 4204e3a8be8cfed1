use crate::libs::todo::{Envelope, NewTodo, Todo, TodoPatch};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};

/// Errors surfaced by the client-side API calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered {0}")]
    Status(StatusCode),
}

/// The REST surface of the application as seen by a client.
///
/// The view-model only talks to this trait; tests substitute a fake
/// implementation to simulate failures and slow responses.
#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Todo>, ClientError>;
    async fn get(&self, id: i64) -> Result<Todo, ClientError>;
    async fn create(&self, new: NewTodo) -> Result<Todo, ClientError>;
    async fn update(&self, id: i64, patch: TodoPatch) -> Result<Envelope, ClientError>;
    async fn delete(&self, id: i64) -> Result<Envelope, ClientError>;
}

/// API client issuing requests against the app's public base URL.
///
/// Used by the terminal client and by the server-rendered pages for their
/// self-referential fetches.
#[derive(Clone)]
pub struct HttpTodoApi {
    client: Client,
    base_url: String,
}

impl HttpTodoApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn check(response: Response) -> Result<Response, ClientError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ClientError::Status(response.status()))
        }
    }
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    async fn list(&self) -> Result<Vec<Todo>, ClientError> {
        let response = self.client.get(self.url("/api/todos")).send().await?;
        Ok(Self::check(response)?.json().await?)
    }

    async fn get(&self, id: i64) -> Result<Todo, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/api/todos/{}", id)))
            .send()
            .await?;
        Ok(Self::check(response)?.json().await?)
    }

    async fn create(&self, new: NewTodo) -> Result<Todo, ClientError> {
        let response = self
            .client
            .post(self.url("/api/todos"))
            .json(&new)
            .send()
            .await?;
        Ok(Self::check(response)?.json().await?)
    }

    async fn update(&self, id: i64, patch: TodoPatch) -> Result<Envelope, ClientError> {
        let response = self
            .client
            .patch(self.url(&format!("/api/todos/{}", id)))
            .json(&patch)
            .send()
            .await?;
        Ok(Self::check(response)?.json().await?)
    }

    async fn delete(&self, id: i64) -> Result<Envelope, ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/todos/{}", id)))
            .send()
            .await?;
        Ok(Self::check(response)?.json().await?)
    }
}
