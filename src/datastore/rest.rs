use super::{DatastoreConfig, DatastoreError, TodoStore};
use crate::libs::todo::{NewTodo, Todo, TodoPatch};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    Client, Response, StatusCode,
};

const TABLE_PATH: &str = "rest/v1/todos";
/// PostgREST media type for "exactly one row"; a filter matching zero rows
/// then answers 406, which is how a missing record is detected.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Client for the hosted datastore's REST interface.
///
/// Wraps the endpoint/key credentials and a shared, stateless
/// `reqwest::Client` reused across all requests.
pub struct RestTodos {
    client: Client,
    config: DatastoreConfig,
}

impl RestTodos {
    pub fn new(config: &DatastoreConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), TABLE_PATH)
    }

    fn headers(&self) -> Result<HeaderMap, DatastoreError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.config.api_key)
            .map_err(|_| DatastoreError::Unexpected {
                status: StatusCode::BAD_REQUEST,
                body: "api key is not a valid header value".to_string(),
            })?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.config.api_key))
            .map_err(|_| DatastoreError::Unexpected {
                status: StatusCode::BAD_REQUEST,
                body: "api key is not a valid header value".to_string(),
            })?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }

    async fn check(response: Response, id: Option<i64>) -> Result<Response, DatastoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        // 406 with the single-object Accept header means the row filter
        // matched nothing.
        if status == StatusCode::NOT_ACCEPTABLE {
            if let Some(id) = id {
                return Err(DatastoreError::NotFound(id));
            }
        }
        let body = response.text().await.unwrap_or_default();
        Err(DatastoreError::Unexpected { status, body })
    }
}

#[async_trait]
impl TodoStore for RestTodos {
    async fn select_all(&self) -> Result<Vec<Todo>, DatastoreError> {
        let response = self
            .client
            .get(format!("{}?select=*", self.table_url()))
            .headers(self.headers()?)
            .send()
            .await?;
        let response = Self::check(response, None).await?;
        Ok(response.json::<Vec<Todo>>().await?)
    }

    async fn select_one(&self, id: i64) -> Result<Todo, DatastoreError> {
        let mut headers = self.headers()?;
        headers.insert(ACCEPT, HeaderValue::from_static(SINGLE_OBJECT));
        let response = self
            .client
            .get(format!("{}?id=eq.{}&select=*", self.table_url(), id))
            .headers(headers)
            .send()
            .await?;
        let response = Self::check(response, Some(id)).await?;
        Ok(response.json::<Todo>().await?)
    }

    async fn insert(&self, new: NewTodo) -> Result<Todo, DatastoreError> {
        let mut headers = self.headers()?;
        headers.insert(ACCEPT, HeaderValue::from_static(SINGLE_OBJECT));
        headers.insert("Prefer", HeaderValue::from_static(RETURN_REPRESENTATION));
        let response = self
            .client
            .post(self.table_url())
            .headers(headers)
            .json(&vec![new])
            .send()
            .await?;
        let response = Self::check(response, None).await?;
        Ok(response.json::<Todo>().await?)
    }

    async fn update(&self, id: i64, patch: TodoPatch) -> Result<Todo, DatastoreError> {
        let mut headers = self.headers()?;
        headers.insert(ACCEPT, HeaderValue::from_static(SINGLE_OBJECT));
        headers.insert("Prefer", HeaderValue::from_static(RETURN_REPRESENTATION));
        let response = self
            .client
            .patch(format!("{}?id=eq.{}", self.table_url(), id))
            .headers(headers)
            .json(&patch)
            .send()
            .await?;
        let response = Self::check(response, Some(id)).await?;
        Ok(response.json::<Todo>().await?)
    }

    async fn delete(&self, id: i64) -> Result<Option<Todo>, DatastoreError> {
        let mut headers = self.headers()?;
        headers.insert("Prefer", HeaderValue::from_static(RETURN_REPRESENTATION));
        let response = self
            .client
            .delete(format!("{}?id=eq.{}", self.table_url(), id))
            .headers(headers)
            .send()
            .await?;
        let response = Self::check(response, Some(id)).await?;
        // The backend answers with the deleted rows; an empty list means
        // the id matched nothing, which the delete contract tolerates.
        let mut rows = response.json::<Vec<Todo>>().await?;
        Ok(rows.pop())
    }
}
