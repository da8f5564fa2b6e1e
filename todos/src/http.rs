//! REST implementation of [`TodoService`].
//!
//! | operation   | request                          |
//! |-------------|----------------------------------|
//! | `fetch_all` | `GET {base}/todos?userId={id}`   |
//! | `create`    | `POST {base}/todos`              |
//! | `update`    | `PATCH {base}/todos/{id}`        |
//! | `delete`    | `DELETE {base}/todos/{id}`       |
//!
//! Bodies are JSON with the API's field names (`userId`).

use crate::config::ClientConfig;
use crate::error::ServiceError;
use crate::service::TodoService;
use crate::types::{NewTodo, Todo, TodoId, UserId};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Todo service backed by a REST API
#[derive(Debug, Clone)]
pub struct HttpTodoService {
    http_client: Client,
    base_url: String,
}

impl HttpTodoService {
    /// Create a service for `base_url` with a per-request timeout
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Transport`] if the HTTP client cannot be built
    /// (for example when no TLS backend is available).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        Ok(Self::with_client(base_url, http_client))
    }

    /// Create a service around an existing HTTP client
    #[must_use]
    pub fn with_client(base_url: &str, http_client: Client) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a service from client configuration
    ///
    /// # Errors
    ///
    /// Same as [`HttpTodoService::new`].
    pub fn from_config(config: &ClientConfig) -> Result<Self, ServiceError> {
        Self::new(&config.api_url, config.request_timeout)
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn todos_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    fn todo_url(&self, id: TodoId) -> String {
        format!("{}/todos/{id}", self.base_url)
    }
}

impl TodoService for HttpTodoService {
    async fn fetch_all(&self, user_id: UserId) -> Result<Vec<Todo>, ServiceError> {
        tracing::debug!(%user_id, "Fetching todos");

        let response = self
            .http_client
            .get(self.todos_url())
            .query(&[("userId", user_id.value())])
            .send()
            .await
            .map_err(transport)?;

        decode(ensure_success(response).await?).await
    }

    async fn create(&self, todo: NewTodo) -> Result<Todo, ServiceError> {
        tracing::debug!(title = %todo.title, "Creating todo");

        let response = self
            .http_client
            .post(self.todos_url())
            .json(&todo)
            .send()
            .await
            .map_err(transport)?;

        decode(ensure_success(response).await?).await
    }

    async fn update(&self, todo: Todo) -> Result<Todo, ServiceError> {
        tracing::debug!(id = %todo.id, "Updating todo");

        let response = self
            .http_client
            .patch(self.todo_url(todo.id))
            .json(&todo)
            .send()
            .await
            .map_err(transport)?;

        decode(ensure_success(response).await?).await
    }

    async fn delete(&self, id: TodoId) -> Result<(), ServiceError> {
        tracing::debug!(%id, "Deleting todo");

        let response = self
            .http_client
            .delete(self.todo_url(id))
            .send()
            .await
            .map_err(transport)?;

        ensure_success(response).await.map(|_| ())
    }
}

#[allow(clippy::needless_pass_by_value)] // Used with map_err
fn transport(error: reqwest::Error) -> ServiceError {
    ServiceError::Transport(error.to_string())
}

/// Turn a non-2xx response into [`ServiceError::Status`]
async fn ensure_success(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("unknown status").to_string()
    } else {
        body
    };

    tracing::warn!(status = status.as_u16(), %message, "Todo API request failed");
    Err(ServiceError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let body = response.bytes().await.map_err(transport)?;
    serde_json::from_slice(&body).map_err(|e| ServiceError::Decode(e.to_string()))
}
