//! Todo collection client
//!
//! Every call carries the session token as a bearer credential. Failures
//! are reported with a fixed message per operation; the service's own
//! error body is logged but not surfaced.

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{ApiError, HttpClient, TODOS_PATH};
use crate::models::{NewTodo, Session, Todo, TodoUpdate};
use crate::request::{TodoRequest, TodoResponse};

pub const FETCH_FAILED: &str = "Failed to fetch todos";
pub const FETCH_ONE_FAILED: &str = "Failed to fetch todo";
pub const CREATE_FAILED: &str = "Failed to create todo";
pub const UPDATE_FAILED: &str = "Failed to update todo";
pub const DELETE_FAILED: &str = "Failed to delete todo";

/// Authenticated client for the todo collection
///
/// Only constructible from a `Session`, so there is no unauthenticated
/// call path.
#[derive(Debug, Clone)]
pub struct TodoClient {
    http: HttpClient,
    token: String,
}

impl TodoClient {
    pub fn new(http: HttpClient, session: &Session) -> Self {
        Self {
            http,
            token: session.token().to_string(),
        }
    }

    /// All todos owned by the session's user
    pub async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let request = self.http.client().get(self.http.url(TODOS_PATH));
        let response = self.send(request, FETCH_FAILED).await?;
        let todos: Vec<Todo> = decode(response).await?;
        debug!(count = todos.len(), "Fetched todos");
        Ok(todos)
    }

    /// A single todo; `None` when the service does not know it
    pub async fn get(&self, id: i64) -> Result<Option<Todo>, ApiError> {
        let request = self.http.client().get(self.item_url(id));
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(ApiError::from)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check(response, FETCH_ONE_FAILED).await?;
        decode(response).await.map(Some)
    }

    /// Create a todo; a blank description is left out of the payload
    pub async fn create(&self, title: &str, description: Option<&str>) -> Result<Todo, ApiError> {
        let payload = NewTodo::new(title, description);
        let request = self
            .http
            .client()
            .post(self.http.url(TODOS_PATH))
            .json(&payload);
        let response = self.send(request, CREATE_FAILED).await?;
        let todo: Todo = decode(response).await?;
        debug!(id = todo.id, "Created todo");
        Ok(todo)
    }

    /// Send a partial update of the completed flag
    pub async fn update(&self, id: i64, completed: bool) -> Result<Todo, ApiError> {
        let request = self
            .http
            .client()
            .put(self.item_url(id))
            .json(&TodoUpdate { completed });
        let response = self.send(request, UPDATE_FAILED).await?;
        decode(response).await
    }

    /// Remove a todo; any response body is ignored
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let request = self.http.client().delete(self.item_url(id));
        self.send(request, DELETE_FAILED).await?;
        debug!(id, "Deleted todo");
        Ok(())
    }

    /// Run a request against the service
    pub async fn execute(&self, request: TodoRequest) -> Result<TodoResponse, ApiError> {
        let response = match request {
            TodoRequest::List => TodoResponse::Listed(self.list().await?),
            TodoRequest::Get { id } => TodoResponse::Fetched(self.get(id).await?),
            TodoRequest::Create { title, description } => {
                TodoResponse::Created(self.create(&title, description.as_deref()).await?)
            }
            TodoRequest::SetCompleted { id, completed } => TodoResponse::Updated {
                id,
                todo: Some(self.update(id, completed).await?),
            },
            TodoRequest::Delete { id } => {
                self.delete(id).await?;
                TodoResponse::Deleted { id, removed: true }
            }
        };
        Ok(response)
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}{}", self.http.url(TODOS_PATH), id)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.token)
    }

    async fn send(&self, request: RequestBuilder, failure: &str) -> Result<Response, ApiError> {
        let response = self.authorized(request).send().await?;
        check(response, failure).await
    }
}

/// Map a non-success response to the operation's fixed message
async fn check(response: Response, failure: &str) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), body = %body, "{}", failure);
    Err(ApiError::rejected(status, failure))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}
