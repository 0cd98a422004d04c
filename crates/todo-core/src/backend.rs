//! Active todo backend
//!
//! Chosen once per session: the local store while signed out, the todo
//! service while signed in. Callers issue `TodoRequest`s and never check
//! which one is active.

use tracing::debug;

use crate::api::{HttpClient, TodoClient};
use crate::error::Result;
use crate::local::LocalTodoStore;
use crate::models::{Session, Todo};
use crate::request::{TodoRequest, TodoResponse};
use crate::storage::{SharedStore, StorageResult};

/// Todo service client plus the last known state of the remote list
///
/// The mirror only changes when the service confirms a request.
pub struct RemoteTodos {
    client: TodoClient,
    todos: Vec<Todo>,
}

impl RemoteTodos {
    pub fn new(client: TodoClient) -> Self {
        Self {
            client,
            todos: Vec::new(),
        }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// Fold a confirmed response into the mirror
    pub fn apply(&mut self, response: &TodoResponse) {
        match response {
            TodoResponse::Listed(todos) => self.todos = todos.clone(),
            TodoResponse::Fetched(Some(todo)) | TodoResponse::Updated { todo: Some(todo), .. } => {
                if let Some(existing) = self.todos.iter_mut().find(|t| t.id == todo.id) {
                    *existing = todo.clone();
                }
            }
            TodoResponse::Created(todo) => self.todos.push(todo.clone()),
            TodoResponse::Deleted { id, removed: true } => self.todos.retain(|t| t.id != *id),
            TodoResponse::Fetched(None)
            | TodoResponse::Updated { todo: None, .. }
            | TodoResponse::Deleted { removed: false, .. } => {}
        }
    }
}

/// Outcome of `TodoBackend::dispatch`
pub enum Dispatch {
    /// Finished in place (local backend)
    Applied(TodoResponse),
    /// Must be sent to the service; feed the response to `apply`
    Remote {
        client: TodoClient,
        request: TodoRequest,
    },
}

/// The todo list currently in use
pub enum TodoBackend {
    Local(LocalTodoStore),
    Remote(RemoteTodos),
}

impl TodoBackend {
    /// Local backend over the persisted list
    pub fn local(store: SharedStore) -> StorageResult<Self> {
        Ok(TodoBackend::Local(LocalTodoStore::load(store)?))
    }

    /// Remote backend for `session`, starting with an empty mirror
    pub fn remote(http: HttpClient, session: &Session) -> Self {
        TodoBackend::Remote(RemoteTodos::new(TodoClient::new(http, session)))
    }

    /// Items to render
    pub fn todos(&self) -> &[Todo] {
        match self {
            TodoBackend::Local(local) => local.todos(),
            TodoBackend::Remote(remote) => remote.todos(),
        }
    }

    pub fn get(&self, id: i64) -> Option<&Todo> {
        self.todos().iter().find(|t| t.id == id)
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, TodoBackend::Remote(_))
    }

    /// Run a request to completion
    pub async fn execute(&mut self, request: TodoRequest) -> Result<TodoResponse> {
        match self.dispatch(request)? {
            Dispatch::Applied(response) => Ok(response),
            Dispatch::Remote { client, request } => {
                let response = client.execute(request).await?;
                self.apply(&response);
                Ok(response)
            }
        }
    }

    /// Start a request without waiting on the network
    ///
    /// Local requests are applied immediately. Remote requests are handed
    /// back with a client clone so the caller can run them elsewhere.
    pub fn dispatch(&mut self, request: TodoRequest) -> StorageResult<Dispatch> {
        debug!(request = request.name(), remote = self.is_remote(), "Dispatching");
        match self {
            TodoBackend::Local(local) => Ok(Dispatch::Applied(local.execute(request)?)),
            TodoBackend::Remote(remote) => Ok(Dispatch::Remote {
                client: remote.client().clone(),
                request,
            }),
        }
    }

    /// Record a response produced by a remote dispatch
    ///
    /// The local backend already holds the result of its own requests.
    pub fn apply(&mut self, response: &TodoResponse) {
        if let TodoBackend::Remote(remote) = self {
            remote.apply(response);
        }
    }
}
