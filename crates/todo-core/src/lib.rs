//! Todo Core Library
//!
//! Core functionality for `todo`, a terminal client for a todo service
//! with email/password accounts. Signed out, todos live in a local store
//! under the data directory; signed in, they live on the service.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut app = TodoApp::open(&config)?;
//!
//! app.login.email.set("me@example.com");
//! app.login.password.set("secret");
//! if let Some(task) = app.submit_login() {
//!     app.drive(task).await?;
//! }
//!
//! for todo in app.todos() {
//!     println!("{} {}", todo.id, todo.title);
//! }
//! ```
//!
//! # Modules
//!
//! - `view`: UI-agnostic view model (main entry point)
//! - `backend`: Local or remote todo list behind one request vocabulary
//! - `api`: Todo service HTTP clients
//! - `local`: Local todo store
//! - `session`: Bearer token persistence
//! - `storage`: Durable key-value storage
//! - `config`: Application configuration

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod local;
pub mod models;
pub mod request;
pub mod session;
pub mod storage;
pub mod validation;
pub mod view;

pub use api::{ApiError, AuthClient, HttpClient, TodoClient};
pub use backend::{Dispatch, TodoBackend};
pub use config::Config;
pub use error::Error;
pub use local::LocalTodoStore;
pub use models::{NewTodo, Session, Todo, TodoUpdate};
pub use request::{TodoRequest, TodoResponse};
pub use session::SessionStore;
pub use storage::{FileStore, KeyValueStore, MemoryStore, SharedStore, StorageError};
pub use validation::ValidationError;
pub use view::{Screen, Task, TaskResult, TodoApp};
