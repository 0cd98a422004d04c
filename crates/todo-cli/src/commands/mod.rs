//! Command handlers

pub mod auth;
pub mod config;
pub mod status;
pub mod todo;

use std::sync::Arc;

use anyhow::{Context, Result};
use todo_core::{Config, FileStore, HttpClient, SessionStore, SharedStore, TodoBackend};

const SESSION_HINT: &str = "The server rejected your session; run `todo logout` and log in again";

/// Open the data directory
fn open_store(config: &Config) -> Result<SharedStore> {
    let store = FileStore::open(config.data_dir.clone())
        .map_err(|e| explain(e.into()))
        .with_context(|| format!("Failed to open data directory {:?}", config.data_dir))?;
    Ok(Arc::new(store))
}

/// The backend for the current session: remote when logged in, else local
fn open_backend(config: &Config) -> Result<TodoBackend> {
    let store = open_store(config)?;
    let mut sessions = SessionStore::new(store.clone());

    let restored = sessions
        .restore()
        .map_err(|e| explain(e.into()))
        .context("Failed to read session")?;
    let backend = match restored {
        Some(session) => TodoBackend::remote(HttpClient::from_config(config)?, session),
        None => TodoBackend::local(store)
            .map_err(|e| explain(e.into()))
            .context("Failed to load local todos")?,
    };
    Ok(backend)
}

/// Attach what the user can do about an error, when there is something
///
/// A rejected session gets a logout hint; storage failures get their
/// recovery suggestion.
pub(crate) fn explain(err: todo_core::Error) -> anyhow::Error {
    let hint = match &err {
        todo_core::Error::Api(api) if api.is_unauthorized() => Some(SESSION_HINT),
        todo_core::Error::Storage(storage) => storage.recovery_suggestion(),
        _ => None,
    };

    let err = anyhow::Error::new(err);
    match hint {
        Some(hint) => err.context(hint),
        None => err,
    }
}
