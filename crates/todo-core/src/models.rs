//! Data models for todo
//!
//! Defines the todo item, the request payloads sent to the todo service,
//! and the session holding the bearer token.

use serde::{Deserialize, Serialize};

/// A todo item
///
/// Remote todos are numbered by the service; local todos use a
/// client-side millisecond timestamp. The two are never mixed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    /// Identifier, unique within its store
    pub id: i64,
    /// Title (never empty)
    pub title: String,
    /// Optional longer description
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the item is done
    #[serde(default)]
    pub completed: bool,
    /// Owning user, as reported by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
}

impl Todo {
    /// Create a new, not yet completed todo
    pub fn new(id: i64, title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description,
            completed: false,
            owner_id: None,
        }
    }

    /// Description, if present and not blank
    pub fn description_text(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

/// Payload for creating a todo on the service
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewTodo {
    /// Build a payload, dropping an empty or whitespace-only description
    pub fn new(title: impl Into<String>, description: Option<&str>) -> Self {
        Self {
            title: title.into(),
            description: normalize_description(description),
        }
    }
}

/// Partial update payload; only the completed flag is ever sent
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct TodoUpdate {
    pub completed: bool,
}

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Opaque bearer token
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Trim a description, mapping blank input to `None`
pub fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}
