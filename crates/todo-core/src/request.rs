//! Todo operations shared by the local store and the todo service
//!
//! Both backends speak the same request vocabulary, so the view layer and
//! the CLI never branch on where a list lives.

use crate::models::Todo;

/// An operation against the active todo list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoRequest {
    /// Fetch the whole list
    List,
    /// Fetch a single item
    Get { id: i64 },
    /// Create an item
    Create {
        title: String,
        description: Option<String>,
    },
    /// Overwrite the completed flag
    SetCompleted { id: i64, completed: bool },
    /// Remove an item
    Delete { id: i64 },
}

impl TodoRequest {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            TodoRequest::List => "list",
            TodoRequest::Get { .. } => "get",
            TodoRequest::Create { .. } => "create",
            TodoRequest::SetCompleted { .. } => "set_completed",
            TodoRequest::Delete { .. } => "delete",
        }
    }

}

/// Result of a successful `TodoRequest`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoResponse {
    /// Full list
    Listed(Vec<Todo>),
    /// Single item, `None` when it does not exist
    Fetched(Option<Todo>),
    /// Newly created item
    Created(Todo),
    /// Item after the update, `None` when it did not exist
    Updated { id: i64, todo: Option<Todo> },
    /// Removal finished; `removed` is false when nothing matched
    Deleted { id: i64, removed: bool },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(TodoRequest::List.name(), "list");
        assert_eq!(TodoRequest::Delete { id: 1 }.name(), "delete");
        assert_eq!(
            TodoRequest::SetCompleted {
                id: 1,
                completed: true
            }
            .name(),
            "set_completed"
        );
        assert_eq!(
            TodoRequest::Create {
                title: "t".into(),
                description: None
            }
            .name(),
            "create"
        );
    }
}
