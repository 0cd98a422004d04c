//! Local todo storage
//!
//! Todos kept for unauthenticated use. The whole list is stored as one
//! JSON array under `LOCAL_TODOS_KEY` and rewritten after every mutation.
//!
//! Each mutation re-reads the stored list first, so two processes sharing
//! a data directory apply their changes on top of each other instead of
//! overwriting with a stale copy.

use chrono::Utc;
use tracing::debug;

use crate::models::{normalize_description, Todo};
use crate::request::{TodoRequest, TodoResponse};
use crate::storage::{SharedStore, StorageError, StorageResult, LOCAL_TODOS_KEY};

/// Durable list of local todos
pub struct LocalTodoStore {
    store: SharedStore,
    todos: Vec<Todo>,
}

impl LocalTodoStore {
    /// Load the persisted list (empty when nothing was stored yet)
    ///
    /// Malformed JSON is reported as `StorageError::InvalidFormat`.
    pub fn load(store: SharedStore) -> StorageResult<Self> {
        let todos = read_todos(&store)?;
        debug!(count = todos.len(), "Loaded local todos");
        Ok(Self { store, todos })
    }

    /// Current items, in insertion order
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// Find an item by id
    pub fn get(&self, id: i64) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Re-read the persisted list, discarding the in-memory copy
    pub fn reload(&mut self) -> StorageResult<()> {
        self.todos = read_todos(&self.store)?;
        Ok(())
    }

    /// Append a new, not yet completed todo and persist the list
    pub fn add(&mut self, title: &str, description: &str) -> StorageResult<Todo> {
        self.reload()?;

        let id = self.next_id(Utc::now().timestamp_millis());
        let todo = Todo::new(id, title.trim(), Some(description.trim().to_string()));
        self.todos.push(todo.clone());
        self.persist()?;

        debug!(id, "Added local todo");
        Ok(todo)
    }

    /// Overwrite the completed flag of `id`
    ///
    /// Returns the updated item, or `None` (and writes nothing) when no
    /// item matches.
    pub fn set_completed(&mut self, id: i64, completed: bool) -> StorageResult<Option<Todo>> {
        self.reload()?;

        let Some(todo) = self.todos.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        todo.completed = completed;
        let updated = todo.clone();
        self.persist()?;

        debug!(id, completed, "Updated local todo");
        Ok(Some(updated))
    }

    /// Remove `id`; returns false (and writes nothing) when no item matches
    pub fn remove(&mut self, id: i64) -> StorageResult<bool> {
        self.reload()?;

        let before = self.todos.len();
        self.todos.retain(|t| t.id != id);
        if self.todos.len() == before {
            return Ok(false);
        }
        self.persist()?;

        debug!(id, "Removed local todo");
        Ok(true)
    }

    /// Apply a request immediately
    pub fn execute(&mut self, request: TodoRequest) -> StorageResult<TodoResponse> {
        let response = match request {
            TodoRequest::List => {
                self.reload()?;
                TodoResponse::Listed(self.todos.clone())
            }
            TodoRequest::Get { id } => {
                self.reload()?;
                TodoResponse::Fetched(self.get(id).cloned())
            }
            TodoRequest::Create { title, description } => {
                let description = normalize_description(description.as_deref()).unwrap_or_default();
                TodoResponse::Created(self.add(&title, &description)?)
            }
            TodoRequest::SetCompleted { id, completed } => TodoResponse::Updated {
                id,
                todo: self.set_completed(id, completed)?,
            },
            TodoRequest::Delete { id } => TodoResponse::Deleted {
                id,
                removed: self.remove(id)?,
            },
        };
        Ok(response)
    }

    /// Millisecond timestamp, bumped past every existing id
    fn next_id(&self, now_millis: i64) -> i64 {
        let max = self.todos.iter().map(|t| t.id).max().unwrap_or(i64::MIN);
        if now_millis > max {
            now_millis
        } else {
            max + 1
        }
    }

    /// Write the full list back
    fn persist(&self) -> StorageResult<()> {
        let json = serde_json::to_string(&self.todos).map_err(|source| StorageError::Encode {
            key: LOCAL_TODOS_KEY.to_string(),
            source,
        })?;
        self.store.set(LOCAL_TODOS_KEY, &json)
    }
}

fn read_todos(store: &SharedStore) -> StorageResult<Vec<Todo>> {
    let Some(json) = store.get(LOCAL_TODOS_KEY)? else {
        return Ok(Vec::new());
    };
    serde_json::from_str(&json).map_err(|e| StorageError::InvalidFormat {
        key: LOCAL_TODOS_KEY.to_string(),
        details: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, KeyValueStore, MemoryStore};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn empty_store() -> (Arc<MemoryStore>, LocalTodoStore) {
        let kv = Arc::new(MemoryStore::new());
        let local = LocalTodoStore::load(kv.clone()).unwrap();
        (kv, local)
    }

    fn stored(kv: &MemoryStore) -> Vec<Todo> {
        serde_json::from_str(&kv.get(LOCAL_TODOS_KEY).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn test_load_empty() {
        let (kv, local) = empty_store();
        assert!(local.todos().is_empty());
        // Loading alone writes nothing
        assert!(kv.is_empty());
    }

    #[test]
    fn test_add_toggle_delete_example() {
        let (kv, mut local) = empty_store();

        let todo = local.add("Buy milk", "").unwrap();
        assert_eq!(todo.title, "Buy milk");
        assert_eq!(todo.description.as_deref(), Some(""));
        assert!(!todo.completed);
        assert_eq!(stored(&kv), vec![todo.clone()]);

        let updated = local.set_completed(todo.id, true).unwrap().unwrap();
        assert!(updated.completed);
        assert!(stored(&kv)[0].completed);

        assert!(local.remove(todo.id).unwrap());
        assert!(local.todos().is_empty());
        assert!(stored(&kv).is_empty());
    }

    #[test]
    fn test_add_trims_input() {
        let (_kv, mut local) = empty_store();
        let todo = local.add("  Walk dog ", "  around the block ").unwrap();
        assert_eq!(todo.title, "Walk dog");
        assert_eq!(todo.description.as_deref(), Some("around the block"));
    }

    #[test]
    fn test_ids_are_unique() {
        let (_kv, mut local) = empty_store();
        let a = local.add("a", "").unwrap();
        let b = local.add("b", "").unwrap();
        let c = local.add("c", "").unwrap();
        assert!(a.id < b.id && b.id < c.id);
    }

    #[test]
    fn test_next_id_bumps_past_existing() {
        let (_kv, mut local) = empty_store();
        local.todos = vec![Todo::new(5_000, "future", None)];

        assert_eq!(local.next_id(1_000), 5_001);
        assert_eq!(local.next_id(9_000), 9_000);
    }

    #[test]
    fn test_toggle_only_touches_target() {
        let (_kv, mut local) = empty_store();
        let a = local.add("a", "").unwrap();
        let b = local.add("b", "").unwrap();

        local.set_completed(b.id, true).unwrap();

        let a_now = local.get(a.id).unwrap();
        let b_now = local.get(b.id).unwrap();
        assert!(!a_now.completed);
        assert_eq!(a_now.title, "a");
        assert!(b_now.completed);
        assert_eq!(b_now.title, "b");
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let (kv, mut local) = empty_store();
        let a = local.add("a", "").unwrap();
        let before = kv.get(LOCAL_TODOS_KEY).unwrap();

        assert!(local.set_completed(a.id + 1, true).unwrap().is_none());
        assert!(!local.remove(a.id + 1).unwrap());

        assert_eq!(local.todos(), &[a]);
        assert_eq!(kv.get(LOCAL_TODOS_KEY).unwrap(), before);
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let (_kv, mut local) = empty_store();
        let a = local.add("a", "").unwrap();
        let b = local.add("b", "").unwrap();

        assert!(local.remove(a.id).unwrap());
        assert_eq!(local.todos(), &[b]);
    }

    #[test]
    fn test_mutation_rebases_on_stored_list() {
        let kv: SharedStore = Arc::new(MemoryStore::new());
        let mut first = LocalTodoStore::load(kv.clone()).unwrap();
        let mut second = LocalTodoStore::load(kv.clone()).unwrap();

        first.add("from first", "").unwrap();
        second.add("from second", "").unwrap();

        let reloaded = LocalTodoStore::load(kv).unwrap();
        let titles: Vec<_> = reloaded.todos().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["from first", "from second"]);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(LOCAL_TODOS_KEY, "{not json").unwrap();

        let result = LocalTodoStore::load(kv);
        assert!(matches!(result, Err(StorageError::InvalidFormat { .. })));
    }

    #[test]
    fn test_execute_create_normalizes_description() {
        let (_kv, mut local) = empty_store();
        let response = local
            .execute(TodoRequest::Create {
                title: "Pay rent".to_string(),
                description: Some("   ".to_string()),
            })
            .unwrap();

        let TodoResponse::Created(todo) = response else {
            panic!("expected Created, got {:?}", response);
        };
        assert_eq!(todo.description.as_deref(), Some(""));
        assert_eq!(
            local.execute(TodoRequest::Get { id: todo.id }).unwrap(),
            TodoResponse::Fetched(Some(todo))
        );
    }

    #[test]
    fn test_persists_to_file_store() {
        let temp_dir = TempDir::new().unwrap();
        let kv: SharedStore = Arc::new(FileStore::open(temp_dir.path()).unwrap());

        let todo = LocalTodoStore::load(kv.clone())
            .unwrap()
            .add("Survives restart", "")
            .unwrap();

        let reopened: SharedStore = Arc::new(FileStore::open(temp_dir.path()).unwrap());
        let local = LocalTodoStore::load(reopened).unwrap();
        assert_eq!(local.todos(), &[todo]);
        assert!(temp_dir.path().join(LOCAL_TODOS_KEY).exists());
    }
}
