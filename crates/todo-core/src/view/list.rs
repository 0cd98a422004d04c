//! Todo list view state

use std::collections::HashSet;

/// Selection, loading and error state for the rendered list
#[derive(Debug, Clone, Default)]
pub struct TodoList {
    selected: usize,
    /// A full fetch is in flight
    pub loading: bool,
    /// Last fetch/update/delete failure; cleared by a successful fetch
    pub error: Option<String>,
    /// Items with an update or delete in flight
    busy: HashSet<i64>,
}

impl TodoList {
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep the selection inside a list of `len` items
    pub fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn is_busy(&self, id: i64) -> bool {
        self.busy.contains(&id)
    }

    /// Whether any item request is in flight
    pub fn has_busy(&self) -> bool {
        !self.busy.is_empty()
    }

    /// Mark `id` as busy; false when it already was
    pub(crate) fn begin(&mut self, id: i64) -> bool {
        self.busy.insert(id)
    }

    pub(crate) fn finish(&mut self, id: i64) {
        self.busy.remove(&id);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
