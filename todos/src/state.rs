//! State of the todo list controller.

use crate::error::TodoError;
use crate::types::{Todo, TodoFilter, TodoId, UpdateKind};
use optimist_core::Speculation;
use std::collections::{BTreeMap, BTreeSet};

/// An operation in flight for one todo
///
/// A todo has at most one. While it is present the todo is busy and further
/// operations on it are refused.
#[derive(Clone, Debug, PartialEq)]
pub enum PendingOperation {
    /// A provisional todo waiting for the server to create it
    Saving {
        /// Removes the provisional entry on failure
        speculation: Speculation<Todo>,
    },
    /// A delete waiting for the server; the todo stays listed until confirmed
    Deleting,
    /// A toggle or rename applied locally, waiting for the server
    Updating {
        /// Holds the snapshot restored on failure
        speculation: Speculation<Todo>,
        /// Toggle or rename, for the failure message
        kind: UpdateKind,
    },
}

impl PendingOperation {
    /// Short name for logs and rendering
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Saving { .. } => "saving",
            Self::Deleting => "deleting",
            Self::Updating { .. } => "updating",
        }
    }
}

/// The error currently shown to the user
///
/// `generation` identifies this particular notice so that the auto-dismiss
/// timer of an older notice cannot clear a newer one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// What went wrong
    pub error: TodoError,
    /// Monotonic notice number
    pub generation: u64,
}

/// A todo being renamed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Editing {
    /// Todo being renamed
    pub id: TodoId,
    /// Title typed so far
    pub buffer: String,
}

/// Progress of the initial fetch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// Not started
    #[default]
    NotRequested,
    /// Fetch in flight
    Loading,
    /// List received
    Loaded,
    /// Fetch failed; the list stays empty
    Failed,
}

/// State of the todo list controller
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TodoListState {
    /// Todos in display order
    pub todos: Vec<Todo>,
    /// Operation in flight per todo
    pub pending: BTreeMap<TodoId, PendingOperation>,
    /// Active filter
    pub filter: TodoFilter,
    /// Error banner
    pub notice: Option<Notice>,
    /// Generation of the most recently raised notice
    pub notice_generation: u64,
    /// Contents of the new-todo input
    pub draft: String,
    /// Rename in progress
    pub editing: Option<Editing>,
    /// Initial fetch progress
    pub load_status: LoadStatus,
    /// Creates confirmed while the initial fetch was in flight
    ///
    /// The fetch may have been served before they existed, so they survive
    /// its result.
    pub confirmed_during_load: BTreeSet<TodoId>,
}

impl TodoListState {
    /// Empty state, before loading
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State with an already loaded list
    #[must_use]
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos,
            load_status: LoadStatus::Loaded,
            ..Self::default()
        }
    }

    /// Todos passing the active filter, in list order
    ///
    /// Pure: never changes the list.
    #[must_use]
    pub fn visible_todos(&self) -> Vec<&Todo> {
        self.todos
            .iter()
            .filter(|todo| self.filter.matches(todo))
            .collect()
    }

    /// Todo with `id`
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    /// Whether a todo with `id` is listed
    #[must_use]
    pub fn contains(&self, id: TodoId) -> bool {
        self.get(id).is_some()
    }

    /// Number of todos not yet completed
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.todos.iter().filter(|todo| !todo.completed).count()
    }

    /// Number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|todo| todo.completed).count()
    }

    /// Whether any todo is completed
    #[must_use]
    pub fn has_completed(&self) -> bool {
        self.todos.iter().any(|todo| todo.completed)
    }

    /// Whether the list is non-empty and every todo is completed
    #[must_use]
    pub fn all_completed(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(|todo| todo.completed)
    }

    /// Whether a create is in flight
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.pending
            .values()
            .any(|op| matches!(op, PendingOperation::Saving { .. }))
    }

    /// Operation in flight for `id`
    #[must_use]
    pub fn pending_operation(&self, id: TodoId) -> Option<&PendingOperation> {
        self.pending.get(&id)
    }

    /// Whether `id` has an operation in flight
    #[must_use]
    pub fn is_busy(&self, id: TodoId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Whether `id` is a provisional todo waiting to be created
    #[must_use]
    pub fn is_saving(&self, id: TodoId) -> bool {
        matches!(self.pending.get(&id), Some(PendingOperation::Saving { .. }))
    }

    /// Whether `id` is waiting to be deleted
    #[must_use]
    pub fn is_deleting(&self, id: TodoId) -> bool {
        matches!(self.pending.get(&id), Some(PendingOperation::Deleting))
    }

    /// Whether `id` is waiting for an update
    #[must_use]
    pub fn is_updating(&self, id: TodoId) -> bool {
        matches!(self.pending.get(&id), Some(PendingOperation::Updating { .. }))
    }

    /// Ids of provisional todos waiting to be created
    #[must_use]
    pub fn saving_ids(&self) -> Vec<TodoId> {
        self.ids_where(|op| matches!(op, PendingOperation::Saving { .. }))
    }

    /// Ids waiting to be deleted
    #[must_use]
    pub fn deleting_ids(&self) -> Vec<TodoId> {
        self.ids_where(|op| matches!(op, PendingOperation::Deleting))
    }

    /// Ids waiting for an update
    #[must_use]
    pub fn updating_ids(&self) -> Vec<TodoId> {
        self.ids_where(|op| matches!(op, PendingOperation::Updating { .. }))
    }

    /// Error currently shown, if any
    #[must_use]
    pub fn error(&self) -> Option<&TodoError> {
        self.notice.as_ref().map(|notice| &notice.error)
    }

    /// Provisional id for a todo created at `now_ms`
    ///
    /// Starts from the timestamp and moves past any id already in use, so
    /// two creates in the same millisecond never share an id.
    #[must_use]
    pub fn provisional_id(&self, now_ms: i64) -> TodoId {
        let mut candidate = now_ms;
        while self.contains(TodoId::new(candidate)) || self.is_busy(TodoId::new(candidate)) {
            candidate += 1;
        }
        TodoId::new(candidate)
    }

    fn ids_where<F>(&self, predicate: F) -> Vec<TodoId>
    where
        F: Fn(&PendingOperation) -> bool,
    {
        self.pending
            .iter()
            .filter(|(_, op)| predicate(op))
            .map(|(id, _)| *id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::types::UserId;

    fn todo(id: i64, completed: bool) -> Todo {
        Todo::new(TodoId::new(id), UserId::new(1), format!("todo {id}"), completed)
    }

    #[test]
    fn visible_todos_by_filter() {
        let mut state = TodoListState::with_todos(vec![todo(1, false), todo(2, true), todo(3, false)]);

        let ids = |state: &TodoListState| -> Vec<i64> {
            state.visible_todos().iter().map(|t| t.id.value()).collect()
        };

        assert_eq!(ids(&state), vec![1, 2, 3]);
        state.filter = TodoFilter::Active;
        assert_eq!(ids(&state), vec![1, 3]);
        state.filter = TodoFilter::Completed;
        assert_eq!(ids(&state), vec![2]);
    }

    #[test]
    fn derived_counts() {
        let state = TodoListState::with_todos(vec![todo(1, false), todo(2, true)]);
        assert_eq!(state.active_count(), 1);
        assert_eq!(state.completed_count(), 1);
        assert!(state.has_completed());
        assert!(!state.all_completed());
    }

    #[test]
    fn empty_list_is_not_all_completed() {
        let state = TodoListState::new();
        assert!(!state.all_completed());
        assert!(!state.has_completed());
        assert_eq!(state.load_status, LoadStatus::NotRequested);
    }

    #[test]
    fn pending_sets_are_views_of_one_map() {
        let mut state = TodoListState::with_todos(vec![todo(1, false), todo(2, false), todo(3, false)]);
        let (speculation, _) =
            Speculation::modify(&mut state.todos, &TodoId::new(3), |t| t.completed = true)
                .unwrap();
        state.pending.insert(TodoId::new(2), PendingOperation::Deleting);
        state
            .pending
            .insert(TodoId::new(3), PendingOperation::Updating {
                speculation,
                kind: UpdateKind::Toggle,
            });

        assert_eq!(state.deleting_ids(), vec![TodoId::new(2)]);
        assert_eq!(state.updating_ids(), vec![TodoId::new(3)]);
        assert!(state.saving_ids().is_empty());
        assert!(!state.is_submitting());
        assert!(state.is_busy(TodoId::new(2)));
        assert!(!state.is_busy(TodoId::new(1)));
        assert_eq!(
            state.pending_operation(TodoId::new(3)).map(PendingOperation::label),
            Some("updating")
        );
    }

    #[test]
    fn provisional_id_skips_taken_ids() {
        let state = TodoListState::with_todos(vec![todo(1000, false), todo(1001, false)]);
        assert_eq!(state.provisional_id(1000), TodoId::new(1002));
        assert_eq!(state.provisional_id(5), TodoId::new(5));
    }
}
