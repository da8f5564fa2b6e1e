//! Actions of the todo list controller.

use crate::error::ServiceError;
use crate::types::{Todo, TodoFilter, TodoId};
use optimist_macros::Action;

/// Everything the todo list controller reacts to
///
/// Intents come from the user. Outcomes come back from the remote service
/// and settle the operation their intent started.
#[derive(Action, Clone, Debug, PartialEq)]
pub enum TodoAction {
    // ========== Intents ==========
    /// Fetch the list; only the first request per session does anything
    #[intent]
    Load,

    /// The new-todo input changed
    #[intent]
    DraftChanged {
        /// New input contents
        text: String,
    },

    /// Submit the new-todo input
    #[intent]
    SubmitDraft,

    /// Create a todo with `title`
    #[intent]
    Create {
        /// Title as typed; trimmed before use
        title: String,
    },

    /// Delete a todo
    #[intent]
    Delete {
        /// Todo to delete
        id: TodoId,
    },

    /// Flip a todo's completion flag
    #[intent]
    Toggle {
        /// Todo to toggle
        id: TodoId,
    },

    /// Complete every todo, or un-complete every todo if all are completed
    #[intent]
    ToggleAll,

    /// Start renaming a todo
    #[intent]
    StartEdit {
        /// Todo to rename
        id: TodoId,
    },

    /// The rename input changed
    #[intent]
    EditChanged {
        /// New input contents
        text: String,
    },

    /// Finish renaming (Enter or blur); an empty title deletes the todo
    #[intent]
    CommitEdit,

    /// Abandon renaming (Escape)
    #[intent]
    CancelEdit,

    /// Delete every completed todo
    #[intent]
    ClearCompleted,

    /// Show a different subset of todos
    #[intent]
    SetFilter {
        /// Filter to apply
        filter: TodoFilter,
    },

    /// Hide the error banner
    #[intent]
    DismissError,

    // ========== Outcomes ==========
    /// The list arrived
    #[outcome]
    Loaded {
        /// Todos of the configured user
        todos: Vec<Todo>,
    },

    /// The list could not be fetched
    #[outcome]
    LoadFailed {
        /// Cause
        error: ServiceError,
    },

    /// The server created a todo
    #[outcome]
    Created {
        /// Provisional id the todo was listed under
        temp_id: TodoId,
        /// Todo as stored by the server
        todo: Todo,
    },

    /// The server refused to create a todo
    #[outcome]
    CreateFailed {
        /// Provisional id the todo was listed under
        temp_id: TodoId,
        /// Cause
        error: ServiceError,
    },

    /// The server deleted a todo
    #[outcome]
    Deleted {
        /// Deleted todo
        id: TodoId,
    },

    /// The server refused to delete a todo
    #[outcome]
    DeleteFailed {
        /// Todo that stays
        id: TodoId,
        /// Cause
        error: ServiceError,
    },

    /// The server stored an update
    #[outcome]
    Updated {
        /// Updated todo
        id: TodoId,
        /// Todo as stored by the server
        todo: Todo,
    },

    /// The server refused an update
    #[outcome]
    UpdateFailed {
        /// Todo to roll back
        id: TodoId,
        /// Cause
        error: ServiceError,
    },

    // ========== Timers ==========
    /// A notice reached the end of its display time
    NoticeExpired {
        /// Generation of the notice the timer was started for
        generation: u64,
    },
}
