//! Todo list controller: the reducer running inside a [`Store`].
//!
//! Each operation sends one action and returns the store's
//! [`EffectHandle`]. Waiting on the handle covers the remote call and the
//! reconciliation of its outcome, but not the later dismissal of a notice.

use crate::actions::TodoAction;
use crate::config::ClientConfig;
use crate::reducer::{TodoEnvironment, TodoListReducer};
use crate::service::TodoService;
use crate::state::TodoListState;
use crate::types::{Todo, TodoFilter, TodoId};
use optimist_runtime::{EffectHandle, Store, StoreError};
use std::time::Duration;

/// Store type driving the todo list
pub type TodoStore<S> = Store<TodoListState, TodoAction, TodoEnvironment<S>, TodoListReducer<S>>;

/// Todo list controller
pub struct TodoController<S: TodoService + 'static> {
    store: TodoStore<S>,
}

impl<S: TodoService + 'static> TodoController<S> {
    /// Controller for `config`, talking to `service`
    #[must_use]
    pub fn new(service: S, config: &ClientConfig) -> Self {
        Self::with_environment(TodoEnvironment::from_config(service, config))
    }

    /// Controller over an explicit environment, starting empty
    #[must_use]
    pub fn with_environment(env: TodoEnvironment<S>) -> Self {
        Self::with_state(TodoListState::new(), env)
    }

    /// Controller starting from `state`
    #[must_use]
    pub fn with_state(state: TodoListState, env: TodoEnvironment<S>) -> Self {
        Self {
            store: Store::new(state, TodoListReducer::new(), env),
        }
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &TodoStore<S> {
        &self.store
    }

    /// Send any action
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`shutdown`](Self::shutdown).
    pub async fn send(&self, action: TodoAction) -> Result<EffectHandle, StoreError> {
        self.store.send(action).await
    }

    /// Send an action and wait until its remote calls have been reconciled
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the calls take longer than `timeout`.
    pub async fn settle(&self, action: TodoAction, timeout: Duration) -> Result<(), StoreError> {
        let mut handle = self.send(action).await?;
        handle.wait_with_timeout(timeout).await
    }

    /// Fetch the list (once per session)
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn load(&self) -> Result<EffectHandle, StoreError> {
        self.send(TodoAction::Load).await
    }

    /// Replace the new-todo input
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn set_draft(&self, text: impl Into<String>) -> Result<EffectHandle, StoreError> {
        self.send(TodoAction::DraftChanged { text: text.into() }).await
    }

    /// Create a todo from the new-todo input
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn submit_draft(&self) -> Result<EffectHandle, StoreError> {
        self.send(TodoAction::SubmitDraft).await
    }

    /// Create a todo
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn create(&self, title: impl Into<String>) -> Result<EffectHandle, StoreError> {
        self.send(TodoAction::Create { title: title.into() }).await
    }

    /// Delete a todo
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn delete(&self, id: TodoId) -> Result<EffectHandle, StoreError> {
        self.send(TodoAction::Delete { id }).await
    }

    /// Flip a todo's completion flag
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn toggle(&self, id: TodoId) -> Result<EffectHandle, StoreError> {
        self.send(TodoAction::Toggle { id }).await
    }

    /// Complete all todos, or un-complete them if all are completed
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn toggle_all(&self) -> Result<EffectHandle, StoreError> {
        self.send(TodoAction::ToggleAll).await
    }

    /// Start renaming a todo
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn start_edit(&self, id: TodoId) -> Result<EffectHandle, StoreError> {
        self.send(TodoAction::StartEdit { id }).await
    }

    /// Replace the rename input
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn edit_changed(&self, text: impl Into<String>) -> Result<EffectHandle, StoreError> {
        self.send(TodoAction::EditChanged { text: text.into() }).await
    }

    /// Finish renaming
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn commit_edit(&self) -> Result<EffectHandle, StoreError> {
        self.send(TodoAction::CommitEdit).await
    }

    /// Abandon renaming
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn cancel_edit(&self) -> Result<EffectHandle, StoreError> {
        self.send(TodoAction::CancelEdit).await
    }

    /// Delete every completed todo
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn clear_completed(&self) -> Result<EffectHandle, StoreError> {
        self.send(TodoAction::ClearCompleted).await
    }

    /// Change the filter
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn set_filter(&self, filter: TodoFilter) -> Result<EffectHandle, StoreError> {
        self.send(TodoAction::SetFilter { filter }).await
    }

    /// Hide the error banner
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn dismiss_error(&self) -> Result<EffectHandle, StoreError> {
        self.send(TodoAction::DismissError).await
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> TodoListState {
        self.store.state(Clone::clone).await
    }

    /// Todos passing the active filter
    pub async fn visible_todos(&self) -> Vec<Todo> {
        self.store
            .state(|state| state.visible_todos().into_iter().cloned().collect())
            .await
    }

    /// Stop accepting actions and wait for in-flight calls
    ///
    /// A pending notice dismissal is dropped rather than waited out.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if calls are still running after `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.store.shutdown(timeout).await
    }
}

impl<S: TodoService + 'static> Clone for TodoController<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}
