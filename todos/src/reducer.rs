//! Reducer logic for the todo list controller.
//!
//! Every mutation goes through three phases: a local optimistic change, a
//! remote call described as an effect, and reconciliation when the outcome
//! action comes back. Each todo has at most one operation in flight; a
//! request for a busy todo is dropped with a warning.

use crate::actions::TodoAction;
use crate::config::{ClientConfig, DEFAULT_ERROR_DISPLAY};
use crate::error::{ServiceError, TodoError};
use crate::service::TodoService;
use crate::state::{Editing, LoadStatus, Notice, PendingOperation, TodoListState};
use crate::types::{Todo, TodoId, UpdateKind, UserId};
use optimist_core::{
    effect::Effect,
    environment::{Clock, SystemClock},
    reducer::Reducer,
    smallvec, SmallVec, Speculation,
};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

type Effects = SmallVec<[Effect<TodoAction>; 4]>;

/// Environment dependencies for the todo list reducer
pub struct TodoEnvironment<S> {
    /// Remote todo API
    pub service: Arc<S>,
    /// Clock for provisional ids
    pub clock: Arc<dyn Clock>,
    /// User whose list is shown
    pub user_id: UserId,
    /// How long a notice stays before it dismisses itself
    pub error_display: Duration,
}

impl<S> TodoEnvironment<S> {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(service: S, clock: Arc<dyn Clock>, user_id: UserId) -> Self {
        Self {
            service: Arc::new(service),
            clock,
            user_id,
            error_display: DEFAULT_ERROR_DISPLAY,
        }
    }

    /// Environment for `config`, on the system clock
    #[must_use]
    pub fn from_config(service: S, config: &ClientConfig) -> Self {
        Self::new(service, Arc::new(SystemClock), config.user_id)
            .with_error_display(config.error_display)
    }

    /// Set how long notices stay visible
    #[must_use]
    pub const fn with_error_display(mut self, duration: Duration) -> Self {
        self.error_display = duration;
        self
    }
}

impl<S> Clone for TodoEnvironment<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            clock: Arc::clone(&self.clock),
            user_id: self.user_id,
            error_display: self.error_display,
        }
    }
}

/// Reducer for the todo list
pub struct TodoListReducer<S> {
    service: PhantomData<fn() -> S>,
}

impl<S> TodoListReducer<S> {
    /// Creates a new `TodoListReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            service: PhantomData,
        }
    }
}

impl<S> Default for TodoListReducer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for TodoListReducer<S> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<S> std::fmt::Debug for TodoListReducer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TodoListReducer")
    }
}

impl<S: TodoService + 'static> TodoListReducer<S> {
    // ========== Loading ==========

    fn load(state: &mut TodoListState, env: &TodoEnvironment<S>) -> Effects {
        if state.load_status != LoadStatus::NotRequested {
            tracing::debug!(status = ?state.load_status, "Load already requested");
            return SmallVec::new();
        }
        state.load_status = LoadStatus::Loading;

        let service = Arc::clone(&env.service);
        let user_id = env.user_id;
        smallvec![Effect::reconcile(
            async move { service.fetch_all(user_id).await },
            |todos| TodoAction::Loaded { todos },
            |error| TodoAction::LoadFailed { error },
        )]
    }

    fn loaded(state: &mut TodoListState, todos: Vec<Todo>) {
        tracing::info!(count = todos.len(), "Todos loaded");
        let fetched = todos.len();
        let local = std::mem::take(&mut state.todos);
        state.todos = todos;
        // Creates that finished or are still running during the fetch stay at
        // the end, unless the fetch already returned them
        for todo in local {
            if Self::created_during_load(state, todo.id) && !state.contains(todo.id) {
                state.todos.push(todo);
            }
        }
        tracing::debug!(kept = state.todos.len() - fetched, "Local creates kept after load");
        state.confirmed_during_load.clear();
        state.load_status = LoadStatus::Loaded;
    }

    fn load_failed(
        state: &mut TodoListState,
        env: &TodoEnvironment<S>,
        error: &ServiceError,
    ) -> Effects {
        let local = std::mem::take(&mut state.todos);
        state.todos = local
            .into_iter()
            .filter(|todo| Self::created_during_load(state, todo.id))
            .collect();
        state.confirmed_during_load.clear();
        state.load_status = LoadStatus::Failed;
        smallvec![Self::raise(state, env, TodoError::Load, Some(error))]
    }

    fn created_during_load(state: &TodoListState, id: TodoId) -> bool {
        state.is_saving(id) || state.confirmed_during_load.contains(&id)
    }

    // ========== Create ==========

    fn create(state: &mut TodoListState, env: &TodoEnvironment<S>, title: &str) -> Effects {
        let title = title.trim();
        if title.is_empty() {
            return smallvec![Self::raise(state, env, TodoError::Validation, None)];
        }

        let temp_id = state.provisional_id(env.clock.now().timestamp_millis());
        let provisional = Todo::new(temp_id, env.user_id, title, false);
        let payload = provisional.to_new();

        let speculation = Speculation::insert(&mut state.todos, provisional);
        state
            .pending
            .insert(temp_id, PendingOperation::Saving { speculation });
        state.draft.clear();
        tracing::debug!(%temp_id, "Provisional todo added");

        let service = Arc::clone(&env.service);
        smallvec![Effect::reconcile(
            async move { service.create(payload).await },
            move |todo| TodoAction::Created { temp_id, todo },
            move |error| TodoAction::CreateFailed { temp_id, error },
        )]
    }

    fn created(state: &mut TodoListState, temp_id: TodoId, todo: Todo) {
        let Some(PendingOperation::Saving { speculation }) =
            Self::take_pending(state, temp_id, |op| matches!(op, PendingOperation::Saving { .. }))
        else {
            tracing::debug!(%temp_id, "No create pending for provisional id");
            return;
        };

        let id = todo.id;
        if id != temp_id && state.contains(id) {
            // The initial fetch already listed the new todo
            speculation.rollback(&mut state.todos);
            tracing::debug!(%temp_id, %id, "Create confirmed, already listed");
        } else if speculation.commit(&mut state.todos, todo) {
            tracing::debug!(%temp_id, %id, "Create confirmed");
        } else {
            return;
        }

        if let Some(editing) = state.editing.as_mut().filter(|e| e.id == temp_id) {
            editing.id = id;
        }
        if state.load_status == LoadStatus::Loading {
            state.confirmed_during_load.insert(id);
        }
    }

    fn create_failed(
        state: &mut TodoListState,
        env: &TodoEnvironment<S>,
        temp_id: TodoId,
        error: &ServiceError,
    ) -> Effects {
        let Some(PendingOperation::Saving { speculation }) =
            Self::take_pending(state, temp_id, |op| matches!(op, PendingOperation::Saving { .. }))
        else {
            tracing::debug!(%temp_id, "No create pending for provisional id");
            return SmallVec::new();
        };

        if let Some(title) = state.get(temp_id).map(|todo| todo.title.clone()) {
            state.draft = title;
        }
        speculation.rollback(&mut state.todos);
        if state.editing.as_ref().is_some_and(|e| e.id == temp_id) {
            state.editing = None;
        }

        smallvec![Self::raise(state, env, TodoError::Add, Some(error))]
    }

    // ========== Delete ==========

    fn begin_delete(
        state: &mut TodoListState,
        env: &TodoEnvironment<S>,
        id: TodoId,
    ) -> Option<Effect<TodoAction>> {
        if !state.contains(id) {
            tracing::debug!(%id, "Delete of unknown todo ignored");
            return None;
        }
        if !Self::ensure_idle(state, id, "delete") {
            return None;
        }

        state.pending.insert(id, PendingOperation::Deleting);

        let service = Arc::clone(&env.service);
        Some(Effect::reconcile(
            async move { service.delete(id).await },
            move |()| TodoAction::Deleted { id },
            move |error| TodoAction::DeleteFailed { id, error },
        ))
    }

    fn deleted(state: &mut TodoListState, id: TodoId) {
        if Self::take_pending(state, id, |op| matches!(op, PendingOperation::Deleting)).is_none() {
            tracing::debug!(%id, "No delete pending");
            return;
        }

        state.todos.retain(|todo| todo.id != id);
        if state.editing.as_ref().is_some_and(|e| e.id == id) {
            state.editing = None;
        }
    }

    fn delete_failed(
        state: &mut TodoListState,
        env: &TodoEnvironment<S>,
        id: TodoId,
        error: &ServiceError,
    ) -> Effects {
        if Self::take_pending(state, id, |op| matches!(op, PendingOperation::Deleting)).is_none() {
            tracing::debug!(%id, "No delete pending");
            return SmallVec::new();
        }

        smallvec![Self::raise(state, env, TodoError::Delete, Some(error))]
    }

    // ========== Update (toggle, rename) ==========

    fn begin_update<F>(
        state: &mut TodoListState,
        env: &TodoEnvironment<S>,
        id: TodoId,
        kind: UpdateKind,
        change: F,
    ) -> Option<Effect<TodoAction>>
    where
        F: FnOnce(&mut Todo),
    {
        if !state.contains(id) {
            tracing::debug!(%id, "Update of unknown todo ignored");
            return None;
        }
        if !Self::ensure_idle(state, id, "update") {
            return None;
        }

        let (speculation, speculative) = Speculation::modify(&mut state.todos, &id, change)?;
        state
            .pending
            .insert(id, PendingOperation::Updating { speculation, kind });

        let service = Arc::clone(&env.service);
        Some(Effect::reconcile(
            async move { service.update(speculative).await },
            move |todo| TodoAction::Updated { id, todo },
            move |error| TodoAction::UpdateFailed { id, error },
        ))
    }

    fn updated(state: &mut TodoListState, id: TodoId, todo: Todo) {
        let Some(PendingOperation::Updating { speculation, .. }) =
            Self::take_pending(state, id, |op| matches!(op, PendingOperation::Updating { .. }))
        else {
            tracing::debug!(%id, "No update pending");
            return;
        };

        speculation.commit(&mut state.todos, todo);
    }

    fn update_failed(
        state: &mut TodoListState,
        env: &TodoEnvironment<S>,
        id: TodoId,
        error: &ServiceError,
    ) -> Effects {
        let Some(PendingOperation::Updating { speculation, kind }) =
            Self::take_pending(state, id, |op| matches!(op, PendingOperation::Updating { .. }))
        else {
            tracing::debug!(%id, "No update pending");
            return SmallVec::new();
        };

        speculation.rollback(&mut state.todos);
        smallvec![Self::raise(state, env, TodoError::Update(kind), Some(error))]
    }

    // ========== Batches ==========

    fn toggle_all(state: &mut TodoListState, env: &TodoEnvironment<S>) -> Effects {
        let target = !state.all_completed();
        let ids: Vec<TodoId> = state
            .todos
            .iter()
            .filter(|todo| todo.completed != target)
            .map(|todo| todo.id)
            .collect();

        let effects: Vec<_> = ids
            .into_iter()
            .filter_map(|id| {
                Self::begin_update(state, env, id, UpdateKind::Toggle, |todo| todo.completed = target)
            })
            .collect();
        batch(effects)
    }

    fn clear_completed(state: &mut TodoListState, env: &TodoEnvironment<S>) -> Effects {
        let ids: Vec<TodoId> = state
            .todos
            .iter()
            .filter(|todo| todo.completed)
            .map(|todo| todo.id)
            .collect();

        let effects: Vec<_> = ids
            .into_iter()
            .filter_map(|id| Self::begin_delete(state, env, id))
            .collect();
        batch(effects)
    }

    // ========== Editing ==========

    fn commit_edit(state: &mut TodoListState, env: &TodoEnvironment<S>) -> Effects {
        let Some(Editing { id, buffer }) = state.editing.take() else {
            return SmallVec::new();
        };

        let title = buffer.trim().to_string();
        let effect = if title.is_empty() {
            Self::begin_delete(state, env, id)
        } else {
            Self::begin_update(state, env, id, UpdateKind::Rename, |todo| todo.title = title)
        };
        effect.into_iter().collect()
    }

    // ========== Helpers ==========

    /// Refuse to start an operation on a busy todo
    fn ensure_idle(state: &TodoListState, id: TodoId, operation: &'static str) -> bool {
        match state.pending_operation(id) {
            Some(pending) => {
                tracing::warn!(
                    %id,
                    operation,
                    pending = pending.label(),
                    "{}",
                    TodoError::Busy(id)
                );
                false
            },
            None => true,
        }
    }

    /// Remove the pending operation of `id` if it is the expected kind
    fn take_pending<P>(state: &mut TodoListState, id: TodoId, expected: P) -> Option<PendingOperation>
    where
        P: Fn(&PendingOperation) -> bool,
    {
        if state.pending.get(&id).is_some_and(expected) {
            state.pending.remove(&id)
        } else {
            None
        }
    }

    /// Show `error` in the banner and schedule its dismissal
    fn raise(
        state: &mut TodoListState,
        env: &TodoEnvironment<S>,
        error: TodoError,
        cause: Option<&ServiceError>,
    ) -> Effect<TodoAction> {
        match cause {
            Some(cause) => tracing::warn!(%cause, "{error}"),
            None => tracing::info!("{error}"),
        }

        state.notice_generation += 1;
        let generation = state.notice_generation;
        state.notice = Some(Notice { error, generation });

        Effect::Delay {
            duration: env.error_display,
            action: Box::new(TodoAction::NoticeExpired { generation }),
        }
    }
}

fn batch(effects: Vec<Effect<TodoAction>>) -> Effects {
    if effects.is_empty() {
        SmallVec::new()
    } else {
        smallvec![Effect::merge(effects)]
    }
}

impl<S: TodoService + 'static> Reducer for TodoListReducer<S> {
    type State = TodoListState;
    type Action = TodoAction;
    type Environment = TodoEnvironment<S>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        tracing::trace!(action = action.name(), outcome = action.is_outcome(), "Reducing");

        match action {
            // ========== Intents ==========
            TodoAction::Load => Self::load(state, env),

            TodoAction::DraftChanged { text } => {
                state.draft = text;
                SmallVec::new()
            },

            TodoAction::SubmitDraft => {
                let title = state.draft.clone();
                Self::create(state, env, &title)
            },

            TodoAction::Create { title } => Self::create(state, env, &title),

            TodoAction::Delete { id } => Self::begin_delete(state, env, id).into_iter().collect(),

            TodoAction::Toggle { id } => {
                Self::begin_update(state, env, id, UpdateKind::Toggle, |todo| {
                    todo.completed = !todo.completed;
                })
                    .into_iter()
                    .collect()
            },

            TodoAction::ToggleAll => Self::toggle_all(state, env),

            TodoAction::StartEdit { id } => {
                if let Some(todo) = state.get(id) {
                    state.editing = Some(Editing {
                        id,
                        buffer: todo.title.clone(),
                    });
                }
                SmallVec::new()
            },

            TodoAction::EditChanged { text } => {
                if let Some(editing) = state.editing.as_mut() {
                    editing.buffer = text;
                }
                SmallVec::new()
            },

            TodoAction::CommitEdit => Self::commit_edit(state, env),

            TodoAction::CancelEdit => {
                state.editing = None;
                SmallVec::new()
            },

            TodoAction::ClearCompleted => Self::clear_completed(state, env),

            TodoAction::SetFilter { filter } => {
                state.filter = filter;
                SmallVec::new()
            },

            TodoAction::DismissError => {
                state.notice = None;
                SmallVec::new()
            },

            // ========== Outcomes ==========
            TodoAction::Loaded { todos } => {
                Self::loaded(state, todos);
                SmallVec::new()
            },

            TodoAction::LoadFailed { error } => Self::load_failed(state, env, &error),

            TodoAction::Created { temp_id, todo } => {
                Self::created(state, temp_id, todo);
                SmallVec::new()
            },

            TodoAction::CreateFailed { temp_id, error } => {
                Self::create_failed(state, env, temp_id, &error)
            },

            TodoAction::Deleted { id } => {
                Self::deleted(state, id);
                SmallVec::new()
            },

            TodoAction::DeleteFailed { id, error } => Self::delete_failed(state, env, id, &error),

            TodoAction::Updated { id, todo } => {
                Self::updated(state, id, todo);
                SmallVec::new()
            },

            TodoAction::UpdateFailed { id, error } => Self::update_failed(state, env, id, &error),

            // ========== Timers ==========
            TodoAction::NoticeExpired { generation } => {
                if state.notice.as_ref().is_some_and(|n| n.generation == generation) {
                    state.notice = None;
                }
                SmallVec::new()
            },
        }
    }
}
