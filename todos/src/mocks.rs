//! In-memory todo service.
//!
//! Backs the binary's `--in-memory` mode and the store-level tests. Every
//! call is recorded; failures can be injected per operation or per todo.

use crate::error::ServiceError;
use crate::service::TodoService;
use crate::types::{NewTodo, Todo, TodoId, UserId};
use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Operations of [`TodoService`], for failure injection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `fetch_all`
    FetchAll,
    /// `create`
    Create,
    /// `update`
    Update,
    /// `delete`
    Delete,
}

/// A recorded call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServiceCall {
    /// `fetch_all(user_id)`
    FetchAll(UserId),
    /// `create(todo)`
    Create(NewTodo),
    /// `update(todo)`
    Update(Todo),
    /// `delete(id)`
    Delete(TodoId),
}

#[derive(Debug, Default)]
struct MockState {
    todos: Vec<Todo>,
    next_id: i64,
    failing_operations: HashSet<Operation>,
    failing_ids: HashSet<TodoId>,
    calls: Vec<ServiceCall>,
}

/// Mock todo service
///
/// Server ids are handed out sequentially, starting after the highest
/// seeded id. Clones share state.
#[derive(Debug, Clone)]
pub struct MockTodoService {
    state: Arc<Mutex<MockState>>,
    latency: Option<Duration>,
}

impl MockTodoService {
    /// Create an empty mock service
    #[must_use]
    pub fn new() -> Self {
        Self::with_todos(Vec::new())
    }

    /// Create a mock service holding `todos`
    #[must_use]
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let next_id = todos.iter().map(|t| t.id.value()).max().unwrap_or(0) + 1;
        Self {
            state: Arc::new(Mutex::new(MockState {
                todos,
                next_id,
                ..MockState::default()
            })),
            latency: None,
        }
    }

    /// Delay every call by `latency`
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every call of `operation` fail
    #[must_use]
    pub fn failing(self, operation: Operation) -> Self {
        self.set_failing(operation, true);
        self
    }

    /// Turn failure injection for `operation` on or off
    pub fn set_failing(&self, operation: Operation, failing: bool) {
        if let Ok(mut state) = self.state.lock() {
            if failing {
                state.failing_operations.insert(operation);
            } else {
                state.failing_operations.remove(&operation);
            }
        }
    }

    /// Make updates and deletes of `id` fail
    pub fn fail_for(&self, id: TodoId) {
        if let Ok(mut state) = self.state.lock() {
            state.failing_ids.insert(id);
        }
    }

    /// Todos currently stored
    #[must_use]
    pub fn todos(&self) -> Vec<Todo> {
        self.state
            .lock()
            .map(|state| state.todos.clone())
            .unwrap_or_default()
    }

    /// Calls received so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.state
            .lock()
            .map(|state| state.calls.clone())
            .unwrap_or_default()
    }

    /// Number of calls of `operation` received so far
    #[must_use]
    pub fn call_count(&self, operation: Operation) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    /// Run one call: wait out the latency, record, then apply `handler`
    /// unless a failure is injected
    fn call<T, F>(
        &self,
        call: ServiceCall,
        handler: F,
    ) -> impl Future<Output = Result<T, ServiceError>> + Send + 'static
    where
        T: Send + 'static,
        F: FnOnce(&mut MockState) -> Result<T, ServiceError> + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        let latency = self.latency;

        async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }

            let mut state = state.lock().map_err(|_| poisoned())?;
            let operation = call.operation();
            let target = call.target();
            state.calls.push(call);

            let injected = state.failing_operations.contains(&operation)
                || target.is_some_and(|id| state.failing_ids.contains(&id));
            if injected {
                return Err(ServiceError::Status {
                    status: 500,
                    message: format!("injected {operation:?} failure"),
                });
            }

            handler(&mut state)
        }
    }
}

impl Default for MockTodoService {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceCall {
    /// Operation this call belongs to
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::FetchAll(_) => Operation::FetchAll,
            Self::Create(_) => Operation::Create,
            Self::Update(_) => Operation::Update,
            Self::Delete(_) => Operation::Delete,
        }
    }

    /// Todo this call targets, for updates and deletes
    #[must_use]
    pub const fn target(&self) -> Option<TodoId> {
        match self {
            Self::Update(todo) => Some(todo.id),
            Self::Delete(id) => Some(*id),
            Self::FetchAll(_) | Self::Create(_) => None,
        }
    }
}

impl TodoService for MockTodoService {
    fn fetch_all(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Todo>, ServiceError>> + Send {
        self.call(ServiceCall::FetchAll(user_id), move |state| {
            Ok(state
                .todos
                .iter()
                .filter(|todo| todo.user_id == user_id)
                .cloned()
                .collect())
        })
    }

    fn create(&self, todo: NewTodo) -> impl Future<Output = Result<Todo, ServiceError>> + Send {
        self.call(ServiceCall::Create(todo.clone()), move |state| {
            let id = TodoId::new(state.next_id);
            state.next_id += 1;

            let created = Todo::new(id, todo.user_id, todo.title, todo.completed);
            state.todos.push(created.clone());
            Ok(created)
        })
    }

    fn update(&self, todo: Todo) -> impl Future<Output = Result<Todo, ServiceError>> + Send {
        self.call(ServiceCall::Update(todo.clone()), move |state| {
            let stored = state
                .todos
                .iter_mut()
                .find(|stored| stored.id == todo.id)
                .ok_or_else(|| not_found(todo.id))?;
            *stored = todo.clone();
            Ok(todo)
        })
    }

    fn delete(&self, id: TodoId) -> impl Future<Output = Result<(), ServiceError>> + Send {
        self.call(ServiceCall::Delete(id), move |state| {
            let before = state.todos.len();
            state.todos.retain(|todo| todo.id != id);
            if state.todos.len() == before {
                return Err(not_found(id));
            }
            Ok(())
        })
    }
}

fn not_found(id: TodoId) -> ServiceError {
    ServiceError::Status {
        status: 404,
        message: format!("todo {id} not found"),
    }
}

fn poisoned() -> ServiceError {
    ServiceError::Transport("mock service state poisoned".to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn seeded() -> MockTodoService {
        MockTodoService::with_todos(vec![
            Todo::new(TodoId::new(1), UserId::new(1), "a", false),
            Todo::new(TodoId::new(4), UserId::new(1), "b", true),
            Todo::new(TodoId::new(9), UserId::new(2), "other user", false),
        ])
    }

    #[tokio::test]
    async fn fetch_all_filters_by_user() {
        let service = seeded();
        let todos = service.fetch_all(UserId::new(1)).await.unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(service.calls(), vec![ServiceCall::FetchAll(UserId::new(1))]);
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let service = seeded();
        let payload = NewTodo {
            user_id: UserId::new(1),
            title: "c".to_string(),
            completed: false,
        };

        let first = service.create(payload.clone()).await.unwrap();
        let second = service.create(payload).await.unwrap();

        assert_eq!(first.id, TodoId::new(10));
        assert_eq!(second.id, TodoId::new(11));
        assert_eq!(service.todos().len(), 5);
    }

    #[tokio::test]
    async fn update_and_delete_unknown_id_are_not_found() {
        let service = seeded();
        let ghost = Todo::new(TodoId::new(99), UserId::new(1), "ghost", false);

        assert!(matches!(
            service.update(ghost).await,
            Err(ServiceError::Status { status: 404, .. })
        ));
        assert!(matches!(
            service.delete(TodoId::new(99)).await,
            Err(ServiceError::Status { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn injected_failures_are_recorded_and_leave_state_alone() {
        let service = seeded().failing(Operation::Delete);
        service.fail_for(TodoId::new(1));

        assert!(service.delete(TodoId::new(4)).await.is_err());
        let renamed = Todo::new(TodoId::new(1), UserId::new(1), "renamed", false);
        assert!(service.update(renamed).await.is_err());

        assert_eq!(service.todos().len(), 3);
        assert_eq!(service.call_count(Operation::Delete), 1);
        assert_eq!(service.call_count(Operation::Update), 1);

        service.set_failing(Operation::Delete, false);
        assert!(service.delete(TodoId::new(4)).await.is_ok());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let service = seeded();
        let clone = service.clone();
        clone.delete(TodoId::new(1)).await.unwrap();
        assert_eq!(service.todos().len(), 2);
    }
}
