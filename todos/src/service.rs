//! Remote todo service abstraction.

use crate::error::ServiceError;
use crate::types::{NewTodo, Todo, TodoId, UserId};
use std::future::Future;

/// The remote API the controller talks to
///
/// Implementations: [`HttpTodoService`](crate::http::HttpTodoService) for a
/// real server, [`MockTodoService`](crate::mocks::MockTodoService) for
/// tests and offline use.
pub trait TodoService: Send + Sync {
    /// Fetch every todo of `user_id`
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the request fails or the body is malformed.
    fn fetch_all(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Todo>, ServiceError>> + Send;

    /// Create a todo; the server assigns its id
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the server rejects the todo or is unreachable.
    fn create(&self, todo: NewTodo) -> impl Future<Output = Result<Todo, ServiceError>> + Send;

    /// Replace a todo, returning the stored value
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the todo does not exist or the server is unreachable.
    fn update(&self, todo: Todo) -> impl Future<Output = Result<Todo, ServiceError>> + Send;

    /// Delete a todo
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the todo does not exist or the server is unreachable.
    fn delete(&self, id: TodoId) -> impl Future<Output = Result<(), ServiceError>> + Send;
}
