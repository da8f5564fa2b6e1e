//! # Optimist Todos
//!
//! A todo list client that applies every change locally first and
//! reconciles with the server afterwards.
//!
//! - [`TodoListReducer`]: the per-item optimistic state machine
//! - [`TodoController`]: the reducer running in a [`Store`](optimist_runtime::Store)
//! - [`TodoService`]: the remote API, with [`HttpTodoService`] and
//!   [`MockTodoService`] implementations
//!
//! ## Example
//!
//! ```ignore
//! let config = ClientConfig::from_env()?;
//! let controller = TodoController::new(HttpTodoService::from_config(&config)?, &config);
//!
//! controller.load().await?.wait().await;
//! controller.create("Buy milk").await?.wait().await;
//!
//! let state = controller.snapshot().await;
//! println!("{} items left", state.active_count());
//! ```

pub mod actions;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod mocks;
pub mod reducer;
pub mod service;
pub mod state;
pub mod types;

pub use actions::TodoAction;
pub use config::ClientConfig;
pub use controller::{TodoController, TodoStore};
pub use error::{ConfigError, ParseFilterError, ServiceError, TodoError};
pub use http::HttpTodoService;
pub use mocks::MockTodoService;
pub use reducer::{TodoEnvironment, TodoListReducer};
pub use service::TodoService;
pub use state::{Editing, LoadStatus, Notice, PendingOperation, TodoListState};
pub use types::{NewTodo, Todo, TodoFilter, TodoId, UpdateKind, UserId};
