//! Error types for the todo client.

use crate::types::{TodoId, UpdateKind};
use thiserror::Error;

/// Errors surfaced to the user
///
/// Each variant is local to the operation that raised it and carries only
/// its message. None of them propagate past the reducer; they end up in the
/// notice banner (or, for [`TodoError::Busy`], in the log).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// The new todo's title was empty after trimming
    #[error("Title should not be empty")]
    Validation,

    /// The initial fetch failed
    #[error("Unable to load todos")]
    Load,

    /// Creating a todo failed
    #[error("Unable to add a todo")]
    Add,

    /// Toggling or renaming a todo failed
    #[error("Unable to {0} todo")]
    Update(UpdateKind),

    /// Deleting a todo failed
    #[error("Unable to delete a todo")]
    Delete,

    /// The todo already has an operation in flight
    #[error("Todo {0} is busy")]
    Busy(TodoId),
}

/// Errors from the remote todo service
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The server answered with a non-success status
    #[error("Server responded with status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// The request never got an answer (connection, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Errors while building the client configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No user id was configured
    #[error("A user id is required (set TODOS_USER_ID or pass --user-id)")]
    MissingUserId,

    /// A numeric setting did not parse
    #[error("Invalid value for {name}: {value:?}")]
    InvalidNumber {
        /// Setting name
        name: &'static str,
        /// Raw value
        value: String,
    },

    /// The API base URL is not an absolute http(s) URL
    #[error("Invalid API URL {0:?}")]
    InvalidUrl(String),
}

/// A filter name that is not `all`, `active` or `completed`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown filter {0:?} (expected all, active or completed)")]
pub struct ParseFilterError(pub String);
