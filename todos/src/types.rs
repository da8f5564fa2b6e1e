//! Domain types for the todo list.
//!
//! Field names on the wire follow the remote API (`userId`, not `user_id`).

use crate::error::ParseFilterError;
use optimist_core::Keyed;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifier of a todo
///
/// Assigned by the server. Until a create is confirmed the list holds a
/// provisional id minted from the clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(i64);

impl TodoId {
    /// Creates a `TodoId` from its raw value
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the user whose list is shown
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Creates a `UserId` from its raw value
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,
    /// Owner
    pub user_id: UserId,
    /// Title shown in the list
    pub title: String,
    /// Whether the todo is done
    pub completed: bool,
}

impl Todo {
    /// Creates a todo
    #[must_use]
    pub fn new(id: TodoId, user_id: UserId, title: impl Into<String>, completed: bool) -> Self {
        Self {
            id,
            user_id,
            title: title.into(),
            completed,
        }
    }

    /// The create payload for this todo (everything but the id)
    #[must_use]
    pub fn to_new(&self) -> NewTodo {
        NewTodo {
            user_id: self.user_id,
            title: self.title.clone(),
            completed: self.completed,
        }
    }
}

impl Keyed for Todo {
    type Key = TodoId;

    fn key(&self) -> TodoId {
        self.id
    }
}

/// Payload for creating a todo; the server assigns the id
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    /// Owner
    pub user_id: UserId,
    /// Title
    pub title: String,
    /// Initial completion flag
    pub completed: bool,
}

/// What an update changes; toggles and renames fail with different messages
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdateKind {
    /// Completion flag flipped (toggle, toggle-all)
    Toggle,
    /// Title replaced
    Rename,
}

impl std::fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Toggle => "toggle",
            Self::Rename => "rename",
        })
    }
}

/// Which todos the list shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TodoFilter {
    /// Every todo
    #[default]
    All,
    /// Todos not yet completed
    Active,
    /// Completed todos
    Completed,
}

impl TodoFilter {
    /// All filters, in footer order
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Whether `todo` passes this filter
    #[must_use]
    pub const fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.completed,
            Self::Completed => todo.completed,
        }
    }

    /// URL fragment selecting this filter (`#/`, `#/active`, `#/completed`)
    #[must_use]
    pub const fn fragment(self) -> &'static str {
        match self {
            Self::All => "#/",
            Self::Active => "#/active",
            Self::Completed => "#/completed",
        }
    }

    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TodoFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoFilter {
    type Err = ParseFilterError;

    /// Accepts a name (`all`, `active`, `completed`, any case) or a fragment
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let name = trimmed
            .strip_prefix("#/")
            .or_else(|| trimmed.strip_prefix('#'))
            .unwrap_or(trimmed);

        match name.to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}
