//! # Optimist Core
//!
//! Core traits and types for the Optimist todo client.
//!
//! The client is written as a reducer over explicit state. Every user intent
//! and every remote outcome is an action; the reducer updates state in place
//! and returns descriptions of the side effects to run next.
//!
//! ## Core Concepts
//!
//! - **State**: The in-memory view model (todos, pending operations, notices)
//! - **Action**: All possible inputs to a reducer (user intents, remote outcomes)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//! - **Speculation**: A reversible optimistic change to one entry of a list
//!
//! ## Example
//!
//! ```ignore
//! use optimist_core::*;
//!
//! impl<S: TodoService> Reducer for TodoListReducer<S> {
//!     type State = TodoListState;
//!     type Action = TodoAction;
//!     type Environment = TodoEnvironment<S>;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut TodoListState,
//!         action: TodoAction,
//!         env: &TodoEnvironment<S>,
//!     ) -> SmallVec<[Effect<TodoAction>; 4]> {
//!         // Business logic goes here
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

pub use smallvec::{smallvec, SmallVec};

/// Reversible optimistic updates over keyed lists
pub mod optimistic;

pub use optimistic::{Keyed, Speculation};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// Most actions produce zero to four effects, hence the inline
        /// capacity of the returned `SmallVec`.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (notice auto-dismissal)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Returns true for [`Effect::None`] and for composites that contain
        /// nothing but no-ops.
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    effects.iter().all(Effect::is_none)
                },
                Effect::Delay { .. } | Effect::Future(_) => false,
            }
        }
    }

    impl<Action: Send + 'static> Effect<Action> {
        /// Run a fallible remote operation and turn its outcome into an action
        ///
        /// The operation is awaited by the runtime. Exactly one of the two
        /// callbacks runs, and the action it returns is fed back into the
        /// reducer, where the optimistic change is either committed or
        /// rolled back.
        ///
        /// # Example
        ///
        /// ```ignore
        /// Effect::reconcile(
        ///     async move { service.update(todo).await },
        ///     move |confirmed| TodoAction::Updated { id, todo: confirmed },
        ///     move |error| TodoAction::UpdateFailed { id, error },
        /// )
        /// ```
        pub fn reconcile<T, E, Fut, OnSuccess, OnFailure>(
            operation: Fut,
            on_success: OnSuccess,
            on_failure: OnFailure,
        ) -> Self
        where
            Fut: Future<Output = Result<T, E>> + Send + 'static,
            OnSuccess: FnOnce(T) -> Action + Send + 'static,
            OnFailure: FnOnce(E) -> Action + Send + 'static,
        {
            Effect::Future(Box::pin(async move {
                Some(match operation.await {
                    Ok(value) => on_success(value),
                    Err(error) => on_failure(error),
                })
            }))
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// The todo client uses the clock to mint provisional ids for todos that
    /// the server has not confirmed yet.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall-clock time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
        fn now(&self) -> DateTime<Utc> {
            (**self).now()
        }
    }
}
