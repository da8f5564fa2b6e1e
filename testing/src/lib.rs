//! # Optimist Testing
//!
//! Testing utilities for Optimist reducers.
//!
//! This crate provides:
//! - Deterministic [`Clock`] implementations
//! - [`ReducerTest`], a given/when/then harness for single reductions
//! - [`TestStore`], which holds effects until the test resolves them, in
//!   any order it likes
//!
//! ## Example
//!
//! ```ignore
//! use optimist_testing::{test_clock, TestStore};
//!
//! #[tokio::test]
//! async fn failed_toggle_restores_snapshot() {
//!     let env = TodoEnvironment::new(failing_service(), test_clock(), UserId::new(1));
//!     let mut store = TestStore::new(TodoListState::default(), TodoListReducer::new(), env);
//!
//!     store.send(TodoAction::Toggle { id }).await;
//!     assert!(store.state().is_updating(id));
//!
//!     store.resolve_next().await;
//!     assert!(!store.state().todos[0].completed);
//! }
//! ```

use chrono::{DateTime, Utc};
use optimist_core::environment::Clock;

mod test_store;

pub use reducer_test::{assertions, ReducerTest};
pub use test_store::TestStore;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use optimist_testing::mocks::FixedClock;
    /// use optimist_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that moves forward by a fixed step on every reading
    ///
    /// Useful when each reading must differ, e.g. timestamps used as
    /// provisional identifiers.
    ///
    /// ```
    /// use optimist_testing::mocks::SteppingClock;
    /// use optimist_core::environment::Clock;
    /// use chrono::{TimeZone, Utc};
    ///
    /// let clock = SteppingClock::new(Utc.timestamp_millis_opt(1_000).unwrap(), 5);
    /// assert_eq!(clock.now().timestamp_millis(), 1_000);
    /// assert_eq!(clock.now().timestamp_millis(), 1_005);
    /// ```
    #[derive(Debug)]
    pub struct SteppingClock {
        start: DateTime<Utc>,
        step_ms: i64,
        ticks: AtomicI64,
    }

    impl SteppingClock {
        /// Create a clock starting at `start` that advances `step_ms` per reading
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step_ms: i64) -> Self {
            Self {
                start,
                step_ms,
                ticks: AtomicI64::new(0),
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
            self.start + chrono::Duration::milliseconds(tick * self.step_ms)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock, SteppingClock};
