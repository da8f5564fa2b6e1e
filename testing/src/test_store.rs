//! A store that only runs effects when the test says so
//!
//! The real runtime spawns every effect immediately, which makes the order
//! in which remote calls complete a matter of scheduling. [`TestStore`]
//! instead parks each effect in a queue. Tests then resolve futures one at
//! a time, in whatever order the scenario needs, and fire delayed actions
//! explicitly.

use optimist_core::{effect::Effect, reducer::Reducer};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

type PendingFuture<A> = Pin<Box<dyn Future<Output = Option<A>> + Send>>;

/// Deterministic store for reducer integration tests
///
/// `Parallel` and `Sequential` effects are flattened into the queue in
/// declaration order. `None` effects are dropped.
pub struct TestStore<R>
where
    R: Reducer,
{
    state: R::State,
    reducer: R,
    environment: R::Environment,
    futures: Vec<PendingFuture<R::Action>>,
    delays: Vec<(Duration, R::Action)>,
    received: Vec<R::Action>,
}

impl<R> TestStore<R>
where
    R: Reducer,
    R::Action: Clone,
{
    /// Create a test store
    #[must_use]
    pub const fn new(state: R::State, reducer: R, environment: R::Environment) -> Self {
        Self {
            state,
            reducer,
            environment,
            futures: Vec::new(),
            delays: Vec::new(),
            received: Vec::new(),
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &R::State {
        &self.state
    }

    /// Environment the reducer runs with
    #[must_use]
    pub const fn environment(&self) -> &R::Environment {
        &self.environment
    }

    /// Reduce an action and queue the effects it returns
    pub fn send(&mut self, action: R::Action) {
        let effects = self.reducer.reduce(&mut self.state, action, &self.environment);
        for effect in effects {
            self.enqueue(effect);
        }
    }

    /// Number of queued futures (remote calls in flight)
    #[must_use]
    pub fn pending_futures(&self) -> usize {
        self.futures.len()
    }

    /// Number of queued delayed actions
    #[must_use]
    pub fn pending_delays(&self) -> usize {
        self.delays.len()
    }

    /// Durations of the queued delayed actions, in queue order
    #[must_use]
    pub fn delay_durations(&self) -> Vec<Duration> {
        self.delays.iter().map(|(duration, _)| *duration).collect()
    }

    /// Actions produced by resolved effects, in the order they were reduced
    #[must_use]
    pub fn received(&self) -> &[R::Action] {
        &self.received
    }

    /// Resolve the oldest queued future and reduce its action
    ///
    /// Returns the produced action, or `None` if the queue was empty or the
    /// future produced nothing.
    pub async fn resolve_next(&mut self) -> Option<R::Action> {
        self.resolve_at(0).await
    }

    /// Resolve the queued future at `index`, out of order
    ///
    /// Returns `None` if there is no future at `index`.
    pub async fn resolve_at(&mut self, index: usize) -> Option<R::Action> {
        if index >= self.futures.len() {
            return None;
        }
        let future = self.futures.remove(index);
        let action = future.await?;
        self.received.push(action.clone());
        self.send(action.clone());
        Some(action)
    }

    /// Resolve the most recently queued future first
    pub async fn resolve_last(&mut self) -> Option<R::Action> {
        let index = self.futures.len().checked_sub(1)?;
        self.resolve_at(index).await
    }

    /// Resolve queued futures until none remain, including any queued by
    /// the reductions along the way
    ///
    /// Delayed actions stay queued.
    pub async fn resolve_all(&mut self) {
        while !self.futures.is_empty() {
            self.resolve_next().await;
        }
    }

    /// Reduce every queued delayed action, as if their timers elapsed
    pub fn fire_delays(&mut self) {
        let delays = std::mem::take(&mut self.delays);
        for (_, action) in delays {
            self.received.push(action.clone());
            self.send(action);
        }
    }

    /// Drop queued delayed actions without reducing them
    pub fn discard_delays(&mut self) {
        self.delays.clear();
    }

    fn enqueue(&mut self, effect: Effect<R::Action>) {
        match effect {
            Effect::None => {},
            Effect::Future(future) => self.futures.push(future),
            Effect::Delay { duration, action } => self.delays.push((duration, *action)),
            Effect::Parallel(effects) | Effect::Sequential(effects) => {
                for effect in effects {
                    self.enqueue(effect);
                }
            },
        }
    }
}

impl<R> std::fmt::Debug for TestStore<R>
where
    R: Reducer,
    R::State: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestStore")
            .field("state", &self.state)
            .field("pending_futures", &self.futures.len())
            .field("pending_delays", &self.delays.len())
            .finish_non_exhaustive()
    }
}
