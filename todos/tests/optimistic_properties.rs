//! Properties of the optimistic state machine, checked against the reducer
//! directly and through a `TestStore` that resolves remote calls in a
//! chosen order.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use optimist_core::reducer::Reducer;
use optimist_testing::{assertions, test_clock, TestStore};
use optimist_todos::{
    MockTodoService, ServiceError, Todo, TodoAction, TodoEnvironment, TodoError, TodoFilter,
    TodoId, TodoListReducer, TodoListState, UpdateKind, UserId,
};
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn env(service: MockTodoService) -> TodoEnvironment<MockTodoService> {
    TodoEnvironment::new(service, Arc::new(test_clock()), UserId::new(1))
        .with_error_display(Duration::from_secs(3))
}

fn reducer() -> TodoListReducer<MockTodoService> {
    TodoListReducer::new()
}

fn todo(id: i64, completed: bool) -> Todo {
    Todo::new(TodoId::new(id), UserId::new(1), format!("todo {id}"), completed)
}

fn todos_from(flags: &[bool]) -> Vec<Todo> {
    flags
        .iter()
        .enumerate()
        .map(|(i, completed)| todo(i64::try_from(i).unwrap() + 1, *completed))
        .collect()
}

fn offline() -> ServiceError {
    ServiceError::Transport("offline".to_string())
}

fn filter_strategy() -> impl Strategy<Value = TodoFilter> {
    prop_oneof![
        Just(TodoFilter::All),
        Just(TodoFilter::Active),
        Just(TodoFilter::Completed),
    ]
}

proptest! {
    #[test]
    fn filtering_is_pure_and_idempotent(
        flags in prop::collection::vec(any::<bool>(), 0..20),
        filter in filter_strategy(),
    ) {
        let mut state = TodoListState::with_todos(todos_from(&flags));
        state.filter = filter;
        let before = state.clone();

        let first: Vec<Todo> = state.visible_todos().into_iter().cloned().collect();
        let second: Vec<Todo> = state.visible_todos().into_iter().cloned().collect();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&state, &before);
        prop_assert!(first.iter().all(|t| filter.matches(t)));
        let expected = match filter {
            TodoFilter::All => flags.len(),
            TodoFilter::Active => flags.iter().filter(|c| !**c).count(),
            TodoFilter::Completed => flags.iter().filter(|c| **c).count(),
        };
        prop_assert_eq!(first.len(), expected);
    }

    #[test]
    fn toggle_all_updates_exactly_the_differing_todos(
        flags in prop::collection::vec(any::<bool>(), 0..20),
    ) {
        let mut state = TodoListState::with_todos(todos_from(&flags));
        let target = !(flags.iter().all(|c| *c) && !flags.is_empty());
        let differing = flags.iter().filter(|c| **c != target).count();

        let effects = reducer().reduce(&mut state, TodoAction::ToggleAll, &env(MockTodoService::new()));

        prop_assert_eq!(assertions::count_future_effects(&effects), differing);
        prop_assert_eq!(state.updating_ids().len(), differing);
        prop_assert!(state.todos.iter().all(|t| t.completed == target));
        prop_assert_eq!(state.todos.len(), flags.len());
    }

    #[test]
    fn failed_toggle_restores_exact_prior_list(
        flags in prop::collection::vec(any::<bool>(), 1..20),
        pick in any::<prop::sample::Index>(),
    ) {
        let original = todos_from(&flags);
        let id = original[pick.index(original.len())].id;
        let mut state = TodoListState::with_todos(original.clone());
        let env = env(MockTodoService::new());

        let _ = reducer().reduce(&mut state, TodoAction::Toggle { id }, &env);
        let _ = reducer().reduce(&mut state, TodoAction::UpdateFailed { id, error: offline() }, &env);

        prop_assert_eq!(&state.todos, &original);
        prop_assert!(state.pending.is_empty());
        prop_assert_eq!(state.error(), Some(&TodoError::Update(UpdateKind::Toggle)));
    }

    #[test]
    fn clear_completed_removes_exactly_the_successes(
        outcomes in prop::collection::vec((any::<bool>(), any::<bool>()), 0..20),
    ) {
        // (completed, delete succeeds)
        let flags: Vec<bool> = outcomes.iter().map(|(c, _)| *c).collect();
        let mut state = TodoListState::with_todos(todos_from(&flags));
        let env = env(MockTodoService::new());

        let effects = reducer().reduce(&mut state, TodoAction::ClearCompleted, &env);
        prop_assert_eq!(assertions::count_future_effects(&effects), flags.iter().filter(|c| **c).count());

        for (todo, (completed, succeeds)) in todos_from(&flags).iter().zip(&outcomes) {
            if !completed {
                continue;
            }
            let outcome = if *succeeds {
                TodoAction::Deleted { id: todo.id }
            } else {
                TodoAction::DeleteFailed { id: todo.id, error: offline() }
            };
            let _ = reducer().reduce(&mut state, outcome, &env);
        }

        let expected: Vec<Todo> = todos_from(&flags)
            .into_iter()
            .zip(&outcomes)
            .filter(|(_, (completed, succeeds))| !(*completed && *succeeds))
            .map(|(todo, _)| todo)
            .collect();
        prop_assert_eq!(&state.todos, &expected);
        prop_assert!(state.pending.is_empty());
    }
}

#[tokio::test]
async fn toggle_all_completions_in_any_order() {
    let service = MockTodoService::with_todos(vec![todo(1, false), todo(2, false), todo(3, false)]);
    service.fail_for(TodoId::new(2));
    let mut store = TestStore::new(
        TodoListState::with_todos(service.todos()),
        reducer(),
        env(service),
    );

    store.send(TodoAction::ToggleAll);
    assert_eq!(store.pending_futures(), 3);
    assert!(store.state().all_completed());

    // Completions arrive 3, 1, 2
    store.resolve_last().await;
    assert!(store.state().todos[2].completed);
    assert!(!store.state().is_busy(TodoId::new(3)));
    assert!(store.state().is_busy(TodoId::new(1)));

    store.resolve_next().await;
    store.resolve_next().await;

    let state = store.state();
    assert_eq!(state.todos, vec![todo(1, true), todo(2, false), todo(3, true)]);
    assert!(state.pending.is_empty());
    assert_eq!(state.error(), Some(&TodoError::Update(UpdateKind::Toggle)));
}

#[tokio::test]
async fn create_success_replaces_provisional_entry() {
    let service = MockTodoService::with_todos(vec![todo(4, false)]);
    let mut store = TestStore::new(
        TodoListState::with_todos(service.todos()),
        reducer(),
        env(service),
    );

    store.send(TodoAction::Create { title: "x".to_string() });
    let temp_id = store.state().saving_ids()[0];
    assert_eq!(store.state().todos.len(), 2);

    let outcome = store.resolve_next().await;
    assert!(matches!(outcome, Some(TodoAction::Created { temp_id: t, .. }) if t == temp_id));

    let state = store.state();
    assert_eq!(state.todos.len(), 2);
    assert_eq!(state.todos[1].id, TodoId::new(5));
    assert_eq!(state.todos[1].title, "x");
    assert!(!state.contains(temp_id));
}

#[tokio::test]
async fn creates_in_same_millisecond_get_distinct_ids() {
    let mut store = TestStore::new(
        TodoListState::with_todos(Vec::new()),
        reducer(),
        env(MockTodoService::new()),
    );

    store.send(TodoAction::Create { title: "first".to_string() });
    store.send(TodoAction::Create { title: "second".to_string() });

    let ids = store.state().saving_ids();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);

    // The second create finishes first
    store.resolve_last().await;
    store.resolve_next().await;

    let titles: Vec<&str> = store.state().todos.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "second"]);
    assert!(store.state().pending.is_empty());
}

#[tokio::test]
async fn stale_timer_does_not_clear_newer_notice() {
    let mut store = TestStore::new(
        TodoListState::with_todos(vec![todo(1, false)]),
        reducer(),
        env(MockTodoService::new()),
    );

    store.send(TodoAction::Create { title: " ".to_string() });
    assert_eq!(store.delay_durations(), vec![Duration::from_secs(3)]);

    // A second failure replaces the notice before the first timer fires
    store.send(TodoAction::Delete { id: TodoId::new(1) });
    store.send(TodoAction::DeleteFailed { id: TodoId::new(1), error: offline() });
    store.discard_delays();
    store.send(TodoAction::NoticeExpired { generation: 1 });

    assert_eq!(store.state().error(), Some(&TodoError::Delete));

    store.send(TodoAction::NoticeExpired { generation: 2 });
    assert!(store.state().notice.is_none());
}

#[tokio::test]
async fn delete_outcome_for_unknown_operation_is_ignored() {
    let mut store = TestStore::new(
        TodoListState::with_todos(vec![todo(1, false)]),
        reducer(),
        env(MockTodoService::new()),
    );

    store.send(TodoAction::Deleted { id: TodoId::new(1) });

    assert_eq!(store.state().todos.len(), 1);
    assert_eq!(store.pending_futures(), 0);
}

fn loading_store(service: MockTodoService) -> TestStore<TodoListReducer<MockTodoService>> {
    let mut store = TestStore::new(TodoListState::new(), reducer(), env(service));
    store.send(TodoAction::Load);
    store
}

fn ids(state: &TodoListState) -> Vec<i64> {
    state.todos.iter().map(|t| t.id.value()).collect()
}

#[tokio::test]
async fn fetch_listing_new_todo_before_create_confirms_keeps_ids_unique() {
    let mut store = loading_store(MockTodoService::new());
    store.send(TodoAction::Create { title: "x".to_string() });
    let temp_id = store.state().saving_ids()[0];
    let confirmed = Todo::new(TodoId::new(5), UserId::new(1), "x", false);

    store.send(TodoAction::Loaded { todos: vec![todo(1, false), confirmed.clone()] });
    store.send(TodoAction::Created { temp_id, todo: confirmed });

    assert_eq!(ids(store.state()), vec![1, 5]);
    assert!(store.state().pending.is_empty());
}

#[tokio::test]
async fn create_confirmed_before_stale_fetch_survives() {
    let mut store = loading_store(MockTodoService::new());
    store.send(TodoAction::Create { title: "x".to_string() });
    let temp_id = store.state().saving_ids()[0];

    store.send(TodoAction::Created {
        temp_id,
        todo: Todo::new(TodoId::new(5), UserId::new(1), "x", false),
    });
    store.send(TodoAction::Loaded { todos: vec![todo(1, false)] });

    assert_eq!(ids(store.state()), vec![1, 5]);
    assert!(store.state().confirmed_during_load.is_empty());
}

#[tokio::test]
async fn failed_fetch_keeps_confirmed_create() {
    let mut store = loading_store(MockTodoService::new());
    store.send(TodoAction::Create { title: "x".to_string() });
    let temp_id = store.state().saving_ids()[0];

    store.send(TodoAction::Created {
        temp_id,
        todo: Todo::new(TodoId::new(5), UserId::new(1), "x", false),
    });
    store.send(TodoAction::LoadFailed { error: offline() });

    assert_eq!(ids(store.state()), vec![5]);
    assert_eq!(store.state().error(), Some(&TodoError::Load));
}

#[tokio::test]
async fn load_and_create_resolve_in_either_order() {
    // Create first: the fetch already returns the new todo
    let mut store = loading_store(MockTodoService::with_todos(vec![todo(1, false)]));
    store.send(TodoAction::Create { title: "x".to_string() });
    store.resolve_last().await;
    store.resolve_next().await;
    assert_eq!(ids(store.state()), vec![1, 2]);
    assert!(store.state().pending.is_empty());

    // Fetch first: the create is confirmed after the list arrived
    let mut store = loading_store(MockTodoService::with_todos(vec![todo(1, false)]));
    store.send(TodoAction::Create { title: "x".to_string() });
    store.resolve_next().await;
    store.resolve_next().await;
    assert_eq!(ids(store.state()), vec![1, 2]);
    assert!(store.state().pending.is_empty());
}
