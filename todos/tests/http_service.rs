//! Wire-format tests for `HttpTodoService` against a local axum server.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use optimist_todos::{
    HttpTodoService, NewTodo, ServiceError, Todo, TodoId, TodoService, UserId,
};
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct ServerState {
    requests: Arc<Mutex<Vec<String>>>,
    bodies: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl ServerState {
    fn record(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }
}

#[derive(Deserialize)]
struct ListQuery {
    #[serde(rename = "userId")]
    user_id: i64,
}

async fn list_todos(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Json<serde_json::Value> {
    state.record(format!("GET /todos?userId={}", query.user_id));
    Json(serde_json::json!([
        { "id": 1, "userId": query.user_id, "title": "a", "completed": false },
        { "id": 2, "userId": query.user_id, "title": "b", "completed": true },
    ]))
}

async fn create_todo(
    State(state): State<ServerState>,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    state.record("POST /todos".to_string());
    state.bodies.lock().unwrap().push(body.clone());

    let mut created = body;
    created["id"] = serde_json::json!(5);
    (StatusCode::CREATED, Json(created))
}

async fn update_todo(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    state.record(format!("PATCH /todos/{id}"));
    state.bodies.lock().unwrap().push(body.clone());

    if id == 404 {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(body))
}

async fn delete_todo(State(state): State<ServerState>, Path(id): Path<i64>) -> StatusCode {
    state.record(format!("DELETE /todos/{id}"));
    if id == 500 {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn broken_list() -> &'static str {
    "this is not json"
}

async fn spawn_server() -> (String, ServerState) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let state = ServerState::default();

    let app = Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/:id", patch(update_todo).delete(delete_todo))
        .route("/broken/todos", get(broken_list))
        .with_state(state.clone());

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{addr}"), state)
}

fn service(base_url: &str) -> HttpTodoService {
    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    HttpTodoService::with_client(base_url, client)
}

#[tokio::test]
async fn fetch_all_sends_user_id_query() {
    let (base, state) = spawn_server().await;
    let todos = service(&format!("{base}/api/")).fetch_all(UserId::new(42)).await.unwrap();

    assert_eq!(
        todos,
        vec![
            Todo::new(TodoId::new(1), UserId::new(42), "a", false),
            Todo::new(TodoId::new(2), UserId::new(42), "b", true),
        ]
    );
    assert_eq!(*state.requests.lock().unwrap(), vec!["GET /todos?userId=42"]);
}

#[tokio::test]
async fn create_posts_payload_without_id() {
    let (base, state) = spawn_server().await;
    let payload = NewTodo {
        user_id: UserId::new(7),
        title: "x".to_string(),
        completed: false,
    };

    let created = service(&format!("{base}/api")).create(payload).await.unwrap();

    assert_eq!(created, Todo::new(TodoId::new(5), UserId::new(7), "x", false));
    assert_eq!(
        state.bodies.lock().unwrap()[0],
        serde_json::json!({ "userId": 7, "title": "x", "completed": false })
    );
}

#[tokio::test]
async fn update_patches_full_todo() {
    let (base, state) = spawn_server().await;
    let todo = Todo::new(TodoId::new(3), UserId::new(1), "c", true);

    let stored = service(&format!("{base}/api")).update(todo.clone()).await.unwrap();

    assert_eq!(stored, todo);
    assert_eq!(*state.requests.lock().unwrap(), vec!["PATCH /todos/3"]);
    assert_eq!(
        state.bodies.lock().unwrap()[0],
        serde_json::json!({ "id": 3, "userId": 1, "title": "c", "completed": true })
    );
}

#[tokio::test]
async fn delete_accepts_empty_response() {
    let (base, state) = spawn_server().await;

    service(&format!("{base}/api")).delete(TodoId::new(8)).await.unwrap();

    assert_eq!(*state.requests.lock().unwrap(), vec!["DELETE /todos/8"]);
}

#[tokio::test]
async fn error_status_maps_to_status_error() {
    let (base, _state) = spawn_server().await;
    let api = service(&format!("{base}/api"));

    let missing = Todo::new(TodoId::new(404), UserId::new(1), "ghost", false);
    assert!(matches!(
        api.update(missing).await,
        Err(ServiceError::Status { status: 404, .. })
    ));
    assert!(matches!(
        api.delete(TodoId::new(500)).await,
        Err(ServiceError::Status { status: 500, .. })
    ));
}

#[tokio::test]
async fn malformed_body_maps_to_decode_error() {
    let (base, _state) = spawn_server().await;

    let result = service(&format!("{base}/broken")).fetch_all(UserId::new(1)).await;

    assert!(matches!(result, Err(ServiceError::Decode(_))));
}
