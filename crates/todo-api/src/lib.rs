//! JSON REST API for tasks.
//!
//! Exposes an axum [`Router`] backed by any [`todo_core::usecase::TaskUseCase`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = todo_api::router(Arc::new(TaskService::new(store)));
//! axum::serve(listener, app).await?;
//! ```

pub mod dto;
pub mod error;
pub mod tasks;
pub mod validation;

use std::{any::Any, net::SocketAddr, sync::Arc};

use axum::{
  Json, Router,
  body::Body,
  extract::ConnectInfo,
  http::{Request, StatusCode, header},
  response::{IntoResponse, Response},
  routing::get,
};
use serde_json::json;
use todo_core::usecase::TaskUseCase;
use tower_http::{
  LatencyUnit,
  catch_panic::CatchPanicLayer,
  trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

pub use error::ApiError;

/// Every route served by [`router`], as `(method, path)`.
pub const ROUTES: &[(&str, &str)] = &[
  ("GET", "/health"),
  ("POST", "/api/tasks"),
  ("GET", "/api/tasks"),
  ("GET", "/api/tasks/{id}"),
  ("DELETE", "/api/tasks/{id}"),
];

/// The full application: `/health`, the `/api` routes and the middleware
/// stack.
pub fn router<U>(usecase: Arc<U>) -> Router
where
  U: TaskUseCase + 'static,
{
  let app = Router::new()
    .route("/health", get(health))
    .nest("/api", api_router(usecase));
  with_middleware(app)
}

/// The `/tasks` routes alone, without middleware.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<U>(usecase: Arc<U>) -> Router<()>
where
  U: TaskUseCase + 'static,
{
  Router::new()
    .route("/tasks", get(tasks::list::<U>).post(tasks::create::<U>))
    .route("/tasks/{id}", get(tasks::get_one::<U>).delete(tasks::delete_one::<U>))
    .with_state(usecase)
}

/// Wrap `app` in panic recovery and per-request logging. Requests are logged
/// after panics have been turned into responses, so a recovered panic still
/// shows up as a 500.
///
/// The client address is only known when the app is served with
/// `into_make_service_with_connect_info::<SocketAddr>()` or sits behind a
/// proxy that sets `X-Forwarded-For`.
pub fn with_middleware(app: Router) -> Router {
  app.layer(CatchPanicLayer::custom(panic_response)).layer(
    TraceLayer::new_for_http()
      .make_span_with(request_span)
      .on_response(
        DefaultOnResponse::new()
          .level(Level::INFO)
          .latency_unit(LatencyUnit::Millis),
      ),
  )
}

fn request_span(req: &Request<Body>) -> Span {
  let user_agent = header_str(req, header::USER_AGENT.as_str()).unwrap_or_default();
  tracing::info_span!(
    "request",
    method = %req.method(),
    uri = %req.uri(),
    version = ?req.version(),
    client_ip = %client_ip(req),
    user_agent,
  )
}

fn header_str<'a>(req: &'a Request<Body>, name: &str) -> Option<&'a str> {
  req
    .headers()
    .get(name)
    .and_then(|v| v.to_str().ok())
    .map(str::trim)
    .filter(|v| !v.is_empty())
}

/// First `X-Forwarded-For` hop, then `X-Real-IP`, then the peer address.
fn client_ip(req: &Request<Body>) -> String {
  if let Some(hop) = header_str(req, "x-forwarded-for")
    .and_then(|v| v.split(',').next())
    .map(str::trim)
    .filter(|hop| !hop.is_empty())
  {
    return hop.to_string();
  }
  if let Some(ip) = header_str(req, "x-real-ip") {
    return ip.to_string();
  }
  req
    .extensions()
    .get::<ConnectInfo<SocketAddr>>()
    .map(|ConnectInfo(addr)| addr.ip().to_string())
    .unwrap_or_default()
}

async fn health() -> Json<serde_json::Value> {
  Json(json!({ "status": "ok" }))
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
  let message = if let Some(s) = payload.downcast_ref::<&str>() {
    (*s).to_string()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else {
    "unknown panic payload".to_string()
  };
  tracing::error!(panic = %message, "handler panicked");

  (
    StatusCode::INTERNAL_SERVER_ERROR,
    Json(json!({ "error": "internal server error" })),
  )
    .into_response()
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::{
    io,
    sync::atomic::{AtomicUsize, Ordering},
  };

  use serde_json::Value;
  use todo_core::{
    memory::MemoryTaskStore,
    store::TaskRepository,
    task::{NewTask, Task, TaskId},
    usecase::{CreateTaskParams, TaskListResult, TaskResult, TaskService},
  };
  use tower::ServiceExt as _;

  use super::*;
  use crate::dto::{TaskListResponse, TaskResponse};

  fn app() -> (Router, Arc<MemoryTaskStore>) {
    let store = Arc::new(MemoryTaskStore::new());
    let service = TaskService::new(store.clone());
    (router(Arc::new(service)), store)
  }

  async fn send(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Vec<u8>) {
    let req = Request::builder()
      .method(method)
      .uri(uri)
      .body(Body::from(body.to_string()))
      .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
  }

  fn json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
  }

  // ── Create ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_with_items_returns_201_and_the_aggregate() {
    let (app, _) = app();
    let (status, body) = send(
      &app,
      "POST",
      "/api/tasks",
      r#"{"title":"Shopping","description":"Weekly","items":[{"title":"Buy milk","completed":false},{"title":"Buy bread","completed":true}]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let task: TaskResponse = serde_json::from_slice(&body).unwrap();
    assert!(task.id > 0);
    assert_eq!(task.title, "Shopping");
    assert_eq!(task.description, "Weekly");
    assert_eq!(task.created_at, task.updated_at);
    assert_eq!(task.items.len(), 2);
    assert_eq!(task.items[0].title, "Buy milk");
    assert!(!task.items[0].completed);
    assert!(task.items[1].completed);
    assert!(task.items.iter().all(|i| i.id > 0 && i.task_id == task.id));
  }

  #[tokio::test]
  async fn create_without_items_returns_an_empty_list() {
    let (app, _) = app();
    let (status, body) = send(&app, "POST", "/api/tasks", r#"{"title":"Simple"}"#).await;

    assert_eq!(status, StatusCode::CREATED);
    let body = json(&body);
    assert_eq!(body["description"], "");
    assert_eq!(body["items"], Value::Array(vec![]));
  }

  #[tokio::test]
  async fn create_without_title_is_a_field_error() {
    let (app, store) = app();
    let (status, body) =
      send(&app, "POST", "/api/tasks", r#"{"description":"x"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body), serde_json::json!({ "title": "required" }));
    assert_eq!(store.task_count(), 0);
  }

  #[tokio::test]
  async fn create_with_untitled_item_inserts_nothing() {
    let (app, store) = app();
    let (status, body) = send(
      &app,
      "POST",
      "/api/tasks",
      r#"{"title":"Shopping","items":[{"title":""}]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["title"], "required");
    assert_eq!(store.task_count(), 0);
    assert_eq!(store.item_count(), 0);
  }

  #[tokio::test]
  async fn malformed_json_uses_the_generic_envelope() {
    let (app, _) = app();
    let (status, body) = send(&app, "POST", "/api/tasks", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = json(&body);
    assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));
  }

  // ── Read ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_returns_what_create_returned() {
    let (app, _) = app();
    let (_, created) = send(
      &app,
      "POST",
      "/api/tasks",
      r#"{"title":"Trip","items":[{"title":"Pack"},{"title":"Book"}]}"#,
    )
    .await;
    let created: TaskResponse = serde_json::from_slice(&created).unwrap();

    let (status, body) = send(&app, "GET", &format!("/api/tasks/{}", created.id), "").await;
    assert_eq!(status, StatusCode::OK);
    let fetched: TaskResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(fetched, created);
  }

  #[tokio::test]
  async fn get_missing_task_is_404() {
    let (app, _) = app();
    let (status, body) = send(&app, "GET", "/api/tasks/99999", "").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body), serde_json::json!({ "error": "task not found" }));
  }

  #[tokio::test]
  async fn non_positive_id_is_rejected_by_the_use_case() {
    let (app, _) = app();
    let (status, body) = send(&app, "GET", "/api/tasks/0", "").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body), serde_json::json!({ "error": "invalid task ID" }));
  }

  #[tokio::test]
  async fn list_is_newest_first() {
    let (app, _) = app();
    assert_eq!(
      json(&send(&app, "GET", "/api/tasks", "").await.1),
      serde_json::json!({ "tasks": [] })
    );

    for title in ["first", "second", "third"] {
      send(&app, "POST", "/api/tasks", &format!(r#"{{"title":"{title}"}}"#)).await;
    }

    let (status, body) = send(&app, "GET", "/api/tasks", "").await;
    assert_eq!(status, StatusCode::OK);
    let list: TaskListResponse = serde_json::from_slice(&body).unwrap();
    let titles: Vec<_> = list.tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["third", "second", "first"]);
  }

  // ── Delete ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_removes_task_and_items() {
    let (app, store) = app();
    let (_, created) = send(
      &app,
      "POST",
      "/api/tasks",
      r#"{"title":"Shopping","items":[{"title":"Buy milk"},{"title":"Buy bread"}]}"#,
    )
    .await;
    let id = json(&created)["id"].as_i64().unwrap();
    assert_eq!(store.item_count(), 2);

    let (status, body) = send(&app, "DELETE", &format!("/api/tasks/{id}"), "").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
    assert_eq!(store.item_count(), 0);

    let (status, _) = send(&app, "GET", &format!("/api/tasks/{id}"), "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_missing_task_is_404() {
    let (app, _) = app();
    let (status, _) = send(&app, "DELETE", "/api/tasks/12", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Path ids ────────────────────────────────────────────────────────────────

  /// Counts every call; answers nothing useful.
  #[derive(Default)]
  struct CountingUseCase {
    calls: AtomicUsize,
  }

  impl TaskUseCase for CountingUseCase {
    async fn create_task(&self, _: CreateTaskParams) -> todo_core::Result<TaskResult> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      Err(todo_core::Error::Invalid("unused".to_string()))
    }

    async fn get_task(&self, id: TaskId) -> todo_core::Result<TaskResult> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      Err(todo_core::Error::TaskNotFound(id))
    }

    async fn list_tasks(&self) -> todo_core::Result<TaskListResult> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      Ok(TaskListResult::default())
    }

    async fn delete_task(&self, id: TaskId) -> todo_core::Result<()> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      Err(todo_core::Error::TaskNotFound(id))
    }
  }

  #[tokio::test]
  async fn unparseable_id_never_reaches_the_use_case() {
    let usecase = Arc::new(CountingUseCase::default());
    let app = router(usecase.clone());

    for method in ["GET", "DELETE"] {
      let (status, body) = send(&app, method, "/api/tasks/invalid", "").await;
      assert_eq!(status, StatusCode::BAD_REQUEST);
      assert_eq!(json(&body), serde_json::json!({ "error": "invalid task ID" }));
    }
    assert_eq!(usecase.calls.load(Ordering::SeqCst), 0);
  }

  // ── Failures ────────────────────────────────────────────────────────────────

  struct FailingStore;

  fn refused() -> todo_core::Error {
    todo_core::Error::store(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"))
  }

  impl TaskRepository for FailingStore {
    async fn create(&self, _: NewTask) -> todo_core::Result<Task> {
      Err(refused())
    }

    async fn get_by_id(&self, _: TaskId) -> todo_core::Result<Task> {
      Err(refused())
    }

    async fn list(&self) -> todo_core::Result<Vec<Task>> {
      Err(refused())
    }

    async fn delete(&self, _: TaskId) -> todo_core::Result<()> {
      Err(refused())
    }
  }

  #[tokio::test]
  async fn store_failures_are_500_with_the_message() {
    let app = router(Arc::new(TaskService::new(FailingStore)));

    let (status, body) = send(&app, "GET", "/api/tasks", "").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&body), serde_json::json!({ "error": "connection refused" }));

    let (status, _) = send(&app, "POST", "/api/tasks", r#"{"title":"x"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  }

  async fn boom() -> StatusCode {
    panic!("boom")
  }

  #[tokio::test]
  async fn panics_become_500() {
    let app = with_middleware(Router::new().route("/boom", get(boom)));
    let (status, body) = send(&app, "GET", "/boom", "").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&body), serde_json::json!({ "error": "internal server error" }));
  }

  // ── Request log ─────────────────────────────────────────────────────────────

  #[test]
  fn client_ip_prefers_forwarded_headers_over_the_peer() {
    let peer = ConnectInfo(SocketAddr::from(([10, 0, 0, 9], 40000)));

    let mut req = Request::builder()
      .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
      .header("x-real-ip", "198.51.100.2")
      .body(Body::empty())
      .unwrap();
    req.extensions_mut().insert(peer);
    assert_eq!(client_ip(&req), "203.0.113.7");

    let mut req = Request::builder()
      .header("x-real-ip", "198.51.100.2")
      .body(Body::empty())
      .unwrap();
    req.extensions_mut().insert(peer);
    assert_eq!(client_ip(&req), "198.51.100.2");

    let mut req = Request::builder().body(Body::empty()).unwrap();
    req.extensions_mut().insert(peer);
    assert_eq!(client_ip(&req), "10.0.0.9");

    let req = Request::builder().body(Body::empty()).unwrap();
    assert_eq!(client_ip(&req), "");
  }

  #[tokio::test]
  async fn requests_with_client_headers_are_served() {
    let (app, _) = app();
    let req = Request::builder()
      .uri("/health")
      .header(header::USER_AGENT, "curl/8.5.0")
      .header("x-forwarded-for", "203.0.113.7")
      .body(Body::empty())
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
  }

  // ── Health ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_reports_ok() {
    let (app, _) = app();
    let (status, body) = send(&app, "GET", "/health", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), serde_json::json!({ "status": "ok" }));
  }
}
