//! In-process stub of the remote task service, for integration tests.
//!
//! Runs an axum router on an ephemeral port in a background thread with its
//! own runtime, so both async tests and spawned `tt` subprocesses can talk
//! to it.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};

/// Knobs for failure injection and wire-shape variation.
#[derive(Clone, Default)]
pub struct StubOptions {
    /// `None` → bare array; `Some(key)` → `{key: [...]}`.
    pub list_key: Option<&'static str>,
    pub fail_creates: bool,
    pub fail_updates: bool,
    pub fail_deletes: bool,
    /// Held before answering any request, for timeout and in-flight tests.
    pub delay: Option<Duration>,
}

struct Inner {
    tasks: Mutex<Vec<Value>>,
    next_id: AtomicU64,
    opts: StubOptions,
    list_hits: AtomicU64,
    create_hits: AtomicU64,
    update_hits: AtomicU64,
    delete_hits: AtomicU64,
}

pub struct StubServer {
    addr: SocketAddr,
    inner: Arc<Inner>,
}

impl StubServer {
    pub fn start(initial: Vec<Value>, opts: StubOptions) -> StubServer {
        let inner = Arc::new(Inner {
            tasks: Mutex::new(initial),
            next_id: AtomicU64::new(100),
            opts,
            list_hits: AtomicU64::new(0),
            create_hits: AtomicU64::new(0),
            update_hits: AtomicU64::new(0),
            delete_hits: AtomicU64::new(0),
        });

        let router = axum::Router::new()
            .route("/todos", get(list).post(create))
            .route("/todos/{id}", axum::routing::put(update).delete(remove))
            .with_state(Arc::clone(&inner));

        // Bind synchronously so the port is known before returning
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                axum::serve(listener, router).await.unwrap();
            });
        });

        StubServer { addr, inner }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Current server-side records.
    pub fn tasks(&self) -> Vec<Value> {
        self.inner.tasks.lock().unwrap().clone()
    }

    pub fn list_hits(&self) -> u64 {
        self.inner.list_hits.load(Ordering::SeqCst)
    }

    pub fn create_hits(&self) -> u64 {
        self.inner.create_hits.load(Ordering::SeqCst)
    }

    pub fn update_hits(&self) -> u64 {
        self.inner.update_hits.load(Ordering::SeqCst)
    }

    pub fn delete_hits(&self) -> u64 {
        self.inner.delete_hits.load(Ordering::SeqCst)
    }
}

async fn hold(inner: &Inner) {
    if let Some(delay) = inner.opts.delay {
        tokio::time::sleep(delay).await;
    }
}

fn record_id(record: &Value) -> String {
    match record.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn failure(detail: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": detail })),
    )
        .into_response()
}

async fn list(State(inner): State<Arc<Inner>>) -> Response {
    inner.list_hits.fetch_add(1, Ordering::SeqCst);
    hold(&inner).await;
    let tasks = inner.tasks.lock().unwrap().clone();
    match inner.opts.list_key {
        Some(key) => Json(json!({ key: tasks })).into_response(),
        None => Json(Value::Array(tasks)).into_response(),
    }
}

async fn create(State(inner): State<Arc<Inner>>, Json(body): Json<Value>) -> Response {
    inner.create_hits.fetch_add(1, Ordering::SeqCst);
    hold(&inner).await;
    if inner.opts.fail_creates {
        return failure("create rejected");
    }
    let id = inner.next_id.fetch_add(1, Ordering::SeqCst);
    let title = body.get("title").and_then(Value::as_str).unwrap_or_default();
    let record = json!({ "id": id, "title": title, "completed": false });
    inner.tasks.lock().unwrap().push(record.clone());
    Json(record).into_response()
}

async fn update(
    Path(id): Path<String>,
    State(inner): State<Arc<Inner>>,
    Json(body): Json<Value>,
) -> Response {
    inner.update_hits.fetch_add(1, Ordering::SeqCst);
    hold(&inner).await;
    if inner.opts.fail_updates {
        return failure("update rejected");
    }
    let mut tasks = inner.tasks.lock().unwrap();
    let Some(record) = tasks.iter_mut().find(|r| record_id(r) == id) else {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "no such todo" }))).into_response();
    };
    if let Some(title) = body.get("title").and_then(Value::as_str) {
        record["title"] = json!(title);
    }
    if let Some(completed) = body.get("completed").and_then(Value::as_bool) {
        record["completed"] = json!(completed);
    }
    Json(record.clone()).into_response()
}

async fn remove(Path(id): Path<String>, State(inner): State<Arc<Inner>>) -> Response {
    inner.delete_hits.fetch_add(1, Ordering::SeqCst);
    hold(&inner).await;
    if inner.opts.fail_deletes {
        return failure("delete rejected");
    }
    let mut tasks = inner.tasks.lock().unwrap();
    let before = tasks.len();
    tasks.retain(|r| record_id(r) != id);
    if tasks.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "no such todo" }))).into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}
