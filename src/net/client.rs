use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

/// Error type for remote task service calls.
///
/// Transport and timeout failures carry no status code; that absence is what
/// distinguishes them from application-level (non-2xx) failures.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request timed out after {0}s")]
    Timeout(u64),
    #[error("network error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("{message} (status {status})")]
    Status {
        status: u16,
        message: String,
        /// Raw response body, JSON or not.
        payload: String,
    },
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}

impl ApiError {
    /// The HTTP status code, for application-level failures only.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Partial update body for `PUT /todos/{id}`. Absent fields are omitted
/// from the wire so the server only touches what the caller set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdatePatch {
    pub fn title(title: impl Into<String>) -> UpdatePatch {
        UpdatePatch {
            title: Some(title.into()),
            ..UpdatePatch::default()
        }
    }

    pub fn completed(completed: bool) -> UpdatePatch {
        UpdatePatch {
            completed: Some(completed),
            ..UpdatePatch::default()
        }
    }
}

/// Stateless client for the remote task service.
///
/// One request/response exchange per call; every call is bounded by the
/// configured deadline and normalizes success and failure into predictable
/// shapes. Holds no task state.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    /// Base URL without a trailing slash.
    base_url: String,
    timeout_secs: u64,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<ApiClient, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Transport)?;
        Ok(ApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs: timeout.as_secs(),
        })
    }

    /// Fetch all tasks as raw records, in server-chosen order.
    ///
    /// Tolerates a bare array or an object carrying the array under
    /// `items` or `todos`; anything else is an `UnexpectedShape` error.
    pub async fn list(&self) -> Result<Vec<Value>, ApiError> {
        let url = format!("{}/todos", self.base_url);
        debug!(%url, "GET todos");
        let response = self.http.get(&url).send().await.map_err(|e| self.wrap(e))?;
        let body = self.read_json(response).await?;
        parse_list_body(body)
    }

    /// Create a task; returns the authoritative created record.
    pub async fn create(&self, title: &str) -> Result<Value, ApiError> {
        let url = format!("{}/todos", self.base_url);
        debug!(%url, title, "POST todo");
        let response = self
            .http
            .post(&url)
            .json(&json!({ "title": title }))
            .send()
            .await
            .map_err(|e| self.wrap(e))?;
        self.read_json(response).await
    }

    /// Apply a partial update; returns the authoritative updated record.
    pub async fn update(&self, id: &str, patch: &UpdatePatch) -> Result<Value, ApiError> {
        let url = self.todo_url(id);
        debug!(%url, ?patch, "PUT todo");
        let response = self
            .http
            .put(&url)
            .json(patch)
            .send()
            .await
            .map_err(|e| self.wrap(e))?;
        self.read_json(response).await
    }

    /// Delete a task. The response body is ignored.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = self.todo_url(id);
        debug!(%url, "DELETE todo");
        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| self.wrap(e))?;
        check_status(response).await?;
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn todo_url(&self, id: &str) -> String {
        format!("{}/todos/{}", self.base_url, urlencoding::encode(id))
    }

    fn wrap(&self, e: reqwest::Error) -> ApiError {
        let err = if e.is_timeout() {
            ApiError::Timeout(self.timeout_secs)
        } else {
            ApiError::Transport(e)
        };
        warn!(error = %err, "request failed");
        err
    }

    /// Check the status, then decode the body as JSON. A non-JSON body on a
    /// successful response is an `UnexpectedShape` error; on a failed
    /// response the raw text still ends up in the error message.
    async fn read_json(&self, response: Response) -> Result<Value, ApiError> {
        let response = check_status(response).await?;
        let text = response.text().await.map_err(|e| self.wrap(e))?;
        serde_json::from_str(&text).map_err(|_| ApiError::UnexpectedShape(preview(&text)))
    }
}

/// Pass a successful response through; turn anything else into a
/// status-carrying error.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let payload = response.text().await.unwrap_or_default();
    let err = status_error(status, payload);
    warn!(error = %err, "service returned failure");
    Err(err)
}

/// Build the application error for a non-success response. Message
/// preference: server-supplied `detail` field, then the raw body text,
/// then a generic `status N`.
fn status_error(status: StatusCode, payload: String) -> ApiError {
    let detail = serde_json::from_str::<Value>(&payload)
        .ok()
        .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string))
        .filter(|s| !s.trim().is_empty());
    let message = detail
        .or_else(|| {
            let text = payload.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .unwrap_or_else(|| format!("status {}", status.as_u16()));
    ApiError::Status {
        status: status.as_u16(),
        message,
        payload,
    }
}

fn parse_list_body(body: Value) -> Result<Vec<Value>, ApiError> {
    match body {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => match map.remove("items").or_else(|| map.remove("todos")) {
            Some(Value::Array(records)) => Ok(records),
            _ => Err(ApiError::UnexpectedShape(
                "expected an array under `items` or `todos`".to_string(),
            )),
        },
        other => Err(ApiError::UnexpectedShape(preview(&other.to_string()))),
    }
}

fn preview(text: &str) -> String {
    const MAX: usize = 120;
    let text = text.trim();
    if text.len() <= MAX {
        text.to_string()
    } else {
        let cut = (0..=MAX).rev().find(|i| text.is_char_boundary(*i)).unwrap_or(0);
        format!("{}\u{2026}", &text[..cut])
    }
}
