//! HTTP gateway for the Notion API.
//!
//! All remote I/O funnels through the `TaskGateway` trait, whose one
//! method always resolves to an `Envelope` — failures are data, never
//! `Err`, so nothing propagates across the boundary and callers handle
//! a single uniform shape. Credentials are read per call through the
//! injected store; when they are absent the gateway reports it without
//! attempting network I/O.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::credentials::CredentialStore;

use super::{NOTION_API_BASE, NOTION_VERSION, STATUS_DONE, STATUS_PROPERTY, STATUS_TODO};

/// A typed request crossing the gateway boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRequest {
    /// Query the task database with a filter body (possibly empty).
    Query { body: Value },
    /// Write the Status select of one record.
    UpdateStatus { task_id: String, done: bool },
}

/// Uniform success/failure wrapper for everything the gateway returns.
///
/// Query success carries the raw result pages; update success carries
/// an empty list. Failure carries the remote message (or a transport
/// message), the HTTP status when a response arrived, and the remote
/// error body for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    Success {
        results: Vec<Value>,
    },
    Failure {
        error: String,
        status: Option<u16>,
        detail: Value,
    },
}

impl Envelope {
    pub fn failure(error: impl Into<String>, status: Option<u16>, detail: Value) -> Self {
        Envelope::Failure {
            error: error.into(),
            status,
            detail,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }

    /// HTTP status of a failure, when a response arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            Envelope::Failure { status, .. } => *status,
            Envelope::Success { .. } => None,
        }
    }
}

/// Boundary through which all remote calls travel.
///
/// `send` is infallible by type: every fault inside an implementation
/// must surface as `Envelope::Failure`.
#[async_trait]
pub trait TaskGateway: Send + Sync {
    async fn send(&self, request: TaskRequest) -> Envelope;
}

/// PATCH body for a status write. `done` maps to the fixed two-value
/// select domain: true → "Done", false → "Todo".
fn status_update_body(done: bool) -> Value {
    let name = if done { STATUS_DONE } else { STATUS_TODO };
    serde_json::json!({
        "properties": { STATUS_PROPERTY: { "select": { "name": name } } }
    })
}

fn empty_detail() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Map a response status and body-parse outcome onto the envelope.
///
/// A readable error body contributes its `message` and rides along
/// wholesale as `detail`; an unreadable body on an error status still
/// reports the HTTP status. Update responses carry the page object
/// rather than `results`, which callers do not consume, so a missing
/// `results` key degrades to an empty list.
fn envelope_from_response(status: reqwest::StatusCode, body: Result<Value, String>) -> Envelope {
    match body {
        Ok(data) if status.is_success() => {
            let results = data
                .get("results")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            Envelope::Success { results }
        }
        Ok(data) => {
            let message = data
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            Envelope::Failure {
                error: message,
                status: Some(status.as_u16()),
                detail: data,
            }
        }
        Err(e) if status.is_success() => Envelope::failure(e, None, empty_detail()),
        Err(_) => Envelope::failure(
            format!("HTTP {}", status.as_u16()),
            Some(status.as_u16()),
            empty_detail(),
        ),
    }
}

/// reqwest-backed gateway against the Notion REST API.
pub struct HttpGateway {
    client: reqwest::Client,
    store: Arc<dyn CredentialStore>,
    base_url: String,
}

impl HttpGateway {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self::with_base(store, NOTION_API_BASE)
    }

    /// Gateway against a non-production endpoint root.
    pub fn with_base(store: Arc<dyn CredentialStore>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            store,
            base_url: base_url.into(),
        }
    }

    async fn dispatch(&self, request: TaskRequest) -> Envelope {
        let Some(credentials) = self.store.load() else {
            return Envelope::failure("missing_credentials", None, empty_detail());
        };

        let call = match request {
            TaskRequest::Query { body } => self
                .client
                .post(format!(
                    "{}/databases/{}/query",
                    self.base_url, credentials.database_id
                ))
                .json(&body),
            TaskRequest::UpdateStatus { task_id, done } => self
                .client
                .patch(format!("{}/pages/{}", self.base_url, task_id))
                .json(&status_update_body(done)),
        };

        let response = match call
            .header("Authorization", format!("Bearer {}", credentials.token))
            .header("Notion-Version", NOTION_VERSION)
            .send()
            .await
        {
            Ok(response) => response,
            // Transport-level failure: no response at all.
            Err(e) => return Envelope::failure(e.to_string(), None, empty_detail()),
        };

        let status = response.status();
        let body = response
            .json::<Value>()
            .await
            .map_err(|e| e.to_string());
        envelope_from_response(status, body)
    }
}

#[async_trait]
impl TaskGateway for HttpGateway {
    async fn send(&self, request: TaskRequest) -> Envelope {
        self.dispatch(request).await
    }
}
