//! HTTP client for the external backend API.
//!
//! The backend (a PHP application outside this repository) owns users,
//! packages, and billing. This client covers the three endpoints the site
//! consumes: `POST /login`, `POST /register`, `GET /packages`.
//!
//! No explicit timeout, retry, or backoff is configured: a failed or slow
//! backend call surfaces as a [`BackendError`] and each route decides whether
//! to fail open (marketing pages) or fail loud (checkout).

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use proxies_seller_core::{Email, PackageRow, UserId};

/// Errors from backend API calls.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Network-level failure (connect, DNS, body read).
    #[error("backend transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response that isn't a recognized domain error.
    #[error("backend returned HTTP {status}")]
    Status { status: u16, body: String },

    /// Registration conflict: the email is already taken.
    #[error("email already registered")]
    EmailTaken,

    /// A 2xx response whose body doesn't carry what we need.
    #[error("malformed backend response: {0}")]
    MalformedResponse(String),
}

impl BackendError {
    /// The HTTP status for [`BackendError::Status`], if that's what this is.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Client for the external backend API.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base: String,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// `base` is the API base URL without a trailing slash, e.g.
    /// `http://localhost:8081/api`.
    #[must_use]
    pub fn new(base: &str) -> Self {
        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base: base.trim_end_matches('/').to_owned(),
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base)
    }

    /// Authenticate a user. Returns the backend user id on success.
    ///
    /// # Errors
    ///
    /// - [`BackendError::Status`] for any non-2xx response (the auth routes
    ///   map 401/403 to an "invalid credentials" code and everything else to
    ///   `backend_<status>`).
    /// - [`BackendError::MalformedResponse`] when a 2xx body carries no user
    ///   id in any of the shapes the backend has been seen to produce.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &Email, password: &str) -> Result<UserId, BackendError> {
        let response = self
            .inner
            .client
            .post(self.url("/login"))
            .json(&serde_json::json!({
                "email": email.as_str(),
                "password": password,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = response.json().await?;
        debug!("login response received");
        extract_user_id(&value).ok_or_else(|| {
            BackendError::MalformedResponse("login response carries no user id".to_owned())
        })
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// - [`BackendError::EmailTaken`] on HTTP 409, or on any error body that
    ///   mentions "already exists" (the backend is not consistent about which
    ///   it sends).
    /// - [`BackendError::Status`] for other non-2xx responses.
    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &Email, password: &str) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .post(self.url("/register"))
            .json(&serde_json::json!({
                "email": email.as_str(),
                "password": password,
            }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        if status.as_u16() == 409 || body.to_lowercase().contains("already exists") {
            return Err(BackendError::EmailTaken);
        }

        Err(BackendError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Fetch the package catalog.
    ///
    /// Accepts both response shapes the backend has shipped: a bare array,
    /// or an object wrapping the array under `"plans"`.
    ///
    /// # Errors
    ///
    /// - [`BackendError::Status`] for non-2xx responses.
    /// - [`BackendError::MalformedResponse`] when the body is neither shape.
    #[instrument(skip(self))]
    pub async fn packages(&self) -> Result<Vec<PackageRow>, BackendError> {
        let response = self.inner.client.get(self.url("/packages")).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = response.json().await?;
        parse_packages(value)
    }
}

/// Extract a user id from the shapes the backend has been observed to send:
/// `user_id`, `id`, `user.id`, `data.user_id`. Values may be strings or
/// numbers.
fn extract_user_id(value: &Value) -> Option<UserId> {
    let candidates = [
        value.get("user_id"),
        value.get("id"),
        value.get("user").and_then(|u| u.get("id")),
        value.get("data").and_then(|d| d.get("user_id")),
    ];

    candidates.into_iter().flatten().find_map(|v| match v {
        Value::String(s) if !s.is_empty() => Some(UserId::new(s.clone())),
        Value::Number(n) => Some(UserId::new(n.to_string())),
        _ => None,
    })
}

fn parse_packages(value: Value) -> Result<Vec<PackageRow>, BackendError> {
    let rows = match value {
        Value::Array(_) => value,
        Value::Object(ref map) if map.contains_key("plans") => {
            map.get("plans").cloned().unwrap_or(Value::Null)
        }
        _ => {
            return Err(BackendError::MalformedResponse(
                "packages response is not an array".to_owned(),
            ));
        }
    };

    serde_json::from_value(rows)
        .map_err(|e| BackendError::MalformedResponse(format!("package rows: {e}")))
}
