//! Request correlation ids.
//!
//! The edge proxy in front of this site sets `x-request-id`; reusing its
//! value keeps one id across proxy logs, our tracing output, and Sentry.
//! Inbound values are only trusted when they look like an id, so a client
//! can't inject header garbage into log lines. Everything else gets a
//! fresh UUID, and the final id is echoed on the response.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request ids.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest inbound id we will reuse. UUIDs are 36 chars; this leaves room
/// for prefixed schemes some proxies use.
const MAX_ID_LEN: usize = 64;

/// An inbound id worth keeping: non-empty, bounded, and made of the
/// characters id schemes actually use.
fn usable_inbound_id(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?;
    let usable = !raw.is_empty()
        && raw.len() <= MAX_ID_LEN
        && raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'));
    usable.then(|| raw.to_owned())
}

/// Attach a correlation id to the request's span, the Sentry scope, and the
/// response headers.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id =
        usable_inbound_id(request.headers()).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn headers_with_id(id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_str(id).unwrap());
        headers
    }

    #[test]
    fn test_reuses_sane_inbound_ids() {
        for id in ["trace-me-123", "a1b2c3", "req_9.42"] {
            assert_eq!(usable_inbound_id(&headers_with_id(id)).as_deref(), Some(id));
        }
    }

    #[test]
    fn test_rejects_empty_oversized_and_odd_ids() {
        assert!(usable_inbound_id(&HeaderMap::new()).is_none());
        assert!(usable_inbound_id(&headers_with_id("")).is_none());
        assert!(usable_inbound_id(&headers_with_id(&"x".repeat(65))).is_none());
        assert!(usable_inbound_id(&headers_with_id("has space")).is_none());
        assert!(usable_inbound_id(&headers_with_id("semi;colon")).is_none());
    }
}
