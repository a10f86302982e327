//! Integration tests for the ProxySeller site.
//!
//! These tests drive the full router in-process via `tower::ServiceExt`.
//! By default the configured backend base points at a port nothing listens
//! on, so every backend call fails fast with a connection error; tests lean
//! on that to exercise the fail-open paths (plan catalog) and the validation
//! that runs before any backend call (auth forms). Tests that need a
//! responding catalog spin up [`mock_backend`] on a random local port.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p proxies-seller-integration-tests
//! ```

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use secrecy::SecretString;
use tower::ServiceExt;

use proxies_seller_core::{Email, UserId};
use proxies_seller_site::config::{SiteConfig, TawkConfig};
use proxies_seller_site::models::SessionUser;
use proxies_seller_site::session;
use proxies_seller_site::state::AppState;

/// Signing secret used by every test app. Random hex, not a production value.
pub const TEST_SECRET: &str = "9f3c61b24aa84de0b6f7c15e8d29a47310fb5ce6924d8ab1703ce5f48d16b2a9";

/// Build a test configuration.
///
/// `api_base` points at a closed local port so backend calls fail
/// immediately instead of hanging.
#[must_use]
pub fn test_config() -> SiteConfig {
    SiteConfig {
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        base_url: "http://localhost:8080".to_owned(),
        session_secret: SecretString::from(TEST_SECRET),
        api_base: "http://127.0.0.1:1/api".to_owned(),
        billing_portal_url: None,
        tawk: TawkConfig {
            property_id: None,
            widget_id: None,
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Build the full application router backed by a test configuration.
#[must_use]
pub fn test_app() -> Router {
    proxies_seller_site::app(AppState::new(test_config()))
}

/// Build a router with a billing portal configured.
#[must_use]
pub fn test_app_with_portal(url: &str) -> Router {
    let mut config = test_config();
    config.billing_portal_url = Some(url.to_owned());
    proxies_seller_site::app(AppState::new(config))
}

/// Build a router whose backend base points at `api_base`.
#[must_use]
pub fn test_app_with_backend(api_base: &str) -> Router {
    let mut config = test_config();
    config.api_base = api_base.to_owned();
    proxies_seller_site::app(AppState::new(config))
}

/// Serve a one-plan stand-in backend on a random local port and return its
/// API base URL. The catalog holds a single residential plan with id "3".
///
/// # Panics
///
/// Panics if the local listener cannot be bound.
pub async fn mock_backend() -> String {
    use axum::routing::get;

    let catalog = serde_json::json!([{
        "id": "3",
        "name": "Residential Starter",
        "category": "residential",
        "price_cents": 700
    }]);
    let app = Router::new().route(
        "/api/packages",
        get(move || {
            let catalog = catalog.clone();
            async move { axum::Json(catalog) }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("mock backend addr");
    tokio::spawn(async move {
        if let Err(error) = axum::serve(listener, app).await {
            eprintln!("mock backend stopped: {error}");
        }
    });
    format!("http://{addr}/api")
}

/// A valid `ps_session` cookie header value for the given identity.
///
/// # Panics
///
/// Panics if `email` is not a valid address (test bug).
#[must_use]
pub fn session_cookie(id: &str, email: &str) -> String {
    let user = SessionUser {
        id: UserId::new(id),
        email: Email::parse(email).expect("test email must be valid"),
    };
    let token = session::issue_token(&user, &SecretString::from(TEST_SECRET));
    format!("{}={token}", session::SESSION_COOKIE)
}

/// A GET request with the client-IP header the rate limiter requires.
#[must_use]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-forwarded-for", "203.0.113.7")
        .body(Body::empty())
        .expect("request construction")
}

/// A GET request carrying a cookie header.
#[must_use]
pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-forwarded-for", "203.0.113.7")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("request construction")
}

/// A POST request with a urlencoded form body.
#[must_use]
pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("x-forwarded-for", "203.0.113.7")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .expect("request construction")
}

/// A POST form request carrying a cookie header.
#[must_use]
pub fn post_form_with_cookie(uri: &str, body: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("x-forwarded-for", "203.0.113.7")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_owned()))
        .expect("request construction")
}

/// Send one request through a fresh router.
///
/// # Panics
///
/// Panics if the service call itself fails (infallible in axum).
pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router call")
}

/// Read a response body to a string.
///
/// # Panics
///
/// Panics on a body read error or non-UTF-8 body.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body read");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// The `Location` header of a redirect response.
///
/// # Panics
///
/// Panics if the header is missing or not valid UTF-8.
#[must_use]
pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .expect("utf-8 Location header")
        .to_owned()
}
