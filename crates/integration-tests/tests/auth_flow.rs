//! Auth form behavior: validation order, error codes, redirect targets.
//!
//! The backend is unreachable in this harness, so any case that reaches a
//! backend call comes back as `server_error`. Cases that fail local
//! validation must produce their specific code instead, which also proves
//! validation runs before any network traffic.

use axum::http::StatusCode;

use proxies_seller_integration_tests::{
    get_with_cookie, location, post_form, send, session_cookie, test_app,
};

#[tokio::test]
async fn login_with_empty_fields_redirects_with_missing_fields() {
    let response = send(test_app(), post_form("/auth/login", "email=&password=")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/auth/login?error=missing_fields&next=%2Fdashboard"
    );
}

#[tokio::test]
async fn login_with_malformed_email_redirects_with_invalid() {
    let response = send(
        test_app(),
        post_form("/auth/login", "email=not-an-email&password=hunter22"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/auth/login?error=invalid&next=%2Fdashboard"
    );
}

#[tokio::test]
async fn login_with_backend_down_reports_server_error() {
    let response = send(
        test_app(),
        post_form("/auth/login", "email=user%40example.com&password=hunter22"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/auth/login?error=server_error&next=%2Fdashboard"
    );
}

#[tokio::test]
async fn login_preserves_safe_next_target() {
    let response = send(
        test_app(),
        post_form("/auth/login", "email=&password=&next=%2Fcheckout%3Fplan%3D3"),
    )
    .await;

    assert_eq!(
        location(&response),
        "/auth/login?error=missing_fields&next=%2Fcheckout%3Fplan%3D3"
    );
}

#[tokio::test]
async fn login_sanitizes_external_next_target() {
    let response = send(
        test_app(),
        post_form(
            "/auth/login",
            "email=&password=&next=%2F%2Fevil.example.com%2Fphish",
        ),
    )
    .await;

    // Protocol-relative URLs fall back to the dashboard
    assert_eq!(
        location(&response),
        "/auth/login?error=missing_fields&next=%2Fdashboard"
    );
}

#[tokio::test]
async fn register_requires_terms_agreement() {
    let response = send(
        test_app(),
        post_form(
            "/auth/register",
            "email=user%40example.com&password=longenough1&password_confirm=longenough1",
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/auth/register?error=terms_required&next=%2Fdashboard"
    );
}

#[tokio::test]
async fn register_rejects_weak_password_before_backend_call() {
    // backend is down: getting weak_password (not server_error) proves the
    // check runs before any network call
    let response = send(
        test_app(),
        post_form(
            "/auth/register",
            "email=user%40example.com&password=short&password_confirm=short&agree=1",
        ),
    )
    .await;

    assert_eq!(
        location(&response),
        "/auth/register?error=weak_password&next=%2Fdashboard"
    );
}

#[tokio::test]
async fn register_rejects_mismatched_passwords() {
    let response = send(
        test_app(),
        post_form(
            "/auth/register",
            "email=user%40example.com&password=longenough1&password_confirm=different2&agree=1",
        ),
    )
    .await;

    assert_eq!(
        location(&response),
        "/auth/register?error=password_mismatch&next=%2Fdashboard"
    );
}

#[tokio::test]
async fn register_with_backend_down_reports_server_error() {
    let response = send(
        test_app(),
        post_form(
            "/auth/register",
            "email=user%40example.com&password=longenough1&password_confirm=longenough1&agree=1",
        ),
    )
    .await;

    assert_eq!(
        location(&response),
        "/auth/register?error=server_error&next=%2Fdashboard"
    );
}

#[tokio::test]
async fn login_page_renders_error_message() {
    let response = send(
        test_app(),
        proxies_seller_integration_tests::get("/auth/login?error=invalid"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = proxies_seller_integration_tests::body_string(response).await;
    assert!(body.contains("Invalid email or password."));
}

#[tokio::test]
async fn logout_clears_both_cookies_and_goes_to_login() {
    let cookie = session_cookie("42", "user@example.com");
    let response = send(
        test_app(),
        proxies_seller_integration_tests::post_form_with_cookie("/auth/logout", "", &cookie),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login");

    let set_cookies: Vec<String> = response
        .headers()
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().expect("utf-8 cookie").to_owned())
        .collect();

    assert!(set_cookies.iter().any(|c| c.starts_with("ps_session=;")));
    assert!(set_cookies.iter().any(|c| c.starts_with("ps_email=;")));
}

#[tokio::test]
async fn checkout_login_errors_return_to_checkout_with_plan() {
    let response = send(
        test_app(),
        post_form("/auth/login-and-checkout?plan=3", "email=&password="),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/checkout?plan=3&mode=login&error=missing_fields"
    );
}

#[tokio::test]
async fn checkout_login_backend_failure_keeps_typed_email() {
    let response = send(
        test_app(),
        post_form(
            "/auth/login-and-checkout?plan=3",
            "email=user%40example.com&password=hunter22",
        ),
    )
    .await;

    assert_eq!(
        location(&response),
        "/checkout?plan=3&mode=login&error=server_error&email=user%40example.com"
    );
}

#[tokio::test]
async fn checkout_login_without_plan_redirects_to_pricing() {
    let response = send(
        test_app(),
        post_form("/auth/login-and-checkout", "email=&password="),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/pricing");
}

#[tokio::test]
async fn checkout_register_requires_terms_and_reopens_register_panel() {
    let response = send(
        test_app(),
        post_form(
            "/auth/register-and-checkout?plan=3",
            "email=user%40example.com&password=longenough1&password_confirm=longenough1",
        ),
    )
    .await;

    assert_eq!(
        location(&response),
        "/checkout?plan=3&mode=register&error=terms_required&email=user%40example.com"
    );
}

#[tokio::test]
async fn checkout_register_rejects_weak_password_before_backend_call() {
    let response = send(
        test_app(),
        post_form(
            "/auth/register-and-checkout?plan=3",
            "email=user%40example.com&password=short&password_confirm=short&agree=1",
        ),
    )
    .await;

    assert_eq!(
        location(&response),
        "/checkout?plan=3&mode=register&error=weak_password&email=user%40example.com"
    );
}

#[tokio::test]
async fn logged_in_user_sees_dashboard_after_valid_cookie() {
    let cookie = session_cookie("42", "user@example.com");
    let response = send(test_app(), get_with_cookie("/dashboard", &cookie)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = proxies_seller_integration_tests::body_string(response).await;
    assert!(body.contains("user@example.com"));
}
