//! Public page rendering, fail-open behavior, and response headers.

use axum::http::StatusCode;

use proxies_seller_integration_tests::{
    body_string, get, location, mock_backend, post_form, send, test_app, test_app_with_backend,
};

#[tokio::test]
async fn health_check() {
    let response = send(test_app(), get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn home_page_renders_without_backend() {
    let response = send(test_app(), get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("ProxySeller"));
    assert!(body.contains("Residential Proxies"));
}

#[tokio::test]
async fn pricing_fails_open_with_notice() {
    let response = send(test_app(), get("/pricing")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("temporarily unavailable"));
}

#[tokio::test]
async fn api_plans_fails_open_to_empty_array() {
    let response = send(test_app(), get("/api/plans")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "[]");
}

#[tokio::test]
async fn api_plans_category_filter_also_fails_open() {
    for uri in ["/api/plans?category=mobile", "/api/plans?type=residential"] {
        let response = send(test_app(), get(uri)).await;
        assert_eq!(response.status(), StatusCode::OK, "uri {uri}");
        assert_eq!(body_string(response).await, "[]");
    }
}

#[tokio::test]
async fn blog_index_and_post_render() {
    let index = send(test_app(), get("/blog")).await;
    assert_eq!(index.status(), StatusCode::OK);
    let body = body_string(index).await;
    assert!(body.contains("Proxy Rotation Strategies"));

    let post = send(test_app(), get("/blog/proxy-rotation-strategies")).await;
    assert_eq!(post.status(), StatusCode::OK);
    let body = body_string(post).await;
    assert!(body.contains("Sticky sessions"));
}

#[tokio::test]
async fn blog_unknown_slug_404s() {
    let response = send(test_app(), get("/blog/no-such-post")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blog_tag_filter_narrows_results() {
    let response = send(test_app(), get("/blog?tag=rotation")).await;
    let body = body_string(response).await;
    assert!(body.contains("Proxy Rotation Strategies"));
    assert!(!body.contains("Five-Minute Proxy Setup"));
}

#[tokio::test]
async fn legal_pages_render() {
    for path in ["/terms", "/privacy", "/refunds"] {
        let response = send(test_app(), get(path)).await;
        assert_eq!(response.status(), StatusCode::OK, "page {path}");
        let body = body_string(response).await;
        assert!(body.contains("Paddle"), "page {path} mentions the MoR");
    }
}

#[tokio::test]
async fn landing_pages_served_at_hyphenated_paths() {
    for (path, headline) in [
        ("/residential-proxies", "Residential Proxies"),
        ("/mobile-proxies", "Mobile Proxies"),
        ("/datacenter-proxies", "Datacenter Proxies"),
        ("/fast-proxies", "Fast Proxies"),
    ] {
        let response = send(test_app(), get(path)).await;
        assert_eq!(response.status(), StatusCode::OK, "page {path}");
        let body = body_string(response).await;
        assert!(body.contains(headline), "page {path}");
    }

    let unknown = send(test_app(), get("/quantum-proxies")).await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn info_pages_render() {
    for (path, needle) in [
        ("/about", "About ProxySeller"),
        ("/contact", "Contact Us"),
        ("/faqs", "Frequently Asked Questions"),
        ("/documentation", "Setup Guides"),
        ("/affiliate", "Affiliate Program"),
    ] {
        let response = send(test_app(), get(path)).await;
        assert_eq!(response.status(), StatusCode::OK, "page {path}");
        let body = body_string(response).await;
        assert!(body.contains(needle), "page {path}");
    }
}

#[tokio::test]
async fn checkout_without_plan_redirects_to_pricing() {
    let response = send(test_app(), get("/checkout")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/pricing");
}

#[tokio::test]
async fn checkout_resolves_plan_against_live_catalog() {
    let api_base = mock_backend().await;
    let app = test_app_with_backend(&api_base);

    let known = send(app, get("/checkout?plan=3")).await;
    assert_eq!(known.status(), StatusCode::OK);
    let body = body_string(known).await;
    assert!(body.contains("Residential Starter"));
}

#[tokio::test]
async fn checkout_unknown_plan_renders_not_found_page() {
    let api_base = mock_backend().await;
    let app = test_app_with_backend(&api_base);

    let response = send(app, get("/checkout?plan=999")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_string(response).await;
    assert!(body.contains("/pricing"), "not-found page links back to pricing");
}

#[tokio::test]
async fn checkout_with_backend_down_is_bad_gateway() {
    // Checkout must not fail open: no catalog means nothing can be sold
    let response = send(test_app(), get("/checkout?plan=3")).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn checkout_start_requires_login() {
    let response = send(test_app(), post_form("/checkout/start", "plan_id=3")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login?next=%2Fcheckout%2Fstart");
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let response = send(test_app(), get("/")).await;
    let headers = response.headers();

    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");

    let csp = headers["content-security-policy"]
        .to_str()
        .expect("utf-8 CSP");
    assert!(csp.contains("default-src 'none'"));
    assert!(csp.contains("'nonce-"));
}

#[tokio::test]
async fn request_id_is_echoed_or_generated() {
    let response = send(test_app(), get("/health")).await;
    assert!(response.headers().contains_key("x-request-id"));

    let mut request = get("/health");
    request
        .headers_mut()
        .insert("x-request-id", "trace-me-123".parse().expect("header"));
    let response = send(test_app(), request).await;
    assert_eq!(response.headers()["x-request-id"], "trace-me-123");
}

#[tokio::test]
async fn direct_connection_is_rate_limited_by_peer_address() {
    use std::net::SocketAddr;

    use axum::body::Body;
    use axum::extract::ConnectInfo;
    use axum::http::Request;

    // No proxy headers at all, as a direct local connection would send;
    // the limiter must key off the socket peer address instead of erroring
    let peer: SocketAddr = "192.0.2.20:50000".parse().expect("socket addr");
    let mut request = Request::builder()
        .uri("/auth/login")
        .body(Body::empty())
        .expect("request construction");
    request.extensions_mut().insert(ConnectInfo(peer));

    let response = send(test_app(), request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn csp_nonce_differs_per_request() {
    fn nonce_of(csp: &str) -> String {
        let start = csp.find("'nonce-").expect("nonce in CSP") + "'nonce-".len();
        let rest = &csp[start..];
        let end = rest.find('\'').expect("closing quote");
        rest[..end].to_owned()
    }

    let first = send(test_app(), get("/")).await;
    let second = send(test_app(), get("/")).await;

    let a = nonce_of(first.headers()["content-security-policy"].to_str().expect("csp"));
    let b = nonce_of(second.headers()["content-security-policy"].to_str().expect("csp"));
    assert_ne!(a, b);
}
