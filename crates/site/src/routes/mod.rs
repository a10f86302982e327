//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//! GET  /pricing                - Pricing page (?type= filters by category)
//! GET  /residential-proxies    - Product-type landing pages
//! GET  /mobile-proxies
//! GET  /datacenter-proxies
//! GET  /fast-proxies
//!
//! # Blog
//! GET  /blog                   - Blog index (?tag= / ?category= filter)
//! GET  /blog/{slug}            - Blog post
//!
//! # Static pages
//! GET  /terms /privacy /refunds       - Legal pages
//! GET  /about /contact /faqs          - Informational pages
//! GET  /documentation /affiliate
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! POST /auth/login-and-checkout?plan=    - Checkout panel login
//! POST /auth/register-and-checkout?plan= - Checkout panel registration
//! POST /auth/logout            - Logout action
//!
//! # Checkout
//! GET  /checkout               - Checkout page (?plan= selects the plan)
//! POST /checkout/start         - Confirm checkout (simulated, requires auth)
//!
//! # Dashboard (requires auth)
//! GET  /dashboard              - Overview
//! GET  /dashboard/billing      - Invoices and billing portal link
//! GET  /dashboard/history      - Transaction history
//! GET  /dashboard/profile      - Profile
//! GET  /dashboard/settings     - Account settings
//! GET  /dashboard/subscriptions/{id} - Subscription detail
//!
//! # JSON API
//! GET  /api/plans              - Plan catalog (?category= filter, fails open to [])
//! GET  /api/auth/whoami        - Verified identity or null
//! GET  /api/billing/portal     - 302 to external billing portal
//! ```

pub mod api;
pub mod auth;
pub mod blog;
pub mod checkout;
pub mod dashboard;
pub mod home;
pub mod landing;
pub mod pages;
pub mod pricing;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Create the auth routes router.
///
/// The POST endpoints sit behind the strict rate limiter: they drive
/// backend credential checks.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login-and-checkout", post(auth::login_and_checkout))
        .route("/register-and-checkout", post(auth::register_and_checkout))
        .route("/logout", post(auth::logout))
        .layer(auth_rate_limiter())
}

/// Create the blog routes router.
pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(blog::index))
        .route("/{slug}", get(blog::show))
}

/// Create the dashboard routes router.
///
/// Authentication is enforced per handler by the `RequireUser` extractor.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/billing", get(dashboard::billing))
        .route("/history", get(dashboard::history))
        .route("/profile", get(dashboard::profile))
        .route("/settings", get(dashboard::settings))
        .route("/subscriptions/{id}", get(dashboard::subscription))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/plans", get(api::plans))
        .route("/auth/whoami", get(api::whoami))
        .route("/billing/portal", get(api::billing_portal))
        .layer(api_rate_limiter())
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Marketing pages
        .route("/", get(home::home))
        .route("/pricing", get(pricing::index))
        .route("/residential-proxies", get(landing::residential))
        .route("/mobile-proxies", get(landing::mobile))
        .route("/datacenter-proxies", get(landing::datacenter))
        .route("/fast-proxies", get(landing::fast))
        // Blog
        .nest("/blog", blog_routes())
        // Static pages
        .route("/terms", get(pages::terms))
        .route("/privacy", get(pages::privacy))
        .route("/refunds", get(pages::refunds))
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact))
        .route("/faqs", get(pages::faqs))
        .route("/documentation", get(pages::documentation))
        .route("/affiliate", get(pages::affiliate))
        // Auth
        .nest("/auth", auth_routes())
        // Checkout
        .route("/checkout", get(checkout::show))
        .route("/checkout/start", post(checkout::start))
        // Dashboard
        .nest("/dashboard", dashboard_routes())
        // JSON API
        .nest("/api", api_routes())
}
