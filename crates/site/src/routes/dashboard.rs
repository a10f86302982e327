//! Dashboard route handlers.
//!
//! Everything under `/dashboard` requires a verified session. Subscription
//! and invoice data is the mocked set from the content store; the backend
//! doesn't expose per-user subscriptions yet.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use crate::content::{MockInvoice, MockSubscription, MockTransaction};
use crate::filters;
use crate::middleware::{CspNonce, RequireUser};
use crate::models::SessionUser;
use crate::state::AppState;

/// Query parameters for the dashboard index.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Plan id just "activated" by the simulated checkout.
    pub activated: Option<String>,
}

/// Dashboard overview template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/index.html")]
pub struct DashboardTemplate {
    pub subscriptions: Vec<MockSubscription>,
    /// Set after a simulated checkout; shows the activation banner.
    pub activated: Option<String>,
    pub nonce: String,
    pub user: Option<SessionUser>,
    pub tawk_src: Option<String>,
}

/// Query parameters for the billing page.
#[derive(Debug, Deserialize)]
pub struct BillingQuery {
    /// Set to "missing" by `/api/billing/portal` when no portal is
    /// configured for this deployment.
    pub portal: Option<String>,
}

/// Billing page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/billing.html")]
pub struct BillingTemplate {
    pub invoices: Vec<MockInvoice>,
    pub portal_missing: bool,
    pub nonce: String,
    pub user: Option<SessionUser>,
    pub tawk_src: Option<String>,
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/profile.html")]
pub struct ProfileTemplate {
    pub nonce: String,
    pub user: Option<SessionUser>,
    pub tawk_src: Option<String>,
}

/// Subscription detail template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/subscription.html")]
pub struct SubscriptionTemplate {
    pub subscription: MockSubscription,
    pub nonce: String,
    pub user: Option<SessionUser>,
    pub tawk_src: Option<String>,
}

/// Display the dashboard overview.
#[instrument(skip(state, user, nonce))]
pub async fn index(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<DashboardQuery>,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    DashboardTemplate {
        subscriptions: state.content().subscriptions().to_vec(),
        activated: query.activated.filter(|a| !a.trim().is_empty()),
        nonce,
        user: Some(user),
        tawk_src: state.config().tawk.embed_src(),
    }
}

/// Display the billing page.
#[instrument(skip(state, user, nonce))]
pub async fn billing(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<BillingQuery>,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    BillingTemplate {
        invoices: state.content().invoices().to_vec(),
        portal_missing: query.portal.as_deref() == Some("missing"),
        nonce,
        user: Some(user),
        tawk_src: state.config().tawk.embed_src(),
    }
}

/// Transaction history page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/history.html")]
pub struct HistoryTemplate {
    pub transactions: Vec<MockTransaction>,
    pub nonce: String,
    pub user: Option<SessionUser>,
    pub tawk_src: Option<String>,
}

/// Display the transaction history: payments, renewals, refunds.
#[instrument(skip(state, user, nonce))]
pub async fn history(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    HistoryTemplate {
        transactions: state.content().transactions().to_vec(),
        nonce,
        user: Some(user),
        tawk_src: state.config().tawk.embed_src(),
    }
}

/// Settings page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/settings.html")]
pub struct SettingsTemplate {
    pub nonce: String,
    pub user: Option<SessionUser>,
    pub tawk_src: Option<String>,
}

/// Display the account settings page.
///
/// Credentials live in the backend, so this page points at the flows that
/// actually change things rather than pretending to edit locally.
#[instrument(skip(state, user, nonce))]
pub async fn settings(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    SettingsTemplate {
        nonce,
        user: Some(user),
        tawk_src: state.config().tawk.embed_src(),
    }
}

/// Display the profile page.
#[instrument(skip(state, user, nonce))]
pub async fn profile(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    ProfileTemplate {
        nonce,
        user: Some(user),
        tawk_src: state.config().tawk.embed_src(),
    }
}

/// Display a single subscription's detail page.
///
/// # Errors
///
/// Returns 404 for an unknown subscription id.
#[instrument(skip(state, user, nonce))]
pub async fn subscription(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
    CspNonce(nonce): CspNonce,
) -> Result<impl IntoResponse, StatusCode> {
    let subscription = state
        .content()
        .subscription(&id)
        .ok_or(StatusCode::NOT_FOUND)?
        .clone();

    Ok(SubscriptionTemplate {
        subscription,
        nonce,
        user: Some(user),
        tawk_src: state.config().tawk.embed_src(),
    })
}
