//! JSON API route handlers.
//!
//! Small surface consumed by the site's own front-end scripts.

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use proxies_seller_core::UiPlan;

use crate::middleware::{OptionalUser, RequireUser};
use crate::models::SessionUser;
use crate::plans::{filter_by_category, map_packages};
use crate::state::AppState;

/// Query parameters for `/api/plans`.
#[derive(Debug, Deserialize)]
pub struct PlansQuery {
    /// Category filter, e.g. `?category=residential`. The mapped plan field
    /// is named `type`, so that spelling is accepted too.
    #[serde(alias = "type")]
    pub category: Option<String>,
}

/// List plans as JSON, optionally filtered by category.
///
/// Fails open: a backend outage returns `200 []` so pricing widgets render
/// an empty state instead of breaking the page they're embedded in.
#[instrument(skip(state))]
pub async fn plans(
    State(state): State<AppState>,
    Query(query): Query<PlansQuery>,
) -> Json<Vec<UiPlan>> {
    match state.backend().packages().await {
        Ok(rows) => Json(filter_by_category(
            map_packages(&rows),
            query.category.as_deref(),
        )),
        Err(err) => {
            tracing::warn!(error = %err, "packages unavailable for /api/plans");
            Json(Vec::new())
        }
    }
}

/// Response body for `/api/auth/whoami`.
#[derive(Debug, Serialize)]
pub struct WhoamiResponse {
    /// The verified session identity, or `null` when not logged in.
    pub user: Option<SessionUser>,
}

/// Report the current verified identity.
///
/// The response reflects signature verification of the session cookie, not
/// the cookie's mere presence; a tampered cookie reads as logged out.
#[instrument(skip(user))]
pub async fn whoami(OptionalUser(user): OptionalUser) -> Json<WhoamiResponse> {
    Json(WhoamiResponse { user })
}

/// A plain 302 redirect.
///
/// The billing page follows this link directly, so the portal hop stays a
/// classic found-redirect rather than a 307 that would replay the method.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_owned())]).into_response()
}

/// Send a logged-in user to the external billing portal.
///
/// With no portal configured, bounce back to the billing page with a
/// `portal=missing` marker so it can explain itself.
#[instrument(skip(state, _user))]
pub async fn billing_portal(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
) -> Response {
    match state.config().billing_portal_url.as_deref() {
        Some(url) => found(url),
        None => found("/dashboard/billing?portal=missing"),
    }
}
