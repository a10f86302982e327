//! Pricing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use proxies_seller_core::UiPlan;

use crate::filters;
use crate::middleware::{CspNonce, OptionalUser};
use crate::models::SessionUser;
use crate::plans::{filter_by_category, map_packages};
use crate::state::AppState;

/// Query parameters for the pricing page.
#[derive(Debug, Deserialize)]
pub struct PricingQuery {
    /// Category filter, e.g. `?type=residential`.
    #[serde(rename = "type")]
    pub category: Option<String>,
}

/// Pricing page template.
#[derive(Template, WebTemplate)]
#[template(path = "pricing.html")]
pub struct PricingTemplate {
    pub plans: Vec<UiPlan>,
    /// Active category filter, if any.
    pub active_filter: Option<String>,
    /// Set when the backend could not be reached; shows an empty-state notice.
    pub catalog_unavailable: bool,
    pub nonce: String,
    pub user: Option<SessionUser>,
    pub tawk_src: Option<String>,
}

/// Display the pricing page, optionally filtered by category.
///
/// Fails open: a backend outage renders an empty catalog with a notice
/// instead of an error page.
#[instrument(skip(state, nonce, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<PricingQuery>,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    let (plans, catalog_unavailable) = match state.backend().packages().await {
        Ok(rows) => (
            filter_by_category(map_packages(&rows), query.category.as_deref()),
            false,
        ),
        Err(err) => {
            tracing::warn!(error = %err, "packages unavailable for pricing page");
            (Vec::new(), true)
        }
    };

    PricingTemplate {
        plans,
        active_filter: query.category.filter(|c| !c.trim().is_empty()),
        catalog_unavailable,
        nonce,
        user,
        tawk_src: state.config().tawk.embed_src(),
    }
}
