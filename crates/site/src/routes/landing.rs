//! Product-type landing pages.
//!
//! One page per known proxy category (`/residential-proxies` and friends),
//! driven entirely by the landing copy in the content store plus the live
//! plan catalog filtered to that category.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use tracing::instrument;

use proxies_seller_core::{ProxyCategory, UiPlan};

use crate::content::LandingCopy;
use crate::filters;
use crate::middleware::{CspNonce, OptionalUser};
use crate::models::SessionUser;
use crate::plans::{filter_by_category, map_packages};
use crate::state::AppState;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "landing.html")]
pub struct LandingTemplate {
    pub copy: LandingCopy,
    pub plans: Vec<UiPlan>,
    pub nonce: String,
    pub user: Option<SessionUser>,
    pub tawk_src: Option<String>,
}

/// `GET /residential-proxies`
pub async fn residential(
    state: State<AppState>,
    user: OptionalUser,
    nonce: CspNonce,
) -> Result<impl IntoResponse, StatusCode> {
    page(state, ProxyCategory::Residential, user, nonce).await
}

/// `GET /mobile-proxies`
pub async fn mobile(
    state: State<AppState>,
    user: OptionalUser,
    nonce: CspNonce,
) -> Result<impl IntoResponse, StatusCode> {
    page(state, ProxyCategory::Mobile, user, nonce).await
}

/// `GET /datacenter-proxies`
pub async fn datacenter(
    state: State<AppState>,
    user: OptionalUser,
    nonce: CspNonce,
) -> Result<impl IntoResponse, StatusCode> {
    page(state, ProxyCategory::Datacenter, user, nonce).await
}

/// `GET /fast-proxies`
pub async fn fast(
    state: State<AppState>,
    user: OptionalUser,
    nonce: CspNonce,
) -> Result<impl IntoResponse, StatusCode> {
    page(state, ProxyCategory::Fast, user, nonce).await
}

/// Render the landing page for one category.
///
/// # Errors
///
/// Returns 404 for categories without a dedicated page.
#[instrument(skip(state, nonce, user))]
async fn page(
    State(state): State<AppState>,
    category: ProxyCategory,
    OptionalUser(user): OptionalUser,
    CspNonce(nonce): CspNonce,
) -> Result<impl IntoResponse, StatusCode> {
    let copy = state
        .content()
        .landing_copy(&category)
        .ok_or(StatusCode::NOT_FOUND)?
        .clone();

    // Best effort: the copy carries the page even when the catalog is down.
    let plans = match state.backend().packages().await {
        Ok(rows) => filter_by_category(map_packages(&rows), Some(category.as_str())),
        Err(err) => {
            tracing::warn!(error = %err, "packages unavailable for landing page");
            Vec::new()
        }
    };

    Ok(LandingTemplate {
        copy,
        plans,
        nonce,
        user,
        tawk_src: state.config().tawk.embed_src(),
    })
}
