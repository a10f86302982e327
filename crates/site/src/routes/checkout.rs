//! Checkout route handlers.
//!
//! The checkout page always resolves its plan against the live catalog, so a
//! stale or forged `plan` id can't reach payment. Unlike the marketing pages
//! this does not fail open: with the backend down there is nothing safe to
//! sell, so the request surfaces a 502.
//!
//! Payment capture is simulated: confirming checkout activates nothing in
//! the backend yet, it just lands on the dashboard with an activation note.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use proxies_seller_core::UiPlan;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{CspNonce, OptionalUser, RequireUser};
use crate::models::SessionUser;
use crate::plans::map_packages;
use crate::state::AppState;

/// Query parameters for the checkout page.
///
/// `mode`, `error`, and `email` come from the checkout-bound auth routes
/// redirecting a failed attempt back here: they reopen the right panel with
/// the message and the typed email intact.
#[derive(Debug, Deserialize)]
pub struct CheckoutQuery {
    pub plan: Option<String>,
    pub mode: Option<String>,
    pub error: Option<String>,
    pub email: Option<String>,
}

/// Checkout confirmation form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutStartForm {
    pub plan_id: String,
}

/// Checkout page template.
///
/// Shows the auth panel (inline login/register) for guests and the payment
/// panel for logged-in users.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub plan: UiPlan,
    /// Urlencoded plan id, ready to embed in the auth action URLs.
    pub plan_param: String,
    /// Which auth panel form is open: "login" or "register".
    pub mode: String,
    /// User-facing message for a failed auth attempt, if any.
    pub error: Option<String>,
    /// Email to pre-fill after a failed attempt.
    pub email: String,
    pub nonce: String,
    pub user: Option<SessionUser>,
    pub tawk_src: Option<String>,
}

/// Unknown-plan template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/not_found.html")]
pub struct CheckoutNotFoundTemplate {
    pub nonce: String,
    pub user: Option<SessionUser>,
    pub tawk_src: Option<String>,
}

/// Resolve a plan id against the live catalog.
async fn resolve_plan(state: &AppState, plan_id: &str) -> Result<Option<UiPlan>, AppError> {
    let rows = state.backend().packages().await?;
    Ok(map_packages(&rows)
        .into_iter()
        .find(|p| p.id.as_str() == plan_id))
}

/// Display the checkout page for a plan.
///
/// Without a `plan` parameter there is nothing to buy; redirect to pricing.
///
/// # Errors
///
/// Returns 502 when the catalog cannot be fetched.
#[instrument(skip(state, nonce, user))]
pub async fn show(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<CheckoutQuery>,
    CspNonce(nonce): CspNonce,
) -> Result<Response, AppError> {
    let Some(plan_id) = query.plan.as_deref().map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(Redirect::to("/pricing").into_response());
    };

    let tawk_src = state.config().tawk.embed_src();
    match resolve_plan(&state, plan_id).await? {
        Some(plan) => {
            let plan_param = urlencoding::encode(plan.id.as_str()).into_owned();
            let mode = match query.mode.as_deref() {
                Some("register") => "register",
                _ => "login",
            };
            Ok(CheckoutTemplate {
                plan,
                plan_param,
                mode: mode.to_owned(),
                error: query.error.as_deref().map(super::auth::ErrorCode::message_for),
                email: query.email.unwrap_or_default(),
                nonce,
                user,
                tawk_src,
            }
            .into_response())
        }
        None => Ok((
            StatusCode::NOT_FOUND,
            CheckoutNotFoundTemplate {
                nonce,
                user,
                tawk_src,
            },
        )
            .into_response()),
    }
}

/// Confirm checkout for a plan (simulated payment).
///
/// Requires a logged-in user. The plan id is re-validated against the live
/// catalog before "activation".
///
/// # Errors
///
/// Returns 502 when the catalog cannot be fetched, 404 for an unknown plan.
#[instrument(skip(state, user, form))]
pub async fn start(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Form(form): Form<CheckoutStartForm>,
) -> Result<Response, AppError> {
    let plan = resolve_plan(&state, form.plan_id.trim())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("plan {}", form.plan_id)))?;

    tracing::info!(user_id = %user.id, plan_id = %plan.id, "simulated checkout completed");

    let target = format!(
        "/dashboard?activated={}",
        urlencoding::encode(plan.id.as_str())
    );
    Ok(Redirect::to(&target).into_response())
}
