//! Authentication extractors.
//!
//! Identity lives entirely in the signed `ps_session` cookie; these
//! extractors verify its signature against the configured secret on every
//! request. A cookie that is missing, malformed, or carries a bad signature
//! is treated identically: not logged in.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::models::SessionUser;
use crate::session;
use crate::state::AppState;

/// Extractor that requires a verified session.
///
/// Page requests without one are redirected to the login page with a `next`
/// parameter pointing back at the original URL; `/api/*` requests get a bare
/// 401 instead.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireUser(pub SessionUser);

/// Error returned when authentication is required but no valid session exists.
pub enum AuthRejection {
    /// Redirect to the login page, preserving the requested URL (for HTML requests).
    RedirectToLogin(String),
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(next) => {
                let target = format!("/auth/login?next={}", urlencoding::encode(&next));
                Redirect::to(&target).into_response()
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

/// Verify the session cookie in `parts`, if any.
fn verified_user(parts: &Parts, state: &AppState) -> Option<SessionUser> {
    let jar = CookieJar::from_headers(&parts.headers);
    let token = jar.get(session::SESSION_COOKIE)?.value().to_owned();
    session::verify_token(&token, &state.config().session_secret)
}

fn rejection_for(parts: &Parts) -> AuthRejection {
    if parts.uri.path().starts_with("/api/") {
        return AuthRejection::Unauthorized;
    }

    let next = parts.uri.query().map_or_else(
        || parts.uri.path().to_owned(),
        |q| format!("{}?{q}", parts.uri.path()),
    );
    AuthRejection::RedirectToLogin(next)
}

impl<S> FromRequestParts<S> for RequireUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        verified_user(parts, &state)
            .map(Self)
            .ok_or_else(|| rejection_for(parts))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireUser`, this does not reject the request when no valid
/// session exists.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     OptionalUser(user): OptionalUser,
/// ) -> impl IntoResponse {
///     match user {
///         Some(u) => format!("Hello, {}!", u.email),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalUser(pub Option<SessionUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        Ok(Self(verified_user(parts, &state)))
    }
}
