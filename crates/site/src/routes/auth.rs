//! Authentication route handlers.
//!
//! Login and registration delegate credential checks to the backend API;
//! on success the site issues its own signed session cookie. Failures
//! redirect back to the form with a stable `error` code in the query string
//! so messages survive the redirect without server-side flash state.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use tracing::instrument;

use proxies_seller_core::Email;

use crate::backend::BackendError;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::CspNonce;
use crate::models::SessionUser;
use crate::session;
use crate::state::AppState;

// =============================================================================
// Error Codes
// =============================================================================

/// Stable error codes carried in the `?error=` query parameter.
///
/// Codes, not messages, go in URLs: they survive copy-paste, don't need
/// encoding, and the page controls the wording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    MissingFields,
    WeakPassword,
    PasswordMismatch,
    TermsRequired,
    EmailExists,
    Invalid,
    PleaseLogin,
    /// Unexpected backend HTTP status, e.g. `backend_503`.
    Backend(u16),
    ServerError,
}

impl ErrorCode {
    /// The query-string form of this code.
    #[must_use]
    pub fn as_code(&self) -> String {
        match self {
            Self::MissingFields => "missing_fields".to_owned(),
            Self::WeakPassword => "weak_password".to_owned(),
            Self::PasswordMismatch => "password_mismatch".to_owned(),
            Self::TermsRequired => "terms_required".to_owned(),
            Self::EmailExists => "email_exists".to_owned(),
            Self::Invalid => "invalid".to_owned(),
            Self::PleaseLogin => "please_login".to_owned(),
            Self::Backend(status) => format!("backend_{status}"),
            Self::ServerError => "server_error".to_owned(),
        }
    }

    /// Human-readable message for a code string, including unrecognized ones.
    #[must_use]
    pub fn message_for(code: &str) -> String {
        match code {
            "missing_fields" => "Please fill in all required fields.".to_owned(),
            "weak_password" => "Password must be at least 8 characters.".to_owned(),
            "password_mismatch" => "Passwords do not match.".to_owned(),
            "terms_required" => "You must agree to the Terms of Service.".to_owned(),
            "email_exists" => "An account with this email already exists.".to_owned(),
            "invalid" => "Invalid email or password.".to_owned(),
            "please_login" => "Account created. Please log in.".to_owned(),
            "server_error" => "Something went wrong. Please try again.".to_owned(),
            other if other.starts_with("backend_") => {
                "The service is temporarily unavailable. Please try again shortly.".to_owned()
            }
            _ => "Something went wrong. Please try again.".to_owned(),
        }
    }
}

/// Map a backend login/register failure to an error code.
fn code_for_backend_error(err: &BackendError) -> ErrorCode {
    match err {
        BackendError::EmailTaken => ErrorCode::EmailExists,
        BackendError::Status { status: 401 | 403, .. } => ErrorCode::Invalid,
        BackendError::Status { status, .. } => ErrorCode::Backend(*status),
        BackendError::Transport(_) | BackendError::MalformedResponse(_) => ErrorCode::ServerError,
    }
}

// =============================================================================
// Redirect Targets
// =============================================================================

/// Default post-login destination.
const DEFAULT_NEXT: &str = "/dashboard";

/// Sanitize a user-supplied post-login redirect target.
///
/// Only same-site absolute paths are allowed: the value must start with a
/// single `/` (a `//host` prefix is a protocol-relative external URL).
/// Anything else falls back to the dashboard.
#[must_use]
pub fn safe_next(next: Option<&str>) -> String {
    match next.map(str::trim) {
        Some(n) if n.starts_with('/') && !n.starts_with("//") => n.to_owned(),
        _ => DEFAULT_NEXT.to_owned(),
    }
}

/// Build a redirect back to an auth form with an error code.
fn form_error_redirect(form_path: &str, code: &ErrorCode, next: &str) -> Response {
    let target = format!(
        "{form_path}?error={}&next={}",
        code.as_code(),
        urlencoding::encode(next)
    );
    Redirect::to(&target).into_response()
}

/// Redirect target back to the checkout page's auth panel.
///
/// `mode` selects which panel form reopens; `email` pre-fills it so the
/// visitor doesn't retype their address after a failed attempt.
fn checkout_error_target(plan: &str, mode: &str, code: &ErrorCode, email: Option<&str>) -> String {
    let mut target = format!(
        "/checkout?plan={}&mode={mode}&error={}",
        urlencoding::encode(plan),
        code.as_code()
    );
    if let Some(email) = email.filter(|e| !e.is_empty()) {
        target.push_str("&email=");
        target.push_str(&urlencoding::encode(email));
    }
    target
}

fn checkout_error_redirect(plan: &str, mode: &str, code: &ErrorCode, email: Option<&str>) -> Response {
    Redirect::to(&checkout_error_target(plan, mode, code, email)).into_response()
}

/// Post-checkout destination carrying the activation banner.
fn activated_target(plan: &str) -> String {
    format!("/dashboard?activated={}", urlencoding::encode(plan))
}

// =============================================================================
// Form and Query Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub next: Option<String>,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    /// Terms-of-service checkbox; absent unless ticked.
    pub agree: Option<String>,
    pub next: Option<String>,
}

/// Query parameters for the auth pages.
#[derive(Debug, Deserialize)]
pub struct AuthPageQuery {
    pub error: Option<String>,
    pub next: Option<String>,
}

/// Query parameters for the checkout-bound auth actions.
#[derive(Debug, Deserialize)]
pub struct CheckoutAuthQuery {
    pub plan: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub next: String,
    pub nonce: String,
    pub user: Option<SessionUser>,
    pub tawk_src: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
    pub next: String,
    pub nonce: String,
    pub user: Option<SessionUser>,
    pub tawk_src: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<AuthPageQuery>,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    LoginTemplate {
        error: query.error.as_deref().map(ErrorCode::message_for),
        next: safe_next(query.next.as_deref()),
        nonce,
        user: None,
        tawk_src: state.config().tawk.embed_src(),
    }
}

/// Handle login form submission.
///
/// Validates locally, then delegates the credential check to the backend.
/// On success, sets the signed session cookie plus the display email cookie
/// and redirects to the sanitized `next` target.
#[instrument(skip(state, jar, form))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let next = safe_next(form.next.as_deref());

    if form.email.trim().is_empty() || form.password.is_empty() {
        return form_error_redirect("/auth/login", &ErrorCode::MissingFields, &next);
    }

    let Ok(email) = Email::parse(&form.email) else {
        return form_error_redirect("/auth/login", &ErrorCode::Invalid, &next);
    };

    match state.backend().login(&email, &form.password).await {
        Ok(user_id) => {
            let user = SessionUser { id: user_id, email };
            sign_in_response(&state, jar, &user, &next)
        }
        Err(err) => {
            tracing::warn!(error = %err, "login failed");
            form_error_redirect("/auth/login", &code_for_backend_error(&err), &next)
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(
    State(state): State<AppState>,
    Query(query): Query<AuthPageQuery>,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    RegisterTemplate {
        error: query.error.as_deref().map(ErrorCode::message_for),
        next: safe_next(query.next.as_deref()),
        nonce,
        user: None,
        tawk_src: state.config().tawk.embed_src(),
    }
}

/// Handle registration form submission.
///
/// Local validation runs before any backend call, in a fixed order:
/// required fields, terms checkbox, password strength, confirmation match.
/// After a successful registration the user is logged in immediately; if
/// that second call fails they are sent to the login page instead of seeing
/// an error for an account that was in fact created.
#[instrument(skip(state, jar, form))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    let next = safe_next(form.next.as_deref());

    if form.email.trim().is_empty() || form.password.is_empty() || form.password_confirm.is_empty()
    {
        return form_error_redirect("/auth/register", &ErrorCode::MissingFields, &next);
    }

    if form.agree.as_deref() != Some("1") {
        return form_error_redirect("/auth/register", &ErrorCode::TermsRequired, &next);
    }

    if form.password.len() < 8 {
        return form_error_redirect("/auth/register", &ErrorCode::WeakPassword, &next);
    }

    if form.password != form.password_confirm {
        return form_error_redirect("/auth/register", &ErrorCode::PasswordMismatch, &next);
    }

    let Ok(email) = Email::parse(&form.email) else {
        return form_error_redirect("/auth/register", &ErrorCode::Invalid, &next);
    };

    if let Err(err) = state.backend().register(&email, &form.password).await {
        tracing::warn!(error = %err, "registration failed");
        return form_error_redirect("/auth/register", &code_for_backend_error(&err), &next);
    }

    // The account exists now; log the user in with the same credentials.
    match state.backend().login(&email, &form.password).await {
        Ok(user_id) => {
            let user = SessionUser { id: user_id, email };
            sign_in_response(&state, jar, &user, &next)
        }
        Err(err) => {
            tracing::warn!(error = %err, "post-registration login failed");
            let target = format!(
                "/auth/login?error=please_login&next={}",
                urlencoding::encode(&next)
            );
            Redirect::to(&target).into_response()
        }
    }
}

// =============================================================================
// Checkout-Bound Auth
// =============================================================================

/// Handle the checkout page's inline login form.
///
/// Same credential flow as [`login`], but every failure goes back to
/// `/checkout?plan=…` so the visitor never loses the plan they picked, and
/// success lands on the dashboard with the activation banner.
#[instrument(skip(state, jar, form))]
pub async fn login_and_checkout(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CheckoutAuthQuery>,
    Form(form): Form<LoginForm>,
) -> Response {
    let Some(plan) = query.plan.as_deref().map(str::trim).filter(|p| !p.is_empty()) else {
        // No plan means nothing to buy; same as hitting /checkout bare.
        return Redirect::to("/pricing").into_response();
    };
    let email_input = form.email.trim();

    if email_input.is_empty() || form.password.is_empty() {
        return checkout_error_redirect(plan, "login", &ErrorCode::MissingFields, Some(email_input));
    }

    let Ok(email) = Email::parse(email_input) else {
        return checkout_error_redirect(plan, "login", &ErrorCode::Invalid, Some(email_input));
    };

    match state.backend().login(&email, &form.password).await {
        Ok(user_id) => {
            let user = SessionUser { id: user_id, email };
            sign_in_response(&state, jar, &user, &activated_target(plan))
        }
        Err(err) => {
            tracing::warn!(error = %err, "checkout login failed");
            checkout_error_redirect(
                plan,
                "login",
                &code_for_backend_error(&err),
                Some(email_input),
            )
        }
    }
}

/// Handle the checkout page's inline registration form.
///
/// Validation mirrors [`register`]; errors reopen the checkout register
/// panel with the email pre-filled. If the post-registration login fails,
/// the visitor is sent to the checkout login panel rather than told their
/// freshly created account is an error.
#[instrument(skip(state, jar, form))]
pub async fn register_and_checkout(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CheckoutAuthQuery>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let Some(plan) = query.plan.as_deref().map(str::trim).filter(|p| !p.is_empty()) else {
        return Redirect::to("/pricing").into_response();
    };
    let email_input = form.email.trim();
    let back = |code: &ErrorCode| checkout_error_redirect(plan, "register", code, Some(email_input));

    if email_input.is_empty() || form.password.is_empty() || form.password_confirm.is_empty() {
        return back(&ErrorCode::MissingFields);
    }
    if form.agree.as_deref() != Some("1") {
        return back(&ErrorCode::TermsRequired);
    }
    if form.password.len() < 8 {
        return back(&ErrorCode::WeakPassword);
    }
    if form.password != form.password_confirm {
        return back(&ErrorCode::PasswordMismatch);
    }
    let Ok(email) = Email::parse(email_input) else {
        return back(&ErrorCode::Invalid);
    };

    if let Err(err) = state.backend().register(&email, &form.password).await {
        tracing::warn!(error = %err, "checkout registration failed");
        return back(&code_for_backend_error(&err));
    }

    match state.backend().login(&email, &form.password).await {
        Ok(user_id) => {
            let user = SessionUser { id: user_id, email };
            sign_in_response(&state, jar, &user, &activated_target(plan))
        }
        Err(err) => {
            tracing::warn!(error = %err, "post-registration login failed");
            checkout_error_redirect(plan, "login", &ErrorCode::PleaseLogin, Some(email_input))
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout: clear both cookies and return to the login page.
pub async fn logout(jar: CookieJar) -> Response {
    clear_sentry_user();
    let jar = jar
        .add(session::removal_cookie(session::SESSION_COOKIE))
        .add(session::removal_cookie(session::EMAIL_COOKIE));
    (jar, Redirect::to("/auth/login")).into_response()
}

// =============================================================================
// Helpers
// =============================================================================

/// Issue session cookies for `user` and redirect to `next`.
fn sign_in_response(state: &AppState, jar: CookieJar, user: &SessionUser, next: &str) -> Response {
    set_sentry_user(&user.id, Some(user.email.as_str()));

    let secure = state.config().is_secure();
    let token = session::issue_token(user, &state.config().session_secret);
    let jar = jar
        .add(session::session_cookie(token, secure))
        .add(session::email_cookie(&user.email, secure));

    (jar, Redirect::to(next)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next_accepts_local_paths() {
        assert_eq!(safe_next(Some("/checkout?plan=3")), "/checkout?plan=3");
        assert_eq!(safe_next(Some("/blog")), "/blog");
    }

    #[test]
    fn test_safe_next_rejects_external_targets() {
        assert_eq!(safe_next(Some("//evil.example.com")), "/dashboard");
        assert_eq!(safe_next(Some("https://evil.example.com")), "/dashboard");
        assert_eq!(safe_next(Some("javascript:alert(1)")), "/dashboard");
    }

    #[test]
    fn test_safe_next_defaults_to_dashboard() {
        assert_eq!(safe_next(None), "/dashboard");
        assert_eq!(safe_next(Some("")), "/dashboard");
        assert_eq!(safe_next(Some("   ")), "/dashboard");
    }

    #[test]
    fn test_error_code_round_trip() {
        assert_eq!(ErrorCode::MissingFields.as_code(), "missing_fields");
        assert_eq!(ErrorCode::Backend(503).as_code(), "backend_503");
    }

    #[test]
    fn test_message_for_backend_codes() {
        let msg = ErrorCode::message_for("backend_503");
        assert!(msg.contains("temporarily unavailable"));
    }

    #[test]
    fn test_message_for_unknown_code() {
        let msg = ErrorCode::message_for("garbage");
        assert!(msg.contains("Something went wrong"));
    }

    #[test]
    fn test_checkout_error_target_carries_plan_mode_and_email() {
        let target = checkout_error_target(
            "residential-5",
            "register",
            &ErrorCode::TermsRequired,
            Some("user@example.com"),
        );
        assert_eq!(
            target,
            "/checkout?plan=residential-5&mode=register&error=terms_required&email=user%40example.com"
        );
    }

    #[test]
    fn test_checkout_error_target_omits_empty_email() {
        let target = checkout_error_target("3", "login", &ErrorCode::MissingFields, Some(""));
        assert_eq!(target, "/checkout?plan=3&mode=login&error=missing_fields");
    }

    #[test]
    fn test_activated_target_encodes_plan_id() {
        assert_eq!(activated_target("plan/9"), "/dashboard?activated=plan%2F9");
    }

    #[test]
    fn test_backend_error_mapping() {
        let invalid = BackendError::Status {
            status: 401,
            body: String::new(),
        };
        assert_eq!(code_for_backend_error(&invalid), ErrorCode::Invalid);

        let unavailable = BackendError::Status {
            status: 503,
            body: String::new(),
        };
        assert_eq!(code_for_backend_error(&unavailable), ErrorCode::Backend(503));

        assert_eq!(
            code_for_backend_error(&BackendError::EmailTaken),
            ErrorCode::EmailExists
        );
    }
}
