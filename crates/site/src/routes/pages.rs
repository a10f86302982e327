//! Static page route handlers: the legal pages and the informational
//! marketing pages (about, contact, faqs, documentation, affiliate).

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::content::{InfoPage, LegalPage};
use crate::filters;
use crate::middleware::{CspNonce, OptionalUser};
use crate::models::SessionUser;
use crate::state::AppState;

/// Legal page template, shared by terms, privacy, and refunds.
#[derive(Template, WebTemplate)]
#[template(path = "pages/legal.html")]
pub struct LegalTemplate {
    pub page: LegalPage,
    pub nonce: String,
    pub user: Option<SessionUser>,
    pub tawk_src: Option<String>,
}

fn render(
    state: &AppState,
    slug: &str,
    nonce: String,
    user: Option<SessionUser>,
) -> Result<LegalTemplate, StatusCode> {
    let page = state
        .content()
        .legal_page(slug)
        .ok_or(StatusCode::NOT_FOUND)?
        .clone();

    Ok(LegalTemplate {
        page,
        nonce,
        user,
        tawk_src: state.config().tawk.embed_src(),
    })
}

/// Display the Terms of Service.
pub async fn terms(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    CspNonce(nonce): CspNonce,
) -> Result<impl IntoResponse, StatusCode> {
    render(&state, "terms", nonce, user)
}

/// Display the Privacy Policy.
pub async fn privacy(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    CspNonce(nonce): CspNonce,
) -> Result<impl IntoResponse, StatusCode> {
    render(&state, "privacy", nonce, user)
}

/// Display the Refund Policy.
pub async fn refunds(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    CspNonce(nonce): CspNonce,
) -> Result<impl IntoResponse, StatusCode> {
    render(&state, "refunds", nonce, user)
}

/// Informational page template (no "last updated" stamp).
#[derive(Template, WebTemplate)]
#[template(path = "pages/info.html")]
pub struct InfoTemplate {
    pub page: InfoPage,
    pub nonce: String,
    pub user: Option<SessionUser>,
    pub tawk_src: Option<String>,
}

fn render_info(
    state: &AppState,
    slug: &str,
    nonce: String,
    user: Option<SessionUser>,
) -> Result<InfoTemplate, StatusCode> {
    let page = state
        .content()
        .info_page(slug)
        .ok_or(StatusCode::NOT_FOUND)?
        .clone();

    Ok(InfoTemplate {
        page,
        nonce,
        user,
        tawk_src: state.config().tawk.embed_src(),
    })
}

/// Display the About page.
pub async fn about(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    CspNonce(nonce): CspNonce,
) -> Result<impl IntoResponse, StatusCode> {
    render_info(&state, "about", nonce, user)
}

/// Display the Contact page.
pub async fn contact(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    CspNonce(nonce): CspNonce,
) -> Result<impl IntoResponse, StatusCode> {
    render_info(&state, "contact", nonce, user)
}

/// Display the FAQ page.
pub async fn faqs(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    CspNonce(nonce): CspNonce,
) -> Result<impl IntoResponse, StatusCode> {
    render_info(&state, "faqs", nonce, user)
}

/// Display the documentation overview.
pub async fn documentation(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    CspNonce(nonce): CspNonce,
) -> Result<impl IntoResponse, StatusCode> {
    render_info(&state, "documentation", nonce, user)
}

/// Display the affiliate program page.
pub async fn affiliate(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    CspNonce(nonce): CspNonce,
) -> Result<impl IntoResponse, StatusCode> {
    render_info(&state, "affiliate", nonce, user)
}
