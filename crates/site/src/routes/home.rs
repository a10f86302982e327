//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use proxies_seller_core::UiPlan;

use crate::content::{LandingCopy, Testimonial};
use crate::filters;
use crate::middleware::{CspNonce, OptionalUser};
use crate::models::SessionUser;
use crate::plans::map_packages;
use crate::state::AppState;

/// Number of plans featured on the home page.
const FEATURED_PLAN_COUNT: usize = 3;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub featured_plans: Vec<UiPlan>,
    pub categories: Vec<LandingCopy>,
    pub testimonials: Vec<Testimonial>,
    pub nonce: String,
    pub user: Option<SessionUser>,
    pub tawk_src: Option<String>,
}

/// Display the home page.
///
/// The featured-plans strip is best effort: if the backend is down the page
/// renders without it rather than failing.
#[instrument(skip(state, nonce, user))]
pub async fn home(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    let featured_plans = match state.backend().packages().await {
        Ok(rows) => {
            let mut plans = map_packages(&rows);
            plans.truncate(FEATURED_PLAN_COUNT);
            plans
        }
        Err(err) => {
            tracing::warn!(error = %err, "packages unavailable for home page");
            Vec::new()
        }
    };

    HomeTemplate {
        featured_plans,
        categories: state.content().landing_copy_all().to_vec(),
        testimonials: state.content().testimonials().to_vec(),
        nonce,
        user,
        tawk_src: state.config().tawk.embed_src(),
    }
}
