//! Blog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use crate::content::{BlogCategory, BlogPost};
use crate::filters;
use crate::middleware::{CspNonce, OptionalUser};
use crate::models::SessionUser;
use crate::state::AppState;

/// Number of recent posts to show in the sidebar.
const RECENT_POSTS_COUNT: usize = 3;

/// Query parameters for the blog index.
#[derive(Debug, Deserialize)]
pub struct BlogIndexQuery {
    pub tag: Option<String>,
    pub category: Option<String>,
}

/// Blog index page template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/index.html")]
pub struct BlogIndexTemplate {
    pub posts: Vec<BlogPost>,
    pub all_tags: Vec<String>,
    pub active_tag: Option<String>,
    pub active_category: Option<String>,
    pub nonce: String,
    pub user: Option<SessionUser>,
    pub tawk_src: Option<String>,
}

/// Blog post detail template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/show.html")]
pub struct BlogShowTemplate {
    pub post: BlogPost,
    pub recent_posts: Vec<BlogPost>,
    pub nonce: String,
    pub user: Option<SessionUser>,
    pub tawk_src: Option<String>,
}

fn matches_filters(post: &BlogPost, query: &BlogIndexQuery) -> bool {
    if let Some(tag) = query.tag.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        if !post.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            return false;
        }
    }
    if let Some(category) = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        if !post.category.matches(category) {
            return false;
        }
    }
    true
}

/// Display the blog index, optionally filtered by tag or category.
#[instrument(skip(state, nonce, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<BlogIndexQuery>,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    let posts: Vec<BlogPost> = state
        .content()
        .posts()
        .iter()
        .filter(|p| matches_filters(p, &query))
        .cloned()
        .collect();

    BlogIndexTemplate {
        posts,
        all_tags: state.content().all_tags(),
        active_tag: query.tag.filter(|t| !t.trim().is_empty()),
        active_category: query.category.filter(|c| !c.trim().is_empty()),
        nonce,
        user,
        tawk_src: state.config().tawk.embed_src(),
    }
}

/// Display a single blog post by slug.
///
/// # Errors
///
/// Returns 404 if the post doesn't exist.
#[instrument(skip(state, nonce, user))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    OptionalUser(user): OptionalUser,
    CspNonce(nonce): CspNonce,
) -> Result<impl IntoResponse, StatusCode> {
    let post = state
        .content()
        .get_post(&slug)
        .ok_or(StatusCode::NOT_FOUND)?
        .clone();

    let recent_posts: Vec<BlogPost> = state
        .content()
        .recent_posts(RECENT_POSTS_COUNT, Some(&slug))
        .into_iter()
        .cloned()
        .collect();

    Ok(BlogShowTemplate {
        post,
        recent_posts,
        nonce,
        user,
        tawk_src: state.config().tawk.embed_src(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentStore;

    fn query(tag: Option<&str>, category: Option<&str>) -> BlogIndexQuery {
        BlogIndexQuery {
            tag: tag.map(str::to_owned),
            category: category.map(str::to_owned),
        }
    }

    #[test]
    fn test_tag_filter_case_insensitive() {
        let store = ContentStore::new();
        let post = store
            .posts()
            .iter()
            .find(|p| p.tags.iter().any(|t| t == "rotation"))
            .expect("a post tagged rotation");

        assert!(matches_filters(post, &query(Some("ROTATION"), None)));
        assert!(!matches_filters(post, &query(Some("nonexistent-tag"), None)));
    }

    #[test]
    fn test_category_filter_accepts_slug_and_label() {
        let store = ContentStore::new();
        let post = store
            .posts()
            .iter()
            .find(|p| p.category == BlogCategory::UseCase)
            .expect("a use-case post");

        assert!(matches_filters(post, &query(None, Some("use-case"))));
        assert!(matches_filters(post, &query(None, Some("Use Case"))));
        assert!(!matches_filters(post, &query(None, Some("integration"))));
    }

    #[test]
    fn test_blank_filters_pass_everything() {
        let store = ContentStore::new();
        for post in store.posts() {
            assert!(matches_filters(post, &query(Some("  "), Some(""))));
        }
    }
}
