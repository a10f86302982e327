//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::BackendClient;
use crate::config::SiteConfig;
use crate::content::ContentStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the backend client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    backend: BackendClient,
    content: ContentStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Builds the backend client from the configured API base and loads the
    /// static content store.
    #[must_use]
    pub fn new(config: SiteConfig) -> Self {
        let backend = BackendClient::new(&config.api_base);
        let content = ContentStore::new();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                content,
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Get a reference to the static content store.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }
}
