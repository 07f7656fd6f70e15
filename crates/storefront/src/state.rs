//! Application state shared across handlers.

use std::sync::Arc;

use bazaar_core::SessionId;
use moka::future::Cache;
use tokio::sync::Mutex;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::session::ShopSession;

/// A session's shop state behind an async lock.
pub type SharedSession = Arc<Mutex<ShopSession>>;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The catalog is immutable; per-session carts,
/// wishlists, and orders live in a cache that drops sessions after the
/// configured idle time.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<Catalog>,
    sessions: Cache<SessionId, SharedSession>,
}

impl AppState {
    /// Create application state with a generated catalog of
    /// `config.catalog_size` products.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let catalog = Arc::new(Catalog::generate(config.catalog_size));
        Self::with_catalog(config, catalog)
    }

    /// Create application state over an existing catalog.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, catalog: Arc<Catalog>) -> Self {
        let sessions = Cache::builder()
            .time_to_idle(config.session_idle)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                sessions,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Session state for a raw `sessionId`, created on first use.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the id is missing or blank.
    pub async fn session(&self, raw: Option<&str>) -> Result<SharedSession, AppError> {
        let id = require_session_id(raw)?;
        Ok(self
            .inner
            .sessions
            .get_with(id, async { Arc::new(Mutex::new(ShopSession::new())) })
            .await)
    }

    /// Session state if the session already exists.
    pub async fn existing_session(&self, raw: Option<&str>) -> Option<SharedSession> {
        let id = SessionId::parse(raw?)?;
        self.inner.sessions.get(&id).await
    }
}

fn require_session_id(raw: Option<&str>) -> Result<SessionId, AppError> {
    raw.and_then(SessionId::parse)
        .ok_or_else(|| AppError::BadRequest("sessionId is required".to_string()))
}
