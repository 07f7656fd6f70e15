//! Integration test support for Bazaar.
//!
//! [`TestServer`] serves the storefront router on an ephemeral local port so
//! tests can drive it over real HTTP, either with raw `reqwest` calls or
//! through [`RemoteBackend`].
//!
//! ```rust,ignore
//! let server = TestServer::start().await;
//! let mut backend = server.backend("session-1");
//! backend.add_cart_item(ProductId::new(1), 1).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;

use bazaar_core::SessionId;
use bazaar_storefront::backend::RemoteBackend;
use bazaar_storefront::catalog::Catalog;
use bazaar_storefront::config::{StorefrontConfig, parse_base_url};
use bazaar_storefront::{AppState, routes};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Products in the catalog a [`TestServer`] starts with.
pub const TEST_CATALOG_SIZE: usize = 30;

/// A storefront API server running in the test's runtime.
pub struct TestServer {
    addr: SocketAddr,
    base_url: Url,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Serve a generated catalog of [`TEST_CATALOG_SIZE`] products.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        Self::with_catalog(Catalog::generate(TEST_CATALOG_SIZE)).await
    }

    /// Serve `catalog`.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn with_catalog(catalog: Catalog) -> Self {
        let state = AppState::with_catalog(StorefrontConfig::default(), Arc::new(catalog));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, routes::app(state)).await;
        });

        let base_url =
            parse_base_url(&format!("http://{addr}")).expect("Test server URL is valid");
        Self {
            addr,
            base_url,
            handle,
        }
    }

    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// API root, ending with `/`.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for a path relative to the API root (`api/cart?...`).
    ///
    /// # Panics
    ///
    /// Panics if `path` cannot be joined onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> Url {
        self.base_url.join(path).expect("Invalid test path")
    }

    /// A REST backend scoped to `session`.
    ///
    /// # Panics
    ///
    /// Panics if `session` is blank.
    #[must_use]
    pub fn backend(&self, session: &str) -> RemoteBackend {
        let session_id = SessionId::parse(session).expect("Session id must not be blank");
        RemoteBackend::new(self.base_url.clone(), session_id)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
