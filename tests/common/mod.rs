//! Test infrastructure for CineHub backend integration tests.
//!
//! Provides a `TestApp` wrapper around `axum_test::TestServer` with helper
//! methods for creating users, generating auth tokens, and making
//! authenticated requests.

use axum_test::TestServer;
use uuid::Uuid;

use cinehub::config::Config;
use cinehub::store::models::User;
use cinehub::store::{CatalogItem, Store};
use cinehub::{build_router, AppState};

const TEST_SECRET: &str = "test-jwt-secret-for-integration-tests";

/// Test application wrapper around axum_test::TestServer.
pub struct TestApp {
    server: TestServer,
    state: AppState,
}

impl TestApp {
    /// Create a test application with the default seeded catalog.
    ///
    /// Uses the same `build_router` as the binary, so the tests exercise
    /// exactly the production surface.
    #[allow(dead_code)]
    pub async fn new() -> Self {
        Self::with_store(Store::new())
    }

    /// Create a test application around a specific catalog.
    #[allow(dead_code)]
    pub fn with_catalog(catalog: Vec<CatalogItem>) -> Self {
        Self::with_store(Store::with_catalog(catalog))
    }

    fn with_store(store: Store) -> Self {
        let mut config = Config::default();
        config.server.jwt_secret = Some(TEST_SECRET.to_string());

        let state = AppState::new(config, store, TEST_SECRET.to_string());
        let server =
            TestServer::new(build_router(state.clone())).expect("Failed to create test server");

        Self { server, state }
    }

    /// Get a reference to the test server.
    pub fn server(&self) -> &TestServer {
        &self.server
    }

    /// Get a reference to the application state.
    #[allow(dead_code)]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Create a phone user directly in the store and return (id, token).
    pub async fn create_user(&self, phone: &str) -> (Uuid, String) {
        let user = self
            .state
            .store()
            .create_user(User::from_phone(phone.to_string()))
            .await;
        let token = self
            .state
            .auth_service()
            .create_token(user.id)
            .expect("Failed to create token");
        (user.id, token)
    }

    /// Create an Authorization header tuple for request builders.
    pub fn auth_header(&self, token: &str) -> (axum::http::HeaderName, axum::http::HeaderValue) {
        use axum::http::{header::AUTHORIZATION, HeaderValue};
        (
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).expect("Invalid token format"),
        )
    }
}
