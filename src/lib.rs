//! CineHub Backend Library
//!
//! Core functionality for the CineHub movie streaming backend.
//! This library exposes modules for use in integration tests.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware as axum_mw,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Serialize;

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod store;

use config::Config;
use services::auth::AuthService;
use services::qq::QqStates;
use services::verification::VerificationCodes;
use store::Store;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    store: Arc<Store>,
    auth_service: Arc<AuthService>,
    verification_codes: Arc<VerificationCodes>,
    qq_states: Arc<QqStates>,
}

impl AppState {
    /// Builds the state from a config and a store.
    pub fn new(config: Config, store: Store, jwt_secret: String) -> Self {
        let verification_codes = VerificationCodes::new(
            Duration::from_secs(config.auth.code_ttl_secs),
            config.auth.code_max_attempts,
        );
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            auth_service: Arc::new(AuthService::new(jwt_secret)),
            verification_codes: Arc::new(verification_codes),
            qq_states: Arc::new(QqStates::new()),
        }
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a reference to the record store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Get a reference to the auth service.
    pub fn auth_service(&self) -> &AuthService {
        &self.auth_service
    }

    /// Get a reference to the verification code table.
    pub fn verification_codes(&self) -> &VerificationCodes {
        &self.verification_codes
    }

    /// Get a reference to the outstanding QQ OAuth states.
    pub fn qq_states(&self) -> &QqStates {
        &self.qq_states
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub message: String,
    pub version: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "CineHub Backend is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Assembles the full application router. Shared by the binary and the
/// integration tests so both serve exactly the same surface.
pub fn build_router(state: AppState) -> Router {
    let authed = |router: Router<AppState>| {
        router.layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ))
    };

    let auth_routes = Router::new()
        .route("/send-code", post(api::auth::send_code))
        .route("/login-phone", post(api::auth::login_phone))
        .route("/register", post(api::auth::register))
        .route("/login", post(api::auth::login_email))
        .route("/qq/init", get(api::auth::qq_init))
        .route("/qq/callback", get(api::auth::qq_callback))
        .merge(authed(
            Router::new()
                .route("/me", get(api::auth::me))
                .route("/change-password", post(api::auth::change_password)),
        ));

    let favorite_routes = authed(
        Router::new()
            .route("/", post(api::favorites::add).get(api::favorites::list))
            .route("/check/:movie_id", get(api::favorites::check))
            .route("/count", get(api::favorites::count))
            .route("/:movie_id", delete(api::favorites::remove))
            .route("/batch/remove", post(api::favorites::batch_remove))
            .route("/clear/all", post(api::favorites::clear)),
    );

    let playlist_routes = authed(
        Router::new()
            .route("/", post(api::playlists::create).get(api::playlists::list))
            .route(
                "/:id",
                get(api::playlists::detail)
                    .put(api::playlists::update)
                    .delete(api::playlists::delete),
            )
            .route("/:id/movies", post(api::playlists::add_movie))
            .route("/:id/movies/:movie_id", delete(api::playlists::remove_movie))
            .route(
                "/:id/movies/:movie_id/check",
                get(api::playlists::check_movie),
            )
            .route("/:id/clear", post(api::playlists::clear)),
    );

    let history_routes = authed(
        Router::new()
            .route(
                "/",
                post(api::watch_history::record).get(api::watch_history::list),
            )
            .route("/recent", get(api::watch_history::recent))
            .route("/clear/all", delete(api::watch_history::clear))
            .route(
                "/:movie_id",
                put(api::watch_history::update)
                    .get(api::watch_history::single)
                    .delete(api::watch_history::delete),
            ),
    );

    let download_routes = authed(
        Router::new()
            .route("/", post(api::downloads::add).get(api::downloads::list))
            .route("/stats", get(api::downloads::stats))
            .route(
                "/movie/:movie_id",
                get(api::downloads::for_movie).delete(api::downloads::delete_for_movie),
            )
            .route("/clear/all", delete(api::downloads::clear))
            .route("/:download_id", delete(api::downloads::delete)),
    );

    let comment_routes = Router::new()
        .route("/movie/:movie_id", get(api::comments::for_movie))
        .route("/movie/:movie_id/stats", get(api::comments::movie_stats))
        .merge(authed(
            Router::new()
                .route("/", post(api::comments::create))
                .route("/user", get(api::comments::for_user))
                .route(
                    "/:id",
                    put(api::comments::update).delete(api::comments::delete),
                )
                .route(
                    "/:id/like",
                    post(api::comments::like).delete(api::comments::unlike),
                )
                .route("/:id/replies", post(api::comments::add_reply))
                .route(
                    "/:id/replies/:reply_id",
                    delete(api::comments::delete_reply),
                ),
        ));

    let follow_routes = Router::new()
        .route("/user/:user_id/followers", get(api::follows::public_followers))
        .route("/user/:user_id/following", get(api::follows::public_following))
        .merge(authed(
            Router::new()
                .route("/", post(api::follows::follow))
                .route("/check/:following_id", get(api::follows::check))
                .route("/following/list", get(api::follows::following_list))
                .route("/followers/list", get(api::follows::followers_list))
                .route("/stats", get(api::follows::stats))
                .route("/:following_id", delete(api::follows::unfollow)),
        ));

    let recommendation_routes = Router::new()
        .route("/category/:category", get(api::recommendations::by_category))
        .route("/popular", get(api::recommendations::popular))
        .route("/new", get(api::recommendations::newest))
        .route("/similar/:movie_id", get(api::recommendations::similar))
        .merge(authed(
            Router::new()
                .route("/", get(api::recommendations::list))
                .route("/generate", post(api::recommendations::generate))
                .route("/:id", delete(api::recommendations::delete)),
        ));

    let share_routes = Router::new()
        .route("/preview", get(api::shares::preview))
        .merge(authed(
            Router::new()
                .route("/movie", post(api::shares::share_movie))
                .route("/playlist", post(api::shares::share_playlist))
                .route("/profile", post(api::shares::share_profile))
                .route("/", get(api::shares::list))
                .route("/stats", get(api::shares::stats))
                .route("/qr", post(api::shares::qr)),
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api/favorites", favorite_routes)
        .nest("/api/playlists", playlist_routes)
        .nest("/api/watch-history", history_routes)
        .nest("/api/downloads", download_routes)
        .nest("/api/comments", comment_routes)
        .nest("/api/follows", follow_routes)
        .nest("/api/recommendations", recommendation_routes)
        .nest("/api/shares", share_routes)
        .with_state(state)
}
