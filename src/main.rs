use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use rand::Rng;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cinehub::{build_router, config::Config, store::Store, AppState};

fn init_tracing() {
    // Initialize tracing with env-filter
    // RUST_LOG environment variable controls log levels
    // Default: debug for our crate, info for axum, warn for dependencies
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cinehub=debug,tower_http=debug,axum=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Periodically sweeps expired verification codes and OAuth states.
fn spawn_cleanup_task(state: AppState) {
    let interval = Duration::from_secs(state.config().auth.cleanup_interval_secs);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await; // first tick fires immediately
        loop {
            ticker.tick().await;
            let codes = state.verification_codes().cleanup().await;
            let states = state.qq_states().cleanup().await;
            if codes > 0 || states > 0 {
                tracing::debug!(
                    codes = codes,
                    states = states,
                    "Swept expired verification codes and OAuth states"
                );
            }
        }
    });
}

fn cors_layer(frontend_url: &str) -> CorsLayer {
    let origin = frontend_url
        .parse::<HeaderValue>()
        .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:5173"));

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

#[tokio::main]
async fn main() {
    // Initialize tracing first so we can log configuration loading
    init_tracing();

    tracing::info!("Starting CineHub Backend v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = match Config::load() {
        Ok(cfg) => {
            tracing::info!("Configuration loaded successfully");
            tracing::debug!("Server: {}:{}", cfg.server.host, cfg.server.port);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Get JWT secret, generating one if not configured (development mode)
    let jwt_secret = config.server.jwt_secret.clone().unwrap_or_else(|| {
        let secret: String = rand::thread_rng()
            .sample_iter(&rand::distributions::Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        tracing::warn!("No JWT secret configured, using random secret");
        tracing::warn!("Set CINEHUB_SERVER__JWT_SECRET for production use");
        secret
    });

    let store = Store::new();
    tracing::info!(titles = store.catalog().len(), "Catalog seeded");

    let state = AppState::new(config.clone(), store, jwt_secret);

    spawn_cleanup_task(state.clone());

    let app = build_router(state).layer(cors_layer(&config.frontend.base_url));

    let addr = config.server_addr();
    tracing::info!("CineHub Backend listening on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
