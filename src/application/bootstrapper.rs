//! Application bootstrapper
//!
//! Handles all initialization and setup for the referral backend.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::CONFIG;
use crate::db;
use crate::endpoints;
use crate::services::AuditService;
use crate::state::AppState;

/// Bootstrap and run the application
pub async fn run() -> anyhow::Result<()> {
    // A missing .env file is normal in production
    let _ = dotenvy::dotenv();

    init_tracing();

    tracing::info!("Starting POS referral backend v{}", env!("CARGO_PKG_VERSION"));

    let state = init_services().await?;
    let app = create_app(state);

    serve(app).await
}

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("pos_referral={},tower_http=info", CONFIG.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_ansi(false))
        .init();
}

/// Initialize all application services
async fn init_services() -> anyhow::Result<AppState> {
    let conn = db::connect().await?;
    tracing::info!("Database connection established");

    let audit = AuditService::new(conn.clone());

    Ok(AppState::new(conn, audit, CONFIG.referral.clone()))
}

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    endpoints::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    let origins = &CONFIG.server.allowed_origins;
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}

/// Start the HTTP server
async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", CONFIG.server.host, CONFIG.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
