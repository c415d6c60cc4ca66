use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use orgman_api::config::AppConfig;
use orgman_api::database::DatabaseManager;
use orgman_api::handlers;
use orgman_api::middleware::require_admin;
use orgman_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        "Starting organization management service in {:?} mode",
        config.environment
    );

    let db = DatabaseManager::connect(&config.database)?;

    // The pool connects lazily; a missing store at boot degrades /health
    // instead of crashing the process.
    if let Err(e) = db.ensure_schema().await {
        tracing::warn!("Schema bootstrap failed, database unreachable: {}", e);
    }

    let state = AppState::new(config, db);
    let app = app(state.clone());

    // Allow tests or deployments to override port via env
    let port = std::env::var("ORG_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.db.close().await;
    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Admin authentication
        .merge(admin_routes())
        // Organization lifecycle
        .merge(org_routes(state.clone()))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/login", post(handlers::admin::login))
}

fn org_routes(state: AppState) -> Router<AppState> {
    // Mutating routes require a bearer token
    let protected = Router::new()
        .route("/org/update", put(handlers::org::update))
        .route("/org/delete", delete(handlers::org::delete))
        .route_layer(axum_middleware::from_fn_with_state(state, require_admin));

    Router::new()
        .route("/org/create", post(handlers::org::create))
        .route("/org/get", get(handlers::org::get))
        .route("/org/list", get(handlers::org::list))
        .merge(protected)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
}
