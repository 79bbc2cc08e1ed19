use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use interview_backend::{
    config::{get_config, init_config},
    middleware, routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    if config.gemini_api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set; completion calls will fail until it is provided");
    }

    // Rendered artifacts accumulate here without garbage collection.
    tokio::fs::create_dir_all(&config.artifacts_dir).await?;
    info!("Serving artifacts from: {}", config.artifacts_dir);

    let app_state = AppState::new();

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let interview_api = Router::new()
        .route(
            "/api/interview/start",
            post(routes::interview::start_interview),
        )
        .route(
            "/api/interview/validate",
            post(routes::interview::validate_answer),
        )
        .route("/api/report", get(routes::report::get_report))
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::RateLimiter::new(config.public_rps),
            middleware::rate_limit::throttle,
        ));

    let app = base_routes
        .merge(interview_api)
        .nest_service("/artifacts", ServeDir::new(&config.artifacts_dir))
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
