use axum::{
    routing::{get, patch, post},
    Router,
};
use interview_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware::rate_limit,
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let api = Router::new()
        .route(
            "/api/interviews",
            post(routes::interview_routes::schedule_interview),
        )
        .route(
            "/api/interviews/conflicts",
            get(routes::interview_routes::check_conflicts),
        )
        .route(
            "/api/interviews/suggestions",
            get(routes::interview_routes::suggest_slots),
        )
        .route(
            "/api/interviews/:id",
            get(routes::interview_routes::get_interview),
        )
        .route(
            "/api/interviews/:id/reschedule",
            patch(routes::interview_routes::reschedule_interview),
        )
        .route(
            "/api/interviews/:id/cancel",
            post(routes::interview_routes::cancel_interview),
        )
        .route(
            "/api/interviews/:id/complete",
            post(routes::interview_routes::complete_interview),
        )
        .route(
            "/api/employers/:id/interviews",
            get(routes::interview_routes::list_employer_interviews),
        )
        .route(
            "/api/employers/:id/conflict-logs",
            get(routes::interview_routes::list_employer_conflict_logs),
        )
        .route(
            "/api/candidates/:id/interviews",
            get(routes::interview_routes::list_candidate_interviews),
        )
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::ApiRateLimiter::new(config.api_rps),
            rate_limit::rps_middleware,
        ));

    let app = base_routes
        .merge(api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
