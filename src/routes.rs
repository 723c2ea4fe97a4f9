use crate::handlers;
use crate::state::AppState;
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/quiz", get(handlers::get_quiz))
        .route("/submitscore", post(handlers::submit_score))
        .route("/getleaderboard", get(handlers::get_leaderboard))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
