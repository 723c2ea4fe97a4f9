use codify_backend::{build_state, routes::build_router};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let state = build_state();
    if state.provider.is_none() {
        tracing::warn!("QUIZ_API_KEY is not set, /quiz will report a configuration error");
    }

    let addr: SocketAddr = format!("{}:{}", state.config.host, state.config.port).parse()?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("backend listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
