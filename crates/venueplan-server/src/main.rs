//! VenuePlan Project Server binary.

use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use venueplan_server::{app, AppState, ServerConfig};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "venueplan_server=info,venueplan_core=info,tower_http=info".into()
            }),
        )
        .init();

    let config = ServerConfig::from_env();
    let app = app(AppState::in_memory())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    info!("VenuePlan project server listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await
}
