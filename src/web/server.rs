use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use super::{api, AppState};

pub async fn start_api_server(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // Read endpoints
        .route("/api/health", get(api::health_check))
        .route("/api/state", get(api::get_state))
        .route("/api/history", get(api::get_history))
        .route("/api/signals", get(api::get_signals))
        .route("/api/performance", get(api::get_performance))
        .route("/api/prediction", get(api::get_prediction))
        .route("/api/suggestions", get(api::get_suggestions))
        .route("/api/export", get(api::get_export))
        // Round endpoints
        .route("/api/rounds", post(api::post_round))
        .route("/api/rounds/undo", post(api::post_undo))
        .route("/api/rounds/clear", post(api::post_clear))
        // WebSocket
        .route("/ws", get(api::websocket_handler))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    info!("API server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
