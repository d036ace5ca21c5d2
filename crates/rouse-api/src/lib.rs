pub mod handlers;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub use handlers::ApiState;

pub async fn serve(state: ApiState, port: u16) -> anyhow::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!(port, "API listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the application router. Split out so tests can drive it without
/// binding a socket.
pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/hosts", get(handlers::handle_list))
        .route("/hosts", post(handlers::handle_add))
        .route("/hosts/{id}", put(handlers::handle_update))
        .route("/hosts/{id}", delete(handlers::handle_delete))
        .route("/wake", post(handlers::handle_wake))
        .with_state(state);

    Router::new().nest("/api", api_routes).layer(cors)
}
