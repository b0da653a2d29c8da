// Server module - HTTP server setup and routing
pub mod handlers;
pub mod response;
pub mod state;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::net::SocketAddr;
use tracing::info;

use crate::config::create_cors_layer;
use self::state::AppState;

/// Create the Axum application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/index/create", post(handlers::create_index))
        .route("/index", delete(handlers::delete_index))
        .route("/index/:name/mapping", put(handlers::apply_mapping))
        .route("/index/:name/documents", put(handlers::upsert_document))
        .route(
            "/index/:name/documents/:id",
            get(handlers::get_document).delete(handlers::remove_document),
        )
        .route("/index/:name/bulk", post(handlers::bulk_upsert))
        .route("/index/:name/bulk-delete", post(handlers::bulk_remove))
        .route("/data/populate", post(handlers::populate))
        .route("/search/auto-complete/:term/:size", get(handlers::autocomplete))
        .route("/search/movie/:id", get(handlers::find_movie))
        .layer(create_cors_layer())
        .with_state(state)
}

/// Run the server on the specified address until Ctrl-C
pub async fn run_server(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    info!("Server listening on {}", addr);
    info!("- Health endpoint: http://{}/health", addr);
    info!("- Autocomplete endpoint: http://{}/search/auto-complete/:term/:size", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;
    Ok(())
}
