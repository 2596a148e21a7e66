//! Binary entrypoint for the picbox HTTP server.
//!
//! Reads configuration from environment variables:
//! - `PICBOX_DB_PATH`: SQLite database file path (default: "picbox.db")
//! - `PICBOX_MEDIA_DIR`: directory for uploaded picture blobs (default: "media")
//! - `PICBOX_PORT`: server listen port (default: "3000")

use picbox_server::router::build_router;
use picbox_server::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let db_path = std::env::var("PICBOX_DB_PATH").unwrap_or_else(|_| "picbox.db".to_string());
    let media_dir = std::env::var("PICBOX_MEDIA_DIR").unwrap_or_else(|_| "media".to_string());
    let port = std::env::var("PICBOX_PORT").unwrap_or_else(|_| "3000".to_string());

    let state = AppState::new(&db_path, &media_dir)
        .expect("Failed to initialize application state");

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("picbox server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
