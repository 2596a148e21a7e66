//! Router assembly for the picbox HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with CORS,
//! tracing, and body-limit middleware layers.
//!
//! Routes use axum 0.8 `/{param}` path syntax. The `/Album/{albumId}/addPicture`
//! capitalization is part of the existing client contract and kept as-is.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Upper bound on upload request bodies (16 MiB).
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Builds the complete axum router with all API routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::meta::service_info))
        // Accounts and sessions
        .route("/person", get(handlers::persons::list_persons))
        .route(
            "/person/{id}",
            get(handlers::persons::get_person).delete(handlers::persons::delete_person),
        )
        .route("/register", post(handlers::session::register))
        .route("/login", post(handlers::session::login))
        .route("/logout", post(handlers::session::logout))
        // Albums
        .route("/album", get(handlers::albums::list_albums))
        .route(
            "/album/{id}",
            get(handlers::albums::get_album).delete(handlers::albums::delete_album),
        )
        .route("/album/{id}/pictures", get(handlers::albums::album_pictures))
        .route("/createAlbum", post(handlers::albums::create_album))
        // Pictures
        .route("/pictures", get(handlers::pictures::list_pictures))
        .route(
            "/picture/{id}",
            get(handlers::pictures::get_picture).delete(handlers::pictures::delete_picture),
        )
        .route(
            "/Album/{albumId}/addPicture",
            post(handlers::pictures::add_picture),
        )
        .fallback(handlers::meta::not_found)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
