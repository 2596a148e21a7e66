//! Album read, create, and delete handlers.

use axum::extract::{Path, State};
use axum::{Form, Json};

use picbox_core::{AlbumView, PictureView};

use crate::auth::SessionToken;
use crate::error::ApiError;
use crate::schema::albums::CreateAlbumForm;
use crate::schema::common::Ack;
use crate::state::AppState;

/// `GET /album`
pub async fn list_albums(State(state): State<AppState>) -> Result<Json<Vec<AlbumView>>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(service.list_albums()?))
}

/// `GET /album/{id}`
pub async fn get_album(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AlbumView>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(service.get_album(id)?))
}

/// `GET /album/{id}/pictures`
pub async fn album_pictures(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<PictureView>>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(service.album_pictures(id)?))
}

/// `POST /createAlbum` -- authenticated; the owner is the session person.
pub async fn create_album(
    State(state): State<AppState>,
    token: SessionToken,
    Form(form): Form<CreateAlbumForm>,
) -> Result<Json<Ack>, ApiError> {
    let mut service = state.service.lock().await;
    service.create_album(token.as_deref(), form.name.as_deref())?;
    Ok(Json(Ack::success()))
}

/// `DELETE /album/{id}` -- owner only; cascades pictures and blobs.
pub async fn delete_album(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    token: SessionToken,
) -> Result<Json<Ack>, ApiError> {
    let mut service = state.service.lock().await;
    service.delete_album(token.as_deref(), id)?;
    Ok(Json(Ack::success()))
}
