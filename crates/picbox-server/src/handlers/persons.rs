//! Person read and delete handlers.

use axum::extract::{Path, State};
use axum::Json;

use picbox_core::PersonView;

use crate::auth::SessionToken;
use crate::error::ApiError;
use crate::schema::common::Ack;
use crate::state::AppState;

/// `GET /person`
pub async fn list_persons(
    State(state): State<AppState>,
) -> Result<Json<Vec<PersonView>>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(service.list_persons()?))
}

/// `GET /person/{id}`
pub async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PersonView>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(service.get_person(id)?))
}

/// `DELETE /person/{id}` -- self only; cascades albums, pictures, blobs.
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    token: SessionToken,
) -> Result<Json<Ack>, ApiError> {
    let mut service = state.service.lock().await;
    service.delete_person(token.as_deref(), id)?;
    Ok(Json(Ack::success()))
}
