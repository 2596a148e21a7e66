//! Picture read, upload, and delete handlers.

use axum::extract::{Multipart, Path, State};
use axum::Json;

use picbox_core::PictureView;

use crate::auth::SessionToken;
use crate::error::ApiError;
use crate::schema::common::Ack;
use crate::state::AppState;

/// `GET /pictures`
pub async fn list_pictures(
    State(state): State<AppState>,
) -> Result<Json<Vec<PictureView>>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(service.list_pictures()?))
}

/// `GET /picture/{id}`
pub async fn get_picture(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PictureView>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(service.get_picture(id)?))
}

/// `POST /Album/{albumId}/addPicture` -- multipart `{image, name}`; the
/// caller must own the album.
pub async fn add_picture(
    State(state): State<AppState>,
    Path(album_id): Path<i64>,
    token: SessionToken,
    mut multipart: Multipart,
) -> Result<Json<Ack>, ApiError> {
    let mut name: Option<String> = None;
    let mut payload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::MissingFields(format!("malformed multipart body: {e}")))?
    {
        // Copy the field name out before consuming the field body.
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("name") => {
                let text = field.text().await.map_err(|e| {
                    ApiError::MissingFields(format!("unreadable name field: {e}"))
                })?;
                name = Some(text);
            }
            Some("image") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::MissingFields(format!("unreadable image field: {e}"))
                })?;
                payload = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let (filename, bytes) = payload.unwrap_or_else(|| ("upload".to_string(), Vec::new()));

    let mut service = state.service.lock().await;
    service.add_picture(
        token.as_deref(),
        album_id,
        name.as_deref(),
        &bytes,
        &filename,
    )?;
    Ok(Json(Ack::success()))
}

/// `DELETE /picture/{id}` -- album owner only.
pub async fn delete_picture(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    token: SessionToken,
) -> Result<Json<Ack>, ApiError> {
    let mut service = state.service.lock().await;
    service.delete_picture(token.as_deref(), id)?;
    Ok(Json(Ack::success()))
}
