//! Registration, login, and logout handlers.
//!
//! Login and logout manipulate the session cookie via `Set-Cookie` headers;
//! the token itself lives in the database, so a cleared or forged cookie
//! simply fails to resolve to a person.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse};
use axum::{Form, Json};

use crate::auth::{self, SessionToken};
use crate::error::ApiError;
use crate::schema::common::Ack;
use crate::schema::session::CredentialsForm;
use crate::state::AppState;

/// `POST /register` -- anonymous callers only.
pub async fn register(
    State(state): State<AppState>,
    token: SessionToken,
    Form(form): Form<CredentialsForm>,
) -> Result<Json<Ack>, ApiError> {
    let mut service = state.service.lock().await;
    service.register(token.as_deref(), form.name.as_deref(), form.password.as_deref())?;
    Ok(Json(Ack::success()))
}

/// `POST /login` -- anonymous callers only; sets the session cookie.
pub async fn login(
    State(state): State<AppState>,
    token: SessionToken,
    Form(form): Form<CredentialsForm>,
) -> Result<impl IntoResponse, ApiError> {
    let mut service = state.service.lock().await;
    let session =
        service.login(token.as_deref(), form.name.as_deref(), form.password.as_deref())?;
    Ok((
        AppendHeaders([(SET_COOKIE, auth::session_cookie(&session))]),
        Json(Ack::success()),
    ))
}

/// `POST /logout` -- authenticated callers only; clears the session cookie.
pub async fn logout(
    State(state): State<AppState>,
    token: SessionToken,
) -> Result<impl IntoResponse, ApiError> {
    let mut service = state.service.lock().await;
    service.logout(token.as_deref())?;
    Ok((
        AppendHeaders([(SET_COOKIE, auth::clear_session_cookie())]),
        Json(Ack::success()),
    ))
}
