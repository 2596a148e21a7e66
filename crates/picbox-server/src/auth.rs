//! Credential hashing and the cookie-session extractor.
//!
//! Passwords are stored as salted bcrypt hashes and only ever compared with
//! `bcrypt::verify`. Session identity rides in the `picbox_session` cookie;
//! [`SessionToken`] pulls the raw token out of the request headers, and the
//! service resolves it to a person. There is no ambient current-user state:
//! whoever is authenticated is an explicit value in every handler call.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::error::ApiError;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "picbox_session";

/// Hashes a raw password with a fresh salt.
pub fn hash_password(raw: &str) -> Result<String, ApiError> {
    bcrypt::hash(raw, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// Verifies a raw password against a stored hash.
///
/// A malformed stored hash counts as a mismatch.
pub fn verify_password(raw: &str, hash: &str) -> bool {
    bcrypt::verify(raw, hash).unwrap_or(false)
}

/// `Set-Cookie` value establishing a session.
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value clearing the session.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// The session token carried by the request, if any.
///
/// Extraction never fails: an absent or foreign cookie simply yields `None`.
/// Whether the token maps to a live session is the service's decision.
#[derive(Debug, Clone)]
pub struct SessionToken(pub Option<String>);

impl SessionToken {
    /// The token as a borrowed str, for passing into service calls.
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Infallible> {
        let token = parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .map(|(_, token)| token.to_string());
        Ok(SessionToken(token))
    }
}
