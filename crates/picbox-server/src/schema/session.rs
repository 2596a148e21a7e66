//! Registration and login form inputs.

use serde::Deserialize;

/// Form body for `POST /register` and `POST /login`.
///
/// Fields are optional at the deserialization layer; the service turns an
/// absent or blank field into the 403 missing-fields error rather than
/// letting the extractor reject the request with a 422.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}
