//! Service info and the canonical not-found response.

use axum::http::StatusCode;
use axum::Json;

use crate::schema::common::ServiceInfo;

/// `GET /`
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo::current())
}

/// Fallback for unknown routes. The body shape is a compatibility contract.
pub async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"code": 404, "msg": "404: Not Found"})),
    )
}
