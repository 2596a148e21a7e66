//! Common response bodies.

use serde::Serialize;

/// Fixed acknowledgement body for successful mutations:
/// `{"code": 200, "msg": "success"}`.
#[derive(Debug, Clone, Serialize)]
pub struct Ack {
    pub code: u16,
    pub msg: String,
}

impl Ack {
    pub fn success() -> Self {
        Ack {
            code: 200,
            msg: "success".to_string(),
        }
    }
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
}

impl ServiceInfo {
    pub fn current() -> Self {
        ServiceInfo {
            service: "picbox",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
