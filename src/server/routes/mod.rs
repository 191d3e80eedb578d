//! HTTP route modules
//!
//! - `routing` - the routing surface used by feature code
//! - `admin` - provider administration, health samples and settings
//! - `health` - liveness

pub mod admin;
pub mod health;
pub mod routing;

use actix_web::web;

/// Register every route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .configure(routing::configure_routes)
        .configure(admin::configure_routes);
}

/// Envelope for administrative and liveness responses
///
/// Failures are rendered by [`crate::GatewayError`]; this type only carries
/// successful payloads.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    /// Listing metadata such as counts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            meta: None,
        }
    }

    pub fn success_with_meta(data: T, meta: serde_json::Value) -> Self {
        Self {
            success: true,
            data,
            meta: Some(meta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let json = serde_json::to_value(ApiResponse::success("ok")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "ok");
        assert!(json.get("meta").is_none());
    }

    #[test]
    fn test_success_envelope_with_meta() {
        let json =
            serde_json::to_value(ApiResponse::success_with_meta(vec![1, 2], serde_json::json!({"count": 2})))
                .unwrap();
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert_eq!(json["meta"]["count"], 2);
    }
}
