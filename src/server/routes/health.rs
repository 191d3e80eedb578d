//! Liveness and version endpoints

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use std::borrow::Cow;
use tracing::debug;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/version", web::get().to(version_info));
}

/// Liveness status
#[derive(Debug, Clone, serde::Serialize)]
pub struct LivenessStatus {
    pub status: Cow<'static, str>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: Cow<'static, str>,
    /// Registered providers, enabled or not
    pub providers: usize,
}

/// Basic health check endpoint
///
/// Reports that the process is serving requests. Provider health is exposed
/// on the admin surface.
pub async fn health_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("Health check requested");

    let status = LivenessStatus {
        status: Cow::Borrowed("healthy"),
        timestamp: chrono::Utc::now(),
        version: Cow::Borrowed(crate::VERSION),
        providers: state.router.registry().len(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(status)))
}

/// Build metadata
async fn version_info() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(crate::build_info())))
}
