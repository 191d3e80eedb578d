//! Administrative endpoints
//!
//! Provider CRUD, on-demand probes, recent health samples and runtime
//! settings. Credentials never appear in responses. Every route requires
//! the admin key (see [`AdminAuth`]).

use crate::core::health::{HealthSample, HealthStatus};
use crate::core::registry::ProviderInput;
use crate::core::settings::SettingsUpdate;
use crate::server::middleware::AdminAuth;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Configure admin routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(AdminAuth)
            .route("/providers", web::get().to(list_providers))
            .route("/providers", web::post().to(create_provider))
            .route("/providers/{id}", web::get().to(get_provider))
            .route("/providers/{id}", web::put().to(update_provider))
            .route("/providers/{id}", web::delete().to(delete_provider))
            .route("/providers/{id}/probe", web::post().to(probe_provider))
            .route("/health", web::get().to(recent_health))
            .route("/settings", web::get().to(get_settings))
            .route("/settings", web::put().to(update_settings)),
    );
}

/// Query for recent health samples
#[derive(Debug, Clone, Deserialize)]
pub struct HealthQuery {
    pub limit: Option<usize>,
}

/// Recent samples plus the current classification per provider
#[derive(Debug, Clone, Serialize)]
pub struct HealthOverview {
    pub samples: Vec<HealthSample>,
    pub current: BTreeMap<String, HealthStatus>,
}

async fn list_providers(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let providers = state.providers.list();
    let meta = serde_json::json!({ "count": providers.len() });
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_meta(providers, meta)))
}

async fn create_provider(
    state: web::Data<AppState>,
    body: web::Json<ProviderInput>,
) -> ActixResult<HttpResponse> {
    let provider = state.providers.create(body.into_inner()).await?;
    info!("Provider {} created", provider.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(provider)))
}

async fn get_provider(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let provider = state.providers.get(&path)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(provider)))
}

async fn update_provider(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ProviderInput>,
) -> ActixResult<HttpResponse> {
    let provider = state.providers.update(&path, body.into_inner()).await?;
    info!("Provider {} updated", provider.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(provider)))
}

async fn delete_provider(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let provider = state.providers.delete(&path).await?;
    info!("Provider {} deleted", provider.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(provider)))
}

/// Test one provider's connection now
async fn probe_provider(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    debug!("Probe requested for provider {}", path.as_str());
    let sample = state.providers.probe(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(sample)))
}

async fn recent_health(
    state: web::Data<AppState>,
    query: web::Query<HealthQuery>,
) -> ActixResult<HttpResponse> {
    let overview = HealthOverview {
        samples: state.providers.recent_samples(query.limit),
        current: state.providers.current_health(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(overview)))
}

async fn get_settings(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(state.providers.settings())))
}

async fn update_settings(
    state: web::Data<AppState>,
    body: web::Json<SettingsUpdate>,
) -> ActixResult<HttpResponse> {
    let settings = state.providers.update_settings(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(settings)))
}
