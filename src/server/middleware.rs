//! HTTP middleware
//!
//! [`AdminAuth`] guards the `/admin` scope with the configured admin key.

use crate::server::state::AppState;
use crate::utils::error::GatewayError;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::HeaderMap;
use actix_web::web;
use futures::future::{Ready, ready};
use sha2::{Digest, Sha256};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, warn};

/// Rejects requests without the admin key with 401
///
/// The key is read from `Authorization: Bearer <key>` or `X-API-Key`. When no
/// admin key is configured every request is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminAuth;

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AdminAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthService { service }))
    }
}

/// Service implementation for [`AdminAuth`]
pub struct AdminAuthService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AdminAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Err(err) = authorize(&req) {
            warn!(path = %req.path(), "Rejected admin request: {}", err);
            let response = req.error_response(err).map_into_right_body();
            return Box::pin(async move { Ok(response) });
        }

        debug!(path = %req.path(), "Admin request authorized");
        let fut = self.service.call(req);
        Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
    }
}

fn authorize(req: &ServiceRequest) -> Result<(), GatewayError> {
    let expected = req
        .app_data::<web::Data<AppState>>()
        .and_then(|state| state.config.gateway.admin.api_key.clone())
        .ok_or_else(|| {
            GatewayError::Unauthorized("admin API is disabled: no admin key configured".to_string())
        })?;

    let presented = presented_key(req.headers())
        .ok_or_else(|| GatewayError::Unauthorized("missing admin credentials".to_string()))?;

    if keys_match(presented, expected.trim()) {
        Ok(())
    } else {
        Err(GatewayError::Unauthorized("invalid admin credentials".to_string()))
    }
}

/// Key from `Authorization: Bearer` or `X-API-Key`
fn presented_key(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    let header_key = || headers.get("x-api-key").and_then(|h| h.to_str().ok());

    bearer
        .or_else(header_key)
        .map(str::trim)
        .filter(|key| !key.is_empty())
}

/// Compare digests so timing does not depend on where the keys differ
fn keys_match(presented: &str, expected: &str) -> bool {
    let a = Sha256::digest(presented.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
