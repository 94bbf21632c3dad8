use actix_web::{
    body::{BoxBody, EitherBody},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, ResponseError,
};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use futures_util::future::LocalBoxFuture;
use serde::Deserialize;
use std::future::{ready, Ready};
use std::rc::Rc;
use subtle::ConstantTimeEq;

use crate::config::{ApiCredential, SecurityConfig};
use crate::core::{AppError, Result as AppResult};

pub const API_KEY_HEADER: &str = "X-API-Key";

pub const MISSING_API_KEY: &str = "API key no proporcionada.";
pub const INVALID_API_KEY: &str = "API key inválida.";

/// API Key authentication middleware
///
/// Rejects the request with a 401 envelope before the handler runs when the
/// credential is missing or wrong. The rejection is an ordinary response, so
/// an outer CORS middleware still decorates it.
pub struct ApiKeyAuth {
    credential: Rc<ApiCredential>,
}

impl ApiKeyAuth {
    pub fn new(security: SecurityConfig) -> Self {
        Self {
            credential: Rc::new(security.api_key),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<BoxBody, B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ApiKeyAuthMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyAuthMiddleware {
            service: Rc::new(service),
            credential: self.credential.clone(),
        }))
    }
}

pub struct ApiKeyAuthMiddleware<S> {
    service: Rc<S>,
    credential: Rc<ApiCredential>,
}

impl<S, B> Service<ServiceRequest> for ApiKeyAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<BoxBody, B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let credential = self.credential.clone();

        Box::pin(async move {
            // Preflight carries no credentials
            if req.method() == Method::OPTIONS {
                return svc.call(req).await.map(|res| res.map_into_right_body());
            }

            match authorize(&credential, extract_api_key(&req).as_deref()) {
                Ok(()) => svc.call(req).await.map(|res| res.map_into_right_body()),
                Err(err) => {
                    tracing::warn!(
                        method = %req.method(),
                        path = %req.path(),
                        reason = %err,
                        "Rejected unauthenticated request"
                    );
                    let response = err.error_response();
                    Ok(req.into_response(response).map_into_left_body())
                }
            }
        })
    }
}

#[derive(Deserialize)]
struct ApiKeyQuery {
    api_key: Option<String>,
}

/// Credential from the `X-API-Key` header, or the `api_key` query parameter
fn extract_api_key(req: &ServiceRequest) -> Option<String> {
    let from_header = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string);

    from_header.or_else(|| {
        web::Query::<ApiKeyQuery>::from_query(req.query_string())
            .ok()
            .and_then(|q| q.into_inner().api_key)
            .filter(|key| !key.is_empty())
    })
}

fn authorize(expected: &ApiCredential, provided: Option<&str>) -> AppResult<()> {
    let provided = provided.ok_or_else(|| AppError::unauthorized(MISSING_API_KEY))?;

    if verify_credential(expected, provided)? {
        Ok(())
    } else {
        Err(AppError::unauthorized(INVALID_API_KEY))
    }
}

/// Compare a presented key with the configured credential
pub fn verify_credential(expected: &ApiCredential, provided: &str) -> AppResult<bool> {
    match expected {
        ApiCredential::Plain(secret) => Ok(secret.as_bytes().ct_eq(provided.as_bytes()).into()),
        ApiCredential::Argon2Hash(hash) => verify_api_key(provided, hash),
    }
}

/// Helper function to hash API keys using Argon2
pub fn hash_api_key(api_key: &str) -> AppResult<String> {
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(api_key.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Failed to hash API key: {}", e)))
}

/// Helper function to verify API keys using Argon2
pub fn verify_api_key(api_key: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(api_key.as_bytes(), &parsed_hash)
        .is_ok())
}
