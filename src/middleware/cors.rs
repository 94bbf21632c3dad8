use actix_web::{
    body::{BoxBody, EitherBody},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{
        header::{self, HeaderMap, HeaderValue},
        Method,
    },
    Error, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::config::CorsPolicy;

/// CORS middleware
///
/// Answers every `OPTIONS` request itself with an empty 200 and the policy
/// headers, so nothing mounted inside it (authentication included) runs for
/// a preflight. Every other response gets the same header set.
///
/// Mount it outermost: `scope.wrap(ApiKeyAuth::new(..)).wrap(Cors::new(..))`.
pub struct Cors {
    headers: Rc<CorsHeaders>,
}

impl Cors {
    pub fn new(policy: CorsPolicy) -> Self {
        Self {
            headers: Rc::new(CorsHeaders::from_policy(policy)),
        }
    }
}

/// Header values prepared once per worker
struct CorsHeaders {
    policy: CorsPolicy,
    allow_methods: HeaderValue,
    allow_headers: HeaderValue,
    max_age: HeaderValue,
}

impl CorsHeaders {
    fn from_policy(policy: CorsPolicy) -> Self {
        // CorsPolicy values are validated as header values when loaded
        let allow_methods = HeaderValue::from_str(&policy.allowed_methods).unwrap_or_else(|_| {
            HeaderValue::from_static(crate::config::cors::DEFAULT_ALLOWED_METHODS)
        });
        let allow_headers = HeaderValue::from_str(&policy.allowed_headers).unwrap_or_else(|_| {
            HeaderValue::from_static(crate::config::cors::DEFAULT_ALLOWED_HEADERS)
        });
        let max_age = HeaderValue::from(policy.max_age);

        Self {
            policy,
            allow_methods,
            allow_headers,
            max_age,
        }
    }

    fn apply(&self, headers: &mut HeaderMap, origin: Option<&str>) {
        if let Some(value) = self
            .policy
            .allow_origin_for(origin)
            .and_then(|o| HeaderValue::from_str(&o).ok())
        {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
        if !self.policy.allows_any_origin() {
            headers.insert(header::VARY, HeaderValue::from_static("Origin"));
        }
        headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
        headers.insert(header::ACCESS_CONTROL_MAX_AGE, self.max_age.clone());
        if self.policy.allow_credentials {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Cors
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<BoxBody, B>>;
    type Error = Error;
    type InitError = ();
    type Transform = CorsMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorsMiddleware {
            service: Rc::new(service),
            headers: self.headers.clone(),
        }))
    }
}

pub struct CorsMiddleware<S> {
    service: Rc<S>,
    headers: Rc<CorsHeaders>,
}

impl<S, B> Service<ServiceRequest> for CorsMiddleware<S>
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
        let headers = self.headers.clone();
        let origin = req
            .headers()
            .get(header::ORIGIN)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);

        Box::pin(async move {
            if req.method() == Method::OPTIONS {
                tracing::debug!(path = %req.path(), "CORS preflight request");
                let mut response = HttpResponse::Ok().finish();
                headers.apply(response.headers_mut(), origin.as_deref());
                return Ok(req.into_response(response).map_into_left_body());
            }

            // The request must not be cloned before this call: the router
            // needs sole ownership to record the matched path
            let mut res = svc.call(req).await?.map_into_right_body();

            if !is_json(res.headers()) {
                tracing::warn!(
                    path = %res.request().path(),
                    status = %res.status(),
                    "Response is not application/json"
                );
            }
            headers.apply(res.headers_mut(), origin.as_deref());

            Ok(res)
        })
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}
