//! Canonical JSON envelope returned by every endpoint.

use actix_web::{http::header::ContentType, http::StatusCode, HttpResponse};
use serde::Serialize;

/// Response envelope
///
/// `payload` is flattened into the top level, so a success carrying
/// [`Data`] serializes as `{"success": true, "data": {...}}` while an endpoint
/// returning markup serializes as `{"success": true, "html": "..."}`.
///
/// A success never carries `error`; a failure always carries it and never
/// carries a payload. The constructors are the only way to build one.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(flatten)]
    payload: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            message: None,
            error: None,
            payload: Some(payload),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
            payload: None,
        }
    }

    /// Attach a human-readable message to a success envelope
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }
}

/// `{"data": ...}` payload
#[derive(Debug, Clone, Serialize)]
pub struct Data<T> {
    pub data: T,
}

/// Serialize `body` as the JSON response with the given status.
///
/// Decimals are written as JSON numbers and dates as ISO-8601 strings by
/// their `Serialize` impls. A body that cannot be serialized yields a 500
/// failure envelope rather than a panic.
pub fn format<T: Serialize>(body: &T, status: StatusCode) -> HttpResponse {
    match serde_json::to_vec(body) {
        Ok(bytes) => HttpResponse::build(status)
            .content_type(ContentType::json())
            .body(bytes),
        Err(err) => {
            tracing::error!(error = %err, "Failed to serialize response body");
            let fallback = serde_json::json!({
                "success": false,
                "error": format!("Error serializando respuesta: {}", err),
            });
            HttpResponse::InternalServerError()
                .content_type(ContentType::json())
                .body(fallback.to_string())
        }
    }
}

/// `format` with status 200
pub fn ok<T: Serialize>(body: &T) -> HttpResponse {
    format(body, StatusCode::OK)
}
