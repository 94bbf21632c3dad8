use actix_web::{error::PathError, HttpRequest};

use crate::core::AppError;
use crate::modules::reservations::services::messages::BOOKING_NOT_FOUND;

/// A booking id that does not parse cannot name an existing booking
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(path = %req.path(), error = %err, "Unparseable path parameter");
    AppError::not_found(BOOKING_NOT_FOUND).into()
}
