use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::config::{CorsPolicy, SecurityConfig};
use crate::core::error::AppError;
use crate::core::response::{self, Data, Envelope};
use crate::middleware::{path_error_handler, ApiKeyAuth, Cors};
use crate::modules::reservations::models::{BillPayload, InvoicesPayload};
use crate::modules::reservations::services::messages;
use crate::modules::reservations::services::{AdvancePaymentService, ReservationService};

pub const SCOPE: &str = "/api/hotel/reserva";

/// Defaults and choices for the advance-payment modal
/// GET /api/hotel/reserva/{booking_id}/advance_payment/options
#[tracing::instrument(skip(service))]
pub async fn get_advance_payment_options(
    service: web::Data<Arc<AdvancePaymentService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let options = service.options(path.into_inner()).await?;

    Ok(response::ok(&Envelope::ok(Data { data: options })))
}

/// Printable receipt
/// POST /api/hotel/reserva/{booking_id}/print_bill
#[tracing::instrument(skip(service))]
pub async fn print_bill(
    service: web::Data<Arc<ReservationService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let html = service.print_bill(path.into_inner()).await?;

    Ok(response::ok(&Envelope::ok(BillPayload { html })))
}

/// Create or update the booking's invoice
/// POST /api/hotel/reserva/{booking_id}/create_invoice
#[tracing::instrument(skip(service))]
pub async fn create_invoice(
    service: web::Data<Arc<ReservationService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let invoices = service.create_invoice(path.into_inner()).await?;

    Ok(response::ok(
        &Envelope::ok(InvoicesPayload { invoices }).with_message(messages::INVOICE_CREATED),
    ))
}

/// Housekeeping: the room is clean again
/// POST /api/hotel/reserva/{booking_id}/mark_room_ready
#[tracing::instrument(skip(service))]
pub async fn mark_room_ready(
    service: web::Data<Arc<ReservationService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let data = service.mark_room_ready(path.into_inner()).await?;

    Ok(response::ok(
        &Envelope::ok(Data { data }).with_message(messages::ROOM_MARKED_READY),
    ))
}

/// Configure reservation routes
///
/// The scope is wrapped so that CORS runs first, then the API key check,
/// then the handler.
pub fn configure(
    security: SecurityConfig,
    cors: CorsPolicy,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.service(
            web::scope(SCOPE)
                .app_data(web::PathConfig::default().error_handler(path_error_handler))
                .wrap(ApiKeyAuth::new(security))
                .wrap(Cors::new(cors))
                .route(
                    "/{booking_id}/advance_payment/options",
                    web::get().to(get_advance_payment_options),
                )
                .route("/{booking_id}/print_bill", web::post().to(print_bill))
                .route("/{booking_id}/create_invoice", web::post().to(create_invoice))
                .route("/{booking_id}/mark_room_ready", web::post().to(mark_room_ready)),
        );
    }
}
