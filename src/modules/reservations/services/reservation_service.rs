use std::sync::Arc;

use super::{load_booking, messages};
use crate::core::{AppError, Result};
use crate::modules::records::{InvoiceSummary, RecordStore};
use crate::modules::reservations::models::RoomReadyData;

/// Front-desk actions on a booking: receipt, invoicing, housekeeping
///
/// Actions are never retried; a failure is reported to the caller, who
/// decides whether running it again is safe.
pub struct ReservationService {
    store: Arc<dyn RecordStore>,
    bill_report: String,
}

impl ReservationService {
    pub fn new(store: Arc<dyn RecordStore>, bill_report: impl Into<String>) -> Self {
        Self {
            store,
            bill_report: bill_report.into(),
        }
    }

    /// Render the booking receipt as printable HTML
    pub async fn print_bill(&self, booking_id: i64) -> Result<String> {
        let booking = load_booking(self.store.as_ref(), booking_id).await?;

        self.store
            .render_report(&self.bill_report, booking.id)
            .await
            .map_err(|e| {
                tracing::error!(booking_id, report = %self.bill_report, error = %e, "Receipt rendering failed");
                AppError::upstream(format!("{}: {}", messages::BILL_RENDER_FAILED, e))
            })
    }

    /// Run the booking's invoice action and return the order's invoices
    pub async fn create_invoice(&self, booking_id: i64) -> Result<Vec<InvoiceSummary>> {
        let booking = load_booking(self.store.as_ref(), booking_id).await?;

        let action = self
            .store
            .create_booking_invoice(booking.id)
            .await
            .map_err(|e| {
                tracing::error!(booking_id, error = %e, "Invoice creation failed");
                e
            })?;
        tracing::debug!(booking_id, action = %action, "Invoice action finished");

        // The action may have created or replaced the order's invoices
        let refreshed = self.store.find_booking(booking.id).await?;
        let order = match refreshed.and_then(|b| b.order_id) {
            Some(order_id) => self.store.find_sale_order(order_id).await?,
            None => None,
        };

        let invoices = match order {
            Some(order) => self.store.invoices(&order.invoice_ids).await?,
            None => Vec::new(),
        };

        tracing::info!(booking_id, invoices = invoices.len(), "Invoice created");
        Ok(invoices)
    }

    /// Move a booking from `cleaning_needed` to room-ready
    pub async fn mark_room_ready(&self, booking_id: i64) -> Result<RoomReadyData> {
        let booking = load_booking(self.store.as_ref(), booking_id).await?;

        if !booking.status_bar.is_cleaning_needed() {
            tracing::info!(
                booking_id,
                status = %booking.status_bar,
                "Refused room-ready transition"
            );
            return Err(AppError::precondition(messages::NOT_CLEANING_NEEDED));
        }

        self.store.mark_room_ready(booking.id).await.map_err(|e| {
            tracing::error!(booking_id, error = %e, "Room-ready transition failed");
            AppError::upstream(format!("{}: {}", messages::ROOM_READY_FAILED, e))
        })?;

        // Re-read so the response carries the status the platform computed
        let refreshed = load_booking(self.store.as_ref(), booking.id).await?;

        tracing::info!(booking_id, status = %refreshed.status_bar, "Room marked ready");
        Ok(RoomReadyData {
            reserva_id: refreshed.id,
            status_bar: refreshed.status_bar,
        })
    }
}
