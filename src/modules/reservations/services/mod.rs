pub mod advance_payment;
pub mod messages;
pub mod reservation_service;

pub use advance_payment::AdvancePaymentService;
pub use reservation_service::ReservationService;

use crate::core::{AppError, Result};
use crate::modules::records::{Booking, RecordStore};

/// Resolve a booking id or fail with the not-found error every endpoint shares
pub(crate) async fn load_booking(store: &dyn RecordStore, booking_id: i64) -> Result<Booking> {
    store
        .find_booking(booking_id)
        .await?
        .ok_or_else(|| AppError::not_found(messages::BOOKING_NOT_FOUND))
}
