//! Booking payment, invoicing and housekeeping endpoints under
//! `/api/hotel/reserva`.

pub mod controllers;
pub mod models;
pub mod services;

pub use controllers::configure;
pub use services::{AdvancePaymentService, ReservationService};
