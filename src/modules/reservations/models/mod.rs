// Response payloads of the reservation endpoints

mod advance_payment;

pub use advance_payment::{
    AdvancePaymentDefaults, AdvancePaymentOptions, JournalOption, PaymentMethodOption,
};

use serde::Serialize;

use crate::modules::records::{BookingStatus, InvoiceSummary};

/// `{"html": ...}` payload of print_bill
#[derive(Debug, Clone, Serialize)]
pub struct BillPayload {
    pub html: String,
}

/// `{"invoices": [...]}` payload of create_invoice
#[derive(Debug, Clone, Serialize)]
pub struct InvoicesPayload {
    pub invoices: Vec<InvoiceSummary>,
}

/// `data` of mark_room_ready
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomReadyData {
    pub reserva_id: i64,
    pub status_bar: BookingStatus,
}
