// Records owned by the business platform, as seen through the record store.
//
// Only the fields the reservation endpoints read are modelled.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Housekeeping/front-desk status of a booking (`status_bar`)
///
/// Kept as an open string: the platform owns the full state list and may
/// add states this service does not know about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingStatus(String);

impl BookingStatus {
    pub const CLEANING_NEEDED: &'static str = "cleaning_needed";
    pub const ROOM_READY: &'static str = "room_ready";
    pub const CHECKIN: &'static str = "checkin";

    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Only bookings waiting for housekeeping can be marked room-ready
    pub fn is_cleaning_needed(&self) -> bool {
        self.0 == Self::CLEANING_NEEDED
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookingStatus {
    fn from(status: &str) -> Self {
        Self::new(status)
    }
}

/// Hotel reservation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: i64,
    pub status_bar: BookingStatus,
    /// Sale order tied to the booking, if one was generated
    pub order_id: Option<i64>,
}

/// `(id, display name)` pair of a related record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
    pub id: i64,
    pub name: String,
}

impl RecordRef {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

pub type Company = RecordRef;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    pub id: i64,
    pub name: String,
    pub symbol: String,
}

/// Sale transaction behind a booking
#[derive(Debug, Clone, PartialEq)]
pub struct SaleOrder {
    pub id: i64,
    pub name: String,
    pub amount_total: Decimal,
    pub paid_amount: Decimal,
    /// `None` when the order has no company; callers fall back to the
    /// store's current company
    pub company: Option<Company>,
    pub currency: CurrencyInfo,
    pub partner: RecordRef,
    pub invoice_ids: Vec<i64>,
}

impl SaleOrder {
    /// Outstanding amount, never negative
    pub fn amount_due(&self) -> Decimal {
        amount_due(self.amount_total, self.paid_amount)
    }
}

/// `max(total - paid, 0)`
pub fn amount_due(total: Decimal, paid: Decimal) -> Decimal {
    (total - paid).max(Decimal::ZERO)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalType {
    Bank,
    Cash,
    Sale,
    Purchase,
    General,
}

impl JournalType {
    /// Journals a payment can be registered against
    pub const PAYMENT: [JournalType; 2] = [JournalType::Bank, JournalType::Cash];

    pub fn as_str(&self) -> &'static str {
        match self {
            JournalType::Bank => "bank",
            JournalType::Cash => "cash",
            JournalType::Sale => "sale",
            JournalType::Purchase => "purchase",
            JournalType::General => "general",
        }
    }
}

impl fmt::Display for JournalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of money for a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentDirection {
    Inbound,
    Outbound,
}

impl PaymentDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentDirection::Inbound => "inbound",
            PaymentDirection::Outbound => "outbound",
        }
    }
}

/// Payment destination account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journal {
    pub id: i64,
    pub display_name: String,
    pub code: String,
    pub journal_type: JournalType,
    pub company_id: i64,
    pub inbound_method_line_ids: Vec<i64>,
    pub outbound_method_line_ids: Vec<i64>,
}

impl Journal {
    pub fn method_line_ids(&self, direction: PaymentDirection) -> &[i64] {
        match direction {
            PaymentDirection::Inbound => &self.inbound_method_line_ids,
            PaymentDirection::Outbound => &self.outbound_method_line_ids,
        }
    }
}

/// A configured way of receiving/sending money on a journal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethodLine {
    pub id: i64,
    pub name: String,
    /// Code of the underlying payment method (`manual`, ...)
    pub code: String,
    pub payment_type: PaymentDirection,
}

/// One `(value, label)` entry of a selection field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionOption {
    pub value: String,
    pub label: String,
}

impl SelectionOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub id: i64,
    pub name: String,
    pub state: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_total: Decimal,
}
