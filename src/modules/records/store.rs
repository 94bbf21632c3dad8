use async_trait::async_trait;
use chrono::NaiveDate;

use super::models::{
    Booking, Company, InvoiceSummary, Journal, JournalType, PaymentMethodLine, SaleOrder,
    SelectionOption,
};
use crate::core::Result;

/// Data-access port to the business platform that owns bookings, orders,
/// journals and invoices.
///
/// Lookups return `Ok(None)` for ids that do not resolve. Any `Err` is an
/// upstream failure; its display text is what callers surface to clients.
/// Implementations are responsible for the transactional guarantees of the
/// actions they run.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_booking(&self, id: i64) -> Result<Option<Booking>>;

    async fn find_sale_order(&self, id: i64) -> Result<Option<SaleOrder>>;

    /// Company of the API user, used when an order has none
    async fn current_company(&self) -> Result<Company>;

    /// Journals of `company_id` whose type is one of `types`, in the
    /// platform's default order
    async fn search_journals(&self, company_id: i64, types: &[JournalType])
        -> Result<Vec<Journal>>;

    /// Payment method lines for `ids`, in the order of `ids`
    async fn payment_method_lines(&self, ids: &[i64]) -> Result<Vec<PaymentMethodLine>>;

    /// Selection values of the payment `payment_type` field
    async fn payment_type_selection(&self) -> Result<Vec<SelectionOption>>;

    /// Current date in the context of the API user
    async fn context_today(&self) -> Result<NaiveDate>;

    /// Render the report template `report` for a booking as HTML
    async fn render_report(&self, report: &str, booking_id: i64) -> Result<String>;

    /// Run the booking's own invoice-creation action.
    /// Returns the platform's action descriptor, if any.
    async fn create_booking_invoice(&self, booking_id: i64) -> Result<serde_json::Value>;

    async fn invoices(&self, ids: &[i64]) -> Result<Vec<InvoiceSummary>>;

    /// Run the booking's room-ready transition
    async fn mark_room_ready(&self, booking_id: i64) -> Result<()>;

    /// Cheap connectivity check
    async fn ping(&self) -> Result<()>;
}
