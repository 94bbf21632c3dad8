// Record Store Gateway: the port to the business platform and its adapters

pub mod in_memory;
pub mod models;
pub mod odoo;
pub mod store;

pub use in_memory::InMemoryRecordStore;
pub use models::{
    Booking, BookingStatus, Company, CurrencyInfo, InvoiceSummary, Journal, JournalType,
    PaymentDirection, PaymentMethodLine, RecordRef, SaleOrder, SelectionOption,
};
pub use odoo::OdooRecordStore;
pub use store::RecordStore;
